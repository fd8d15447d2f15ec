use std::fs;
use std::io::Write;

use flate2::write::ZlibEncoder;
use quill_hash::hasher::Hasher;
use quill_hash::ObjectId;
use quill_object::header;
use quill_object::{Object, ObjectType};

use crate::{ObjectStore, StoreError};

impl ObjectStore {
    /// Write an object to the store. Returns the OID.
    pub fn write(&self, obj: &Object) -> Result<ObjectId, StoreError> {
        self.write_raw(obj.object_type(), &obj.serialize_content())
    }

    /// Write raw content with a known type. Returns the OID.
    ///
    /// The identity is the hash of the framed form and is computed before
    /// anything touches disk. An object that already exists is not written
    /// again: identical content yields identical OID and at most one file.
    pub fn write_raw(&self, obj_type: ObjectType, content: &[u8]) -> Result<ObjectId, StoreError> {
        let frame = header::write_header(obj_type, content.len());

        let mut hasher = Hasher::new();
        hasher.update(&frame);
        hasher.update(content);
        let oid = hasher.finalize()?;

        if self.object_path(&oid).is_file() {
            return Ok(oid);
        }

        let deflated = self.deflate(&frame, content)?;
        self.persist(&oid, &deflated)?;
        Ok(oid)
    }

    /// Write a blob and return its OID.
    pub fn write_blob(&self, data: &[u8]) -> Result<ObjectId, StoreError> {
        self.write_raw(ObjectType::Blob, data)
    }

    /// Zlib-compress header + content into memory.
    fn deflate(&self, frame: &[u8], content: &[u8]) -> Result<Vec<u8>, StoreError> {
        let mut encoder = ZlibEncoder::new(
            Vec::with_capacity(frame.len() + content.len() / 2),
            self.compression_level,
        );
        encoder.write_all(frame)?;
        encoder.write_all(content)?;
        Ok(encoder.finish()?)
    }

    /// Land the compressed bytes at the object's fan-out path.
    ///
    /// The bytes first go to a scratch file inside the fan-out directory
    /// (same filesystem) and are then renamed into place, so a reader can
    /// never observe a half-written object. Losing the rename to a
    /// concurrent writer of the same oid still counts as success: in a
    /// content-addressed store both sides wrote identical bytes.
    fn persist(&self, oid: &ObjectId, deflated: &[u8]) -> Result<(), StoreError> {
        let hex = oid.to_hex();
        let fan_out = self.objects_dir().join(&hex[..2]);
        fs::create_dir_all(&fan_out)?;

        let scratch = fan_out.join(format!("incoming-{}-{}", std::process::id(), &hex[2..]));
        fs::write(&scratch, deflated)?;

        // Objects are immutable once stored.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&scratch, fs::Permissions::from_mode(0o444))?;
        }

        let dest = self.object_path(oid);
        if let Err(rename_err) = fs::rename(&scratch, &dest) {
            let _ = fs::remove_file(&scratch);
            if !dest.is_file() {
                return Err(StoreError::Io(rename_err));
            }
        }
        Ok(())
    }
}
