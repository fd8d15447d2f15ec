use std::fmt;
use std::str::FromStr;

use crate::hex::{hex_decode, hex_to_string};
use crate::HashError;

/// An object identifier — the SHA-1 hash of an object's framed content.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 20]);

impl ObjectId {
    /// The null OID (all zeros).
    pub const NULL: Self = Self([0u8; 20]);

    /// Create an ObjectId from raw digest bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HashError> {
        if bytes.len() != 20 {
            return Err(HashError::InvalidHashLength {
                expected: 20,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 20];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// Create an ObjectId from a 40-character hex string.
    pub fn from_hex(hex: &str) -> Result<Self, HashError> {
        let mut bytes = [0u8; 20];
        hex_decode(hex, &mut bytes)?;
        Ok(Self(bytes))
    }

    /// Get the raw bytes of the hash.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Check if this is the null (all-zeros) OID.
    pub fn is_null(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Get the hex string representation (lowercase).
    pub fn to_hex(&self) -> String {
        hex_to_string(&self.0)
    }

    /// The abbreviated hex form shown to humans.
    pub fn short_hex(&self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(7);
        hex
    }

    /// Get the loose object path component: `"xx/xxxx..."`.
    pub fn loose_path(&self) -> String {
        let hex = self.to_hex();
        format!("{}/{}", &hex[..2], &hex[2..])
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", &self.to_hex()[..8])
    }
}

impl FromStr for ObjectId {
    type Err = HashError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}
