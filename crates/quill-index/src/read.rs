//! Index file reading (DIRC v2).

use bstr::BString;
use quill_hash::hasher::Hasher;
use quill_hash::ObjectId;
use quill_object::FileMode;

use crate::entry::{IndexEntry, StatData};
use crate::{Index, IndexError};

/// Magic bytes at the start of every index file.
const INDEX_SIGNATURE: &[u8; 4] = b"DIRC";

/// Offset of the flexible data portion in the on-disk cache entry struct:
/// ctime(8) + mtime(8) + dev(4) + ino(4) + mode(4) + uid(4) + gid(4) + size(4) = 40 bytes.
const ONDISK_OFFSET_DATA: usize = 40;

/// SHA-1 hash size.
const SHA1_SIZE: usize = 20;

/// Parse an index file from raw bytes.
pub fn parse_index(data: &[u8]) -> Result<Index, IndexError> {
    if data.len() < 12 + SHA1_SIZE {
        return Err(IndexError::InvalidHeader("index file too short".into()));
    }

    // Verify checksum first (last 20 bytes).
    verify_checksum(data)?;

    let mut cursor = 0;

    let sig = &data[cursor..cursor + 4];
    if sig != INDEX_SIGNATURE {
        return Err(IndexError::InvalidHeader(format!(
            "bad signature: expected DIRC, got {:?}",
            sig
        )));
    }
    cursor += 4;

    let version = read_u32(&data[cursor..]);
    cursor += 4;

    if version != 2 {
        return Err(IndexError::UnsupportedVersion(version));
    }

    let entry_count = read_u32(&data[cursor..]) as usize;
    cursor += 4;

    let content_end = data.len() - SHA1_SIZE;
    let mut entries = Vec::with_capacity(entry_count);

    for _ in 0..entry_count {
        let (entry, new_cursor) = parse_entry(data, cursor, content_end)?;
        entries.push(entry);
        cursor = new_cursor;
    }

    // Extension blocks (TREE cache and friends written by other
    // implementations) sit between the entries and the checksum; quill
    // carries none of them, so they are skipped.
    while cursor + 8 <= content_end {
        let ext_size = read_u32(&data[cursor + 4..]) as usize;
        cursor += 8;
        if cursor + ext_size > content_end {
            return Err(IndexError::InvalidEntry {
                offset: cursor,
                reason: "extension data exceeds index bounds".into(),
            });
        }
        cursor += ext_size;
    }

    Ok(Index { entries })
}

/// Calculate the on-disk entry size using C git's formula:
/// `((ONDISK_OFFSET_DATA + hash + flags + name_len + 8) & ~7)`
fn ondisk_entry_size(name_len: usize) -> usize {
    (ONDISK_OFFSET_DATA + SHA1_SIZE + 2 + name_len + 8) & !7
}

/// Parse a single cache entry.
fn parse_entry(
    data: &[u8],
    start: usize,
    content_end: usize,
) -> Result<(IndexEntry, usize), IndexError> {
    let mut cursor = start;

    if cursor + 62 > content_end {
        return Err(IndexError::InvalidEntry {
            offset: start,
            reason: "entry too short".into(),
        });
    }

    // Stat data (40 bytes; mode sits between ino and uid).
    let stat = StatData {
        ctime_secs: read_u32(&data[cursor..]),
        ctime_nsecs: read_u32(&data[cursor + 4..]),
        mtime_secs: read_u32(&data[cursor + 8..]),
        mtime_nsecs: read_u32(&data[cursor + 12..]),
        dev: read_u32(&data[cursor + 16..]),
        ino: read_u32(&data[cursor + 20..]),
        uid: read_u32(&data[cursor + 28..]),
        gid: read_u32(&data[cursor + 32..]),
        size: read_u32(&data[cursor + 36..]),
    };
    let mode_raw = read_u32(&data[cursor + 24..]);
    cursor += 40;

    // OID (20 bytes).
    let oid = ObjectId::from_bytes(&data[cursor..cursor + 20]).map_err(|_| {
        IndexError::InvalidEntry {
            offset: start,
            reason: "invalid OID".into(),
        }
    })?;
    cursor += 20;

    // Flags (16 bits): assume-valid, extended, stage, name length.
    let flags_raw = read_u16(&data[cursor..]);
    cursor += 2;

    let assume_valid = (flags_raw & 0x8000) != 0;
    if (flags_raw & 0x4000) != 0 {
        return Err(IndexError::InvalidEntry {
            offset: start,
            reason: "extended flags in v2 index".into(),
        });
    }

    // Path: NUL-terminated.
    let path_start = cursor;
    let nul_pos = data[path_start..content_end]
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| IndexError::InvalidEntry {
            offset: start,
            reason: "missing NUL in path".into(),
        })?;
    let path = BString::from(&data[path_start..path_start + nul_pos]);

    // Advance past the padding using C git's entry-size formula.
    cursor = start + ondisk_entry_size(nul_pos);
    if cursor > content_end {
        return Err(IndexError::InvalidEntry {
            offset: start,
            reason: "entry overruns index".into(),
        });
    }

    let entry = IndexEntry {
        path,
        oid,
        mode: FileMode::from_raw(mode_raw),
        stat,
        assume_valid,
    };

    Ok((entry, cursor))
}

/// Verify the SHA-1 checksum trailer of the index file.
fn verify_checksum(data: &[u8]) -> Result<(), IndexError> {
    let content = &data[..data.len() - SHA1_SIZE];
    let stored_checksum = &data[data.len() - SHA1_SIZE..];

    let computed = Hasher::digest(content).map_err(|_| IndexError::ChecksumMismatch)?;

    if computed.as_bytes() != stored_checksum {
        return Err(IndexError::ChecksumMismatch);
    }

    Ok(())
}

fn read_u32(data: &[u8]) -> u32 {
    u32::from_be_bytes([data[0], data[1], data[2], data[3]])
}

fn read_u16(data: &[u8]) -> u16 {
    u16::from_be_bytes([data[0], data[1]])
}
