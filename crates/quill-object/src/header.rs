//! The `"<type> <size>\0"` framing that prefixes every stored object.

use bstr::ByteSlice;

use crate::{ObjectError, ObjectType};

/// Parse an object header from the front of `data`.
///
/// Returns `(type, content_size, header_length)`; `header_length` counts
/// the terminating NUL, so `data[header_length..]` is the content.
pub fn parse_header(data: &[u8]) -> Result<(ObjectType, usize, usize), ObjectError> {
    let nul = data
        .find_byte(0)
        .ok_or_else(|| ObjectError::InvalidHeader("unterminated header".into()))?;

    let (kind, size_digits) = data[..nul]
        .split_once_str(" ")
        .ok_or_else(|| ObjectError::InvalidHeader("no space between type and size".into()))?;

    let obj_type = ObjectType::from_bytes(kind)?;
    let content_size = ascii_decimal(size_digits).ok_or_else(|| {
        ObjectError::InvalidHeader(format!(
            "bad size field: {:?}",
            String::from_utf8_lossy(size_digits)
        ))
    })?;

    Ok((obj_type, content_size, nul + 1))
}

/// Build the header for an object of the given type and content size.
pub fn write_header(obj_type: ObjectType, content_size: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(16);
    out.extend_from_slice(obj_type.as_bytes());
    out.push(b' ');
    out.extend_from_slice(content_size.to_string().as_bytes());
    out.push(0);
    out
}

/// Decode a non-empty run of ASCII digits, refusing overflow.
fn ascii_decimal(digits: &[u8]) -> Option<usize> {
    if digits.is_empty() {
        return None;
    }
    digits.iter().try_fold(0usize, |acc, &b| {
        if !b.is_ascii_digit() {
            return None;
        }
        acc.checked_mul(10)?.checked_add(usize::from(b - b'0'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_header_from_content() {
        let data = b"blob 11\0hello world";
        let (ty, size, hdr_len) = parse_header(data).unwrap();
        assert_eq!(ty, ObjectType::Blob);
        assert_eq!(size, 11);
        assert_eq!(&data[hdr_len..], b"hello world");
    }

    #[test]
    fn parse_zero_size() {
        let (ty, size, hdr_len) = parse_header(b"tree 0\0").unwrap();
        assert_eq!(ty, ObjectType::Tree);
        assert_eq!(size, 0);
        assert_eq!(hdr_len, 7);
    }

    #[test]
    fn write_then_parse() {
        for (ty, size) in [
            (ObjectType::Blob, 0usize),
            (ObjectType::Commit, 123),
            (ObjectType::Tag, 98765),
        ] {
            let hdr = write_header(ty, size);
            assert_eq!(parse_header(&hdr).unwrap(), (ty, size, hdr.len()));
        }
    }

    #[test]
    fn rejects_missing_terminator() {
        assert!(parse_header(b"blob 5").is_err());
    }

    #[test]
    fn rejects_missing_space() {
        assert!(parse_header(b"tree40\0").is_err());
    }

    #[test]
    fn rejects_unknown_type() {
        assert!(parse_header(b"widget 4\0").is_err());
    }

    #[test]
    fn rejects_non_numeric_size() {
        assert!(parse_header(b"blob ten\0").is_err());
        assert!(parse_header(b"blob \0").is_err());
        assert!(parse_header(b"blob -1\0").is_err());
    }

    #[test]
    fn ascii_decimal_refuses_overflow() {
        let too_big = "9".repeat(40);
        assert_eq!(ascii_decimal(too_big.as_bytes()), None);
        assert_eq!(ascii_decimal(b"0042"), Some(42));
    }
}
