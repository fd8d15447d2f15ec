use bstr::{BStr, BString, ByteSlice, ByteVec};
use chrono::{DateTime, FixedOffset, Local, TimeZone};

use crate::error::UtilError;
use crate::Result;

/// A commit timestamp with timezone information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GitDate {
    /// Seconds since Unix epoch.
    pub timestamp: i64,
    /// Timezone offset in minutes from UTC (e.g., -300 for EST).
    pub tz_offset: i32,
}

/// Convert the git-style decimal offset (-0500 parsed as -500) to minutes.
fn tz_offset_to_minutes(tz: i32) -> i32 {
    let sign = if tz < 0 { -1 } else { 1 };
    let abs = tz.unsigned_abs() as i32;
    sign * ((abs / 100) * 60 + abs % 100)
}

/// Convert minutes offset to the git-style decimal representation.
fn minutes_to_tz_offset(minutes: i32) -> i32 {
    let sign = if minutes < 0 { -1 } else { 1 };
    let abs = minutes.unsigned_abs() as i32;
    sign * ((abs / 60) * 100 + abs % 60)
}

impl GitDate {
    /// Create from a Unix timestamp and a timezone offset in minutes.
    pub fn new(timestamp: i64, tz_offset_minutes: i32) -> Self {
        Self {
            timestamp,
            tz_offset: tz_offset_minutes,
        }
    }

    /// The current time in the local timezone.
    pub fn now() -> Self {
        let now = Local::now();
        Self {
            timestamp: now.timestamp(),
            tz_offset: now.offset().local_minus_utc() / 60,
        }
    }

    /// Parse the raw commit-header format: `"<unix-seconds> <±HHMM>"`.
    pub fn parse_raw(input: &str) -> Result<Self> {
        let mut parts = input.split_whitespace();
        let ts = parts
            .next()
            .ok_or_else(|| UtilError::DateParse("empty date".into()))?;
        let timestamp: i64 = ts
            .parse()
            .map_err(|_| UtilError::DateParse(format!("invalid timestamp: {ts}")))?;

        let tz_offset = match parts.next() {
            Some(tz) => {
                if !tz.starts_with('+') && !tz.starts_with('-') {
                    return Err(UtilError::DateParse(format!("invalid timezone: {tz}")));
                }
                let raw: i32 = tz
                    .parse()
                    .map_err(|_| UtilError::DateParse(format!("invalid timezone: {tz}")))?;
                tz_offset_to_minutes(raw)
            }
            None => 0,
        };

        if parts.next().is_some() {
            return Err(UtilError::DateParse(format!("trailing data in date: {input}")));
        }

        Ok(Self {
            timestamp,
            tz_offset,
        })
    }

    /// Format in the raw commit-header form: `"1234567890 +0000"`.
    pub fn to_raw(&self) -> String {
        format!("{} {:+05}", self.timestamp, minutes_to_tz_offset(self.tz_offset))
    }

    /// Human display in the commit's own timezone: `"Thu Feb 13 23:31:30 2009 +0000"`.
    pub fn display(&self) -> String {
        match self.to_datetime() {
            Some(dt) => format!(
                "{} {:+05}",
                dt.format("%a %b %-d %H:%M:%S %Y"),
                minutes_to_tz_offset(self.tz_offset)
            ),
            None => self.to_raw(),
        }
    }

    /// Convert to a chrono DateTime in the stored timezone.
    pub fn to_datetime(&self) -> Option<DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(self.tz_offset * 60)?;
        offset.timestamp_opt(self.timestamp, 0).single()
    }
}

/// Author/committer identity with timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: BString,
    pub email: BString,
    pub date: GitDate,
}

impl Signature {
    /// Build a signature stamped with the current time.
    pub fn now(name: impl Into<BString>, email: impl Into<BString>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            date: GitDate::now(),
        }
    }

    /// Parse from git format: `Name <email> timestamp tz`
    ///
    /// Example: "John Doe <john@example.com> 1234567890 +0000"
    pub fn parse(input: &BStr) -> Result<Self> {
        let input = input.as_bytes();

        let gt_pos = input
            .iter()
            .rposition(|&b| b == b'>')
            .ok_or_else(|| UtilError::DateParse("missing '>' in signature".into()))?;

        let lt_pos = input[..gt_pos]
            .iter()
            .rposition(|&b| b == b'<')
            .ok_or_else(|| UtilError::DateParse("missing '<' in signature".into()))?;

        let name = input[..lt_pos].trim();
        let email = &input[lt_pos + 1..gt_pos];

        let date_str = input[gt_pos + 1..].trim();
        let date_str = std::str::from_utf8(date_str)
            .map_err(|_| UtilError::DateParse("non-UTF-8 date in signature".into()))?;
        let date = GitDate::parse_raw(date_str)?;

        Ok(Self {
            name: BString::from(name),
            email: BString::from(email),
            date,
        })
    }

    /// Format in git's canonical format: `Name <email> timestamp tz`
    pub fn to_bytes(&self) -> BString {
        let mut out = BString::new(Vec::new());
        out.push_str(&self.name);
        out.push_str(b" <");
        out.push_str(&self.email);
        out.push_str(b"> ");
        out.push_str(self.date.to_raw().as_bytes());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_raw() {
        let d = GitDate::parse_raw("1234567890 +0000").unwrap();
        assert_eq!(d.timestamp, 1234567890);
        assert_eq!(d.tz_offset, 0);
    }

    #[test]
    fn parse_raw_negative_tz() {
        let d = GitDate::parse_raw("1234567890 -0500").unwrap();
        assert_eq!(d.tz_offset, -300);
    }

    #[test]
    fn parse_raw_half_hour_tz() {
        let d = GitDate::parse_raw("1234567890 +0530").unwrap();
        assert_eq!(d.tz_offset, 330);
    }

    #[test]
    fn raw_roundtrip() {
        for raw in ["1234567890 +0000", "1 -0500", "1736942400 +0530"] {
            let d = GitDate::parse_raw(raw).unwrap();
            assert_eq!(d.to_raw(), raw);
        }
    }

    #[test]
    fn parse_raw_rejects_garbage() {
        assert!(GitDate::parse_raw("").is_err());
        assert!(GitDate::parse_raw("abc +0000").is_err());
        assert!(GitDate::parse_raw("123 0500").is_err());
        assert!(GitDate::parse_raw("123 +0000 extra").is_err());
    }

    #[test]
    fn signature_parse() {
        let sig = Signature::parse(BStr::new(
            b"John Doe <john@example.com> 1234567890 +0000",
        ))
        .unwrap();
        assert_eq!(sig.name, "John Doe");
        assert_eq!(sig.email, "john@example.com");
        assert_eq!(sig.date.timestamp, 1234567890);
    }

    #[test]
    fn signature_roundtrip() {
        let input = b"Jane <jane@example.com> 1600000000 -0730";
        let sig = Signature::parse(BStr::new(input.as_slice())).unwrap();
        assert_eq!(sig.to_bytes(), input.as_slice());
    }

    #[test]
    fn signature_missing_email_errors() {
        assert!(Signature::parse(BStr::new(b"no email here 123 +0000")).is_err());
    }
}
