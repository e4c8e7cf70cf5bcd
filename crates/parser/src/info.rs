//! Verbose-info (`allinfo`) parsing.

use smb_core::FileMode;
use time::{OffsetDateTime, UtcOffset};

use crate::timestamp::parse_client_timestamp;
use crate::ParseError;

/// Fields extracted from an `allinfo` response.
#[derive(Clone, Copy, Debug)]
pub struct AllInfo {
    /// Size in bytes.
    pub size: u64,
    /// Last-write time; the authoritative modification time.
    pub mtime: OffsetDateTime,
    /// Attribute bitmask.
    pub mode: FileMode,
}

/// Parses the key-colon-value block `allinfo` prints.
///
/// Of the three timestamp fields only `write_time` is load-bearing;
/// `access_time` and `change_time` are accepted and ignored. The
/// `attributes` value carries a letter cluster followed by a parenthesised
/// hex rendering, e.g. `AH (22)`; only the cluster is read.
pub fn parse_all_info(lines: &[String], timezone: UtcOffset) -> Result<AllInfo, ParseError> {
    let mut size = None;
    let mut mtime = None;
    let mut mode = None;

    for line in lines {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "size" => {
                size = Some(
                    value
                        .parse()
                        .map_err(|_| ParseError::Size(value.to_owned()))?,
                );
            }
            "write_time" => {
                mtime = Some(parse_client_timestamp(value, timezone)?);
            }
            "attributes" => {
                let cluster = value.split_whitespace().next().unwrap_or("");
                let cluster = if cluster.starts_with('(') { "" } else { cluster };
                mode = Some(
                    FileMode::from_attribute_letters(cluster)
                        .ok_or_else(|| ParseError::Attributes(value.to_owned()))?,
                );
            }
            _ => {}
        }
    }

    Ok(AllInfo {
        size: size.ok_or(ParseError::MissingField("size"))?,
        mtime: mtime.ok_or(ParseError::MissingField("write_time"))?,
        mode: mode.ok_or(ParseError::MissingField("attributes"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|l| (*l).to_owned()).collect()
    }

    #[test]
    fn parses_full_block() {
        let output = lines(&[
            "altname: REPORT~1.TXT",
            "create_time:    Mon Jan  1 09:00:00 2024",
            "access_time:    Mon Jan  1 11:00:00 2024",
            "write_time:     Mon Jan  1 10:11:12 2024",
            "change_time:    Mon Jan  1 10:11:12 2024",
            "attributes: AH (22)",
            "size: 1024",
        ]);
        let info = parse_all_info(&output, UtcOffset::UTC).unwrap();

        assert_eq!(info.size, 1024);
        assert_eq!(info.mtime, datetime!(2024-01-01 10:11:12 UTC));
        assert!(info.mode.contains(FileMode::ARCHIVE));
        assert!(info.mode.contains(FileMode::HIDDEN));
    }

    #[test]
    fn write_time_is_authoritative() {
        let output = lines(&[
            "access_time:    Mon Jan  1 23:59:59 2024",
            "write_time:     Mon Jan  1 10:11:12 2024",
            "change_time:    Mon Jan  1 00:00:01 2024",
            "attributes: A (20)",
            "size: 7",
        ]);
        let info = parse_all_info(&output, UtcOffset::UTC).unwrap();
        assert_eq!(info.mtime, datetime!(2024-01-01 10:11:12 UTC));
    }

    #[test]
    fn timezone_applies_to_write_time() {
        let offset = UtcOffset::from_hms(1, 0, 0).unwrap();
        let output = lines(&[
            "write_time:     Mon Jan  1 10:11:12 2024",
            "attributes: A (20)",
            "size: 7",
        ]);
        let info = parse_all_info(&output, offset).unwrap();
        assert_eq!(info.mtime, datetime!(2024-01-01 09:11:12 UTC));
    }

    #[test]
    fn attribute_cluster_without_letters_is_normal() {
        let output = lines(&[
            "write_time:     Mon Jan  1 10:11:12 2024",
            "attributes: (20)",
            "size: 0",
        ]);
        let info = parse_all_info(&output, UtcOffset::UTC).unwrap();
        assert!(info.mode.is_empty());
    }

    #[test]
    fn missing_write_time_is_an_error() {
        let output = lines(&["attributes: A (20)", "size: 7"]);
        let err = parse_all_info(&output, UtcOffset::UTC).unwrap_err();
        assert!(matches!(err, ParseError::MissingField("write_time")));
    }

    #[test]
    fn missing_attributes_is_an_error() {
        let output = lines(&["write_time:     Mon Jan  1 10:11:12 2024", "size: 7"]);
        let err = parse_all_info(&output, UtcOffset::UTC).unwrap_err();
        assert!(matches!(err, ParseError::MissingField("attributes")));
    }

    #[test]
    fn unknown_attribute_letter_is_an_error() {
        let output = lines(&[
            "write_time:     Mon Jan  1 10:11:12 2024",
            "attributes: AX (120)",
            "size: 7",
        ]);
        let err = parse_all_info(&output, UtcOffset::UTC).unwrap_err();
        assert!(matches!(err, ParseError::Attributes(_)));
    }

    #[test]
    fn directory_block_with_zero_size() {
        let output = lines(&[
            "write_time:     Sun Dec 10 14:17:08 2023",
            "attributes: D (10)",
            "size: 0",
        ]);
        let info = parse_all_info(&output, UtcOffset::UTC).unwrap();
        assert!(info.mode.contains(FileMode::DIRECTORY));
        assert_eq!(info.size, 0);
    }
}
