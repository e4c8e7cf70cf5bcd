//! Directory-listing parsing.

use smb_core::{FileInfo, FileMode};
use time::{OffsetDateTime, UtcOffset};

use crate::timestamp::parse_client_timestamp;

/// Minimum run of spaces separating the name column from the attributes.
///
/// The client pads the name column, so the gap is at least this wide even
/// for names that themselves contain (shorter) runs of spaces.
const COLUMN_GAP: &str = "    ";

/// Parses a `dir` response into entry records.
///
/// `.` and `..` are filtered out, blank lines and the summary trailer are
/// skipped, and lines that fit no known shape are dropped with a
/// debug-level trace rather than failing the listing. Timestamps are
/// interpreted in `timezone`, the share server's zone.
pub fn parse_directory_listing(
    lines: &[String],
    base_path: &str,
    timezone: UtcOffset,
) -> Vec<FileInfo> {
    let mut entries = Vec::new();
    for line in lines {
        let line = line.trim_end();
        if line.trim().is_empty() || is_trailer(line) {
            continue;
        }
        let Some((name, size, mtime, mode)) = parse_listing_line(line, timezone) else {
            tracing::debug!(line, "skipping unparseable listing line");
            continue;
        };
        if name == "." || name == ".." {
            continue;
        }
        let path = join_path(base_path, &name);
        entries.push(FileInfo::new(path, name, size, mtime, mode));
    }
    entries
}

/// Matches the `NNN blocks of size MMM. KKK blocks available` summary line.
fn is_trailer(line: &str) -> bool {
    line.contains("blocks of size") || line.contains("blocks available")
}

/// Splits one listing line into name, size, mtime, and mode.
///
/// The name column is padded with at least [`COLUMN_GAP`] spaces; the
/// remainder tokenises as an optional attribute cluster, the byte size,
/// and the timestamp. A missing cluster means no attributes are set.
fn parse_listing_line(
    line: &str,
    timezone: UtcOffset,
) -> Option<(String, u64, OffsetDateTime, FileMode)> {
    let body = line.trim_start();
    let gap = body.find(COLUMN_GAP)?;
    let (name, rest) = body.split_at(gap);
    let name = name.trim_end();
    if name.is_empty() {
        return None;
    }

    let mut tokens = rest.split_whitespace();
    let first = tokens.next()?;
    let (mode, size_token) = if first.bytes().all(|b| b.is_ascii_digit()) {
        (FileMode::NORMAL, first)
    } else {
        (FileMode::from_attribute_letters(first)?, tokens.next()?)
    };
    let size = size_token.parse().ok()?;

    let stamp_text = tokens.collect::<Vec<_>>().join(" ");
    let mtime = parse_client_timestamp(&stamp_text, timezone).ok()?;

    Some((name.to_owned(), size, mtime, mode))
}

fn join_path(base: &str, name: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        format!("/{name}")
    } else {
        format!("{base}/{name}")
    }
}
