//! Timestamp interpretation for listing and verbose-info output.
//!
//! The client prints asctime-style stamps without zone information, in the
//! server's local time. Depending on version and locale the stamp may carry
//! a leading weekday, a meridiem marker, or a trailing zone abbreviation;
//! only month, day, clock, and year are load-bearing.

use time::macros::format_description;
use time::{Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::ParseError;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const CLIENT_TIMESTAMP_FORMAT: &[time::format_description::FormatItem<'static>] =
    format_description!("[month repr:short] [day padding:none] [hour]:[minute]:[second] [year]");

/// Parses a client timestamp in the share's timezone.
///
/// Tokens that are not month, day-of-month, clock, year, or meridiem are
/// ignored, which absorbs the weekday and zone-abbreviation variants
/// different client versions print.
pub(crate) fn parse_client_timestamp(
    text: &str,
    timezone: UtcOffset,
) -> Result<OffsetDateTime, ParseError> {
    let mut month = None;
    let mut day = None;
    let mut clock = None;
    let mut year = None;
    let mut afternoon = None;

    for token in text.split_whitespace() {
        if month.is_none() && MONTHS.contains(&token) {
            month = Some(token);
        } else if clock.is_none() && token.contains(':') {
            clock = Some(token);
        } else if token.eq_ignore_ascii_case("AM") {
            afternoon = Some(false);
        } else if token.eq_ignore_ascii_case("PM") {
            afternoon = Some(true);
        } else if year.is_none() && token.len() == 4 && token.bytes().all(|b| b.is_ascii_digit()) {
            year = Some(token);
        } else if day.is_none() && token.len() <= 2 && token.bytes().all(|b| b.is_ascii_digit()) {
            day = Some(token);
        }
    }

    let (Some(month), Some(day), Some(clock), Some(year)) = (month, day, clock, year) else {
        return Err(ParseError::Timestamp(text.to_owned()));
    };

    let joined = format!("{month} {day} {clock} {year}");
    let mut parsed = PrimitiveDateTime::parse(&joined, CLIENT_TIMESTAMP_FORMAT)
        .map_err(|_| ParseError::Timestamp(text.to_owned()))?;

    // Meridiem stamps keep a 12-hour clock; fold it onto 24 hours.
    match afternoon {
        Some(true) if parsed.hour() < 12 => parsed += Duration::hours(12),
        Some(false) if parsed.hour() == 12 => parsed -= Duration::hours(12),
        _ => {}
    }

    Ok(parsed.assume_offset(timezone))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn parses_listing_stamp() {
        let stamp = parse_client_timestamp("Mon Jan  1 10:11:12 2024", UtcOffset::UTC).unwrap();
        assert_eq!(stamp, datetime!(2024-01-01 10:11:12 UTC));
    }

    #[test]
    fn interprets_stamp_in_share_timezone() {
        let offset = UtcOffset::from_hms(2, 0, 0).unwrap();
        let stamp = parse_client_timestamp("Mon Jan  1 10:11:12 2024", offset).unwrap();
        assert_eq!(stamp.offset(), offset);
        assert_eq!(stamp, datetime!(2024-01-01 08:11:12 UTC));
    }

    #[test]
    fn tolerates_meridiem_and_zone_abbreviation() {
        let stamp =
            parse_client_timestamp("Fri Apr  3 02:39:18 PM 2020 CEST", UtcOffset::UTC).unwrap();
        assert_eq!(stamp, datetime!(2020-04-03 14:39:18 UTC));
    }

    #[test]
    fn noon_and_midnight_meridiem_handling() {
        let noon = parse_client_timestamp("Mon Jan  1 12:00:00 PM 2024", UtcOffset::UTC).unwrap();
        assert_eq!(noon.hour(), 12);
        let midnight =
            parse_client_timestamp("Mon Jan  1 12:00:00 AM 2024", UtcOffset::UTC).unwrap();
        assert_eq!(midnight.hour(), 0);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_client_timestamp("not a timestamp", UtcOffset::UTC).is_err());
        assert!(parse_client_timestamp("", UtcOffset::UTC).is_err());
    }

    #[test]
    fn rejects_out_of_range_components() {
        assert!(parse_client_timestamp("Mon Feb 30 10:00:00 2024", UtcOffset::UTC).is_err());
    }
}
