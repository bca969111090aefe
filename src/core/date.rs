//! Purpose: Process-wide date parse/format contract for temporal attributes.
//! Exports: `DateCodec`, `DATE_PATTERN`.
//! Role: Every temporal field maps through `DateCodec::shared()`; no per-entity formats.
//! Invariants: Canonical form is `yyyy-MM-dd'T'HH:mm:ss.ZZZZZ` in the codec's offset.
//! Invariants: The shared codec is initialized once and read-only afterwards.
//! Invariants: `parse` fails soft (`None`) on any pattern mismatch.
//! Notes: A zero offset renders as `Z`, matching the ZZZZZ field of the pattern.

use std::sync::OnceLock;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

pub const DATE_PATTERN: &str = "yyyy-MM-dd'T'HH:mm:ss.ZZZZZ";

const CALENDAR_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const OFFSET_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[offset_hour sign:mandatory]:[offset_minute]");
const OFFSET_LEN: usize = "+00:00".len();
const MAX_FRACTION_DIGITS: usize = 9;

static SHARED: OnceLock<DateCodec> = OnceLock::new();

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DateCodec {
    pattern: &'static str,
    offset: UtcOffset,
}

impl DateCodec {
    /// The codec every model object uses. Its offset is the local one at first use.
    pub fn shared() -> &'static DateCodec {
        SHARED.get_or_init(|| DateCodec::with_offset(detect_local_offset()))
    }

    pub fn with_offset(offset: UtcOffset) -> Self {
        Self {
            pattern: DATE_PATTERN,
            offset,
        }
    }

    pub fn pattern(&self) -> &'static str {
        self.pattern
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    pub fn parse(&self, text: &str) -> Option<OffsetDateTime> {
        let (rest, offset) = split_offset(text)?;
        let (calendar, fraction) = rest.split_once('.')?;
        let nanos = fraction_nanos(fraction)?;
        let local = PrimitiveDateTime::parse(calendar, CALENDAR_FORMAT).ok()?;
        let local = local.replace_nanosecond(nanos).ok()?;
        Some(local.assume_offset(offset))
    }

    /// Renders `date` in the codec offset. A date that cannot be shifted into that offset
    /// keeps its own offset; `None` only when `time` cannot render the calendar part.
    pub fn format(&self, date: OffsetDateTime) -> Option<String> {
        let local = date.checked_to_offset(self.offset).unwrap_or_else(|| {
            tracing::warn!(
                %date,
                codec_offset = %self.offset,
                "date not representable in codec offset"
            );
            date
        });
        let mut out = match local.format(CALENDAR_FORMAT) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(%err, %date, "date outside formattable range");
                return None;
            }
        };
        out.push('.');
        out.push_str(&format_offset(local.offset()));
        Some(out)
    }
}

fn detect_local_offset() -> UtcOffset {
    match UtcOffset::current_local_offset() {
        Ok(offset) => offset,
        Err(err) => {
            tracing::warn!(%err, "local utc offset unavailable; date codec uses UTC");
            UtcOffset::UTC
        }
    }
}

fn split_offset(text: &str) -> Option<(&str, UtcOffset)> {
    if let Some(rest) = text.strip_suffix('Z') {
        return Some((rest, UtcOffset::UTC));
    }
    let split = text.len().checked_sub(OFFSET_LEN)?;
    if !text.is_char_boundary(split) {
        return None;
    }
    let (rest, offset) = text.split_at(split);
    let offset = UtcOffset::parse(offset, OFFSET_FORMAT).ok()?;
    Some((rest, offset))
}

fn fraction_nanos(fraction: &str) -> Option<u32> {
    if !fraction.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    let mut nanos = 0u32;
    for position in 0..MAX_FRACTION_DIGITS {
        let digit = fraction
            .as_bytes()
            .get(position)
            .map(|byte| u32::from(byte - b'0'))
            .unwrap_or(0);
        nanos = nanos * 10 + digit;
    }
    Some(nanos)
}

fn format_offset(offset: UtcOffset) -> String {
    if offset.is_utc() {
        return "Z".to_string();
    }
    offset.format(OFFSET_FORMAT).unwrap_or_else(|err| {
        tracing::warn!(%err, "utc offset format failed");
        "Z".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::{DATE_PATTERN, DateCodec};
    use time::{Date, Month, OffsetDateTime, UtcOffset};

    fn plus_one() -> DateCodec {
        DateCodec::with_offset(UtcOffset::from_hms(1, 0, 0).expect("offset"))
    }

    fn standup_utc() -> OffsetDateTime {
        Date::from_calendar_date(2015, Month::March, 11)
            .expect("date")
            .with_hms(8, 0, 0)
            .expect("time")
            .assume_utc()
    }

    #[test]
    fn parses_fixture_with_fraction_digits() {
        let parsed = plus_one()
            .parse("2015-03-11T09:00:00.0000+01:00")
            .expect("parse");
        assert_eq!(parsed, standup_utc());
    }

    #[test]
    fn formats_in_codec_offset() {
        assert_eq!(
            plus_one().format(standup_utc()).as_deref(),
            Some("2015-03-11T09:00:00.+01:00")
        );

        let utc = DateCodec::with_offset(UtcOffset::UTC);
        assert_eq!(
            utc.format(standup_utc()).as_deref(),
            Some("2015-03-11T08:00:00.Z")
        );

        let west = DateCodec::with_offset(UtcOffset::from_hms(-5, -30, 0).expect("offset"));
        assert_eq!(
            west.format(standup_utc()).as_deref(),
            Some("2015-03-11T02:30:00.-05:30")
        );
    }

    #[test]
    fn canonical_form_round_trips() {
        let codec = plus_one();
        let text = codec.format(standup_utc()).expect("format");
        assert_eq!(codec.parse(&text), Some(standup_utc()));

        let utc = DateCodec::with_offset(UtcOffset::UTC);
        let text = utc.format(standup_utc()).expect("format");
        assert_eq!(utc.parse(&text), Some(standup_utc()));
    }

    #[test]
    fn fraction_is_kept_to_nanoseconds() {
        let parsed = plus_one()
            .parse("2015-03-11T09:00:00.25+01:00")
            .expect("parse");
        assert_eq!(parsed.nanosecond(), 250_000_000);
    }

    #[test]
    fn rejects_pattern_mismatches() {
        let codec = plus_one();
        for input in [
            "",
            "not-a-date",
            "2015-03-11T09:00:00+01:00",
            "2015-03-11 09:00:00.+01:00",
            "2015-03-11T09:00:00.12ab+01:00",
            "2015-13-11T09:00:00.+01:00",
            "2015-03-11T09:00:00.+1:00",
            "2015-03-11T09:00:00.+01:00 ",
            "☃☃☃☃☃☃",
        ] {
            assert_eq!(codec.parse(input), None, "input {input:?}");
        }
    }

    #[test]
    fn dates_at_the_edge_of_the_range_keep_their_own_offset() {
        let utc = DateCodec::with_offset(UtcOffset::UTC);
        let last = utc.parse("9999-12-31T23:59:59.-05:00").expect("parse");

        let text = utc.format(last).expect("format");
        assert_eq!(text, "9999-12-31T23:59:59.-05:00");
        assert_eq!(utc.parse(&text), Some(last));

        let east = DateCodec::with_offset(UtcOffset::from_hms(14, 0, 0).expect("offset"));
        let text = east.format(last).expect("format");
        assert_eq!(text, "9999-12-31T23:59:59.-05:00");
    }

    #[test]
    fn shared_codec_is_a_single_instance() {
        let first = DateCodec::shared();
        let second = DateCodec::shared();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.pattern(), DATE_PATTERN);
    }
}
