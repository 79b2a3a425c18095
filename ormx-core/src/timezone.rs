//! Timezone handling for date/time values.
//!
//! The session timezone is configured as a free-form string. A zone name known to
//! the IANA database is used as that zone. Anything else is taken as a UTC offset.

use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::Error;

/// Formats accepted for a timestamp that carries an offset suffix.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f %:z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%dT%H:%M:%S%.f %:z",
    "%Y-%m-%dT%H:%M:%S%.f %z",
];

/// Formats accepted for a naive timestamp.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A resolved session timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timezone {
    Named(Tz),
    Offset(FixedOffset),
}

impl Timezone {
    /// Resolves a configured timezone string.
    ///
    /// Fails with [`Error::Configuration`] when the string is neither a zone name
    /// nor an offset.
    pub fn resolve(timezone: &str) -> Result<Self, Error> {
        if let Some(tz) = named_zone(timezone) {
            return Ok(Timezone::Named(tz));
        }

        parse_offset(timezone)
            .map(Timezone::Offset)
            .ok_or_else(|| {
                Error::Configuration(
                    format!("{timezone:?} is neither a timezone name nor a UTC offset").into(),
                )
            })
    }

    /// Returns `instant` as wall-clock time in this zone.
    pub fn localize(&self, instant: &DateTime<Utc>) -> NaiveDateTime {
        match self {
            Timezone::Named(tz) => instant.with_timezone(tz).naive_local(),
            Timezone::Offset(offset) => instant.with_timezone(offset).naive_local(),
        }
    }

    /// Renders the current offset of this zone at `instant`, as `+HH:MM`.
    pub fn offset_at(&self, instant: &DateTime<Utc>) -> String {
        match self {
            Timezone::Named(tz) => instant.with_timezone(tz).format("%:z").to_string(),
            Timezone::Offset(offset) => instant.with_timezone(offset).format("%:z").to_string(),
        }
    }
}

impl Display for Timezone {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Timezone::Named(tz) => f.pad(tz.name()),
            Timezone::Offset(offset) => write!(f, "{offset}"),
        }
    }
}

/// Looks `name` up in the IANA zone database, ignoring case.
pub fn named_zone(name: &str) -> Option<Tz> {
    Tz::from_str_insensitive(name.trim()).ok()
}

/// Parses `Z`, `+HH:MM`, `+HHMM` or `+HH` into an offset.
pub fn parse_offset(offset: &str) -> Option<FixedOffset> {
    let offset = offset.trim();
    if offset.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match offset.as_bytes().first()? {
        b'+' => (1, &offset[1..]),
        b'-' => (-1, &offset[1..]),
        _ => return None,
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let (hours, minutes) = match digits.len() {
        1 | 2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };

    if minutes >= 60 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Parses a naive timestamp stored by the database into an instant, using the
/// configured session timezone.
///
/// A recognized zone name interprets `raw` as wall-clock time in that zone. An
/// offset accepted by [`parse_offset`] is applied to the naive time. Any other
/// string is appended to `raw` as an offset suffix before parsing.
pub fn parse_in_timezone(raw: &str, timezone: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();

    if let Some(tz) = named_zone(timezone) {
        let naive = parse_naive(raw).ok_or_else(|| format!("invalid timestamp {raw:?}"))?;
        return localize_naive(&tz, naive)
            .ok_or_else(|| format!("{raw:?} does not exist in {timezone}"));
    }

    if let (Some(offset), Some(naive)) = (parse_offset(timezone), parse_naive(raw)) {
        if let Some(dt) = offset.from_local_datetime(&naive).single() {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    let suffixed = format!("{raw} {timezone}");
    OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(&suffixed, format).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| format!("invalid timestamp {suffixed:?}"))
}

pub(crate) fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

/// Resolves wall-clock time in `tz`. Ambiguous times pick the earlier instant.
/// Times skipped by a DST transition move forward by one hour.
fn localize_naive(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(naive + Duration::hours(1)))
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
}
