//! Converts a meeting time given in the reference zone into each
//! participant's local wall-clock time.

use crate::utils::error::{MeetingError, Result};
use crate::utils::validation::parse_meeting_date;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Home zone of the meeting organiser.
pub const DEFAULT_REFERENCE_ZONE: &str = "GMT+2";

// GMT+5, GMT-9, GMT+05:30, GMT+0530, UTC-3
static OFFSET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:GMT|UTC)(?:(?P<sign>[+-])(?P<hours>[0-9]{1,2})(?::?(?P<minutes>[0-9]{2}))?)?$")
        .expect("offset pattern compiles")
});

/// A participant's timezone: a fixed offset from UTC or a named IANA zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Zone {
    Fixed(FixedOffset),
    Named(Tz),
}

impl Zone {
    fn parse_fixed(spec: &str) -> Option<FixedOffset> {
        let caps = OFFSET_PATTERN.captures(spec)?;
        let Some(sign) = caps.name("sign") else {
            return FixedOffset::east_opt(0);
        };

        let hours: i32 = caps["hours"].parse().ok()?;
        let minutes: i32 = match caps.name("minutes") {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        if hours > 23 || minutes > 59 {
            return None;
        }

        let seconds = (hours * 60 + minutes) * 60;
        match sign.as_str() {
            "-" => FixedOffset::east_opt(-seconds),
            _ => FixedOffset::east_opt(seconds),
        }
    }

    /// Interprets a wall-clock time in this zone as an absolute instant.
    pub fn anchor(&self, local: &NaiveDateTime) -> Result<DateTime<Utc>> {
        let anchored = match self {
            Zone::Fixed(offset) => offset
                .from_local_datetime(local)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
            Zone::Named(tz) => tz
                .from_local_datetime(local)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
        };

        anchored.ok_or_else(|| {
            MeetingError::conversion(format!(
                "{} does not exist or is ambiguous in {}",
                local.format(DATE_TIME_FORMAT),
                self
            ))
        })
    }

    pub fn local_time(&self, instant: &DateTime<Utc>) -> NaiveDateTime {
        match self {
            Zone::Fixed(offset) => instant.with_timezone(offset).naive_local(),
            Zone::Named(tz) => instant.with_timezone(tz).naive_local(),
        }
    }
}

impl FromStr for Zone {
    type Err = MeetingError;

    fn from_str(spec: &str) -> Result<Self> {
        if let Some(offset) = Self::parse_fixed(spec) {
            return Ok(Zone::Fixed(offset));
        }
        spec.parse::<Tz>()
            .map(Zone::Named)
            .map_err(|_| MeetingError::conversion(format!("Unknown timezone: {}", spec)))
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Fixed(offset) => write!(f, "GMT{}", offset),
            Zone::Named(tz) => write!(f, "{}", tz.name()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TimeConverter {
    reference: Zone,
}

impl Default for TimeConverter {
    fn default() -> Self {
        let two_hours = FixedOffset::east_opt(2 * 3600).expect("UTC+2 is a valid offset");
        Self::new(Zone::Fixed(two_hours))
    }
}

impl TimeConverter {
    pub fn new(reference: Zone) -> Self {
        Self { reference }
    }

    pub fn reference(&self) -> Zone {
        self.reference
    }

    /// Parses the meeting date and pins it to the reference zone.
    pub fn anchor(&self, meeting_date: &str) -> Result<DateTime<Utc>> {
        let local = parse_meeting_date(meeting_date)?;
        self.reference.anchor(&local)
    }

    pub fn localize(&self, instant: &DateTime<Utc>, offset_spec: &str) -> Result<String> {
        let zone: Zone = offset_spec.parse()?;
        Ok(zone.local_time(instant).format(DATE_TIME_FORMAT).to_string())
    }

    pub fn convert(&self, meeting_date: &str, offset_spec: &str) -> Result<String> {
        let instant = self.anchor(meeting_date)?;
        self.localize(&instant, offset_spec)
    }
}

/// Converts using the default UTC+2 reference zone.
pub fn convert(meeting_date: &str, offset_spec: &str) -> Result<String> {
    TimeConverter::default().convert(meeting_date, offset_spec)
}
