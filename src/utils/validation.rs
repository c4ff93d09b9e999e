use crate::domain::model::ParticipantRecord;
use crate::utils::error::{MeetingError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

/// `YYYY-MM-DD HH:MM:SS`, years 1900-2099, hour with one or two digits.
static MEETING_DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<year>(?:19|20)[0-9]{2})-(?P<month>0[1-9]|1[0-2])-(?P<day>0[1-9]|[12][0-9]|3[01]) ",
        r"(?P<hour>2[0-3]|[01]?[0-9]):(?P<minute>[0-5][0-9]):(?P<second>[0-5][0-9])$"
    ))
    .expect("meeting date pattern compiles")
});

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_name(name: &str) -> Result<&str> {
    if name.trim().is_empty() {
        return Err(MeetingError::invalid_input("Name cannot be empty"));
    }
    Ok(name)
}

/// Checks the meeting date against the grammar only. Day 31 is accepted for
/// every month; see [`parse_meeting_date`] for the calendar check.
pub fn validate_meeting_date(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(MeetingError::invalid_input("Date was empty"));
    }
    if !MEETING_DATE_PATTERN.is_match(text) {
        return Err(MeetingError::invalid_input("Date was invalid"));
    }
    Ok(())
}

pub fn parse_meeting_date(text: &str) -> Result<NaiveDateTime> {
    validate_meeting_date(text)?;

    let caps = MEETING_DATE_PATTERN
        .captures(text)
        .ok_or_else(|| MeetingError::invalid_input("Date was invalid"))?;
    let field = |name: &str| caps[name].parse::<u32>();

    let (Ok(month), Ok(day), Ok(hour), Ok(minute), Ok(second)) = (
        field("month"),
        field("day"),
        field("hour"),
        field("minute"),
        field("second"),
    ) else {
        return Err(MeetingError::invalid_input("Date was invalid"));
    };
    let year: i32 = caps["year"]
        .parse()
        .map_err(|_| MeetingError::invalid_input("Date was invalid"))?;

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .ok_or_else(|| {
            MeetingError::invalid_input(format!(
                "Date was invalid: {}-{:02}-{:02} is not a calendar date",
                year, month, day
            ))
        })
}

/// `position` is 1-based, counted over non-empty source lines.
pub fn validate_participant(position: usize, record: &ParticipantRecord) -> Result<()> {
    if record.offset_spec.trim().is_empty() {
        return Err(MeetingError::invalid_input(format!(
            "Participant {} info was incorrect: expected `name offset`",
            position
        )));
    }
    validate_name(&record.name).map_err(|e| match e {
        MeetingError::InvalidInput { message } => {
            MeetingError::invalid_input(format!("Participant {}: {}", position, message))
        }
        other => other,
    })?;
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(MeetingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(MeetingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MeetingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(MeetingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
