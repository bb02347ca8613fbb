use chrono::{NaiveTime, Timelike};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QuietHoursError {
    #[error("expected HH:MM, got {0:?}")]
    Format(String),

    #[error("time out of range: {0:?}")]
    OutOfRange(String),
}

pub fn parse_time_of_day(raw: &str) -> Result<u32, QuietHoursError> {
    let raw = raw.trim();
    let (hours, minutes) = raw
        .split_once(':')
        .ok_or_else(|| QuietHoursError::Format(raw.to_string()))?;

    let hours: u32 = hours
        .trim()
        .parse()
        .map_err(|_| QuietHoursError::Format(raw.to_string()))?;
    let minutes: u32 = minutes
        .trim()
        .parse()
        .map_err(|_| QuietHoursError::Format(raw.to_string()))?;

    if hours > 23 || minutes > 59 {
        return Err(QuietHoursError::OutOfRange(raw.to_string()));
    }

    Ok(hours * 60 + minutes)
}

/// True when `now` falls inside the configured window. Empty or malformed
/// bounds disable the feature rather than silencing everything.
pub fn is_quiet(start: &str, end: &str, now: NaiveTime) -> bool {
    if start.trim().is_empty() || end.trim().is_empty() {
        return false;
    }

    let (start, end) = match (parse_time_of_day(start), parse_time_of_day(end)) {
        (Ok(start), Ok(end)) => (start, end),
        _ => return false,
    };

    let now = now.hour() * 60 + now.minute();

    if start <= end {
        start <= now && now < end
    } else {
        // window wraps past midnight
        now >= start || now < end
    }
}
