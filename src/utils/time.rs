//! Time utilities: parsing HH:MM and the clock override used by the CLI.

use crate::errors::{AppError, AppResult};
use chrono::{Local, NaiveDateTime, NaiveTime, Timelike};

/// Storage format of the `time` column.
pub const DB_TIME_FMT: &str = "%H:%M";

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), DB_TIME_FMT).ok()
}

/// Current local wall-clock time, truncated to the minute.
pub fn now() -> NaiveDateTime {
    let n = Local::now().naive_local();
    let t = NaiveTime::from_hms_opt(n.hour(), n.minute(), 0).unwrap_or(n.time());
    n.date().and_time(t)
}

/// Parse a `--now` override ("YYYY-MM-DD HH:MM" or "DD/MM/YYYY HH:MM"),
/// falling back to the real clock when absent.
pub fn resolve_now(input: Option<&str>) -> AppResult<NaiveDateTime> {
    let Some(s) = input else {
        return Ok(now());
    };

    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%d/%m/%Y %H:%M"))
        .map_err(|_| AppError::InvalidTime(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hhmm_only() {
        assert_eq!(parse_time("07:30"), NaiveTime::from_hms_opt(7, 30, 0));
        assert!(parse_time("7h30").is_none());
        assert!(parse_time("24:00").is_none());
    }

    #[test]
    fn now_override() {
        let n = resolve_now(Some("27/07/2025 12:00")).unwrap();
        assert_eq!(n.to_string(), "2025-07-27 12:00:00");
        assert!(resolve_now(Some("tomorrow")).is_err());
    }
}
