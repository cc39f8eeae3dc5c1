use chrono::{Datelike, NaiveDate};

/// Storage format of the `date` column.
pub const DB_DATE_FMT: &str = "%Y-%m-%d";
/// Format used on screen and in prescription documents.
pub const DISPLAY_DATE_FMT: &str = "%d/%m/%Y";

/// Accepts `DD/MM/YYYY` and `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, DISPLAY_DATE_FMT)
        .or_else(|_| NaiveDate::parse_from_str(s, DB_DATE_FMT))
        .ok()
}

pub fn to_db(d: &NaiveDate) -> String {
    d.format(DB_DATE_FMT).to_string()
}

pub fn to_display(d: &NaiveDate) -> String {
    d.format(DISPLAY_DATE_FMT).to_string()
}

/// Parse a stored `date` column value.
pub fn from_db(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DB_DATE_FMT).ok()
}

pub fn weekday_name(d: &NaiveDate) -> &'static str {
    match d.weekday() {
        chrono::Weekday::Mon => "Monday",
        chrono::Weekday::Tue => "Tuesday",
        chrono::Weekday::Wed => "Wednesday",
        chrono::Weekday::Thu => "Thursday",
        chrono::Weekday::Fri => "Friday",
        chrono::Weekday::Sat => "Saturday",
        chrono::Weekday::Sun => "Sunday",
    }
}

/// Resolve a range expression into inclusive bounds.
///
/// - `DATE` → that single day
/// - `DATE:DATE` → both ends included
pub fn parse_range(expr: &str) -> Result<(NaiveDate, NaiveDate), String> {
    if let Some((start_raw, end_raw)) = expr.split_once(':') {
        let start =
            parse_date(start_raw).ok_or_else(|| format!("Invalid range start: {}", start_raw))?;
        let end = parse_date(end_raw).ok_or_else(|| format!("Invalid range end: {}", end_raw))?;

        if end < start {
            return Err(format!("Range end {} is before start {}", end_raw, start_raw));
        }
        return Ok((start, end));
    }

    let d = parse_date(expr).ok_or_else(|| format!("Invalid range: {}", expr))?;
    Ok((d, d))
}
