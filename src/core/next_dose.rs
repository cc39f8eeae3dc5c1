//! Which doses of the selected day are still ahead of the clock.

use crate::models::dose::DoseRecord;
use chrono::{NaiveDate, NaiveDateTime};

/// True when `record` is pending, later than `now` and `selected` is today.
///
/// Each record is judged on its own, so several can qualify at once.
pub fn is_next_dose(record: &DoseRecord, selected: &NaiveDate, now: &NaiveDateTime) -> bool {
    *selected == now.date() && !record.administered && record.time > now.time()
}

/// The single earliest qualifying dose; the first in list order wins a tie.
pub fn next_dose<'a>(
    records: &'a [DoseRecord],
    selected: &NaiveDate,
    now: &NaiveDateTime,
) -> Option<&'a DoseRecord> {
    records
        .iter()
        .filter(|r| is_next_dose(r, selected, now))
        .fold(None, |best: Option<&DoseRecord>, r| match best {
            Some(b) if b.time <= r.time => Some(b),
            _ => Some(r),
        })
}
