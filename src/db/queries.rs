//! Dose store: keyed storage of dose rows with the identity uniqueness
//! guarantee, queryable by date.

use crate::errors::{AppError, AppResult};
use crate::models::dose::{
    ANCHOR_DOSAGE, ANCHOR_DRUG_NAME, ANCHOR_TIME, DayNoteAnchor, DoseKey, DoseRecord, StoredEntry,
    is_anchor_columns,
};
use crate::utils::date::{DB_DATE_FMT, to_db};
use crate::utils::time::DB_TIME_FMT;
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const SELECT_COLUMNS: &str =
    "SELECT id, date, time, drug_name, dosage, day_note, administered, dose_note FROM doses";

/// SQL predicate excluding the day-note anchor row.
fn not_anchor() -> String {
    format!(
        "NOT (drug_name = '{ANCHOR_DRUG_NAME}' AND dosage = '{ANCHOR_DOSAGE}' AND time = '{ANCHOR_TIME}')"
    )
}

fn conversion_error(col: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(err))
}

/// Decode any row of `doses` into a dose or an anchor.
pub fn map_row(row: &Row) -> Result<StoredEntry> {
    let date_str: String = row.get("date")?;
    let time_str: String = row.get("time")?;
    let drug_name: String = row.get("drug_name")?;
    let dosage: String = row.get("dosage")?;

    let date = NaiveDate::parse_from_str(&date_str, DB_DATE_FMT)
        .map_err(|_| conversion_error(1, AppError::InvalidDate(date_str.clone())))?;

    if is_anchor_columns(&time_str, &drug_name, &dosage) {
        return Ok(StoredEntry::DayNoteAnchor(DayNoteAnchor {
            id: row.get("id")?,
            date,
            day_note: row.get("day_note")?,
        }));
    }

    let time = NaiveTime::parse_from_str(&time_str, DB_TIME_FMT)
        .map_err(|_| conversion_error(2, AppError::InvalidTime(time_str.clone())))?;

    Ok(StoredEntry::Dose(DoseRecord {
        id: row.get("id")?,
        date,
        time,
        drug_name,
        dosage,
        administered: row.get::<_, i64>("administered")? != 0,
        dose_note: row.get("dose_note")?,
        day_note: row.get("day_note")?,
    }))
}

/// Plain insert. A uniqueness violation surfaces as `DuplicateIdentity`.
pub fn insert_dose(conn: &Connection, key: &DoseKey, day_note: Option<&str>) -> AppResult<i64> {
    let res = conn.execute(
        "INSERT INTO doses (date, time, drug_name, dosage, day_note)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            key.date_str(),
            key.time_str(),
            key.drug_name,
            key.dosage,
            day_note
        ],
    );

    match res {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(e) if AppError::is_unique_violation(&e) => {
            Err(AppError::DuplicateIdentity(key.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Insert a pending dose unless one with the same identity exists.
/// Returns `true` when a row was created; a duplicate is a routine no-op.
pub fn upsert_if_absent(conn: &Connection, key: &DoseKey) -> AppResult<bool> {
    match insert_dose(conn, key, None) {
        Ok(_) => Ok(true),
        Err(AppError::DuplicateIdentity(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Doses of `date` by ascending time, ties in insertion order.
/// The day-note anchor is never part of the result.
pub fn find_by_date(conn: &Connection, date: &NaiveDate) -> AppResult<Vec<DoseRecord>> {
    let sql = format!(
        "{SELECT_COLUMNS} WHERE date = ?1 AND {} ORDER BY time ASC, id ASC",
        not_anchor()
    );
    let mut stmt = conn.prepare_cached(&sql)?;

    let rows = stmt.query_map([to_db(date)], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        if let Some(dose) = r?.into_dose() {
            out.push(dose);
        }
    }
    Ok(out)
}

/// Doses whose date falls in `[from, to]`, by date then time.
pub fn load_doses_in_range(
    conn: &Connection,
    from: &NaiveDate,
    to: &NaiveDate,
) -> AppResult<Vec<DoseRecord>> {
    let sql = format!(
        "{SELECT_COLUMNS} WHERE date >= ?1 AND date <= ?2 AND {}
         ORDER BY date ASC, time ASC, id ASC",
        not_anchor()
    );
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt.query_map(params![to_db(from), to_db(to)], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        if let Some(dose) = r?.into_dose() {
            out.push(dose);
        }
    }
    Ok(out)
}

/// Every stored dose, anchors excluded.
pub fn load_all_doses(conn: &Connection) -> AppResult<Vec<DoseRecord>> {
    let sql = format!("{SELECT_COLUMNS} ORDER BY date ASC, time ASC, id ASC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        if let Some(dose) = r?.into_dose() {
            out.push(dose);
        }
    }
    Ok(out)
}

/// The day-note anchor of `date`, if one was ever created.
pub fn find_day_note_anchor(conn: &Connection, date: &NaiveDate) -> AppResult<Option<DayNoteAnchor>> {
    let sql = format!(
        "{SELECT_COLUMNS} WHERE date = ?1 AND drug_name = ?2 AND dosage = ?3 AND time = ?4"
    );

    let entry = conn
        .query_row(
            &sql,
            params![to_db(date), ANCHOR_DRUG_NAME, ANCHOR_DOSAGE, ANCHOR_TIME],
            map_row,
        )
        .optional()?;

    Ok(match entry {
        Some(StoredEntry::DayNoteAnchor(a)) => Some(a),
        _ => None,
    })
}

pub fn find_by_id(conn: &Connection, id: i64) -> AppResult<Option<StoredEntry>> {
    let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
    conn.query_row(&sql, [id], map_row)
        .optional()
        .map_err(Into::into)
}

/// Load a dose; anchors and unknown ids are `NotFound`.
pub fn get_dose(conn: &Connection, id: i64) -> AppResult<DoseRecord> {
    find_by_id(conn, id)?
        .and_then(StoredEntry::into_dose)
        .ok_or(AppError::NotFound(id))
}

/// Update one column of a dose row, refusing anchors.
fn update_dose_column(
    conn: &Connection,
    id: i64,
    column: &str,
    value: &dyn rusqlite::ToSql,
) -> AppResult<DoseRecord> {
    let sql = format!(
        "UPDATE doses SET {column} = ?1 WHERE id = ?2 AND {}",
        not_anchor()
    );

    let affected = conn.execute(&sql, params![value, id])?;

    if affected == 0 {
        return Err(AppError::NotFound(id));
    }
    get_dose(conn, id)
}

/// Mark a dose given or pending. Setting the same value twice is harmless.
pub fn set_administered(conn: &Connection, id: i64, value: bool) -> AppResult<DoseRecord> {
    update_dose_column(conn, id, "administered", &value)
}

/// Overwrite the free-text note of a dose.
pub fn set_dose_note(conn: &Connection, id: i64, text: &str) -> AppResult<DoseRecord> {
    update_dose_column(conn, id, "dose_note", &text)
}

/// First non-empty day note among the rows of `date`, anchor included.
/// Empty string when the day has none.
pub fn get_day_note(conn: &Connection, date: &NaiveDate) -> AppResult<String> {
    let note: Option<String> = conn
        .query_row(
            "SELECT day_note FROM doses
             WHERE date = ?1 AND day_note IS NOT NULL AND day_note <> ''
             ORDER BY id ASC
             LIMIT 1",
            [to_db(date)],
            |row| row.get(0),
        )
        .optional()?;

    Ok(note.unwrap_or_default())
}

/// Write `text` on every row of `date`; returns rows affected.
pub fn update_day_note(conn: &Connection, date: &NaiveDate, text: &str) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE doses SET day_note = ?1 WHERE date = ?2",
        params![text, to_db(date)],
    )?;
    Ok(n)
}

/// Distinct non-empty day notes stored for `date`. More than one entry
/// means the rows of that day disagree.
pub fn distinct_day_notes(conn: &Connection, date: &NaiveDate) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare_cached(
        "SELECT DISTINCT day_note FROM doses
         WHERE date = ?1 AND day_note IS NOT NULL AND day_note <> ''
         ORDER BY day_note",
    )?;
    let rows = stmt.query_map([to_db(date)], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Dates whose rows disagree on the day note, with the distinct values.
pub fn divergent_day_notes(conn: &Connection) -> AppResult<Vec<(NaiveDate, Vec<String>)>> {
    let mut out = Vec::new();
    for date in list_dates(conn)? {
        let notes = distinct_day_notes(conn, &date)?;
        if notes.len() > 1 {
            out.push((date, notes));
        }
    }
    Ok(out)
}

/// Dates having at least one row (doses or anchor), ascending.
pub fn list_dates(conn: &Connection) -> AppResult<Vec<NaiveDate>> {
    let mut stmt = conn.prepare("SELECT DISTINCT date FROM doses ORDER BY date ASC")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        let s = r?;
        let d = NaiveDate::parse_from_str(&s, DB_DATE_FMT).map_err(|_| AppError::InvalidDate(s))?;
        out.push(d);
    }
    Ok(out)
}

/// Per-date counts: (date, total doses, administered doses).
pub fn day_counts(conn: &Connection) -> AppResult<Vec<(NaiveDate, i64, i64)>> {
    let sql = format!(
        "SELECT date, COUNT(*), COALESCE(SUM(administered), 0) FROM doses
         WHERE {}
         GROUP BY date ORDER BY date ASC",
        not_anchor()
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, i64>(2)?,
        ))
    })?;

    let mut out = Vec::new();
    for r in rows {
        let (s, total, given) = r?;
        let d = NaiveDate::parse_from_str(&s, DB_DATE_FMT).map_err(|_| AppError::InvalidDate(s))?;
        out.push((d, total, given));
    }
    Ok(out)
}

/// Number of rows (anchors included) stored for `date`.
pub fn count_rows_for_date(conn: &Connection, date: &NaiveDate) -> AppResult<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM doses WHERE date = ?1",
        [to_db(date)],
        |row| row.get(0),
    )?;
    Ok(n)
}
