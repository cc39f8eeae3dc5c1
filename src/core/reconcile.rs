//! Schedule reconciliation: merge the prescription into the dose store and
//! keep the per-day note identical across the rows of a date.

use crate::db::queries::{get_day_note, insert_dose, load_all_doses, update_day_note};
use crate::errors::{AppError, AppResult};
use crate::models::dose::{DoseKey, DoseRecord};
use crate::models::prescription::PrescriptionSource;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::collections::{BTreeMap, HashSet};

/// Outcome of one `seed` pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Templates read from the prescription.
    pub templates: usize,
    /// Rows created by this pass.
    pub inserted: usize,
    /// Templates already materialized before this pass.
    pub existing: usize,
    /// Newly inserted rows that received the day note already kept for their date.
    pub notes_propagated: usize,
    /// Stored doses the current prescription no longer lists. Kept as-is.
    pub stale: Vec<DoseRecord>,
}

/// Outcome of a day-note write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayNoteWrite {
    /// Existing rows that received the note.
    pub updated: usize,
    /// True when the date had no rows and an anchor was inserted.
    pub anchor_created: bool,
}

pub struct ReconcileLogic;

impl ReconcileLogic {
    /// Upsert one record per template. Rows already present keep their
    /// administered flag and notes; running this again changes nothing.
    pub fn seed(conn: &Connection, source: &PrescriptionSource) -> AppResult<SeedReport> {
        let mut report = SeedReport::default();

        // day note of each date as stored before this pass
        let mut day_notes: BTreeMap<NaiveDate, String> = BTreeMap::new();

        let tx = conn.unchecked_transaction()?;
        for template in source.templates() {
            report.templates += 1;

            if !day_notes.contains_key(&template.date) {
                let stored = get_day_note(&tx, &template.date)?;
                day_notes.insert(template.date, stored);
            }
            let note = day_notes
                .get(&template.date)
                .map(String::as_str)
                .filter(|n| !n.is_empty());

            // only the new row carries the note; stored rows are never rewritten
            match insert_dose(&tx, &template.key(), note) {
                Ok(_) => {
                    report.inserted += 1;
                    if note.is_some() {
                        report.notes_propagated += 1;
                    }
                }
                Err(AppError::DuplicateIdentity(_)) => report.existing += 1,
                Err(e) => return Err(e),
            }
        }
        tx.commit()?;

        report.stale = Self::stale_doses(conn, source)?;
        Ok(report)
    }

    /// Stored doses whose identity is absent from `source`.
    pub fn stale_doses(
        conn: &Connection,
        source: &PrescriptionSource,
    ) -> AppResult<Vec<DoseRecord>> {
        let planned: HashSet<DoseKey> = source.templates().map(|t| t.key()).collect();

        Ok(load_all_doses(conn)?
            .into_iter()
            .filter(|d| !planned.contains(&d.key()))
            .collect())
    }

    /// Apply `text` to every row of `date`. A date without rows gets an
    /// anchor row so the note is not lost.
    pub fn set_day_note(conn: &Connection, date: &NaiveDate, text: &str) -> AppResult<DayNoteWrite> {
        let tx = conn.unchecked_transaction()?;

        let updated = update_day_note(&tx, date, text)?;
        let mut anchor_created = false;

        if updated == 0 {
            match insert_dose(&tx, &DoseKey::anchor(*date), Some(text)) {
                Ok(_) => anchor_created = true,
                // someone else created it in the meantime
                Err(AppError::DuplicateIdentity(_)) => {
                    update_day_note(&tx, date, text)?;
                }
                Err(e) => return Err(e),
            }
        }

        tx.commit()?;

        Ok(DayNoteWrite {
            updated,
            anchor_created,
        })
    }
}
