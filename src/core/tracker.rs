//! `DoseTracker`: the API a presentation layer talks to.
//!
//! It owns a store connection and the prescription it was built with.
//! Every mutation returns what it changed; deciding when to re-read a day
//! is left to the caller.

use crate::core::annotate;
use crate::core::next_dose;
use crate::core::reconcile::{DayNoteWrite, ReconcileLogic, SeedReport};
use crate::db::initialize::init_db;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::AppResult;
use crate::models::dose::{AnnotatedDose, DayNoteAnchor, DoseRecord};
use crate::models::prescription::PrescriptionSource;
use crate::utils::date::to_display;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// One line of a day view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayViewEntry {
    #[serde(flatten)]
    pub dose: AnnotatedDose,
    pub is_next: bool,
}

/// Everything needed to render one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayView {
    pub date: NaiveDate,
    pub entries: Vec<DayViewEntry>,
    pub day_note: String,
    /// Id of the earliest flagged dose, if any.
    pub next_id: Option<i64>,
}

impl DayView {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct DoseTracker {
    pool: DbPool,
    source: PrescriptionSource,
}

impl DoseTracker {
    /// Wrap an open pool; the schema is brought up to date first.
    pub fn new(pool: DbPool, source: PrescriptionSource) -> AppResult<Self> {
        init_db(&pool.conn)?;
        Ok(Self { pool, source })
    }

    pub fn open(db_path: &str, source: PrescriptionSource) -> AppResult<Self> {
        Self::new(DbPool::new(db_path)?, source)
    }

    pub fn in_memory(source: PrescriptionSource) -> AppResult<Self> {
        Self::new(DbPool::in_memory()?, source)
    }

    pub fn source(&self) -> &PrescriptionSource {
        &self.source
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Materialize every template as a dose record.
    pub fn reconcile(&self) -> AppResult<SeedReport> {
        let report = ReconcileLogic::seed(&self.pool.conn, &self.source)?;

        if report.inserted > 0 {
            ttlog_quiet(
                &self.pool.conn,
                "sync",
                self.source.revision().unwrap_or(""),
                &format!(
                    "{} templates, {} new doses, {} stale",
                    report.templates,
                    report.inserted,
                    report.stale.len()
                ),
            );
        }

        Ok(report)
    }

    pub fn list_day(&self, date: &NaiveDate) -> AppResult<Vec<DoseRecord>> {
        queries::find_by_date(&self.pool.conn, date)
    }

    pub fn toggle_administered(&self, id: i64, value: bool) -> AppResult<DoseRecord> {
        queries::set_administered(&self.pool.conn, id, value)
    }

    pub fn get_day_note(&self, date: &NaiveDate) -> AppResult<String> {
        queries::get_day_note(&self.pool.conn, date)
    }

    pub fn set_day_note(&self, date: &NaiveDate, text: &str) -> AppResult<DayNoteWrite> {
        let write = ReconcileLogic::set_day_note(&self.pool.conn, date, text)?;

        if write.anchor_created {
            ttlog_quiet(
                &self.pool.conn,
                "day_note_anchor",
                &to_display(date),
                "Created anchor row for a day without doses",
            );
        }

        Ok(write)
    }

    pub fn set_dose_note(&self, id: i64, text: &str) -> AppResult<DoseRecord> {
        queries::set_dose_note(&self.pool.conn, id, text)
    }

    pub fn day_note_anchor(&self, date: &NaiveDate) -> AppResult<Option<DayNoteAnchor>> {
        queries::find_day_note_anchor(&self.pool.conn, date)
    }

    pub fn annotate_with_prescription_note(&self, record: DoseRecord) -> AnnotatedDose {
        annotate::annotate(&self.source, record)
    }

    pub fn is_next_dose(
        &self,
        record: &DoseRecord,
        selected: &NaiveDate,
        now: &NaiveDateTime,
    ) -> bool {
        next_dose::is_next_dose(record, selected, now)
    }

    /// Doses of `date` with prescription notes, next-dose flags and the
    /// day note.
    pub fn day_view(&self, date: &NaiveDate, now: &NaiveDateTime) -> AppResult<DayView> {
        let records = self.list_day(date)?;
        let next_id = next_dose::next_dose(&records, date, now).map(|r| r.id);

        let entries = records
            .into_iter()
            .map(|r| {
                let is_next = self.is_next_dose(&r, date, now);
                DayViewEntry {
                    dose: self.annotate_with_prescription_note(r),
                    is_next,
                }
            })
            .collect();

        Ok(DayView {
            date: *date,
            entries,
            day_note: self.get_day_note(date)?,
            next_id,
        })
    }

    /// Dates whose rows disagree on the day note, with the distinct values.
    pub fn divergent_day_notes(&self) -> AppResult<Vec<(NaiveDate, Vec<String>)>> {
        queries::divergent_day_notes(&self.pool.conn)
    }
}
