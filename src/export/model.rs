// src/export/model.rs

use crate::models::dose::DoseRecord;
use crate::utils::date::to_display;
use serde::Serialize;

/// Flat export row for a dose.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct DoseExport {
    pub id: i64,
    pub date: String,
    pub time: String,
    pub drug_name: String,
    pub dosage: String,
    pub administered: bool,
    pub dose_note: String,
    pub day_note: String,
}

impl From<&DoseRecord> for DoseExport {
    fn from(d: &DoseRecord) -> Self {
        Self {
            id: d.id,
            date: to_display(&d.date),
            time: d.time_str(),
            drug_name: d.drug_name.clone(),
            dosage: d.dosage.clone(),
            administered: d.administered,
            dose_note: d.dose_note.clone().unwrap_or_default(),
            day_note: d.day_note.clone().unwrap_or_default(),
        }
    }
}
