use crate::utils::date::DB_DATE_FMT;
use crate::utils::time::DB_TIME_FMT;
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

/// Reserved values marking the row that only carries a day note.
pub const ANCHOR_DRUG_NAME: &str = "__day_note__";
pub const ANCHOR_DOSAGE: &str = "-";
pub const ANCHOR_TIME: &str = "00:00";

/// Identity of a dose: at most one stored row per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DoseKey {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub drug_name: String,
    pub dosage: String,
}

impl DoseKey {
    pub fn new(
        date: NaiveDate,
        time: NaiveTime,
        drug_name: impl Into<String>,
        dosage: impl Into<String>,
    ) -> Self {
        Self {
            date,
            time,
            drug_name: drug_name.into(),
            dosage: dosage.into(),
        }
    }

    /// Key of the day-note anchor for `date`.
    pub fn anchor(date: NaiveDate) -> Self {
        Self {
            date,
            time: NaiveTime::MIN,
            drug_name: ANCHOR_DRUG_NAME.to_string(),
            dosage: ANCHOR_DOSAGE.to_string(),
        }
    }

    pub fn is_anchor(&self) -> bool {
        is_anchor_columns(&self.time_str(), &self.drug_name, &self.dosage)
    }

    pub fn date_str(&self) -> String {
        self.date.format(DB_DATE_FMT).to_string()
    }

    pub fn time_str(&self) -> String {
        self.time.format(DB_TIME_FMT).to_string()
    }
}

impl std::fmt::Display for DoseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} ({})",
            self.date_str(),
            self.time_str(),
            self.drug_name,
            self.dosage
        )
    }
}

/// Sentinel check on raw column values.
pub fn is_anchor_columns(time: &str, drug_name: &str, dosage: &str) -> bool {
    time == ANCHOR_TIME && drug_name == ANCHOR_DRUG_NAME && dosage == ANCHOR_DOSAGE
}

/// A persisted, mutable dose instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoseRecord {
    pub id: i64,
    pub date: NaiveDate,    // ⇔ doses.date (TEXT "YYYY-MM-DD")
    pub time: NaiveTime,    // ⇔ doses.time (TEXT "HH:MM")
    pub drug_name: String,  // ⇔ doses.drug_name
    pub dosage: String,     // ⇔ doses.dosage
    pub administered: bool, // ⇔ doses.administered (INT 0/1)
    pub dose_note: Option<String>,
    pub day_note: Option<String>,
}

impl DoseRecord {
    pub fn key(&self) -> DoseKey {
        DoseKey::new(self.date, self.time, &self.drug_name, &self.dosage)
    }

    pub fn date_str(&self) -> String {
        self.date.format(DB_DATE_FMT).to_string()
    }

    pub fn time_str(&self) -> String {
        self.time.format(DB_TIME_FMT).to_string()
    }

    /// Dose note as displayed: empty string when unset.
    pub fn dose_note_str(&self) -> &str {
        self.dose_note.as_deref().unwrap_or("")
    }
}

/// Row existing only to hold the note of a day without prescribed doses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayNoteAnchor {
    pub id: i64,
    pub date: NaiveDate,
    pub day_note: Option<String>,
}

/// Any row of the `doses` table, decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredEntry {
    Dose(DoseRecord),
    DayNoteAnchor(DayNoteAnchor),
}

impl StoredEntry {
    pub fn id(&self) -> i64 {
        match self {
            StoredEntry::Dose(d) => d.id,
            StoredEntry::DayNoteAnchor(a) => a.id,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            StoredEntry::Dose(d) => d.date,
            StoredEntry::DayNoteAnchor(a) => a.date,
        }
    }

    pub fn day_note(&self) -> Option<&str> {
        match self {
            StoredEntry::Dose(d) => d.day_note.as_deref(),
            StoredEntry::DayNoteAnchor(a) => a.day_note.as_deref(),
        }
    }

    pub fn into_dose(self) -> Option<DoseRecord> {
        match self {
            StoredEntry::Dose(d) => Some(d),
            StoredEntry::DayNoteAnchor(_) => None,
        }
    }
}

/// A dose record together with the note written on the prescription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedDose {
    pub record: DoseRecord,
    pub prescription_note: Option<String>,
}
