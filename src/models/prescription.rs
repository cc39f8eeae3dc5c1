//! Prescription source: the immutable, day-ordered plan of doses.
//!
//! The plan is read once from an external YAML or JSON document and handed
//! to whoever needs it by value or reference. Nothing mutates it afterwards.

use crate::errors::{AppError, AppResult};
use crate::models::dose::{ANCHOR_DRUG_NAME, DoseKey};
use crate::utils::date::parse_date;
use crate::utils::time::parse_time;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A planned administration event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoseTemplate {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub drug_name: String,
    pub dosage: String,
    pub note: Option<String>,
}

impl DoseTemplate {
    pub fn key(&self) -> DoseKey {
        DoseKey::new(self.date, self.time, &self.drug_name, &self.dosage)
    }
}

// On-disk layout of the document.
#[derive(Debug, Deserialize)]
struct PrescriptionDoc {
    #[serde(default)]
    revision: Option<String>,
    #[serde(default)]
    days: Vec<DayDoc>,
}

#[derive(Debug, Deserialize)]
struct DayDoc {
    date: String,
    #[serde(default)]
    doses: Vec<TemplateDoc>,
}

#[derive(Debug, Deserialize)]
struct TemplateDoc {
    time: String,
    drug: String,
    dosage: String,
    #[serde(default)]
    note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrescriptionSource {
    revision: Option<String>,
    days: BTreeMap<NaiveDate, Vec<DoseTemplate>>,
}

impl PrescriptionSource {
    /// Build a source from templates; per-day order is the iteration order.
    pub fn new<I>(revision: Option<String>, templates: I) -> Self
    where
        I: IntoIterator<Item = DoseTemplate>,
    {
        let mut days: BTreeMap<NaiveDate, Vec<DoseTemplate>> = BTreeMap::new();
        for t in templates {
            days.entry(t.date).or_default().push(t);
        }
        Self { revision, days }
    }

    /// Load a document, JSON when the extension says so, YAML otherwise.
    pub fn from_path<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AppError::Prescription(format!(
                "file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    pub fn from_yaml_str(s: &str) -> AppResult<Self> {
        let doc: PrescriptionDoc =
            serde_yaml::from_str(s).map_err(|e| AppError::Prescription(e.to_string()))?;
        Self::from_doc(doc)
    }

    pub fn from_json_str(s: &str) -> AppResult<Self> {
        let doc: PrescriptionDoc =
            serde_json::from_str(s).map_err(|e| AppError::Prescription(e.to_string()))?;
        Self::from_doc(doc)
    }

    fn from_doc(doc: PrescriptionDoc) -> AppResult<Self> {
        let mut templates = Vec::new();

        for day in doc.days {
            let date = parse_date(&day.date).ok_or_else(|| {
                AppError::Prescription(format!("invalid date '{}'", day.date))
            })?;

            for dose in day.doses {
                let time = parse_time(&dose.time).ok_or_else(|| {
                    AppError::Prescription(format!(
                        "invalid time '{}' on {}",
                        dose.time, day.date
                    ))
                })?;

                let drug_name = dose.drug.trim().to_string();
                if drug_name.is_empty() || drug_name == ANCHOR_DRUG_NAME {
                    return Err(AppError::Prescription(format!(
                        "invalid drug name '{}' at {} {}",
                        drug_name, day.date, dose.time
                    )));
                }

                templates.push(DoseTemplate {
                    date,
                    time,
                    drug_name,
                    dosage: dose.dosage.trim().to_string(),
                    note: dose.note.filter(|n| !n.trim().is_empty()),
                });
            }
        }

        Ok(Self::new(doc.revision, templates))
    }

    pub fn revision(&self) -> Option<&str> {
        self.revision.as_deref()
    }

    /// Templates planned for `date`, in document order.
    pub fn day(&self, date: &NaiveDate) -> &[DoseTemplate] {
        self.days.get(date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn dates(&self) -> impl Iterator<Item = &NaiveDate> {
        self.days.keys()
    }

    /// All templates, day by day.
    pub fn templates(&self) -> impl Iterator<Item = &DoseTemplate> {
        self.days.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.days.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days.keys().next_back().copied()
    }
}
