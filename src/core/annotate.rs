//! Re-derive the prescription note of a stored dose from the prescription.

use crate::models::dose::{AnnotatedDose, DoseRecord};
use crate::models::prescription::PrescriptionSource;

/// Note of the first template of the record's day with the same time and
/// drug. Dosage is not compared.
pub fn prescription_note<'a>(source: &'a PrescriptionSource, record: &DoseRecord) -> Option<&'a str> {
    source
        .day(&record.date)
        .iter()
        .find(|t| t.time == record.time && t.drug_name == record.drug_name)
        .and_then(|t| t.note.as_deref())
}

pub fn annotate(source: &PrescriptionSource, record: DoseRecord) -> AnnotatedDose {
    let prescription_note = prescription_note(source, &record).map(str::to_string);
    AnnotatedDose {
        record,
        prescription_note,
    }
}
