use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rdoselog::core::next_dose::{is_next_dose, next_dose};
use rdoselog::core::tracker::DoseTracker;
use rdoselog::db::queries::upsert_if_absent;
use rdoselog::errors::AppError;
use rdoselog::models::dose::DoseKey;
use rdoselog::models::prescription::PrescriptionSource;

const PRESCRIPTION: &str = r#"
revision: "test"
days:
  - date: "27/07/2025"
    doses:
      - time: "18:00"
        drug: "Diprona 1g"
        dosage: "1 tablet"
      - time: "07:30"
        drug: "Gaviz 20mg"
        dosage: "2 tablets"
        note: "Before breakfast"
      - time: "14:00"
        drug: "Diprona 1g"
        dosage: "1 tablet"
        note: "After lunch"
  - date: "28/07/2025"
    doses:
      - time: "14:00"
        drug: "Diprona 1g"
        dosage: "1 tablet"
"#;

fn tracker() -> DoseTracker {
    let source = PrescriptionSource::from_yaml_str(PRESCRIPTION).expect("parse prescription");
    let tracker = DoseTracker::in_memory(source).expect("open tracker");
    tracker.reconcile().expect("reconcile");
    tracker
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
}

#[test]
fn test_next_doses_are_pending_and_later_today() {
    let tracker = tracker();
    let today = day("2025-07-27");
    let now = at("2025-07-27 12:00");

    let records = tracker.list_day(&today).unwrap();
    tracker.toggle_administered(records[0].id, true).unwrap();
    let records = tracker.list_day(&today).unwrap();

    let flagged: Vec<String> = records
        .iter()
        .filter(|r| tracker.is_next_dose(r, &today, &now))
        .map(|r| r.time_str())
        .collect();
    assert_eq!(flagged, vec!["14:00", "18:00"]);

    assert_eq!(next_dose(&records, &today, &now).unwrap().time_str(), "14:00");
}

#[test]
fn test_other_dates_are_never_next() {
    let tracker = tracker();
    let now = at("2025-07-27 06:00");

    let tomorrow = tracker.list_day(&day("2025-07-28")).unwrap();
    assert_eq!(tomorrow.len(), 1);
    assert!(!is_next_dose(&tomorrow[0], &day("2025-07-28"), &now));
    assert!(next_dose(&tomorrow, &day("2025-07-28"), &now).is_none());

    // a later clock on the same weekday of another week changes nothing
    let later = at("2025-08-03 06:00");
    for r in tracker.list_day(&day("2025-07-27")).unwrap() {
        assert!(!is_next_dose(&r, &day("2025-07-27"), &later));
    }
}

#[test]
fn test_dose_at_current_minute_is_not_next() {
    let tracker = tracker();
    let today = day("2025-07-27");
    let now = at("2025-07-27 14:00");

    let flagged: Vec<String> = tracker
        .list_day(&today)
        .unwrap()
        .iter()
        .filter(|r| is_next_dose(r, &today, &now))
        .map(|r| r.time_str())
        .collect();
    assert_eq!(flagged, vec!["18:00"]);
}

#[test]
fn test_annotation_matches_time_and_drug_only() {
    let tracker = tracker();

    // a record whose dosage differs from the template still gets its note
    let key = DoseKey::new(
        day("2025-07-27"),
        NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
        "Gaviz 20mg",
        "1 tablet",
    );
    upsert_if_absent(&tracker.pool().conn, &key).unwrap();

    let records = tracker.list_day(&day("2025-07-27")).unwrap();
    let gaviz: Vec<_> = records
        .into_iter()
        .filter(|r| r.drug_name == "Gaviz 20mg")
        .map(|r| tracker.annotate_with_prescription_note(r))
        .collect();

    assert_eq!(gaviz.len(), 2);
    for a in &gaviz {
        assert_eq!(a.prescription_note.as_deref(), Some("Before breakfast"));
    }
}

#[test]
fn test_annotation_absent_without_note() {
    let tracker = tracker();

    let r = tracker.list_day(&day("2025-07-28")).unwrap().remove(0);
    assert_eq!(tracker.annotate_with_prescription_note(r).prescription_note, None);

    let evening = tracker
        .list_day(&day("2025-07-27"))
        .unwrap()
        .into_iter()
        .find(|r| r.time_str() == "18:00")
        .unwrap();
    assert_eq!(
        tracker.annotate_with_prescription_note(evening).prescription_note,
        None
    );
}

#[test]
fn test_day_view_combines_everything() {
    let tracker = tracker();
    let today = day("2025-07-27");
    tracker.set_day_note(&today, "mild fever").unwrap();

    let view = tracker.day_view(&today, &at("2025-07-27 08:00")).unwrap();

    assert_eq!(view.entries.len(), 3);
    assert_eq!(view.day_note, "mild fever");
    let next: Vec<bool> = view.entries.iter().map(|e| e.is_next).collect();
    assert_eq!(next, vec![false, true, true]);
    assert_eq!(view.next_id, Some(view.entries[1].dose.record.id));
    assert_eq!(
        view.entries[1].dose.prescription_note.as_deref(),
        Some("After lunch")
    );
}

#[test]
fn test_day_view_of_day_without_doses() {
    let tracker = tracker();
    let empty = day("2025-08-05");
    tracker.set_day_note(&empty, "x").unwrap();

    let view = tracker.day_view(&empty, &at("2025-08-05 09:00")).unwrap();
    assert!(view.is_empty());
    assert_eq!(view.day_note, "x");
    assert_eq!(view.next_id, None);
    assert!(tracker.day_note_anchor(&empty).unwrap().is_some());
}

#[test]
fn test_toggle_unknown_id_is_not_found() {
    let tracker = tracker();
    assert!(matches!(
        tracker.toggle_administered(999, true),
        Err(AppError::NotFound(999))
    ));
}

#[test]
fn test_mutations_return_updated_record() {
    let tracker = tracker();
    let id = tracker.list_day(&day("2025-07-27")).unwrap()[0].id;

    let r = tracker.set_dose_note(id, "vomited").unwrap();
    assert_eq!(r.dose_note.as_deref(), Some("vomited"));

    let r = tracker.toggle_administered(id, true).unwrap();
    assert!(r.administered);
    assert_eq!(r.dose_note.as_deref(), Some("vomited"));
}

#[test]
fn test_reconcile_twice_adds_nothing() {
    let tracker = tracker();
    let report = tracker.reconcile().unwrap();
    assert_eq!(report.inserted, 0);
    assert_eq!(report.existing, 4);
    assert!(tracker.divergent_day_notes().unwrap().is_empty());
}
