use chrono::{NaiveDate, NaiveTime};
use rdoselog::db::initialize::init_db;
use rdoselog::db::pool::DbPool;
use rdoselog::db::queries::{
    count_rows_for_date, distinct_day_notes, divergent_day_notes, find_by_date, find_by_id,
    get_day_note, get_dose, insert_dose, set_administered, set_dose_note, update_day_note,
    upsert_if_absent,
};
use rdoselog::errors::AppError;
use rdoselog::models::dose::{DoseKey, StoredEntry};

fn pool() -> DbPool {
    let pool = DbPool::in_memory().expect("open in-memory db");
    init_db(&pool.conn).expect("init db");
    pool
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[test]
fn test_upsert_same_key_keeps_one_row() {
    let pool = pool();
    let key = DoseKey::new(d(2025, 7, 26), t(14, 0), "Diprona 1g", "1 tablet");

    assert!(upsert_if_absent(&pool.conn, &key).unwrap());
    assert!(!upsert_if_absent(&pool.conn, &key).unwrap());
    assert!(!upsert_if_absent(&pool.conn, &key).unwrap());

    assert_eq!(count_rows_for_date(&pool.conn, &key.date).unwrap(), 1);
}

#[test]
fn test_plain_insert_reports_duplicate_identity() {
    let pool = pool();
    let key = DoseKey::new(d(2025, 7, 26), t(7, 30), "Gaviz 20mg", "2 tablets");

    insert_dose(&pool.conn, &key, None).unwrap();
    let err = insert_dose(&pool.conn, &key, None).unwrap_err();
    assert!(matches!(err, AppError::DuplicateIdentity(_)));
}

#[test]
fn test_same_drug_with_other_dosage_is_another_dose() {
    let pool = pool();
    let date = d(2025, 7, 26);

    upsert_if_absent(&pool.conn, &DoseKey::new(date, t(7, 30), "Gaviz 20mg", "1 tablet")).unwrap();
    upsert_if_absent(&pool.conn, &DoseKey::new(date, t(7, 30), "Gaviz 20mg", "2 tablets")).unwrap();

    assert_eq!(find_by_date(&pool.conn, &date).unwrap().len(), 2);
}

#[test]
fn test_find_by_date_orders_by_time() {
    let pool = pool();
    let date = d(2025, 7, 26);

    for (h, m, drug) in [(22, 0, "Bactrim"), (7, 30, "Gaviz 20mg"), (14, 0, "Diprona 1g")] {
        upsert_if_absent(&pool.conn, &DoseKey::new(date, t(h, m), drug, "1 tablet")).unwrap();
    }
    // another day must not leak in
    upsert_if_absent(&pool.conn, &DoseKey::new(d(2025, 7, 27), t(8, 0), "Seclac", "1")).unwrap();

    let times: Vec<String> = find_by_date(&pool.conn, &date)
        .unwrap()
        .iter()
        .map(|r| r.time_str())
        .collect();
    assert_eq!(times, vec!["07:30", "14:00", "22:00"]);
}

#[test]
fn test_same_time_keeps_insertion_order() {
    let pool = pool();
    let date = d(2025, 7, 26);

    upsert_if_absent(&pool.conn, &DoseKey::new(date, t(8, 0), "Zinc", "1")).unwrap();
    upsert_if_absent(&pool.conn, &DoseKey::new(date, t(8, 0), "Acetil", "1")).unwrap();

    let drugs: Vec<String> = find_by_date(&pool.conn, &date)
        .unwrap()
        .into_iter()
        .map(|r| r.drug_name)
        .collect();
    assert_eq!(drugs, vec!["Zinc", "Acetil"]);
}

#[test]
fn test_new_dose_starts_pending_without_notes() {
    let pool = pool();
    let key = DoseKey::new(d(2025, 7, 26), t(14, 0), "Diprona 1g", "1 tablet");
    upsert_if_absent(&pool.conn, &key).unwrap();

    let r = &find_by_date(&pool.conn, &key.date).unwrap()[0];
    assert!(!r.administered);
    assert_eq!(r.dose_note, None);
    assert_eq!(r.day_note, None);
    assert_eq!(r.key(), key);
}

#[test]
fn test_toggle_round_trip_keeps_notes() {
    let pool = pool();
    let key = DoseKey::new(d(2025, 7, 26), t(14, 0), "Diprona 1g", "1 tablet");
    let id = insert_dose(&pool.conn, &key, Some("rest day")).unwrap();
    set_dose_note(&pool.conn, id, "taken with food").unwrap();

    let on = set_administered(&pool.conn, id, true).unwrap();
    assert!(on.administered);
    // idempotent
    assert!(set_administered(&pool.conn, id, true).unwrap().administered);

    let off = set_administered(&pool.conn, id, false).unwrap();
    assert!(!off.administered);
    assert_eq!(off.dose_note.as_deref(), Some("taken with food"));
    assert_eq!(off.day_note.as_deref(), Some("rest day"));
}

#[test]
fn test_dose_note_is_stored_verbatim() {
    let pool = pool();
    let key = DoseKey::new(d(2025, 7, 26), t(14, 0), "Diprona 1g", "1 tablet");
    let id = insert_dose(&pool.conn, &key, None).unwrap();

    let r = set_dose_note(&pool.conn, id, "  <b>vomited</b> 'half' ").unwrap();
    assert_eq!(r.dose_note.as_deref(), Some("  <b>vomited</b> 'half' "));

    let r = set_dose_note(&pool.conn, id, "").unwrap();
    assert_eq!(r.dose_note_str(), "");
}

#[test]
fn test_unknown_id_is_not_found() {
    let pool = pool();

    assert!(matches!(
        set_administered(&pool.conn, 42, true),
        Err(AppError::NotFound(42))
    ));
    assert!(matches!(
        set_dose_note(&pool.conn, 42, "x"),
        Err(AppError::NotFound(42))
    ));
    assert!(matches!(get_dose(&pool.conn, 42), Err(AppError::NotFound(42))));
}

#[test]
fn test_anchor_id_is_not_a_dose() {
    let pool = pool();
    let date = d(2025, 8, 5);
    let id = insert_dose(&pool.conn, &DoseKey::anchor(date), Some("x")).unwrap();

    let entry = find_by_id(&pool.conn, id).unwrap().expect("anchor row");
    assert!(matches!(entry, StoredEntry::DayNoteAnchor(_)));
    assert_eq!(entry.id(), id);
    assert_eq!(entry.date(), date);
    assert_eq!(entry.day_note(), Some("x"));
    assert!(entry.into_dose().is_none());
    assert!(matches!(
        set_administered(&pool.conn, id, true),
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(get_dose(&pool.conn, id), Err(AppError::NotFound(_))));
    assert!(find_by_date(&pool.conn, &date).unwrap().is_empty());
}

#[test]
fn test_day_note_reads_first_non_empty() {
    let pool = pool();
    let date = d(2025, 7, 26);

    assert_eq!(get_day_note(&pool.conn, &date).unwrap(), "");

    insert_dose(&pool.conn, &DoseKey::new(date, t(7, 30), "Gaviz 20mg", "2"), None).unwrap();
    insert_dose(&pool.conn, &DoseKey::new(date, t(14, 0), "Diprona 1g", "1"), Some("fever")).unwrap();

    assert_eq!(get_day_note(&pool.conn, &date).unwrap(), "fever");
}

#[test]
fn test_divergent_day_notes_are_detected() {
    let pool = pool();
    let date = d(2025, 7, 26);

    insert_dose(&pool.conn, &DoseKey::new(date, t(7, 30), "Gaviz 20mg", "2"), Some("a")).unwrap();
    insert_dose(&pool.conn, &DoseKey::new(date, t(14, 0), "Diprona 1g", "1"), Some("b")).unwrap();

    assert_eq!(distinct_day_notes(&pool.conn, &date).unwrap(), vec!["a", "b"]);
    let divergent = divergent_day_notes(&pool.conn).unwrap();
    assert_eq!(divergent.len(), 1);
    assert_eq!(divergent[0].0, date);

    assert_eq!(update_day_note(&pool.conn, &date, "c").unwrap(), 2);
    assert!(divergent_day_notes(&pool.conn).unwrap().is_empty());
}
