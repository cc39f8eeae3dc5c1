pub mod backup;
pub mod config;
pub mod db;
pub mod export;
pub mod init;
pub mod list;
pub mod log;
pub mod mark;
pub mod note;
pub mod sync;

use crate::config::Config;
use crate::core::tracker::DoseTracker;
use crate::errors::{AppError, AppResult};
use crate::models::prescription::PrescriptionSource;
use crate::ui::messages::{info, warning};
use crate::utils::date::parse_date;
use chrono::NaiveDate;

/// Parse a date given on the command line.
pub(crate) fn resolve_date(s: &str) -> AppResult<NaiveDate> {
    parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string()))
}

/// The configured prescription, or an empty one when the document does not
/// exist yet and the command can work on stored doses alone.
pub(crate) fn load_prescription(cfg: &Config, required: bool) -> AppResult<PrescriptionSource> {
    let path = cfg.prescription_path();

    if !required && !path.exists() {
        warning(format!(
            "Prescription not found: {} (working on stored doses only)",
            path.display()
        ));
        return Ok(PrescriptionSource::new(None, Vec::new()));
    }

    PrescriptionSource::from_path(&path)
}

/// Open the tracker on the configured database, reconciling first when
/// `auto_sync` is on.
pub(crate) fn open_tracker(cfg: &Config) -> AppResult<DoseTracker> {
    let source = load_prescription(cfg, false)?;
    let tracker = DoseTracker::open(&cfg.database_path().to_string_lossy(), source)?;

    if cfg.auto_sync && !tracker.source().is_empty() {
        let report = tracker.reconcile()?;
        if report.inserted > 0 {
            info(format!(
                "{} new doses added from the prescription",
                report.inserted
            ));
        }
    }

    Ok(tracker)
}
