use crate::cli::commands::load_prescription;
use crate::config::Config;
use crate::core::reconcile::SeedReport;
use crate::core::tracker::DoseTracker;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::date::to_display;

/// Handle the `sync` command: materialize every template of the
/// prescription and report what changed.
pub fn handle(cfg: &Config) -> AppResult<()> {
    let source = load_prescription(cfg, true)?;
    let tracker = DoseTracker::open(&cfg.database_path().to_string_lossy(), source)?;

    let report = tracker.reconcile()?;
    print_report(&tracker, &report);

    Ok(())
}

fn print_report(tracker: &DoseTracker, report: &SeedReport) {
    let source = tracker.source();

    if let Some(rev) = source.revision() {
        info(format!("Prescription revision: {rev}"));
    }
    if let (Some(first), Some(last)) = (source.first_date(), source.last_date()) {
        info(format!("Covers {} to {}", to_display(&first), to_display(&last)));
    }

    success(format!(
        "{} templates: {} new doses, {} already recorded",
        report.templates, report.inserted, report.existing
    ));

    if report.notes_propagated > 0 {
        info(format!(
            "Day notes copied onto {} new doses",
            report.notes_propagated
        ));
    }

    if !report.stale.is_empty() {
        warning(format!(
            "{} stored doses are no longer in the prescription (kept):",
            report.stale.len()
        ));
        for r in &report.stale {
            println!("   #{} {}", r.id, r.key());
        }
    }
}
