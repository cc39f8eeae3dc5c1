// src/export/logic.rs

use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries::{load_all_doses, load_doses_in_range};
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::{OutputKind, ensure_writable};
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::DoseExport;
use crate::ui::messages::warning;
use crate::utils::date::parse_range;
use chrono::NaiveDate;
use std::path::Path;

/// High-level export logic.
pub struct ExportLogic;

impl ExportLogic {
    /// Export dose records.
    ///
    /// - `range`: `None`, `"all"`, a single date or `DATE:DATE`
    ///
    /// Returns the number of exported rows.
    pub fn export(
        pool: &DbPool,
        format: ExportFormat,
        file: &str,
        range: &Option<String>,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        ensure_writable(path, force, OutputKind::DoseExport)?;

        let bounds: Option<(NaiveDate, NaiveDate)> = match range {
            None => None,
            Some(r) if r.eq_ignore_ascii_case("all") => None,
            Some(r) => Some(parse_range(r).map_err(AppError::InvalidDate)?),
        };

        let doses = match bounds {
            Some((from, to)) => load_doses_in_range(&pool.conn, &from, &to)?,
            None => load_all_doses(&pool.conn)?,
        };

        if doses.is_empty() {
            warning("No doses found for the selected range.");
        }

        let rows: Vec<DoseExport> = doses.iter().map(DoseExport::from).collect();

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
        }

        ttlog_quiet(
            &pool.conn,
            "export",
            &path.to_string_lossy(),
            &format!("{} doses exported as {}", rows.len(), format.as_str()),
        );

        Ok(rows.len())
    }
}
