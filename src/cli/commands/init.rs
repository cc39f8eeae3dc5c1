use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::open_db;
use crate::db::log;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file
///  - the SQLite database with all pending migrations
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    // overrides were already made absolute by `run`
    let custom_db = cli.db.as_ref().map(|_| cfg.database.clone());
    let custom_prescription = cli.prescription.as_ref().map(|_| cfg.prescription.clone());

    let cfg = Config::init_all(custom_db, custom_prescription, cli.test)?;
    let db_path = cfg.database_path();
    let db_str = db_path.to_string_lossy();

    let pool = open_db(&db_str)?;
    success(format!("Database initialized at {db_str}"));

    if let Err(e) = log::ttlog(
        &pool.conn,
        "init",
        "Database initialized",
        &format!("Database initialized at {db_str}"),
    ) {
        warning(format!("Failed to write internal log: {e}"));
    }

    let prescription = cfg.prescription_path();
    if prescription.exists() {
        info(format!("Prescription: {}", prescription.display()));
    } else {
        info(format!(
            "No prescription yet: place it at {} and run `rdoselog sync`",
            prescription.display()
        ));
    }

    Ok(())
}
