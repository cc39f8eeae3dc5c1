use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Backup {
        file,
        compress,
        force,
    } = cmd
    {
        let db_path = cfg.database_path().to_string_lossy().to_string();
        // opening would create an empty file
        if !Path::new(&db_path).exists() {
            return Err(AppError::Other(format!("Database not found: {db_path}")));
        }
        let pool = DbPool::new(&db_path)?;
        BackupLogic::backup(&pool, &db_path, file, *compress, *force)?;
    }

    Ok(())
}
