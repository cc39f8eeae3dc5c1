use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::open_db;
use crate::db::migrate::{pending_migrations, run_pending_migrations};
use crate::db::pool::DbPool;
use crate::db::queries::divergent_day_notes;
use crate::db::stats;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET, YELLOW};
use crate::utils::date::to_display;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        vacuum,
        info,
    } = cmd
    {
        let db_path = cfg.database_path().to_string_lossy().to_string();
        // `--migrate` alone reports what is pending; anything else needs the schema
        let pool = if *migrate && !(*info || *check || *vacuum) {
            DbPool::new(&db_path)?
        } else {
            open_db(&db_path)?
        };

        //
        // 1) MIGRATE
        //
        if *migrate {
            let pending = pending_migrations(&pool.conn)?;
            println!("{}▶ Running {} migrations…{}", CYAN, pending.len(), RESET);
            run_pending_migrations(&pool.conn)?;
            println!("{}✔ Migration completed.{}\n", GREEN, RESET);
        }

        //
        // 2) INFO
        //
        if *info {
            stats::print_db_info(&pool, &db_path)?;
        }

        //
        // 3) CHECK
        //
        if *check {
            println!("{}▶ Running integrity check…{}", CYAN, RESET);

            let integrity: String = pool
                .conn
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

            if integrity == "ok" {
                println!("{}✔ Integrity check passed.{}", GREEN, RESET);
            } else {
                println!("{}✘ Integrity check failed:{} {}", RED, RESET, integrity);
            }

            let divergent = divergent_day_notes(&pool.conn)?;
            if divergent.is_empty() {
                println!("{}✔ Day notes are consistent.{}\n", GREEN, RESET);
            } else {
                println!(
                    "{}⚠ {} days carry different day notes:{}",
                    YELLOW,
                    divergent.len(),
                    RESET
                );
                for (date, notes) in divergent {
                    println!("  {}: {}", to_display(&date), notes.join(" | "));
                }
                println!();
            }
        }

        //
        // 4) VACUUM
        //
        if *vacuum {
            println!("{}▶ Running VACUUM…{}", CYAN, RESET);
            pool.conn.execute_batch("VACUUM;")?;
            println!("{}✔ Vacuum completed.{}\n", GREEN, RESET);
        }
    }

    Ok(())
}
