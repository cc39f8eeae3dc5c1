use crate::db::pool::DbPool;
use crate::db::queries::day_counts;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use crate::utils::date::to_display;
use rusqlite::OptionalExtension;
use std::fs;

/// Aggregate figures about the dose table.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DbStats {
    pub days: usize,
    pub doses: i64,
    pub administered: i64,
    pub anchors: i64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

pub fn collect(pool: &DbPool) -> AppResult<DbStats> {
    let counts = day_counts(&pool.conn)?;
    let doses: i64 = counts.iter().map(|(_, t, _)| t).sum();
    let administered: i64 = counts.iter().map(|(_, _, g)| g).sum();

    let total_rows: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM doses", [], |row| row.get(0))?;

    let first_date: Option<String> = pool
        .conn
        .query_row(
            "SELECT date FROM doses ORDER BY date ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let last_date: Option<String> = pool
        .conn
        .query_row(
            "SELECT date FROM doses ORDER BY date DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    Ok(DbStats {
        days: counts.len(),
        doses,
        administered,
        anchors: total_rows - doses,
        first_date,
        last_date,
    })
}

pub fn print_db_info(pool: &DbPool, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_kb = (file_size as f64) / 1024.0;

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.1} KB", CYAN, RESET, file_kb);

    let stats = collect(pool)?;

    //
    // 2) DOSES
    //
    println!(
        "{}• Doses:{} {}{}{} ({} given, {} pending)",
        CYAN,
        RESET,
        GREEN,
        stats.doses,
        RESET,
        stats.administered,
        stats.doses - stats.administered
    );
    println!("{}• Days with doses:{} {}", CYAN, RESET, stats.days);
    println!("{}• Day-note anchors:{} {}", CYAN, RESET, stats.anchors);

    //
    // 3) DATE RANGE
    //
    let fmt = |d: &Option<String>| {
        d.as_deref()
            .and_then(crate::utils::date::from_db)
            .map(|d| to_display(&d))
            .unwrap_or_else(|| format!("{GREY}--{RESET}"))
    };

    println!("{}• Date range:{}", CYAN, RESET);
    println!("    from: {}", fmt(&stats.first_date));
    println!("    to:   {}", fmt(&stats.last_date));

    println!();
    Ok(())
}
