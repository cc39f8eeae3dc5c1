use crate::cli::commands::{open_tracker, resolve_date};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::tracker::{DayView, DoseTracker};
use crate::db::queries::{day_counts, list_dates};
use crate::errors::AppResult;
use crate::ui::messages::{header, info, success};
use crate::utils::colors::{GREY, color_for_status, colorize, highlight_next};
use crate::utils::date::{to_display, weekday_name};
use crate::utils::table::{Column, Table};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;

const MIN_WRAP_WIDTH: usize = 10;

pub fn handle(cmd: &Commands, cfg: &Config, now: &NaiveDateTime) -> AppResult<()> {
    if let Commands::List { date, all } = cmd {
        let tracker = open_tracker(cfg)?;

        if *all {
            return print_overview(&tracker);
        }

        let selected = match date {
            Some(d) => resolve_date(d)?,
            None => now.date(),
        };

        let view = tracker.day_view(&selected, now)?;
        print_day(&view, cfg, now);
    }
    Ok(())
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    textwrap::wrap(text, width.max(MIN_WRAP_WIDTH))
        .into_iter()
        .map(|l| l.into_owned())
        .collect()
}

fn print_day(view: &DayView, cfg: &Config, now: &NaiveDateTime) {
    header(format!(
        "{} {}",
        weekday_name(&view.date),
        to_display(&view.date)
    ));

    if view.is_empty() {
        info(format!("No doses for {}", to_display(&view.date)));
    } else {
        let mut table = Table::new(vec![
            Column::new("ID", 2),
            Column::new("TIME", 7),
            Column::new("DRUG", 4),
            Column::new("DOSAGE", 6),
            Column::new("STATUS", 6),
            Column::new("NOTE", 4),
        ]);

        for entry in &view.entries {
            let r = &entry.dose.record;

            let time = if entry.is_next {
                highlight_next(&format!("▶ {}", r.time_str()))
            } else {
                format!("  {}", r.time_str())
            };
            let status = if r.administered { "✔ given" } else { "pending" };

            let mut note_lines = match r.dose_note_str() {
                "" => Vec::new(),
                note => wrap(note, cfg.note_wrap_width),
            };
            if cfg.show_prescription_notes
                && let Some(rx) = &entry.dose.prescription_note
            {
                note_lines.extend(
                    wrap(&format!("Rx: {rx}"), cfg.note_wrap_width)
                        .into_iter()
                        .map(|l| colorize(&l, GREY)),
                );
            }
            let mut notes = note_lines.into_iter();

            table.add_row(vec![
                r.id.to_string(),
                time,
                r.drug_name.clone(),
                r.dosage.clone(),
                colorize(status, color_for_status(r.administered)),
                notes.next().unwrap_or_default(),
            ]);

            // continuation lines of a wrapped note
            for line in notes {
                table.add_row(vec![
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    line,
                ]);
            }
        }

        print!("{}", table.render());

        if let Some(next) = view.entries.iter().find(|e| Some(e.dose.record.id) == view.next_id) {
            let r = &next.dose.record;
            success(format!(
                "Next dose: {} {} {}",
                r.time_str(),
                r.drug_name,
                r.dosage
            ));
        } else if view.date == now.date() && view.entries.iter().all(|e| e.dose.record.administered) {
            success("All doses of today were given");
        }
    }

    if !view.day_note.is_empty() {
        println!("\n📝 Day note:");
        for line in wrap(&view.day_note, cfg.note_wrap_width) {
            println!("   {line}");
        }
    }
}

/// One line per stored day: doses given over total, and the day note.
fn print_overview(tracker: &DoseTracker) -> AppResult<()> {
    let conn = &tracker.pool().conn;

    let dates = list_dates(conn)?;
    if dates.is_empty() {
        info("No doses recorded yet. Run `rdoselog sync` first.");
        return Ok(());
    }

    let counts: HashMap<NaiveDate, (i64, i64)> = day_counts(conn)?
        .into_iter()
        .map(|(d, total, given)| (d, (total, given)))
        .collect();

    let mut table = Table::new(vec![
        Column::new("DATE", 10),
        Column::new("DAY", 3),
        Column::new("GIVEN", 5),
        Column::new("DAY NOTE", 8),
    ]);

    for date in dates {
        let (total, given) = counts.get(&date).copied().unwrap_or((0, 0));
        let progress = colorize(
            &format!("{given}/{total}"),
            color_for_status(total > 0 && given == total),
        );

        table.add_row(vec![
            to_display(&date),
            weekday_name(&date)[..3].to_string(),
            progress,
            tracker.get_day_note(&date)?,
        ]);
    }

    print!("{}", table.render());
    Ok(())
}
