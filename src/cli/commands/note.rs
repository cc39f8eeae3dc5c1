use crate::cli::commands::{open_tracker, resolve_date};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::date::to_display;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Note { dose, day, text } = cmd {
        let tracker = open_tracker(cfg)?;
        let cleared = text.trim().is_empty();

        if let Some(id) = dose {
            let record = tracker.set_dose_note(*id, text)?;
            if cleared {
                success(format!("Note of dose #{} cleared", record.id));
            } else {
                success(format!("Note of dose #{} saved", record.id));
            }
        }

        if let Some(day) = day {
            let date = resolve_date(day)?;
            tracker.set_day_note(&date, text)?;

            // the count excludes the anchor row of a day without doses
            let doses = tracker.list_day(&date)?.len();
            let target = if doses == 0 {
                "no doses that day".to_string()
            } else {
                format!("{doses} doses")
            };
            if cleared {
                success(format!("Day note of {} cleared ({target})", to_display(&date)));
            } else {
                success(format!("Day note of {} saved ({target})", to_display(&date)));
            }
        }
    }

    Ok(())
}
