use crate::cli::commands::open_tracker;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Mark { id, undo } = cmd {
        let tracker = open_tracker(cfg)?;
        let record = tracker.toggle_administered(*id, !*undo)?;

        let state = if record.administered {
            "given"
        } else {
            "not given"
        };
        success(format!("Dose #{} ({}) marked as {state}", record.id, record.key()));
    }

    Ok(())
}
