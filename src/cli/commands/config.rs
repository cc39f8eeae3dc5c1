use crate::cli::parser::Commands;
use crate::config::Config;
use crate::config::migrate::{check_file, migrate_file};
use crate::core::config::ConfigLogic;
use crate::errors::{AppError, AppResult};

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        migrate,
        edit_config,
        editor,
    } = cmd
    {
        let path = Config::config_file();

        if *print_config {
            ConfigLogic::print(cfg)?;
        }

        if *check || *migrate {
            if !path.exists() {
                return Err(AppError::Config(format!(
                    "configuration file not found: {} (run `rdoselog init`)",
                    path.display()
                )));
            }
            if *migrate {
                migrate_file(&path)?;
            } else {
                check_file(&path)?;
            }
        }

        if *edit_config {
            ConfigLogic::edit(editor)?;
        }
    }

    Ok(())
}
