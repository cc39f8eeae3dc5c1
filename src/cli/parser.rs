use crate::export::ExportFormat;
use clap::{ArgGroup, Parser, Subcommand};

/// Command-line interface definition for rdoselog
/// CLI application to follow a medication schedule with SQLite
#[derive(Parser)]
#[command(
    name = "rdoselog",
    version = env!("CARGO_PKG_VERSION"),
    about = "A simple dose tracker CLI: follow a prescription day by day and mark doses as given",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the prescription document (YAML or JSON)
    #[arg(global = true, long = "prescription", value_name = "FILE")]
    pub prescription: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Pretend the current time is "YYYY-MM-DD HH:MM"
    #[arg(global = true, long = "now", hide = true)]
    pub now: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields to the configuration file")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(
            long = "check",
            help = "Check database integrity and day notes that disagree"
        )]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Materialize the prescription into dose records
    Sync,

    /// Show the doses of a day
    List {
        /// Day to show (YYYY-MM-DD or DD/MM/YYYY, default: today)
        date: Option<String>,

        #[arg(long = "all", conflicts_with = "date", help = "Overview of every stored day")]
        all: bool,
    },

    /// Mark a dose as given (or not given with --undo)
    Mark {
        /// Dose id, as shown by `list`
        id: i64,

        #[arg(long = "undo", help = "Mark the dose as not given")]
        undo: bool,
    },

    /// Write the note of a dose or of a whole day
    #[command(group(
        ArgGroup::new("target")
            .required(true)
            .args(["dose", "day"])
    ))]
    Note {
        #[arg(long = "dose", value_name = "ID", help = "Dose id")]
        dose: Option<i64>,

        #[arg(long = "day", value_name = "DATE", help = "Day (YYYY-MM-DD or DD/MM/YYYY)")]
        day: Option<String>,

        /// Note text; an empty string clears it
        text: String,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Export dose records
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter export by a day or a DATE:DATE range (\"all\" for everything)"
        )]
        range: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },
}
