use clap::{Parser, Subcommand};

/// Command-line interface definition for rSessionBook
/// CLI backend to manage session bookings with SQLite
#[derive(Parser)]
#[command(
    name = "rsessionbook",
    version = env!("CARGO_PKG_VERSION"),
    about = "A simple session booking CLI: recurring patterns, one-time sessions, and occurrence resolution over SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or repair)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Run configuration file migrations if needed")]
        migrate: bool,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage recurrence patterns
    Pattern {
        #[command(subcommand)]
        command: PatternCommands,
    },

    /// Add a one-time session
    Add {
        /// Session title
        title: String,

        /// Start datetime (YYYY-MM-DD HH:MM)
        start: String,

        /// Duration in minutes (default from config)
        #[arg(long = "duration", help = "Duration in minutes")]
        duration: Option<i32>,

        #[arg(long = "desc", help = "Session description")]
        description: Option<String>,
    },

    /// List occurrence rows in a datetime range
    List {
        /// Range start (YYYY-MM-DD HH:MM, inclusive)
        #[arg(long = "from")]
        from: String,

        /// Range end (YYYY-MM-DD HH:MM, exclusive)
        #[arg(long = "to")]
        to: String,

        #[arg(
            long = "status",
            help = "Filter by status: scheduled, cancelled, completed"
        )]
        status: Option<String>,
    },

    /// Resolve the bookable calendar feed for a datetime range
    Resolve {
        /// Range start (YYYY-MM-DD HH:MM, inclusive)
        #[arg(long = "from")]
        from: String,

        /// Range end (YYYY-MM-DD HH:MM, exclusive)
        #[arg(long = "to")]
        to: String,

        #[arg(
            long = "mode",
            help = "Resolver mode: virtual or materialized (default from config)"
        )]
        mode: Option<String>,
    },

    /// Edit a single occurrence by id
    Edit {
        id: i32,

        #[arg(long = "title", help = "New title")]
        title: Option<String>,

        #[arg(long = "desc", help = "New description")]
        description: Option<String>,

        #[arg(long = "start", help = "New start datetime (YYYY-MM-DD HH:MM)")]
        start: Option<String>,

        #[arg(long = "duration", help = "New duration in minutes")]
        duration: Option<i32>,
    },

    /// Cancel an occurrence by id
    Cancel { id: i32 },

    /// Mark an occurrence as completed
    Complete { id: i32 },

    /// Generate occurrences for all active patterns (periodic entry point)
    Generate {
        #[arg(long = "days", help = "Horizon in days ahead")]
        days: Option<u64>,

        #[arg(
            long = "months",
            conflicts_with = "days",
            help = "Horizon in months ahead (30-day months)"
        )]
        months: Option<u64>,
    },

    /// Export occurrence rows to a file
    Export {
        #[arg(long = "out", help = "Output file path")]
        out: String,

        #[arg(long = "format", help = "Export format: json or csv (default: json)")]
        format: Option<String>,

        /// Range start (YYYY-MM-DD HH:MM, inclusive)
        #[arg(long = "from")]
        from: String,

        /// Range end (YYYY-MM-DD HH:MM, exclusive)
        #[arg(long = "to")]
        to: String,
    },
}

#[derive(Subcommand)]
pub enum PatternCommands {
    /// Create a weekly recurrence pattern
    Add {
        /// Pattern title
        title: String,

        #[arg(
            long = "weekday",
            help = "Day of week: 0-6 (Monday=0) or a name like 'mon'"
        )]
        weekday: String,

        #[arg(long = "time", help = "Time of day (HH:MM)")]
        time: String,

        #[arg(long = "start", help = "First date the pattern is active (YYYY-MM-DD)")]
        start: String,

        #[arg(long = "duration", help = "Duration in minutes (default from config)")]
        duration: Option<i32>,

        #[arg(long = "desc", help = "Pattern description")]
        description: Option<String>,

        #[arg(long = "end", help = "Last date the pattern is active (YYYY-MM-DD)")]
        end: Option<String>,

        #[arg(long = "generate", help = "Materialize occurrences immediately")]
        generate: bool,

        #[arg(long = "days", requires = "generate", help = "Generation horizon in days")]
        days: Option<u64>,

        #[arg(
            long = "months",
            requires = "generate",
            conflicts_with = "days",
            help = "Generation horizon in months (30-day months)"
        )]
        months: Option<u64>,
    },

    /// List patterns
    List {
        #[arg(long = "all", help = "Include deactivated patterns")]
        all: bool,
    },

    /// Show one pattern
    Show { id: i32 },

    /// Update a pattern template
    Update {
        id: i32,

        #[arg(long = "title", help = "New title")]
        title: Option<String>,

        #[arg(long = "desc", help = "New description")]
        description: Option<String>,

        #[arg(long = "time", help = "New time of day (HH:MM)")]
        time: Option<String>,

        #[arg(long = "duration", help = "New duration in minutes")]
        duration: Option<i32>,

        #[arg(long = "end", help = "New end date (YYYY-MM-DD)")]
        end: Option<String>,

        #[arg(
            long = "no-propagate",
            help = "Do not rewrite future non-exception occurrences"
        )]
        no_propagate: bool,
    },

    /// Delete a pattern (cascade) or deactivate it
    Del {
        id: i32,

        #[arg(
            long = "keep-occurrences",
            help = "Deactivate only, keeping the pattern and its occurrences"
        )]
        keep_occurrences: bool,
    },

    /// Cancel one occurrence of a pattern by date
    CancelDate {
        id: i32,

        /// Occurrence date (YYYY-MM-DD)
        date: String,
    },

    /// Move one occurrence of a pattern to a new datetime
    MoveDate {
        id: i32,

        /// Occurrence date (YYYY-MM-DD)
        date: String,

        /// New datetime (YYYY-MM-DD HH:MM)
        datetime: String,
    },
}
