//! Clap derive structures for the `surveydesk` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// surveydesk -- terminal dashboard for a land-surveying practice
#[derive(Debug, Parser)]
#[command(
    name = "surveydesk",
    version,
    about = "Bookings, clients, reports, maps and calculations from the command line",
    long_about = "Terminal dashboard for a land-surveying business.\n\n\
        Every command renders one dashboard page from the backend REST API:\n\
        lists take the same page/pageSize/search filters as the web views.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "SURVEYDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, env = "SURVEYDESK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Access token (overrides keyring and profile)
    #[arg(long, env = "SURVEYDESK_ACCESS_TOKEN", global = true, hide_env_values = true)]
    pub access_token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SURVEYDESK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates (local development only)
    #[arg(long, short = 'k', env = "SURVEYDESK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SURVEYDESK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse survey reports
    #[command(alias = "r")]
    Reports(ReportsArgs),

    /// Manage clients
    #[command(alias = "cl")]
    Clients(ClientsArgs),

    /// Manage site-visit bookings
    #[command(alias = "b")]
    Bookings(BookingsArgs),

    /// Manage blocked dates
    #[command(alias = "avail")]
    Availability(AvailabilityArgs),

    /// Manage survey maps
    Maps(MapsArgs),

    /// Manage area calculations
    #[command(alias = "calc")]
    Calculations(CalculationsArgs),

    /// View and acknowledge notifications
    #[command(alias = "n")]
    Notifications(NotificationsArgs),

    /// View or update your profile
    Profile(ProfileArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Shared pagination and filtering arguments for all list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Rows per page (1-100; defaults to the configured page size)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Free-text search
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Extra filter as key=value (repeatable; repeated keys become a list)
    #[arg(long, short = 'f', value_name = "KEY=VALUE")]
    pub filter: Vec<String>,
}

/// Month selector shared by calendar-style commands.
#[derive(Debug, Args)]
pub struct MonthArgs {
    /// Month (1-12, defaults to the current month)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,

    /// Year (defaults to the current year)
    #[arg(long)]
    pub year: Option<i32>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  REPORTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ReportsArgs {
    #[command(subcommand)]
    pub command: ReportsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReportsCommand {
    /// List reports
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one report
    Get {
        /// Report ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CLIENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ClientsArgs {
    #[command(subcommand)]
    pub command: ClientsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClientsCommand {
    /// List clients
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one client and their reports
    Get {
        /// Client ID
        id: String,
    },

    /// Register a new client
    Create {
        /// Full name
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        company: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BOOKINGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BookingsArgs {
    #[command(subcommand)]
    pub command: BookingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum BookingsCommand {
    /// List bookings
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one booking
    Get {
        /// Booking ID
        id: String,
    },

    /// Show a month of bookings alongside blocked dates
    #[command(alias = "cal")]
    Calendar(MonthArgs),

    /// Change a booking's status
    SetStatus {
        /// Booking ID
        id: String,

        /// New status
        status: BookingStatusArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BookingStatusArg {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AVAILABILITY
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AvailabilityArgs {
    #[command(subcommand)]
    pub command: AvailabilityCommand,
}

#[derive(Debug, Subcommand)]
pub enum AvailabilityCommand {
    /// List blocked dates for a month
    #[command(alias = "ls")]
    List(MonthArgs),

    /// Block an open date, or reopen a blocked one
    Toggle {
        /// Date (YYYY-MM-DD)
        date: NaiveDate,

        /// Reason shown on the public booking form
        #[arg(long)]
        reason: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  MAPS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct MapsArgs {
    #[command(subcommand)]
    pub command: MapsCommand,
}

#[derive(Debug, Subcommand)]
pub enum MapsCommand {
    /// List maps
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one map
    Get {
        /// Map ID
        id: String,
    },

    /// Create a map from surveyed points
    Create {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: Option<String>,

        /// Client ID to link the map to
        #[arg(long)]
        client: Option<String>,

        /// Surveyed point as LAT,LNG (repeatable, in order)
        #[arg(long = "point", value_name = "LAT,LNG", required = true)]
        points: Vec<String>,
    },

    /// Delete a map
    #[command(alias = "rm")]
    Delete {
        /// Map ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CALCULATIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CalculationsArgs {
    #[command(subcommand)]
    pub command: CalculationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum CalculationsCommand {
    /// List calculations
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one calculation
    Get {
        /// Calculation ID
        id: String,
    },

    /// Save a calculation from measured sides
    Create {
        #[arg(long)]
        title: String,

        /// Client ID to link the calculation to
        #[arg(long)]
        client: Option<String>,

        /// Side length (repeatable, in order)
        #[arg(long = "side", value_name = "LENGTH", required = true)]
        sides: Vec<f64>,

        /// Unit of the side lengths (e.g. m, ft)
        #[arg(long)]
        unit: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a calculation
    #[command(alias = "rm")]
    Delete {
        /// Calculation ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  NOTIFICATIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct NotificationsArgs {
    #[command(subcommand)]
    pub command: NotificationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum NotificationsCommand {
    /// List notifications with the unread count
    #[command(alias = "ls")]
    List(ListArgs),

    /// Mark one notification as read
    Read {
        /// Notification ID
        id: String,
    },

    /// Mark every notification as read
    ReadAll,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROFILE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show the signed-in user
    Show,

    /// Update profile fields
    Update {
        /// Full name
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        /// Avatar image file
        #[arg(long)]
        avatar: Option<PathBuf>,

        /// Print the Set-Cookie header for a rotated session token
        #[arg(long)]
        emit_cookie: bool,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Config key (api_url, access_token_env, production, insecure, timeout, ca_cert)
        key: String,

        /// Value to set
        value: String,
    },

    /// Store an access token in the system keyring
    SetToken,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Print the config file path
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
