use crate::api::models::AttendanceStatus;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rollcall")]
#[command(about = "Command line client for the attendance and training management backend")]
#[command(version)]
#[command(after_help = "Examples:
  rollcall config set --url https://api.example.test
  rollcall user me                                # Current user (cached locally)
  rollcall branch list
  rollcall session list --year 2026 --quarter 4 --account 12
  rollcall session check-in 31 --student 7 --status present
  rollcall storage get current_user

Environment Variables:
  ROLLCALL_URL            Backend base URL
  ROLLCALL_ACCESS_TOKEN   Access token sent as a bearer token
  RUST_LOG                Log filter (overridden by --verbose)")]
pub struct Cli {
    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Custom configuration directory path
    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    /// Backend base URL (overrides config)
    #[arg(long, global = true, env = "ROLLCALL_URL")]
    pub url: Option<String>,

    /// Access token for the backend
    #[arg(long, global = true, env = "ROLLCALL_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Local store file (overrides config)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Retry read-only requests on server errors and timeouts
    #[arg(long, global = true)]
    pub retry: bool,

    /// Output format: table or json
    #[arg(short, long, global = true, default_value = "table")]
    pub format: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configuration management (show, set)
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// User lookups
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Branches
    Branch {
        #[command(subcommand)]
        command: BranchCommands,
    },
    /// Class sessions and attendance
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },
    /// Student registrations
    Registration {
        #[command(subcommand)]
        command: RegistrationCommands,
    },
    /// Scores
    Score {
        #[command(subcommand)]
        command: ScoreCommands,
    },
    /// Feature flags
    Feature {
        #[command(subcommand)]
        command: FeatureCommands,
    },
    /// File uploads
    Upload {
        #[command(subcommand)]
        command: UploadCommands,
    },
    /// Local key-value store
    Storage {
        #[command(subcommand)]
        command: StorageCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Set configuration values
    Set {
        /// Backend base URL
        #[arg(long)]
        url: Option<String>,
        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
        /// Local store file
        #[arg(long)]
        storage_path: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Show the signed-in user and cache it locally
    Me {
        /// Read the locally cached user instead of calling the backend
        #[arg(long)]
        cached: bool,
    },
    /// Show a user by ID
    Get { id: u64 },
}

#[derive(Subcommand, Debug)]
pub enum BranchCommands {
    List,
    Get { id: u64 },
}

#[derive(Subcommand, Debug)]
pub enum SessionCommands {
    /// List class sessions for an account in a quarter
    List {
        #[arg(long)]
        year: i32,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
        quarter: u8,
        #[arg(long)]
        account: u64,
    },
    Get {
        id: u64,
    },
    /// List attendance for a class session
    Attendance {
        id: u64,
    },
    /// Record attendance for a student (not retried)
    CheckIn {
        /// Class session ID
        session: u64,
        #[arg(long)]
        student: u64,
        #[arg(long, value_enum, default_value = "present")]
        status: StatusArg,
        #[arg(long)]
        note: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum RegistrationCommands {
    List {
        #[arg(long)]
        account: u64,
    },
    /// Register a student for a class session (not retried)
    Create {
        #[arg(long)]
        student: u64,
        #[arg(long)]
        session: u64,
    },
}

#[derive(Subcommand, Debug)]
pub enum ScoreCommands {
    List {
        #[arg(long)]
        year: i32,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
        quarter: u8,
        #[arg(long)]
        account: u64,
    },
}

#[derive(Subcommand, Debug)]
pub enum FeatureCommands {
    List,
}

#[derive(Subcommand, Debug)]
pub enum UploadCommands {
    /// Request a pre-signed upload URL (not retried)
    Sign {
        file_name: String,
        #[arg(long, default_value = "application/octet-stream")]
        content_type: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum StorageCommands {
    /// Print a stored value as JSON (`null` when absent)
    Get { key: String },
    /// Store a value
    Set {
        key: String,
        value: String,
        /// Parse VALUE as JSON instead of storing it as a string
        #[arg(long)]
        json: bool,
    },
    /// Delete a stored value
    Remove { key: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Present,
    Absent,
    Late,
    Excused,
}

impl From<StatusArg> for AttendanceStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Present => AttendanceStatus::Present,
            StatusArg::Absent => AttendanceStatus::Absent,
            StatusArg::Late => AttendanceStatus::Late,
            StatusArg::Excused => AttendanceStatus::Excused,
        }
    }
}
