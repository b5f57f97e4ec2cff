use clap::{Args, Parser, Subcommand, ValueEnum};
use medrec::codec::ImportFormat;
use medrec::model::{BloodGroup, RecordField};
use medrec::stats::TimeRange;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format for releases: "v0.3.0"
/// Format for dev builds: "v0.3.0\ndev: abc1234 2024-01-15 14:30"
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("MEDREC_GIT_HASH");
    const COMMIT_DATE: &str = env!("MEDREC_COMMIT_DATE");
    const IS_RELEASE: &str = env!("MEDREC_IS_RELEASE");

    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            format!("v{}", VERSION)
        } else {
            format!("v{}\ndev: {} {}", VERSION, GIT_HASH, COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "medrec",
    bin_name = "medrec",
    version = get_version(),
    disable_help_subcommand = true,
    after_help = "Demo accounts: admin/admin123, doctor/doctor123, nurse/nurse123"
)]
#[command(about = "Manage patient medical records from the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding records, session and medrec.toml
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Account(AccountCommands),

    #[command(flatten)]
    Record(RecordCommands),

    #[command(flatten)]
    Data(DataCommands),

    #[command(flatten)]
    Misc(MiscCommands),
}

#[derive(Subcommand, Debug)]
pub enum AccountCommands {
    /// Log in as a user
    #[command(display_order = 1)]
    Login {
        username: String,

        #[arg(short, long, env = "MEDREC_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log out the current user
    #[command(display_order = 2)]
    Logout,

    /// Show the logged-in user
    #[command(display_order = 3)]
    Whoami,

    /// Update your name, email or avatar
    #[command(display_order = 4)]
    Profile {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        avatar: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum RecordCommands {
    /// Add a patient record
    #[command(alias = "new", display_order = 10)]
    Add(AddArgs),

    /// List records as a paged table
    #[command(alias = "ls", display_order = 11)]
    List(ListArgs),

    /// Show one record in full
    #[command(alias = "view", display_order = 12)]
    Show {
        /// Index, 11-digit UID or id prefix
        selector: String,
    },

    /// Change one field of a record
    #[command(display_order = 13)]
    Edit {
        /// Index, 11-digit UID or id prefix
        selector: String,

        /// Field name, e.g. phone or bloodGroup
        field: RecordField,

        /// New value (may be empty)
        value: String,
    },

    /// Delete a record
    #[command(alias = "rm", display_order = 14)]
    Delete {
        /// Index, 11-digit UID or id prefix
        selector: String,
    },

    /// Restore the last deleted record
    #[command(display_order = 15)]
    Undo,
}

#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Export records to a JSON or CSV file
    #[command(display_order = 20)]
    Export {
        #[arg(short, long, value_enum, default_value_t = FormatArg::Json)]
        format: FormatArg,

        /// Output file (default: <export_dir>/patient_records_<date>.<ext>)
        #[arg(short, long, conflicts_with = "stdout")]
        output: Option<PathBuf>,

        /// Write to stdout instead of a file
        #[arg(long)]
        stdout: bool,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Import records from a .json or .csv file
    #[command(display_order = 21)]
    Import { path: PathBuf },

    /// Show record statistics
    #[command(display_order = 22)]
    Stats {
        /// week, month or year
        #[arg(short, long, default_value = "week")]
        range: TimeRange,
    },
}

#[derive(Subcommand, Debug)]
pub enum MiscCommands {
    /// Show resolved configuration
    #[command(display_order = 30)]
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print a commented medrec.toml
    Template,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,

    /// 11-digit patient identifier
    #[arg(long)]
    pub uid: String,

    #[arg(long, default_value = "")]
    pub phone: String,

    #[arg(long, default_value = "")]
    pub address: String,

    /// Height in cm
    #[arg(long, default_value = "")]
    pub height: String,

    /// Weight in kg
    #[arg(long, default_value = "")]
    pub weight: String,

    #[arg(long, default_value = "")]
    pub picture_url: String,

    #[arg(long, default_value = "A+")]
    pub blood_group: BloodGroup,

    #[arg(long, default_value = "")]
    pub emergency_contact: String,

    #[arg(long, default_value = "")]
    pub medical_history: String,

    #[arg(long, default_value = "")]
    pub notes: String,

    /// YYYY-MM-DD
    #[arg(long)]
    pub date_of_birth: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Match any of name, uid, phone, address, blood group, history or notes
    #[arg(short, long)]
    pub search: Option<String>,

    /// Substring filter on one field, e.g. --filter bloodGroup=O+
    #[arg(long = "filter", value_name = "FIELD=VALUE", value_parser = parse_filter)]
    pub filters: Vec<(RecordField, String)>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Sort by this field
    #[arg(long, value_name = "FIELD")]
    pub sort: Option<RecordField>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page (default from config)
    #[arg(long)]
    pub page_size: Option<usize>,
}

/// What naked `medrec` lists: the first page, unfiltered.
impl Default for ListArgs {
    fn default() -> Self {
        Self {
            filters: FilterArgs::default(),
            sort: None,
            desc: false,
            page: 1,
            page_size: None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Json,
    Csv,
}

impl From<FormatArg> for ImportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => ImportFormat::Json,
            FormatArg::Csv => ImportFormat::Csv,
        }
    }
}

fn parse_filter(raw: &str) -> Result<(RecordField, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{}'", raw))?;
    let field = field.parse::<RecordField>().map_err(|e| e.to_string())?;
    Ok((field, value.to_string()))
}
