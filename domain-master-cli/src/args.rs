//! Command-line surface for `domain-master`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use domain_master_core::types::{DomainStatus, SortField};

#[derive(Parser, Debug)]
#[command(
    name = "domain-master",
    version,
    about = "Track a domain portfolio and refresh registration data over RDAP",
    long_about = None
)]
pub struct Cli {
    /// Config file (default: <config dir>/domain-master/config.toml)
    #[arg(long, global = true, env = "DOMAIN_MASTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Domain data file, overrides `storage.data_file`
    #[arg(long, global = true, env = "DOMAIN_MASTER_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List tracked domains
    List {
        /// Case-insensitive substring of the name
        #[arg(long, short)]
        search: Option<String>,
        #[arg(long)]
        status: Option<StatusArg>,
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,
    },
    /// Add one or more domains to the watchlist
    Add {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Import domains from a file (`-` for stdin), separated by newlines or commas
    Import { file: PathBuf },
    /// Show one domain with its formatted RDAP record
    Show {
        name: String,
        /// Print the stored raw WHOIS text unformatted
        #[arg(long)]
        raw: bool,
    },
    /// Edit the user-owned fields of a domain
    Edit {
        name: String,
        #[arg(long)]
        status: Option<StatusArg>,
        #[arg(long)]
        registrar: Option<String>,
        /// Registration date (YYYY-MM-DD)
        #[arg(long)]
        registered: Option<NaiveDate>,
        /// Expiration date (YYYY-MM-DD)
        #[arg(long)]
        expires: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
        /// Clear both dates
        #[arg(long, conflicts_with_all = ["registered", "expires"])]
        clear_dates: bool,
    },
    /// Remove a domain
    Remove { name: String },
    /// Refresh registration data over RDAP (all domains when no name is given)
    Refresh { names: Vec<String> },
    /// Portfolio statistics
    Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Owned,
    Backorder,
    Watchlist,
    Expired,
}

impl From<StatusArg> for DomainStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Owned => Self::Owned,
            StatusArg::Backorder => Self::Backorder,
            StatusArg::Watchlist => Self::Watchlist,
            StatusArg::Expired => Self::Expired,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Name,
    Status,
    Registrar,
    Registered,
    Expires,
}

impl From<SortArg> for SortField {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Name => Self::Name,
            SortArg::Status => Self::Status,
            SortArg::Registrar => Self::Registrar,
            SortArg::Registered => Self::RegistrationDate,
            SortArg::Expires => Self::ExpirationDate,
        }
    }
}
