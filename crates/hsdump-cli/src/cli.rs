use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};
use clap::Parser;

/// Download one or more HSDS domains from an S3 bucket, storing them so the
/// target directory can serve as the root of a local HSDS deployment.
///
/// With `--before`, the most recent version of each file that is older than
/// or equal to the supplied RFC3339 timestamp is restored instead of the
/// latest state.
#[derive(Parser)]
#[command(name = "hsdump", version)]
pub struct Cli {
    /// S3 bucket holding the HSDS database
    pub bucket: String,

    /// Domain names to process, e.g. home/user/data.h5
    #[arg(required = true)]
    pub domains: Vec<String>,

    /// Root directory of the local HSDS filesystem
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,

    /// Restore the newest version at or before this RFC3339 timestamp
    #[arg(short, long)]
    pub before: Option<DateTime<FixedOffset>>,

    /// List all available file versions of each domain instead of
    /// replicating
    #[arg(short, long)]
    pub list: bool,
}
