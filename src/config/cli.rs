use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// CSV with one fund per row (ticker + not_index flag)
    #[arg(long, default_value = "FundTick.csv")]
    pub input: PathBuf,

    /// Where to write the augmented fund table
    #[arg(long, default_value = "FundTickEsg.csv")]
    pub output: PathBuf,

    /// Directory for checkpoint snapshots
    #[arg(long, default_value = "backups")]
    pub backup_dir: PathBuf,

    /// Optional JSON file overriding site selectors and URL templates
    #[clap(long, env = "ESG_SITE_CONFIG", default_value = "site_config.json")]
    pub site_config: PathBuf,

    /// Only process the first N funds
    #[arg(long)]
    pub limit: Option<usize>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
