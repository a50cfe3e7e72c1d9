use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line interface in the style of chef-solo
#[derive(Parser, Debug)]
#[command(name = "rustle-provision")]
#[command(about = "Converge a single file from node attributes or a data bag")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct ProvisionCli {
    /// Node attributes file (JSON or YAML)
    pub node_file: PathBuf,

    /// Solo configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Data bag directory, overrides the config file
    #[arg(long)]
    pub data_bag_path: Option<PathBuf>,

    /// Report what would change without writing anything
    #[arg(long)]
    pub why_run: bool,

    /// Run report format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
