use std::path::PathBuf;

use clap::Parser;

/// The cli of ike-engine
#[derive(Debug, Parser)]
#[clap(author, version)]
pub struct Cli {
    /// Path to the engine's TOML configuration file
    #[clap(short, long)]
    pub config: PathBuf,
}
