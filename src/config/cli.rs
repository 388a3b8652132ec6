use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "memory-sync")]
#[command(about = "Sync server memory from the Pterodactyl panel into WHMCS configurable options")]
pub struct CliArgs {
    /// TOML config file; the environment (and ./.env) is used when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Run the whole pass, then roll back instead of committing
    #[arg(long)]
    pub dry_run: bool,
}
