mod config;
mod engine;
mod index;
mod scanner;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use config::find_and_read_config;
use env_logger::{Builder, Env};

#[derive(Parser)]
#[command(
    name = "caselink",
    version,
    about = "Creates symlinks so case-insensitively spelled #include paths resolve on case-sensitive filesystems"
)]
struct Cli {
    #[arg(long)]
    quiet: bool,

    /// Config file with the source-file extension allow-list.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory to scan and repair. Its immediate children are the search
    /// roots for angle-bracket includes.
    root: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    let env = Env::new()
        .filter_or("CASELINK_LOG", default_level)
        .write_style("CASELINK_LOG_STYLE");
    Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .init();

    let config = find_and_read_config(&cli.root, &cli.config)?;
    engine::run(&cli.root, &config)
}
