mod apply;
mod catalog;
mod cli;
mod config;
mod db;
mod log;
mod monitors;
mod refresh;
mod select;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::apply::FitStyle;
use crate::log::vlog;

#[derive(Parser, Debug)]
#[command(name = "wallow", about = "wallow — lazy wallpaper rotator")]
struct Cli {
    /// Verbose diagnostics on stderr
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Wallpaper directory (overrides the config file)
    #[arg(short = 'C', long, global = true)]
    directory: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Refresh the catalog now, regardless of staleness
    Scan,
    /// Pick and apply wallpapers
    Set {
        /// Fit style passed to the desktop
        #[arg(long, value_enum, default_value_t = FitStyle::Scale)]
        mode: FitStyle,
        /// One image spanning all monitors instead of one per monitor
        #[arg(long)]
        span: bool,
    },
    /// Show catalog coverage and freshness
    Status,
}

pub fn run() -> Result<()> {
    let args = Cli::parse();

    if args.verbose {
        log::enable();
    }

    let cfg = config::load(args.directory.as_deref())?;
    vlog!("directory: {}", cfg.directory.display());

    let db_path = db::default_db_path();
    let conn = db::open(&db_path)?;
    let catalog = catalog::Catalog::new(conn);

    match args.command {
        Commands::Scan => cli::scan(&catalog, &cfg),
        Commands::Set { mode, span } => cli::set(&catalog, &cfg, mode, span),
        Commands::Status => cli::status(&catalog, &cfg),
    }
}
