//! Console front end: CLI flags, run loop, effect execution and local storage.
mod app;
mod effects;
mod logging;
mod persistence;
mod ui;

use std::path::PathBuf;

use clap::Parser;
use explorer_engine::DEFAULT_BASE_URL;

pub use app::run_app;
use logging::LogDestination;

#[derive(Debug, Parser)]
#[command(name = "explorer", version, about = "Browse a project tree and export code")]
pub struct Args {
    /// Root URL of the explorer backend.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub server: String,
    /// Directory shown as the tree root; defaults to the working directory.
    #[arg(long)]
    pub base_dir: Option<PathBuf>,
    /// Preferences file; defaults to the user config directory.
    #[arg(long)]
    pub prefs: Option<PathBuf>,
    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,
}
