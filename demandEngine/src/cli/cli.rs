use clap::Parser;
use crate::config::constants::DEFAULT_DATABASE_PATH;

#[derive(Parser)]
#[command(author, version, about = "Zone-based gravity demand engine", long_about = None)]
pub struct Args {
    #[arg(short, long, help = "Directory with dataset overrides; missing files fall back to the embedded copies")]
    assets_dir: Option<String>,

    #[arg(short, long, help = "JSON file overriding demand model constants")]
    config: Option<String>,

    #[arg(short, long, default_value = DEFAULT_DATABASE_PATH)]
    database: String,

    #[arg(long, help = "Also write the run's tables as CSV under this directory")]
    csv_dir: Option<String>,

    #[arg(short = 'r', long, default_value_t = 10)]
    sample_routes: usize,

    #[arg(long, help = "Compute decades one after another", default_value_t = false)]
    sequential: bool,

    #[arg(long, default_value_t = false)]
    no_progress: bool,

    #[arg(long, default_value_t = false)]
    enable_timing: bool,

    #[arg(long, default_value_t = false)]
    debug_logging: bool,
}

impl Args {
    pub fn assets_dir(&self) -> Option<&str> {
        self.assets_dir.as_deref()
    }

    pub fn config(&self) -> Option<&str> {
        self.config.as_deref()
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn csv_dir(&self) -> Option<&str> {
        self.csv_dir.as_deref()
    }

    pub fn sample_routes(&self) -> usize {
        self.sample_routes
    }

    pub fn sequential(&self) -> bool {
        self.sequential
    }

    pub fn no_progress(&self) -> bool {
        self.no_progress
    }

    pub fn enable_timing(&self) -> bool {
        self.enable_timing
    }

    pub fn debug_logging(&self) -> bool {
        self.debug_logging
    }
}
