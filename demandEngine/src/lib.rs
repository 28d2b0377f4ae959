// Module declarations for the zone gravity demand engine

// Pipeline orchestration
pub mod core {
    pub mod pipeline;
    pub mod decade;
    pub mod run_control;
}

// Configuration modules
pub mod config {
    pub mod constants;
    pub mod const_funcs;
    pub mod demand_config;
}

// Model definitions
pub mod models {
    pub mod time_series;
    pub mod zone;
    pub mod airport;
    pub mod demand;
}

// Static data loaders
pub mod data {
    pub mod poi;
    pub mod static_data;
    pub mod zones_loader;
    pub mod airports_loader;
    pub mod economics;
    pub mod cultural_ties;
}

// Demand model stages
pub mod demand {
    pub mod cultural;
    pub mod distance_matrix;
    pub mod network;
    pub mod gravity;
    pub mod calibration;
    pub mod assignment;
    pub mod normalization;
    pub mod classification;
}

// Run statistics
pub mod analysis {
    pub mod reporting;
}

// Relational output store
pub mod storage {
    pub mod store;
}

// Utility functions
pub mod utils {
    pub mod errors;
    pub mod logging;
    pub mod csv_export;
    pub mod spatial_index;
}

// CLI interface
pub mod cli {
    pub mod cli;
}

// Re-export commonly used items
pub use crate::core::pipeline::{PipelineOutput, PipelineRun};
pub use crate::core::run_control::RunControl;
pub use crate::config::demand_config::DemandConfig;
pub use crate::data::static_data::StaticData;
pub use crate::storage::store::DemandStore;
pub use crate::utils::errors::{DemandError, DemandResult};
