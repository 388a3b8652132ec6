pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::{MySqlBillingStore, PterodactylClient};
pub use config::SyncConfig;
pub use crate::core::job::{run_job, JobFailure, JobStage};
pub use crate::core::reconciler::Reconciler;
pub use domain::option_label::format_memory_option;
pub use utils::error::{Result, SyncError};
