//! CLI command handlers, one per file.

mod backoff;
mod classify;
mod config;
mod plan;
mod run;

pub use backoff::run_backoff;
pub use classify::run_classify;
pub use config::run_config;
pub use plan::run_plan;
pub use run::{run_job, JobArgs};
