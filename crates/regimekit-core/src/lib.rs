pub mod config;
pub mod logging;

pub mod batch;
pub mod cache;
pub mod classifier;
pub mod control;
pub mod orchestrator;
pub mod regime;
pub mod retry;

pub use orchestrator::{JobReport, JobRequest, JobStatus, Orchestrator};
pub use regime::Regime;
