//! CLI for the RegimeKit orchestration kernel.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use regimekit_core::config;

use commands::{run_backoff, run_classify, run_config, run_job, run_plan, JobArgs};

/// Top-level CLI for RegimeKit.
#[derive(Debug, Parser)]
#[command(name = "regimekit")]
#[command(about = "RegimeKit: regime-driven batch planning, harmonic retry and caching", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Classify a task into a regime and print the classification as JSON.
    Classify {
        /// Task name, e.g. validate_critical_path.
        task: String,
        /// Extra keyword hint (repeatable).
        #[arg(long = "keyword", value_name = "K")]
        keywords: Vec<String>,
        /// Free-text description.
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Compute a batch plan for a number of items.
    Plan {
        total_items: usize,
        /// Lower batch size bound (default from config).
        #[arg(long, value_name = "N")]
        min_batch: Option<usize>,
        /// Upper batch size bound (default from config).
        #[arg(long, value_name = "N")]
        max_batch: Option<usize>,
    },

    /// Print the backoff sequence for a retry policy.
    Backoff {
        #[arg(long, value_name = "N")]
        attempts: Option<u32>,
        #[arg(long, value_name = "N")]
        start_multiple: Option<u32>,
        #[arg(long, value_name = "F")]
        growth_factor: Option<f64>,
        #[arg(long, value_name = "N")]
        max_multiple: Option<u32>,
    },

    /// Run a simulated job and print its report. Ctrl-C cancels.
    Run {
        task: String,
        /// Number of work items.
        #[arg(long, value_name = "N")]
        items: usize,
        #[arg(long = "keyword", value_name = "K")]
        keywords: Vec<String>,
        #[arg(long, default_value = "")]
        description: String,
        /// Each batch fails its first N attempts.
        #[arg(long, default_value = "0", value_name = "N")]
        fail_first: u32,
    },

    /// Show the config file path and the effective configuration.
    Config,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Classify {
                task,
                keywords,
                description,
            } => run_classify(&cfg, &task, &keywords, &description)?,
            CliCommand::Plan {
                total_items,
                min_batch,
                max_batch,
            } => run_plan(&cfg, total_items, min_batch, max_batch)?,
            CliCommand::Backoff {
                attempts,
                start_multiple,
                growth_factor,
                max_multiple,
            } => run_backoff(&cfg, attempts, start_multiple, growth_factor, max_multiple)?,
            CliCommand::Run {
                task,
                items,
                keywords,
                description,
                fail_first,
            } => {
                let args = JobArgs {
                    task,
                    items,
                    keywords,
                    description,
                    fail_first,
                };
                run_job(&cfg, args).await?;
            }
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
