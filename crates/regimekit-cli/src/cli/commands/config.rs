//! `regimekit config` – show where the config lives and what is in effect.

use anyhow::Result;
use regimekit_core::config::{self, KernelConfig};
use regimekit_core::logging;

pub fn run_config(cfg: &KernelConfig) -> Result<()> {
    println!("# config: {}", config::config_path()?.display());
    if let Ok(path) = logging::log_file_path() {
        println!("# log:    {}", path.display());
    }
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
