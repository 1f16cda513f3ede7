//! Write the default configuration

use anyhow::Result;
use callout_core::CalloutConfig;
use std::path::PathBuf;
use tracing::info;

/// Execute the init command
pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let path = config_path.unwrap_or_else(CalloutConfig::default_config_path);

    if path.exists() {
        println!("Configuration already exists: {}", path.display());
        return Ok(());
    }

    CalloutConfig::default().save(&path)?;
    info!(path = %path.display(), "wrote default configuration");
    println!("Created {}", path.display());

    Ok(())
}
