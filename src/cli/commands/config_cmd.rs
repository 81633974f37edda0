//! Configuration display command.

use console::style;

use crate::config::{Settings, DEFAULT_CONFIG_FILE};

/// Print the effective settings (file plus environment) as TOML.
pub fn cmd_config_show(settings: &Settings) -> anyhow::Result<()> {
    eprintln!(
        "{} Effective configuration (save as {} to persist)",
        style("→").dim(),
        DEFAULT_CONFIG_FILE
    );
    print!("{}", settings.to_toml());
    Ok(())
}
