//! `docplace list` command implementation.

use std::path::PathBuf;

use clap::Args;
use docplace_config::{CliSettings, Config};
use docplace_menu::MenuTree;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the list command.
#[derive(Args)]
pub(crate) struct ListArgs {
    /// Documentation checkout root (overrides config).
    #[arg(short, long)]
    site_root: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover docplace.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl ListArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            site_root: self.site_root.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let content = std::fs::read_to_string(&config.site_resolved.menu)?;
        let menu = MenuTree::from_json(&content)?;

        output.highlight(&format!(
            "Documentation pages in {}:",
            config.site_resolved.menu.display()
        ));
        for (idx, leaf) in menu.leaves().enumerate() {
            output.info(&format!(
                "{}. {} (Path: {})",
                idx + 1,
                leaf.id,
                leaf.path_display()
            ));
        }
        Ok(())
    }
}
