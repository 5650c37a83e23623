//! `docplace add` command implementation.

use std::path::PathBuf;

use clap::Args;
use docplace_config::{CliSettings, Config};
use docplace_core::{
    AnchorSelector, Placement, PlacementError, PlacementPaths, PlacementRequest,
};
use docplace_menu::LeafEntry;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the add command.
#[derive(Args)]
pub(crate) struct AddArgs {
    /// TOML details file describing the new page.
    details: PathBuf,

    /// Resolved video identifier (overrides the details file).
    #[arg(long)]
    video_id: Option<String>,

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

impl AddArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            site_root: self.site_root.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let mut request: PlacementRequest =
            toml::from_str(&std::fs::read_to_string(&self.details)?)?;
        if let Some(video_id) = self.video_id {
            request.video_id = video_id;
        }

        output.info(&format!("Site: {}", config.site_resolved.root.display()));
        output.info(&format!("New page: {}", request.file_name));

        let paths = PlacementPaths {
            menu: config.site_resolved.menu.clone(),
            locale: config.site_resolved.locale.clone(),
            template: config.site_resolved.template.clone(),
            views_dir: config.site_resolved.views_dir.clone(),
        };
        let mut placement = Placement::new(
            paths,
            request,
            config.catalog.locale.clone(),
            config.catalog.section.clone(),
        );

        let mut selector = ConsolePrompt { output: &output };
        let outcome = placement.run(&mut selector)?;

        for warning in &outcome.warnings {
            output.warning(&format!("Warning: {warning}"));
        }
        for path in &outcome.report.committed {
            output.info(&format!("Wrote {}", path.display()));
        }
        output.success(&format!(
            "Placed `{}` after `{}`",
            outcome.new_page.display(),
            outcome.anchor.id
        ));
        Ok(())
    }
}

/// Interactive anchor selection on the terminal.
struct ConsolePrompt<'a> {
    output: &'a Output,
}

impl AnchorSelector for ConsolePrompt<'_> {
    fn select(&mut self, leaves: &[LeafEntry]) -> Result<usize, PlacementError> {
        self.output.highlight("Available documentation pages:");
        for (idx, leaf) in leaves.iter().enumerate() {
            self.output.info(&format!(
                "{}. {} (Path: {})",
                idx + 1,
                leaf.id,
                leaf.path_display()
            ));
        }
        self.output
            .info("\nSelect the page after which the new page should be placed:");

        let line = self
            .output
            .prompt("Index: ")
            .map_err(|err| PlacementError::Selection(err.to_string()))?;
        let index: usize = line
            .trim()
            .parse()
            .map_err(|_| PlacementError::Selection(format!("`{}` is not an index", line.trim())))?;
        if index == 0 {
            return Err(PlacementError::Selection(
                "indexes start at 1".to_owned(),
            ));
        }
        Ok(index - 1)
    }
}
