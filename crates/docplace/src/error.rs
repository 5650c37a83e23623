//! CLI error types.

use docplace_config::ConfigError;
use docplace_core::PlacementError;
use docplace_menu::MenuError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Menu(#[from] MenuError),

    #[error("{0}")]
    Placement(#[from] PlacementError),

    #[error("invalid details file: {0}")]
    Details(#[from] toml::de::Error),
}
