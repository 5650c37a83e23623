//! Configuration management for docplace.
//!
//! Parses `docplace.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! Paths in the config file are relative to the documentation checkout root
//! (`site.root`), which itself is relative to the config file location (or
//! the current directory when no config file exists). CLI settings can be
//! applied during load via [`CliSettings`]; configuration is always passed
//! explicitly into component constructors, never read from global state.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docplace.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the documentation checkout root.
    pub site_root: Option<PathBuf>,
    /// Override the menu file path.
    pub menu_path: Option<PathBuf>,
    /// Override the locale file path.
    pub locale_path: Option<PathBuf>,
    /// Override the template page path.
    pub template_path: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site layout (paths are relative strings from TOML).
    site: SiteConfigRaw,
    /// Catalog addressing.
    pub catalog: CatalogConfig,

    /// Resolved site paths (set after loading).
    #[serde(skip)]
    pub site_resolved: SitePaths,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw site configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    root: Option<String>,
    menu: Option<String>,
    locale: Option<String>,
    template: Option<String>,
    views_dir: Option<String>,
}

/// Resolved site layout with absolute paths.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SitePaths {
    /// Documentation checkout root.
    pub root: PathBuf,
    /// Menu tree JSON file.
    pub menu: PathBuf,
    /// Locale YAML file.
    pub locale: PathBuf,
    /// Template page the new content is derived from.
    pub template: PathBuf,
    /// Directory holding content documents.
    pub views_dir: PathBuf,
}

/// Catalog addressing: which locale and section docplace mutates.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Locale key, e.g. `en`.
    pub locale: String,
    /// Section key under the locale, e.g. `docs`.
    pub section: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            locale: "en".to_owned(),
            section: "docs".to_owned(),
        }
    }
}

/// Default layout of a documentation checkout, relative to `site.root`.
const DEFAULT_ROOT: &str = "cld_docs";
const DEFAULT_MENU: &str = "app/menus/submenus/programmable-media-menu.json";
const DEFAULT_LOCALE: &str = "config/locales/en.yml";
const DEFAULT_VIEWS_DIR: &str = "app/views/documentation";
const DEFAULT_TEMPLATE: &str = "app/views/documentation/upload_assets_in_react_tutorial.html.md";

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise,
    /// searches for `docplace.toml` in the current directory and parents.
    /// CLI settings are applied after loading and path resolution, so CLI
    /// arguments take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `config_path` doesn't exist or
    /// parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Load and resolve configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let base = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        config.resolve_paths(&base);
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Resolve raw relative paths against a base directory.
    fn resolve_paths(&mut self, base: &Path) {
        let root = base.join(self.site.root.as_deref().unwrap_or(DEFAULT_ROOT));
        self.site_resolved = SitePaths {
            menu: root.join(self.site.menu.as_deref().unwrap_or(DEFAULT_MENU)),
            locale: root.join(self.site.locale.as_deref().unwrap_or(DEFAULT_LOCALE)),
            template: root.join(self.site.template.as_deref().unwrap_or(DEFAULT_TEMPLATE)),
            views_dir: root.join(self.site.views_dir.as_deref().unwrap_or(DEFAULT_VIEWS_DIR)),
            root,
        };
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(site_root) = &settings.site_root {
            // Re-resolve the default layout under the new root.
            self.site_resolved.root.clone_from(site_root);
            self.site_resolved.menu = site_root.join(self.site.menu.as_deref().unwrap_or(DEFAULT_MENU));
            self.site_resolved.locale =
                site_root.join(self.site.locale.as_deref().unwrap_or(DEFAULT_LOCALE));
            self.site_resolved.template =
                site_root.join(self.site.template.as_deref().unwrap_or(DEFAULT_TEMPLATE));
            self.site_resolved.views_dir =
                site_root.join(self.site.views_dir.as_deref().unwrap_or(DEFAULT_VIEWS_DIR));
        }
        if let Some(menu_path) = &settings.menu_path {
            self.site_resolved.menu.clone_from(menu_path);
        }
        if let Some(locale_path) = &settings.locale_path {
            self.site_resolved.locale.clone_from(locale_path);
        }
        if let Some(template_path) = &settings.template_path {
            self.site_resolved.template.clone_from(template_path);
        }
    }

    /// Search for a config file in the current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to the working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to a base directory.
    fn default_with_base(base: &Path) -> Self {
        let mut config = Self {
            site: SiteConfigRaw::default(),
            catalog: CatalogConfig::default(),
            site_resolved: SitePaths::default(),
            config_path: None,
        };
        config.resolve_paths(base);
        config
    }
}
