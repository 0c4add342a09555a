//! Configuration management for Stencil.
//!
//! Parses `stencil.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! ```toml
//! [site]
//! source_dir = "source"
//! output_dir = "output"
//! layout_dir = "layout"
//! content_extension = "rst"
//! output_extension = "html"
//! force_deletion = false
//! ```
//!
//! `source_dir` and `output_dir` are relative to the config file;
//! `layout_dir` is relative to `source_dir`. CLI settings can be applied
//! during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! Every string in `[site]` supports `${VAR}` and `${VAR:-default}`.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override source directory.
    pub source_dir: Option<PathBuf>,
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override force deletion flag.
    pub force_deletion: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "stencil.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site configuration (paths are relative strings from TOML).
    site: SiteConfigRaw,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
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
    source_dir: Option<String>,
    output_dir: Option<String>,
    layout_dir: Option<String>,
    content_extension: Option<String>,
    output_extension: Option<String>,
    force_deletion: Option<bool>,
}

/// Resolved site configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Directory containing source documents.
    pub source_dir: PathBuf,
    /// Directory receiving rendered pages.
    pub output_dir: PathBuf,
    /// Template directory, relative to `source_dir`.
    pub layout_dir: PathBuf,
    /// Extension of source documents, without the dot.
    pub content_extension: String,
    /// Extension of rendered pages, without the dot.
    pub output_extension: String,
    /// Wipe an existing output directory.
    pub force_deletion: bool,
}

impl SiteConfig {
    fn default_with_base(base: &Path) -> Self {
        Self {
            source_dir: base.join("source"),
            output_dir: base.join("output"),
            layout_dir: PathBuf::from("layout"),
            content_extension: "rst".to_owned(),
            output_extension: "html".to_owned(),
            force_deletion: false,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

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
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.output_dir`").
        field: String,
        /// Error message (e.g., "${`SITE_ROOT`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require an extension to be a single dot-free component.
fn require_extension(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    if value.contains(['.', '/', '\\']) {
        return Err(ConfigError::Validation(format!(
            "{field} must be a bare extension like \"html\", got \"{value}\""
        )));
    }
    Ok(())
}

/// Strip a leading dot so `.rst` and `rst` are equivalent.
fn normalize_extension(value: &str) -> String {
    value.strip_prefix('.').unwrap_or(value).to_owned()
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `stencil.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
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

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.site_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.site_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(force_deletion) = settings.force_deletion {
            self.site_resolved.force_deletion = force_deletion;
        }
    }

    /// Search for config file in current directory and parents.
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

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfigRaw::default(),
            site_resolved: SiteConfig::default_with_base(base),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let site = &self.site_resolved;

        require_extension(&site.content_extension, "site.content_extension")?;
        require_extension(&site.output_extension, "site.output_extension")?;

        require_non_empty(&site.layout_dir.to_string_lossy(), "site.layout_dir")?;
        if site.layout_dir.is_absolute() {
            return Err(ConfigError::Validation(
                "site.layout_dir must be relative to site.source_dir".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let site = &mut self.site;
        let fields = [
            (&mut site.source_dir, "site.source_dir"),
            (&mut site.output_dir, "site.output_dir"),
            (&mut site.layout_dir, "site.layout_dir"),
            (&mut site.content_extension, "site.content_extension"),
            (&mut site.output_extension, "site.output_extension"),
        ];

        for (value, field) in fields {
            if let Some(raw) = value {
                *raw = expand::expand_env(raw, field)?;
            }
        }

        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));
        let site = &self.site;

        self.site_resolved = SiteConfig {
            source_dir: resolve(site.source_dir.as_deref(), "source"),
            output_dir: resolve(site.output_dir.as_deref(), "output"),
            layout_dir: PathBuf::from(site.layout_dir.as_deref().unwrap_or("layout")),
            content_extension: normalize_extension(
                site.content_extension.as_deref().unwrap_or("rst"),
            ),
            output_extension: normalize_extension(
                site.output_extension.as_deref().unwrap_or("html"),
            ),
            force_deletion: site.force_deletion.unwrap_or(false),
        };
    }
}
