//! # Site Configuration Module
//!
//! Provides configuration management for the cookbook build. This module
//! implements the site-level configuration contract: the canonical site
//! origin, the base path used for subpath deployment, the list of enabled
//! build integrations, and the output mode. Configuration can be loaded from
//! a TOML file, overridden through environment variables, or set
//! programmatically.
//!
//! All configuration problems are fatal at load time: a malformed site URL,
//! an unknown integration name, or an unrecognised key fails the build
//! before any content is touched.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cookbookflow::core::config::ConfigBuilder;
//! use std::path::Path;
//!
//! let config = ConfigBuilder::new()
//!     .with_file(Path::new("cookbook.toml"))
//!     .with_env_prefix("COOKBOOK_")
//!     .build()
//!     .unwrap();
//!
//! let config = config.read();
//! assert_eq!(config.base.as_str(), "/lemons-family-cookbook/");
//! ```

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::core::error::{BuildError, Result};
use crate::theme::ThemePreset;

/// The site origin the cookbook is deployed under.
pub const DEFAULT_SITE: &str = "https://joelev.github.io";

/// The base path the cookbook is served from (repository-name subpath).
pub const DEFAULT_BASE: &str = "/lemons-family-cookbook/";

/// A build integration that can be enabled in the site configuration.
///
/// The set is closed: naming anything else in the configuration file fails
/// the build at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Integration {
    /// The utility-CSS styling integration. Enables stylesheet generation
    /// from the active theme's design tokens.
    Tailwind,
}

impl Integration {
    /// The configuration name of this integration.
    pub fn name(self) -> &'static str {
        match self {
            Integration::Tailwind => "tailwind",
        }
    }
}

impl FromStr for Integration {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "tailwind" => Ok(Integration::Tailwind),
            other => Err(BuildError::config(
                format!("unknown integration `{other}`; known integrations: `tailwind`"),
                None,
            )),
        }
    }
}

/// Output mode of the generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Emit fully pre-rendered pages. The only mode this tool implements.
    #[default]
    Static,
    /// A server runtime. Accepted by the parser for compatibility with the
    /// configuration surface, rejected during validation.
    Server,
}

impl FromStr for OutputMode {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "static" => Ok(OutputMode::Static),
            "server" => Ok(OutputMode::Server),
            other => Err(BuildError::config(
                format!("unknown output mode `{other}`; expected `static` or `server`"),
                None,
            )),
        }
    }
}

/// A normalised URL path prefix applied to all generated links and assets so
/// the site can be served from a subdirectory rather than the domain root.
///
/// A base path always starts and ends with `/`. [`BasePath::href`] applies
/// the prefix exactly once: a path that already carries it is returned
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BasePath(String);

impl BasePath {
    /// Parses and normalises a base path string.
    ///
    /// The path must start with `/` and contain no whitespace; a trailing
    /// `/` is appended when missing.
    pub fn new(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(BuildError::config("base path must not be empty", None));
        }
        if !raw.starts_with('/') {
            return Err(BuildError::config(
                format!("base path `{raw}` must start with `/`"),
                None,
            ));
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(BuildError::config(
                format!("base path `{raw}` must not contain whitespace"),
                None,
            ));
        }
        let mut normalised = raw.to_string();
        if !normalised.ends_with('/') {
            normalised.push('/');
        }
        Ok(Self(normalised))
    }

    /// The normalised base path, including leading and trailing slashes.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefixes a site-relative path with the base path, exactly once.
    ///
    /// `href("recipes/pie/")` yields `/lemons-family-cookbook/recipes/pie/`;
    /// passing that result back in returns it unchanged rather than
    /// double-prefixing.
    pub fn href(&self, path: &str) -> String {
        let absolute = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        if absolute == self.0 || absolute.starts_with(self.0.as_str()) {
            return absolute;
        }
        format!("{}{}", self.0, absolute.trim_start_matches('/'))
    }
}

impl fmt::Display for BasePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for BasePath {
    type Error = BuildError;

    fn try_from(value: String) -> Result<Self> {
        BasePath::new(&value)
    }
}

impl From<BasePath> for String {
    fn from(value: BasePath) -> Self {
        value.0
    }
}

/// Selects the authoritative theme token set for the build.
///
/// Exactly one preset governs a build; the alternate preset stays dormant
/// unless named here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSelection {
    /// The active theme preset.
    #[serde(default)]
    pub preset: ThemePreset,
}

/// The site-level configuration consumed once at the start of a build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Canonical origin URL of the deployed site.
    #[serde(default = "default_site")]
    pub site: Url,

    /// Path prefix for subpath deployment.
    #[serde(default = "default_base")]
    pub base: BasePath,

    /// Enabled build integrations.
    #[serde(default = "default_integrations")]
    pub integrations: Vec<Integration>,

    /// Output mode; only [`OutputMode::Static`] passes validation.
    #[serde(default)]
    pub output: OutputMode,

    /// Active theme token set.
    #[serde(default)]
    pub theme: ThemeSelection,

    /// Directory holding content collections.
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    /// Directory scanned for utility-class usage.
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Directory the generated site is written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl SiteConfig {
    /// Validates the configuration without touching the filesystem.
    pub fn validate(&self) -> Result<()> {
        validate_config(self)
    }

    /// Whether the given integration is enabled.
    pub fn has_integration(&self, integration: Integration) -> bool {
        self.integrations.contains(&integration)
    }

    /// Prefixes a site-relative path with the configured base path, exactly
    /// once. See [`BasePath::href`].
    pub fn href(&self, path: &str) -> String {
        self.base.href(path)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: default_site(),
            base: default_base(),
            integrations: default_integrations(),
            output: OutputMode::default(),
            theme: ThemeSelection::default(),
            content_dir: default_content_dir(),
            source_dir: default_source_dir(),
            output_dir: default_output_dir(),
        }
    }
}

/// Builds a [`SiteConfig`] from a TOML file, environment variables, and
/// programmatic overrides, in that order of application.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_file: Option<PathBuf>,
    env_prefix: Option<String>,
    overrides: HashMap<String, String>,
}

impl ConfigBuilder {
    /// Initialises a new `ConfigBuilder` with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a TOML configuration file to the builder.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Adds a prefix for environment variables that override configuration
    /// values (e.g. `COOKBOOK_`).
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Adds a key-value override applied after file and environment values.
    pub fn with_override<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        _ = self.overrides.insert(key.into(), value.into());
        self
    }

    /// Builds the final configuration, applying all sources and validating
    /// the result.
    pub fn build(self) -> Result<Arc<RwLock<SiteConfig>>> {
        let mut config = if let Some(path) = self.config_file {
            load_from_file(&path)?
        } else {
            SiteConfig::default()
        };

        if let Some(prefix) = self.env_prefix {
            apply_env_overrides(&mut config, &prefix)?;
        }

        apply_overrides(&mut config, &self.overrides)?;
        validate_config(&config)?;

        Ok(Arc::new(RwLock::new(config)))
    }
}

// Internal helper functions

fn load_from_file(path: &Path) -> Result<SiteConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        BuildError::config(
            format!("failed to read config file: {e}"),
            Some(path.to_path_buf()),
        )
    })?;

    toml::from_str(&content).map_err(|e| {
        BuildError::config(
            format!("failed to parse config file: {e}"),
            Some(path.to_path_buf()),
        )
    })
}

fn apply_env_overrides(config: &mut SiteConfig, prefix: &str) -> Result<()> {
    for (key, value) in env::vars() {
        if let Some(stripped) = key.strip_prefix(prefix) {
            let config_key = stripped.trim_start_matches('_').to_lowercase();
            apply_config_value(config, &config_key, &value)?;
        }
    }
    Ok(())
}

fn apply_overrides(config: &mut SiteConfig, overrides: &HashMap<String, String>) -> Result<()> {
    for (key, value) in overrides {
        apply_config_value(config, key, value)?;
    }
    Ok(())
}

fn apply_config_value(config: &mut SiteConfig, key: &str, value: &str) -> Result<()> {
    let value = value.trim_matches('"');
    match key {
        "site" => {
            config.site = Url::parse(value)
                .map_err(|e| BuildError::config(format!("invalid site URL `{value}`: {e}"), None))?;
        }
        "base" => config.base = BasePath::new(value)?,
        "output" => config.output = value.parse()?,
        "integrations" => {
            config.integrations = value
                .split(',')
                .filter(|part| !part.trim().is_empty())
                .map(str::parse)
                .collect::<Result<Vec<Integration>>>()?;
        }
        "content_dir" => config.content_dir = PathBuf::from(value),
        "source_dir" => config.source_dir = PathBuf::from(value),
        "output_dir" => config.output_dir = PathBuf::from(value),
        "theme.preset" | "theme_preset" => config.theme.preset = value.parse()?,
        _ => {
            return Err(BuildError::config(
                format!("unknown configuration key: {key}"),
                None,
            ));
        }
    }
    Ok(())
}

fn validate_config(config: &SiteConfig) -> Result<()> {
    match config.site.scheme() {
        "http" | "https" => {}
        other => {
            return Err(BuildError::config(
                format!("site URL must use http or https, got `{other}`"),
                None,
            ));
        }
    }

    if config.output != OutputMode::Static {
        return Err(BuildError::config(
            "output mode `server` is not supported; this tool only emits pre-rendered pages",
            None,
        ));
    }

    Ok(())
}

// Default value functions

fn default_site() -> Url {
    Url::parse(DEFAULT_SITE).expect("default site URL parses")
}

fn default_base() -> BasePath {
    BasePath(DEFAULT_BASE.to_string())
}

fn default_integrations() -> Vec<Integration> {
    vec![Integration::Tailwind]
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("src/content")
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("src")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}

/// Tests for the configuration module.
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.site.as_str(), "https://joelev.github.io/");
        assert_eq!(config.base.as_str(), "/lemons-family-cookbook/");
        assert_eq!(config.integrations, vec![Integration::Tailwind]);
        assert_eq!(config.output, OutputMode::Static);
        assert_eq!(config.theme.preset, ThemePreset::WarmFluid);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_path_normalisation() {
        let base = BasePath::new("/cookbook").unwrap();
        assert_eq!(base.as_str(), "/cookbook/");

        assert!(BasePath::new("cookbook/").is_err());
        assert!(BasePath::new("").is_err());
        assert!(BasePath::new("/cook book/").is_err());
    }

    #[test]
    fn test_href_prefixes_exactly_once() {
        let base = BasePath::new("/lemons-family-cookbook/").unwrap();
        let href = base.href("recipes/lemon-pie/");
        assert_eq!(href, "/lemons-family-cookbook/recipes/lemon-pie/");

        // Re-prefixing an already-prefixed path is a no-op.
        assert_eq!(base.href(&href), href);
        assert_eq!(base.href(""), "/lemons-family-cookbook/");
    }

    #[test]
    fn test_href_with_root_base() {
        let base = BasePath::new("/").unwrap();
        assert_eq!(base.href("styles/cookbook.css"), "/styles/cookbook.css");
    }

    #[test]
    fn test_href_does_not_mistake_similar_prefixes() {
        let base = BasePath::new("/cook/").unwrap();
        assert_eq!(base.href("/cookies.html"), "/cook/cookies.html");
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("cookbook.toml");
        fs::write(
            &config_file,
            r#"
site = "https://joelev.github.io"
base = "/lemons-family-cookbook/"
integrations = ["tailwind"]
output = "static"

[theme]
preset = "plain-fixed"
"#,
        )
        .unwrap();

        let config = load_from_file(&config_file).unwrap();
        assert_eq!(config.base.as_str(), "/lemons-family-cookbook/");
        assert_eq!(config.theme.preset, ThemePreset::PlainFixed);
    }

    #[test]
    fn test_malformed_site_url_fails_at_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("cookbook.toml");
        fs::write(&config_file, "site = \"not a url\"").unwrap();

        assert!(load_from_file(&config_file).is_err());
    }

    #[test]
    fn test_unknown_integration_fails_at_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("cookbook.toml");
        fs::write(&config_file, "integrations = [\"vue\"]").unwrap();

        assert!(load_from_file(&config_file).is_err());
    }

    #[test]
    fn test_unknown_key_fails_at_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("cookbook.toml");
        fs::write(&config_file, "routes = []").unwrap();

        assert!(load_from_file(&config_file).is_err());
    }

    #[test]
    fn test_server_output_rejected() {
        let config = SiteConfig {
            output: OutputMode::Server,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = SiteConfig::default();
        let mut overrides = HashMap::new();
        _ = overrides.insert("base".to_string(), "/other/".to_string());
        _ = overrides.insert("theme.preset".to_string(), "plain-fixed".to_string());

        apply_overrides(&mut config, &overrides).unwrap();
        assert_eq!(config.base.as_str(), "/other/");
        assert_eq!(config.theme.preset, ThemePreset::PlainFixed);
    }

    #[test]
    fn test_unknown_override_key_rejected() {
        let mut config = SiteConfig::default();
        assert!(apply_config_value(&mut config, "server_port", "3000").is_err());
    }

    #[test]
    fn test_env_overrides() {
        env::set_var("COOKBOOKTEST_OUTPUT_DIR", "env_dist");
        let mut config = SiteConfig::default();

        apply_env_overrides(&mut config, "COOKBOOKTEST").unwrap();
        assert_eq!(config.output_dir, PathBuf::from("env_dist"));
        env::remove_var("COOKBOOKTEST_OUTPUT_DIR");
    }

    #[test]
    fn test_builder_with_overrides() {
        let config = ConfigBuilder::new()
            .with_override("integrations", "tailwind")
            .with_override("output", "static")
            .build()
            .unwrap();

        assert!(config.read().has_integration(Integration::Tailwind));
    }
}
