//! Site configuration module.
//!
//! Two sources feed the running site:
//!
//! - **`config.toml`** holds everything that is safe to commit: server
//!   binding, content API region, retry budget, design tokens. Stock defaults
//!   are overridden key-by-key by the user's file, unknown keys are rejected.
//! - **Environment variables** hold secrets and per-deploy values. A `.env`
//!   file in the working directory is loaded first if present.
//!
//! ## Config File
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! environment = "production"   # "development" reveals error details
//!
//! [site]
//! name = "Rose Ridge"
//! home_slug = "home"
//!
//! [server]
//! interface = "127.0.0.1"
//! port = 3000
//! # max_threads = 4
//!
//! [content]
//! region = "eu"                # eu | us | ap | ca | cn
//! preview = false              # always request draft content
//! timeout_secs = 10
//!
//! [retry]
//! max_attempts = 3
//! base_delay_ms = 200
//! max_delay_ms = 2000
//!
//! [colors.light]
//! background = "#fbf8f4"
//! ...
//!
//! [brands.classic]
//! accent = "#9c4f5a"
//! ...
//! ```
//!
//! ## Environment
//!
//! | Variable | Used by |
//! |----------|---------|
//! | `STORYBLOK_ACCESS_TOKEN` | content client (required to render pages) |
//! | `STORYBLOK_REGION` | overrides `content.region` |
//! | `STORYBLOK_WEBHOOK_SECRET` | `/api/revalidate` |
//! | `BUILD_HOOK_URL` | `/api/revalidate` |
//! | `STORYBLOK_SPACE_ID` | `publish` command |
//! | `STORYBLOK_MANAGEMENT_TOKEN` | `publish` command |
//!
//! Secrets are checked at first use, and a missing one names the variable.

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("missing required environment variable {0}")]
    MissingEnv(&'static str),
}

/// Deployment environment. Anything but production shows error details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Development,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Development => "development",
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub environment: Environment,
    pub site: SiteInfo,
    pub server: ServerConfig,
    pub content: ContentConfig,
    pub retry: RetryConfig,
    /// Design tokens for the light and dark themes.
    pub colors: ColorConfig,
    /// Accent palettes for the two brand variants.
    pub brands: BrandConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Validation(
                "retry.max_attempts must be at least 1".into(),
            ));
        }
        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            return Err(ConfigError::Validation(
                "retry.base_delay_ms must not exceed retry.max_delay_ms".into(),
            ));
        }
        if region_host(&self.content.region).is_none() {
            return Err(ConfigError::Validation(format!(
                "content.region must be one of eu, us, ap, ca, cn (got {:?})",
                self.content.region
            )));
        }
        if self.site.home_slug.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.home_slug must not be empty".into(),
            ));
        }
        if self.content.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "content.timeout_secs must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Apply environment overrides that belong to the committed config.
    ///
    /// Only `STORYBLOK_REGION` lives here; secrets stay in [`Secrets`].
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(region) = lookup("STORYBLOK_REGION").filter(|r| !r.trim().is_empty()) {
            self.content.region = region.trim().to_ascii_lowercase();
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    /// Venue name, used in `<title>` and the footer fallback.
    pub name: String,
    /// Story slug served at `/`.
    pub home_slug: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "Rose Ridge".to_string(),
            home_slug: "home".to_string(),
        }
    }
}

/// HTTP server binding and request pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub interface: IpAddr,
    pub port: u16,
    /// Request handler threads. When absent, defaults to the number of CPU
    /// cores. Values larger than the core count are clamped down.
    pub max_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            max_threads: None,
        }
    }
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ServerConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_threads
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Content API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    /// Storyblok region of the space.
    pub region: String,
    /// Request draft content for every page, not only visual-editor loads.
    pub preview: bool,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            region: "eu".to_string(),
            preview: false,
            timeout_secs: 10,
        }
    }
}

impl ContentConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Content API base URL for a region code.
pub fn region_host(region: &str) -> Option<&'static str> {
    match region {
        "eu" => Some("https://api.storyblok.com"),
        "us" => Some("https://api-us.storyblok.com"),
        "ap" => Some("https://api-ap.storyblok.com"),
        "ca" => Some("https://api-ca.storyblok.com"),
        "cn" => Some("https://app.storyblokchina.cn"),
        _ => None,
    }
}

/// Retry budget for the content fetch helper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 200,
            max_delay_ms: 2000,
        }
    }
}

/// Color configuration for light and dark themes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    /// Card and raised-surface color.
    pub surface: String,
    pub text: String,
    /// Muted/secondary text (leads, captions, footer).
    pub text_muted: String,
    pub border: String,
    pub tint_blush: String,
    pub tint_sage: String,
    pub tint_sand: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#fbf8f4".to_string(),
            surface: "#ffffff".to_string(),
            text: "#2b2522".to_string(),
            text_muted: "#6f6460".to_string(),
            border: "#e6ddd5".to_string(),
            tint_blush: "#f6e9e6".to_string(),
            tint_sage: "#e8eee6".to_string(),
            tint_sand: "#f3ece1".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#171413".to_string(),
            surface: "#221d1b".to_string(),
            text: "#f1ebe6".to_string(),
            text_muted: "#b3a8a1".to_string(),
            border: "#3a3230".to_string(),
            tint_blush: "#2f2224".to_string(),
            tint_sage: "#222a23".to_string(),
            tint_sand: "#2c261f".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

/// Accent palettes keyed by brand variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrandConfig {
    pub classic: BrandPalette,
    pub garden: BrandPalette,
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            classic: BrandPalette {
                accent: "#9c4f5a".to_string(),
                accent_contrast: "#ffffff".to_string(),
                script_font: "\"Pinyon Script\", cursive".to_string(),
            },
            garden: BrandPalette {
                accent: "#5d7a5a".to_string(),
                accent_contrast: "#ffffff".to_string(),
                script_font: "\"Great Vibes\", cursive".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BrandPalette {
    pub accent: String,
    /// Text color on top of `accent`.
    pub accent_contrast: String,
    /// Font stack for the script accent line above section titles.
    pub script_font: String,
}

// =============================================================================
// Secrets
// =============================================================================

/// Per-deploy values read from the environment.
///
/// Every field is optional at load time. Accessors fail with
/// [`ConfigError::MissingEnv`] naming the variable, so the error surfaces at
/// first use rather than preventing unrelated commands from running.
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    pub access_token: Option<String>,
    pub webhook_secret: Option<String>,
    pub build_hook_url: Option<String>,
    pub space_id: Option<String>,
    pub management_token: Option<String>,
}

impl Secrets {
    /// Read secrets from the process environment (after loading `.env`).
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read secrets through an arbitrary lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            access_token: get("STORYBLOK_ACCESS_TOKEN"),
            webhook_secret: get("STORYBLOK_WEBHOOK_SECRET"),
            build_hook_url: get("BUILD_HOOK_URL"),
            space_id: get("STORYBLOK_SPACE_ID"),
            management_token: get("STORYBLOK_MANAGEMENT_TOKEN"),
        }
    }

    pub fn access_token(&self) -> Result<&str, ConfigError> {
        require(&self.access_token, "STORYBLOK_ACCESS_TOKEN")
    }

    pub fn webhook_secret(&self) -> Result<&str, ConfigError> {
        require(&self.webhook_secret, "STORYBLOK_WEBHOOK_SECRET")
    }

    pub fn build_hook_url(&self) -> Result<&str, ConfigError> {
        require(&self.build_hook_url, "BUILD_HOOK_URL")
    }

    pub fn space_id(&self) -> Result<&str, ConfigError> {
        require(&self.space_id, "STORYBLOK_SPACE_ID")
    }

    pub fn management_token(&self) -> Result<&str, ConfigError> {
        require(&self.management_token, "STORYBLOK_MANAGEMENT_TOKEN")
    }
}

fn require<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, ConfigError> {
    value.as_deref().ok_or(ConfigError::MissingEnv(name))
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file path.
///
/// Merges user values on top of stock defaults, applies environment
/// overrides, rejects unknown keys, and validates the result.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let overlay = load_raw_config(path)?;
    let mut config = resolve_config(stock_defaults_value(), overlay)?;
    config.apply_env(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Rose Ridge site configuration
# =============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.
#
# Secrets are NOT configured here. Set them in the environment or in .env:
#   STORYBLOK_ACCESS_TOKEN, STORYBLOK_WEBHOOK_SECRET, BUILD_HOOK_URL,
#   STORYBLOK_SPACE_ID, STORYBLOK_MANAGEMENT_TOKEN
# STORYBLOK_REGION, when set, overrides content.region.

# "production" hides error details; "development" shows them on error pages.
environment = "production"

[site]
name = "Rose Ridge"
# Story slug served at "/".
home_slug = "home"

# ---------------------------------------------------------------------------
# HTTP server
# ---------------------------------------------------------------------------
[server]
interface = "127.0.0.1"
port = 3000
# Request handler threads. Omit to auto-detect (= number of CPU cores).
# max_threads = 4

# ---------------------------------------------------------------------------
# Content API
# ---------------------------------------------------------------------------
[content]
# Region of the Storyblok space: eu, us, ap, ca or cn.
region = "eu"
# Request draft content for every page (staging deploys).
preview = false
# Per-request timeout in seconds.
timeout_secs = 10

# ---------------------------------------------------------------------------
# Retry budget for page fetches (network errors, 5xx and 429 only)
# ---------------------------------------------------------------------------
[retry]
max_attempts = 3
base_delay_ms = 200
max_delay_ms = 2000

# ---------------------------------------------------------------------------
# Design tokens - light theme
# ---------------------------------------------------------------------------
[colors.light]
background = "#fbf8f4"
surface = "#ffffff"
text = "#2b2522"
text_muted = "#6f6460"
border = "#e6ddd5"
tint_blush = "#f6e9e6"
tint_sage = "#e8eee6"
tint_sand = "#f3ece1"

# ---------------------------------------------------------------------------
# Design tokens - dark theme
# ---------------------------------------------------------------------------
[colors.dark]
background = "#171413"
surface = "#221d1b"
text = "#f1ebe6"
text_muted = "#b3a8a1"
border = "#3a3230"
tint_blush = "#2f2224"
tint_sage = "#222a23"
tint_sand = "#2c261f"

# ---------------------------------------------------------------------------
# Brand variants
# ---------------------------------------------------------------------------
[brands.classic]
accent = "#9c4f5a"
accent_contrast = "#ffffff"
script_font = "\"Pinyon Script\", cursive"

[brands.garden]
accent = "#5d7a5a"
accent_contrast = "#ffffff"
script_font = "\"Great Vibes\", cursive"
"##
}

// =============================================================================
// Design tokens
// =============================================================================

fn scheme_declarations(scheme: &ColorScheme, indent: &str) -> String {
    [
        ("--color-bg", &scheme.background),
        ("--color-surface", &scheme.surface),
        ("--color-text", &scheme.text),
        ("--color-text-muted", &scheme.text_muted),
        ("--color-border", &scheme.border),
        ("--color-tint-blush", &scheme.tint_blush),
        ("--color-tint-sage", &scheme.tint_sage),
        ("--color-tint-sand", &scheme.tint_sand),
    ]
    .iter()
    .map(|(name, value)| format!("{indent}{name}: {value};"))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Generate CSS custom properties from color config.
///
/// An explicit `data-theme` on the root wins; without one the system
/// preference picks the scheme.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root,
[data-theme="light"] {{
{light}
}}

[data-theme="dark"] {{
{dark}
}}

@media (prefers-color-scheme: dark) {{
    :root:not([data-theme]) {{
{dark_nested}
    }}
}}"#,
        light = scheme_declarations(&colors.light, "    "),
        dark = scheme_declarations(&colors.dark, "    "),
        dark_nested = scheme_declarations(&colors.dark, "        "),
    )
}

/// Generate CSS custom properties for each brand variant.
pub fn generate_brand_css(brands: &BrandConfig) -> String {
    let block = |selector: &str, palette: &BrandPalette| {
        format!(
            "{selector} {{\n    --color-accent: {};\n    --color-accent-contrast: {};\n    --font-script: {};\n}}",
            palette.accent, palette.accent_contrast, palette.script_font
        )
    };
    format!(
        "{}\n\n{}",
        block(":root,\n[data-brand=\"classic\"]", &brands.classic),
        block("[data-brand=\"garden\"]", &brands.garden)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_colors() {
        let config = SiteConfig::default();
        assert_eq!(config.colors.light.background, "#fbf8f4");
        assert_eq!(config.colors.dark.background, "#171413");
    }

    #[test]
    fn default_config_is_production_eu() {
        let config = SiteConfig::default();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.content.region, "eu");
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.site.home_slug, "home");
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[colors.light]
background = "#fafafa"
"##;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.colors.light.background, "#fafafa");
        assert_eq!(config.colors.light.text, "#2b2522");
        assert_eq!(config.colors.dark.background, "#171413");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn parse_environment() {
        let config: SiteConfig = toml::from_str(r#"environment = "development""#).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert!(!config.environment.is_production());
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            r#"
[server]
port = 8080

[retry]
max_attempts = 5
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.base_delay_ms, 200);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "this is not valid toml [[[").unwrap();

        let result = load_config(&path);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            r#"
[retry]
max_attempts = 0
"#,
        )
        .unwrap();

        let result = load_config(&path);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // Environment overrides and secrets
    // =========================================================================

    #[test]
    fn region_env_overrides_config() {
        let mut config = SiteConfig::default();
        config.apply_env(|key| (key == "STORYBLOK_REGION").then(|| " US ".to_string()));
        assert_eq!(config.content.region, "us");
    }

    #[test]
    fn blank_region_env_is_ignored() {
        let mut config = SiteConfig::default();
        config.apply_env(|_| Some("  ".to_string()));
        assert_eq!(config.content.region, "eu");
    }

    #[test]
    fn missing_secret_names_variable() {
        let secrets = Secrets::from_lookup(|_| None);
        let err = secrets.access_token().unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv("STORYBLOK_ACCESS_TOKEN")));
        assert!(err.to_string().contains("STORYBLOK_ACCESS_TOKEN"));
    }

    #[test]
    fn blank_secret_counts_as_missing() {
        let secrets = Secrets::from_lookup(|key| {
            (key == "STORYBLOK_WEBHOOK_SECRET").then(|| "   ".to_string())
        });
        assert!(secrets.webhook_secret().is_err());
    }

    #[test]
    fn secrets_read_all_variables() {
        let secrets = Secrets::from_lookup(|key| Some(format!("value-of-{key}")));
        assert_eq!(
            secrets.access_token().unwrap(),
            "value-of-STORYBLOK_ACCESS_TOKEN"
        );
        assert_eq!(secrets.build_hook_url().unwrap(), "value-of-BUILD_HOOK_URL");
        assert_eq!(secrets.space_id().unwrap(), "value-of-STORYBLOK_SPACE_ID");
        assert_eq!(
            secrets.management_token().unwrap(),
            "value-of-STORYBLOK_MANAGEMENT_TOKEN"
        );
    }

    // =========================================================================
    // Design token CSS
    // =========================================================================

    #[test]
    fn generate_css_uses_config_colors() {
        let mut colors = ColorConfig::default();
        colors.light.background = "#f0f0f0".to_string();
        colors.dark.background = "#1a1a1a".to_string();

        let css = generate_color_css(&colors);
        assert!(css.contains("--color-bg: #f0f0f0"));
        assert!(css.contains("--color-bg: #1a1a1a"));
    }

    #[test]
    fn generate_css_scopes_explicit_theme_and_system_preference() {
        let css = generate_color_css(&ColorConfig::default());
        assert!(css.contains(r#"[data-theme="dark"]"#));
        assert!(css.contains("@media (prefers-color-scheme: dark)"));
        assert!(css.contains(":root:not([data-theme])"));
        assert!(css.contains("--color-tint-sage:"));
    }

    #[test]
    fn generate_brand_css_has_both_variants() {
        let css = generate_brand_css(&BrandConfig::default());
        assert!(css.contains(r#"[data-brand="classic"]"#));
        assert!(css.contains(r#"[data-brand="garden"]"#));
        assert!(css.contains("--color-accent: #5d7a5a"));
    }

    // =========================================================================
    // Processing / thread config
    // =========================================================================

    #[test]
    fn effective_threads_clamped_to_cores() {
        let config = ServerConfig {
            max_threads: Some(99999),
            ..ServerConfig::default()
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ServerConfig {
            max_threads: Some(1),
            ..ServerConfig::default()
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_deep_nested() {
        let base: toml::Value = toml::from_str(
            r##"
[colors.light]
background = "#fff"
text = "#000"
"##,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r##"
[colors.light]
background = "#fafafa"
"##,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let light = merged.get("colors").unwrap().get("light").unwrap();
        assert_eq!(light.get("background").unwrap().as_str(), Some("#fafafa"));
        assert_eq!(light.get("text").unwrap().as_str(), Some("#000"));
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("port = 3000").unwrap();
        let overlay: toml::Value = toml::from_str("port = 8080").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("port").unwrap().as_integer(), Some(8080));
    }

    // =========================================================================
    // Unknown key rejection and validation
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str(
            r#"
[retry]
max_attemps = 3
"#,
        );
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_region_rejected() {
        let mut config = SiteConfig::default();
        config.content.region = "mars".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("content.region"));
    }

    #[test]
    fn base_delay_above_max_rejected() {
        let mut config = SiteConfig::default();
        config.retry.base_delay_ms = 5000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn region_hosts() {
        assert_eq!(region_host("eu"), Some("https://api.storyblok.com"));
        assert_eq!(region_host("us"), Some("https://api-us.storyblok.com"));
        assert_eq!(region_host("cn"), Some("https://app.storyblokchina.cn"));
        assert_eq!(region_host("xx"), None);
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.colors.light.background, "#fbf8f4");
        assert_eq!(config.colors.dark.tint_sand, "#2c261f");
        assert_eq!(config.brands.garden.accent, "#5d7a5a");
        assert_eq!(
            config.brands.classic.script_font,
            BrandConfig::default().classic.script_font
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        for section in ["site", "server", "content", "retry", "colors", "brands"] {
            assert!(val.get(section).is_some(), "missing [{section}]");
        }
    }
}
