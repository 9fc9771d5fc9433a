use std::{net::SocketAddr, sync::Arc};

use camino::{Utf8Path, Utf8PathBuf};
use miette::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Web server configuration
    #[serde(default)]
    pub web: WebConfig,

    /// Text shown on the page
    #[serde(default)]
    pub page: PageCopy,

    /// Observability configuration
    #[serde(default)]
    pub o11y: ObservabilityConfig,

    /// File this configuration was read from
    #[serde(skip)]
    pub source: Option<Utf8PathBuf>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WebConfig {
    /// HTTP server address
    #[serde(default = "default_http_addr")]
    pub http_addr: Arc<str>,

    /// Path the page is served on; every path when unset
    #[serde(default)]
    pub page_path: Option<Arc<str>>,

    /// Largest accepted form body in bytes
    #[serde(default = "default_max_form_bytes")]
    pub max_form_bytes: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            page_path: None,
            max_form_bytes: default_max_form_bytes(),
        }
    }
}

fn default_http_addr() -> Arc<str> {
    Arc::from("0.0.0.0:8080")
}

fn default_max_form_bytes() -> usize {
    16 * 1024
}

/// Operator-supplied copy, escaped like any other interpolated text
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PageCopy {
    /// Document `<title>`
    #[serde(default = "default_title")]
    pub title: Arc<str>,

    /// Top-level heading
    #[serde(default = "default_title")]
    pub heading: Arc<str>,

    /// Label for the name input
    #[serde(default = "default_prompt")]
    pub prompt: Arc<str>,

    /// Submit button text
    #[serde(default = "default_submit")]
    pub submit: Arc<str>,
}

impl Default for PageCopy {
    fn default() -> Self {
        Self {
            title: default_title(),
            heading: default_title(),
            prompt: default_prompt(),
            submit: default_submit(),
        }
    }
}

fn default_title() -> Arc<str> {
    Arc::from("User Interaction")
}

fn default_prompt() -> Arc<str> {
    Arc::from("Please enter your name:")
}

fn default_submit() -> Arc<str> {
    Arc::from("Submit")
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ObservabilityConfig {
    /// Log filter directives, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub log_filter: Arc<str>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> Arc<str> {
    Arc::from("interaction=info,tower_http=info")
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn load_from_file(path: &Utf8Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| miette::miette!("Failed to read config file '{path}': {e}"))?;

        let mut config = Self::from_toml(&content)?;
        config.source = Some(path.to_owned());
        Ok(config)
    }

    /// Parse and validate configuration from a TOML document
    ///
    /// # Errors
    /// Returns an error if the document is not valid TOML or fails validation
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| miette::miette!("Failed to parse config: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot
    ///
    /// # Errors
    /// Returns an error describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        self.http_addr()?;

        if let Some(path) = &self.web.page_path
            && !path.starts_with('/')
        {
            return Err(miette::miette!(
                "Invalid web.page_path '{path}': must start with '/'"
            ));
        }

        if let Some(path) = &self.web.page_path
            && (path.contains(['{', '}', '*'])
                || path.split('/').any(|segment| segment.starts_with(':')))
        {
            return Err(miette::miette!(
                "Invalid web.page_path '{path}': must be a literal path"
            ));
        }

        if self.web.max_form_bytes == 0 {
            return Err(miette::miette!("web.max_form_bytes must be greater than 0"));
        }

        Ok(())
    }

    /// Parsed HTTP listen address
    ///
    /// # Errors
    /// Returns an error if `web.http_addr` is not a socket address
    pub fn http_addr(&self) -> Result<SocketAddr> {
        self.web
            .http_addr
            .parse()
            .map_err(|e| miette::miette!("Invalid HTTP address '{}': {e}", self.web.http_addr))
    }
}

/// Load configuration from an explicit path or the default locations
///
/// Falls back to built-in defaults when no explicit path is given and none of
/// the default locations exist.
///
/// # Errors
/// Returns an error if the explicit path is missing or if parsing fails
pub fn load(explicit: Option<&Utf8Path>) -> Result<Config> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(miette::miette!("No config found at '{path}'"));
        }
        return Config::load_from_file(path);
    }

    let config_paths = [
        Utf8PathBuf::from("/etc/interaction/interaction.toml"),
        Utf8PathBuf::from("/etc/interaction.toml"),
        Utf8PathBuf::from("./interaction.toml"),
    ];

    for path in &config_paths {
        if path.exists() {
            return Config::load_from_file(path);
        }
    }

    Ok(Config::default())
}
