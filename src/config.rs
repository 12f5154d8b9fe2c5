//! Client configuration and layered resolution.
//!
//! A [`ClientConfig`] is resolved once, at client construction, from up to
//! five sources. Highest priority first:
//!
//! 1. explicit [`ConfigBuilder`] arguments
//! 2. an explicitly named JSON configuration file
//! 3. individual `PYRK_*` environment variables
//! 4. a JSON configuration file named by `PYRK_CONFIG_FILE`
//! 5. built-in defaults
//!
//! Each source contributes only the keys it defines; absent keys never
//! overwrite a value set by a lower-priority source. Resolution fails closed
//! with [`PorkbunError::Configuration`] when either credential is still empty
//! after the merge.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{PorkbunError, Result};

/// Environment variable naming a JSON configuration file.
pub const ENV_CONFIG_FILE: &str = "PYRK_CONFIG_FILE";

const ENV_API_KEY: &str = "PYRK_API_KEY";
const ENV_API_SECRET_KEY: &str = "PYRK_API_SECRET_KEY";
const ENV_FORCE_V4: &str = "PYRK_FORCE_V4";
const ENV_RATE: &str = "PYRK_RATE";
const ENV_RETRIES: &str = "PYRK_RETRIES";
const ENV_TIMEOUT: &str = "PYRK_TIMEOUT";
const ENV_HTTP2: &str = "PYRK_HTTP2";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Resolved client configuration. Immutable after construction and safe for
/// concurrent read-only use.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Porkbun API key.
    pub api_key: String,
    /// Porkbun API secret key.
    pub api_secret_key: String,
    /// Pin every request to the IPv4-only endpoint.
    pub force_v4: bool,
    /// Cooperative delay in seconds before each request.
    pub rate_limit: f64,
    /// Retry count for transport-level failures.
    pub retries: u32,
    /// Per-request timeout in seconds.
    pub timeout: u64,
    /// Allow HTTP/2 negotiation instead of forcing HTTP/1.
    pub http2: bool,
}

impl ClientConfig {
    /// Build a configuration from explicit credentials and defaults for
    /// everything else, without consulting the environment.
    pub fn new(api_key: impl Into<String>, api_secret_key: impl Into<String>) -> Result<Self> {
        Self::builder()
            .read_env(false)
            .api_key(api_key)
            .api_secret_key(api_secret_key)
            .build()
    }

    /// Start a layered configuration resolution.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// One configuration source: the subset of keys it explicitly defines.
///
/// Doubles as the JSON configuration file format.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ConfigOverlay {
    pub api_key: Option<String>,
    pub api_secret_key: Option<String>,
    pub force_v4: Option<bool>,
    pub rate_limit: Option<f64>,
    pub retries: Option<u32>,
    pub timeout: Option<u64>,
    #[serde(default, deserialize_with = "bool_or_int")]
    pub http2: Option<bool>,
}

impl ConfigOverlay {
    /// Apply every key this overlay defines onto the accumulator.
    fn apply_to(&self, config: &mut ClientConfig) {
        if let Some(v) = &self.api_key {
            config.api_key = v.clone();
        }
        if let Some(v) = &self.api_secret_key {
            config.api_secret_key = v.clone();
        }
        if let Some(v) = self.force_v4 {
            config.force_v4 = v;
        }
        if let Some(v) = self.rate_limit {
            config.rate_limit = v;
        }
        if let Some(v) = self.retries {
            config.retries = v;
        }
        if let Some(v) = self.timeout {
            config.timeout = v;
        }
        if let Some(v) = self.http2 {
            config.http2 = v;
        }
    }

    /// Collect the individual `PYRK_*` environment variables.
    pub(crate) fn from_env() -> Self {
        Self {
            api_key: read_env(ENV_API_KEY),
            api_secret_key: read_env(ENV_API_SECRET_KEY),
            force_v4: read_env(ENV_FORCE_V4).map(|v| truthy(&v)),
            rate_limit: parse_env(ENV_RATE),
            retries: parse_env(ENV_RETRIES),
            timeout: parse_env(ENV_TIMEOUT),
            http2: read_env(ENV_HTTP2).map(|v| truthy(&v)),
        }
    }

    /// Load a JSON configuration file. An unreadable or malformed file
    /// contributes nothing, matching the forgiving file handling of the
    /// configuration surface.
    pub(crate) fn from_file(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("config file {} not readable: {e}", path.display());
                return Self::default();
            }
        };
        match serde_json::from_str(&text) {
            Ok(overlay) => overlay,
            Err(e) => {
                log::warn!("config file {} is not valid JSON: {e}", path.display());
                Self::default()
            }
        }
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = read_env(name)?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("ignoring unparseable value in {name}: {raw:?}");
            None
        }
    }
}

fn truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}

/// Accept `true`/`false` as well as `1`/`0` for the `http2` file key.
fn bool_or_int<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(Value::Number(n)) => Ok(Some(n.as_i64().is_some_and(|v| v != 0))),
        Some(other) => Err(serde::de::Error::custom(format!(
            "http2 must be a bool or integer, got {other}"
        ))),
    }
}

/// Layered configuration builder.
///
/// Sources are merged lowest priority first so a later source always wins on
/// key collision; explicit arguments win over everything.
#[derive(Debug)]
pub struct ConfigBuilder {
    args: ConfigOverlay,
    config_file: Option<PathBuf>,
    read_env: bool,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            args: ConfigOverlay::default(),
            config_file: None,
            read_env: true,
        }
    }
}

impl ConfigBuilder {
    /// Explicit API key (highest priority).
    #[must_use]
    pub fn api_key(mut self, value: impl Into<String>) -> Self {
        self.args.api_key = Some(value.into());
        self
    }

    /// Explicit API secret key (highest priority).
    #[must_use]
    pub fn api_secret_key(mut self, value: impl Into<String>) -> Self {
        self.args.api_secret_key = Some(value.into());
        self
    }

    /// Pin every request to the IPv4-only endpoint.
    #[must_use]
    pub fn force_v4(mut self, value: bool) -> Self {
        self.args.force_v4 = Some(value);
        self
    }

    /// Cooperative delay in seconds before each request.
    #[must_use]
    pub fn rate_limit(mut self, value: f64) -> Self {
        self.args.rate_limit = Some(value);
        self
    }

    /// Retry count for transport-level failures.
    #[must_use]
    pub fn retries(mut self, value: u32) -> Self {
        self.args.retries = Some(value);
        self
    }

    /// Per-request timeout in seconds.
    #[must_use]
    pub fn timeout(mut self, value: u64) -> Self {
        self.args.timeout = Some(value);
        self
    }

    /// Allow HTTP/2 negotiation.
    #[must_use]
    pub fn http2(mut self, value: bool) -> Self {
        self.args.http2 = Some(value);
        self
    }

    /// Merge a named JSON configuration file (beats environment variables,
    /// loses to explicit arguments).
    #[must_use]
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Whether to consult `PYRK_*` environment variables and the
    /// `PYRK_CONFIG_FILE`-named file. Defaults to `true`.
    #[must_use]
    pub fn read_env(mut self, value: bool) -> Self {
        self.read_env = value;
        self
    }

    /// Resolve the final configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PorkbunError::Configuration`] when either credential is
    /// empty after merging all sources.
    pub fn build(self) -> Result<ClientConfig> {
        let mut overlays = Vec::new();
        if self.read_env {
            if let Some(path) = read_env(ENV_CONFIG_FILE) {
                overlays.push(ConfigOverlay::from_file(Path::new(&path)));
            }
            overlays.push(ConfigOverlay::from_env());
        }
        if let Some(path) = &self.config_file {
            overlays.push(ConfigOverlay::from_file(path));
        }
        overlays.push(self.args);
        resolve(overlays)
    }
}

/// Merge overlays over the defaults, in the order given, then validate
/// credentials.
fn resolve(overlays: Vec<ConfigOverlay>) -> Result<ClientConfig> {
    let mut config = ClientConfig {
        api_key: String::new(),
        api_secret_key: String::new(),
        force_v4: false,
        rate_limit: 0.0,
        retries: 0,
        timeout: DEFAULT_TIMEOUT_SECS,
        http2: false,
    };
    for overlay in &overlays {
        overlay.apply_to(&mut config);
    }
    if config.api_key.is_empty() || config.api_secret_key.is_empty() {
        return Err(PorkbunError::Configuration {
            detail: "api_key and api_secret_key are required".to_string(),
        });
    }
    Ok(config)
}
