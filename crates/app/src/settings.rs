//! Client settings.
//!
//! Sources, highest priority first: command-line flags, `FOLIO_*`
//! environment variables, an optional TOML file, built-in defaults.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use folio_application::DEFAULT_REFRESH_PATH;
use serde::Deserialize;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_TIMEOUT_SECS: i64 = 30;
const ENV_PREFIX: &str = "FOLIO";

/// Settings needed to reach the API and keep the session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// API base every request path is appended to.
    pub base_url: Url,
    /// Path of the token refresh endpoint, relative to `base_url`.
    pub refresh_path: String,
    /// User-Agent header value.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Where the session is kept between runs. Defaults to the platform
    /// config directory.
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,
}

impl ClientConfig {
    /// Per-request timeout as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Values given on the command line, which beat every other source.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<Url>,
    pub credentials_path: Option<PathBuf>,
}

/// Loads the configuration from the process environment.
///
/// # Errors
///
/// Returns a `ConfigError` if the file is unreadable or a value has the
/// wrong type.
pub fn load(file: Option<&Path>, overrides: &Overrides) -> Result<ClientConfig, ConfigError> {
    load_from(file, None, overrides)
}

fn load_from(
    file: Option<&Path>,
    env: Option<HashMap<String, String>>,
    overrides: &Overrides,
) -> Result<ClientConfig, ConfigError> {
    let mut builder = Config::builder()
        .set_default("base_url", DEFAULT_BASE_URL)?
        .set_default("refresh_path", DEFAULT_REFRESH_PATH)?
        .set_default("user_agent", concat!("Folio/", env!("CARGO_PKG_VERSION")))?
        .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?;

    if let Some(path) = file {
        builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .source(env),
    );

    if let Some(url) = &overrides.base_url {
        builder = builder.set_override("base_url", url.as_str())?;
    }
    if let Some(path) = &overrides.credentials_path {
        builder = builder.set_override("credentials_path", path.display().to_string())?;
    }

    builder.build()?.try_deserialize()
}
