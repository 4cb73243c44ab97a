use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Where unknown routes are sent when redirects are enabled.
pub const DEFAULT_FALLBACK_URL: &str =
    "https://us.123rf.com/450wm/sean824/sean8241506/sean824150600032/41018523-go-away.jpg?ver=6";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub db_path: PathBuf,
    /// Answer unknown routes with a 302 to `fallback_url` instead of a 404
    /// envelope.
    pub redirect_unknown: bool,
    pub fallback_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            db_path: PathBuf::from("db.json"),
            redirect_unknown: true,
            fallback_url: DEFAULT_FALLBACK_URL.to_string(),
        }
    }
}

impl ServerConfig {
    /// Read a TOML config file. Missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// The redirect target for unknown routes, if redirects are on.
    pub fn fallback_redirect(&self) -> Option<&str> {
        self.redirect_unknown.then_some(self.fallback_url.as_str())
    }
}
