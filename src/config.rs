//! Runtime configuration, read once from the environment at startup.

use std::env;

/// Listen port used when `PORT` is unset or unparseable.
const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port the HTTP server binds on.
    pub port: u16,
    /// Shared secret required by the relay endpoint. `None` means open access.
    pub proxy_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        // An empty PROXY_KEY counts as unset so the gate stays open.
        let proxy_key = lookup("PROXY_KEY").filter(|key| !key.is_empty());
        Self { port, proxy_key }
    }
}
