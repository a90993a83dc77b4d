//! Environment-variable configuration for the gateway binary.

use std::path::PathBuf;

use webshim_assets::{AssetMode, DevServerConfig};

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct GatewayConfig {
    /// Address the gateway listens on.
    pub listen_addr: String,

    /// Asset serving mode.
    pub mode: AssetMode,

    /// Root of the pre-built static tree (production mode).
    pub asset_root: PathBuf,

    /// Dev-mode pipeline configuration.
    pub dev: DevServerConfig,
}

impl GatewayConfig {
    /// Read configuration from process environment variables.
    ///
    /// Recognized variables: `WEBSHIM_LISTEN_ADDR`, `WEBSHIM_MODE`,
    /// `WEBSHIM_ASSET_ROOT`, `WEBSHIM_UPSTREAM_PORT`.
    ///
    /// # Errors
    /// Returns a description of the first invalid value.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup (test seam).
    ///
    /// # Errors
    /// Returns a description of the first invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let listen_addr = lookup("WEBSHIM_LISTEN_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8080".to_owned());

        let mode = match lookup("WEBSHIM_MODE") {
            Some(raw) => raw.parse::<AssetMode>()?,
            None => AssetMode::Production,
        };

        let asset_root = lookup("WEBSHIM_ASSET_ROOT")
            .map_or_else(|| PathBuf::from("client/web/build"), PathBuf::from);

        let mut dev = DevServerConfig::new();
        if let Some(raw) = lookup("WEBSHIM_UPSTREAM_PORT") {
            dev.upstream_port = raw
                .parse()
                .map_err(|e| format!("invalid WEBSHIM_UPSTREAM_PORT '{raw}': {e}"))?;
        }

        Ok(Self {
            listen_addr,
            mode,
            asset_root,
            dev,
        })
    }
}
