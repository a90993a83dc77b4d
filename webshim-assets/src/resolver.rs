//! Asset resolver: picks the handler for the configured serving mode.

use std::path::Path;
use std::str::FromStr;

use axum::Router;
use serde::{Deserialize, Serialize};

use crate::{AssetsError, DevProxy, DevServer, DevServerConfig, DevServerHandle, StaticAssets};

/// How the web-client assets are served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetMode {
    /// Serve the pre-built static tree.
    Production,
    /// Proxy to a live-reloading dev server spawned as a child process.
    Development,
}

impl FromStr for AssetMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            other => Err(format!(
                "unknown asset mode '{other}'; expected 'production' or 'development'"
            )),
        }
    }
}

/// Outcome of [`resolve`]: the request handler plus, in development mode,
/// the dev-server handle whose [`DevServerHandle::stop`] is the one-shot
/// cleanup the caller owes at shutdown.
#[derive(Debug)]
#[non_exhaustive]
pub struct ResolvedAssets {
    /// Handler serving every asset path.
    pub router: Router,

    /// `Some` if and only if the mode is development.
    pub dev_server: Option<DevServerHandle>,
}

/// Resolve the asset handler for `mode`.
///
/// Production returns the static handler immediately. Development blocks
/// through dependency installation and the dev-server launch before any
/// handler exists, so dev mode never partially starts.
///
/// # Errors
/// Production: [`AssetsError::MissingAssetRoot`]. Development: any error
/// from [`DevServer::start`].
pub async fn resolve(
    mode: AssetMode,
    static_root: &Path,
    dev_config: &DevServerConfig,
) -> Result<ResolvedAssets, AssetsError> {
    match mode {
        AssetMode::Production => {
            let assets = StaticAssets::new(static_root.to_owned())?;
            tracing::info!(root = %assets.root().display(), "serving pre-built web client assets");
            Ok(ResolvedAssets {
                router: assets.into_router(),
                dev_server: None,
            })
        }
        AssetMode::Development => {
            let handle = DevServer::new(dev_config.clone()).start().await?;
            let proxy = DevProxy::new(dev_config);
            Ok(ResolvedAssets {
                router: proxy.into_router(),
                dev_server: Some(handle),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_long_and_short_forms() {
        assert_eq!("production".parse::<AssetMode>(), Ok(AssetMode::Production));
        assert_eq!("prod".parse::<AssetMode>(), Ok(AssetMode::Production));
        assert_eq!("development".parse::<AssetMode>(), Ok(AssetMode::Development));
        assert_eq!("dev".parse::<AssetMode>(), Ok(AssetMode::Development));
    }

    #[test]
    fn mode_rejects_unknown_strings() {
        let err = match "staging".parse::<AssetMode>() {
            Err(e) => e,
            Ok(m) => panic!("'staging' must not parse, got {m:?}"),
        };
        assert!(err.contains("staging"), "error must name the bad input: {err}");
    }

    #[tokio::test]
    async fn production_resolve_fails_without_asset_tree() {
        let result = resolve(
            AssetMode::Production,
            Path::new("/nonexistent/webshim-build"),
            &DevServerConfig::new(),
        )
        .await;
        assert!(
            matches!(result, Err(AssetsError::MissingAssetRoot { .. })),
            "missing tree must fail resolution, not the first request"
        );
    }
}
