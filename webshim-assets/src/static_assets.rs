//! Static handler for the pre-built web-client asset tree.
//!
//! Serves an immutable directory of built frontend files. Path
//! sanitization, MIME negotiation, and 404 handling come from
//! `tower_http::services::ServeDir`.

use std::path::PathBuf;

use axum::Router;
use tower_http::services::ServeDir;

use crate::AssetsError;

/// Handle to the pre-built asset directory.
///
/// Construction validates that the tree exists, so a missing or unbuilt
/// asset root fails at process startup rather than on the first request.
#[derive(Debug, Clone)]
pub struct StaticAssets {
    root: PathBuf,
}

impl StaticAssets {
    /// Create a handler rooted at `root`.
    ///
    /// # Errors
    /// Returns [`AssetsError::MissingAssetRoot`] if `root` is not a
    /// directory.
    pub fn new(root: PathBuf) -> Result<Self, AssetsError> {
        if !root.is_dir() {
            return Err(AssetsError::MissingAssetRoot { path: root });
        }
        Ok(Self { root })
    }

    /// Path to the served asset root.
    #[must_use]
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    /// Build a router that serves every path from the asset tree.
    #[must_use]
    pub fn into_router(self) -> Router {
        Router::new().fallback_service(ServeDir::new(self.root))
    }
}
