//! Error types for the assets crate.

use std::path::PathBuf;

/// Errors that can occur while resolving or starting an asset handler.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AssetsError {
    /// The version-control root query failed.
    #[error("failed to find repository root: {0}")]
    RepoRootLookup(String),

    /// The dependency-install command exited non-zero.
    #[error("dependency install failed: {output}")]
    DependencyInstall { output: String },

    /// The dev-server child process could not be started.
    #[error("dev server spawn failed: {0}")]
    SpawnFailed(String),

    /// A dev server is already running in this process.
    #[error("a dev server is already running; stop it before starting another")]
    AlreadyRunning,

    /// The pre-built static asset tree is missing.
    #[error("static asset root not found at {path}")]
    MissingAssetRoot { path: PathBuf },

    /// Underlying I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
