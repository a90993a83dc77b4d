//! Configuration for the development-mode asset pipeline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for installing web-client dependencies and launching the
/// JavaScript dev server.
///
/// Relative tool paths are joined onto the repository root at start time;
/// absolute paths are used as-is, which lets tests substitute stub
/// executables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub struct DevServerConfig {
    /// Repository root. When `None`, resolved via
    /// `git rev-parse --show-toplevel`.
    pub repo_root: Option<PathBuf>,

    /// Web-client directory, relative to the repository root.
    pub web_client_dir: PathBuf,

    /// Path to the yarn wrapper used for dependency installation.
    pub yarn_path: PathBuf,

    /// Path to the node binary used to launch the dev server.
    pub node_path: PathBuf,

    /// Loopback port the dev server listens on. Must match the dev
    /// server's own configured listen address.
    pub upstream_port: u16,
}

impl DevServerConfig {
    /// Create a config with the standard repository layout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            repo_root: None,
            web_client_dir: PathBuf::from("client/web"),
            yarn_path: PathBuf::from("tool/yarn"),
            node_path: PathBuf::from("tool/node"),
            upstream_port: 4000,
        }
    }

    /// Override the repository root, skipping the git lookup.
    #[must_use]
    pub fn with_repo_root(mut self, root: PathBuf) -> Self {
        self.repo_root = Some(root);
        self
    }

    /// Override the upstream dev-server port.
    #[must_use]
    pub fn with_upstream_port(mut self, port: u16) -> Self {
        self.upstream_port = port;
        self
    }

    /// The command an operator should run to start the dev server by hand,
    /// shown in the proxy's 502 diagnostic.
    #[must_use]
    pub fn start_hint(&self) -> String {
        format!(
            "Run `./{} --cwd {} start` from the repo root to start the development server.",
            self.yarn_path.display(),
            self.web_client_dir.display()
        )
    }
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a configured tool path against the repository root. Absolute
/// paths are used as-is.
pub(crate) fn tool_path(tool: &Path, repo_root: &Path) -> PathBuf {
    if tool.is_absolute() {
        tool.to_owned()
    } else {
        repo_root.join(tool)
    }
}
