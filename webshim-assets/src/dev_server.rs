//! JavaScript dev-server subprocess lifecycle.
//!
//! Installs web-client dependencies, launches the dev server as a child
//! process, and owns its shutdown. At most one dev server may run per
//! process; a second start is rejected until the first handle is dropped.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::process::Command;

use crate::{AssetsError, DevServerConfig};

/// Process-wide guard: set while a dev-server child is alive.
static DEV_SERVER_RUNNING: AtomicBool = AtomicBool::new(false);

/// Starts the JavaScript dev server and hands out its lifecycle handle.
#[derive(Debug, Clone)]
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    /// Create a starter with the given configuration.
    #[must_use]
    pub fn new(config: DevServerConfig) -> Self {
        Self { config }
    }

    /// Install web-client dependencies and launch the dev server.
    ///
    /// Steps run strictly in order, each blocking until complete:
    /// repository-root lookup, dependency install (output captured),
    /// then the child spawn with stdout/stderr inherited.
    ///
    /// # Errors
    /// Returns [`AssetsError::AlreadyRunning`] if a dev server is already
    /// up in this process, [`AssetsError::RepoRootLookup`] if the git
    /// query fails, [`AssetsError::DependencyInstall`] if the install
    /// command exits non-zero, and [`AssetsError::SpawnFailed`] if the
    /// child cannot be started.
    pub async fn start(&self) -> Result<DevServerHandle, AssetsError> {
        if DEV_SERVER_RUNNING
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(AssetsError::AlreadyRunning);
        }

        match self.start_inner().await {
            Ok(handle) => Ok(handle),
            Err(e) => {
                DEV_SERVER_RUNNING.store(false, Ordering::Release);
                Err(e)
            }
        }
    }

    async fn start_inner(&self) -> Result<DevServerHandle, AssetsError> {
        let repo_root = match &self.config.repo_root {
            Some(root) => root.clone(),
            None => git_root_dir().await?,
        };
        let web_client_path = repo_root.join(&self.config.web_client_dir);

        let yarn = crate::config::tool_path(&self.config.yarn_path, &repo_root);
        let node = crate::config::tool_path(&self.config.node_path, &repo_root);
        let vite = web_client_path.join("node_modules/.bin/vite");

        tracing::info!(
            yarn = %yarn.display(),
            "installing JavaScript dependencies (may take ~30s)"
        );
        let install = Command::new(&yarn)
            .arg("--non-interactive")
            .arg("-s")
            .arg("--cwd")
            .arg(&web_client_path)
            .arg("install")
            .output()
            .await
            .map_err(|e| AssetsError::DependencyInstall {
                output: format!("exec {}: {e}", yarn.display()),
            })?;
        if !install.status.success() {
            let mut output = String::from_utf8_lossy(&install.stdout).into_owned();
            output.push_str(&String::from_utf8_lossy(&install.stderr));
            return Err(AssetsError::DependencyInstall { output });
        }

        tracing::info!("starting JavaScript dev server");
        let child = Command::new(&node)
            .arg(&vite)
            .current_dir(&web_client_path)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AssetsError::SpawnFailed(format!("exec {}: {e}", node.display())))?;

        let pid = child
            .id()
            .ok_or_else(|| AssetsError::SpawnFailed("dev server exited immediately".to_owned()))?;

        tracing::info!(pid, "JavaScript dev server running");

        Ok(DevServerHandle {
            pid,
            child,
            started_at: Utc::now(),
        })
    }
}

/// A handle to the running dev-server child process.
///
/// The handle owns the child exclusively. Call [`DevServerHandle::stop`]
/// to shut it down; consuming `self` makes the cleanup one-shot. If the
/// handle is dropped without `stop`, the child is killed via
/// `kill_on_drop`.
#[derive(Debug)]
#[non_exhaustive]
pub struct DevServerHandle {
    /// OS process ID of the dev-server child.
    pub pid: u32,

    child: tokio::process::Child,

    /// Timestamp when the child was launched.
    pub started_at: DateTime<Utc>,
}

impl DevServerHandle {
    /// Stop the dev server: send `SIGINT`, then wait for it to exit.
    ///
    /// Exit after the signal is the expected outcome and is logged, not
    /// treated as an error.
    ///
    /// # Errors
    /// Returns [`AssetsError::Io`] if waiting on the child fails.
    pub async fn stop(mut self) -> Result<(), AssetsError> {
        tracing::info!(pid = self.pid, "stopping JavaScript dev server");

        // SAFETY: pid refers to a child we spawned and still own; at worst
        // the signal races with the child's own exit, which kill reports
        // as ESRCH and the wait below resolves.
        unsafe {
            libc::kill(self.pid as libc::pid_t, libc::SIGINT);
        }

        let status = self.child.wait().await?;
        tracing::info!(pid = self.pid, %status, "JavaScript dev server exited");
        Ok(())
    }
}

impl Drop for DevServerHandle {
    fn drop(&mut self) {
        DEV_SERVER_RUNNING.store(false, Ordering::Release);
    }
}

/// Locate the repository root via `git rev-parse --show-toplevel`.
///
/// Expects a single line of output: the root path.
async fn git_root_dir() -> Result<PathBuf, AssetsError> {
    let output = Command::new("git")
        .arg("rev-parse")
        .arg("--show-toplevel")
        .output()
        .await
        .map_err(|e| AssetsError::RepoRootLookup(format!("exec git: {e}")))?;

    if !output.status.success() {
        return Err(AssetsError::RepoRootLookup(
            String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        ));
    }

    let root = String::from_utf8_lossy(&output.stdout).trim().to_owned();
    if root.is_empty() {
        return Err(AssetsError::RepoRootLookup("git printed no root path".to_owned()));
    }
    Ok(PathBuf::from(root))
}
