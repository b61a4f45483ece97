//! One deployment or status query per project at a time

use fs2::FileExt;
use log::{debug, warn};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::deploy::error::{DeployError, DeployResult};

const LOCK_FILE: &str = ".bc-pte-deploy.lock";

/// Held for the duration of a command.
///
/// The exclusion is an OS file lock on `.vscode/.bc-pte-deploy.lock`, so it
/// disappears with the process that held it; a lock file left behind by a
/// killed run is simply taken over. Projects without a `.vscode` directory
/// have no environments to deploy to and are not locked.
#[derive(Debug)]
pub struct ProjectLock {
    held: Option<(PathBuf, File)>,
}

impl ProjectLock {
    pub fn acquire(project_dir: &Path) -> DeployResult<Self> {
        let dir = project_dir.join(".vscode");
        if !dir.is_dir() {
            debug!("No .vscode directory in {}, not locking", project_dir.display());
            return Ok(Self { held: None });
        }

        let path = dir.join(LOCK_FILE);
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                DeployError::io(format!("Failed to open lock file {}", path.display()), e)
            })?;

        if let Err(e) = file.try_lock_exclusive() {
            if e.kind() == fs2::lock_contended_error().kind() {
                return Err(DeployError::DeploymentInProgress(path));
            }
            return Err(DeployError::io(
                format!("Failed to lock {}", path.display()),
                e,
            ));
        }

        let mut previous = String::new();
        if file.read_to_string(&mut previous).is_ok() && !previous.trim().is_empty() {
            warn!(
                "Taking over lock file {} left by process {}",
                path.display(),
                previous.trim()
            );
        }

        // Pid is informational only
        let _ = file
            .set_len(0)
            .and_then(|_| file.seek(SeekFrom::Start(0)))
            .and_then(|_| writeln!(file, "{}", std::process::id()));
        debug!("Acquired project lock {}", path.display());

        Ok(Self {
            held: Some((path, file)),
        })
    }

    /// Lock file path, when the project is locked
    pub fn path(&self) -> Option<&Path> {
        self.held.as_ref().map(|(path, _)| path.as_path())
    }
}

impl Drop for ProjectLock {
    fn drop(&mut self) {
        let Some((path, file)) = self.held.take() else {
            return;
        };
        // Remove before unlocking so nobody can lock the file being deleted
        if let Err(e) = fs::remove_file(&path) {
            warn!("Failed to remove lock file {}: {}", path.display(), e);
        }
        let _ = file.unlock();
        debug!("Released project lock {}", path.display());
    }
}
