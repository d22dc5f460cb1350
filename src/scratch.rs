// src/scratch.rs

use crate::{constants, error::AppResult};
use log::{debug, warn};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// The run's scratch directory: recreated empty at start, removed on drop.
///
/// Dropping happens on every exit path out of a run (success, fatal error
/// and interruption), so the directory never outlives the process.
pub struct ScratchDir {
    path: PathBuf,
    keep_debug_pages: bool,
}

impl ScratchDir {
    pub fn create(root: &Path, keep_debug_pages: bool) -> AppResult<Self> {
        let path = root.join(constants::SCRATCH_DIR_NAME);
        if path.exists() {
            debug!("removing stale scratch directory {:?}", path);
            fs::remove_dir_all(&path)?;
        }
        fs::create_dir_all(&path)?;
        debug!("using scratch directory {:?}", path);
        Ok(Self {
            path,
            keep_debug_pages,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes a page dump and returns where it went.
    pub fn save(&self, name: &str, content: &str) -> AppResult<PathBuf> {
        let file = self.path.join(name);
        fs::write(&file, content)?;
        Ok(file)
    }

    /// Like `save`, but only when debug dumps are enabled.
    pub fn save_debug(&self, name: &str, content: &str) -> AppResult<Option<PathBuf>> {
        if !self.keep_debug_pages {
            return Ok(None);
        }
        self.save(name, content).map(Some)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        match fs::remove_dir_all(&self.path) {
            Ok(()) => debug!("removed scratch directory {:?}", self.path),
            Err(e) => warn!("could not remove scratch directory {:?}: {}", self.path, e),
        }
    }
}
