//! Scratch profile directories
//!
//! A [`ProfileDir`] is a temporary search path with a cache bound to it,
//! so tests never see the profiles installed on the machine.

use std::path::{Path, PathBuf};

use oxprof_core::{ProfileCache, Settings, StandardRole};

/// Temporary profile search path
pub struct ProfileDir {
    dir: tempfile::TempDir,
    roles: Vec<(StandardRole, String)>,
}

impl ProfileDir {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
            roles: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Install target used by [`settings`](Self::settings)
    pub fn user_path(&self) -> PathBuf {
        self.dir.path().join("user")
    }

    /// Write `data` as `name` (sub directories are created)
    ///
    /// Returns the canonical path, which is the file name scanned
    /// profiles report.
    pub fn add(&self, name: &str, data: &[u8]) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, data)?;
        log::debug!("fixture {} ({} bytes)", path.display(), data.len());
        std::fs::canonicalize(path)
    }

    /// Configure `file_name` for `role`
    pub fn with_role(mut self, role: StandardRole, file_name: &str) -> Self {
        self.roles.push((role, file_name.to_string()));
        self
    }

    /// Settings searching only this directory
    pub fn settings(&self) -> Settings {
        let mut settings = Settings::empty();
        settings.search_paths = vec![self.dir.path().to_path_buf()];
        settings.user_path = Some(self.user_path());
        for (role, file_name) in &self.roles {
            settings.set_role_file(*role, file_name.clone());
        }
        settings
    }

    /// Fresh cache over this directory
    pub fn cache(&self) -> ProfileCache {
        ProfileCache::new(self.settings())
    }
}
