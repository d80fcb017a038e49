//! Profile caches
//!
//! [`ProfileCache`] bundles the settings with three caches:
//!
//! - the role cache, one slot per [`StandardRole`], filled on first use
//!   and kept while the configured file name stays the same;
//! - the file cache, keyed by path and modification time;
//! - the scan cache, every profile found below the search paths, sorted
//!   by description.
//!
//! The scan cache is rebuilt when the number of profile files on disk
//! differs from the number seen by the last scan. A file replaced in
//! place is not noticed until the count changes.
//!
//! The count compared is the number of files listed, not the number of
//! cached profiles, so unreadable files do not force a rebuild on every
//! access.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::{Duration, Instant, SystemTime};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::config::Settings;
use crate::container::{ParentKind, RefContainer};
use crate::error::{Error, Result};
use crate::hash::ProfileHash;
use crate::profile::{LoadOptions, Profile, TextKind};
use crate::role::{ROLE_COUNT, StandardRole};

/// File extensions picked up by a scan (compared case-insensitively)
const PROFILE_EXTENSIONS: [&str; 2] = ["icc", "icm"];

/// Cooperative cancellation for scans
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token that expires `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancelled: Arc::default(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed) || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

#[derive(Debug)]
struct FileEntry {
    modified: Option<SystemTime>,
    profile: Arc<Profile>,
}

#[derive(Debug)]
struct RoleEntry {
    file_name: String,
    profile: Arc<Profile>,
}

#[derive(Debug)]
struct ScanCache {
    /// Number of files seen by the last successful scan
    file_count: Option<usize>,
    profiles: RefContainer<Profile>,
}

/// Settings plus role, file and scan caches
#[derive(Debug)]
pub struct ProfileCache {
    settings: Settings,
    roles: Mutex<Vec<Option<RoleEntry>>>,
    files: Mutex<HashMap<PathBuf, FileEntry>>,
    scan: Mutex<ScanCache>,
}

impl ProfileCache {
    pub fn new(settings: Settings) -> Self {
        let mut profiles = RefContainer::new(ParentKind::ProfileSet);
        profiles.set_name("scan cache");
        Self {
            settings,
            roles: Mutex::new((0..ROLE_COUNT).map(|_| None).collect()),
            files: Mutex::new(HashMap::new()),
            scan: Mutex::new(ScanCache {
                file_count: None,
                profiles,
            }),
        }
    }

    /// Process wide cache built from [`Settings::from_env`]
    ///
    /// An unreadable settings file is logged and replaced by defaults.
    pub fn global() -> &'static ProfileCache {
        static GLOBAL: OnceLock<ProfileCache> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            let settings = Settings::from_env().unwrap_or_else(|err| {
                log::warn!("using default settings: {}", err);
                Settings::default()
            });
            settings.apply_locale();
            ProfileCache::new(settings)
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Find a profile file
    ///
    /// Order: `name` itself when it is a path, each search path, the
    /// current directory.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() {
            return None;
        }
        let path = Path::new(name);
        if (path.is_absolute() || path.components().count() > 1) && path.is_file() {
            return Some(path.to_path_buf());
        }

        let found = self
            .settings
            .search_paths
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file());
        if found.is_some() {
            return found;
        }

        std::env::current_dir()
            .ok()
            .map(|cwd| cwd.join(name))
            .filter(|candidate| candidate.is_file())
    }

    pub(crate) fn cached_file(&self, path: &Path, modified: Option<SystemTime>) -> Option<Arc<Profile>> {
        let files = self.files.lock().unwrap_or_else(PoisonError::into_inner);
        files
            .get(path)
            .filter(|entry| entry.modified == modified)
            .map(|entry| Arc::clone(&entry.profile))
    }

    pub(crate) fn store_file(&self, path: PathBuf, modified: Option<SystemTime>, profile: Arc<Profile>) {
        let mut files = self.files.lock().unwrap_or_else(PoisonError::into_inner);
        files.insert(path, FileEntry { modified, profile });
    }

    pub(crate) fn role_profile(&self, role: StandardRole, file_name: &str) -> Option<Arc<Profile>> {
        let roles = self.roles.lock().unwrap_or_else(PoisonError::into_inner);
        roles
            .get(role.index())?
            .as_ref()
            .filter(|entry| entry.file_name == file_name)
            .map(|entry| Arc::clone(&entry.profile))
    }

    pub(crate) fn store_role(&self, role: StandardRole, file_name: String, profile: Arc<Profile>) {
        let mut roles = self.roles.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = roles.get_mut(role.index()) {
            *slot = Some(RoleEntry { file_name, profile });
        }
    }

    /// Token honouring the configured scan timeout
    pub fn scan_token(&self) -> CancelToken {
        match self.settings.scan_timeout() {
            Some(timeout) => CancelToken::with_timeout(timeout),
            None => CancelToken::new(),
        }
    }

    /// Every profile file below the search paths, de-duplicated by
    /// canonical path
    pub fn list_files(&self) -> Vec<PathBuf> {
        let mut files = BTreeSet::new();
        for dir in &self.settings.search_paths {
            // symlink loops surface as walk errors and are skipped
            for entry in WalkDir::new(dir).follow_links(true) {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        log::trace!("skipping path below {}: {}", dir.display(), err);
                        continue;
                    }
                };
                if !entry.file_type().is_file() || !has_profile_extension(entry.path()) {
                    continue;
                }
                if let Ok(canonical) = fs::canonicalize(entry.path()) {
                    files.insert(canonical);
                }
            }
        }
        files.into_iter().collect()
    }

    /// Rebuild the scan cache if the file count changed
    pub fn refresh(&self) -> Result<()> {
        self.refresh_with(&self.scan_token())
    }

    /// [`refresh`](Self::refresh) with an explicit cancellation token
    ///
    /// On [`Error::Cancelled`] the previous scan cache stays in place.
    pub fn refresh_with(&self, token: &CancelToken) -> Result<()> {
        let mut scan = self.scan.lock().unwrap_or_else(PoisonError::into_inner);
        if token.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let files = self.list_files();
        if scan.file_count == Some(files.len()) {
            return Ok(());
        }
        log::info!("rebuilding profile cache from {} files", files.len());

        let options = LoadOptions {
            no_cache_write: true,
            ..LoadOptions::default()
        };
        let loaded = files
            .par_iter()
            .map(|path| {
                if token.is_cancelled() {
                    return Err(Error::Cancelled);
                }
                Ok(self.load_for_scan(path, options))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut profiles: Vec<(String, Arc<Profile>)> = loaded
            .into_iter()
            .flatten()
            .map(|p| (p.get_text(TextKind::Description).to_lowercase(), p))
            .collect();
        profiles.sort_by(|a, b| a.0.cmp(&b.0));

        let mut list = RefContainer::new(ParentKind::ProfileSet);
        list.set_name("scan cache");
        for (_, profile) in profiles {
            list.move_in(profile, None)?;
        }

        log::debug!("profile cache holds {} profiles", list.count());
        scan.profiles = list;
        scan.file_count = Some(files.len());
        Ok(())
    }

    fn load_for_scan(&self, path: &Path, options: LoadOptions) -> Option<Arc<Profile>> {
        let modified = fs::metadata(path).and_then(|m| m.modified()).ok();
        if let Some(profile) = self.cached_file(path, modified) {
            return Some(profile);
        }
        match Profile::load_path(path, options) {
            Ok(profile) => Some(Arc::new(profile)),
            Err(err) => {
                log::warn!("skipping {}: {}", path.display(), err);
                None
            }
        }
    }

    /// Drop the scan cache so the next access rescans
    pub fn clear(&self) {
        let mut scan = self.scan.lock().unwrap_or_else(PoisonError::into_inner);
        scan.file_count = None;
        scan.profiles.clear();
    }

    /// Every profile on the search path, sorted by description
    pub fn profiles(&self) -> Result<Vec<Arc<Profile>>> {
        self.refresh()?;
        let scan = self.scan.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(scan.profiles.iter().cloned().collect())
    }

    /// First profile on the search path with content hash `hash`
    pub fn find_by_hash(&self, hash: &ProfileHash) -> Result<Option<Arc<Profile>>> {
        Ok(self
            .profiles()?
            .into_iter()
            .find(|profile| profile.get_hash() == *hash))
    }
}

fn has_profile_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| PROFILE_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
}
