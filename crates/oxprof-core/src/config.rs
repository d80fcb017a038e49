//! Settings
//!
//! Profile search paths, the file names configured for standard roles
//! and the locale used for implicit text selection. Settings are plain
//! data: load them from JSON, layer environment overrides on top, and
//! hand them to a [`crate::ProfileCache`].

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::role::StandardRole;

/// Sub directory below each XDG data dir holding ICC profiles
const ICC_SUBDIR: &str = "color/icc";

/// Environment variable naming a JSON settings file
pub const CONFIG_ENV: &str = "OXPROF_CONFIG";

/// Environment variable with extra search directories (`:` separated)
pub const PATH_ENV: &str = "OXPROF_PATH";

/// Profile lookup settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ordered profile directories
    pub search_paths: Vec<PathBuf>,
    /// Install target for new profiles
    pub user_path: Option<PathBuf>,
    /// Role key (`"editing_rgb"`) to profile file name
    pub roles: BTreeMap<String, String>,
    /// `"de_DE"` style locale override
    pub locale: Option<String>,
    /// Deadline for a full profile scan
    pub scan_timeout_ms: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        // XDG_DATA_HOME, else ~/.local/share
        let data_home = dirs_next::data_dir();
        let data_dirs = env::var("XDG_DATA_DIRS")
            .unwrap_or_else(|_| "/usr/local/share:/usr/share".to_string());

        let mut search_paths: Vec<PathBuf> = Vec::new();
        if let Some(home) = &data_home {
            search_paths.push(home.join(ICC_SUBDIR));
        }
        search_paths.extend(
            data_dirs
                .split(':')
                .filter(|d| !d.is_empty())
                .map(|d| Path::new(d).join(ICC_SUBDIR)),
        );
        if let Some(home) = dirs_next::home_dir() {
            search_paths.push(home.join(".color/icc"));
        }

        Self {
            search_paths,
            user_path: data_home.map(|h| h.join(ICC_SUBDIR)),
            roles: StandardRole::ALL
                .iter()
                .map(|role| (role.key().to_string(), role.default_file().to_string()))
                .collect(),
            locale: None,
            scan_timeout_ms: None,
        }
    }
}

impl Settings {
    /// Settings without search paths or roles
    pub fn empty() -> Self {
        Self {
            search_paths: Vec::new(),
            user_path: None,
            roles: BTreeMap::new(),
            locale: None,
            scan_timeout_ms: None,
        }
    }

    /// Read a JSON settings file; missing fields keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Defaults, then `OXPROF_CONFIG`, then `OXPROF_PATH`
    pub fn from_env() -> Result<Self> {
        let mut settings = match env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Ok(extra) = env::var(PATH_ENV) {
            let mut paths: Vec<PathBuf> = extra
                .split(':')
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
                .collect();
            paths.append(&mut settings.search_paths);
            settings.search_paths = paths;
        }

        Ok(settings)
    }

    /// Configured file name for `role`
    pub fn role_file(&self, role: StandardRole) -> Option<&str> {
        self.roles
            .get(role.key())
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }

    pub fn set_role_file(&mut self, role: StandardRole, file_name: impl Into<String>) {
        self.roles.insert(role.key().to_string(), file_name.into());
    }

    pub fn scan_timeout(&self) -> Option<Duration> {
        self.scan_timeout_ms.map(Duration::from_millis)
    }

    /// Make the locale override the process locale
    pub fn apply_locale(&self) {
        if let Some(locale) = &self.locale {
            set_process_locale(Some(Locale::parse(locale)));
        }
    }
}

/// Language and country pair, empty when unknown
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Locale {
    pub language: String,
    pub country: String,
}

impl Locale {
    /// Parse `"de_DE.UTF-8@euro"` style names
    pub fn parse(name: &str) -> Self {
        let name = name.split(['.', '@']).next().unwrap_or("");
        if name == "C" || name == "POSIX" {
            return Self::default();
        }
        let (language, country) = name.split_once('_').unwrap_or((name, ""));
        Self {
            language: language.to_string(),
            country: country.to_string(),
        }
    }
}

static LOCALE_OVERRIDE: RwLock<Option<Locale>> = RwLock::new(None);

/// Override the locale reported by [`process_locale`]; `None` restores
/// the environment lookup
pub fn set_process_locale(locale: Option<Locale>) {
    let mut guard = LOCALE_OVERRIDE
        .write()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    *guard = locale;
}

/// Locale for implicit text selection
///
/// An override set through [`set_process_locale`] wins; otherwise the
/// first non-empty of `LC_ALL`, `LC_MESSAGES` and `LANG` is used.
pub fn process_locale() -> Locale {
    let guard = LOCALE_OVERRIDE
        .read()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    if let Some(locale) = guard.as_ref() {
        return locale.clone();
    }
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find(|v| !v.is_empty())
        .map(|v| Locale::parse(&v))
        .unwrap_or_default()
}
