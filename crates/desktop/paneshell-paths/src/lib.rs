// Copyright 2025 Crrow
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Where paneshell keeps its files.
//!
//! Every directory is resolved once and cached. A custom data directory can
//! be installed with [`set_custom_data_dir`] before the first lookup, which
//! is how the CLI's `--data-dir` flag and the tests keep state out of the
//! user's real profile.

use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};

const APP_DIR_NAME: &str = "paneshell";

static CUSTOM_DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Resolved data directory.
/// On macOS this is `~/Library/Application Support/paneshell`.
/// On Linux/FreeBSD this is `$XDG_DATA_HOME/paneshell`.
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Resolved config directory.
/// On Linux/FreeBSD this is `$XDG_CONFIG_HOME/paneshell`.
static CONFIG_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Returns the path to the user's home directory.
pub fn home_dir() -> &'static PathBuf {
    static HOME_DIR: OnceLock<PathBuf> = OnceLock::new();
    HOME_DIR.get_or_init(|| dirs::home_dir().unwrap_or_else(std::env::temp_dir))
}

/// Returns the configuration directory.
pub fn config_dir() -> &'static PathBuf {
    CONFIG_DIR.get_or_init(|| {
        if let Some(custom_dir) = CUSTOM_DATA_DIR.get() {
            return custom_dir.join("config");
        }
        dirs::config_dir()
            .unwrap_or_else(|| home_dir().join(".config"))
            .join(APP_DIR_NAME)
    })
}

/// Returns the data directory.
pub fn data_dir() -> &'static PathBuf {
    DATA_DIR.get_or_init(|| {
        if let Some(custom_dir) = CUSTOM_DATA_DIR.get() {
            return custom_dir.clone();
        }
        dirs::data_local_dir()
            .unwrap_or_else(|| home_dir().join(".local").join("share"))
            .join(APP_DIR_NAME)
    })
}

/// Overrides the data directory for the rest of the process.
///
/// Relative paths are canonicalized when possible and the directory is
/// created if missing.
///
/// # Panics
///
/// Panics if called after [`data_dir`] or [`config_dir`] has been resolved,
/// or if the directory cannot be created.
pub fn set_custom_data_dir<P: ?Sized + AsRef<Path>>(dir: &P) -> &'static PathBuf {
    assert!(
        DATA_DIR.get().is_none() && CONFIG_DIR.get().is_none(),
        "set_custom_data_dir called after data_dir or config_dir was initialized"
    );
    CUSTOM_DATA_DIR.get_or_init(|| {
        let mut path = dir.as_ref().to_path_buf();
        if path.is_relative()
            && let Ok(abs) = path.canonicalize()
        {
            path = abs;
        }
        std::fs::create_dir_all(&path).unwrap_or_else(|e| {
            panic!(
                "failed to create custom data directory {}: {e}",
                path.display()
            )
        });
        path
    })
}

/// Returns the logs directory.
pub fn logs_dir() -> &'static PathBuf {
    static LOGS_DIR: OnceLock<PathBuf> = OnceLock::new();
    LOGS_DIR.get_or_init(|| {
        if cfg!(target_os = "macos") && CUSTOM_DATA_DIR.get().is_none() {
            home_dir().join("Library/Logs/paneshell")
        } else {
            data_dir().join("logs")
        }
    })
}

/// Returns the database directory.
pub fn database_dir() -> &'static PathBuf {
    static DATABASE_DIR: OnceLock<PathBuf> = OnceLock::new();
    DATABASE_DIR.get_or_init(|| data_dir().join("db"))
}

/// Returns the path to `settings.toml`.
pub fn settings_file() -> &'static PathBuf {
    static SETTINGS_FILE: OnceLock<PathBuf> = OnceLock::new();
    SETTINGS_FILE.get_or_init(|| config_dir().join("settings.toml"))
}
