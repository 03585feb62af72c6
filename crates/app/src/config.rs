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

use std::path::{Path, PathBuf};

use paneshell_common_telemetry::logging::LoggingOptions;
use paneshell_store::DatabaseConfig;
use paneshell_ui::ShellConfig;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use snafu::ResultExt;

use crate::err::*;

/// Application configuration, read from `settings.toml`.
///
/// ```toml
/// [database]
/// db_path = "paneshell.db"
///
/// [logging]
/// level = "info,paneshell_store=debug"
///
/// [shell]
/// width = 160
/// height = 40
/// ```
#[derive(Debug, Clone, PartialEq, Eq, SmartDefault, Serialize, Deserialize, bon::Builder)]
#[serde(default)]
pub struct AppConfig {
    /// Database configuration
    #[builder(default)]
    pub database: DatabaseConfig,
    /// Logging configuration
    #[builder(default)]
    pub logging:  LoggingOptions,
    /// Shell chrome dimensions
    #[builder(default)]
    pub shell:    ShellConfig,
}

impl AppConfig {
    /// Reads the config at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).context(ReadConfigSnafu { path })?;
        toml::from_str(&text).context(ParseConfigSnafu { path })
    }

    /// Anchors a relative database path under `db_dir`.
    #[must_use]
    pub fn resolve_paths(mut self, db_dir: &Path) -> Self {
        if self.database.db_path.is_relative() {
            self.database.db_path = db_dir.join(&self.database.db_path);
        }
        self
    }

    pub fn db_path(&self) -> &PathBuf { &self.database.db_path }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::{NamedTempFile, TempDir};

    use super::*;

    #[test]
    fn missing_file_is_default() {
        let tempdir = TempDir::new().unwrap();
        let config = AppConfig::load(&tempdir.path().join("settings.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[shell]\nwidth = 160\n\n[database]\ndb_path = \"/var/lib/shell.db\"\n"
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.shell.width, 160);
        assert_eq!(config.shell.height, ShellConfig::default().height);
        assert_eq!(config.db_path(), &PathBuf::from("/var/lib/shell.db"));
        assert_eq!(config.logging, LoggingOptions::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[shell\nwidth = ").unwrap();

        assert!(matches!(
            AppConfig::load(file.path()),
            Err(Error::ParseConfig { .. })
        ));
    }

    #[test]
    fn relative_database_path_is_anchored() {
        let config = AppConfig::default().resolve_paths(Path::new("/data/db"));
        assert_eq!(config.db_path(), &PathBuf::from("/data/db/paneshell.db"));

        let config = AppConfig::builder()
            .database(DatabaseConfig::builder().db_path("/abs/x.db").build())
            .build()
            .resolve_paths(Path::new("/data/db"));
        assert_eq!(config.db_path(), &PathBuf::from("/abs/x.db"));
    }
}
