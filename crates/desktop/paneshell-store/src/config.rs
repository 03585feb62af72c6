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

use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq, SmartDefault, Serialize, Deserialize, bon::Builder)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    #[default(_code = "PathBuf::from(\"paneshell.db\")")]
    #[builder(default = PathBuf::from("paneshell.db"), into, getter)]
    pub db_path: PathBuf,

    /// Maximum number of connections in the pool
    #[default = 4]
    #[builder(default = 4, getter)]
    pub max_connections: u32,

    /// Minimum number of idle connections
    #[default = 1]
    #[builder(default = 1, getter)]
    pub min_connections: u32,

    /// Seconds to wait for a pooled connection
    #[default = 30]
    #[builder(default = 30, getter)]
    pub connect_timeout_secs: u64,

    /// Seconds an idle connection is kept before it is closed, 0 keeps it
    /// forever
    #[default = 600]
    #[builder(default = 600, getter)]
    pub idle_timeout_secs: u64,
}

impl DatabaseConfig {
    pub const fn connect_timeout(&self) -> Duration { Duration::from_secs(self.connect_timeout_secs) }

    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_timeout_secs > 0).then(|| Duration::from_secs(self.idle_timeout_secs))
    }
}
