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

//! Persistence of user-adjusted panel sizes.
//!
//! A [`LayoutStore`] owns one [`StorageKey`] slot in some [`LayoutBackend`]
//! and moves a [`LayoutRecord`] in and out of it. Persistence is best
//! effort: [`LayoutStore::load`] maps every failure to "nothing saved" and
//! [`LayoutStore::save`] logs write failures instead of returning them.

use std::{fmt, ops::Deref, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::err::Result;

/// Ordered panel sizes, one percentage (0-100) per sibling panel.
///
/// Serialized as a bare JSON array such as `[15,70,15]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutRecord(Vec<f64>);

impl LayoutRecord {
    pub const fn new(sizes: Vec<f64>) -> Self { Self(sizes) }

    pub fn sizes(&self) -> &[f64] { &self.0 }

    pub fn into_sizes(self) -> Vec<f64> { self.0 }
}

impl From<Vec<f64>> for LayoutRecord {
    fn from(sizes: Vec<f64>) -> Self { Self(sizes) }
}

impl Deref for LayoutRecord {
    type Target = [f64];

    fn deref(&self) -> &[f64] { &self.0 }
}

/// Name of the durable slot a layout record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StorageKey(&'static str);

impl StorageKey {
    /// Slot of the shell's top-level horizontal split.
    pub const MAIN_PANELS: Self = Self("editor-panel-layout");

    pub const fn new(key: &'static str) -> Self { Self(key) }

    pub const fn as_str(&self) -> &'static str { self.0 }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.0) }
}

/// A string cell keyed by name. Implemented by the SQLite
/// [`KVStore`](crate::kv::KVStore) and the in-process
/// [`MemoryBackend`](crate::memory::MemoryBackend).
#[async_trait]
pub trait LayoutBackend: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<String>>;

    async fn write(&self, key: &str, value: String) -> Result<()>;
}

#[async_trait]
impl<B: LayoutBackend + ?Sized> LayoutBackend for Arc<B> {
    async fn read(&self, key: &str) -> Result<Option<String>> { (**self).read(key).await }

    async fn write(&self, key: &str, value: String) -> Result<()> {
        (**self).write(key, value).await
    }
}

/// Reads and writes the single layout record at `key`.
#[derive(Debug, Clone)]
pub struct LayoutStore<B> {
    backend: B,
    key:     StorageKey,
}

impl<B: LayoutBackend> LayoutStore<B> {
    pub const fn new(backend: B, key: StorageKey) -> Self { Self { backend, key } }

    pub const fn key(&self) -> StorageKey { self.key }

    pub const fn backend(&self) -> &B { &self.backend }

    /// Returns the saved record, or `None` when nothing usable is stored.
    ///
    /// Read failures and text that is not a JSON array of numbers both come
    /// back as `None`.
    pub async fn load(&self) -> Option<LayoutRecord> {
        let raw = match self.backend.read(self.key.as_str()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %self.key, "no saved layout");
                return None;
            }
            Err(error) => {
                tracing::warn!(key = %self.key, %error, "failed to read saved layout");
                return None;
            }
        };

        match serde_json::from_str::<LayoutRecord>(&raw) {
            Ok(record) => {
                tracing::debug!(key = %self.key, sizes = ?record.sizes(), "loaded saved layout");
                Some(record)
            }
            Err(error) => {
                tracing::warn!(key = %self.key, %error, "ignoring malformed saved layout");
                None
            }
        }
    }

    /// Overwrites the slot with `record`. Failures are logged and dropped.
    pub async fn save(&self, record: &LayoutRecord) {
        let encoded = match serde_json::to_string(record) {
            Ok(encoded) => encoded,
            Err(error) => {
                tracing::warn!(key = %self.key, %error, "failed to encode layout");
                return;
            }
        };

        match self.backend.write(self.key.as_str(), encoded).await {
            Ok(()) => tracing::trace!(key = %self.key, sizes = ?record.sizes(), "saved layout"),
            Err(error) => tracing::warn!(key = %self.key, %error, "failed to save layout"),
        }
    }
}
