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

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use snafu::ResultExt;
use sqlx::SqlitePool;

use crate::{err::*, layout::LayoutBackend};

/// Key-value store backed by SQLite
///
/// All values are stored as JSON text
#[derive(Clone, Debug)]
pub struct KVStore {
    pool: SqlitePool,
}

impl KVStore {
    /// Create a new KV store from a SQLite pool
    pub(crate) const fn new(pool: SqlitePool) -> Self { Self { pool } }

    /// Store already-encoded text under `key`, replacing any previous value.
    pub async fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query("INSERT OR REPLACE INTO kv_table (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Fetch the stored text for `key` without decoding it.
    pub async fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_table WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(value,)| value))
    }

    /// Set a key-value pair
    ///
    /// The value will be serialized to JSON before storage
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let value_json = serde_json::to_string(value).context(CodecSnafu)?;
        self.set_raw(key, &value_json).await
    }

    /// Get a value by key
    ///
    /// Returns `None` if the key does not exist
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get_raw(key).await? {
            Some(value_json) => {
                let value = serde_json::from_str(&value_json).context(CodecSnafu)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Remove a key-value pair
    pub async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv_table WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl LayoutBackend for KVStore {
    async fn read(&self, key: &str) -> Result<Option<String>> { self.get_raw(key).await }

    async fn write(&self, key: &str, value: String) -> Result<()> {
        self.set_raw(key, &value).await
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    use crate::{
        config::DatabaseConfig,
        db::DBStore,
        layout::{LayoutRecord, LayoutStore, StorageKey},
    };

    #[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
    struct Split {
        name:  String,
        sizes: Vec<f64>,
    }

    async fn open(tempdir: &TempDir) -> DBStore {
        let config = DatabaseConfig::builder()
            .db_path(tempdir.path().join("test.db"))
            .build();
        DBStore::new(&config).await.unwrap()
    }

    #[tokio::test]
    async fn kv_store_test() {
        let tempdir = TempDir::new().unwrap();
        let kv = open(&tempdir).await.kv_store();

        kv.set("str_key", &"hello".to_string()).await.unwrap();
        assert_eq!(kv.get::<String>("str_key").await.unwrap().unwrap(), "hello");
        assert_eq!(kv.get::<String>("nonexistent").await.unwrap(), None);

        let split = Split {
            name:  "main-panels".to_string(),
            sizes: vec![15.0, 70.0, 15.0],
        };
        kv.set("split_key", &split).await.unwrap();
        assert_eq!(kv.get::<Split>("split_key").await.unwrap().unwrap(), split);

        kv.remove("str_key").await.unwrap();
        assert_eq!(kv.get::<String>("str_key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn kv_store_overwrite_test() {
        let tempdir = TempDir::new().unwrap();
        let kv = open(&tempdir).await.kv_store();

        kv.set("key", &"first").await.unwrap();
        kv.set("key", &"second").await.unwrap();
        assert_eq!(kv.get::<String>("key").await.unwrap().unwrap(), "second");
    }

    #[tokio::test]
    async fn typed_get_reports_garbage_as_codec_error() {
        let tempdir = TempDir::new().unwrap();
        let kv = open(&tempdir).await.kv_store();

        kv.set_raw("key", "not json").await.unwrap();
        assert!(matches!(
            kv.get::<Vec<f64>>("key").await,
            Err(crate::Error::Codec { .. })
        ));
    }

    #[tokio::test]
    async fn layout_record_survives_reopen() {
        let tempdir = TempDir::new().unwrap();
        let record = LayoutRecord::from(vec![22.5, 55.0, 22.5]);

        {
            let db = open(&tempdir).await;
            let store = LayoutStore::new(db.kv_store(), StorageKey::MAIN_PANELS);
            store.save(&record).await;
            db.close().await;
        }

        let db = open(&tempdir).await;
        assert_eq!(
            db.kv_store().get_raw("editor-panel-layout").await.unwrap().as_deref(),
            Some("[22.5,55.0,22.5]")
        );
        let store = LayoutStore::new(db.kv_store(), StorageKey::MAIN_PANELS);
        assert_eq!(store.load().await, Some(record));
    }
}
