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

use snafu::ResultExt;
use sqlx::{
    Sqlite, SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::{config::DatabaseConfig, err::*, kv::KVStore};

/// Database store that manages the SQLite connection pool
#[derive(Clone, Debug)]
pub struct DBStore {
    pool: SqlitePool,
}

impl DBStore {
    /// Opens (creating if missing) the database described by `config` and
    /// brings its schema up to date.
    #[tracing::instrument(level = "trace", skip(config), fields(path = %config.db_path.display()), err)]
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let db_path = config.db_path.as_path();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).context(CreateDirSnafu {
                path: parent.display().to_string(),
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout())
            .idle_timeout(config.idle_timeout())
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::trace!("Initialized DBStore with path: {}", db_path.display());

        Ok(Self { pool })
    }

    /// Get a KV store instance
    pub fn kv_store(&self) -> KVStore { KVStore::new(self.pool.clone()) }

    /// Acquire a connection from the pool
    pub async fn acquire(&self) -> Result<sqlx::pool::PoolConnection<Sqlite>> {
        Ok(self.pool.acquire().await?)
    }

    /// Closes every pooled connection.
    pub async fn close(&self) { self.pool.close().await; }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn creates_missing_parent_directories() {
        let tempdir = TempDir::new().unwrap();
        let db_path = tempdir.path().join("nested").join("db").join("shell.db");
        let config = DatabaseConfig::builder().db_path(db_path.clone()).build();

        let db = DBStore::new(&config).await.unwrap();
        assert!(db_path.exists());

        let mut conn = db.acquire().await.unwrap();
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM kv_table")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn reopening_keeps_the_schema() {
        let tempdir = TempDir::new().unwrap();
        let config = DatabaseConfig::builder()
            .db_path(tempdir.path().join("shell.db"))
            .build();

        let db = DBStore::new(&config).await.unwrap();
        db.kv_store().set("key", &1_u8).await.unwrap();
        db.close().await;

        let db = DBStore::new(&config).await.unwrap();
        assert_eq!(db.kv_store().get::<u8>("key").await.unwrap(), Some(1));
    }
}
