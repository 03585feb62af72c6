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

//! Wires configuration, storage and the shell together.
//!
//! An [`App`] owns the layout backend. Each [`ShellSession`] is one mount
//! of the shell: it paints with defaults, restores the saved layout once
//! and persists every settled resize.

mod config;
mod err;

use std::sync::Arc;

use paneshell_store::{
    DBStore, LayoutBackend, LayoutRecord, LayoutStore, MemoryBackend, StorageKey,
};
use paneshell_ui::{
    AppShell, Frame, PanelId, PanelLayoutController, RegionTree, RestoreOutcome,
};

pub use crate::{
    config::AppConfig,
    err::{Error, Result},
};
pub use paneshell_ui::ShellComponents;

/// Where layout records are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    /// SQLite file from the database configuration
    #[default]
    Durable,
    /// Process memory, forgotten on exit
    Ephemeral,
}

type SharedBackend = Arc<dyn LayoutBackend>;

/// Represents the opened application
pub struct App {
    config:  AppConfig,
    db:      Option<DBStore>,
    backend: SharedBackend,
}

impl App {
    /// Opens the layout backend selected by `mode`.
    pub async fn open(config: AppConfig, mode: StorageMode) -> Result<Self> {
        let (db, backend): (Option<DBStore>, SharedBackend) = match mode {
            StorageMode::Durable => {
                let db = DBStore::new(&config.database).await?;
                let backend = Arc::new(db.kv_store());
                (Some(db), backend)
            }
            StorageMode::Ephemeral => (None, Arc::new(MemoryBackend::default())),
        };

        tracing::info!(
            ?mode,
            db_path = %config.database.db_path.display(),
            "opened paneshell storage"
        );

        Ok(Self {
            config,
            db,
            backend,
        })
    }

    pub const fn config(&self) -> &AppConfig { &self.config }

    /// Store for the shell's top-level split.
    pub fn layout_store(&self) -> LayoutStore<SharedBackend> {
        LayoutStore::new(self.backend.clone(), StorageKey::MAIN_PANELS)
    }

    /// Currently saved top-level layout, if any.
    pub async fn saved_layout(&self) -> Option<LayoutRecord> { self.layout_store().load().await }

    /// Mounts a fresh shell with `components` filling the renderer slots.
    pub fn session(&self, components: ShellComponents) -> ShellSession {
        ShellSession {
            shell:      AppShell::new(self.config.shell, components),
            controller: PanelLayoutController::mount(self.layout_store(), RegionTree::shell()),
        }
    }

    /// Releases the database pool.
    pub async fn close(self) {
        if let Some(db) = self.db {
            db.close().await;
        }
    }
}

/// One mounted shell.
pub struct ShellSession {
    shell:      AppShell,
    controller: PanelLayoutController<SharedBackend>,
}

impl ShellSession {
    /// Renders the shell with the current sizes.
    pub fn paint(&self) -> Frame { self.shell.render(&self.controller) }

    /// Runs the one-shot restoration that follows the first paint.
    pub async fn restore(&mut self) -> RestoreOutcome { self.controller.restore().await }

    /// Settles a resize of the top-level panels to `sizes`.
    pub async fn resize(&mut self, sizes: Vec<f64>) -> bool {
        self.controller.on_layout(sizes).await
    }

    /// Drags top-level handle `handle` by `delta` percent and settles it.
    pub async fn drag(&mut self, handle: usize, delta: f64) -> Option<Vec<f64>> {
        self.controller.drag(handle, delta).await
    }

    /// Drags the handle between editor and console. Not persisted.
    pub fn drag_console(&mut self, delta: f64) -> Option<Vec<f64>> {
        self.controller.drag_nested(PanelId::EditorArea, 0, delta)
    }

    pub const fn controller(&self) -> &PanelLayoutController<SharedBackend> { &self.controller }
}

#[cfg(test)]
mod tests {
    use paneshell_store::DatabaseConfig;
    use paneshell_ui::{LayoutPhase, Region};
    use tempfile::TempDir;

    use super::*;

    fn durable_config(tempdir: &TempDir) -> AppConfig {
        AppConfig::builder()
            .database(
                DatabaseConfig::builder()
                    .db_path(tempdir.path().join("shell.db"))
                    .build(),
            )
            .build()
    }

    #[tokio::test]
    async fn layout_persists_across_app_restarts() {
        let tempdir = TempDir::new().unwrap();

        let app = App::open(durable_config(&tempdir), StorageMode::Durable)
            .await
            .unwrap();
        let mut session = app.session(ShellComponents::default());
        assert_eq!(session.restore().await, RestoreOutcome::Defaults);
        assert!(session.resize(vec![20.0, 60.0, 20.0]).await);
        app.close().await;

        let app = App::open(durable_config(&tempdir), StorageMode::Durable)
            .await
            .unwrap();
        assert_eq!(
            app.saved_layout().await,
            Some(LayoutRecord::from(vec![20.0, 60.0, 20.0]))
        );

        let mut session = app.session(ShellComponents::default());
        let first_paint = session.paint();
        assert_eq!(session.controller().phase(), LayoutPhase::Initial);
        assert_eq!(
            session.restore().await,
            RestoreOutcome::Applied(vec![20.0, 60.0, 20.0])
        );
        assert_ne!(
            first_paint.area(Region::Panel(PanelId::Drawer)),
            session.paint().area(Region::Panel(PanelId::Drawer))
        );
        app.close().await;
    }

    #[tokio::test]
    async fn ephemeral_storage_starts_empty_every_time() {
        let app = App::open(AppConfig::default(), StorageMode::Ephemeral)
            .await
            .unwrap();
        let mut session = app.session(ShellComponents::default());
        session.restore().await;
        session.drag(0, 5.0).await.unwrap();
        assert_eq!(
            app.saved_layout().await,
            Some(LayoutRecord::from(vec![20.0, 65.0, 15.0]))
        );

        let other = App::open(AppConfig::default(), StorageMode::Ephemeral)
            .await
            .unwrap();
        assert_eq!(other.saved_layout().await, None);
    }

    #[tokio::test]
    async fn console_drag_stays_in_memory() {
        let app = App::open(AppConfig::default(), StorageMode::Ephemeral)
            .await
            .unwrap();
        let mut session = app.session(ShellComponents::default());
        assert_eq!(session.drag_console(-10.0), Some(vec![40.0, 60.0]));
        assert_eq!(app.saved_layout().await, None);
    }
}
