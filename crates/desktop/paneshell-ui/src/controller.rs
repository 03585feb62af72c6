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

//! Lifecycle of the shell's panel sizes.
//!
//! ```text
//! Initial ──restore()──▶ Restoring ──▶ Restored ──on_layout()──▶ Live
//!    │                                                           ▲
//!    └──────────────────────────on_layout()──────────────────────┘
//! ```
//!
//! A controller is mounted with default sizes so the first paint never
//! waits on storage. The host then runs [`PanelLayoutController::restore`]
//! once; every settled resize afterwards goes through
//! [`PanelLayoutController::on_layout`] and is written back.

use std::collections::HashMap;

use paneshell_store::{LayoutBackend, LayoutRecord, LayoutStore};

use crate::region::{PanelId, RegionTree};

/// Where a controller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum LayoutPhase {
    /// Mounted, showing defaults
    Initial,
    /// Reading the saved layout
    Restoring,
    /// Restoration finished, showing either the saved layout or defaults
    Restored,
    /// At least one user resize has settled
    Live,
}

/// Holds [`LayoutPhase::Restoring`] for the duration of the load. Dropping
/// it, including when the restore future is cancelled, settles the phase
/// on [`LayoutPhase::Restored`].
struct RestoringPhase<'a>(&'a mut LayoutPhase);

impl<'a> RestoringPhase<'a> {
    fn enter(phase: &'a mut LayoutPhase) -> Self {
        *phase = LayoutPhase::Restoring;
        Self(phase)
    }
}

impl Drop for RestoringPhase<'_> {
    fn drop(&mut self) { *self.0 = LayoutPhase::Restored; }
}

/// Result of [`PanelLayoutController::restore`].
#[derive(Debug, Clone, PartialEq)]
pub enum RestoreOutcome {
    /// The saved sizes now drive the layout
    Applied(Vec<f64>),
    /// Nothing usable was saved, defaults stay
    Defaults,
    /// Restoration already happened, or a resize beat it
    Skipped,
}

/// Owns the region tree and keeps its top-level sizes in step with the
/// layout store.
#[derive(Debug)]
pub struct PanelLayoutController<B> {
    store:  LayoutStore<B>,
    tree:   RegionTree,
    sizes:  Vec<f64>,
    nested: HashMap<PanelId, Vec<f64>>,
    phase:  LayoutPhase,
}

impl<B: LayoutBackend> PanelLayoutController<B> {
    /// Builds the controller in [`LayoutPhase::Initial`], every group on its
    /// default sizes. Storage is not touched.
    pub fn mount(store: LayoutStore<B>, tree: RegionTree) -> Self {
        let sizes = tree.root().default_sizes();
        let nested = tree
            .root()
            .nested_ids()
            .into_iter()
            .filter_map(|id| tree.group(id).map(|group| (id, group.default_sizes())))
            .collect();

        tracing::debug!(key = %store.key(), ?sizes, "mounted panel layout");

        Self {
            store,
            tree,
            sizes,
            nested,
            phase: LayoutPhase::Initial,
        }
    }

    /// Applies the saved layout, at most once per controller.
    ///
    /// A saved record replaces the defaults only if it has one finite,
    /// non-negative size per top-level panel. Anything else, including a
    /// missing or unreadable record, leaves the defaults in place.
    pub async fn restore(&mut self) -> RestoreOutcome {
        if self.phase != LayoutPhase::Initial {
            tracing::trace!(phase = %self.phase, "restore skipped");
            return RestoreOutcome::Skipped;
        }

        let record = {
            let _restoring = RestoringPhase::enter(&mut self.phase);
            self.store.load().await
        };

        match record {
            Some(record) if self.tree.root().accepts(&record) => {
                tracing::debug!(sizes = ?record.sizes(), "restored panel layout");
                self.sizes = record.into_sizes();
                RestoreOutcome::Applied(self.sizes.clone())
            }
            Some(record) => {
                tracing::warn!(
                    sizes = ?record.sizes(),
                    expected = self.tree.root().len(),
                    "saved layout does not fit the panels, using defaults"
                );
                RestoreOutcome::Defaults
            }
            None => RestoreOutcome::Defaults,
        }
    }

    /// Handles a settled resize of the top-level group and persists it.
    ///
    /// Returns `false` and changes nothing when `sizes` does not have one
    /// finite, non-negative value per top-level panel.
    pub async fn on_layout(&mut self, sizes: Vec<f64>) -> bool {
        if !self.tree.root().accepts(&sizes) {
            tracing::warn!(?sizes, "ignoring layout change for a different panel count");
            return false;
        }

        self.sizes = sizes;
        self.phase = LayoutPhase::Live;
        self.store.save(&LayoutRecord::new(self.sizes.clone())).await;
        true
    }

    /// Handles a settled resize of a nested group. Nested sizes live in
    /// memory only and reset on the next mount.
    pub fn on_nested_layout(&mut self, group: PanelId, sizes: Vec<f64>) -> bool {
        let Some(split) = self.tree.group(group) else {
            return false;
        };
        if !split.accepts(&sizes) {
            tracing::warn!(%group, ?sizes, "ignoring nested layout change");
            return false;
        }
        self.nested.insert(group, sizes);
        true
    }

    /// Drags top-level handle `handle` by `delta` percent and settles the
    /// result as a resize. Returns the new sizes.
    pub async fn drag(&mut self, handle: usize, delta: f64) -> Option<Vec<f64>> {
        let sizes = self.tree.root().drag(&self.sizes, handle, delta)?;
        self.on_layout(sizes.clone()).await.then_some(sizes)
    }

    /// Drags a handle inside the nested group held by `group`.
    pub fn drag_nested(&mut self, group: PanelId, handle: usize, delta: f64) -> Option<Vec<f64>> {
        let current = self.nested.get(&group)?;
        let sizes = self.tree.group(group)?.drag(current, handle, delta)?;
        self.on_nested_layout(group, sizes.clone()).then_some(sizes)
    }

    pub const fn phase(&self) -> LayoutPhase { self.phase }

    /// Top-level sizes as last restored or reported.
    pub fn sizes(&self) -> &[f64] { &self.sizes }

    /// Sizes of the nested group held by panel `group`.
    pub fn nested_sizes(&self, group: PanelId) -> Option<&[f64]> {
        self.nested.get(&group).map(Vec::as_slice)
    }

    /// Top-level sizes as they are laid out, minimums and total enforced.
    pub fn resolved_sizes(&self) -> Vec<f64> { self.tree.root().normalize(&self.sizes) }

    pub const fn tree(&self) -> &RegionTree { &self.tree }

    pub const fn store(&self) -> &LayoutStore<B> { &self.store }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use paneshell_store::{MemoryBackend, StorageKey};

    use super::*;

    fn controller() -> PanelLayoutController<MemoryBackend> {
        PanelLayoutController::mount(
            LayoutStore::new(MemoryBackend::default(), StorageKey::MAIN_PANELS),
            RegionTree::shell(),
        )
    }

    async fn seed(controller: &PanelLayoutController<MemoryBackend>, raw: &str) {
        controller
            .store()
            .backend()
            .write(StorageKey::MAIN_PANELS.as_str(), raw.to_string())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn mount_starts_on_defaults() {
        let controller = controller();
        assert_eq!(controller.phase(), LayoutPhase::Initial);
        assert_eq!(controller.sizes(), &[15.0, 70.0, 15.0]);
        assert_eq!(controller.nested_sizes(PanelId::EditorArea), Some(&[50.0, 50.0][..]));
        assert!(controller.store().backend().is_empty());
    }

    /// Never answers a read.
    struct StalledBackend;

    #[async_trait::async_trait]
    impl LayoutBackend for StalledBackend {
        async fn read(&self, _key: &str) -> paneshell_store::Result<Option<String>> {
            std::future::pending().await
        }

        async fn write(&self, _key: &str, _value: String) -> paneshell_store::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn cancelled_restore_settles_on_defaults() {
        let mut controller = PanelLayoutController::mount(
            LayoutStore::new(StalledBackend, StorageKey::MAIN_PANELS),
            RegionTree::shell(),
        );

        let restore = tokio::time::timeout(Duration::from_millis(20), controller.restore());
        assert!(restore.await.is_err());

        assert_eq!(controller.phase(), LayoutPhase::Restored);
        assert_eq!(controller.sizes(), &[15.0, 70.0, 15.0]);
        assert_eq!(controller.restore().await, RestoreOutcome::Skipped);
    }

    #[tokio::test]
    async fn restore_without_record_keeps_defaults() {
        let mut controller = controller();
        assert_eq!(controller.restore().await, RestoreOutcome::Defaults);
        assert_eq!(controller.phase(), LayoutPhase::Restored);
        assert_eq!(controller.sizes(), &[15.0, 70.0, 15.0]);
    }

    #[tokio::test]
    async fn restore_applies_saved_record_once() {
        let mut controller = controller();
        seed(&controller, "[20, 60, 20]").await;

        assert_eq!(
            controller.restore().await,
            RestoreOutcome::Applied(vec![20.0, 60.0, 20.0])
        );
        assert_eq!(controller.sizes(), &[20.0, 60.0, 20.0]);

        seed(&controller, "[30, 40, 30]").await;
        assert_eq!(controller.restore().await, RestoreOutcome::Skipped);
        assert_eq!(controller.sizes(), &[20.0, 60.0, 20.0]);
    }

    #[tokio::test]
    async fn corrupt_record_falls_back_to_defaults() {
        let mut controller = controller();
        seed(&controller, "not json").await;

        assert_eq!(controller.restore().await, RestoreOutcome::Defaults);
        assert_eq!(controller.sizes(), &[15.0, 70.0, 15.0]);
    }

    #[tokio::test]
    async fn mismatched_record_falls_back_to_defaults() {
        let mut controller = controller();
        seed(&controller, "[50, 50]").await;

        assert_eq!(controller.restore().await, RestoreOutcome::Defaults);
        assert_eq!(controller.sizes(), &[15.0, 70.0, 15.0]);
    }

    #[tokio::test]
    async fn resize_is_saved_and_goes_live() {
        let mut controller = controller();
        controller.restore().await;

        assert!(controller.on_layout(vec![25.0, 50.0, 25.0]).await);
        assert_eq!(controller.phase(), LayoutPhase::Live);
        assert_eq!(
            controller.store().load().await,
            Some(LayoutRecord::from(vec![25.0, 50.0, 25.0]))
        );
    }

    #[tokio::test]
    async fn resize_before_restore_wins() {
        let mut controller = controller();
        seed(&controller, "[20, 60, 20]").await;

        controller.on_layout(vec![10.0, 80.0, 10.0]).await;
        assert_eq!(controller.restore().await, RestoreOutcome::Skipped);
        assert_eq!(controller.sizes(), &[10.0, 80.0, 10.0]);
    }

    #[tokio::test]
    async fn resize_with_wrong_count_is_ignored() {
        let mut controller = controller();
        assert!(!controller.on_layout(vec![50.0, 50.0]).await);
        assert_eq!(controller.phase(), LayoutPhase::Initial);
        assert!(controller.store().backend().is_empty());
    }

    #[tokio::test]
    async fn drag_settles_and_persists() {
        let mut controller = controller();
        controller.restore().await;

        assert_eq!(controller.drag(1, -5.0).await, Some(vec![15.0, 65.0, 20.0]));
        assert_eq!(
            controller.store().load().await,
            Some(LayoutRecord::from(vec![15.0, 65.0, 20.0]))
        );
        assert_eq!(controller.drag(7, 1.0).await, None);
    }

    #[tokio::test]
    async fn nested_resizes_are_not_persisted() {
        let mut controller = controller();
        controller.restore().await;

        assert_eq!(
            controller.drag_nested(PanelId::EditorArea, 0, 20.0),
            Some(vec![70.0, 30.0])
        );
        assert_eq!(controller.nested_sizes(PanelId::EditorArea), Some(&[70.0, 30.0][..]));
        assert!(controller.store().backend().is_empty());
        assert!(!controller.on_nested_layout(PanelId::Drawer, vec![100.0]));
    }
}
