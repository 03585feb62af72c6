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

use std::sync::Arc;

use paneshell_store::{LayoutBackend, LayoutRecord, LayoutStore, MemoryBackend, StorageKey};
use paneshell_ui::{
    AppShell, LayoutPhase, PanelId, PanelLayoutController, Region, RegionTree, RestoreOutcome,
    ShellComponents, ShellConfig,
};

fn config() -> ShellConfig { ShellConfig::builder().width(108).height(12).build() }

fn mount(backend: Arc<MemoryBackend>) -> PanelLayoutController<Arc<MemoryBackend>> {
    PanelLayoutController::mount(
        LayoutStore::new(backend, StorageKey::MAIN_PANELS),
        RegionTree::shell(),
    )
}

fn widths(shell: &AppShell, controller: &PanelLayoutController<Arc<MemoryBackend>>) -> Vec<u16> {
    let frame = shell.render(controller);
    [PanelId::Drawer, PanelId::EditorArea, PanelId::Aside]
        .into_iter()
        .map(|id| frame.area(Region::Panel(id)).unwrap().width)
        .collect()
}

#[tokio::test]
async fn first_paint_uses_defaults_then_restores() {
    let backend = Arc::new(MemoryBackend::default());
    backend
        .write(StorageKey::MAIN_PANELS.as_str(), "[20, 60, 20]".to_string())
        .await
        .unwrap();

    let shell = AppShell::new(config(), ShellComponents::default());
    let mut controller = mount(backend);

    assert_eq!(widths(&shell, &controller), vec![15, 70, 15]);

    assert!(matches!(controller.restore().await, RestoreOutcome::Applied(_)));
    assert_eq!(controller.sizes(), &[20.0, 60.0, 20.0]);
    assert_eq!(widths(&shell, &controller), vec![20, 60, 20]);
}

#[tokio::test]
async fn resized_layout_survives_remount() {
    let backend = Arc::new(MemoryBackend::default());
    let shell = AppShell::new(config(), ShellComponents::default());

    let mut first = mount(backend.clone());
    assert_eq!(first.restore().await, RestoreOutcome::Defaults);
    first.drag(0, 10.0).await.unwrap();
    first.drag_nested(PanelId::EditorArea, 0, 25.0).unwrap();
    assert_eq!(first.phase(), LayoutPhase::Live);
    drop(first);

    let mut second = mount(backend);
    assert_eq!(
        second.restore().await,
        RestoreOutcome::Applied(vec![25.0, 60.0, 15.0])
    );
    assert_eq!(widths(&shell, &second), vec![25, 60, 15]);
    // The editor/console split is not persisted.
    assert_eq!(second.nested_sizes(PanelId::EditorArea), Some(&[50.0, 50.0][..]));
}

#[tokio::test]
async fn corrupt_storage_renders_defaults_without_error() {
    let backend = Arc::new(MemoryBackend::default());
    backend
        .write(StorageKey::MAIN_PANELS.as_str(), "not json".to_string())
        .await
        .unwrap();

    let shell = AppShell::new(config(), ShellComponents::default());
    let mut controller = mount(backend.clone());
    assert_eq!(controller.restore().await, RestoreOutcome::Defaults);
    assert_eq!(widths(&shell, &controller), vec![15, 70, 15]);

    // The next settled resize repairs the slot.
    controller.on_layout(vec![30.0, 40.0, 30.0]).await;
    let store = LayoutStore::new(backend, StorageKey::MAIN_PANELS);
    assert_eq!(
        store.load().await,
        Some(LayoutRecord::from(vec![30.0, 40.0, 30.0]))
    );
}
