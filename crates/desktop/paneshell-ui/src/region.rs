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

//! The tree of resizable regions.
//!
//! Layout:
//! ```text
//! ┌────────┬─────────────────────────────┬────────┐
//! │ Drawer │ EditorArea                  │ Aside  │
//! │ (15%)  │ ┌─────────────────────────┐ │ (15%)  │
//! │        │ │ Editor       (min 20%)  │ │        │
//! │        │ ├─────────────────────────┤ │        │
//! │        │ │ Console      (min 10%)  │ │        │
//! │        │ └─────────────────────────┘ │        │
//! └────────┴─────────────────────────────┴────────┘
//! ```
//!
//! Sizes are percentages of the containing axis. Only the top-level
//! horizontal group is persisted.

use crate::geometry::Axis;

/// Tolerance used when comparing percentage sums.
const EPSILON: f64 = 1e-6;

/// Identifies a panel in the region tree.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
)]
#[strum(serialize_all = "kebab-case")]
pub enum PanelId {
    /// Left drawer, hosts routed content
    Drawer,
    /// Middle panel holding the editor/console split
    EditorArea,
    /// Right aside
    Aside,
    Editor,
    Console,
}

/// Sizing constraints of one panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelSpec {
    pub id:           PanelId,
    /// Smallest size the panel may be dragged to, in percent.
    pub min_size:     f64,
    /// Size used before any layout is restored. `None` takes a share of
    /// whatever the sized siblings leave over.
    pub default_size: Option<f64>,
}

impl PanelSpec {
    pub const fn new(id: PanelId, min_size: f64) -> Self {
        Self {
            id,
            min_size,
            default_size: None,
        }
    }

    #[must_use]
    pub const fn with_default(mut self, size: f64) -> Self {
        self.default_size = Some(size);
        self
    }
}

/// What a panel contains.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelContent {
    /// A region filled by a renderer
    Leaf,
    /// A nested split group
    Split(SplitGroup),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub spec:    PanelSpec,
    pub content: PanelContent,
}

impl Panel {
    pub const fn leaf(spec: PanelSpec) -> Self {
        Self {
            spec,
            content: PanelContent::Leaf,
        }
    }

    pub const fn split(spec: PanelSpec, group: SplitGroup) -> Self {
        Self {
            spec,
            content: PanelContent::Split(group),
        }
    }

    pub const fn id(&self) -> PanelId { self.spec.id }
}

/// Sibling panels sharing one axis, separated by resize handles.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitGroup {
    axis:   Axis,
    panels: Vec<Panel>,
}

impl SplitGroup {
    pub const fn new(axis: Axis, panels: Vec<Panel>) -> Self { Self { axis, panels } }

    pub const fn axis(&self) -> Axis { self.axis }

    pub fn panels(&self) -> &[Panel] { &self.panels }

    pub fn len(&self) -> usize { self.panels.len() }

    pub fn is_empty(&self) -> bool { self.panels.is_empty() }

    /// Number of resize handles between the panels.
    pub fn handles(&self) -> usize { self.panels.len().saturating_sub(1) }

    pub fn min_sizes(&self) -> Vec<f64> { self.panels.iter().map(|p| p.spec.min_size).collect() }

    /// Sizes before anything is restored: panels with a default keep it, the
    /// rest share the remainder evenly.
    pub fn default_sizes(&self) -> Vec<f64> {
        let fixed: f64 = self.panels.iter().filter_map(|p| p.spec.default_size).sum();
        let flexible = self
            .panels
            .iter()
            .filter(|p| p.spec.default_size.is_none())
            .count();
        #[allow(clippy::cast_precision_loss)]
        let share = if flexible == 0 {
            0.0
        } else {
            (100.0 - fixed).max(0.0) / flexible as f64
        };

        self.panels
            .iter()
            .map(|p| p.spec.default_size.unwrap_or(share))
            .collect()
    }

    /// Whether `sizes` could be applied to this group as-is: one finite,
    /// non-negative value per panel.
    pub fn accepts(&self, sizes: &[f64]) -> bool {
        sizes.len() == self.panels.len() && sizes.iter().all(|v| v.is_finite() && *v >= 0.0)
    }

    /// Turns raw sizes into the sizes actually laid out: every panel at least
    /// its minimum and the total exactly 100.
    ///
    /// Sizes that [`accepts`](Self::accepts) rejects fall back to the
    /// defaults.
    pub fn normalize(&self, sizes: &[f64]) -> Vec<f64> {
        let raw = if self.accepts(sizes) {
            sizes.to_vec()
        } else {
            self.default_sizes()
        };
        let mins = self.min_sizes();

        let mut out: Vec<f64> = raw.iter().zip(&mins).map(|(v, min)| v.max(*min)).collect();
        let total: f64 = out.iter().sum();

        if total > 100.0 + EPSILON {
            let excess = total - 100.0;
            let slack: f64 = out.iter().zip(&mins).map(|(v, min)| v - min).sum();
            if slack > EPSILON {
                let ratio = (excess / slack).min(1.0);
                for (v, min) in out.iter_mut().zip(&mins) {
                    *v -= (*v - min) * ratio;
                }
            }
        } else if total < 100.0 - EPSILON {
            let deficit = 100.0 - total;
            if total > EPSILON {
                for v in &mut out {
                    *v += deficit * *v / total;
                }
            } else {
                #[allow(clippy::cast_precision_loss)]
                let even = 100.0 / out.len() as f64;
                out.iter_mut().for_each(|v| *v = even);
            }
        }
        out
    }

    /// Moves the handle between panel `handle` and `handle + 1` by `delta`
    /// percent. Positive deltas grow the leading panel. The move stops at
    /// either neighbour's minimum; other panels keep their sizes.
    ///
    /// Returns `None` when there is no such handle.
    pub fn drag(&self, sizes: &[f64], handle: usize, delta: f64) -> Option<Vec<f64>> {
        if handle >= self.handles() || !delta.is_finite() {
            return None;
        }

        let mut out = self.normalize(sizes);
        let (lead, trail) = (handle, handle + 1);
        let lead_room = out[lead] - self.panels[lead].spec.min_size;
        let trail_room = out[trail] - self.panels[trail].spec.min_size;
        let applied = delta.clamp(-lead_room.max(0.0), trail_room.max(0.0));

        out[lead] += applied;
        out[trail] -= applied;
        Some(out)
    }

    /// Finds the nested group held by panel `id`, searching depth first.
    pub fn group(&self, id: PanelId) -> Option<&Self> {
        self.panels.iter().find_map(|panel| match &panel.content {
            PanelContent::Split(group) if panel.id() == id => Some(group),
            PanelContent::Split(group) => group.group(id),
            PanelContent::Leaf => None,
        })
    }

    /// Ids of every panel holding a nested group, depth first.
    pub fn nested_ids(&self) -> Vec<PanelId> {
        let mut ids = Vec::new();
        for panel in &self.panels {
            if let PanelContent::Split(group) = &panel.content {
                ids.push(panel.id());
                ids.extend(group.nested_ids());
            }
        }
        ids
    }
}

/// The shell's region tree, rooted at the persisted horizontal group.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionTree {
    root: SplitGroup,
}

impl RegionTree {
    pub const fn new(root: SplitGroup) -> Self { Self { root } }

    /// Drawer / editor area / aside, with the editor area split into editor
    /// and console.
    pub fn shell() -> Self {
        let workbench = SplitGroup::new(Axis::Vertical, vec![
            Panel::leaf(PanelSpec::new(PanelId::Editor, 20.0)),
            Panel::leaf(PanelSpec::new(PanelId::Console, 10.0)),
        ]);

        Self::new(SplitGroup::new(Axis::Horizontal, vec![
            Panel::leaf(PanelSpec::new(PanelId::Drawer, 1.0).with_default(15.0)),
            Panel::split(PanelSpec::new(PanelId::EditorArea, 1.0), workbench),
            Panel::leaf(PanelSpec::new(PanelId::Aside, 1.0).with_default(15.0)),
        ]))
    }

    pub const fn root(&self) -> &SplitGroup { &self.root }

    pub fn group(&self, id: PanelId) -> Option<&SplitGroup> { self.root.group(id) }
}

impl Default for RegionTree {
    fn default() -> Self { Self::shell() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_sizes(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{actual:?} vs {expected:?}");
        }
    }

    #[test]
    fn shell_defaults() {
        let tree = RegionTree::shell();
        assert_sizes(&tree.root().default_sizes(), &[15.0, 70.0, 15.0]);

        let workbench = tree.group(PanelId::EditorArea).unwrap();
        assert_eq!(workbench.axis(), Axis::Vertical);
        assert_sizes(&workbench.default_sizes(), &[50.0, 50.0]);
        assert_sizes(&workbench.min_sizes(), &[20.0, 10.0]);
    }

    #[test]
    fn normalize_keeps_valid_layouts() {
        let root = RegionTree::shell().root().clone();
        assert_sizes(&root.normalize(&[20.0, 60.0, 20.0]), &[20.0, 60.0, 20.0]);
    }

    #[test]
    fn normalize_scales_to_one_hundred() {
        let root = RegionTree::shell().root().clone();
        assert_sizes(&root.normalize(&[10.0, 20.0, 10.0]), &[25.0, 50.0, 25.0]);

        let out = root.normalize(&[50.0, 100.0, 50.0]);
        assert!((out.iter().sum::<f64>() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn normalize_enforces_minimums() {
        let workbench = RegionTree::shell().group(PanelId::EditorArea).unwrap().clone();
        let out = workbench.normalize(&[5.0, 95.0]);
        assert!(out[0] >= 20.0 - 1e-9, "{out:?}");
        assert!((out.iter().sum::<f64>() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn normalize_rejects_wrong_length() {
        let root = RegionTree::shell().root().clone();
        assert!(!root.accepts(&[50.0, 50.0]));
        assert_sizes(&root.normalize(&[50.0, 50.0]), &[15.0, 70.0, 15.0]);
        assert_sizes(&root.normalize(&[-1.0, 50.0, 51.0]), &[15.0, 70.0, 15.0]);
    }

    #[test]
    fn drag_moves_only_neighbours() {
        let root = RegionTree::shell().root().clone();
        let out = root.drag(&[15.0, 70.0, 15.0], 0, 5.0).unwrap();
        assert_sizes(&out, &[20.0, 65.0, 15.0]);

        let out = root.drag(&[15.0, 70.0, 15.0], 1, -10.0).unwrap();
        assert_sizes(&out, &[15.0, 60.0, 25.0]);
    }

    #[test]
    fn drag_stops_at_minimum() {
        let root = RegionTree::shell().root().clone();
        let out = root.drag(&[15.0, 70.0, 15.0], 0, -50.0).unwrap();
        assert_sizes(&out, &[1.0, 84.0, 15.0]);

        let workbench = RegionTree::shell().group(PanelId::EditorArea).unwrap().clone();
        let out = workbench.drag(&[50.0, 50.0], 0, 60.0).unwrap();
        assert_sizes(&out, &[90.0, 10.0]);
    }

    #[test]
    fn drag_rejects_missing_handle() {
        let root = RegionTree::shell().root().clone();
        assert!(root.drag(&[15.0, 70.0, 15.0], 2, 1.0).is_none());
        assert!(root.drag(&[15.0, 70.0, 15.0], 0, f64::NAN).is_none());
    }

    #[test]
    fn nested_ids_lists_split_holders() {
        assert_eq!(RegionTree::shell().root().nested_ids(), vec![PanelId::EditorArea]);
        assert!(RegionTree::shell().group(PanelId::Drawer).is_none());
    }
}
