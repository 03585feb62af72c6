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

//! Resizable panel layout for the paneshell application shell.
//!
//! - [`region`]: the tree of split groups and their size rules
//! - [`controller`]: restores, tracks and persists the top-level sizes
//! - [`renderer`]: the pluggable region renderer contract
//! - [`shell`]: lays everything out into a [`Frame`](shell::Frame)

pub mod controller;
pub mod geometry;
pub mod region;
pub mod renderer;
pub mod shell;

pub use controller::{LayoutPhase, PanelLayoutController, RestoreOutcome};
pub use geometry::{Axis, Rect};
pub use region::{Panel, PanelContent, PanelId, PanelSpec, RegionTree, SplitGroup};
pub use renderer::{Placeholder, RegionRenderer, ShellComponents, Slot, StaticText};
pub use shell::{AppShell, Frame, Region, ShellConfig};
