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

//! Pluggable region renderers.
//!
//! The shell never looks inside what a renderer draws. It hands each
//! renderer its rectangle and clips whatever lines come back.

use std::{borrow::Cow, fmt};

use crate::geometry::Rect;

/// Draws the content of one region.
pub trait RegionRenderer: Send + Sync {
    /// Returns the lines to show inside `area`. Lines past the area's height
    /// and characters past its width are dropped.
    fn render(&self, area: Rect) -> Vec<String>;
}

impl<F> RegionRenderer for F
where
    F: Fn(Rect) -> Vec<String> + Send + Sync,
{
    fn render(&self, area: Rect) -> Vec<String> { self(area) }
}

/// Renderer slots a caller can fill through [`ShellComponents`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Slot {
    Header,
    Nav,
    Editor,
    Drawer,
}

/// Fixed text, word-wrapped to the region width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticText(Cow<'static, str>);

impl StaticText {
    pub const fn new(text: &'static str) -> Self { Self(Cow::Borrowed(text)) }

    pub fn text(&self) -> &str { &self.0 }
}

impl RegionRenderer for StaticText {
    fn render(&self, area: Rect) -> Vec<String> { wrap(&self.0, usize::from(area.width)) }
}

/// Stand-in shown when a slot has no renderer, naming the missing option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    slot: Slot,
}

impl Placeholder {
    pub const fn new(slot: Slot) -> Self { Self { slot } }

    pub const fn slot(&self) -> Slot { self.slot }

    pub fn message(&self) -> String {
        format!(
            "Please provide components.{} to customize this component to the Layout component.",
            self.slot
        )
    }
}

impl RegionRenderer for Placeholder {
    fn render(&self, area: Rect) -> Vec<String> { wrap(&self.message(), usize::from(area.width)) }
}

/// Renders nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blank;

impl RegionRenderer for Blank {
    fn render(&self, _area: Rect) -> Vec<String> { Vec::new() }
}

/// The caller-supplied renderers. Any slot left empty falls back to a
/// [`Placeholder`], except the drawer which stays blank.
#[derive(Default, bon::Builder)]
pub struct ShellComponents {
    header: Option<Box<dyn RegionRenderer>>,
    nav:    Option<Box<dyn RegionRenderer>>,
    editor: Option<Box<dyn RegionRenderer>>,
    drawer: Option<Box<dyn RegionRenderer>>,
}

impl ShellComponents {
    pub fn get(&self, slot: Slot) -> Option<&dyn RegionRenderer> {
        match slot {
            Slot::Header => self.header.as_deref(),
            Slot::Nav => self.nav.as_deref(),
            Slot::Editor => self.editor.as_deref(),
            Slot::Drawer => self.drawer.as_deref(),
        }
    }

    pub fn is_provided(&self, slot: Slot) -> bool { self.get(slot).is_some() }
}

impl fmt::Debug for ShellComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShellComponents")
            .field("header", &self.header.is_some())
            .field("nav", &self.nav.is_some())
            .field("editor", &self.editor.is_some())
            .field("drawer", &self.drawer.is_some())
            .finish()
    }
}

/// Greedy word wrap. Words longer than `width` are hard-split.
pub(crate) fn wrap(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                lines.push(word.drain(..width).collect());
            }
            let line_len = line.chars().count();
            if !line.is_empty() && line_len + 1 + word.len() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.extend(word);
        }
        lines.push(line);
    }
    lines
}
