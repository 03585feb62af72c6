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

//! Application shell that assembles the complete layout.
//!
//! Layout:
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ Header                                                   │
//! ├─────┬─────────┬──────────────────────────────┬───────────┤
//! │ Nav │ Drawer  │ Editor                       │ Aside     │
//! │     │         ├──────────────────────────────┤           │
//! │     │         │ Console                      │           │
//! ├─────┴─────────┴──────────────────────────────┴───────────┤
//! │ Footer                                                   │
//! └──────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

use crate::{
    controller::PanelLayoutController,
    geometry::{Axis, Rect},
    region::{PanelContent, PanelId, SplitGroup},
    renderer::{Blank, Placeholder, RegionRenderer, ShellComponents, Slot, StaticText},
};

static ASIDE_TEXT: StaticText = StaticText::new("Right Aside");
static CONSOLE_TEXT: StaticText = StaticText::new("Console Area");
static FOOTER_TEXT: StaticText = StaticText::new("Footer Content");
static BLANK: Blank = Blank;

/// Glyph drawn on handles between side-by-side panels.
const COLUMN_HANDLE: char = '│';
/// Glyph drawn on handles between stacked panels.
const ROW_HANDLE: char = '─';

/// Fixed chrome dimensions, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, SmartDefault, Serialize, Deserialize, bon::Builder)]
#[serde(default)]
pub struct ShellConfig {
    #[default = 120]
    #[builder(default = 120)]
    pub width:       u16,
    #[default = 32]
    #[builder(default = 32)]
    pub height:      u16,
    #[default = 2]
    #[builder(default = 2)]
    pub header_rows: u16,
    #[default = 1]
    #[builder(default = 1)]
    pub footer_rows: u16,
    #[default = 6]
    #[builder(default = 6)]
    pub nav_cols:    u16,
}

/// A rectangle of the rendered shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Header,
    Nav,
    Footer,
    Panel(PanelId),
}

/// A rendered shell: a grid of characters plus where every region landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width:   u16,
    height:  u16,
    cells:   Vec<char>,
    regions: Vec<(Region, Rect)>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![' '; usize::from(width) * usize::from(height)],
            regions: Vec::new(),
        }
    }

    pub const fn width(&self) -> u16 { self.width }

    pub const fn height(&self) -> u16 { self.height }

    /// Where `region` was placed, if it was rendered.
    pub fn area(&self, region: Region) -> Option<Rect> {
        self.regions
            .iter()
            .find_map(|(r, area)| (*r == region).then_some(*area))
    }

    /// Text inside `region`, one trimmed line per row.
    pub fn region_text(&self, region: Region) -> Option<String> {
        let area = self.area(region)?;
        let rows = (area.y..area.bottom())
            .map(|y| self.row_slice(y, area.x, area.right()).trim_end().to_string())
            .collect::<Vec<_>>();
        Some(rows.join("\n").trim_end().to_string())
    }

    /// The row at `y` with trailing blanks removed.
    pub fn line(&self, y: u16) -> String { self.row_slice(y, 0, self.width).trim_end().to_string() }

    fn row_slice(&self, y: u16, from: u16, to: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = usize::from(y) * usize::from(self.width);
        self.cells[start + usize::from(from.min(self.width))..start + usize::from(to.min(self.width))]
            .iter()
            .collect()
    }

    fn put(&mut self, x: u16, y: u16, ch: char) {
        if x < self.width && y < self.height {
            let index = usize::from(y) * usize::from(self.width) + usize::from(x);
            self.cells[index] = ch;
        }
    }

    fn fill(&mut self, area: Rect, ch: char) {
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                self.put(x, y, ch);
            }
        }
    }

    fn draw(&mut self, region: Region, area: Rect, renderer: &dyn RegionRenderer) {
        self.regions.push((region, area));
        if area.is_empty() {
            return;
        }
        for (y, line) in (area.y..area.bottom()).zip(renderer.render(area)) {
            for (x, ch) in (area.x..area.right()).zip(line.chars()) {
                self.put(x, y, ch);
            }
        }
    }
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.height {
            writeln!(f, "{}", self.line(y))?;
        }
        Ok(())
    }
}

/// Main application shell: chrome plus the resizable panel tree.
#[derive(Debug, Default)]
pub struct AppShell {
    config:     ShellConfig,
    components: ShellComponents,
}

impl AppShell {
    pub const fn new(config: ShellConfig, components: ShellComponents) -> Self {
        Self { config, components }
    }

    pub const fn config(&self) -> &ShellConfig { &self.config }

    pub const fn components(&self) -> &ShellComponents { &self.components }

    /// Lays out the shell with the controller's current sizes.
    pub fn render<B>(&self, controller: &PanelLayoutController<B>) -> Frame
    where
        B: paneshell_store::LayoutBackend,
    {
        let config = &self.config;
        let mut frame = Frame::new(config.width, config.height);
        let screen = Rect::new(0, 0, config.width, config.height);

        let (header, rest) = screen.take(Axis::Vertical, config.header_rows);
        let (main, footer) = rest.take_end(Axis::Vertical, config.footer_rows);
        let (nav, panels) = main.take(Axis::Horizontal, config.nav_cols);

        frame.draw(Region::Header, header, self.slot(Slot::Header).renderer());
        frame.draw(Region::Nav, nav, self.slot(Slot::Nav).renderer());
        frame.draw(Region::Footer, footer, &FOOTER_TEXT);

        let root = controller.tree().root();
        self.render_group(
            &mut frame,
            controller,
            root,
            &controller.resolved_sizes(),
            panels,
        );
        frame
    }

    fn render_group<B>(
        &self,
        frame: &mut Frame,
        controller: &PanelLayoutController<B>,
        group: &SplitGroup,
        sizes: &[f64],
        area: Rect,
    ) where
        B: paneshell_store::LayoutBackend,
    {
        let pieces = area.split(group.axis(), sizes, 1);
        let handle = match group.axis() {
            Axis::Horizontal => COLUMN_HANDLE,
            Axis::Vertical => ROW_HANDLE,
        };

        for (index, (panel, piece)) in group.panels().iter().zip(&pieces).enumerate() {
            if index + 1 < pieces.len() {
                let gap = match group.axis() {
                    Axis::Horizontal => Rect::new(piece.right(), piece.y, 1, piece.height),
                    Axis::Vertical => Rect::new(piece.x, piece.bottom(), piece.width, 1),
                };
                frame.fill(gap, handle);
            }

            match &panel.content {
                PanelContent::Leaf => {
                    frame.draw(
                        Region::Panel(panel.id()),
                        *piece,
                        self.leaf(panel.id()).renderer(),
                    );
                }
                PanelContent::Split(nested) => {
                    let sizes = nested.normalize(
                        controller
                            .nested_sizes(panel.id())
                            .unwrap_or_default(),
                    );
                    frame.regions.push((Region::Panel(panel.id()), *piece));
                    self.render_group(frame, controller, nested, &sizes, *piece);
                }
            }
        }
    }

    fn slot(&self, slot: Slot) -> SlotRenderer<'_> {
        self.components
            .get(slot)
            .map_or(SlotRenderer::Placeholder(Placeholder::new(slot)), SlotRenderer::Provided)
    }

    fn leaf(&self, id: PanelId) -> SlotRenderer<'_> {
        match id {
            PanelId::Editor => self.slot(Slot::Editor),
            PanelId::Drawer => self
                .components
                .get(Slot::Drawer)
                .map_or(SlotRenderer::Fixed(&BLANK), SlotRenderer::Provided),
            PanelId::Console => SlotRenderer::Fixed(&CONSOLE_TEXT),
            PanelId::Aside => SlotRenderer::Fixed(&ASIDE_TEXT),
            PanelId::EditorArea => SlotRenderer::Fixed(&BLANK),
        }
    }
}

/// Renderer picked for a region.
enum SlotRenderer<'a> {
    Provided(&'a dyn RegionRenderer),
    Placeholder(Placeholder),
    Fixed(&'static dyn RegionRenderer),
}

impl SlotRenderer<'_> {
    fn renderer(&self) -> &dyn RegionRenderer {
        match self {
            Self::Provided(renderer) => *renderer,
            Self::Placeholder(placeholder) => placeholder,
            Self::Fixed(renderer) => *renderer,
        }
    }
}
