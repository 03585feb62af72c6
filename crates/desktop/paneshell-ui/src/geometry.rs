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

/// Direction siblings of a split group are laid out along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Axis {
    /// Side by side, sizes are widths
    Horizontal,
    /// Stacked, sizes are heights
    Vertical,
}

/// A cell-addressed rectangle inside a [`Frame`](crate::shell::Frame).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x:      u16,
    pub y:      u16,
    pub width:  u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn is_empty(&self) -> bool { self.width == 0 || self.height == 0 }

    pub const fn right(&self) -> u16 { self.x.saturating_add(self.width) }

    pub const fn bottom(&self) -> u16 { self.y.saturating_add(self.height) }

    /// Extent along `axis`.
    pub const fn extent(&self, axis: Axis) -> u16 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Splits off `cells` from the leading edge along `axis`, returning the
    /// taken part and the rest.
    pub fn take(&self, axis: Axis, cells: u16) -> (Self, Self) {
        let cells = cells.min(self.extent(axis));
        match axis {
            Axis::Horizontal => (
                Self::new(self.x, self.y, cells, self.height),
                Self::new(self.x + cells, self.y, self.width - cells, self.height),
            ),
            Axis::Vertical => (
                Self::new(self.x, self.y, self.width, cells),
                Self::new(self.x, self.y + cells, self.width, self.height - cells),
            ),
        }
    }

    /// Splits off `cells` from the trailing edge along `axis`, returning the
    /// rest and the taken part.
    pub fn take_end(&self, axis: Axis, cells: u16) -> (Self, Self) {
        let cells = cells.min(self.extent(axis));
        self.take(axis, self.extent(axis) - cells)
    }

    /// Divides the rectangle along `axis` proportionally to `weights`,
    /// leaving `gap` cells between neighbours for resize handles.
    ///
    /// Boundaries are rounded from the running total so the pieces always
    /// cover the available space exactly. Non-positive totals split evenly.
    pub fn split(&self, axis: Axis, weights: &[f64], gap: u16) -> Vec<Self> {
        if weights.is_empty() {
            return Vec::new();
        }

        let gaps = gap.saturating_mul(u16::try_from(weights.len() - 1).unwrap_or(u16::MAX));
        let available = f64::from(self.extent(axis).saturating_sub(gaps));
        let total: f64 = weights.iter().filter(|w| w.is_finite() && **w > 0.0).sum();
        let count = weights.len() as f64;

        let mut pieces = Vec::with_capacity(weights.len());
        let mut cursor = 0.0_f64;
        let mut previous_edge = 0_u16;
        let mut offset = 0_u16;
        for weight in weights {
            let share = if total > 0.0 {
                if weight.is_finite() && *weight > 0.0 { *weight / total } else { 0.0 }
            } else {
                1.0 / count
            };
            cursor += share;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let edge = (cursor * available).round().min(available) as u16;
            let cells = edge.saturating_sub(previous_edge);
            previous_edge = edge;

            let piece = match axis {
                Axis::Horizontal => Self::new(self.x + offset, self.y, cells, self.height),
                Axis::Vertical => Self::new(self.x, self.y + offset, self.width, cells),
            };
            pieces.push(piece);
            offset = offset.saturating_add(cells).saturating_add(gap);
        }
        pieces
    }
}
