//! Slot and feature geometry in working-image pixel coordinates.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle stored as its four corners, in order
/// top-left, top-right, bottom-right, bottom-left.
///
/// Corner coordinates are exclusive on the far edges: the rectangle covers
/// pixels `x0..x2` by `y0..y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rectangle {
    pub corners: [[u32; 2]; 4],
}

impl Rectangle {
    /// Build from an origin and a positive size.
    pub fn from_origin_size(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            corners: [
                [x, y],
                [x + width, y],
                [x + width, y + height],
                [x, y + height],
            ],
        }
    }

    pub fn top_left(&self) -> [u32; 2] {
        self.corners[0]
    }

    pub fn bottom_right(&self) -> [u32; 2] {
        self.corners[2]
    }

    pub fn width(&self) -> u32 {
        self.corners[1][0] - self.corners[0][0]
    }

    pub fn height(&self) -> u32 {
        self.corners[2][1] - self.corners[1][1]
    }

    /// Integer centroid (midpoint of the diagonal, truncated).
    pub fn center(&self) -> [u32; 2] {
        let [x0, y0] = self.top_left();
        let [x2, y2] = self.bottom_right();
        [(x0 + x2) / 2, (y0 + y2) / 2]
    }
}

/// One grid cell of the crate, identified by its emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: usize,
    pub rect: Rectangle,
}

/// Detected circular feature, rounded to whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circle {
    pub x: u32,
    pub y: u32,
    pub r: u32,
}

/// Axis-aligned region with signed extent, used while feathering and
/// partitioning before the result is known to be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Region {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}
