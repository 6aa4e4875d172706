//! Slot segmentation.
//!
//! The crate region is approximated by the bounding box of every outermost
//! edge contour. A feathered (inward-trimmed) copy of that box is split into
//! `rows x cols` cells of `floor(W / cols) x floor(H / rows)` pixels.
//!
//! Cells are emitted column-major: the outer loop steps x, the inner loop
//! steps y. Stepping stops at the last cell whose far edge still fits, so a
//! trailing partial row or column is dropped, and a region that holds more
//! whole cells than the grid asks for yields the extra cells too.

use image::GrayImage;
use imageproc::contours::{find_contours, Contour};

use crate::config::{FeatherConfig, GridConfig, InspectionConfig, EDGE_UPPER_THRESHOLD};
use crate::error::{InspectError, SegmentationError};
use crate::geometry::{Rectangle, Region, Slot};

/// Partition the crate visible in `gray` into ordered slots.
pub fn segment(gray: &GrayImage, config: &InspectionConfig) -> Result<Vec<Slot>, InspectError> {
    let edges = imageproc::edges::canny(gray, config.edge_threshold, EDGE_UPPER_THRESHOLD);
    let contours = find_contours::<i32>(&edges);
    let crate_box = outer_bounding_box(&contours).ok_or(SegmentationError::NoContours)?;
    tracing::debug!(
        "crate region {}x{} at ({}, {}) from {} contours",
        crate_box.width,
        crate_box.height,
        crate_box.x,
        crate_box.y,
        contours.len()
    );

    let feathered = apply_feather(crate_box, config.feather);
    partition_grid(feathered, config.grid)
}

/// Inclusive bounding box of all points of top-level contours.
fn outer_bounding_box(contours: &[Contour<i32>]) -> Option<Region> {
    let mut points = contours
        .iter()
        .filter(|c| c.parent.is_none())
        .flat_map(|c| c.points.iter());

    let first = points.next()?;
    let (mut min_x, mut max_x) = (first.x, first.x);
    let (mut min_y, mut max_y) = (first.y, first.y);
    for p in points {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }

    Some(Region {
        x: min_x as i64,
        y: min_y as i64,
        width: (max_x - min_x) as i64 + 1,
        height: (max_y - min_y) as i64 + 1,
    })
}

/// Shift the origin inward by `fraction * size` and shrink by twice that.
pub(crate) fn apply_feather(region: Region, feather: FeatherConfig) -> Region {
    let fx = (feather.x * region.width as f64) as i64;
    let fy = (feather.y * region.height as f64) as i64;
    Region {
        x: region.x + fx,
        y: region.y + fy,
        width: region.width - 2 * fx,
        height: region.height - 2 * fy,
    }
}

/// Step whole cells across `region`, column-major, ids in emission order.
pub(crate) fn partition_grid(region: Region, grid: GridConfig) -> Result<Vec<Slot>, InspectError> {
    if region.width <= 0 || region.height <= 0 || region.x < 0 || region.y < 0 {
        return Err(InspectError::DegenerateGeometry {
            reason: "feathered crate region is empty",
            width: region.width,
            height: region.height,
        });
    }

    let cell_w = region.width / grid.cols as i64;
    let cell_h = region.height / grid.rows as i64;
    if cell_w <= 0 || cell_h <= 0 {
        return Err(InspectError::DegenerateGeometry {
            reason: "grid cell smaller than one pixel",
            width: cell_w,
            height: cell_h,
        });
    }
    tracing::debug!(
        "feathered region {}x{} at ({}, {}), cell {}x{}",
        region.width,
        region.height,
        region.x,
        region.y,
        cell_w,
        cell_h
    );

    let last_x = region.x + region.width - cell_w;
    let last_y = region.y + region.height - cell_h;
    let mut slots = Vec::with_capacity(grid.rows as usize * grid.cols as usize);
    let mut x = region.x;
    while x <= last_x {
        let mut y = region.y;
        while y <= last_y {
            slots.push(Slot {
                id: slots.len(),
                rect: Rectangle::from_origin_size(x as u32, y as u32, cell_w as u32, cell_h as u32),
            });
            y += cell_h;
        }
        x += cell_w;
    }
    Ok(slots)
}
