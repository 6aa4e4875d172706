//! Per-slot classification against the template circle.

use image::{imageops::FilterType, GrayImage, Luma};
use imageproc::drawing::{draw_filled_rect_mut, draw_polygon_mut};
use imageproc::point::Point;
use imageproc::rect::Rect;

use crate::config::InspectionConfig;
use crate::detector::circle::detect_circle;
use crate::geometry::{Rectangle, Slot};
use crate::report::{classify, SlotReport};
use crate::template::Template;

/// Isolate a slot, normalize it to the template size and compare circles.
pub fn evaluate(
    slot: &Slot,
    gray: &GrayImage,
    template: &Template,
    config: &InspectionConfig,
) -> SlotReport {
    let (tw, th) = template.dimensions();
    let crop = normalized_slot_crop(gray, &slot.rect, tw, th);
    let circle = detect_circle(&crop, &config.circle);
    let (status, error_percent) =
        classify(circle, template.circle(), config.matching.error_threshold);

    tracing::debug!(
        "slot {}: circle {:?}, error {:?}%, {}",
        slot.id,
        circle,
        error_percent,
        status
    );

    SlotReport {
        slot: *slot,
        status,
        circle,
        error_percent,
    }
}

/// Zero everything outside the slot quadrilateral, crop to its bounds and
/// resize to `width x height`.
pub(crate) fn normalized_slot_crop(
    gray: &GrayImage,
    rect: &Rectangle,
    width: u32,
    height: u32,
) -> GrayImage {
    let (img_w, img_h) = gray.dimensions();
    let polygon: Vec<Point<i32>> = rect
        .corners
        .iter()
        .map(|&[x, y]| {
            Point::new(
                x.min(img_w.saturating_sub(1)) as i32,
                y.min(img_h.saturating_sub(1)) as i32,
            )
        })
        .collect();

    let mut polygon = polygon;
    polygon.dedup();

    let mut mask = GrayImage::new(img_w, img_h);
    if polygon.len() >= 3 && polygon.first() != polygon.last() {
        draw_polygon_mut(&mut mask, &polygon, Luma([255]));
    } else {
        // Clamping collapsed a one-pixel slot at the image border.
        let [x0, y0] = rect.top_left();
        let r = Rect::at(x0 as i32, y0 as i32).of_size(rect.width(), rect.height());
        draw_filled_rect_mut(&mut mask, r, Luma([255]));
    }
    let masked = GrayImage::from_fn(img_w, img_h, |x, y| {
        if mask.get_pixel(x, y)[0] != 0 {
            *gray.get_pixel(x, y)
        } else {
            Luma([0])
        }
    });

    let [x0, y0] = rect.top_left();
    let crop = image::imageops::crop_imm(&masked, x0, y0, rect.width(), rect.height()).to_image();
    image::imageops::resize(&crop, width, height, FilterType::Triangle)
}
