//! Result overlay rendering.
//!
//! Only slots whose status matches the crate verdict are marked: a cross at
//! the centre of every slot of an OK crate, the fault icon over each faulty
//! slot of a FAULTY crate. The overlay is blended 50/50 with the working
//! image and a verdict banner is written in the top-left corner.

use embedded_graphics::{
    mono_font::{ascii::FONT_10X20, MonoTextStyle},
    pixelcolor::Rgb888,
    prelude::*,
    text::Text,
};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

use crate::geometry::Rectangle;
use crate::report::{HealthStatus, QualityReport};
use crate::template::FaultIcon;

const MARKER_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const MARKER_SIZE: f32 = 20.0;
const OK_COLOR: [u8; 3] = [0, 255, 0];
const BAD_COLOR: [u8; 3] = [255, 0, 0];
const BANNER_ORIGIN: (i32, i32) = (10, 40);

/// Render the verdict overlay onto a copy of `image`.
pub fn annotate(
    image: &RgbImage,
    report: &QualityReport,
    verdict: HealthStatus,
    icon: &FaultIcon,
) -> RgbImage {
    let (w, h) = image.dimensions();
    let mut overlay = RgbImage::new(w, h);

    for entry in report.iter() {
        match (verdict, entry.status) {
            (HealthStatus::Faulty, HealthStatus::Faulty) => {
                stamp_icon(&mut overlay, icon, &entry.slot.rect)
            }
            (HealthStatus::Ok, HealthStatus::Ok) => draw_marker(&mut overlay, &entry.slot.rect),
            _ => {}
        }
    }

    let mut out = blend_half(&overlay, image);
    let (label, color) = match verdict {
        HealthStatus::Faulty => ("BAD !", BAD_COLOR),
        HealthStatus::Ok => ("OK !", OK_COLOR),
    };
    draw_text(&mut out, label, BANNER_ORIGIN, color);
    out
}

fn stamp_icon(overlay: &mut RgbImage, icon: &FaultIcon, rect: &Rectangle) {
    let stamp = icon.resized(rect.width(), rect.height());
    let [x, y] = rect.top_left();
    image::imageops::replace(overlay, &stamp, x as i64, y as i64);
}

fn draw_marker(overlay: &mut RgbImage, rect: &Rectangle) {
    let [cx, cy] = rect.center();
    let (cx, cy) = (cx as f32, cy as f32);
    let half = MARKER_SIZE / 2.0;
    draw_line_segment_mut(overlay, (cx - half, cy), (cx + half, cy), MARKER_COLOR);
    draw_line_segment_mut(overlay, (cx, cy - half), (cx, cy + half), MARKER_COLOR);
}

/// Per-channel `0.5 * a + 0.5 * b`, rounded half up.
fn blend_half(a: &RgbImage, b: &RgbImage) -> RgbImage {
    let mut out = b.clone();
    for (o, p) in out.pixels_mut().zip(a.pixels()) {
        for c in 0..3 {
            o[c] = ((o[c] as u16 + p[c] as u16 + 1) / 2) as u8;
        }
    }
    out
}

fn draw_text(frame: &mut RgbImage, text: &str, pos: (i32, i32), color: [u8; 3]) {
    let style = MonoTextStyle::new(&FONT_10X20, Rgb888::new(color[0], color[1], color[2]));
    let mut target = ImageDrawTarget::new(frame);
    let _ = Text::new(text, Point::new(pos.0, pos.1), style).draw(&mut target);
}

struct ImageDrawTarget<'a> {
    image: &'a mut RgbImage,
}

impl<'a> ImageDrawTarget<'a> {
    fn new(image: &'a mut RgbImage) -> Self {
        Self { image }
    }
}

impl OriginDimensions for ImageDrawTarget<'_> {
    fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }
}

impl DrawTarget for ImageDrawTarget<'_> {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let width = self.image.width() as i32;
        let height = self.image.height() as i32;
        for Pixel(coord, color) in pixels {
            if coord.x < 0 || coord.y < 0 || coord.x >= width || coord.y >= height {
                continue;
            }
            let pixel = self.image.get_pixel_mut(coord.x as u32, coord.y as u32);
            *pixel = Rgb([color.r(), color.g(), color.b()]);
        }
        Ok(())
    }
}
