//! Reference template and fault icon assets.
//!
//! Both are normalized once, when the analyzer is built, and only read
//! afterwards.

use std::path::Path;

use image::{imageops::FilterType, DynamicImage, GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use crate::config::InspectionConfig;
use crate::detector::circle::detect_circle;
use crate::error::ConfigError;
use crate::geometry::Circle;

/// Reference image of a known-good slot with its cached circle.
#[derive(Debug, Clone)]
pub struct Template {
    image: GrayImage,
    circle: Option<Circle>,
}

impl Template {
    /// Normalize `image` to the configured template size and detect its
    /// circle once.
    pub fn new(image: &DynamicImage, config: &InspectionConfig) -> Result<Self, ConfigError> {
        let (w, h) = (config.template.width, config.template.height);
        if w == 0 || h == 0 {
            return Err(ConfigError::invalid("template", "width and height must be >= 1"));
        }
        let gray = image.to_luma8();
        let image = if gray.dimensions() == (w, h) {
            gray
        } else {
            image::imageops::resize(&gray, w, h, FilterType::Triangle)
        };

        let circle = detect_circle(&image, &config.circle);
        match circle {
            Some(c) => tracing::debug!("template circle at ({}, {}) r={}", c.x, c.y, c.r),
            None => tracing::warn!("no circle found in template; every slot will be FAULTY"),
        }
        Ok(Self { image, circle })
    }

    /// Decode the template from `path` and normalize it.
    pub fn from_path(path: &Path, config: &InspectionConfig) -> Result<Self, ConfigError> {
        let image = image::open(path).map_err(|source| ConfigError::TemplateImage {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(&image, config)
    }

    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    pub fn circle(&self) -> Option<Circle> {
        self.circle
    }

    /// Normalization size `(width, height)` for slot crops.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Icon stamped over faulty slots.
#[derive(Debug, Clone)]
pub struct FaultIcon {
    image: RgbImage,
}

const ICON_BACKGROUND: Rgb<u8> = Rgb([90, 0, 0]);
const ICON_CROSS: Rgb<u8> = Rgb([255, 40, 40]);
const DEFAULT_ICON_SIZE: u32 = 64;

impl Default for FaultIcon {
    /// Red cross on a dark red field.
    fn default() -> Self {
        let n = DEFAULT_ICON_SIZE;
        let mut image = RgbImage::new(n, n);
        draw_filled_rect_mut(&mut image, Rect::at(0, 0).of_size(n, n), ICON_BACKGROUND);
        let (lo, hi) = (n as f32 * 0.2, n as f32 * 0.8);
        for t in -3i32..=3 {
            let t = t as f32;
            draw_line_segment_mut(&mut image, (lo + t, lo), (hi + t, hi), ICON_CROSS);
            draw_line_segment_mut(&mut image, (hi + t, lo), (lo + t, hi), ICON_CROSS);
        }
        Self { image }
    }
}

impl FaultIcon {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    /// Decode an icon image from disk.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let image = image::open(path).map_err(|source| ConfigError::IconImage {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(image.to_rgb8()))
    }

    /// Copy resized to `width x height`.
    pub fn resized(&self, width: u32, height: u32) -> RgbImage {
        if self.image.dimensions() == (width, height) {
            return self.image.clone();
        }
        image::imageops::resize(&self.image, width, height, FilterType::Triangle)
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }
}
