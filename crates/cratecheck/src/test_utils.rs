//! Shared synthetic scenes for image-based unit tests.

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{FeatherConfig, GridConfig, ImageSize, InspectionConfig};

/// Render filled disks on a uniform background.
pub(crate) fn draw_disk_image(
    w: u32,
    h: u32,
    disks: &[([f32; 2], f32)],
    disk_pix: u8,
    bg_pix: u8,
) -> GrayImage {
    GrayImage::from_fn(w, h, |x, y| {
        let inside = disks.iter().any(|&(center, radius)| {
            let dx = x as f32 - center[0];
            let dy = y as f32 - center[1];
            (dx * dx + dy * dy).sqrt() <= radius
        });
        Luma([if inside { disk_pix } else { bg_pix }])
    })
}

/// Replace a random `fraction` of pixels with black or white.
pub(crate) fn add_speckle(img: &GrayImage, fraction: f32, seed: u64) -> GrayImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = img.clone();
    for p in out.pixels_mut() {
        if rng.gen::<f32>() < fraction {
            p[0] = if rng.gen_bool(0.5) { 0 } else { 255 };
        }
    }
    out
}

/// A dark-background image holding a bright crate with a grid of dark
/// bottle mouths.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CrateScene {
    pub width: u32,
    pub height: u32,
    pub origin: [u32; 2],
    pub pitch: u32,
    pub rows: u32,
    pub cols: u32,
    pub radius: f32,
    pub crate_pix: u8,
    pub mouth_pix: u8,
    pub bg_pix: u8,
}

impl Default for CrateScene {
    fn default() -> Self {
        Self {
            width: 340,
            height: 240,
            origin: [20, 20],
            pitch: 100,
            rows: 2,
            cols: 3,
            radius: 20.0,
            crate_pix: 200,
            mouth_pix: 40,
            bg_pix: 0,
        }
    }
}

/// Render `scene`, leaving out the mouths at the listed `(col, row)` cells.
pub(crate) fn draw_crate_image(scene: &CrateScene, missing: &[(u32, u32)]) -> RgbImage {
    let [ox, oy] = scene.origin;
    let crate_w = scene.pitch * scene.cols;
    let crate_h = scene.pitch * scene.rows;
    let mut centers = Vec::new();
    for col in 0..scene.cols {
        for row in 0..scene.rows {
            if missing.contains(&(col, row)) {
                continue;
            }
            centers.push([
                (ox + col * scene.pitch + scene.pitch / 2) as f32,
                (oy + row * scene.pitch + scene.pitch / 2) as f32,
            ]);
        }
    }

    RgbImage::from_fn(scene.width, scene.height, |x, y| {
        let in_crate = x >= ox && x < ox + crate_w && y >= oy && y < oy + crate_h;
        if !in_crate {
            return Rgb([scene.bg_pix; 3]);
        }
        let in_mouth = centers.iter().any(|c| {
            let dx = x as f32 - c[0];
            let dy = y as f32 - c[1];
            (dx * dx + dy * dy).sqrt() <= scene.radius
        });
        if in_mouth {
            Rgb([scene.mouth_pix; 3])
        } else {
            Rgb([scene.crate_pix; 3])
        }
    })
}

/// Template matching [`CrateScene::default`]: one mouth centred in a
/// 90 x 90 cell.
pub(crate) fn template_image() -> DynamicImage {
    DynamicImage::ImageLuma8(draw_disk_image(90, 90, &[([45.0, 45.0], 20.0)], 40, 200))
}

/// Settings tuned for [`CrateScene::default`].
pub(crate) fn synthetic_config() -> InspectionConfig {
    let mut config = InspectionConfig::default();
    config.image = ImageSize {
        width: 340,
        height: 240,
    };
    config.grid = GridConfig { rows: 2, cols: 3 };
    config.feather = FeatherConfig { x: 0.05, y: 0.05 };
    config.template.width = 90;
    config.template.height = 90;
    config
}
