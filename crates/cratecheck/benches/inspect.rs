use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};

use cratecheck::{
    detect_circle, Analyzer, FeatherConfig, GridConfig, ImageSize, InspectionConfig,
};

const PITCH: u32 = 100;
const ORIGIN: u32 = 20;
const MOUTH_RADIUS: f32 = 20.0;

fn mouth_at(x: u32, y: u32, cx: f32, cy: f32) -> bool {
    let dx = x as f32 - cx;
    let dy = y as f32 - cy;
    (dx * dx + dy * dy).sqrt() <= MOUTH_RADIUS
}

fn make_template() -> GrayImage {
    GrayImage::from_fn(90, 90, |x, y| {
        if mouth_at(x, y, 45.0, 45.0) {
            Luma([40])
        } else {
            Luma([200])
        }
    })
}

fn make_crate(rows: u32, cols: u32) -> RgbImage {
    let w = ORIGIN * 2 + PITCH * cols;
    let h = ORIGIN * 2 + PITCH * rows;
    RgbImage::from_fn(w, h, |x, y| {
        if x < ORIGIN || y < ORIGIN || x >= w - ORIGIN || y >= h - ORIGIN {
            return Rgb([0; 3]);
        }
        let col = (x - ORIGIN) / PITCH;
        let row = (y - ORIGIN) / PITCH;
        let cx = (ORIGIN + col * PITCH + PITCH / 2) as f32;
        let cy = (ORIGIN + row * PITCH + PITCH / 2) as f32;
        if mouth_at(x, y, cx, cy) {
            Rgb([40; 3])
        } else {
            Rgb([200; 3])
        }
    })
}

fn config(rows: u32, cols: u32) -> InspectionConfig {
    let mut config = InspectionConfig::default();
    config.image = ImageSize {
        width: ORIGIN * 2 + PITCH * cols,
        height: ORIGIN * 2 + PITCH * rows,
    };
    config.grid = GridConfig { rows, cols };
    config.feather = FeatherConfig { x: 0.05, y: 0.05 };
    config
}

fn bench_detect_circle(c: &mut Criterion) {
    let template = make_template();
    let params = InspectionConfig::default().circle;
    c.bench_function("detect_circle_90px", |b| {
        b.iter(|| detect_circle(black_box(&template), black_box(&params)))
    });
}

fn bench_inspect(c: &mut Criterion) {
    let (rows, cols) = (4, 6);
    let template = DynamicImage::ImageLuma8(make_template());
    let analyzer = Analyzer::new(config(rows, cols), &template).expect("analyzer");
    let image = DynamicImage::ImageRgb8(make_crate(rows, cols));
    c.bench_function("inspect_4x6", |b| {
        b.iter(|| analyzer.inspect(black_box(&image)).expect("inspection"))
    });
}

criterion_group!(benches, bench_detect_circle, bench_inspect);
criterion_main!(benches);
