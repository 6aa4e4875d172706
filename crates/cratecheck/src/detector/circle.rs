//! Circular feature detection: Otsu binarization, median smoothing, then a
//! Hough-gradient circle search.
//!
//! Every Canny edge pixel votes along its gradient direction (both senses) at
//! each integer radius in `[min_radius, max_radius]`. Accumulator local maxima
//! with at least `param2` votes become centre candidates, strongest first. For
//! each candidate the radius is the distance with the most edge support
//! (3-bin window), accepted when that support also reaches `param2`.

use image::{GrayImage, Luma};

use crate::config::CircleConfig;
use crate::geometry::Circle;

/// Blur applied before taking gradient directions for voting.
const GRADIENT_SIGMA: f32 = 1.4;

/// An edge pixel with its unit gradient direction.
#[derive(Debug, Clone, Copy)]
struct EdgePoint {
    x: f32,
    y: f32,
    dx: f32,
    dy: f32,
}

/// Dominant circle of a grayscale crop: the largest accepted radius, first
/// found on ties. `None` when the search finds nothing.
pub fn detect_circle(gray: &GrayImage, params: &CircleConfig) -> Option<Circle> {
    let (w, h) = gray.dimensions();
    if w == 0 || h == 0 {
        return None;
    }
    let binary = binarize(gray, params.binarize_threshold);
    let radius = params.median_kernel / 2;
    let smoothed = imageproc::filter::median_filter(&binary, radius, radius);
    largest_circle(&hough_circles(&smoothed, params))
}

/// Binary image at the Otsu level; `fallback` is used when the crop holds a
/// single intensity and Otsu has nothing to separate.
pub(crate) fn binarize(gray: &GrayImage, fallback: u8) -> GrayImage {
    let first = gray.as_raw().first().copied().unwrap_or(0);
    let uniform = gray.as_raw().iter().all(|&v| v == first);
    let level = if uniform {
        fallback
    } else {
        imageproc::contrast::otsu_level(gray)
    };
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y)[0] > level {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

fn largest_circle(circles: &[Circle]) -> Option<Circle> {
    circles.iter().fold(None, |best, &c| match best {
        Some(b) if b.r >= c.r => Some(b),
        _ => Some(c),
    })
}

fn edge_points(binary: &GrayImage, params: &CircleConfig) -> Vec<EdgePoint> {
    let edges = imageproc::edges::canny(binary, params.param1 * 0.5, params.param1);
    let blurred = imageproc::filter::gaussian_blur_f32(binary, GRADIENT_SIGMA);
    let gx = imageproc::gradients::horizontal_sobel(&blurred);
    let gy = imageproc::gradients::vertical_sobel(&blurred);

    let mut points = Vec::new();
    for (x, y, e) in edges.enumerate_pixels() {
        if e[0] == 0 {
            continue;
        }
        let gxv = gx.get_pixel(x, y)[0] as f32;
        let gyv = gy.get_pixel(x, y)[0] as f32;
        let mag = (gxv * gxv + gyv * gyv).sqrt();
        if mag < 1e-6 {
            continue;
        }
        points.push(EdgePoint {
            x: x as f32,
            y: y as f32,
            dx: gxv / mag,
            dy: gyv / mag,
        });
    }
    points
}

/// All accepted circles, ordered by centre accumulator score.
fn hough_circles(binary: &GrayImage, params: &CircleConfig) -> Vec<Circle> {
    let (w, h) = binary.dimensions();
    if w < 3 || h < 3 {
        return Vec::new();
    }
    let points = edge_points(binary, params);
    if points.is_empty() {
        return Vec::new();
    }

    let (r_min, r_max) = radius_range(params, w, h);
    let stride = w as usize;
    let mut accum = vec![0u32; stride * h as usize];
    for p in &points {
        for r in r_min..=r_max {
            let r = r as f32;
            for sign in [1.0f32, -1.0] {
                let cx = (p.x + sign * p.dx * r).round();
                let cy = (p.y + sign * p.dy * r).round();
                if cx >= 0.0 && cy >= 0.0 && cx < w as f32 && cy < h as f32 {
                    accum[cy as usize * stride + cx as usize] += 1;
                }
            }
        }
    }

    let mut centers = Vec::new();
    for y in 1..(h as usize - 1) {
        for x in 1..(stride - 1) {
            let idx = y * stride + x;
            let v = accum[idx];
            if v >= params.param2
                && v > accum[idx - 1]
                && v >= accum[idx + 1]
                && v > accum[idx - stride]
                && v >= accum[idx + stride]
            {
                centers.push((x as u32, y as u32, v));
            }
        }
    }
    // Stable: equal scores keep raster order.
    centers.sort_by(|a, b| b.2.cmp(&a.2));
    tracing::trace!("{} edge points, {} centre candidates", points.len(), centers.len());

    let min_dist_sq = params.min_center_distance * params.min_center_distance;
    let mut circles: Vec<Circle> = Vec::new();
    for (cx, cy, _) in centers {
        let too_close = circles.iter().any(|c| {
            let dx = c.x as f32 - cx as f32;
            let dy = c.y as f32 - cy as f32;
            dx * dx + dy * dy < min_dist_sq
        });
        if too_close {
            continue;
        }
        if let Some(r) = estimate_radius(&points, cx as f32, cy as f32, (r_min, r_max), params.param2) {
            circles.push(Circle { x: cx, y: cy, r });
        }
    }
    circles
}

/// Search radii clipped to `[1, crop diagonal]`; no circle centred inside
/// the crop can have edge support beyond that.
fn radius_range(params: &CircleConfig, w: u32, h: u32) -> (u32, u32) {
    let diagonal = (w as f64).hypot(h as f64).ceil() as u32;
    (params.min_radius.max(1), params.max_radius.min(diagonal))
}

fn estimate_radius(
    points: &[EdgePoint],
    cx: f32,
    cy: f32,
    (r_min, r_max): (u32, u32),
    min_support: u32,
) -> Option<u32> {
    if r_max < r_min {
        return None;
    }
    let (r_min, r_max) = (r_min as usize, r_max as usize);
    let mut hist = vec![0u32; r_max + 2];
    for p in points {
        let d = ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt().round() as usize;
        if d >= r_min && d <= r_max {
            hist[d] += 1;
        }
    }

    let mut best: Option<(usize, u32)> = None;
    for r in r_min..=r_max {
        let support = hist[r - 1] + hist[r] + hist[r + 1];
        if best.map_or(true, |(_, s)| support > s) {
            best = Some((r, support));
        }
    }
    let (r, support) = best?;
    (support >= min_support).then_some(r as u32)
}
