use imageproc::corners::corners_fast9;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

use crate::config::{CornerDetectorKind, DetectionParams};
use crate::detection::mask::EdgeMask;
use crate::models::Point;

/// Source of raw candidate points inside an ink mask
pub trait CornerDetector {
    fn detect(&self, mask: &EdgeMask) -> Vec<Point>;

    /// Human-readable name (used in log output)
    fn name(&self) -> &str;
}

/// Harris corner response with good-features-to-track selection
#[derive(Debug, Clone)]
pub struct HarrisCornerDetector {
    pub max_corners: usize,
    /// Fraction of the strongest response a corner must reach
    pub quality_level: f32,
    pub min_distance: f64,
    /// Side of the structure tensor window
    pub block_size: u32,
    pub k: f32,
}

impl Default for HarrisCornerDetector {
    fn default() -> Self {
        Self {
            max_corners: 2000,
            quality_level: 0.01,
            min_distance: 5.0,
            block_size: 5,
            k: 0.06,
        }
    }
}

impl CornerDetector for HarrisCornerDetector {
    fn detect(&self, mask: &EdgeMask) -> Vec<Point> {
        let width = mask.width() as usize;
        let height = mask.height() as usize;
        if width == 0 || height == 0 {
            return Vec::new();
        }

        let response = harris_response(mask, self.block_size, self.k);
        let max_response = response.iter().copied().fold(0.0f32, f32::max);
        if max_response <= 0.0 {
            return Vec::new();
        }
        let threshold = max_response * self.quality_level;

        let mut candidates = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let r = response[y * width + x];
                if r <= threshold || !is_local_max(&response, width, height, x, y) {
                    continue;
                }
                candidates.push((Point::new(x as f64, y as f64), r));
            }
        }

        select_strongest(candidates, self.min_distance, self.max_corners)
    }

    fn name(&self) -> &str {
        "Harris Corners"
    }
}

/// FAST-9 segment test corners
#[derive(Debug, Clone)]
pub struct FastCornerDetector {
    pub max_corners: usize,
    pub min_distance: f64,
    pub threshold: u8,
}

impl Default for FastCornerDetector {
    fn default() -> Self {
        Self {
            max_corners: 2000,
            min_distance: 5.0,
            threshold: 20,
        }
    }
}

impl CornerDetector for FastCornerDetector {
    fn detect(&self, mask: &EdgeMask) -> Vec<Point> {
        let candidates = corners_fast9(mask.as_gray(), self.threshold)
            .into_iter()
            .map(|c| (Point::new(c.x as f64, c.y as f64), c.score))
            .collect();
        select_strongest(candidates, self.min_distance, self.max_corners)
    }

    fn name(&self) -> &str {
        "FAST-9 Corners"
    }
}

/// Build the detector selected in the detection parameters
pub fn detector_for(params: &DetectionParams) -> Box<dyn CornerDetector> {
    match params.detector {
        CornerDetectorKind::Harris => Box::new(HarrisCornerDetector {
            max_corners: params.max_corners,
            min_distance: params.corner_spacing(),
            ..Default::default()
        }),
        CornerDetectorKind::Fast => Box::new(FastCornerDetector {
            max_corners: params.max_corners,
            min_distance: params.corner_spacing(),
            ..Default::default()
        }),
    }
}

/// Harris response `det(M) - k * trace(M)^2` per pixel, row-major
fn harris_response(mask: &EdgeMask, block_size: u32, k: f32) -> Vec<f32> {
    let gx = horizontal_sobel(mask.as_gray());
    let gy = vertical_sobel(mask.as_gray());
    let width = mask.width() as usize;
    let height = mask.height() as usize;

    let mut xx = vec![0.0f64; width * height];
    let mut yy = vec![0.0f64; width * height];
    let mut xy = vec![0.0f64; width * height];
    for y in 0..height {
        for x in 0..width {
            let dx = gx.get_pixel(x as u32, y as u32)[0] as f64;
            let dy = gy.get_pixel(x as u32, y as u32)[0] as f64;
            let i = y * width + x;
            xx[i] = dx * dx;
            yy[i] = dy * dy;
            xy[i] = dx * dy;
        }
    }

    let radius = (block_size / 2) as usize;
    let sxx = IntegralImage::new(&xx, width, height);
    let syy = IntegralImage::new(&yy, width, height);
    let sxy = IntegralImage::new(&xy, width, height);

    let k = k as f64;
    let mut response = vec![0.0f32; width * height];
    for y in 0..height {
        let y0 = y.saturating_sub(radius);
        let y1 = (y + radius).min(height - 1);
        for x in 0..width {
            let x0 = x.saturating_sub(radius);
            let x1 = (x + radius).min(width - 1);
            let a = sxx.sum(x0, y0, x1, y1);
            let b = sxy.sum(x0, y0, x1, y1);
            let c = syy.sum(x0, y0, x1, y1);
            let trace = a + c;
            response[y * width + x] = (a * c - b * b - k * trace * trace) as f32;
        }
    }
    response
}

fn is_local_max(response: &[f32], width: usize, height: usize, x: usize, y: usize) -> bool {
    let r = response[y * width + x];
    for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
        for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
            if response[ny * width + nx] > r {
                return false;
            }
        }
    }
    true
}

/// Strongest-first greedy selection honoring a minimum spacing
fn select_strongest(
    mut candidates: Vec<(Point, f32)>,
    min_distance: f64,
    max_corners: usize,
) -> Vec<Point> {
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut accepted: Vec<Point> = Vec::new();
    for (point, _) in candidates {
        if accepted.len() >= max_corners {
            break;
        }
        if min_distance >= 1.0 && accepted.iter().any(|a| a.distance(&point) < min_distance) {
            continue;
        }
        accepted.push(point);
    }
    accepted
}

/// Summed-area table for constant-time window sums
struct IntegralImage {
    sums: Vec<f64>,
    stride: usize,
}

impl IntegralImage {
    fn new(values: &[f64], width: usize, height: usize) -> Self {
        let stride = width + 1;
        let mut sums = vec![0.0; stride * (height + 1)];
        for y in 0..height {
            let mut row = 0.0;
            for x in 0..width {
                row += values[y * width + x];
                sums[(y + 1) * stride + x + 1] = sums[y * stride + x + 1] + row;
            }
        }
        Self { sums, stride }
    }

    /// Sum over the inclusive rectangle `[x0, x1] x [y0, y1]`
    fn sum(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> f64 {
        let s = self.stride;
        self.sums[(y1 + 1) * s + x1 + 1] - self.sums[y0 * s + x1 + 1] - self.sums[(y1 + 1) * s + x0]
            + self.sums[y0 * s + x0]
    }
}
