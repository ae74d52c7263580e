use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_line_segment_mut};

use crate::config::RenderParams;
use crate::detection::font;
use crate::models::Point;

/// Appearance of the sequence labels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    pub color: Rgba<u8>,
    pub font_scale: f64,
    pub thickness: u32,
}

impl From<&RenderParams> for LabelStyle {
    fn from(params: &RenderParams) -> Self {
        Self {
            color: params.color.rgba(),
            font_scale: params.font_scale,
            thickness: params.thickness,
        }
    }
}

/// Copy `source` and draw `1..=N` centered on each ordered point
pub fn draw_numbers(source: &RgbaImage, ordered: &[Point], style: &LabelStyle) -> RgbaImage {
    let mut out = source.clone();
    for (i, point) in ordered.iter().enumerate() {
        draw_label(&mut out, &(i + 1).to_string(), *point, style);
    }
    out
}

/// Draw `text` centered on `center`; pixels outside the canvas are clipped
pub fn draw_label(canvas: &mut RgbaImage, text: &str, center: Point, style: &LabelStyle) {
    let scale = style.font_scale;
    let (w, h) = font::text_extent(text);
    let origin_x = center.x - w * scale / 2.0;
    let origin_y = center.y - h * scale / 2.0;

    for (i, c) in text.chars().enumerate() {
        let Some(strokes) = font::glyph(c) else {
            continue;
        };
        let glyph_x = origin_x + i as f64 * font::GLYPH_ADVANCE * scale;
        for stroke in strokes {
            for pair in stroke.windows(2) {
                let start = (glyph_x + pair[0].0 * scale, origin_y + pair[0].1 * scale);
                let end = (glyph_x + pair[1].0 * scale, origin_y + pair[1].1 * scale);
                draw_stroke(canvas, start, end, style.thickness, style.color);
            }
        }
    }
}

/// Mark each point with a small ring (used for debug overlays)
pub fn draw_markers(
    source: &RgbaImage,
    points: &[Point],
    radius: i32,
    color: Rgba<u8>,
) -> RgbaImage {
    let mut out = source.clone();
    for p in points {
        draw_hollow_circle_mut(&mut out, (p.x.round() as i32, p.y.round() as i32), radius, color);
    }
    out
}

fn draw_stroke(
    canvas: &mut RgbaImage,
    start: (f64, f64),
    end: (f64, f64),
    thickness: u32,
    color: Rgba<u8>,
) {
    if thickness <= 1 {
        draw_line_segment_mut(
            canvas,
            (start.0 as f32, start.1 as f32),
            (end.0 as f32, end.1 as f32),
            color,
        );
        return;
    }

    // Round-capped band of width `thickness` around the segment. Even widths
    // shift the centre line half a pixel so the band covers whole pixel rows.
    let half = thickness as f64 / 2.0;
    let shift = if thickness % 2 == 0 { 0.5 } else { 0.0 };
    let a = (start.0 - shift, start.1 - shift);
    let b = (end.0 - shift, end.1 - shift);

    let (width, height) = canvas.dimensions();
    let min_x = (a.0.min(b.0) - half).floor().max(0.0);
    let min_y = (a.1.min(b.1) - half).floor().max(0.0);
    let max_x = (a.0.max(b.0) + half).ceil().min(width as f64 - 1.0);
    let max_y = (a.1.max(b.1) + half).ceil().min(height as f64 - 1.0);
    if max_x < min_x || max_y < min_y {
        return;
    }

    for y in min_y as u32..=max_y as u32 {
        for x in min_x as u32..=max_x as u32 {
            if segment_distance((x as f64, y as f64), a, b) <= half {
                canvas.put_pixel(x, y, color);
            }
        }
    }
}

fn segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0)
    };
    ((p.0 - a.0 - t * dx).powi(2) + (p.1 - a.1 - t * dy).powi(2)).sqrt()
}
