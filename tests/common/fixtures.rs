use image::{Rgba, RgbaImage};
use tempfile::NamedTempFile;
use vertexenum::Point;

pub const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Square grid drawing: `cells` x `cells` cells of side `pitch`, lines
/// `line_width` px thick, starting at `margin`.
pub struct GridDrawing {
    pub cells: u32,
    pub pitch: u32,
    pub margin: u32,
    pub line_width: u32,
}

impl Default for GridDrawing {
    fn default() -> Self {
        Self {
            cells: 3,
            pitch: 60,
            margin: 30,
            line_width: 2,
        }
    }
}

impl GridDrawing {
    pub fn size(&self) -> u32 {
        2 * self.margin + self.cells * self.pitch + self.line_width
    }

    /// Centres of the line crossings (the true junctions)
    pub fn nodes(&self) -> Vec<Point> {
        let half = (self.line_width as f64 - 1.0) / 2.0;
        let mut nodes = Vec::new();
        for row in 0..=self.cells {
            for col in 0..=self.cells {
                nodes.push(Point::new(
                    (self.margin + col * self.pitch) as f64 + half,
                    (self.margin + row * self.pitch) as f64 + half,
                ));
            }
        }
        nodes
    }

    fn is_line(&self, x: u32, y: u32) -> bool {
        let span = self.cells * self.pitch + self.line_width;
        let on_axis = |v: u32| v >= self.margin && v < self.margin + span;
        let on_line = |v: u32| (v - self.margin) % self.pitch < self.line_width;
        on_axis(x) && on_axis(y) && (on_line(x) || on_line(y))
    }

    /// Lines drawn on a transparent canvas
    pub fn transparent(&self) -> RgbaImage {
        let size = self.size();
        RgbaImage::from_fn(size, size, |x, y| if self.is_line(x, y) { INK } else { CLEAR })
    }

    /// Lines drawn on opaque white paper
    pub fn opaque(&self) -> RgbaImage {
        let size = self.size();
        RgbaImage::from_fn(size, size, |x, y| if self.is_line(x, y) { INK } else { PAPER })
    }
}

/// Save `img` as a temporary PNG. The file is removed when dropped.
pub fn save_temp_png(img: &RgbaImage) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .prefix("mesh")
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    img.save_with_format(file.path(), image::ImageFormat::Png)
        .expect("Failed to save test image");
    file
}

/// Blank canvas matching the coordinate range used by point fixtures
pub fn blank_canvas() -> RgbaImage {
    RgbaImage::from_pixel(200, 200, PAPER)
}

/// `cols` x `rows` lattice of points with spacing `pitch`, offset by `origin`
pub fn lattice(cols: usize, rows: usize, pitch: f64, origin: Point) -> Vec<Point> {
    let mut points = Vec::with_capacity(cols * rows);
    for r in 0..rows {
        for c in 0..cols {
            points.push(Point::new(
                origin.x + c as f64 * pitch,
                origin.y + r as f64 * pitch,
            ));
        }
    }
    points
}

/// Each point repeated as a tight cloud whose centroid is the point itself
pub fn jittered(points: &[Point]) -> Vec<Point> {
    const OFFSETS: [(f64, f64); 4] = [(0.0, 0.0), (1.5, 0.0), (0.0, -1.5), (-1.5, 1.5)];
    points
        .iter()
        .flat_map(|p| OFFSETS.iter().map(move |(dx, dy)| Point::new(p.x + dx, p.y + dy)))
        .collect()
}

/// Distance from `p` to the nearest of `targets`
pub fn nearest_distance(p: &Point, targets: &[Point]) -> f64 {
    targets
        .iter()
        .map(|t| p.distance(t))
        .fold(f64::INFINITY, f64::min)
}
