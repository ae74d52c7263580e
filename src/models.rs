use image::Rgba;
use serde::{Deserialize, Serialize};

/// A position in image-pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Mean position of a non-empty slice of points.
    ///
    /// Returns `None` for an empty slice.
    pub fn centroid<'a, I>(points: I) -> Option<Point>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut count = 0usize;
        for p in points {
            sum_x += p.x;
            sum_y += p.y;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        Some(Point::new(sum_x / count as f64, sum_y / count as f64))
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

/// Topological role assigned by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VertexClass {
    Junction,
    EdgeCenter,
    CellCenter,
}

/// Which points get ordered, labelled and exported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Subset {
    #[default]
    All,
    Junctions,
    EdgeCenters,
    CellCenters,
}

impl Subset {
    /// The classifier bucket behind this subset; `None` selects every point
    pub fn class(&self) -> Option<VertexClass> {
        match self {
            Subset::All => None,
            Subset::Junctions => Some(VertexClass::Junction),
            Subset::EdgeCenters => Some(VertexClass::EdgeCenter),
            Subset::CellCenters => Some(VertexClass::CellCenter),
        }
    }

    /// Suffix used in default output file names
    pub fn file_suffix(&self) -> &'static str {
        match self {
            Subset::All => "all",
            Subset::Junctions => "junctions",
            Subset::EdgeCenters => "edge_centers",
            Subset::CellCenters => "cell_centers",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Subset::All => "all points",
            Subset::Junctions => "junctions",
            Subset::EdgeCenters => "edge centers",
            Subset::CellCenters => "cell centers",
        }
    }
}

/// Fixed palette for label rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LabelColor {
    #[default]
    Red,
    Blue,
    Green,
    Black,
    White,
    Orange,
}

impl LabelColor {
    pub fn rgba(&self) -> Rgba<u8> {
        match self {
            LabelColor::Red => Rgba([255, 0, 0, 255]),
            LabelColor::Blue => Rgba([0, 0, 255, 255]),
            LabelColor::Green => Rgba([0, 180, 0, 255]),
            LabelColor::Black => Rgba([0, 0, 0, 255]),
            LabelColor::White => Rgba([255, 255, 255, 255]),
            LabelColor::Orange => Rgba([255, 165, 0, 255]),
        }
    }
}
