use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::error::{Result, VertexError};
use crate::models::Point;
use crate::session::Rendering;

pub const CSV_HEADER: &str = "id,x,y";

/// Render an ordered sequence as `id,x,y` rows with 1-based ids
pub fn to_csv_string(ordered: &[Point]) -> String {
    let mut out = String::with_capacity(16 * (ordered.len() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');
    for (i, p) in ordered.iter().enumerate() {
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{},{:.2},{:.2}", i + 1, p.x, p.y);
    }
    out
}

pub fn write_csv(path: &Path, ordered: &[Point]) -> Result<()> {
    std::fs::write(path, to_csv_string(ordered))?;
    Ok(())
}

/// Parse `id,x,y` rows back into `(id, point)` pairs
pub fn parse_csv(text: &str) -> Result<Vec<(usize, Point)>> {
    let mut lines = text.lines().enumerate();

    match lines.next() {
        Some((_, header)) if header.trim() == CSV_HEADER => {}
        Some((_, header)) => {
            return Err(VertexError::CsvParse {
                line: 1,
                message: format!("expected header '{}', found '{}'", CSV_HEADER, header.trim()),
            });
        }
        None => {
            return Err(VertexError::CsvParse {
                line: 1,
                message: "missing header".to_string(),
            });
        }
    }

    let mut rows = Vec::new();
    for (idx, line) in lines {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != 3 {
            return Err(VertexError::CsvParse {
                line: line_no,
                message: format!("expected 3 fields, found {}", fields.len()),
            });
        }
        let parse_err = |what: &str, value: &str| VertexError::CsvParse {
            line: line_no,
            message: format!("invalid {} '{}'", what, value),
        };
        let id = fields[0].parse::<usize>().map_err(|_| parse_err("id", fields[0]))?;
        let x = fields[1].parse::<f64>().map_err(|_| parse_err("x", fields[1]))?;
        let y = fields[2].parse::<f64>().map_err(|_| parse_err("y", fields[2]))?;
        rows.push((id, Point::new(x, y)));
    }
    Ok(rows)
}

pub fn read_csv(path: &Path) -> Result<Vec<(usize, Point)>> {
    parse_csv(&std::fs::read_to_string(path)?)
}

/// Save as PNG, appending `.png` when the path lacks it. Returns the path written.
pub fn save_png(path: &Path, img: &RgbaImage) -> Result<PathBuf> {
    let has_png_ext = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    let target = if has_png_ext {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_owned();
        name.push(".png");
        PathBuf::from(name)
    };

    img.save_with_format(&target, image::ImageFormat::Png)
        .map_err(|source| VertexError::ImageSave {
            path: target.clone(),
            source,
        })?;
    Ok(target)
}

/// Files written by [`export_rendering`]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Exported {
    pub png: Option<PathBuf>,
    pub csv: Option<PathBuf>,
}

impl Exported {
    pub fn is_empty(&self) -> bool {
        self.png.is_none() && self.csv.is_none()
    }
}

/// Write the numbered image and/or CSV of a rendering.
///
/// An empty rendering is refused with a warning and nothing is written.
pub fn export_rendering(
    rendering: &Rendering,
    png: Option<&Path>,
    csv: Option<&Path>,
) -> Result<Exported> {
    let mut exported = Exported::default();
    if rendering.is_empty() {
        tracing::warn!(
            subset = rendering.subset.label(),
            "nothing to number; skipping export"
        );
        return Ok(exported);
    }

    if let Some(path) = png {
        exported.png = Some(save_png(path, &rendering.image)?);
    }
    if let Some(path) = csv {
        write_csv(path, &rendering.ordered)?;
        exported.csv = Some(path.to_path_buf());
    }
    Ok(exported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_layout() {
        let text = to_csv_string(&[Point::new(1.0, 2.5), Point::new(10.126, 3.0)]);
        assert_eq!(text, "id,x,y\n1,1.00,2.50\n2,10.13,3.00\n");
    }

    #[test]
    fn empty_sequence_has_header_only() {
        assert_eq!(to_csv_string(&[]), "id,x,y\n");
        assert!(parse_csv("id,x,y\n").unwrap().is_empty());
    }

    #[test]
    fn bad_header_is_rejected() {
        assert!(matches!(
            parse_csv("x,y\n1,2"),
            Err(VertexError::CsvParse { line: 1, .. })
        ));
    }

    #[test]
    fn bad_row_reports_line() {
        let err = parse_csv("id,x,y\n1,1.00,2.00\n2,abc,3.00\n").unwrap_err();
        assert!(matches!(err, VertexError::CsvParse { line: 3, .. }));
    }
}
