use image::{GrayImage, Luma, RgbaImage};

use crate::detection::preprocessing;

const ADAPTIVE_SIGMA: f32 = 5.0;
const ADAPTIVE_OFFSET: i16 = 10;
const CANNY_LOW: f32 = 60.0;
const CANNY_HIGH: f32 = 160.0;

/// Binary ink mask stored as a 0/255 grayscale image
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeMask {
    image: GrayImage,
}

impl EdgeMask {
    /// Wrap a grayscale image, treating every non-zero pixel as ink
    pub fn from_gray(img: &GrayImage) -> Self {
        let mut image = GrayImage::new(img.width(), img.height());
        for (x, y, pixel) in img.enumerate_pixels() {
            if pixel[0] > 0 {
                image.put_pixel(x, y, Luma([255]));
            }
        }
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn is_ink(&self, x: u32, y: u32) -> bool {
        self.image.get_pixel(x, y)[0] > 0
    }

    pub fn ink_count(&self) -> usize {
        self.image.pixels().filter(|p| p[0] > 0).count()
    }

    /// The mask as an 8-bit image (ink = 255)
    pub fn as_gray(&self) -> &GrayImage {
        &self.image
    }
}

/// Extract the mesh lines from an RGBA raster.
///
/// Images with real transparency use `alpha > 0` directly; fully opaque
/// images fall back to adaptive thresholding OR Canny edges. Either way the
/// result is closed once to bridge single-pixel gaps.
pub fn extract_edge_mask(img: &RgbaImage) -> EdgeMask {
    let has_alpha = img.pixels().any(|p| p[3] < 255);

    let raw = if has_alpha {
        let mut mask = GrayImage::new(img.width(), img.height());
        for (x, y, pixel) in img.enumerate_pixels() {
            if pixel[3] > 0 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        mask
    } else {
        let gray = preprocessing::to_grayscale(img);
        let mut thresholded =
            preprocessing::adaptive_threshold_inv(&gray, ADAPTIVE_SIGMA, ADAPTIVE_OFFSET);
        let edges = preprocessing::detect_edges(&thresholded, CANNY_LOW, CANNY_HIGH);
        for (x, y, pixel) in edges.enumerate_pixels() {
            if pixel[0] > 0 {
                thresholded.put_pixel(x, y, Luma([255]));
            }
        }
        thresholded
    };

    EdgeMask {
        image: preprocessing::close_gaps(&raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn transparent_input_uses_alpha_channel() {
        let mut img = RgbaImage::from_pixel(20, 20, Rgba([255, 255, 255, 0]));
        for x in 2..18 {
            img.put_pixel(x, 10, Rgba([0, 0, 0, 255]));
        }
        let mask = extract_edge_mask(&img);
        assert!(mask.is_ink(5, 10));
        assert!(!mask.is_ink(5, 3));
        assert_eq!(mask.width(), 20);
        assert_eq!(mask.height(), 20);
    }

    #[test]
    fn closing_bridges_single_pixel_gap() {
        let mut img = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 0]));
        for x in 2..18 {
            if x != 9 {
                img.put_pixel(x, 10, Rgba([0, 0, 0, 255]));
            }
        }
        let mask = extract_edge_mask(&img);
        assert!(mask.is_ink(9, 10));
    }

    #[test]
    fn opaque_input_finds_dark_lines() {
        let mut img = RgbaImage::from_pixel(60, 60, Rgba([255, 255, 255, 255]));
        for x in 5..55 {
            for y in 29..31 {
                img.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
        let mask = extract_edge_mask(&img);
        assert!(mask.is_ink(30, 30));
        assert!(!mask.is_ink(30, 5));
    }

    #[test]
    fn blank_opaque_image_has_no_ink() {
        let img = RgbaImage::from_pixel(16, 16, Rgba([200, 200, 200, 255]));
        assert_eq!(extract_edge_mask(&img).ink_count(), 0);
    }
}
