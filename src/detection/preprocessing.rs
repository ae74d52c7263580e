use image::{GrayImage, Luma, RgbaImage};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::close;

/// Convert image to grayscale
pub fn to_grayscale(img: &RgbaImage) -> GrayImage {
    image::imageops::grayscale(img)
}

/// Apply Gaussian blur to reduce noise
pub fn apply_blur(img: &GrayImage, sigma: f32) -> GrayImage {
    gaussian_blur_f32(img, sigma)
}

/// Gaussian-weighted adaptive threshold, inverted so dark ink becomes 255.
///
/// A pixel is ink when it is at least `offset` below its local weighted mean.
pub fn adaptive_threshold_inv(img: &GrayImage, sigma: f32, offset: i16) -> GrayImage {
    let local_mean = apply_blur(img, sigma);
    let mut out = GrayImage::new(img.width(), img.height());
    for (x, y, pixel) in img.enumerate_pixels() {
        let mean = local_mean.get_pixel(x, y)[0] as i16;
        let value = if pixel[0] as i16 <= mean - offset { 255 } else { 0 };
        out.put_pixel(x, y, Luma([value]));
    }
    out
}

/// Detect edges using Canny edge detector
pub fn detect_edges(img: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    canny(img, low_threshold, high_threshold)
}

/// Morphological closing with a 3x3 square neighborhood
pub fn close_gaps(img: &GrayImage) -> GrayImage {
    close(img, Norm::LInf, 1)
}
