//! Grayscale and contrast preparation ahead of OCR

use image::{DynamicImage, GrayImage, Luma};

/// Multiplier applied to each pixel's distance from the mean luminance
pub const CONTRAST_FACTOR: f32 = 2.0;

/// Convert to grayscale, then stretch contrast by [`CONTRAST_FACTOR`]
pub fn preprocess(img: &DynamicImage) -> GrayImage {
    enhance_contrast(&to_gray(img), CONTRAST_FACTOR)
}

/// ITU-R 601-2 luma, `L = R * 299/1000 + G * 587/1000 + B * 114/1000`.
///
/// Fixed-point with 16 fractional bits, rounded. The weights sum to 65536,
/// so gray input keeps its levels. Alpha is ignored.
pub fn to_gray(img: &DynamicImage) -> GrayImage {
    let rgb = img.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let l = u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471 + 0x8000;
        Luma([(l >> 16) as u8])
    })
}

/// Blend each pixel away from the image's mean gray level.
///
/// `out = mean + factor * (p - mean)`, clamped to `0..=255`. The mean is
/// rounded to the nearest integer level first, so a uniform image is
/// returned unchanged.
pub fn enhance_contrast(gray: &GrayImage, factor: f32) -> GrayImage {
    let pixel_count = u64::from(gray.width()) * u64::from(gray.height());
    if pixel_count == 0 {
        return gray.clone();
    }

    let sum: u64 = gray.pixels().map(|Luma([v])| u64::from(*v)).sum();
    let mean = (sum as f64 / pixel_count as f64 + 0.5).floor() as f32;

    let mut out = gray.clone();
    for Luma([v]) in out.pixels_mut() {
        let blended = mean + factor * (f32::from(*v) - mean);
        *v = blended.clamp(0.0, 255.0) as u8;
    }
    out
}
