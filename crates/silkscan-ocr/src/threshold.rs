//! Hard binarization of rendered layers before recognition.

use image::{GrayImage, Luma, RgbImage};

/// Default cut between ink and background.
pub const DEFAULT_THRESHOLD: u8 = 128;

/// Convert to grayscale by averaging channels, then binarize:
/// pixels with average `< threshold` become black, everything else white.
pub fn binarize(rgb: &RgbImage, threshold: u8) -> GrayImage {
    // avg < t  <=>  r + g + b < 3t, which avoids rounding the average.
    let cut = 3 * threshold as u16;
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let sum = r as u16 + g as u16 + b as u16;
        Luma([if sum < cut { 0 } else { 255 }])
    })
}
