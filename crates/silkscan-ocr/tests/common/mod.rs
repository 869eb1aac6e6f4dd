#![allow(dead_code)]

use std::time::Duration;

use image::GrayImage;
use nalgebra::Point2;
use silkscan_core::{rect_polygon, BoardSpace, Layer, LayerType, VectorGraphic};
use silkscan_ocr::{PixelBox, RecognizeError, RecognizedWord, TextRecognizer};

/// Stand-in OCR engine: every dark blob is a word, labelled by the length of
/// its long side in pixels.
///
/// With `horizontal_only` the reader behaves like a real engine facing
/// rotated text and ignores blobs taller than they are wide.
pub struct BlobReader {
    legend: Vec<(f64, String)>,
    pub horizontal_only: bool,
    /// Sleep before answering when a blob with this label is present.
    pub slow_label: Option<(String, Duration)>,
    /// Fail outright when a blob with this label is present.
    pub fail_label: Option<String>,
}

impl BlobReader {
    pub fn new<S: Into<String>>(legend: impl IntoIterator<Item = (f64, S)>) -> Self {
        Self {
            legend: legend.into_iter().map(|(len, s)| (len, s.into())).collect(),
            horizontal_only: false,
            slow_label: None,
            fail_label: None,
        }
    }

    fn label(&self, bbox: &PixelBox) -> Option<&str> {
        let long = (bbox.x1 - bbox.x0).max(bbox.y1 - bbox.y0);
        self.legend
            .iter()
            .min_by(|a, b| (a.0 - long).abs().total_cmp(&(b.0 - long).abs()))
            .filter(|(len, _)| (len - long).abs() <= 4.0)
            .map(|(_, s)| s.as_str())
    }
}

impl TextRecognizer for BlobReader {
    fn recognize(&self, image: &GrayImage) -> Result<Vec<RecognizedWord>, RecognizeError> {
        let mut words = Vec::new();
        for bbox in find_blobs(image) {
            let Some(text) = self.label(&bbox) else {
                continue;
            };
            if self.fail_label.as_deref() == Some(text) {
                return Err(RecognizeError::Engine("engine crashed".into()));
            }
            if let Some((slow, delay)) = &self.slow_label {
                if slow == text {
                    std::thread::sleep(*delay);
                }
            }
            let (w, h) = (bbox.x1 - bbox.x0, bbox.y1 - bbox.y0);
            if self.horizontal_only && h > w {
                continue;
            }
            words.push(RecognizedWord::new(text, bbox));
        }
        Ok(words)
    }
}

/// Bounding boxes of 4-connected black regions, as pixel-edge boxes.
pub fn find_blobs(image: &GrayImage) -> Vec<PixelBox> {
    let (w, h) = image.dimensions();
    let mut seen = vec![false; (w * h) as usize];
    let mut out = Vec::new();
    let mut stack = Vec::new();

    for y in 0..h {
        for x in 0..w {
            let idx = (y * w + x) as usize;
            if seen[idx] || image.get_pixel(x, y).0[0] != 0 {
                continue;
            }
            seen[idx] = true;
            stack.push((x, y));
            let (mut x0, mut y0, mut x1, mut y1) = (x, y, x, y);
            while let Some((cx, cy)) = stack.pop() {
                x0 = x0.min(cx);
                y0 = y0.min(cy);
                x1 = x1.max(cx);
                y1 = y1.max(cy);
                let neighbours = [
                    (cx.wrapping_sub(1), cy),
                    (cx + 1, cy),
                    (cx, cy.wrapping_sub(1)),
                    (cx, cy + 1),
                ];
                for (nx, ny) in neighbours {
                    if nx >= w || ny >= h {
                        continue;
                    }
                    let n = (ny * w + nx) as usize;
                    if !seen[n] && image.get_pixel(nx, ny).0[0] == 0 {
                        seen[n] = true;
                        stack.push((nx, ny));
                    }
                }
            }
            out.push(PixelBox::new(
                x0 as f64,
                y0 as f64,
                x1 as f64 + 1.0,
                y1 as f64 + 1.0,
            ));
        }
    }
    out
}

/// 20 x 10 native-unit board at the origin.
pub fn board_space() -> BoardSpace {
    BoardSpace::from_native(0.0, 0.0, 20.0, 10.0).expect("board space")
}

/// Raster pixels per plotter unit for [`board_space`] at default parameters.
pub const PX_PER_PLOTTER: f64 = 2500.0 / 20000.0;

/// Filled rectangle in native units, sized in raster pixels.
pub fn blob(graphic: &mut VectorGraphic, native: (f64, f64), w_px: f64, h_px: f64) {
    graphic.push(rect_polygon(
        Point2::new(native.0 * 1000.0, native.1 * 1000.0),
        w_px / PX_PER_PLOTTER,
        h_px / PX_PER_PLOTTER,
    ));
}

pub fn layer(filename: &str, layer_type: LayerType, graphic: VectorGraphic) -> Layer {
    Layer {
        filename: filename.to_string(),
        layer_type,
        graphic,
        frame: board_space(),
        visible: true,
    }
}
