//! Boundary to the OCR engine.

use std::sync::Arc;

use image::GrayImage;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Word box in the pixel frame of the image that was recognized.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PixelBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl PixelBox {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Box from a top-left corner and a size.
    pub fn from_xywh(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    #[inline]
    pub fn center(&self) -> Point2<f64> {
        Point2::new((self.x0 + self.x1) * 0.5, (self.y0 + self.y1) * 0.5)
    }
}

/// One word as reported by the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecognizedWord {
    pub text: String,
    pub bbox: PixelBox,
    /// Engine confidence in percent, when reported. Not used for matching.
    #[serde(default)]
    pub confidence: Option<f32>,
}

impl RecognizedWord {
    pub fn new(text: impl Into<String>, bbox: PixelBox) -> Self {
        Self {
            text: text.into(),
            bbox,
            confidence: None,
        }
    }
}

/// Recognition failed for one image.
#[derive(thiserror::Error, Debug)]
pub enum RecognizeError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error("OCR engine failed: {0}")]
    Engine(String),
    #[error("malformed OCR output at line {line}: {reason}")]
    Output { line: usize, reason: String },
}

/// Text recognition capability: image in, words with pixel boxes out.
///
/// Implementations are shared by the worker pool of one localization run and
/// may be called concurrently.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, image: &GrayImage) -> Result<Vec<RecognizedWord>, RecognizeError>;
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for &T {
    fn recognize(&self, image: &GrayImage) -> Result<Vec<RecognizedWord>, RecognizeError> {
        (**self).recognize(image)
    }
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for Box<T> {
    fn recognize(&self, image: &GrayImage) -> Result<Vec<RecognizedWord>, RecognizeError> {
        (**self).recognize(image)
    }
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for Arc<T> {
    fn recognize(&self, image: &GrayImage) -> Result<Vec<RecognizedWord>, RecognizeError> {
        (**self).recognize(image)
    }
}
