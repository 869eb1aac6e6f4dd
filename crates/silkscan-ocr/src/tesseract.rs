//! `tesseract` command-line backend.

use std::process::{Command, Stdio};

use image::{GrayImage, ImageFormat};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{PixelBox, RecognizeError, RecognizedWord, TextRecognizer};

/// TSV row level of a single word.
const WORD_LEVEL: &str = "5";

/// Runs the `tesseract` binary on a temporary PNG and parses its TSV output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TesseractCli {
    /// Executable name or path.
    pub binary: String,
    pub language: String,
    /// Page segmentation mode; 6 treats the raster as one uniform block.
    pub psm: u8,
    pub dpi: u32,
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self {
            binary: "tesseract".to_string(),
            language: "eng".to_string(),
            psm: 6,
            dpi: 300,
        }
    }
}

impl TesseractCli {
    /// True when the binary can be started.
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|s| s.success())
    }
}

impl TextRecognizer for TesseractCli {
    fn recognize(&self, image: &GrayImage) -> Result<Vec<RecognizedWord>, RecognizeError> {
        // Removed on drop, on every exit path.
        let input = tempfile::Builder::new()
            .prefix("silkscan-")
            .suffix(".png")
            .tempfile()?;
        image.save_with_format(input.path(), ImageFormat::Png)?;

        let output = Command::new(&self.binary)
            .arg(input.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .arg("--psm")
            .arg(self.psm.to_string())
            .arg("--dpi")
            .arg(self.dpi.to_string())
            .arg("tsv")
            .stdin(Stdio::null())
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecognizeError::Engine(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }

        let words = parse_tsv(&String::from_utf8_lossy(&output.stdout))?;
        debug!(
            "tesseract read {} words from {}x{} raster",
            words.len(),
            image.width(),
            image.height()
        );
        Ok(words)
    }
}

/// Parse tesseract TSV output into word boxes.
///
/// Only word-level rows with non-blank text are kept. The header row and
/// page/block/line rows are skipped.
pub fn parse_tsv(tsv: &str) -> Result<Vec<RecognizedWord>, RecognizeError> {
    let mut words = Vec::new();
    for (idx, line) in tsv.lines().enumerate() {
        let lineno = idx + 1;
        if line.trim().is_empty() || line.starts_with("level") {
            continue;
        }
        let cols: Vec<&str> = line.splitn(12, '\t').collect();
        if cols.len() < 11 {
            return Err(RecognizeError::Output {
                line: lineno,
                reason: format!("expected 12 columns, got {}", cols.len()),
            });
        }
        if cols[0] != WORD_LEVEL {
            continue;
        }
        let text = cols.get(11).map_or("", |t| t.trim());
        if text.is_empty() {
            continue;
        }

        let num = |i: usize| -> Result<f64, RecognizeError> {
            cols[i].trim().parse::<f64>().map_err(|e| RecognizeError::Output {
                line: lineno,
                reason: format!("column {}: {e}", i + 1),
            })
        };
        let bbox = PixelBox::from_xywh(num(6)?, num(7)?, num(8)?, num(9)?);
        let conf = num(10)?;

        words.push(RecognizedWord {
            text: text.to_string(),
            bbox,
            confidence: (conf >= 0.0).then_some(conf as f32),
        });
    }
    Ok(words)
}
