// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text recognition. Engines sit behind the `TextRecognizer` trait so the
// pipeline does not care which one is compiled in:
//
// - `tesseract` feature: Tesseract via `leptess`, honouring the configured
//   `--oem` / `--psm` engine mode.
// - `ocr` feature: the pure-Rust `ocrs` engine with `.rten` models.

#[cfg(feature = "ocr")]
pub mod ocrs_engine;

#[cfg(feature = "tesseract")]
pub mod tesseract;

use colophon_core::error::Result;
use colophon_core::{OcrBackend, PipelineConfig};
use image::GrayImage;
use tracing::{debug, warn};

#[cfg(feature = "ocr")]
pub use ocrs_engine::OcrsRecognizer;

#[cfg(feature = "tesseract")]
pub use tesseract::TesseractRecognizer;

/// An OCR engine that turns a preprocessed image into text.
pub trait TextRecognizer: Send + Sync {
    /// Short engine identifier used in logs (e.g. `"tesseract"`).
    fn name(&self) -> &'static str;

    /// Recognise all text in `image`. Lines are separated by `\n`.
    fn recognize(&self, image: &GrayImage) -> Result<String>;
}

/// Run `recognizer` and return its output trimmed of surrounding whitespace.
///
/// Engine failures are not fatal: they are logged and reported as an empty
/// string, which the pipeline treats the same as an image with no text.
pub fn recognize_or_empty(recognizer: &dyn TextRecognizer, image: &GrayImage) -> String {
    match recognizer.recognize(image) {
        Ok(text) => {
            let text = text.trim().to_string();
            debug!(
                engine = recognizer.name(),
                line_count = text.lines().count(),
                char_count = text.chars().count(),
                "OCR recognition complete"
            );
            text
        }
        Err(err) => {
            warn!(engine = recognizer.name(), error = %err, "OCR failed; treating image as empty");
            String::new()
        }
    }
}

/// Construct the recognizer selected by `config.backend`.
///
/// Fails with [`ColophonError::Ocr`](colophon_core::ColophonError::Ocr) when the backend was not compiled in or
/// its resources (models, language data) cannot be loaded.
pub fn build_recognizer(config: &PipelineConfig) -> Result<Box<dyn TextRecognizer>> {
    match config.backend {
        OcrBackend::Tesseract => tesseract_backend(config),
        OcrBackend::Ocrs => ocrs_backend(config),
    }
}

#[cfg(feature = "tesseract")]
fn tesseract_backend(config: &PipelineConfig) -> Result<Box<dyn TextRecognizer>> {
    Ok(Box::new(TesseractRecognizer::from_config(config)?))
}

#[cfg(not(feature = "tesseract"))]
fn tesseract_backend(_config: &PipelineConfig) -> Result<Box<dyn TextRecognizer>> {
    Err(colophon_core::ColophonError::Ocr(
        "tesseract backend not available; rebuild with the `tesseract` feature".into(),
    ))
}

#[cfg(feature = "ocr")]
fn ocrs_backend(config: &PipelineConfig) -> Result<Box<dyn TextRecognizer>> {
    Ok(Box::new(OcrsRecognizer::from_config(config)?))
}

#[cfg(not(feature = "ocr"))]
fn ocrs_backend(_config: &PipelineConfig) -> Result<Box<dyn TextRecognizer>> {
    Err(colophon_core::ColophonError::Ocr(
        "ocrs backend not available; rebuild with the `ocr` feature".into(),
    ))
}
