// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tesseract backend via `leptess`. Requires the Tesseract and Leptonica
// system libraries plus trained data for the configured language.

use std::io::Cursor;

use colophon_core::error::{ColophonError, Result};
use colophon_core::{EngineMode, PipelineConfig};
use image::{GrayImage, ImageFormat};
use leptess::{LepTess, Variable};
use tracing::{debug, instrument, warn};

use super::TextRecognizer;

/// Tesseract works best around this resolution.
const SOURCE_DPI: i32 = 300;

/// Recognizer that runs Tesseract on each image.
///
/// A `LepTess` handle is not thread-safe, so a fresh one is created per call;
/// the recognizer itself only carries settings.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    language: String,
    mode: EngineMode,
    /// Overrides `TESSDATA_PREFIX` when set.
    data_path: Option<String>,
}

impl TesseractRecognizer {
    pub fn new(language: impl Into<String>, mode: EngineMode) -> Self {
        if mode.oem != EngineMode::DEFAULT_OEM {
            warn!(
                oem = mode.oem,
                "leptess always initialises with the default engine mode; --oem is ignored"
            );
        }
        Self {
            language: language.into(),
            mode,
            data_path: None,
        }
    }

    pub fn with_data_path(mut self, path: impl Into<String>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Ok(Self::new(config.language.clone(), config.engine_mode()?))
    }

    pub fn mode(&self) -> EngineMode {
        self.mode
    }

    fn open(&self) -> Result<LepTess> {
        let mut tess = LepTess::new(self.data_path.as_deref(), &self.language).map_err(|err| {
            ColophonError::Ocr(format!(
                "failed to initialise Tesseract for language {:?}: {}",
                self.language, err
            ))
        })?;
        tess.set_variable(Variable::TesseditPagesegMode, &self.mode.psm.to_string())
            .map_err(|err| {
                ColophonError::Ocr(format!(
                    "failed to set page segmentation mode {}: {}",
                    self.mode.psm, err
                ))
            })?;
        Ok(tess)
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    #[instrument(skip_all, fields(width = image.width(), height = image.height(), psm = self.mode.psm))]
    fn recognize(&self, image: &GrayImage) -> Result<String> {
        let mut tess = self.open()?;

        // leptess loads images from an encoded buffer.
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|err| ColophonError::Ocr(format!("failed to encode image as PNG: {}", err)))?;
        debug!(png_bytes = png.len(), "Image encoded for Tesseract");

        tess.set_image_from_mem(&png)
            .map_err(|err| ColophonError::Ocr(format!("failed to load image into Tesseract: {}", err)))?;
        // Must come after the image is set.
        tess.set_source_resolution(SOURCE_DPI);

        tess.get_utf8_text()
            .map_err(|err| ColophonError::Ocr(format!("Tesseract returned invalid UTF-8: {}", err)))
    }
}
