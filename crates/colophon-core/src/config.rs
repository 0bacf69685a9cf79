// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ColophonError, Result};

/// Which OCR engine backs the text recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrBackend {
    /// Tesseract via `leptess`.
    #[default]
    Tesseract,
    /// Pure-Rust `ocrs` engine with `.rten` models.
    Ocrs,
}

impl FromStr for OcrBackend {
    type Err = ColophonError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tesseract" => Ok(Self::Tesseract),
            "ocrs" => Ok(Self::Ocrs),
            other => Err(ColophonError::Config(format!(
                "unknown OCR backend {other:?} (expected \"tesseract\" or \"ocrs\")"
            ))),
        }
    }
}

impl fmt::Display for OcrBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tesseract => f.write_str("tesseract"),
            Self::Ocrs => f.write_str("ocrs"),
        }
    }
}

/// Tesseract engine mode (`--oem`) and page segmentation mode (`--psm`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineMode {
    pub oem: u8,
    pub psm: u8,
}

impl EngineMode {
    /// Engine default: LSTM where available.
    pub const DEFAULT_OEM: u8 = 3;
    /// Assume a single uniform block of text.
    pub const SINGLE_BLOCK_PSM: u8 = 6;

    const MAX_OEM: u8 = 3;
    const MAX_PSM: u8 = 13;

    /// Parse a Tesseract-style option string such as `"--oem 3 --psm 6"`.
    ///
    /// Either flag may be omitted, in which case the default is kept.
    pub fn parse(s: &str) -> Result<Self> {
        let mut mode = Self::default();
        let mut tokens = s.split_whitespace();

        while let Some(token) = tokens.next() {
            let (flag, inline) = match token.split_once('=') {
                Some((flag, value)) => (flag, Some(value)),
                None => (token, None),
            };
            let value = match inline.or_else(|| tokens.next()) {
                Some(value) => value,
                None => {
                    return Err(ColophonError::Config(format!(
                        "engine mode flag {flag} is missing a value"
                    )));
                }
            };
            match flag {
                "--oem" => mode.oem = parse_mode_value(flag, value, Self::MAX_OEM)?,
                "--psm" => mode.psm = parse_mode_value(flag, value, Self::MAX_PSM)?,
                other => {
                    return Err(ColophonError::Config(format!(
                        "unsupported engine mode flag {other:?} in {s:?}"
                    )));
                }
            }
        }

        Ok(mode)
    }
}

fn parse_mode_value(flag: &str, value: &str, max: u8) -> Result<u8> {
    match value.parse::<u8>() {
        Ok(n) if n <= max => Ok(n),
        _ => Err(ColophonError::Config(format!(
            "{flag} expects an integer in 0..={max}, got {value:?}"
        ))),
    }
}

impl Default for EngineMode {
    fn default() -> Self {
        Self {
            oem: Self::DEFAULT_OEM,
            psm: Self::SINGLE_BLOCK_PSM,
        }
    }
}

impl FromStr for EngineMode {
    type Err = ColophonError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for EngineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--oem {} --psm {}", self.oem, self.psm)
    }
}

/// Settings handed to the extraction pipeline at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Tesseract-style engine mode string (default `--oem 3 --psm 6`).
    pub engine_mode: String,
    /// OCR language code.
    pub language: String,
    /// Run a 3×3 dilation pass after binarization.
    pub dilate: bool,
    /// Characters of OCR output kept in `extracted_text`.
    pub excerpt_len: usize,
    pub backend: OcrBackend,
    /// Model directory for the `ocrs` backend. `None` uses the cache default.
    pub model_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            engine_mode: EngineMode::default().to_string(),
            language: "eng".to_string(),
            dilate: true,
            excerpt_len: 1000,
            backend: OcrBackend::default(),
            model_dir: None,
        }
    }
}

impl PipelineConfig {
    /// Load a JSON config file. Missing keys take their default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Parsed form of [`engine_mode`](Self::engine_mode).
    pub fn engine_mode(&self) -> Result<EngineMode> {
        EngineMode::parse(&self.engine_mode)
    }

    pub fn validate(&self) -> Result<()> {
        if self.excerpt_len == 0 {
            return Err(ColophonError::Config(
                "excerpt_len must be greater than zero".into(),
            ));
        }
        if self.language.trim().is_empty() {
            return Err(ColophonError::Config("language must not be empty".into()));
        }
        self.engine_mode()?;
        Ok(())
    }
}
