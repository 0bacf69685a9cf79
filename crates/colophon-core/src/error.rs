// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Colophon.

use thiserror::Error;

use crate::types::ErrorResult;

/// Message reported when OCR yields nothing but whitespace.
pub const NO_TEXT_MESSAGE: &str = "No text could be extracted from the image";

/// Message reported when the input bytes are not a decodable image.
pub const DECODE_MESSAGE: &str = "Could not decode the image";

/// Top-level error type for all Colophon operations.
#[derive(Debug, Error)]
pub enum ColophonError {
    // -- Pipeline stage errors --
    #[error("image decoding failed: {0}")]
    Decode(String),

    #[error("no text could be extracted from the image")]
    NoTextFound,

    #[error("extraction fault: {0}")]
    Fault(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ColophonError {
    /// Render this error as the single-key record handed back to callers.
    pub fn to_error_result(&self) -> ErrorResult {
        match self {
            Self::Decode(_) => ErrorResult::new(DECODE_MESSAGE),
            Self::NoTextFound => ErrorResult::new(NO_TEXT_MESSAGE),
            Self::Fault(msg) => ErrorResult::new(format!("Error processing image: {msg}")),
            other => ErrorResult::new(format!("Error processing image: {other}")),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ColophonError>;
