// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// colophon-extract — The metadata extraction pipeline.
//
// Preprocesses a photographed cover (grayscale, Otsu binarization, optional
// dilation), runs OCR through a pluggable recognizer, and maps the recognised
// text onto bibliographic fields with a set of independent heuristics.

pub mod assemble;
pub mod fields;
pub mod ocr;
pub mod preprocess;

pub use assemble::MetadataExtractor;
pub use preprocess::Preprocessor;
pub use ocr::TextRecognizer;
