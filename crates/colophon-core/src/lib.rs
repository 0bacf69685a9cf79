// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Colophon — Core types, error definitions, and pipeline configuration shared
// across all crates.

pub mod config;
pub mod error;
pub mod types;

pub use config::{EngineMode, OcrBackend, PipelineConfig};
pub use error::ColophonError;
pub use types::*;
