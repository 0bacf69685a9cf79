// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments and their mapping onto `PipelineConfig`.

use std::path::PathBuf;

use clap::Parser;
use colophon_core::error::Result;
use colophon_core::{OcrBackend, PipelineConfig};

#[derive(Debug, Parser)]
#[command(name = "colophon")]
#[command(about = "Extract title, authors, ISBN, edition and year from book cover photos")]
#[command(version)]
pub struct Cli {
    /// Cover or title-page images (PNG, JPEG, GIF)
    #[arg(required = true)]
    pub images: Vec<PathBuf>,

    /// JSON pipeline config; flags below override its values
    #[arg(short, long, env = "COLOPHON_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip the dilation pass after binarization
    #[arg(long)]
    pub no_dilate: bool,

    /// Characters of OCR output to keep in `extracted_text`
    #[arg(long)]
    pub excerpt_len: Option<usize>,

    /// Tesseract engine mode, e.g. "--oem 3 --psm 6"
    #[arg(long, allow_hyphen_values = true)]
    pub engine_mode: Option<String>,

    /// OCR backend: tesseract or ocrs
    #[arg(long)]
    pub backend: Option<OcrBackend>,

    /// OCR language code (tesseract)
    #[arg(long)]
    pub language: Option<String>,

    /// Directory holding the ocrs detection/recognition models
    #[arg(long)]
    pub model_dir: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };

        if self.no_dilate {
            config.dilate = false;
        }
        if let Some(len) = self.excerpt_len {
            config.excerpt_len = len;
        }
        if let Some(mode) = &self.engine_mode {
            config.engine_mode = mode.clone();
        }
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(language) = &self.language {
            config.language = language.clone();
        }
        if let Some(dir) = &self.model_dir {
            config.model_dir = Some(dir.clone());
        }

        config.validate()?;
        Ok(config)
    }
}
