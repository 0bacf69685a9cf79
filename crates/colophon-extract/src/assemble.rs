// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Metadata assembler. Runs preprocess → recognise → extract for one image and
// turns every outcome, including internal faults, into data.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use colophon_core::error::{ColophonError, Result};
use colophon_core::{ExtractionOutcome, FileResult, MetadataRecord, PipelineConfig};
use tracing::{debug, error, info, instrument};

use crate::fields::{
    extract_authors, extract_edition, extract_isbn, extract_publication_date, extract_title,
};
use crate::ocr::{TextRecognizer, build_recognizer, recognize_or_empty};
use crate::preprocess::Preprocessor;

/// Appended to `extracted_text` when the OCR output was cut short.
const ELLIPSIS: &str = "...";

/// The extraction pipeline.
///
/// Holds no per-request state, so a single instance can be shared (e.g. in an
/// `Arc`) and called concurrently for independent images.
pub struct MetadataExtractor {
    config: PipelineConfig,
    preprocessor: Preprocessor,
    recognizer: Box<dyn TextRecognizer>,
}

impl MetadataExtractor {
    /// Build a pipeline with the OCR backend named in `config`.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let recognizer = build_recognizer(&config)?;
        info!(
            backend = %config.backend,
            engine = recognizer.name(),
            engine_mode = %config.engine_mode,
            dilate = config.dilate,
            "Extraction pipeline ready"
        );
        Ok(Self::with_recognizer(config, recognizer))
    }

    /// Build a pipeline around an already constructed recognizer.
    pub fn with_recognizer(config: PipelineConfig, recognizer: Box<dyn TextRecognizer>) -> Self {
        Self {
            preprocessor: Preprocessor::from_config(&config),
            config,
            recognizer,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Extract metadata from encoded image bytes.
    ///
    /// Never fails: every error, and any panic raised by an engine or image
    /// routine, comes back as [`ExtractionOutcome::Error`].
    #[instrument(skip_all, fields(data_len = data.len()))]
    pub fn extract(&self, data: &[u8]) -> ExtractionOutcome {
        match self.try_extract(data) {
            Ok(record) => ExtractionOutcome::Metadata(record),
            Err(err) => {
                error!(error = %err, "Metadata extraction failed");
                ExtractionOutcome::Error(err.to_error_result())
            }
        }
    }

    /// Like [`extract`](Self::extract) but keeps the error variant, for
    /// callers that want to match on it.
    pub fn try_extract(&self, data: &[u8]) -> Result<MetadataRecord> {
        catch_unwind(AssertUnwindSafe(|| self.run_stages(data)))
            .unwrap_or_else(|payload| Err(ColophonError::Fault(panic_message(payload.as_ref()))))
    }

    /// Extract and tag the outcome with the caller's display filename.
    pub fn extract_file(&self, filename: &str, data: &[u8]) -> FileResult {
        FileResult::new(filename, self.extract(data))
    }

    /// One result per `(filename, bytes)` pair, in input order. A failure in
    /// one file does not affect the others.
    pub fn extract_batch<'a, I>(&self, files: I) -> Vec<FileResult>
    where
        I: IntoIterator<Item = (&'a str, &'a [u8])>,
    {
        files
            .into_iter()
            .map(|(filename, data)| self.extract_file(filename, data))
            .collect()
    }

    fn run_stages(&self, data: &[u8]) -> Result<MetadataRecord> {
        let image = self.preprocessor.preprocess_bytes(data)?;

        let text = recognize_or_empty(self.recognizer.as_ref(), &image);
        if text.trim().is_empty() {
            return Err(ColophonError::NoTextFound);
        }

        let record = assemble_record(&text, self.config.excerpt_len);
        debug!(
            has_title = record.title.is_some(),
            authors = record.authors.len(),
            has_isbn = record.isbn.is_some(),
            "Metadata assembled"
        );
        Ok(record)
    }
}

/// Run every field extractor over `text` and build the sparse record.
pub fn assemble_record(text: &str, excerpt_len: usize) -> MetadataRecord {
    MetadataRecord {
        title: extract_title(text),
        authors: extract_authors(text),
        isbn: extract_isbn(text),
        publishers: Vec::new(),
        publication_date: extract_publication_date(text),
        edition: extract_edition(text),
        extracted_text: Some(excerpt(text, excerpt_len)),
    }
    .compact()
}

/// First `max_chars` characters of `text`, with `...` appended if anything was
/// cut.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let mut out: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        out.push_str(ELLIPSIS);
    }
    out
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colophon_core::ErrorResult;
    use image::{DynamicImage, GrayImage, ImageFormat, Luma};
    use serde_json::{Value, json};
    use std::io::Cursor;

    enum Script {
        Text(&'static str),
        Fail,
        Panic,
    }

    struct Scripted(Script);

    impl TextRecognizer for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn recognize(&self, _image: &GrayImage) -> Result<String> {
            match &self.0 {
                Script::Text(text) => Ok(text.to_string()),
                Script::Fail => Err(ColophonError::Ocr("engine unavailable".into())),
                Script::Panic => panic!("recognizer exploded"),
            }
        }
    }

    fn extractor(script: Script) -> MetadataExtractor {
        MetadataExtractor::with_recognizer(PipelineConfig::default(), Box::new(Scripted(script)))
    }

    fn blank_png() -> Vec<u8> {
        let img = GrayImage::from_pixel(32, 24, Luma([250u8]));
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    const COVER: &str = "The Great Novel\n\
                         Written by Jane Doe\n\
                         2nd Edition\n\
                         First published 1999, this edition 2021\n\
                         ISBN 978-3-16-148410-0";

    #[test]
    fn full_record_from_cover_text() {
        let outcome = extractor(Script::Text(COVER)).extract(&blank_png());
        let record = outcome.metadata().expect("metadata");

        assert_eq!(record.title.as_deref(), Some("The Great Novel"));
        assert_eq!(record.authors, vec!["Jane Doe".to_string()]);
        assert_eq!(record.isbn.as_deref(), Some("9783161484100"));
        assert_eq!(record.publication_date.as_deref(), Some("2021"));
        assert_eq!(record.edition.as_deref(), Some("2"));
        assert!(record.publishers.is_empty());
        assert_eq!(record.extracted_text.as_deref(), Some(COVER));
    }

    #[test]
    fn blank_image_reports_no_text() {
        let outcome = extractor(Script::Text("  \n\t ")).extract(&blank_png());
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({ "error": "No text could be extracted from the image" })
        );
    }

    #[test]
    fn recognizer_failure_reports_no_text() {
        let outcome = extractor(Script::Fail).extract(&blank_png());
        assert_eq!(
            outcome,
            ExtractionOutcome::Error(ErrorResult::new(
                "No text could be extracted from the image"
            ))
        );
    }

    #[test]
    fn undecodable_bytes_report_decode_error() {
        let pipeline = extractor(Script::Text(COVER));
        assert!(matches!(
            pipeline.try_extract(b"GIF89a but not really"),
            Err(ColophonError::Decode(_))
        ));
        assert_eq!(
            pipeline.extract(b"GIF89a but not really"),
            ExtractionOutcome::Error(ErrorResult::new("Could not decode the image"))
        );
    }

    #[test]
    fn panics_become_error_results() {
        let outcome = extractor(Script::Panic).extract(&blank_png());
        let err = outcome.error().expect("error result");
        assert_eq!(err.error, "Error processing image: recognizer exploded");
    }

    #[test]
    fn sparse_record_only_has_found_fields() {
        let outcome = extractor(Script::Text("Untitled")).extract(&blank_png());
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            value,
            json!({ "title": "Untitled", "extracted_text": "Untitled" })
        );
    }

    #[test]
    fn serialised_records_never_hold_empty_values() {
        for text in [COVER, "x", "by\n\n", "Title\nby \nAuthor:"] {
            let outcome = extractor(Script::Text(text)).extract(&blank_png());
            let Value::Object(map) = serde_json::to_value(&outcome).unwrap() else {
                panic!("outcome must serialise as an object");
            };
            for (key, value) in map {
                match value {
                    Value::String(s) => assert!(!s.is_empty(), "{key} is empty"),
                    Value::Array(items) => assert!(!items.is_empty(), "{key} is empty"),
                    Value::Null => panic!("{key} is null"),
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn same_bytes_same_record() {
        let pipeline = extractor(Script::Text(COVER));
        let bytes = blank_png();
        assert_eq!(pipeline.extract(&bytes), pipeline.extract(&bytes));
    }

    #[test]
    fn excerpt_is_truncated_with_ellipsis() {
        assert_eq!(excerpt("abcdef", 3), "abc...");
        assert_eq!(excerpt("abc", 3), "abc");
        assert_eq!(excerpt("ééé", 2), "éé...");

        let long = "a".repeat(1500);
        let record = assemble_record(&long, 1000);
        let text = record.extracted_text.unwrap();
        assert_eq!(text.chars().count(), 1003);
        assert!(text.ends_with("..."));
    }

    #[test]
    fn batch_keeps_order_and_isolates_failures() {
        let pipeline = extractor(Script::Text(COVER));
        let good = blank_png();
        let results = pipeline.extract_batch([
            ("front.png", good.as_slice()),
            ("broken.jpg", b"not an image".as_slice()),
            ("back.png", good.as_slice()),
        ]);

        let names: Vec<_> = results.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, ["front.png", "broken.jpg", "back.png"]);
        assert!(!results[0].outcome.is_error());
        assert!(results[1].outcome.is_error());
        assert!(!results[2].outcome.is_error());
    }

    #[test]
    fn new_validates_config_before_building_engine() {
        let config = PipelineConfig {
            engine_mode: "--psm 42".into(),
            ..Default::default()
        };
        assert!(matches!(
            MetadataExtractor::new(config),
            Err(ColophonError::Config(_))
        ));
    }
}
