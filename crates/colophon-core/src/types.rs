// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Colophon: the sparse metadata record, the error
// record, and the per-file result wrapper.

use serde::{Deserialize, Serialize};

/// Bibliographic metadata recovered from a single cover or title page.
///
/// The representation is sparse: when serialised, any field that is `None`,
/// an empty string, or an empty list is omitted. Consumers must read a missing
/// key as "unknown".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    #[serde(default, skip_serializing_if = "is_blank")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    /// Cleaned ISBN, 10 or 13 characters.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub isbn: Option<String>,
    /// Never filled by the current heuristics.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub publishers: Vec<String>,
    /// Four-digit year.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub publication_date: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub edition: Option<String>,
    /// Truncated copy of the OCR output, for debugging.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub extracted_text: Option<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

fn drop_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl MetadataRecord {
    /// Normalise the record so that empty strings and empty list entries are
    /// represented as absent.
    pub fn compact(self) -> Self {
        Self {
            title: drop_blank(self.title),
            authors: self.authors.into_iter().filter(|a| !a.is_empty()).collect(),
            isbn: drop_blank(self.isbn),
            publishers: self
                .publishers
                .into_iter()
                .filter(|p| !p.is_empty())
                .collect(),
            publication_date: drop_blank(self.publication_date),
            edition: drop_blank(self.edition),
            extracted_text: drop_blank(self.extracted_text),
        }
    }

    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        is_blank(&self.title)
            && self.authors.is_empty()
            && is_blank(&self.isbn)
            && self.publishers.is_empty()
            && is_blank(&self.publication_date)
            && is_blank(&self.edition)
            && is_blank(&self.extracted_text)
    }
}

/// Single-key error record returned in place of a [`MetadataRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub error: String,
}

impl ErrorResult {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Outcome of running the pipeline on one image: metadata or an error, never
/// both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractionOutcome {
    /// Listed first so that `{"error": ...}` deserialises as an error rather
    /// than as an all-default record.
    Error(ErrorResult),
    Metadata(MetadataRecord),
}

impl ExtractionOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn metadata(&self) -> Option<&MetadataRecord> {
        match self {
            Self::Metadata(record) => Some(record),
            Self::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorResult> {
        match self {
            Self::Error(err) => Some(err),
            Self::Metadata(_) => None,
        }
    }
}

impl From<MetadataRecord> for ExtractionOutcome {
    fn from(record: MetadataRecord) -> Self {
        Self::Metadata(record)
    }
}

impl From<ErrorResult> for ExtractionOutcome {
    fn from(err: ErrorResult) -> Self {
        Self::Error(err)
    }
}

/// An outcome paired with the display filename the caller supplied.
///
/// Serialises flat: `{"title": "...", "filename": "cover.jpg"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileResult {
    #[serde(flatten)]
    pub outcome: ExtractionOutcome,
    pub filename: String,
}

impl FileResult {
    pub fn new(filename: impl Into<String>, outcome: impl Into<ExtractionOutcome>) -> Self {
        Self {
            outcome: outcome.into(),
            filename: filename.into(),
        }
    }

    /// Per-file failure that happened outside the pipeline (unreadable file,
    /// worker failure).
    pub fn failed(filename: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        let filename = filename.into();
        let message = format!("Error processing {filename}: {reason}");
        Self::new(filename, ErrorResult::new(message))
    }
}
