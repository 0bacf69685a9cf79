// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch driver. Runs each image on Tokio's blocking pool and collects the
// results in input order.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use colophon_core::FileResult;
use colophon_extract::MetadataExtractor;
use tracing::{info, warn};

/// Extract metadata from every file in `paths`.
///
/// Files are processed concurrently; results come back in the order the paths
/// were given. Unreadable files and worker failures become per-file errors.
pub async fn extract_paths(
    extractor: Arc<MetadataExtractor>,
    paths: Vec<PathBuf>,
) -> Vec<FileResult> {
    let tasks: Vec<_> = paths
        .into_iter()
        .map(|path| {
            let extractor = Arc::clone(&extractor);
            let filename = display_name(&path);
            let task_filename = filename.clone();
            let handle = tokio::task::spawn_blocking(move || {
                extract_path(&extractor, &path, &task_filename)
            });
            (filename, handle)
        })
        .collect();

    let mut results = Vec::with_capacity(tasks.len());
    for (filename, handle) in tasks {
        let result = match handle.await {
            Ok(result) => result,
            Err(err) => {
                warn!(file = %filename, error = %err, "Extraction worker failed");
                FileResult::failed(filename, err)
            }
        };
        results.push(result);
    }

    info!(files = results.len(), "Batch complete");
    results
}

fn extract_path(extractor: &MetadataExtractor, path: &Path, filename: &str) -> FileResult {
    match std::fs::read(path) {
        Ok(bytes) => extractor.extract_file(filename, &bytes),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Could not read image");
            FileResult::failed(filename, err)
        }
    }
}

/// File name shown back to the user; the full path when there is none.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
