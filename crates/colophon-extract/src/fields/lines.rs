// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Line-position heuristics: the title is the first line of text, and authors
// are credited in the few lines just below it.

use std::sync::LazyLock;

use regex::Regex;

/// Substrings (matched against the lowercased line) that mark an author credit.
const AUTHOR_MARKERS: [&str; 4] = ["by ", "author", "written by", "edited by"];

/// How many lines below the title are searched for credits.
const AUTHOR_WINDOW: usize = 4;

/// Names this long are almost certainly a misread paragraph.
const MAX_AUTHOR_CHARS: usize = 100;

static AUTHOR_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:written\s+by|edited\s+by|by|author)\b\s*:?\s*")
        .expect("author label pattern is valid")
});

/// Trimmed, non-empty lines of `text`, in order.
pub fn non_empty_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

/// The first non-empty line.
pub fn extract_title(text: &str) -> Option<String> {
    non_empty_lines(text).next().map(str::to_owned)
}

/// One author per credit line among the four lines after the title.
pub fn extract_authors(text: &str) -> Vec<String> {
    non_empty_lines(text)
        .skip(1)
        .take(AUTHOR_WINDOW)
        .filter(|line| is_credit(line))
        .filter_map(author_name)
        .collect()
}

fn is_credit(line: &str) -> bool {
    let lower = line.to_lowercase();
    AUTHOR_MARKERS.iter().any(|marker| lower.contains(marker))
}

fn author_name(line: &str) -> Option<String> {
    let stripped = AUTHOR_LABEL.replace(line, "");
    let name = stripped.trim();
    (!name.is_empty() && name.chars().count() < MAX_AUTHOR_CHARS).then(|| name.to_owned())
}
