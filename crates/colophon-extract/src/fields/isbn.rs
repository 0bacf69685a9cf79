// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ISBN detection. Candidates are validated by length only; check digits are
// not verified, so any 10-digit number in the right shape is accepted.

use std::sync::LazyLock;

use regex::Regex;

/// `978`/`979` prefix followed by four hyphen/space separated digit groups,
/// optionally labelled `ISBN`, `ISBN-10` or `ISBN-13`.
static ISBN_13: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:ISBN(?:-1[03])?:?\s*)?(97[89][-\s]?\d{1,5}[-\s]?\d{1,7}[-\s]?\d{1,6}[-\s]?\d)\b",
    )
    .expect("ISBN-13 pattern is valid")
});

/// Four digit groups, the last of which may be the check character `X`.
static ISBN_10: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:ISBN(?:-10)?:?\s*)?(\d{1,5}[-\s]?\d{1,7}[-\s]?\d{1,6}[-\s]?[\dX])\b")
        .expect("ISBN-10 pattern is valid")
});

/// Find an ISBN in `text`.
///
/// The ISBN-13 shape is tried first and must clean to exactly 13 characters;
/// failing that, the ISBN-10 shape must clean to exactly 10. Only the first
/// match of each shape is considered.
pub fn extract_isbn(text: &str) -> Option<String> {
    first_candidate(&ISBN_13, text, 13).or_else(|| first_candidate(&ISBN_10, text, 10))
}

fn first_candidate(pattern: &Regex, text: &str, len: usize) -> Option<String> {
    let captured = pattern.captures(text)?.get(1)?.as_str();
    let cleaned = clean(captured);
    (cleaned.len() == len).then_some(cleaned)
}

/// Keep ASCII digits and uppercase `X`, then uppercase.
///
/// Cleaning happens before uppercasing, so a lowercase `x` check character is
/// discarded rather than kept.
fn clean(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X')
        .collect::<String>()
        .to_uppercase()
}
