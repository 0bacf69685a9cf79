// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edition number detection ("2nd Edition", "Edition 3", "4th ed.").

use std::sync::LazyLock;

use regex::Regex;

/// Tried in order on each line; the first hit anywhere in the text wins.
static EDITION_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        // "2nd Edition", "3rd ed.", "5th ed"
        Regex::new(r"(?i)(\d+)(?:st|nd|rd|th)\s+(?:edition\b|ed\.|ed\b)")
            .expect("ordinal edition pattern is valid"),
        // "Edition 2", "ed. 3"
        Regex::new(r"(?i)\b(?:edition|ed\.|ed\b)\s*(\d+)").expect("edition number pattern is valid"),
        // "4thed."
        Regex::new(r"(?i)(\d+)(?:st|nd|rd|th)ed\.").expect("compact edition pattern is valid"),
    ]
});

/// Edition number as written, e.g. `"2"` for "Second printing, 2nd Edition".
pub fn extract_edition(text: &str) -> Option<String> {
    text.lines().find_map(|line| {
        EDITION_PATTERNS
            .iter()
            .find_map(|pattern| pattern.captures(line)?.get(1))
            .map(|m| m.as_str().to_owned())
    })
}
