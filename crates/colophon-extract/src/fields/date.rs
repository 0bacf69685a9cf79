// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Publication year detection.
//
// Covers and title pages often mention several years (copyright, reprints,
// series start). The latest plausible one is taken as the printing year, with
// one year of slack for print runs dated ahead of the calendar.

use std::sync::LazyLock;

use chrono::{Datelike, Local};
use regex::Regex;

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(19\d{2}|20\d{2})\b").expect("year pattern is valid"));

/// Latest year in 1900–2099 mentioned in `text`, if it is no later than next
/// year by the local clock.
pub fn extract_publication_date(text: &str) -> Option<String> {
    extract_publication_date_with_year(text, Local::now().year())
}

/// Same as [`extract_publication_date`] with an explicit current year.
pub fn extract_publication_date_with_year(text: &str, current_year: i32) -> Option<String> {
    let latest = YEAR
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<i32>().ok())
        .max()?;
    (latest <= current_year + 1).then(|| latest.to_string())
}
