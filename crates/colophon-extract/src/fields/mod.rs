// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Field extractors. Each one is a pure function over the recognised text and
// returns its best guess, or nothing. They never look at each other's output.

pub mod date;
pub mod edition;
pub mod isbn;
pub mod lines;

pub use date::{extract_publication_date, extract_publication_date_with_year};
pub use edition::extract_edition;
pub use isbn::extract_isbn;
pub use lines::{extract_authors, extract_title};
