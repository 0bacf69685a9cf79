// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the colophon-extract crate: cover preprocessing on
// a synthetic image, and the field heuristics on typical OCR output.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};

use colophon_extract::Preprocessor;
use colophon_extract::assemble::assemble_record;

const COVER_TEXT: &str = "THE RUST PROGRAMMING LANGUAGE\n\
                          2nd Edition\n\
                          by Steve Klabnik and Carol Nichols\n\
                          No Starch Press, San Francisco\n\
                          Copyright 2018, 2023\n\
                          ISBN-13: 978-1-7185-0310-6";

/// Benchmark preprocessing on a 400x600 synthetic cover: light background
/// with a few dark horizontal "text" bars.
fn bench_preprocess(c: &mut Criterion) {
    let (width, height) = (400u32, 600u32);
    let mut img = RgbImage::from_pixel(width, height, Rgb([235, 228, 215]));
    for bar in 0..6 {
        let top = 60 + bar * 80;
        for y in top..top + 18 {
            for x in 40..360 {
                img.put_pixel(x, y, Rgb([25, 25, 30]));
            }
        }
    }
    let dynamic = DynamicImage::ImageRgb8(img);

    c.bench_function("preprocess (400x600, dilate)", |b| {
        let preprocessor = Preprocessor::new(true);
        b.iter(|| black_box(preprocessor.preprocess(black_box(&dynamic))));
    });

    c.bench_function("preprocess (400x600, no dilate)", |b| {
        let preprocessor = Preprocessor::new(false);
        b.iter(|| black_box(preprocessor.preprocess(black_box(&dynamic))));
    });
}

/// Benchmark running every field extractor over a realistic cover transcript.
fn bench_fields(c: &mut Criterion) {
    c.bench_function("assemble_record (cover text)", |b| {
        b.iter(|| black_box(assemble_record(black_box(COVER_TEXT), 1000)));
    });
}

criterion_group!(benches, bench_preprocess, bench_fields);
criterion_main!(benches);
