// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image preprocessing for OCR: decode, grayscale conversion, global Otsu
// binarization, and an optional 3×3 dilation to thicken broken strokes.

use colophon_core::PipelineConfig;
use colophon_core::error::{ColophonError, Result};
use image::{DynamicImage, GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::morphology::dilate;
use tracing::{debug, info, instrument};

/// Turns a photographed cover into a binarized grayscale grid.
///
/// Stateless apart from its settings; one instance can serve any number of
/// images, from any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct Preprocessor {
    /// Apply one pass of 3×3 dilation after thresholding.
    dilate: bool,
}

impl Preprocessor {
    pub fn new(dilate: bool) -> Self {
        Self { dilate }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.dilate)
    }

    /// Decode raw image bytes (PNG, JPEG, GIF, ...).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn decode(data: &[u8]) -> Result<DynamicImage> {
        let image = image::load_from_memory(data)
            .map_err(|err| ColophonError::Decode(format!("failed to decode image: {}", err)))?;
        debug!(
            width = image.width(),
            height = image.height(),
            "Image decoded from bytes"
        );
        Ok(image)
    }

    /// Decode and preprocess in one step.
    pub fn preprocess_bytes(&self, data: &[u8]) -> Result<GrayImage> {
        let image = Self::decode(data)?;
        Ok(self.preprocess(&image))
    }

    /// Grayscale → Otsu threshold → (optional) dilation.
    ///
    /// The output has the same dimensions as the input and contains only the
    /// values 0 and 255.
    #[instrument(skip_all, fields(width = image.width(), height = image.height(), dilate = self.dilate))]
    pub fn preprocess(&self, image: &DynamicImage) -> GrayImage {
        info!("Preprocessing image for OCR");

        let gray = image.to_luma8();
        let threshold = otsu_threshold(&gray);
        debug!(threshold, "Otsu threshold computed");

        let binary = binarize(&gray, threshold);
        if self.dilate {
            // L∞ radius 1 is the 3×3 square structuring element.
            dilate(&binary, Norm::LInf, 1)
        } else {
            binary
        }
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Map every pixel strictly above `threshold` to white, everything else to
/// black.
pub fn binarize(gray: &GrayImage, threshold: u8) -> GrayImage {
    let (width, height) = gray.dimensions();
    let mut output = GrayImage::new(width, height);

    for (x, y, pixel) in gray.enumerate_pixels() {
        let binary = if pixel.0[0] > threshold { 255u8 } else { 0u8 };
        output.put_pixel(x, y, Luma([binary]));
    }

    output
}

/// Compute the Otsu threshold for a grayscale image.
///
/// Returns the level `t` that maximises the between-class variance (and so
/// minimises the intra-class variance) of the `<= t` and `> t` pixel groups.
pub fn otsu_threshold(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    let total_pixels = gray.width() as u64 * gray.height() as u64;
    if total_pixels == 0 {
        return 128;
    }

    let sum_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum();

    let mut sum_background: f64 = 0.0;
    let mut weight_background: u64 = 0;
    let mut max_variance: f64 = 0.0;
    let mut best_threshold: u8 = 0;

    for (t, &count) in histogram.iter().enumerate() {
        weight_background += count;
        if weight_background == 0 {
            continue;
        }
        let weight_foreground = total_pixels - weight_background;
        if weight_foreground == 0 {
            break;
        }

        sum_background += t as f64 * count as f64;
        let mean_background = sum_background / weight_background as f64;
        let mean_foreground = (sum_total - sum_background) / weight_foreground as f64;

        let between_variance = weight_background as f64
            * weight_foreground as f64
            * (mean_background - mean_foreground).powi(2);

        if between_variance > max_variance {
            max_variance = between_variance;
            best_threshold = t as u8;
        }
    }

    best_threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(image: DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    /// Dark "ink" band across a light "paper" background.
    fn two_tone(width: u32, height: u32, paper: u8, ink: u8) -> GrayImage {
        let mut img = GrayImage::from_pixel(width, height, Luma([paper]));
        for y in height / 3..2 * height / 3 {
            for x in 0..width {
                img.put_pixel(x, y, Luma([ink]));
            }
        }
        img
    }

    #[test]
    fn otsu_splits_two_tone_image() {
        let img = two_tone(30, 30, 200, 40);
        let threshold = otsu_threshold(&img);
        assert!(
            (40..200).contains(&threshold),
            "threshold {threshold} should separate 40 from 200"
        );
    }

    #[test]
    fn otsu_empty_image_falls_back_to_midpoint() {
        assert_eq!(otsu_threshold(&GrayImage::new(0, 0)), 128);
    }

    #[test]
    fn binarize_is_strictly_greater_than() {
        let mut img = GrayImage::new(3, 1);
        img.put_pixel(0, 0, Luma([99]));
        img.put_pixel(1, 0, Luma([100]));
        img.put_pixel(2, 0, Luma([101]));
        let out = binarize(&img, 100);
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(1, 0).0[0], 0);
        assert_eq!(out.get_pixel(2, 0).0[0], 255);
    }

    #[test]
    fn preprocess_preserves_dimensions_and_is_binary() {
        let mut rgb = RgbImage::from_pixel(64, 48, Rgb([230, 220, 210]));
        for y in 10..20 {
            for x in 5..60 {
                rgb.put_pixel(x, y, Rgb([20, 30, 25]));
            }
        }
        let out = Preprocessor::new(false).preprocess(&DynamicImage::ImageRgb8(rgb));

        assert_eq!(out.dimensions(), (64, 48));
        assert!(out.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        assert_eq!(out.get_pixel(30, 15).0[0], 0);
        assert_eq!(out.get_pixel(30, 40).0[0], 255);
    }

    #[test]
    fn dilation_fills_isolated_dark_pixel() {
        let mut img = GrayImage::from_pixel(9, 9, Luma([255]));
        img.put_pixel(4, 4, Luma([0]));
        let dynamic = DynamicImage::ImageLuma8(img);

        let plain = Preprocessor::new(false).preprocess(&dynamic);
        assert_eq!(plain.get_pixel(4, 4).0[0], 0);

        let dilated = Preprocessor::new(true).preprocess(&dynamic);
        assert_eq!(dilated.get_pixel(4, 4).0[0], 255);
        assert_eq!(dilated.dimensions(), (9, 9));
    }

    #[test]
    fn preprocess_bytes_decodes_png() {
        let bytes = png_bytes(DynamicImage::ImageLuma8(two_tone(20, 12, 210, 30)));
        let out = Preprocessor::default().preprocess_bytes(&bytes).unwrap();
        assert_eq!(out.dimensions(), (20, 12));
    }

    #[test]
    fn undecodable_bytes_are_decode_errors() {
        let err = Preprocessor::default()
            .preprocess_bytes(b"definitely not an image")
            .unwrap_err();
        assert!(matches!(err, ColophonError::Decode(_)));
    }

    #[test]
    fn empty_buffer_is_decode_error() {
        assert!(matches!(
            Preprocessor::decode(&[]),
            Err(ColophonError::Decode(_))
        ));
    }
}
