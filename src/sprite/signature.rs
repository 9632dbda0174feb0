//! Signature colors: the most frequent visible colors of a reference image

use image::{ImageBuffer, Pixel, Rgb};
use std::cmp::Reverse;
use std::collections::HashMap;

use crate::pixels::{AlphaRule, Color, ColorImage, pixel_matches};

/// Rank the visible colors of `image` by frequency and keep the first `count`.
///
/// Fully transparent pixels of four channel images are not counted, so a
/// color that only ever appears transparent is never selected. Equal counts
/// are ordered by color value.
pub fn extract_signature_colors(image: &ColorImage, count: usize) -> Vec<Color> {
    let counts = match image {
        ColorImage::Rgb(img) => count_visible_colors(img),
        ColorImage::Rgba(img) => count_visible_colors(img),
    };

    let mut ranked: Vec<([u8; 3], usize)> = counts.into_iter().collect();
    ranked.sort_by_key(|&(color, n)| (Reverse(n), color));

    ranked
        .into_iter()
        .take(count)
        .map(|(color, _)| Rgb(color))
        .collect()
}

fn count_visible_colors<P>(image: &ImageBuffer<P, Vec<u8>>) -> HashMap<[u8; 3], usize>
where
    P: Pixel<Subpixel = u8>,
{
    let mut counts = HashMap::new();
    for pixel in image.pixels() {
        let color = pixel.to_rgb();
        if pixel_matches(pixel, &color, AlphaRule::SkipTransparent) {
            *counts.entry(color.0).or_insert(0) += 1;
        }
    }
    counts
}
