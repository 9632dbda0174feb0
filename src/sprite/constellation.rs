//! Constellations of pixels: a few anchor coordinates whose colors pin down a sprite

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::error::{SpriteError, SpriteResult};
use crate::pixels::{AlphaRule, Color, ColorImage};

/// A sprite-local `(row, col)` coordinate and the color expected there
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub row: u32,
    pub col: u32,
    pub color: Color,
}

impl Anchor {
    pub fn new(row: u32, col: u32, color: Color) -> Self {
        Self { row, col, color }
    }
}

/// Anchors of one animation frame, in insertion order with unique coordinates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constellation {
    anchors: Vec<Anchor>,
}

impl Constellation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an anchor; an anchor already at the same coordinate is overwritten in place
    pub fn insert(&mut self, anchor: Anchor) {
        match self
            .anchors
            .iter_mut()
            .find(|a| a.row == anchor.row && a.col == anchor.col)
        {
            Some(existing) => existing.color = anchor.color,
            None => self.anchors.push(anchor),
        }
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// The anchor used to generate candidate positions: the first one inserted
    pub fn query_anchor(&self) -> Option<&Anchor> {
        self.anchors.first()
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Anchor> {
        self.anchors.iter()
    }

    /// Describe the first anchor that lies outside `image` or disagrees with its pixel
    pub(crate) fn find_mismatch(&self, image: &ColorImage) -> Option<String> {
        self.anchors.iter().find_map(|anchor| {
            if image.matches_at(anchor.row, anchor.col, &anchor.color, AlphaRule::SkipTransparent) {
                None
            } else {
                Some(format!(
                    "anchor ({}, {}) expects color {:?} which the image does not have there",
                    anchor.row, anchor.col, anchor.color.0
                ))
            }
        })
    }

    /// Render the anchors onto a black canvas of the given size, for debugging
    pub fn to_image(&self, width: u32, height: u32) -> image::RgbImage {
        let mut canvas = image::RgbImage::new(width, height);
        for anchor in &self.anchors {
            if anchor.col < width && anchor.row < height {
                canvas.put_pixel(anchor.col, anchor.row, anchor.color);
            }
        }
        canvas
    }
}

impl FromIterator<Anchor> for Constellation {
    fn from_iter<T: IntoIterator<Item = Anchor>>(iter: T) -> Self {
        let mut constellation = Constellation::new();
        for anchor in iter {
            constellation.insert(anchor);
        }
        constellation
    }
}

/// Draw `size` anchors from `image`.
///
/// Each draw picks one of `signature_colors` uniformly, then one of the
/// visible pixels of that color uniformly. Repeated coordinates collapse,
/// so the result holds at most `size` anchors.
pub fn build_constellation<R>(
    sprite: &str,
    image: &ColorImage,
    signature_colors: &[Color],
    size: usize,
    rng: &mut R,
) -> SpriteResult<Constellation>
where
    R: Rng + ?Sized,
{
    let mut constellation = Constellation::new();

    for _ in 0..size {
        let color = signature_colors
            .choose(rng)
            .ok_or_else(|| SpriteError::invalid_sprite(sprite, "image has no visible pixels"))?;

        let locations = image.locate_color(color, AlphaRule::SkipTransparent);
        let &(row, col) = locations.choose(rng).ok_or_else(|| {
            SpriteError::invalid_sprite(
                sprite,
                format!("signature color {:?} does not occur in the image", color.0),
            )
        })?;

        constellation.insert(Anchor::new(row, col, *color));
    }

    Ok(constellation)
}
