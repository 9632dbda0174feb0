//! Pixel bounding boxes used to restrict searches and report match locations

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::{SpriteError, SpriteResult};

/// A `(top, left, bottom, right)` bounding box; `bottom` and `right` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    top: u32,
    left: u32,
    bottom: u32,
    right: u32,
}

impl Region {
    /// Returns `None` when the box is inverted (`top > bottom` or `left > right`).
    pub fn new(top: u32, left: u32, bottom: u32, right: u32) -> Option<Self> {
        if top > bottom || left > right {
            return None;
        }
        Some(Self {
            top,
            left,
            bottom,
            right,
        })
    }

    /// Create a region from an `x, y, width, height` rectangle
    pub fn from_xywh(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            top: y,
            left: x,
            bottom: y.saturating_add(height),
            right: x.saturating_add(width),
        }
    }

    /// The whole of an image with the given dimensions
    pub fn full(width: u32, height: u32) -> Self {
        Self::from_xywh(0, 0, width, height)
    }

    pub fn top(&self) -> u32 {
        self.top
    }

    pub fn left(&self) -> u32 {
        self.left
    }

    pub fn bottom(&self) -> u32 {
        self.bottom
    }

    pub fn right(&self) -> u32 {
        self.right
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }

    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn as_tuple(&self) -> (u32, u32, u32, u32) {
        (self.top, self.left, self.bottom, self.right)
    }

    /// Check if this region has zero area
    pub fn is_empty(&self) -> bool {
        self.height() == 0 || self.width() == 0
    }

    /// Check if this region contains a `(row, col)` point
    pub fn contains_point(&self, row: u32, col: u32) -> bool {
        row >= self.top && row < self.bottom && col >= self.left && col < self.right
    }

    /// Get the `(row, col)` center point of this region
    pub fn center(&self) -> (u32, u32) {
        (
            self.top + self.height() / 2,
            self.left + self.width() / 2,
        )
    }

    /// Shift the region by a `(rows, cols)` offset
    pub fn translate(&self, rows: u32, cols: u32) -> Self {
        Self {
            top: self.top + rows,
            left: self.left + cols,
            bottom: self.bottom + rows,
            right: self.right + cols,
        }
    }

    /// Fail with `InvalidRegion` unless the region fits inside a `width` x `height` image
    pub fn check_within(&self, width: u32, height: u32) -> SpriteResult<()> {
        if self.bottom > height || self.right > width {
            return Err(SpriteError::InvalidRegion {
                region: *self,
                width,
                height,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.top, self.left, self.bottom, self.right
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Cannot parse region '{input}': {reason}")]
pub struct ParseRegionError {
    input: String,
    reason: &'static str,
}

impl FromStr for Region {
    type Err = ParseRegionError;

    /// Parse `top,left,bottom,right`, optionally wrapped in brackets or parentheses
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = |reason| ParseRegionError {
            input: s.to_string(),
            reason,
        };

        let inner = s
            .trim()
            .trim_start_matches(['[', '('])
            .trim_end_matches([']', ')']);
        let parts: Vec<&str> = inner.split(',').collect();
        if parts.len() != 4 {
            return Err(error("expected four comma separated values"));
        }

        let mut values = [0u32; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part
                .trim()
                .parse::<u32>()
                .map_err(|_| error("values must be non-negative integers"))?;
        }

        let [top, left, bottom, right] = values;
        Region::new(top, left, bottom, right).ok_or_else(|| error("bottom/right precede top/left"))
    }
}
