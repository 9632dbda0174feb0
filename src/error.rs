use std::path::PathBuf;
use thiserror::Error;

use crate::match_image::Region;

/// A specialized `Result` type for sprite loading and matching.
pub type SpriteResult<T> = Result<T, SpriteError>;

/// The error type for all sprite-related operations.
///
/// A sprite that is simply not present in a frame is not an error; the
/// matchers report that as `Ok(None)`.
#[derive(Debug, Error)]
pub enum SpriteError {
    #[error("Invalid sprite image for '{sprite}': {description}")]
    InvalidSpriteImage { sprite: String, description: String },

    #[error("Invalid frame: {description}")]
    InvalidFrame { description: String },

    #[error("Region {region} lies outside the searched image ({width}x{height})")]
    InvalidRegion {
        region: Region,
        width: u32,
        height: u32,
    },

    #[error("Failed to read sprite directory {path:?}: {source}")]
    DirectoryRead {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl SpriteError {
    pub(crate) fn invalid_sprite(sprite: &str, description: impl Into<String>) -> Self {
        SpriteError::InvalidSpriteImage {
            sprite: sprite.to_string(),
            description: description.into(),
        }
    }

    /// Check if this error was caused by malformed reference imagery
    pub fn is_invalid_sprite_image(&self) -> bool {
        matches!(self, SpriteError::InvalidSpriteImage { .. })
    }

    /// Check if this error was caused by a search region outside the image
    pub fn is_invalid_region(&self) -> bool {
        matches!(self, SpriteError::InvalidRegion { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SpriteError::invalid_sprite("BUTTON", "expected 3 or 4 channels, got 1");
        assert!(err.is_invalid_sprite_image());
        assert!(!err.is_invalid_region());
        assert_eq!(
            err.to_string(),
            "Invalid sprite image for 'BUTTON': expected 3 or 4 channels, got 1"
        );

        let region = Region::new(0, 0, 20, 30).unwrap();
        let err = SpriteError::InvalidRegion {
            region,
            width: 10,
            height: 10,
        };
        assert!(err.is_invalid_region());
        assert_eq!(
            err.to_string(),
            "Region (0, 0, 20, 30) lies outside the searched image (10x10)"
        );
    }
}
