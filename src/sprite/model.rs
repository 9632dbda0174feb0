//! Sprite reference imagery and the fingerprints derived from it

use image::{DynamicImage, RgbImage};
use rand::Rng;

use super::constellation::{Constellation, build_constellation};
use super::signature::extract_signature_colors;
use crate::error::{SpriteError, SpriteResult};
use crate::match_image::SpriteConfig;
use crate::pixels::{Color, ColorImage};

/// One animation state of a sprite
#[derive(Debug, Clone)]
pub struct SpriteFrame {
    image: ColorImage,
    signature_colors: Vec<Color>,
    constellation: Constellation,
}

impl SpriteFrame {
    pub fn image(&self) -> &ColorImage {
        &self.image
    }

    pub fn signature_colors(&self) -> &[Color] {
        &self.signature_colors
    }

    pub fn constellation(&self) -> &Constellation {
        &self.constellation
    }
}

/// A named sprite with one or more equally sized animation frames.
///
/// Frames are only ever appended through `&mut self`; once a model is shared
/// (behind `&` or an `Arc`) it is frozen and safe to match from any thread.
#[derive(Debug, Clone)]
pub struct SpriteModel {
    name: String,
    config: SpriteConfig,
    frames: Vec<SpriteFrame>,
}

impl SpriteModel {
    /// Create a sprite from its first reference image using default settings
    pub fn new(name: impl Into<String>, image: ColorImage) -> SpriteResult<Self> {
        Self::with_config(name, image, SpriteConfig::default(), &mut rand::rng())
    }

    /// Create a sprite, drawing constellation anchors from `rng`
    pub fn with_config<R>(
        name: impl Into<String>,
        image: ColorImage,
        config: SpriteConfig,
        rng: &mut R,
    ) -> SpriteResult<Self>
    where
        R: Rng + ?Sized,
    {
        let mut sprite = Self {
            name: name.into(),
            config,
            frames: Vec::new(),
        };
        sprite.append_frame_with_rng(image, rng)?;
        Ok(sprite)
    }

    /// Create a sprite from a decoded image; only 8-bit RGB and RGBA are accepted
    pub fn from_dynamic(name: impl Into<String>, image: DynamicImage) -> SpriteResult<Self> {
        let name = name.into();
        let image = ColorImage::try_from(image)
            .map_err(|e| SpriteError::invalid_sprite(&name, e.to_string()))?;
        Self::new(name, image)
    }

    /// Append another animation frame, deriving its fingerprints
    pub fn append_frame(&mut self, image: ColorImage) -> SpriteResult<()> {
        self.append_frame_with_rng(image, &mut rand::rng())
    }

    pub fn append_frame_with_rng<R>(&mut self, image: ColorImage, rng: &mut R) -> SpriteResult<()>
    where
        R: Rng + ?Sized,
    {
        self.check_dimensions(&image)?;

        let signature_colors = extract_signature_colors(&image, self.config.signature_color_count);
        let constellation = build_constellation(
            &self.name,
            &image,
            &signature_colors,
            self.config.constellation_size,
            rng,
        )?;

        log::trace!(
            "Sprite '{}' frame {}: {} signature colors, {} anchors",
            self.name,
            self.frames.len(),
            signature_colors.len(),
            constellation.len()
        );

        self.frames.push(SpriteFrame {
            image,
            signature_colors,
            constellation,
        });
        Ok(())
    }

    /// Append a frame whose fingerprints were computed elsewhere.
    ///
    /// Every anchor must lie inside the image and match its pixel.
    pub fn append_frame_parts(
        &mut self,
        image: ColorImage,
        signature_colors: Vec<Color>,
        constellation: Constellation,
    ) -> SpriteResult<()> {
        self.check_dimensions(&image)?;

        if let Some(mismatch) = constellation.find_mismatch(&image) {
            return Err(SpriteError::invalid_sprite(&self.name, mismatch));
        }

        self.frames.push(SpriteFrame {
            image,
            signature_colors,
            constellation,
        });
        Ok(())
    }

    fn check_dimensions(&self, image: &ColorImage) -> SpriteResult<()> {
        if image.is_empty() {
            return Err(SpriteError::invalid_sprite(&self.name, "image has no pixels"));
        }

        if let Some(first) = self.frames.first() {
            let expected = first.image.dimensions();
            if image.dimensions() != expected {
                return Err(SpriteError::invalid_sprite(
                    &self.name,
                    format!(
                        "animation frame is {}x{} but the sprite is {}x{}",
                        image.width(),
                        image.height(),
                        expected.0,
                        expected.1
                    ),
                ));
            }
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frames(&self) -> &[SpriteFrame] {
        &self.frames
    }

    pub fn frame(&self, index: usize) -> Option<&SpriteFrame> {
        self.frames.get(index)
    }

    /// Number of animation frames
    pub fn image_count(&self) -> usize {
        self.frames.len()
    }

    pub fn height(&self) -> u32 {
        self.frames.first().map_or(0, |f| f.image.height())
    }

    pub fn width(&self) -> u32 {
        self.frames.first().map_or(0, |f| f.image.width())
    }

    /// `(height, width)` shared by all animation frames
    pub fn image_shape(&self) -> (u32, u32) {
        (self.height(), self.width())
    }

    /// One black image per animation frame with only its anchors painted in
    pub fn constellation_images(&self) -> Vec<RgbImage> {
        self.frames
            .iter()
            .map(|f| f.constellation.to_image(self.width(), self.height()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::Anchor;
    use image::{ImageBuffer, Luma, Rgb, Rgba, RgbaImage};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn solid(width: u32, height: u32, color: [u8; 3]) -> ColorImage {
        ColorImage::from(RgbImage::from_pixel(width, height, Rgb(color)))
    }

    #[test]
    fn test_new_sprite() {
        let sprite = SpriteModel::new("RED", solid(69, 46, [255, 0, 0])).unwrap();
        assert_eq!(sprite.name(), "RED");
        assert_eq!(sprite.image_count(), 1);
        assert_eq!(sprite.image_shape(), (46, 69));

        let frame = sprite.frame(0).unwrap();
        assert_eq!(frame.signature_colors(), &[Rgb([255, 0, 0])]);
        assert!(!frame.constellation().is_empty());
    }

    #[test]
    fn test_append_frames() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut sprite =
            SpriteModel::with_config("BLUE_RED", solid(5, 4, [255, 0, 0]), SpriteConfig::default(), &mut rng)
                .unwrap();
        sprite
            .append_frame_with_rng(ColorImage::from(RgbaImage::from_pixel(5, 4, Rgba([0, 0, 255, 255]))), &mut rng)
            .unwrap();

        assert_eq!(sprite.image_count(), 2);
        assert_eq!(sprite.frames()[1].image().channels(), 4);
        assert_eq!(sprite.frames()[1].signature_colors(), &[Rgb([0, 0, 255])]);
        // The first frame keeps its own fingerprint
        assert_eq!(sprite.frames()[0].signature_colors(), &[Rgb([255, 0, 0])]);
    }

    #[test]
    fn test_append_mismatched_size_fails() {
        let mut sprite = SpriteModel::new("A", solid(5, 4, [1, 2, 3])).unwrap();
        let err = sprite.append_frame(solid(4, 5, [1, 2, 3])).unwrap_err();
        assert!(err.is_invalid_sprite_image());
        assert_eq!(sprite.image_count(), 1);
    }

    #[test]
    fn test_rejects_gray_and_empty_images() {
        let gray = DynamicImage::ImageLuma8(ImageBuffer::from_pixel(3, 3, Luma([1u8])));
        assert!(SpriteModel::from_dynamic("GRAY", gray).unwrap_err().is_invalid_sprite_image());

        let err = SpriteModel::new("EMPTY", solid(0, 0, [0, 0, 0])).unwrap_err();
        assert!(err.is_invalid_sprite_image());
    }

    #[test]
    fn test_fully_transparent_sprite_fails() {
        let image = ColorImage::from(RgbaImage::from_pixel(3, 3, Rgba([1, 1, 1, 0])));
        assert!(SpriteModel::new("GHOST", image).unwrap_err().is_invalid_sprite_image());
    }

    #[test]
    fn test_append_frame_parts_validates_anchors() {
        let mut sprite = SpriteModel::new("A", solid(4, 4, [9, 9, 9])).unwrap();

        let good: Constellation = [Anchor::new(3, 3, Rgb([7, 7, 7]))].into_iter().collect();
        sprite
            .append_frame_parts(solid(4, 4, [7, 7, 7]), vec![Rgb([7, 7, 7])], good)
            .unwrap();
        assert_eq!(sprite.image_count(), 2);

        let wrong_color: Constellation = [Anchor::new(0, 0, Rgb([1, 1, 1]))].into_iter().collect();
        assert!(
            sprite
                .append_frame_parts(solid(4, 4, [7, 7, 7]), vec![], wrong_color)
                .is_err()
        );

        let out_of_bounds: Constellation = [Anchor::new(4, 0, Rgb([7, 7, 7]))].into_iter().collect();
        assert!(
            sprite
                .append_frame_parts(solid(4, 4, [7, 7, 7]), vec![], out_of_bounds)
                .is_err()
        );
        assert_eq!(sprite.image_count(), 2);
    }

    #[test]
    fn test_constellation_images() {
        let mut rng = StdRng::seed_from_u64(5);
        let image = ColorImage::from(RgbImage::from_fn(6, 3, |x, y| Rgb([x as u8 + 1, y as u8 + 1, 0])));
        let sprite = SpriteModel::with_config("GRID", image, SpriteConfig::default(), &mut rng).unwrap();

        let images = sprite.constellation_images();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].dimensions(), (6, 3));

        let constellation = sprite.frames()[0].constellation();
        let painted = images[0].pixels().filter(|p| p.0 != [0, 0, 0]).count();
        assert_eq!(painted, constellation.len());
        for anchor in constellation.iter() {
            assert_eq!(images[0].get_pixel(anchor.col, anchor.row), &anchor.color);
        }
    }
}
