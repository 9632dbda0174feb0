//! 8-bit color pixel buffers shared by sprites and captured frames

use image::{ColorType, DynamicImage, GrayImage, ImageBuffer, Pixel, Rgb, RgbImage, RgbaImage};
use thiserror::Error;

use crate::match_image::Region;

/// An RGB triple. Alpha never takes part in color identity.
pub type Color = Rgb<u8>;

#[derive(Debug, Error)]
#[error("expected an 8-bit image with 3 or 4 channels, got {0:?}")]
pub struct UnsupportedColorType(pub ColorType);

/// How a fourth (alpha) channel takes part in pixel comparisons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaRule {
    /// Fully transparent pixels never match; used for sprite reference images
    SkipTransparent,
    /// Only the color channels are compared; used for captured frames
    Ignore,
}

/// An image with three or four 8-bit channels
#[derive(Debug, Clone, PartialEq)]
pub enum ColorImage {
    Rgb(RgbImage),
    Rgba(RgbaImage),
}

impl ColorImage {
    /// Convert any decodable image to 8-bit RGB, or RGBA when the source carries alpha
    pub fn converting(image: DynamicImage) -> Self {
        match image {
            DynamicImage::ImageRgb8(img) => ColorImage::Rgb(img),
            DynamicImage::ImageRgba8(img) => ColorImage::Rgba(img),
            other if other.color().has_alpha() => ColorImage::Rgba(other.to_rgba8()),
            other => ColorImage::Rgb(other.to_rgb8()),
        }
    }

    pub fn width(&self) -> u32 {
        match self {
            ColorImage::Rgb(img) => img.width(),
            ColorImage::Rgba(img) => img.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            ColorImage::Rgb(img) => img.height(),
            ColorImage::Rgba(img) => img.height(),
        }
    }

    /// `(width, height)` like `image::GenericImageView::dimensions`
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn channels(&self) -> u8 {
        match self {
            ColorImage::Rgb(_) => 3,
            ColorImage::Rgba(_) => 4,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// The color channels at `(row, col)`, or `None` outside the image
    pub fn color_at(&self, row: u32, col: u32) -> Option<Color> {
        match self {
            ColorImage::Rgb(img) => img.get_pixel_checked(col, row).map(|p| p.to_rgb()),
            ColorImage::Rgba(img) => img.get_pixel_checked(col, row).map(|p| p.to_rgb()),
        }
    }

    /// Check whether the pixel at `(row, col)` matches `color` under `rule`
    pub fn matches_at(&self, row: u32, col: u32, color: &Color, rule: AlphaRule) -> bool {
        match self {
            ColorImage::Rgb(img) => img
                .get_pixel_checked(col, row)
                .is_some_and(|p| pixel_matches(p, color, rule)),
            ColorImage::Rgba(img) => img
                .get_pixel_checked(col, row)
                .is_some_and(|p| pixel_matches(p, color, rule)),
        }
    }

    /// Every `(row, col)` whose pixel matches `color`, in row-major order
    pub fn locate_color(&self, color: &Color, rule: AlphaRule) -> Vec<(u32, u32)> {
        let window = Region::full(self.width(), self.height());
        match self {
            ColorImage::Rgb(img) => locate_color_in(img, window, color, rule),
            ColorImage::Rgba(img) => locate_color_in(img, window, color, rule),
        }
    }

    /// Copy out the pixels of `region`; the caller has checked the bounds
    pub(crate) fn crop(&self, region: Region) -> ColorImage {
        let (x, y, w, h) = (region.left(), region.top(), region.width(), region.height());
        match self {
            ColorImage::Rgb(img) => {
                ColorImage::Rgb(image::imageops::crop_imm(img, x, y, w, h).to_image())
            }
            ColorImage::Rgba(img) => {
                ColorImage::Rgba(image::imageops::crop_imm(img, x, y, w, h).to_image())
            }
        }
    }

    /// Drop the alpha channel, if any
    pub fn to_rgb8(&self) -> RgbImage {
        match self {
            ColorImage::Rgb(img) => img.clone(),
            ColorImage::Rgba(img) => DynamicImage::ImageRgba8(img.clone()).to_rgb8(),
        }
    }

    pub fn to_luma8(&self) -> GrayImage {
        match self {
            ColorImage::Rgb(img) => image::imageops::grayscale(img),
            ColorImage::Rgba(img) => image::imageops::grayscale(img),
        }
    }

    pub fn into_dynamic(self) -> DynamicImage {
        match self {
            ColorImage::Rgb(img) => DynamicImage::ImageRgb8(img),
            ColorImage::Rgba(img) => DynamicImage::ImageRgba8(img),
        }
    }
}

impl TryFrom<DynamicImage> for ColorImage {
    type Error = UnsupportedColorType;

    fn try_from(image: DynamicImage) -> Result<Self, Self::Error> {
        match image {
            DynamicImage::ImageRgb8(img) => Ok(ColorImage::Rgb(img)),
            DynamicImage::ImageRgba8(img) => Ok(ColorImage::Rgba(img)),
            other => Err(UnsupportedColorType(other.color())),
        }
    }
}

impl From<RgbImage> for ColorImage {
    fn from(image: RgbImage) -> Self {
        ColorImage::Rgb(image)
    }
}

impl From<RgbaImage> for ColorImage {
    fn from(image: RgbaImage) -> Self {
        ColorImage::Rgba(image)
    }
}

pub(crate) fn pixel_matches<P: Pixel<Subpixel = u8>>(pixel: &P, color: &Color, rule: AlphaRule) -> bool {
    let channels = pixel.channels();
    if channels[..3] != color.0 {
        return false;
    }
    match rule {
        AlphaRule::SkipTransparent => channels.get(3).is_none_or(|&alpha| alpha != 0),
        AlphaRule::Ignore => true,
    }
}

/// Window-local `(row, col)` coordinates of pixels matching `color` inside `window`
pub(crate) fn locate_color_in<P>(
    image: &ImageBuffer<P, Vec<u8>>,
    window: Region,
    color: &Color,
    rule: AlphaRule,
) -> Vec<(u32, u32)>
where
    P: Pixel<Subpixel = u8>,
{
    let mut found = Vec::new();
    for row in 0..window.height() {
        for col in 0..window.width() {
            let pixel = image.get_pixel(window.left() + col, window.top() + row);
            if pixel_matches(pixel, color, rule) {
                found.push((row, col));
            }
        }
    }
    found
}
