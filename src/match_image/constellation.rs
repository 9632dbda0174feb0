//! Constellation matching: cheap exact-color localization of sprites

use image::{ImageBuffer, Pixel};

use super::region::Region;
use super::{report_location, search_window};
use crate::error::SpriteResult;
use crate::frame::Frame;
use crate::pixels::{AlphaRule, ColorImage, locate_color_in, pixel_matches};
use crate::sprite::SpriteModel;

/// Locate `sprite` in `frame` by its constellations of pixels.
///
/// Pixels matching the first anchor's color propose top-left offsets; an
/// offset is accepted when every anchor of that animation frame matches.
/// All animation frames are tried in order and the last accepted offset is
/// returned, so a later frame's match supersedes an earlier one.
///
/// With a `region`, only that part of the frame is searched and the result
/// is translated back to frame coordinates when `use_global_location` is set.
pub fn locate(
    sprite: &SpriteModel,
    frame: &Frame,
    region: Option<Region>,
    use_global_location: bool,
) -> SpriteResult<Option<Region>> {
    let image = frame.image();
    let window = search_window(image, region)?;

    let found = match image {
        ColorImage::Rgb(img) => locate_in_window(sprite, img, window),
        ColorImage::Rgba(img) => locate_in_window(sprite, img, window),
    };

    Ok(found.map(|location| report_location(location, region, use_global_location)))
}

/// Window-local location of the sprite, if any
fn locate_in_window<P>(
    sprite: &SpriteModel,
    image: &ImageBuffer<P, Vec<u8>>,
    window: Region,
) -> Option<Region>
where
    P: Pixel<Subpixel = u8>,
{
    let (sprite_height, sprite_width) = sprite.image_shape();
    if window.height() < sprite_height || window.width() < sprite_width {
        return None;
    }
    let max_top = window.height() - sprite_height;
    let max_left = window.width() - sprite_width;

    let mut location = None;

    for (index, sprite_frame) in sprite.frames().iter().enumerate() {
        let constellation = sprite_frame.constellation();
        let Some(query) = constellation.query_anchor() else {
            continue;
        };

        let candidates = locate_color_in(image, window, &query.color, AlphaRule::Ignore);
        log::trace!(
            "🔍 '{}' frame {}: {} candidates for query color {:?}",
            sprite.name(),
            index,
            candidates.len(),
            query.color.0
        );

        for (row, col) in candidates {
            let (Some(top), Some(left)) = (row.checked_sub(query.row), col.checked_sub(query.col))
            else {
                continue;
            };
            if top > max_top || left > max_left {
                continue;
            }

            let verified = constellation.iter().all(|anchor| {
                let pixel = image.get_pixel(
                    window.left() + left + anchor.col,
                    window.top() + top + anchor.row,
                );
                pixel_matches(pixel, &anchor.color, AlphaRule::Ignore)
            });

            if verified {
                location = Some(Region::from_xywh(left, top, sprite_width, sprite_height));
            }
        }
    }

    location
}
