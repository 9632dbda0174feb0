//! Sprite localization in captured frames
//!
//! Two independent strategies share the [`Region`] type:
//! - [`locate`]: constellation-of-pixels matching, cheap and exact-color
//! - [`locate_template`] / [`locate_template_with`]: normalized template
//!   matching over the whole sprite, slower but tolerant of small changes
//!
//! Both return `Ok(None)` when the sprite is not present.

pub mod config;
pub mod constellation;
pub mod region;
pub mod template;


// Re-export main types and functions
pub use config::{
    MatchMethod, SpriteConfig, TemplateChannels, TemplateConfig, create_fast_config,
    create_precise_config,
};
pub use constellation::locate;
pub use region::{ParseRegionError, Region};
pub use template::{locate_template, locate_template_with};

use crate::error::SpriteResult;
use crate::pixels::ColorImage;

/// The part of `image` to search: `region` if it fits, otherwise the whole image
pub(crate) fn search_window(image: &ColorImage, region: Option<Region>) -> SpriteResult<Region> {
    match region {
        Some(region) => {
            region.check_within(image.width(), image.height())?;
            Ok(region)
        }
        None => Ok(Region::full(image.width(), image.height())),
    }
}

/// Translate a window-local match into frame coordinates when asked to
pub(crate) fn report_location(
    location: Region,
    region: Option<Region>,
    use_global_location: bool,
) -> Region {
    match region {
        Some(region) if use_global_location => location.translate(region.top(), region.left()),
        _ => location,
    }
}
