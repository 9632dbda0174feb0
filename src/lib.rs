//! Sprite localization for game automation.
//!
//! Reference images of UI elements ("sprites", possibly animated) are loaded
//! into [`SpriteModel`]s, usually via [`SpriteCatalog::discover`], and then
//! located in captured [`Frame`]s with either [`locate`] (constellation of
//! pixels) or [`locate_template`] (normalized template matching).

pub mod error;
pub mod frame;
pub mod match_image;
pub mod pixels;
pub mod sprite;

pub use error::{SpriteError, SpriteResult};
pub use frame::{Frame, FrameBuffer};
pub use match_image::{
    MatchMethod, Region, SpriteConfig, TemplateChannels, TemplateConfig, locate, locate_template,
    locate_template_with,
};
pub use pixels::{AlphaRule, Color, ColorImage};
pub use sprite::{SpriteCatalog, SpriteModel};
