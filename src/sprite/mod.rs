//! Sprite data model: reference frames, signature colors and constellations
//!
//! Sprites are built once (usually through [`SpriteCatalog::discover`]) and
//! then shared read-only with the matchers in [`crate::match_image`].

pub mod catalog;
pub mod constellation;
pub mod model;
pub mod signature;

pub use catalog::SpriteCatalog;
pub use constellation::{Anchor, Constellation, build_constellation};
pub use model::{SpriteFrame, SpriteModel};
pub use signature::extract_signature_colors;
