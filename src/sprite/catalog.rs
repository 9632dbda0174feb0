//! Sprite discovery from a directory of per-frame reference images

use rand::Rng;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::model::SpriteModel;
use crate::error::{SpriteError, SpriteResult};
use crate::match_image::SpriteConfig;
use crate::pixels::ColorImage;

/// Sprites keyed by their upper-case name
#[derive(Debug, Clone, Default)]
pub struct SpriteCatalog {
    sprites: BTreeMap<String, SpriteModel>,
}

impl SpriteCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every sprite image in `directory` with default settings.
    ///
    /// See [`SpriteCatalog::discover_with`].
    pub fn discover(directory: impl AsRef<Path>) -> SpriteResult<Self> {
        Self::discover_with(directory, &SpriteConfig::default(), &mut rand::rng())
    }

    /// Scan `directory` (not recursively) for `<name>_<index>.<ext>` images.
    ///
    /// Files sharing a name become the animation frames of one sprite, in
    /// file name order. A missing directory yields an empty catalog; an
    /// image that fails to decode fails the whole load.
    pub fn discover_with<R>(
        directory: impl AsRef<Path>,
        config: &SpriteConfig,
        rng: &mut R,
    ) -> SpriteResult<Self>
    where
        R: Rng + ?Sized,
    {
        let dir_path = directory.as_ref();
        let mut catalog = Self::new();

        if !dir_path.is_dir() {
            log::debug!("Sprite directory {:?} not found, catalog is empty", dir_path);
            return Ok(catalog);
        }

        let directory_error = |source| SpriteError::DirectoryRead {
            path: dir_path.to_path_buf(),
            source,
        };

        let mut image_paths: Vec<PathBuf> = Vec::new();
        for entry in std::fs::read_dir(dir_path).map_err(directory_error)? {
            let path = entry.map_err(directory_error)?.path();
            if path.is_file() && image::ImageFormat::from_path(&path).is_ok() {
                image_paths.push(path);
            }
        }
        image_paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        for path in image_paths {
            let Some(name) = sprite_name_from_path(&path) else {
                log::debug!("Skipping {:?}: no sprite name in file name", path);
                continue;
            };

            let image = image::open(&path).map_err(|e| {
                SpriteError::invalid_sprite(&name, format!("failed to load {:?}: {e}", path))
            })?;
            let image = ColorImage::converting(image);

            match catalog.sprites.get_mut(&name) {
                Some(sprite) => sprite.append_frame_with_rng(image, rng)?,
                None => {
                    let sprite = SpriteModel::with_config(name.clone(), image, config.clone(), rng)?;
                    catalog.sprites.insert(name.clone(), sprite);
                }
            }
            log::debug!("🖼️ Loaded {:?} as a frame of sprite '{}'", path, name);
        }

        log::debug!(
            "Discovered {} sprites in {:?}",
            catalog.sprites.len(),
            dir_path
        );
        Ok(catalog)
    }

    /// Add or replace a sprite under its own name
    pub fn insert(&mut self, sprite: SpriteModel) -> Option<SpriteModel> {
        self.sprites.insert(sprite.name().to_string(), sprite)
    }

    pub fn get(&self, name: &str) -> Option<&SpriteModel> {
        self.sprites.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sprites.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sprites.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SpriteModel)> {
        self.sprites.iter().map(|(name, sprite)| (name.as_str(), sprite))
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn into_sprites(self) -> BTreeMap<String, SpriteModel> {
        self.sprites
    }
}

/// `sprite_button_1.png` -> `SPRITE_BUTTON`; a stem without `_` names the sprite as a whole
fn sprite_name_from_path(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let name = match stem.rsplit_once('_') {
        Some((name, _index)) => name,
        None => stem,
    };
    if name.is_empty() {
        return None;
    }
    Some(name.to_uppercase())
}
