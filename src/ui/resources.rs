//! Avatar texture loading

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ViewError;

/// Decoded RGBA8 image
#[derive(Clone, PartialEq)]
pub struct Texture {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub rgba: Arc<[u8]>,
}

impl Texture {
    pub fn size(&self) -> [usize; 2] {
        [self.width as usize, self.height as usize]
    }

    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied(self.size(), &self.rgba)
    }
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("name", &self.name)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Resolves an avatar image name to a texture
pub trait TextureLoader {
    fn load(&self, name: &str) -> Result<Texture, ViewError>;
}

/// Loads `<root>/<avatar_dir>/<name>.png`, caching each decoded image
pub struct DirTextureLoader {
    root: PathBuf,
    avatar_dir: String,
    cache: RefCell<HashMap<PathBuf, Texture>>,
}

impl DirTextureLoader {
    pub fn new(root: impl Into<PathBuf>, avatar_dir: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            avatar_dir: avatar_dir.into(),
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        let mut path = self.root.join(&self.avatar_dir).join(name);
        if path.extension().is_none() {
            path.set_extension("png");
        }
        path
    }

    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }

    fn decode(path: &Path, name: &str) -> Result<Texture, ViewError> {
        if !path.is_file() {
            return Err(ViewError::TextureNotFound(path.to_path_buf()));
        }
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        log::debug!("Loaded avatar {:?} ({}x{})", path, width, height);
        Ok(Texture {
            name: name.to_string(),
            width,
            height,
            rgba: Arc::from(img.into_raw()),
        })
    }
}

impl TextureLoader for DirTextureLoader {
    fn load(&self, name: &str) -> Result<Texture, ViewError> {
        let path = self.path_for(name);
        if let Some(texture) = self.cache.borrow().get(&path) {
            return Ok(texture.clone());
        }
        let texture = Self::decode(&path, name)?;
        self.cache.borrow_mut().insert(path, texture.clone());
        Ok(texture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(dir: &Path, name: &str, w: u32, h: u32) {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba([200, 30, 30, 255]));
        img.save(dir.join(name)).unwrap();
    }

    #[test]
    fn test_path_for_appends_png() {
        let loader = DirTextureLoader::new("assets", "UIImage");
        assert_eq!(loader.path_for("knight"), PathBuf::from("assets/UIImage/knight.png"));
        assert_eq!(loader.path_for("mage.png"), PathBuf::from("assets/UIImage/mage.png"));
    }

    #[test]
    fn test_load_and_cache() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("UIImage");
        std::fs::create_dir_all(&dir).unwrap();
        write_png(&dir, "knight.png", 4, 2);

        let loader = DirTextureLoader::new(tmp.path(), "UIImage");
        let tex = loader.load("knight").unwrap();
        assert_eq!((tex.width, tex.height), (4, 2));
        assert_eq!(tex.rgba.len(), 4 * 2 * 4);
        assert_eq!(tex.name, "knight");

        loader.load("knight").unwrap();
        assert_eq!(loader.cached(), 1);
    }

    #[test]
    fn test_missing_texture() {
        let tmp = tempfile::tempdir().unwrap();
        let loader = DirTextureLoader::new(tmp.path(), "UIImage");
        assert!(matches!(loader.load("nobody"), Err(ViewError::TextureNotFound(_))));
    }
}
