// Icon textures for project rows: generated placeholders plus a small
// per-thread cache of decoded project icons

use gdk4::Texture;
use gtk4::{gdk, glib, prelude::*};
use std::cell::RefCell;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::SystemTime;

use crate::image_loader::{open_image, IconLoadError};

/// Icons are decoded at twice the displayed size for HiDPI.
const ICON_DECODE_SIZE: u32 = 128;
const ICON_CACHE_ENTRIES: usize = 256;
const PLACEHOLDER_SIZE: usize = 64;

type IconKey = (PathBuf, Option<SystemTime>);

thread_local! {
    static ICON_CACHE: RefCell<IconCache<Texture>> = RefCell::new(IconCache::new(ICON_CACHE_ENTRIES));
}

/// Decoded icons and failed decodes, both keyed by path and modification
/// time. A failed file is not retried until it changes on disk.
pub struct IconCache<T> {
    loaded: lru::LruCache<IconKey, T>,
    failed: lru::LruCache<IconKey, ()>,
}

impl<T: Clone> IconCache<T> {
    pub fn new(entries: usize) -> Self {
        let cap = NonZeroUsize::new(entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            loaded: lru::LruCache::new(cap),
            failed: lru::LruCache::new(cap),
        }
    }

    pub fn get_or_load<F>(&mut self, path: &Path, load: F) -> Option<T>
    where
        F: FnOnce(&Path) -> Result<T, IconLoadError>,
    {
        let mtime = std::fs::metadata(path).and_then(|m| m.modified()).ok();
        let key = (path.to_path_buf(), mtime);

        if let Some(value) = self.loaded.get(&key) {
            return Some(value.clone());
        }
        if self.failed.get(&key).is_some() {
            return None;
        }

        match load(path) {
            Ok(value) => {
                self.loaded.put(key, value.clone());
                Some(value)
            }
            Err(err) => {
                tracing::warn!(error = ?err, "Failed to load project icon");
                self.failed.put(key, ());
                None
            }
        }
    }
}

/// Fallback images a row shows instead of a project icon.
#[derive(Clone)]
pub struct RowIcons {
    /// Shown when the project file no longer exists.
    pub missing: Texture,
    /// Shown when the project has no icon file.
    pub default: Texture,
}

impl Default for RowIcons {
    fn default() -> Self {
        Self {
            missing: missing_icon_texture().clone(),
            default: default_project_texture().clone(),
        }
    }
}

fn fill(pixels: &mut [u8], color: [u8; 4]) {
    for chunk in pixels.chunks_exact_mut(4) {
        chunk.copy_from_slice(&color);
    }
}

fn memory_texture(pixels: Vec<u8>, width: usize, height: usize) -> Texture {
    let bytes = glib::Bytes::from_owned(pixels);
    gdk::MemoryTexture::new(
        width as i32,
        height as i32,
        gdk::MemoryFormat::R8g8b8a8,
        &bytes,
        width * 4,
    )
    .upcast()
}

// Grey tile crossed out in red
fn missing_icon_texture() -> &'static Texture {
    static MISSING: OnceLock<Texture> = OnceLock::new();
    MISSING.get_or_init(|| {
        let size = PLACEHOLDER_SIZE;
        let mut pixels = vec![0u8; size * size * 4];
        fill(&mut pixels, [0x2a, 0x2a, 0x2a, 0xff]);

        let cross = [0xe0u8, 0x4f, 0x4f, 0xff];
        let margin = 14;
        for i in margin..size - margin {
            for t in 0..3 {
                let x = (i + t).min(size - 1);
                for (px, py) in [(x, i), (size - 1 - x, i)] {
                    let idx = (py * size + px) * 4;
                    pixels[idx..idx + 4].copy_from_slice(&cross);
                }
            }
        }
        memory_texture(pixels, size, size)
    })
}

// Blue tile with a light disc, in the spirit of the engine's default icon
fn default_project_texture() -> &'static Texture {
    static DEFAULT: OnceLock<Texture> = OnceLock::new();
    DEFAULT.get_or_init(|| {
        let size = PLACEHOLDER_SIZE;
        let mut pixels = vec![0u8; size * size * 4];
        fill(&mut pixels, [0x47, 0x8c, 0xbf, 0xff]);

        let disc = [0xf0u8, 0xf4, 0xf8, 0xff];
        let center = size as f32 / 2.0;
        let radius = size as f32 * 0.28;
        for y in 0..size {
            for x in 0..size {
                let dx = x as f32 + 0.5 - center;
                let dy = y as f32 + 0.5 - center;
                if dx * dx + dy * dy <= radius * radius {
                    let idx = (y * size + x) * 4;
                    pixels[idx..idx + 4].copy_from_slice(&disc);
                }
            }
        }
        memory_texture(pixels, size, size)
    })
}

/// Texture for the icon at `path`, or `None` when it cannot be decoded.
/// Results are cached until the file's modification time changes.
pub fn load_icon_texture(path: &Path) -> Option<Texture> {
    ICON_CACHE.with(|cache| cache.borrow_mut().get_or_load(path, decode_icon_texture))
}

fn decode_icon_texture(path: &Path) -> Result<Texture, IconLoadError> {
    let img = match open_image(path) {
        Ok(img) => img,
        // Formats `image` lacks may still have a gdk-pixbuf loader.
        Err(err @ IconLoadError::Decode { .. }) => {
            let texture = Texture::from_filename(path).map_err(|_| err)?;
            tracing::debug!(?path, "Loaded project icon through GDK");
            return Ok(texture);
        }
        Err(err) => return Err(err),
    };

    let img = img.thumbnail(ICON_DECODE_SIZE, ICON_DECODE_SIZE);
    let rgba = img.to_rgba8();
    let (width, height) = (rgba.width().max(1) as usize, rgba.height().max(1) as usize);
    let texture = memory_texture(rgba.into_raw(), width, height);

    tracing::debug!(?path, width, height, "Decoded project icon");
    Ok(texture)
}
