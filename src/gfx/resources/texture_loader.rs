//! Background texture loading
//!
//! [`TextureLoader::load`] reads and decodes an image on a helper thread and
//! hands back a future that resolves exactly once with the result. Scene
//! construction awaits that future, so nothing depending on the texture is
//! built before the pixels are available.

use std::future::Future;
use std::path::{Path, PathBuf};

use futures::channel::oneshot;

use crate::error::{PinwheelError, Result};

/// Decoded RGBA8 pixels ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureData {
    /// Decodes PNG or JPEG bytes
    pub fn decode(label: &str, bytes: &[u8]) -> std::result::Result<Self, image::ImageError> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();

        Ok(Self {
            label: label.to_string(),
            width,
            height,
            rgba: rgba.into_raw(),
        })
    }

    /// Reads and decodes the file at `path`, blocking the calling thread
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| PinwheelError::TextureIo {
            path: path.to_path_buf(),
            source,
        })?;

        let label = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self::decode(&label, &bytes).map_err(|source| PinwheelError::TextureDecode {
            path: path.to_path_buf(),
            source,
        })
    }
}

pub struct TextureLoader;

impl TextureLoader {
    /// Starts loading `path` and returns a future for the decoded texture
    pub fn load(path: impl Into<PathBuf>) -> impl Future<Output = Result<TextureData>> {
        let path = path.into();
        let (tx, rx) = oneshot::channel();

        let worker_path = path.clone();
        std::thread::spawn(move || {
            let result = TextureData::from_file(&worker_path);
            match &result {
                Ok(texture) => log::info!(
                    "Loaded texture '{}' ({}x{})",
                    worker_path.display(),
                    texture.width,
                    texture.height
                ),
                Err(e) => log::error!("{}", e),
            }
            // The receiver may already be gone; nothing left to notify then
            let _ = tx.send(result);
        });

        async move {
            rx.await
                .map_err(|_| PinwheelError::TextureLoadCancelled(path))?
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32, pixel: [u8; 4]) -> Vec<u8> {
        let mut bytes = Vec::new();
        RgbaImage::from_pixel(width, height, Rgba(pixel))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn decode_expands_to_rgba8() {
        let texture = TextureData::decode("blade", &png_bytes(3, 2, [10, 20, 30, 255])).unwrap();
        assert_eq!((texture.width, texture.height), (3, 2));
        assert_eq!(texture.rgba.len(), 3 * 2 * 4);
        assert_eq!(&texture.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(TextureData::decode("junk", b"not an image").is_err());
    }

    #[test]
    fn load_resolves_with_file_contents() {
        let path = std::env::temp_dir().join(format!("pinwheel-loader-{}.png", std::process::id()));
        std::fs::write(&path, png_bytes(4, 4, [255, 0, 0, 255])).unwrap();

        let texture = block_on(TextureLoader::load(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(texture.width, 4);
        assert_eq!(texture.label, path.file_name().unwrap().to_string_lossy());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = block_on(TextureLoader::load("does/not/exist.png"));
        assert!(matches!(result, Err(PinwheelError::TextureIo { .. })));
    }
}
