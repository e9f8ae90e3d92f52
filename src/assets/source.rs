//! Where image bytes come from, and how they become pixels.

use std::fmt;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use super::image::{ImageOrigin, ImageResource};

/// Per-asset load failure. Always recovered by substituting a placeholder.
#[derive(Debug)]
pub enum LoadError {
    /// The source has nothing under this name.
    NotFound {
        /// Requested asset name.
        name: String,
    },
    /// Reading the bytes failed.
    Io {
        /// Requested asset name.
        name: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The bytes are not a decodable image.
    Decode {
        /// Requested asset name.
        name: String,
        /// Underlying decoder error.
        source: image::ImageError,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { name } => write!(f, "image not found: {name}"),
            Self::Io { name, source } => {
                write!(f, "failed to read image {name}: {source}")
            }
            Self::Decode { name, source } => {
                write!(f, "failed to decode image {name}: {source}")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound { .. } => None,
            Self::Io { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
        }
    }
}

/// Asynchronous provider of encoded image bytes.
///
/// Fetches may complete in any order. The cache issues at most one load
/// per name at a time, through [`load`](Self::load).
#[allow(async_fn_in_trait)]
pub trait ImageSource {
    /// Fetch the encoded bytes for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the bytes are missing or unreadable.
    async fn fetch(&self, name: &str) -> Result<Vec<u8>, LoadError>;

    /// Fetch and decode `name`.
    ///
    /// The provided body decodes on the polling thread once
    /// [`fetch`](Self::fetch) resolves. Sources whose bytes are costly to
    /// read or decode override it to do that work on a blocking pool.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if fetching or decoding fails.
    async fn load(&self, name: &str) -> Result<ImageResource, LoadError> {
        let bytes = self.fetch(name).await?;
        decode(name, &bytes)
    }
}

/// Reads `<root>/<name>` from the filesystem.
///
/// Reads and decodes run on smol's blocking pool, so the future only
/// waits on them and works under any executor.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Serve files below `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory images are read from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ImageSource for DirectorySource {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>, LoadError> {
        let path = self.root.join(name);
        let name = name.to_owned();
        smol::unblock(move || read_file(&name, &path)).await
    }

    async fn load(&self, name: &str) -> Result<ImageResource, LoadError> {
        let path = self.root.join(name);
        let name = name.to_owned();
        smol::unblock(move || {
            let bytes = read_file(&name, &path)?;
            decode(&name, &bytes)
        })
        .await
    }
}

fn read_file(name: &str, path: &Path) -> Result<Vec<u8>, LoadError> {
    std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound {
                name: name.to_owned(),
            }
        } else {
            LoadError::Io {
                name: name.to_owned(),
                source,
            }
        }
    })
}

/// Serves bytes registered in memory, e.g. images embedded with
/// `include_bytes!`.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: FxHashMap<String, Vec<u8>>,
}

impl MemorySource {
    /// Empty source; every fetch reports `NotFound`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `name`, replacing any previous entry.
    #[must_use]
    pub fn with(mut self, name: &str, bytes: Vec<u8>) -> Self {
        let _ = self.files.insert(name.to_owned(), bytes);
        self
    }
}

impl ImageSource for MemorySource {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>, LoadError> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| LoadError::NotFound {
                name: name.to_owned(),
            })
    }

    async fn load(&self, name: &str) -> Result<ImageResource, LoadError> {
        let bytes = self.fetch(name).await?;
        let name = name.to_owned();
        smol::unblock(move || decode(&name, &bytes)).await
    }
}

/// Decode encoded image bytes into an RGBA8 resource labelled `name`.
///
/// # Errors
///
/// Returns [`LoadError::Decode`] if `bytes` is not a supported image.
pub fn decode(name: &str, bytes: &[u8]) -> Result<ImageResource, LoadError> {
    let decoded = image::load_from_memory(bytes).map_err(|source| LoadError::Decode {
        name: name.to_owned(),
        source,
    })?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(ImageResource::new(
        name,
        width,
        height,
        rgba.into_raw(),
        ImageOrigin::Loaded,
    ))
}

/// Encode a solid-colour PNG; used to build in-memory fixtures.
///
/// # Errors
///
/// Returns the encoder error if PNG encoding fails.
pub fn encode_solid_png(
    width: u32,
    height: u32,
    rgba: [u8; 4],
) -> Result<Vec<u8>, image::ImageError> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut bytes = std::io::Cursor::new(Vec::new());
    img.write_to(&mut bytes, image::ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_produces_rgba8() {
        let png = encode_solid_png(3, 2, [10, 20, 30, 255]).unwrap();
        let img = decode("solid.png", &png).unwrap();
        assert_eq!((img.width(), img.height()), (3, 2));
        assert_eq!(img.pixel(2, 1), Some([10, 20, 30, 255]));
        assert!(!img.is_fallback());
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode("broken.jpg", b"definitely not an image").unwrap_err();
        assert!(matches!(err, LoadError::Decode { ref name, .. } if name == "broken.jpg"));
        assert!(err.to_string().contains("broken.jpg"));
    }

    #[test]
    fn memory_source_reports_missing() {
        let source = MemorySource::new().with("a.png", vec![1, 2, 3]);
        assert_eq!(pollster::block_on(source.fetch("a.png")).unwrap(), vec![1, 2, 3]);
        let err = pollster::block_on(source.fetch("b.png")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[test]
    fn directory_source_reads_files() {
        let dir = std::env::temp_dir().join(format!("galleria-src-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("here.png"), [7u8, 8, 9]).unwrap();

        let source = DirectorySource::new(&dir);
        assert_eq!(source.root(), dir.as_path());
        assert_eq!(pollster::block_on(source.fetch("here.png")).unwrap(), vec![7, 8, 9]);
        let err = pollster::block_on(source.fetch("gone.png")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { ref name } if name == "gone.png"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn load_decodes_through_every_source() {
        let png = encode_solid_png(2, 2, [1, 2, 3, 255]).unwrap();
        let dir = std::env::temp_dir()
            .join(format!("galleria-load-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("tile.png"), &png).unwrap();

        let from_disk =
            pollster::block_on(DirectorySource::new(&dir).load("tile.png")).unwrap();
        let from_memory = pollster::block_on(
            MemorySource::new().with("tile.png", png).load("tile.png"),
        )
        .unwrap();
        for img in [&from_disk, &from_memory] {
            assert_eq!(img.label(), "tile.png");
            assert_eq!(img.pixel(1, 1), Some([1, 2, 3, 255]));
        }

        let err = pollster::block_on(DirectorySource::new(&dir).load("gone.png"))
            .unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
