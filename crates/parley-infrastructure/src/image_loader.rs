//! Image attachment loader.
//!
//! Turns a file on disk into a `PendingImage` the composer can hold: the MIME
//! type is inferred from the extension and the bytes are inlined as a base64
//! data URL.

use base64::{Engine as _, engine::general_purpose};
use parley_core::composer::PendingImage;
use parley_core::config::AttachmentConfig;
use parley_core::error::{ParleyError, Result};
use std::path::Path;

const NOT_AN_IMAGE: &str = "Please upload an image file";

#[derive(Debug, Clone)]
pub struct ImageLoader {
    max_bytes: u64,
}

impl ImageLoader {
    pub fn new(config: &AttachmentConfig) -> Self {
        Self {
            max_bytes: config.max_image_bytes,
        }
    }

    /// Reads and validates an image file.
    ///
    /// The type check runs before the size check, and both run before the
    /// file is read.
    pub async fn load(&self, path: &Path) -> Result<PendingImage> {
        let mime_type = infer_image_mime(path)?;

        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(ParleyError::invalid_attachment(NOT_AN_IMAGE));
        }
        self.check_size(metadata.len())?;

        let bytes = tokio::fs::read(path).await?;
        let image = self.encode(&mime_type, &bytes)?;
        tracing::debug!(
            "[ImageLoader] Attached {:?} ({}, {} bytes)",
            path,
            image.mime_type,
            image.size_bytes
        );
        Ok(image)
    }

    /// Builds the data URL for bytes of a known MIME type.
    pub fn encode(&self, mime_type: &str, bytes: &[u8]) -> Result<PendingImage> {
        if !mime_type.starts_with("image/") {
            return Err(ParleyError::invalid_attachment(NOT_AN_IMAGE));
        }
        self.check_size(bytes.len() as u64)?;

        let encoded = general_purpose::STANDARD.encode(bytes);
        Ok(PendingImage {
            data_url: format!("data:{};base64,{}", mime_type, encoded),
            mime_type: mime_type.to_string(),
            size_bytes: bytes.len() as u64,
        })
    }

    fn check_size(&self, size: u64) -> Result<()> {
        if size > self.max_bytes {
            return Err(ParleyError::invalid_attachment(format!(
                "File size too large. Maximum size is {}.",
                human_size(self.max_bytes)
            )));
        }
        Ok(())
    }
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new(&AttachmentConfig::default())
    }
}

fn infer_image_mime(path: &Path) -> Result<String> {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime.type_() != mime_guess::mime::IMAGE {
        return Err(ParleyError::invalid_attachment(NOT_AN_IMAGE));
    }
    Ok(mime.essence_str().to_string())
}

fn human_size(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    #[tokio::test]
    async fn test_loads_png_as_data_url() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cat.png");
        std::fs::write(&path, PNG_HEADER).unwrap();

        let image = ImageLoader::default().load(&path).await.unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.size_bytes, 8);
        assert_eq!(image.data_url, "data:image/png;base64,iVBORw0KGgo=");
    }

    #[tokio::test]
    async fn test_rejects_non_image() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let err = ImageLoader::default().load(&path).await.unwrap_err();
        assert_eq!(err, ParleyError::invalid_attachment("Please upload an image file"));
        assert_eq!(err.to_string(), "Please upload an image file");
    }

    #[tokio::test]
    async fn test_rejects_oversized_image() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("huge.jpg");
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(10 * 1024 * 1024 + 1).unwrap();

        let err = ImageLoader::default().load(&path).await.unwrap_err();
        assert_eq!(err.to_string(), "File size too large. Maximum size is 10MB.");
    }

    #[test]
    fn test_exact_limit_is_accepted() {
        let loader = ImageLoader::new(&AttachmentConfig { max_image_bytes: 4 });
        assert!(loader.encode("image/gif", b"GIF8").is_ok());
        assert!(loader.encode("image/gif", b"GIF89").is_err());
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(10 * 1024 * 1024), "10MB");
        assert_eq!(human_size(1500), "1500 bytes");
    }
}
