//! Avatar processing and storage
//!
//! Uploaded profile pictures are decoded, downsampled to fit a 125x125
//! bounding box (aspect ratio preserved), re-encoded in their source format,
//! and written to the public profile-pics directory under a fresh random
//! filename of 16 hex characters plus the original extension. Only JPEG and
//! PNG uploads are accepted.

use std::io::Cursor;
use std::path::PathBuf;

use blog_core::entities::DEFAULT_AVATAR;
use blog_common::AppError;
use image::{DynamicImage, GenericImageView, ImageBuffer, ImageFormat, Rgb};
use rand::Rng;
use tracing::{debug, warn};

/// Longest allowed side of a stored avatar, in pixels
pub const THUMBNAIL_MAX: u32 = 125;

/// A decoded, resized, re-encoded avatar ready to be written to disk
#[derive(Debug, Clone)]
pub struct ProcessedAvatar {
    pub bytes: Vec<u8>,
    pub extension: &'static str,
}

/// Decode an uploaded image and produce the stored thumbnail.
///
/// # Errors
/// Returns `UnsupportedImageFormat` unless the payload is JPEG or PNG, and
/// `InvalidInput` when a recognized payload fails to decode.
pub fn process_avatar(bytes: &[u8]) -> Result<ProcessedAvatar, AppError> {
    let format = image::guess_format(bytes).map_err(|_| AppError::UnsupportedImageFormat)?;

    let extension = match format {
        ImageFormat::Jpeg => "jpg",
        ImageFormat::Png => "png",
        _ => return Err(AppError::UnsupportedImageFormat),
    };

    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| AppError::InvalidInput(format!("Unreadable image: {e}")))?;

    // Shrink-only: an already-small upload is stored as-is
    let (width, height) = img.dimensions();
    let thumbnail = if width > THUMBNAIL_MAX || height > THUMBNAIL_MAX {
        img.thumbnail(THUMBNAIL_MAX, THUMBNAIL_MAX)
    } else {
        img
    };

    let mut out = Cursor::new(Vec::new());
    thumbnail
        .write_to(&mut out, format)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode thumbnail: {e}")))?;

    Ok(ProcessedAvatar {
        bytes: out.into_inner(),
        extension,
    })
}

/// Filesystem store for avatar files under the public static directory
#[derive(Debug, Clone)]
pub struct AvatarStore {
    dir: PathBuf,
}

impl AvatarStore {
    /// Create a store rooted at the given directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create the backing directory if it does not exist yet
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created
    pub async fn ensure_dir(&self) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create avatar dir: {e}")))
    }

    /// Write the registration placeholder image unless one is already there
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub async fn ensure_default(&self) -> Result<(), AppError> {
        let path = self.dir.join(DEFAULT_AVATAR);
        if tokio::fs::metadata(&path).await.is_ok() {
            return Ok(());
        }

        let placeholder = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(
            THUMBNAIL_MAX,
            THUMBNAIL_MAX,
            Rgb([158u8, 158, 158]),
        ));
        let mut out = Cursor::new(Vec::new());
        placeholder
            .write_to(&mut out, ImageFormat::Jpeg)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode placeholder: {e}")))?;

        tokio::fs::write(&path, out.into_inner())
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to write placeholder: {e}")))?;

        Ok(())
    }

    /// Write a processed avatar under a fresh random filename and return it
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub async fn save(&self, avatar: &ProcessedAvatar) -> Result<String, AppError> {
        let filename = random_filename(avatar.extension);
        let path = self.dir.join(&filename);

        tokio::fs::write(&path, &avatar.bytes)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to write avatar: {e}")))?;

        debug!(filename = %filename, "Avatar stored");
        Ok(filename)
    }

    /// Discard a previously stored avatar file.
    ///
    /// The registration placeholder is never deleted, and a missing file is
    /// not an error (the database row is already the source of truth).
    pub async fn remove(&self, filename: &str) {
        if filename == DEFAULT_AVATAR {
            return;
        }

        let path = self.dir.join(filename);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(filename = %filename, error = %e, "Failed to remove old avatar");
            }
        }
    }
}

/// 8 random bytes rendered as 16 lowercase hex characters, plus the extension
fn random_filename(extension: &str) -> String {
    let bytes: [u8; 8] = rand::thread_rng().gen();
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!("{hex}.{extension}")
}
