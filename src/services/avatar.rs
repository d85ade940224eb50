use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::imageops::FilterType;
use thiserror::Error;

/// Canonical avatar width in pixels; height follows the aspect ratio
pub const AVATAR_WIDTH: u32 = 512;

/// Errors that can occur while normalizing an avatar image
#[derive(Debug, Error)]
pub enum AvatarError {
    #[error("Avatar is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Avatar image format was not recognized")]
    UnknownFormat,
    #[error("Failed to process avatar image: {0}")]
    Image(#[from] image::ImageError),
}

/// A decoded, resized, re-encoded avatar ready for publication
#[derive(Debug, Clone)]
pub struct NormalizedAvatar {
    /// Output filename, `{handle}.{format}`
    pub filename: String,
    /// Re-encoded image bytes in the detected format
    pub bytes: Vec<u8>,
}

impl NormalizedAvatar {
    /// Path recorded in the handle record for this avatar
    pub fn record_path(&self) -> String {
        format!("./avatars/{}", self.filename)
    }
}

/// Decode a base64 avatar, resize it to the canonical width preserving
/// aspect ratio, and re-encode it in its original format.
pub fn normalize(handle: &str, encoded: &str) -> Result<NormalizedAvatar, AvatarError> {
    let raw = STANDARD.decode(encoded.trim())?;

    let format = image::guess_format(&raw).map_err(|_| AvatarError::UnknownFormat)?;
    let decoded = image::load_from_memory_with_format(&raw, format)?;

    let resized = decoded.resize(AVATAR_WIDTH, u32::MAX, FilterType::Lanczos3);

    let mut bytes = Vec::new();
    resized.write_to(&mut Cursor::new(&mut bytes), format)?;

    let extension = format
        .extensions_str()
        .first()
        .copied()
        .unwrap_or("img");

    Ok(NormalizedAvatar {
        filename: format!("{handle}.{extension}"),
        bytes,
    })
}
