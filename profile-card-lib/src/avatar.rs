//! Avatar sources: the fixed gallery, external locators, and local image files embedded as
//! `data:` URLs.

use std::fmt;

use base64::{Engine, engine::general_purpose};
use image::{GenericImageView, ImageFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const GALLERY: [&str; 6] = [
    "https://images.unsplash.com/photo-1494790108755-2616b152c825?w=150&h=150&fit=crop&crop=face",
    "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=150&h=150&fit=crop&crop=face",
    "https://images.unsplash.com/photo-1438761681033-6461ffad8d80?w=150&h=150&fit=crop&crop=face",
    "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=150&h=150&fit=crop&crop=face",
    "https://images.unsplash.com/photo-1500648767791-00dcc994a43e?w=150&h=150&fit=crop&crop=face",
    "https://images.unsplash.com/photo-1534528741775-53994a69daeb?w=150&h=150&fit=crop&crop=face",
];

const DATA_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

#[derive(Debug, Error)]
pub enum AvatarError {
    #[error("The selected file is empty")]
    Empty,
    #[error("The selected image is {size} bytes; avatars are limited to {max} bytes")]
    TooLarge { size: usize, max: usize },
    #[error("The selected file is not a readable image: {0}")]
    Undecodable(#[from] image::ImageError),
}

/// Where the avatar image comes from. Stored as a single text value: embedded images are
/// `data:` URLs, anything else is an external locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AvatarReference {
    Locator(String),
    Embedded(String),
}

impl AvatarReference {
    /// Decode a local image file into an embedded reference.
    ///
    /// The bytes must be no larger than `max_bytes` and must fully decode as an image in a
    /// format recognisable from its contents.
    pub fn from_image_bytes(bytes: &[u8], max_bytes: usize) -> Result<Self, AvatarError> {
        if bytes.is_empty() {
            return Err(AvatarError::Empty);
        }
        if bytes.len() > max_bytes {
            return Err(AvatarError::TooLarge {
                size: bytes.len(),
                max: max_bytes,
            });
        }

        let format = image::guess_format(bytes)?;
        let image = image::load_from_memory_with_format(bytes, format)?;
        debug!(
            "Decoded {:?} avatar of {}x{}",
            format,
            image.width(),
            image.height()
        );

        Ok(Self::Embedded(format!(
            "{DATA_PREFIX}{}{BASE64_MARKER}{}",
            format.to_mime_type(),
            general_purpose::STANDARD.encode(bytes)
        )))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Locator(text) | Self::Embedded(text) => text,
        }
    }

    /// The raw image bytes of an embedded avatar. `None` for locators or a malformed payload.
    pub fn embedded_bytes(&self) -> Option<Vec<u8>> {
        let Self::Embedded(url) = self else {
            return None;
        };

        let (_, payload) = url.split_once(BASE64_MARKER)?;
        general_purpose::STANDARD.decode(payload).ok()
    }

    /// The image format recorded in an embedded avatar's `data:` URL.
    pub fn embedded_format(&self) -> Option<ImageFormat> {
        let Self::Embedded(url) = self else {
            return None;
        };

        let (mime, _) = url.strip_prefix(DATA_PREFIX)?.split_once(BASE64_MARKER)?;
        ImageFormat::from_mime_type(mime)
    }
}

impl From<String> for AvatarReference {
    fn from(text: String) -> Self {
        if text.starts_with(DATA_PREFIX) {
            Self::Embedded(text)
        } else {
            Self::Locator(text)
        }
    }
}

impl From<AvatarReference> for String {
    fn from(avatar: AvatarReference) -> Self {
        match avatar {
            AvatarReference::Locator(text) | AvatarReference::Embedded(text) => text,
        }
    }
}

impl fmt::Display for AvatarReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locator(url) => write!(f, "{url}"),
            Self::Embedded(_) => match self.embedded_format() {
                Some(format) => write!(f, "embedded {format:?} image"),
                None => write!(f, "embedded image"),
            },
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use std::io::Cursor;

    use image::{DynamicImage, ImageFormat};

    use super::*;

    pub(crate) fn png_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::new_rgb8(2, 2)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_png_is_embedded() {
        let bytes = png_bytes();

        let avatar = AvatarReference::from_image_bytes(&bytes, 1024).unwrap();

        assert!(avatar.as_str().starts_with("data:image/png;base64,"));
        assert_eq!(avatar.embedded_format(), Some(ImageFormat::Png));
        assert_eq!(avatar.embedded_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_empty() {
        assert!(matches!(
            AvatarReference::from_image_bytes(&[], 1024),
            Err(AvatarError::Empty)
        ));
    }

    #[test]
    fn test_too_large() {
        let bytes = png_bytes();

        assert!(matches!(
            AvatarReference::from_image_bytes(&bytes, bytes.len() - 1),
            Err(AvatarError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_not_an_image() {
        assert!(matches!(
            AvatarReference::from_image_bytes(b"definitely not pixels", 1024),
            Err(AvatarError::Undecodable(_))
        ));
    }

    #[test]
    fn test_truncated_image() {
        let bytes = png_bytes();
        let truncated = bytes.get(..40).unwrap();

        assert!(matches!(
            AvatarReference::from_image_bytes(truncated, 1024),
            Err(AvatarError::Undecodable(_))
        ));
    }

    #[test]
    fn test_text_form() {
        let locator = AvatarReference::from(GALLERY[0].to_string());
        assert_eq!(locator, AvatarReference::Locator(GALLERY[0].into()));
        assert_eq!(locator.embedded_bytes(), None);

        let json = serde_json::to_string(&locator).unwrap();
        assert_eq!(json, format!("\"{}\"", GALLERY[0]));

        let embedded: AvatarReference = serde_json::from_str("\"data:image/png;base64,AAAA\"").unwrap();
        assert!(matches!(embedded, AvatarReference::Embedded(_)));
    }
}
