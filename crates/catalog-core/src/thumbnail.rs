//! # Image URLs
//!
//! Image-cropping collaborator. Real thumbnail generation happens elsewhere;
//! this side only knows how to name the cropped rendition of a stored image.

use crate::error::CatalogError;
use std::fmt;
use std::str::FromStr;

/// Size used when a request does not name one
pub const DEFAULT_THUMBNAIL_SIZE: ThumbnailSize = ThumbnailSize::new(255, 255);

/// Requested thumbnail dimensions, written `WIDTHxHEIGHT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThumbnailSize {
    pub width: u32,
    pub height: u32,
}

impl ThumbnailSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl FromStr for ThumbnailSize {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CatalogError::InvalidThumbnailSize { size: s.to_string() };
        let (width, height) = s.split_once('x').ok_or_else(invalid)?;
        let width: u32 = width.parse().map_err(|_| invalid())?;
        let height: u32 = height.parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for ThumbnailSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Maps stored image paths to public URLs
pub trait ImageCropper: Send + Sync {
    /// URL of the uncropped original
    fn original_url(&self, path: &str) -> String;

    /// URL of the rendition cropped to `size`
    fn crop_url(&self, path: &str, size: ThumbnailSize) -> String;

    /// URL shown when a product has no image
    fn placeholder_url(&self, size: ThumbnailSize) -> String;
}

/// Names renditions as `__sized__/<stem>-crop-c0-5__0-5-<W>x<H>.<ext>`
/// under the media root.
#[derive(Debug, Clone)]
pub struct SizedPathCropper {
    media_url: String,
    static_url: String,
}

impl SizedPathCropper {
    pub fn new(media_url: impl Into<String>, static_url: impl Into<String>) -> Self {
        Self {
            media_url: media_url.into().trim_end_matches('/').to_string(),
            static_url: static_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl ImageCropper for SizedPathCropper {
    fn original_url(&self, path: &str) -> String {
        format!("{}/{}", self.media_url, path.trim_start_matches('/'))
    }

    fn crop_url(&self, path: &str, size: ThumbnailSize) -> String {
        let path = path.trim_start_matches('/');
        let (stem, ext) = match path.rsplit_once('.') {
            Some((stem, ext)) if !ext.contains('/') => (stem, Some(ext)),
            _ => (path, None),
        };
        match ext {
            Some(ext) => format!("{}/__sized__/{stem}-crop-c0-5__0-5-{size}.{ext}", self.media_url),
            None => format!("{}/__sized__/{stem}-crop-c0-5__0-5-{size}", self.media_url),
        }
    }

    fn placeholder_url(&self, size: ThumbnailSize) -> String {
        format!("{}/images/placeholder{size}.png", self.static_url)
    }
}
