//! Image intake
//!
//! Holds the one image selected (or dropped) by the user together with a
//! transient preview reference. Preview references are a resource: each one
//! created through [`PreviewUrls::create`] is revoked exactly once, when the
//! image is replaced, cleared, or the intake is torn down.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// A raw image file as handed over by a file picker or drop target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageFile {
    /// Original file name
    pub name: String,
    /// MIME type reported by the picker, if any
    pub mime_type: Option<String>,
    /// File contents
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: None,
            bytes,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Content type for the upload.
    ///
    /// Uses the reported MIME type, then sniffs the magic bytes, then falls
    /// back to `application/octet-stream`. Nothing is rejected here.
    pub fn content_type(&self) -> String {
        if let Some(mime) = self.mime_type.as_deref().filter(|m| !m.is_empty()) {
            return mime.to_string();
        }
        image::guess_format(&self.bytes)
            .map(|format| format.to_mime_type().to_string())
            .unwrap_or_else(|_| "application/octet-stream".to_string())
    }
}

/// A locally-resolvable display URI. Never transmitted to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewRef(String);

impl PreviewRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PreviewRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of preview references (object URLs in a browser)
pub trait PreviewUrls {
    /// Acquire a preview reference for `file`
    fn create(&mut self, file: &ImageFile) -> PreviewRef;

    /// Release a reference previously returned by [`PreviewUrls::create`]
    fn revoke(&mut self, preview: &PreviewRef);
}

/// Preview references kept in memory, for hosts without a browser
#[derive(Debug, Default)]
pub struct InMemoryPreviews {
    live: HashSet<PreviewRef>,
    created: usize,
    revoked: usize,
    double_revokes: usize,
}

impl InMemoryPreviews {
    pub fn new() -> Self {
        Self::default()
    }

    /// References created and not yet revoked
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, preview: &PreviewRef) -> bool {
        self.live.contains(preview)
    }

    pub fn created_count(&self) -> usize {
        self.created
    }

    pub fn revoked_count(&self) -> usize {
        self.revoked
    }

    /// Revocations of references that were not live
    pub fn double_revokes(&self) -> usize {
        self.double_revokes
    }
}

impl PreviewUrls for InMemoryPreviews {
    fn create(&mut self, _file: &ImageFile) -> PreviewRef {
        let preview = PreviewRef::new(format!("preview:{}", Uuid::new_v4()));
        self.live.insert(preview.clone());
        self.created += 1;
        preview
    }

    fn revoke(&mut self, preview: &PreviewRef) {
        if self.live.remove(preview) {
            self.revoked += 1;
        } else {
            self.double_revokes += 1;
        }
    }
}

/// The held image and its preview
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    pub file: ImageFile,
    pub preview: PreviewRef,
}

/// Owns at most one [`UploadedImage`] and the preview source behind it
#[derive(Debug)]
pub struct ImageIntake<P: PreviewUrls> {
    previews: P,
    current: Option<UploadedImage>,
}

impl<P: PreviewUrls> ImageIntake<P> {
    pub fn new(previews: P) -> Self {
        Self {
            previews,
            current: None,
        }
    }

    /// Replace the held image, releasing the previous preview first
    pub fn set_image(&mut self, file: ImageFile) -> &UploadedImage {
        self.release();
        let preview = self.previews.create(&file);
        tracing::debug!(name = %file.name, size = file.bytes.len(), "image selected");
        self.current.insert(UploadedImage { file, preview })
    }

    /// Drop the held image and its preview
    pub fn clear_image(&mut self) {
        self.release();
    }

    pub fn image(&self) -> Option<&UploadedImage> {
        self.current.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.current.is_some()
    }

    pub fn previews(&self) -> &P {
        &self.previews
    }

    // Taking the image out first makes a second release a no-op.
    fn release(&mut self) {
        if let Some(old) = self.current.take() {
            self.previews.revoke(&old.preview);
        }
    }
}

impl<P: PreviewUrls> Drop for ImageIntake<P> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg_file(name: &str) -> ImageFile {
        ImageFile::new(name, vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10])
    }

    #[test]
    fn test_replacing_twice_revokes_each_preview_once() {
        let mut intake = ImageIntake::new(InMemoryPreviews::new());

        let first = intake.set_image(jpeg_file("a.jpg")).preview.clone();
        let second = intake.set_image(jpeg_file("b.jpg")).preview.clone();
        assert!(!intake.previews().is_live(&first));
        assert!(intake.previews().is_live(&second));

        let third = intake.set_image(jpeg_file("c.jpg")).preview.clone();
        assert!(!intake.previews().is_live(&second));
        assert!(intake.previews().is_live(&third));

        assert_eq!(intake.previews().created_count(), 3);
        assert_eq!(intake.previews().revoked_count(), 2);
        assert_eq!(intake.previews().live_count(), 1);
        assert_eq!(intake.previews().double_revokes(), 0);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut intake = ImageIntake::new(InMemoryPreviews::new());
        intake.set_image(jpeg_file("leaf.jpg"));

        intake.clear_image();
        intake.clear_image();

        assert!(!intake.has_image());
        assert_eq!(intake.previews().revoked_count(), 1);
        assert_eq!(intake.previews().double_revokes(), 0);
    }

    #[test]
    fn test_content_type_prefers_reported_mime() {
        let file = jpeg_file("leaf").with_mime_type("image/webp");
        assert_eq!(file.content_type(), "image/webp");
    }

    #[test]
    fn test_content_type_sniffs_magic_bytes() {
        assert_eq!(jpeg_file("leaf").content_type(), "image/jpeg");

        let png = ImageFile::new("leaf.png", b"\x89PNG\r\n\x1a\n0000".to_vec());
        assert_eq!(png.content_type(), "image/png");
    }

    #[test]
    fn test_content_type_unknown_bytes_are_not_rejected() {
        let file = ImageFile::new("notes.txt", b"hello".to_vec());
        assert_eq!(file.content_type(), "application/octet-stream");
    }
}
