//! Media attachment: picked file bytes → self-contained data URL.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use dd_core::error::{EditorError, EditorResult};
use dd_core::model::{Media, MediaKind};

/// MIME type used when the platform reports none.
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// A file the user picked, already read into memory by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Encode into a [`Media`] payload. An empty file counts as unreadable.
    pub fn into_media(self, kind: MediaKind) -> EditorResult<Media> {
        if self.bytes.is_empty() {
            return Err(EditorError::FileRead {
                name: self.name,
                reason: "file is empty".to_string(),
            });
        }
        let mime = if self.mime.trim().is_empty() {
            FALLBACK_MIME
        } else {
            self.mime.trim()
        };
        log::debug!(
            "media: encoding {} {} ({} bytes, {mime})",
            kind.name(),
            self.name,
            self.bytes.len()
        );
        Ok(Media {
            src: data_url(mime, &self.bytes),
            file_name: self.name,
        })
    }
}

/// `data:{mime};base64,{payload}`.
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Whether `src` is a base64 data URL (as produced by [`data_url`]).
pub fn is_data_url(src: &str) -> bool {
    src.strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
        .is_some_and(|(meta, _)| meta.ends_with(";base64"))
}
