//! Error types for editor operations.

use crate::id::ElementId;
use thiserror::Error;

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors that can occur while editing the canvas.
///
/// None of these are fatal: callers degrade to "no change" and may notify the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    /// Element not found in the store.
    #[error("element not found: {0}")]
    ElementNotFound(ElementId),

    /// An action that targets the selection ran with nothing selected.
    #[error("no element is selected")]
    NothingSelected,

    /// A text-only style was applied to an image or video block.
    #[error("element {0} is not a text block")]
    NotTextElement(ElementId),

    /// Font size outside the offered set.
    #[error("font size {0}px is not offered")]
    UnsupportedFontSize(u32),

    /// Color value that cannot be embedded in an inline style.
    #[error("invalid color value: {0:?}")]
    InvalidColor(String),

    /// A picked file could not be read.
    #[error("could not read file {name:?}: {reason}")]
    FileRead { name: String, reason: String },
}
