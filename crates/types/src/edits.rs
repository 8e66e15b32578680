//! Text edit type produced by formatting.

use crate::Range;
use serde::{Deserialize, Serialize};

/// A replacement of `range` by `new_text`, in editor coordinates.
///
/// An empty `new_text` is a deletion; an empty `range` is an insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    pub range: Range,
    pub new_text: String,
}

impl TextEdit {
    /// Create a new text edit that replaces a range with new text.
    #[must_use]
    pub fn new(range: Range, new_text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: new_text.into(),
        }
    }

    /// Returns `true` if this edit is a deletion (empty `new_text`).
    #[must_use]
    pub fn is_deletion(&self) -> bool {
        self.new_text.is_empty() && !self.range.is_empty()
    }

    /// Returns `true` if this edit is an insertion (zero-width range).
    #[must_use]
    pub fn is_insertion(&self) -> bool {
        self.range.is_empty() && !self.new_text.is_empty()
    }
}
