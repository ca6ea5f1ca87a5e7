//! Error types for the page document engine.
//!
//! Editing actions never surface these: they degrade to logged no-ops. Only the
//! fallible boundaries (JSON load/export, record patching, template lookup)
//! return an `EditorResult`.

use thiserror::Error;

/// Result type alias for fallible document operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors that can occur at the edges of the document engine.
#[derive(Error, Debug)]
pub enum EditorError {
    /// JSON (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Section not found in the page.
    #[error("Section not found: {0}")]
    SectionNotFound(String),

    /// Element not found in the page.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Item not found in the section.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// A patch did not have the shape of the record it was applied to.
    #[error("Invalid patch: {0}")]
    InvalidPatch(String),

    /// No built-in template with this name.
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    /// Breakpoint name not one of desktop/tablet/mobile.
    #[error("Invalid breakpoint: {0}")]
    InvalidBreakpoint(String),
}

impl EditorError {
    /// Creates a SectionNotFound error.
    pub fn section_not_found(id: impl Into<String>) -> Self {
        Self::SectionNotFound(id.into())
    }

    /// Creates an ElementNotFound error.
    pub fn element_not_found(id: impl Into<String>) -> Self {
        Self::ElementNotFound(id.into())
    }

    /// Creates an ItemNotFound error.
    pub fn item_not_found(id: impl Into<String>) -> Self {
        Self::ItemNotFound(id.into())
    }

    /// Creates an InvalidPatch error.
    pub fn invalid_patch(msg: impl Into<String>) -> Self {
        Self::InvalidPatch(msg.into())
    }

    /// Creates an UnknownTemplate error.
    pub fn unknown_template(name: impl Into<String>) -> Self {
        Self::UnknownTemplate(name.into())
    }

    /// Creates an InvalidBreakpoint error.
    pub fn invalid_breakpoint(name: impl Into<String>) -> Self {
        Self::InvalidBreakpoint(name.into())
    }
}
