//! Pagesmith - document engine for a visual landing-page builder.
//!
//! A page is an ordered list of typed sections, each holding content, list
//! items and free-positioned canvas elements. The crate provides:
//!
//! - **Breakpoint overrides**: desktop is the base record; tablet and mobile
//!   store partial patches resolved on read
//! - **Style layering**: page defaults, section defaults, section and item
//!   overrides merged per text field
//! - **Grouping**: multi-element groups kept consistent with the elements'
//!   back-references
//! - **Undo/redo**: every edit goes through a reducer that snapshots the
//!   document first
//! - **Responsive scaling**: fluid sizes relative to a design width
//!
//! # Example
//!
//! ```rust
//! use pagesmith::{Breakpoint, BreakpointOverride, ElementType, PageEditor, SectionType};
//!
//! let mut editor = PageEditor::from_template("blank").unwrap();
//! let section = editor.add_section(SectionType::Hero, None).unwrap();
//! let button = editor.add_element(&section, ElementType::Button).unwrap();
//!
//! // Edits at mobile are stored as an override; desktop is untouched
//! editor.set_active_breakpoint(Breakpoint::Mobile);
//! editor.update_element(
//!     &section,
//!     &button,
//!     BreakpointOverride::default().with_content("text", "Go"),
//! );
//!
//! let mobile = editor
//!     .element_at_breakpoint(&section, &button, Breakpoint::Mobile)
//!     .unwrap();
//! assert_eq!(mobile.content["text"], "Go");
//!
//! editor.undo();
//! assert!(editor.can_redo());
//! ```

pub mod config;
pub mod error;
pub mod scaling;

// Document model and resolvers
pub mod page;

// Editing state, reducer and history
pub mod editor;

// Re-exports for convenience
pub use config::EditorConfig;
pub use editor::{Action, EditorState, PageEditor, Selection};
pub use error::{EditorError, EditorResult};
pub use page::{
    Breakpoint, BreakpointOverride, Element, ElementType, FieldName, GroupIndex, Item, Page,
    ResolvedStyle, Section, SectionType, StyleOverride, Template,
};

#[cfg(feature = "wasm")]
pub use editor::JsPageEditor;
