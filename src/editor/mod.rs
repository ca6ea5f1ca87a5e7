//! Page editing module.
//!
//! This module provides:
//! - `action`: the closed set of editor commands
//! - `state`: `EditorState`, selection, and the `reduce` function
//! - `history`: bounded undo/redo snapshots
//! - `manager`: `PageEditor`, the facade that generates ids and dispatches
//! - `wasm`: WASM bindings for browser usage (JsPageEditor)

pub mod action;
pub mod history;
pub mod manager;
pub mod state;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use action::{Action, Direction, PagePatch};
pub use history::{History, HistoryEntry};
pub use manager::PageEditor;
pub use state::{reduce, EditorMode, EditorState, Selection};

#[cfg(feature = "wasm")]
pub use wasm::JsPageEditor;
