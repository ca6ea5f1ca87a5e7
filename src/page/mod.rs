//! Page document module.
//!
//! This module provides:
//! - `model`: Page / Section / Item / Element / group records
//! - `merge`: recursive record merge shared by overrides and patches
//! - `breakpoints`: effective element per viewport tier
//! - `styles`: four-layer text style resolution
//! - `groups`: group index kept in step with element back-references
//! - `templates`: starter pages and per-type default content

pub mod breakpoints;
pub mod groups;
pub mod merge;
pub mod model;
pub mod styles;
pub mod templates;

pub use breakpoints::{
    clear_all_breakpoint_overrides, clear_breakpoint_overrides, get_element_at_breakpoint,
    get_overridden_breakpoints, has_breakpoint_overrides, resolve_page_at_breakpoint,
    set_breakpoint_override,
};
pub use groups::GroupIndex;
pub use model::*;
pub use styles::{get_element_style_override, resolve_element_style, ResolvedStyle};
pub use templates::{default_element, default_section, Template};
