//! Editor session configuration.

use serde::{Deserialize, Serialize};

use crate::page::model::Breakpoint;
use crate::scaling::DEFAULT_DESIGN_WIDTH;

/// Default number of undo snapshots retained.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Settings for one editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Maximum number of history snapshots kept (at least 2).
    pub max_history: usize,
    /// Design width used when the page does not declare one.
    pub design_width: f64,
    /// Tier the session starts editing at.
    pub initial_breakpoint: Breakpoint,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            design_width: DEFAULT_DESIGN_WIDTH,
            initial_breakpoint: Breakpoint::Desktop,
        }
    }
}

impl EditorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: Set max history.
    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    /// Builder: Set design width.
    pub fn with_design_width(mut self, design_width: f64) -> Self {
        self.design_width = design_width;
        self
    }

    /// Builder: Set initial breakpoint.
    pub fn with_initial_breakpoint(mut self, breakpoint: Breakpoint) -> Self {
        self.initial_breakpoint = breakpoint;
        self
    }
}
