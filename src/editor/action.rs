//! Editor actions.
//!
//! Every change to an [`EditorState`](crate::editor::state::EditorState) is
//! described by one [`Action`] and applied by
//! [`reduce`](crate::editor::state::reduce).

use serde::{Deserialize, Serialize};

use crate::page::model::{
    AnimationPreset, Breakpoint, BreakpointOverride, ColorScheme, Element, FieldName, Item, Page,
    Record, Section, StyleOverride, Typography,
};

/// Direction for single-step section moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Partial update of the page-level settings. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PagePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<ColorScheme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typography: Option<Typography>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smooth_scroll: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<AnimationPreset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design_width: Option<f64>,
}

impl PagePatch {
    pub fn is_empty(&self) -> bool {
        *self == PagePatch::default()
    }

    /// Builder: Set title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder: Set color scheme.
    pub fn with_color_scheme(mut self, color_scheme: ColorScheme) -> Self {
        self.color_scheme = Some(color_scheme);
        self
    }

    /// Builder: Set typography.
    pub fn with_typography(mut self, typography: Typography) -> Self {
        self.typography = Some(typography);
        self
    }

    pub(crate) fn apply(&self, page: &mut Page) {
        if let Some(title) = &self.title {
            page.title = title.clone();
        }
        if let Some(description) = &self.description {
            page.description = description.clone();
        }
        if let Some(color_scheme) = &self.color_scheme {
            page.color_scheme = color_scheme.clone();
        }
        if let Some(typography) = &self.typography {
            page.typography = typography.clone();
        }
        if let Some(smooth_scroll) = self.smooth_scroll {
            page.smooth_scroll = smooth_scroll;
        }
        if let Some(animation) = self.animation {
            page.animation = animation;
        }
        if self.design_width.is_some() {
            page.design_width = self.design_width;
        }
    }
}

/// A single editor command.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Selection (never recorded in history)
    SelectSection(Option<String>),
    SelectItem(Option<String>),
    SelectElement(Option<String>),
    ToggleElementSelection(String),
    ClearSelection,
    SetActiveBreakpoint(Breakpoint),

    // Page
    LoadPage(Page),
    UpdatePage(PagePatch),

    // Sections
    InsertSection {
        section: Section,
        index: Option<usize>,
    },
    UpdateSectionContent {
        section_id: String,
        patch: Record,
    },
    RemoveSection {
        section_id: String,
    },
    MoveSection {
        section_id: String,
        direction: Direction,
    },
    ReorderSections {
        from: usize,
        to: usize,
    },

    // Items
    AddItem {
        section_id: String,
        item: Item,
    },
    UpdateItem {
        section_id: String,
        item_id: String,
        patch: Record,
    },
    RemoveItem {
        section_id: String,
        item_id: String,
    },
    ReorderItems {
        section_id: String,
        from: usize,
        to: usize,
    },

    // Elements
    AddElement {
        section_id: String,
        element: Element,
    },
    /// Patch written at the active breakpoint.
    UpdateElement {
        section_id: String,
        element_id: String,
        patch: BreakpointOverride,
    },
    RemoveElement {
        section_id: String,
        element_id: String,
    },
    MoveElement {
        section_id: String,
        element_id: String,
        x: f64,
        y: f64,
    },
    ReorderElements {
        section_id: String,
        from: usize,
        to: usize,
    },

    // Style overrides
    SetStyleOverride {
        section_id: String,
        item_id: Option<String>,
        field: FieldName,
        style: StyleOverride,
    },
    ClearStyleOverride {
        section_id: String,
        item_id: Option<String>,
        field: FieldName,
    },

    // Breakpoint overrides
    SetBreakpointOverride {
        section_id: String,
        element_id: String,
        breakpoint: Breakpoint,
        patch: BreakpointOverride,
    },
    ClearBreakpointOverrides {
        section_id: String,
        element_id: String,
        breakpoint: Breakpoint,
    },
    ClearAllBreakpointOverrides {
        section_id: String,
        element_id: String,
    },

    // Groups
    CreateGroup {
        group_id: String,
        element_ids: Vec<String>,
    },
    Ungroup {
        group_id: String,
    },
    MoveGroup {
        group_id: String,
        dx: f64,
        dy: f64,
    },

    // History
    PushHistory,
    Undo,
    Redo,
}

impl Action {
    /// Short name used for logging and history labels.
    pub fn name(&self) -> &'static str {
        match self {
            Action::SelectSection(_) => "select_section",
            Action::SelectItem(_) => "select_item",
            Action::SelectElement(_) => "select_element",
            Action::ToggleElementSelection(_) => "toggle_element_selection",
            Action::ClearSelection => "clear_selection",
            Action::SetActiveBreakpoint(_) => "set_active_breakpoint",
            Action::LoadPage(_) => "load_page",
            Action::UpdatePage(_) => "update_page",
            Action::InsertSection { .. } => "insert_section",
            Action::UpdateSectionContent { .. } => "update_section_content",
            Action::RemoveSection { .. } => "remove_section",
            Action::MoveSection { .. } => "move_section",
            Action::ReorderSections { .. } => "reorder_sections",
            Action::AddItem { .. } => "add_item",
            Action::UpdateItem { .. } => "update_item",
            Action::RemoveItem { .. } => "remove_item",
            Action::ReorderItems { .. } => "reorder_items",
            Action::AddElement { .. } => "add_element",
            Action::UpdateElement { .. } => "update_element",
            Action::RemoveElement { .. } => "remove_element",
            Action::MoveElement { .. } => "move_element",
            Action::ReorderElements { .. } => "reorder_elements",
            Action::SetStyleOverride { .. } => "set_style_override",
            Action::ClearStyleOverride { .. } => "clear_style_override",
            Action::SetBreakpointOverride { .. } => "set_breakpoint_override",
            Action::ClearBreakpointOverrides { .. } => "clear_breakpoint_overrides",
            Action::ClearAllBreakpointOverrides { .. } => "clear_all_breakpoint_overrides",
            Action::CreateGroup { .. } => "create_group",
            Action::Ungroup { .. } => "ungroup",
            Action::MoveGroup { .. } => "move_group",
            Action::PushHistory => "push_history",
            Action::Undo => "undo",
            Action::Redo => "redo",
        }
    }

    /// True for actions that change the document. These are refused in
    /// published mode.
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            Action::SelectSection(_)
                | Action::SelectItem(_)
                | Action::SelectElement(_)
                | Action::ToggleElementSelection(_)
                | Action::ClearSelection
                | Action::SetActiveBreakpoint(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_is_not_mutating() {
        assert!(!Action::ClearSelection.is_mutating());
        assert!(!Action::SetActiveBreakpoint(Breakpoint::Mobile).is_mutating());
        assert!(Action::Undo.is_mutating());
        assert!(Action::RemoveSection {
            section_id: "s".to_string()
        }
        .is_mutating());
    }

    #[test]
    fn test_page_patch_apply() {
        let mut page = Page::new("Old");
        let patch = PagePatch {
            title: Some("New".to_string()),
            smooth_scroll: Some(false),
            ..Default::default()
        };
        patch.apply(&mut page);

        assert_eq!(page.title, "New");
        assert!(!page.smooth_scroll);
        assert_eq!(page.typography, Typography::default());
        assert!(PagePatch::default().is_empty());
    }

    #[test]
    fn test_page_patch_from_json() {
        let patch: PagePatch =
            serde_json::from_str(r#"{"title": "Hi", "animation": "dynamic"}"#).unwrap();
        assert_eq!(patch.title.as_deref(), Some("Hi"));
        assert_eq!(patch.animation, Some(AnimationPreset::Dynamic));
    }
}
