//! Editor state and the reducer that applies actions to it.
//!
//! ## Rules every handler follows
//!
//! 1. Validate first. Missing ids, empty patches and under-sized groups are
//!    logged no-ops that leave the state (history included) untouched.
//! 2. Checkpoint. A snapshot of page + group index is pushed to history
//!    immediately before the mutation.
//! 3. Mutate, repairing the group index and selection in the same step.
//!
//! In published mode every document-changing action is refused.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::EditorConfig;
use crate::editor::action::{Action, Direction, PagePatch};
use crate::editor::history::{History, HistoryEntry};
use crate::page::breakpoints::{remove_breakpoint_override, write_breakpoint_override};
use crate::page::groups::{GroupIndex, MIN_GROUP_SIZE};
use crate::page::merge::patch_record;
use crate::page::model::{
    clamp_percent, Breakpoint, BreakpointOverride, Element, FieldName, Item, Page, PositionPatch,
    Record, Section, StyleOverride,
};

// =============================================================================
// SELECTION / MODE
// =============================================================================

/// Whether the document can be edited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    #[default]
    Editing,
    /// Read-only rendering of the same document.
    Published,
}

/// What the user currently has selected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Selection {
    pub section_id: Option<String>,
    pub item_id: Option<String>,
    /// Selected canvas elements in click order; multi-select is a toggle.
    pub element_ids: Vec<String>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.section_id.is_none() && self.item_id.is_none() && self.element_ids.is_empty()
    }

    /// Most recently selected element.
    pub fn primary_element(&self) -> Option<&str> {
        self.element_ids.last().map(String::as_str)
    }

    /// Drops ids that no longer exist on the page.
    pub fn retain_existing(&mut self, page: &Page) {
        let section = self.section_id.as_deref().and_then(|id| page.section(id));
        if section.is_none() {
            self.section_id = None;
        }
        let item_exists = match (section, self.item_id.as_deref()) {
            (Some(section), Some(item_id)) => section.item(item_id).is_some(),
            _ => false,
        };
        if !item_exists {
            self.item_id = None;
        }
        self.element_ids.retain(|id| page.find_element(id).is_some());
    }
}

// =============================================================================
// EDITOR STATE
// =============================================================================

/// Everything one editing session owns.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub page: Page,
    pub groups: GroupIndex,
    pub selection: Selection,
    /// Tier that element edits are written to.
    pub active_breakpoint: Breakpoint,
    pub mode: EditorMode,
    pub history: History,
    /// Fallback when the page does not declare a design width.
    pub design_width: f64,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::with_config(Page::default(), &EditorConfig::default())
    }
}

impl EditorState {
    /// Creates an editing session for `page` with default settings.
    pub fn new(page: Page) -> Self {
        Self::with_config(page, &EditorConfig::default())
    }

    /// Creates an editing session; the group index is rebuilt from the page.
    pub fn with_config(mut page: Page, config: &EditorConfig) -> Self {
        let groups = GroupIndex::rebuild_from_page(&mut page);
        Self {
            page,
            groups,
            selection: Selection::default(),
            active_breakpoint: config.initial_breakpoint,
            mode: EditorMode::Editing,
            history: History::with_max_entries(config.max_history),
            design_width: config.design_width,
        }
    }

    /// Creates a read-only session.
    pub fn published(page: Page) -> Self {
        let mut state = Self::new(page);
        state.mode = EditorMode::Published;
        state
    }

    pub fn is_read_only(&self) -> bool {
        self.mode == EditorMode::Published
    }

    /// Design width of the page, falling back to the session default.
    pub fn effective_design_width(&self) -> f64 {
        self.page.design_width.unwrap_or(self.design_width)
    }

    /// Applies `action` in place. Returns false when it was a no-op.
    pub fn apply(&mut self, action: Action) -> bool {
        let name = action.name();
        if self.is_read_only() && action.is_mutating() {
            debug!(action = name, "refused in published mode");
            return false;
        }

        let applied = match action {
            Action::SelectSection(id) => self.select_section(id),
            Action::SelectItem(id) => self.select_item(id),
            Action::SelectElement(id) => self.select_element(id),
            Action::ToggleElementSelection(id) => self.toggle_element_selection(id),
            Action::ClearSelection => {
                self.selection = Selection::default();
                true
            }
            Action::SetActiveBreakpoint(tier) => {
                self.active_breakpoint = tier;
                true
            }
            Action::LoadPage(page) => self.load_page(page),
            Action::UpdatePage(patch) => self.update_page(&patch, name),
            Action::InsertSection { section, index } => self.insert_section(section, index, name),
            Action::UpdateSectionContent { section_id, patch } => {
                self.update_section_content(&section_id, &patch, name)
            }
            Action::RemoveSection { section_id } => self.remove_section(&section_id, name),
            Action::MoveSection {
                section_id,
                direction,
            } => self.move_section(&section_id, direction, name),
            Action::ReorderSections { from, to } => {
                if !can_reorder(self.page.sections.len(), from, to) {
                    false
                } else {
                    self.checkpoint(name);
                    reorder(&mut self.page.sections, from, to);
                    true
                }
            }
            Action::AddItem { section_id, item } => self.add_item(&section_id, item, name),
            Action::UpdateItem {
                section_id,
                item_id,
                patch,
            } => self.update_item(&section_id, &item_id, &patch, name),
            Action::RemoveItem {
                section_id,
                item_id,
            } => self.remove_item(&section_id, &item_id, name),
            Action::ReorderItems {
                section_id,
                from,
                to,
            } => self.reorder_in_section(&section_id, name, |s| &mut s.items, from, to),
            Action::AddElement {
                section_id,
                element,
            } => self.add_element(&section_id, element, name),
            Action::UpdateElement {
                section_id,
                element_id,
                patch,
            } => {
                let tier = self.active_breakpoint;
                self.write_element_override(&section_id, &element_id, tier, patch, name)
            }
            Action::RemoveElement {
                section_id,
                element_id,
            } => self.remove_element(&section_id, &element_id, name),
            Action::MoveElement {
                section_id,
                element_id,
                x,
                y,
            } => {
                let tier = self.active_breakpoint;
                let patch = BreakpointOverride::default().with_position(PositionPatch::xy(x, y));
                self.write_element_override(&section_id, &element_id, tier, patch, name)
            }
            Action::ReorderElements {
                section_id,
                from,
                to,
            } => self.reorder_in_section(&section_id, name, |s| &mut s.elements, from, to),
            Action::SetStyleOverride {
                section_id,
                item_id,
                field,
                style,
            } => self.set_style_override(&section_id, item_id.as_deref(), field, &style, name),
            Action::ClearStyleOverride {
                section_id,
                item_id,
                field,
            } => self.clear_style_override(&section_id, item_id.as_deref(), &field, name),
            Action::SetBreakpointOverride {
                section_id,
                element_id,
                breakpoint,
                patch,
            } => self.write_element_override(&section_id, &element_id, breakpoint, patch, name),
            Action::ClearBreakpointOverrides {
                section_id,
                element_id,
                breakpoint,
            } => self.clear_breakpoint_overrides(&section_id, &element_id, breakpoint, name),
            Action::ClearAllBreakpointOverrides {
                section_id,
                element_id,
            } => self.clear_all_breakpoint_overrides(&section_id, &element_id, name),
            Action::CreateGroup {
                group_id,
                element_ids,
            } => self.create_group(group_id, &element_ids, name),
            Action::Ungroup { group_id } => {
                if !self.groups.contains(&group_id) {
                    false
                } else {
                    self.checkpoint(name);
                    self.groups.ungroup(&mut self.page, &group_id)
                }
            }
            Action::MoveGroup { group_id, dx, dy } => self.move_group(&group_id, dx, dy, name),
            Action::PushHistory => {
                self.checkpoint(name);
                true
            }
            Action::Undo => self.undo(),
            Action::Redo => self.redo(),
        };

        if !applied {
            debug!(action = name, "action was a no-op");
        }
        applied
    }

    /// Pushes a snapshot of the live document.
    fn checkpoint(&mut self, label: &'static str) {
        self.history
            .push(HistoryEntry::capture(&self.page, &self.groups, label));
    }

    // =========================================================================
    // SELECTION
    // =========================================================================

    fn select_section(&mut self, id: Option<String>) -> bool {
        if let Some(id) = id.as_deref() {
            if self.page.section(id).is_none() {
                return false;
            }
        }
        self.selection = Selection {
            section_id: id,
            ..Default::default()
        };
        true
    }

    fn select_item(&mut self, id: Option<String>) -> bool {
        if let Some(item_id) = id.as_deref() {
            let in_selected_section = self
                .selection
                .section_id
                .as_deref()
                .and_then(|sid| self.page.section(sid))
                .is_some_and(|s| s.item(item_id).is_some());
            if !in_selected_section {
                return false;
            }
        }
        self.selection.item_id = id;
        true
    }

    fn select_element(&mut self, id: Option<String>) -> bool {
        let Some(element_id) = id else {
            self.selection.element_ids.clear();
            return true;
        };
        let Some(section) = self
            .page
            .sections
            .iter()
            .find(|s| s.element(&element_id).is_some())
        else {
            return false;
        };
        if self.selection.section_id.as_deref() != Some(section.id.as_str()) {
            self.selection.section_id = Some(section.id.clone());
            self.selection.item_id = None;
        }
        self.selection.element_ids = vec![element_id];
        true
    }

    fn toggle_element_selection(&mut self, element_id: String) -> bool {
        if let Some(pos) = self
            .selection
            .element_ids
            .iter()
            .position(|id| *id == element_id)
        {
            self.selection.element_ids.remove(pos);
            return true;
        }
        if self.page.find_element(&element_id).is_none() {
            return false;
        }
        self.selection.element_ids.push(element_id);
        true
    }

    // =========================================================================
    // PAGE
    // =========================================================================

    /// Replaces the document. History and selection start over.
    fn load_page(&mut self, mut page: Page) -> bool {
        self.groups = GroupIndex::rebuild_from_page(&mut page);
        self.page = page;
        self.selection = Selection::default();
        self.history.clear();
        true
    }

    fn update_page(&mut self, patch: &PagePatch, label: &'static str) -> bool {
        if patch.is_empty() {
            return false;
        }
        self.checkpoint(label);
        patch.apply(&mut self.page);
        true
    }

    // =========================================================================
    // SECTIONS
    // =========================================================================

    fn insert_section(
        &mut self,
        mut section: Section,
        index: Option<usize>,
        label: &'static str,
    ) -> bool {
        if self.page.section(&section.id).is_some() {
            debug!(section = %section.id, "section id already present");
            return false;
        }
        if let Some(element) = section
            .elements
            .iter()
            .find(|e| self.page.find_element(&e.id).is_some())
        {
            debug!(element = %element.id, "element id already present");
            return false;
        }
        if has_duplicates(section.elements.iter().map(|e| e.id.as_str()))
            || has_duplicates(section.items.iter().map(|i| i.id.as_str()))
        {
            debug!(section = %section.id, "section repeats an item or element id");
            return false;
        }
        // Group membership never survives insertion.
        for element in &mut section.elements {
            element.group_id = None;
            element.normalize_overrides();
        }
        let len = self.page.sections.len();
        let index = index.unwrap_or(len).min(len);

        self.checkpoint(label);
        self.page.sections.insert(index, section);
        true
    }

    fn update_section_content(
        &mut self,
        section_id: &str,
        patch: &Record,
        label: &'static str,
    ) -> bool {
        if patch.is_empty() {
            return false;
        }
        let Some(section) = self.page.section(section_id) else {
            return false;
        };
        let content = match patch_record(&section.content, patch) {
            Ok(content) => content,
            Err(err) => {
                warn!(section = %section_id, error = %err, "section content patch rejected");
                return false;
            }
        };

        self.checkpoint(label);
        if let Some(section) = self.page.section_mut(section_id) {
            section.content = content;
        }
        true
    }

    fn remove_section(&mut self, section_id: &str, label: &'static str) -> bool {
        let Some(index) = self.page.section_index(section_id) else {
            return false;
        };

        self.checkpoint(label);
        let removed = self.page.sections.remove(index);
        for element in &removed.elements {
            self.groups.release_member(&mut self.page, &element.id);
        }
        self.selection.retain_existing(&self.page);
        true
    }

    fn move_section(&mut self, section_id: &str, direction: Direction, label: &'static str) -> bool {
        let Some(index) = self.page.section_index(section_id) else {
            return false;
        };
        let target = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => Some(index + 1).filter(|t| *t < self.page.sections.len()),
        };
        let Some(target) = target else {
            return false;
        };

        self.checkpoint(label);
        self.page.sections.swap(index, target);
        true
    }

    // =========================================================================
    // ITEMS
    // =========================================================================

    fn add_item(&mut self, section_id: &str, item: Item, label: &'static str) -> bool {
        let Some(section) = self.page.section(section_id) else {
            return false;
        };
        if section.item(&item.id).is_some() {
            return false;
        }

        self.checkpoint(label);
        if let Some(section) = self.page.section_mut(section_id) {
            section.items.push(item);
        }
        true
    }

    fn update_item(
        &mut self,
        section_id: &str,
        item_id: &str,
        patch: &Record,
        label: &'static str,
    ) -> bool {
        if patch.is_empty() {
            return false;
        }
        let Some(item) = self.page.section(section_id).and_then(|s| s.item(item_id)) else {
            return false;
        };
        let mut updated = match patch_record(item, patch) {
            Ok(updated) => updated,
            Err(err) => {
                warn!(item = %item_id, error = %err, "item patch rejected");
                return false;
            }
        };
        updated.id = item_id.to_string();

        self.checkpoint(label);
        if let Some(item) = self
            .page
            .section_mut(section_id)
            .and_then(|s| s.item_mut(item_id))
        {
            *item = updated;
        }
        true
    }

    fn remove_item(&mut self, section_id: &str, item_id: &str, label: &'static str) -> bool {
        let exists = self
            .page
            .section(section_id)
            .is_some_and(|s| s.item(item_id).is_some());
        if !exists {
            return false;
        }

        self.checkpoint(label);
        if let Some(section) = self.page.section_mut(section_id) {
            section.items.retain(|i| i.id != item_id);
        }
        self.selection.retain_existing(&self.page);
        true
    }

    fn reorder_in_section<T>(
        &mut self,
        section_id: &str,
        label: &'static str,
        list: impl Fn(&mut Section) -> &mut Vec<T>,
        from: usize,
        to: usize,
    ) -> bool {
        let Some(index) = self.page.section_index(section_id) else {
            return false;
        };
        if !can_reorder(list(&mut self.page.sections[index]).len(), from, to) {
            return false;
        }

        self.checkpoint(label);
        reorder(list(&mut self.page.sections[index]), from, to);
        true
    }

    // =========================================================================
    // ELEMENTS
    // =========================================================================

    fn add_element(&mut self, section_id: &str, mut element: Element, label: &'static str) -> bool {
        if self.page.section(section_id).is_none() {
            return false;
        }
        if self.page.find_element(&element.id).is_some() {
            debug!(element = %element.id, "element id already present");
            return false;
        }
        element.group_id = None;
        element.position.x = clamp_percent(element.position.x);
        element.position.y = clamp_percent(element.position.y);
        element.normalize_overrides();

        self.checkpoint(label);
        if let Some(section) = self.page.section_mut(section_id) {
            section.elements.push(element);
        }
        true
    }

    /// Writes `patch` to the element at `tier`; desktop edits the base record.
    fn write_element_override(
        &mut self,
        section_id: &str,
        element_id: &str,
        tier: Breakpoint,
        mut patch: BreakpointOverride,
        label: &'static str,
    ) -> bool {
        if patch.is_empty() || self.page.element_in(section_id, element_id).is_err() {
            return false;
        }
        if let Some(position) = patch.position.as_mut() {
            position.x = position.x.map(clamp_percent);
            position.y = position.y.map(clamp_percent);
        }

        self.checkpoint(label);
        if let Some(element) = self.element_mut(section_id, element_id) {
            write_breakpoint_override(element, tier, &patch);
        }
        if tier.is_base() && patch.position.is_some() {
            self.groups.refresh_bounds_of(&self.page, element_id);
        }
        true
    }

    fn remove_element(&mut self, section_id: &str, element_id: &str, label: &'static str) -> bool {
        if self.page.element_in(section_id, element_id).is_err() {
            return false;
        }

        self.checkpoint(label);
        if let Some(section) = self.page.section_mut(section_id) {
            section.elements.retain(|e| e.id != element_id);
        }
        self.groups.release_member(&mut self.page, element_id);
        self.selection.retain_existing(&self.page);
        true
    }

    fn clear_breakpoint_overrides(
        &mut self,
        section_id: &str,
        element_id: &str,
        tier: Breakpoint,
        label: &'static str,
    ) -> bool {
        if tier.is_base() {
            debug!(element = %element_id, "desktop overrides cannot be cleared");
            return false;
        }
        let has_override = self
            .page
            .element_in(section_id, element_id)
            .is_ok_and(|e| e.breakpoint_override(tier).is_some());
        if !has_override {
            return false;
        }

        self.checkpoint(label);
        self.element_mut(section_id, element_id)
            .is_some_and(|element| remove_breakpoint_override(element, tier))
    }

    fn clear_all_breakpoint_overrides(
        &mut self,
        section_id: &str,
        element_id: &str,
        label: &'static str,
    ) -> bool {
        let has_overrides = self
            .page
            .element_in(section_id, element_id)
            .is_ok_and(|e| e.breakpoint_overrides.is_some());
        if !has_overrides {
            return false;
        }

        self.checkpoint(label);
        if let Some(element) = self.element_mut(section_id, element_id) {
            element.breakpoint_overrides = None;
        }
        true
    }

    fn element_mut(&mut self, section_id: &str, element_id: &str) -> Option<&mut Element> {
        self.page.section_mut(section_id)?.element_mut(element_id)
    }

    // =========================================================================
    // STYLE OVERRIDES
    // =========================================================================

    fn set_style_override(
        &mut self,
        section_id: &str,
        item_id: Option<&str>,
        field: FieldName,
        style: &StyleOverride,
        label: &'static str,
    ) -> bool {
        if style.is_empty() || !self.style_target_exists(section_id, item_id) {
            return false;
        }

        self.checkpoint(label);
        match self.style_overrides_mut(section_id, item_id) {
            Some(overrides) => {
                overrides.entry(field).or_default().merge(style);
                true
            }
            None => false,
        }
    }

    fn clear_style_override(
        &mut self,
        section_id: &str,
        item_id: Option<&str>,
        field: &FieldName,
        label: &'static str,
    ) -> bool {
        let Some(section) = self.page.section(section_id) else {
            return false;
        };
        let present = match item_id {
            Some(item_id) => section
                .item(item_id)
                .is_some_and(|i| i.style_overrides.contains_key(field)),
            None => section.content.element_styles.contains_key(field),
        };
        if !present {
            return false;
        }

        self.checkpoint(label);
        self.style_overrides_mut(section_id, item_id)
            .is_some_and(|overrides| overrides.remove(field).is_some())
    }

    fn style_target_exists(&self, section_id: &str, item_id: Option<&str>) -> bool {
        match (self.page.section(section_id), item_id) {
            (Some(section), Some(item_id)) => section.item(item_id).is_some(),
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    fn style_overrides_mut(
        &mut self,
        section_id: &str,
        item_id: Option<&str>,
    ) -> Option<&mut BTreeMap<FieldName, StyleOverride>> {
        let section = self.page.section_mut(section_id)?;
        match item_id {
            Some(item_id) => Some(&mut section.item_mut(item_id)?.style_overrides),
            None => Some(&mut section.content.element_styles),
        }
    }

    // =========================================================================
    // GROUPS
    // =========================================================================

    fn create_group(&mut self, group_id: String, element_ids: &[String], label: &'static str) -> bool {
        if self.groups.contains(&group_id) {
            return false;
        }
        if GroupIndex::groupable_ids(&self.page, element_ids).len() < MIN_GROUP_SIZE {
            debug!(requested = element_ids.len(), "grouping needs two existing elements");
            return false;
        }

        self.checkpoint(label);
        self.groups
            .create_group(&mut self.page, group_id, element_ids)
            .is_some()
    }

    fn move_group(&mut self, group_id: &str, dx: f64, dy: f64, label: &'static str) -> bool {
        if !self.groups.contains(group_id) || (dx == 0.0 && dy == 0.0) {
            return false;
        }

        self.checkpoint(label);
        let tier = self.active_breakpoint;
        self.groups.move_group(&mut self.page, group_id, dx, dy, tier)
    }

    // =========================================================================
    // HISTORY
    // =========================================================================

    fn undo(&mut self) -> bool {
        let Self {
            page,
            groups,
            history,
            ..
        } = self;
        let Some(entry) = history.undo(|| HistoryEntry::capture(page, groups, "undo")) else {
            return false;
        };
        self.restore(entry);
        true
    }

    fn redo(&mut self) -> bool {
        let Some(entry) = self.history.redo() else {
            return false;
        };
        self.restore(entry);
        true
    }

    fn restore(&mut self, entry: HistoryEntry) {
        self.page = entry.page;
        self.groups = entry.groups;
        self.selection.retain_existing(&self.page);
    }
}

/// Applies `action` to `state` and returns the next state.
pub fn reduce(mut state: EditorState, action: Action) -> EditorState {
    state.apply(action);
    state
}

fn has_duplicates<'a>(mut ids: impl Iterator<Item = &'a str>) -> bool {
    let mut seen = BTreeSet::new();
    !ids.all(|id| seen.insert(id))
}

fn can_reorder(len: usize, from: usize, to: usize) -> bool {
    from < len && to < len && from != to
}

fn reorder<T>(list: &mut Vec<T>, from: usize, to: usize) {
    let moved = list.remove(from);
    list.insert(to, moved);
}

// =============================================================================
// TESTS
// =============================================================================
