//! PageEditor: the public editing facade.
//!
//! `PageEditor` owns an [`EditorState`] and turns method calls into
//! [`Action`]s. It is the only place ids are generated, so the reducer itself
//! stays deterministic. Methods that create something return the new id, or
//! `None` when the call was a no-op.

use tracing::debug;

use crate::config::EditorConfig;
use crate::editor::action::{Action, Direction, PagePatch};
use crate::editor::history::History;
use crate::editor::state::{reduce, EditorMode, EditorState, Selection};
use crate::error::{EditorError, EditorResult};
use crate::page::breakpoints::{
    get_element_at_breakpoint, get_overridden_breakpoints, resolve_page_at_breakpoint,
};
use crate::page::groups::GroupIndex;
use crate::page::model::{
    clamp_percent, new_id, Breakpoint, BreakpointOverride, Element, ElementType, FieldName, Item,
    Page, Position, Record, Section, SectionType, StyleOverride,
};
use crate::page::styles::{get_element_style_override, resolve_element_style, ResolvedStyle};
use crate::page::templates::{default_element, default_section, instantiate_template};

/// Offset applied to a duplicated element so it does not sit exactly on top
/// of the original.
const DUPLICATE_OFFSET: f64 = 2.0;

/// Editing session over one page.
#[derive(Debug, Clone, Default)]
pub struct PageEditor {
    state: EditorState,
}

impl PageEditor {
    // =========================================================================
    // INITIALIZATION
    // =========================================================================

    /// Opens `page` for editing with default settings.
    pub fn new(page: Page) -> Self {
        Self {
            state: EditorState::new(page),
        }
    }

    /// Opens `page` for editing with custom settings.
    pub fn with_config(page: Page, config: &EditorConfig) -> Self {
        Self {
            state: EditorState::with_config(page, config),
        }
    }

    /// Starts a session from a built-in template (`blank`, `landing`, ...).
    pub fn from_template(name: &str) -> EditorResult<Self> {
        Ok(Self::new(instantiate_template(name)?))
    }

    /// Opens `page` read-only. Every mutating method becomes a no-op.
    pub fn published(page: Page) -> Self {
        Self {
            state: EditorState::published(page),
        }
    }

    /// Parses a page from JSON and opens it for editing.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        Ok(Self::new(Page::from_json(json)?))
    }

    /// Serializes the current page.
    pub fn to_json(&self) -> EditorResult<String> {
        self.state.page.to_json_pretty()
    }

    /// Consumes the editor and returns the page.
    pub fn into_page(self) -> Page {
        self.state.page
    }

    /// Runs an action through the reducer. Returns false for no-ops.
    pub fn dispatch(&mut self, action: Action) -> bool {
        self.state.apply(action)
    }

    /// Runs an action through the by-value reducer.
    pub fn dispatch_owned(&mut self, action: Action) {
        self.state = reduce(std::mem::take(&mut self.state), action);
    }

    // =========================================================================
    // STATE ACCESS
    // =========================================================================

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn page(&self) -> &Page {
        &self.state.page
    }

    pub fn groups(&self) -> &GroupIndex {
        &self.state.groups
    }

    pub fn selection(&self) -> &Selection {
        &self.state.selection
    }

    pub fn history(&self) -> &History {
        &self.state.history
    }

    pub fn active_breakpoint(&self) -> Breakpoint {
        self.state.active_breakpoint
    }

    pub fn mode(&self) -> EditorMode {
        self.state.mode
    }

    pub fn is_read_only(&self) -> bool {
        self.state.is_read_only()
    }

    pub fn design_width(&self) -> f64 {
        self.state.effective_design_width()
    }

    /// Effective element at `tier`.
    pub fn element_at_breakpoint(
        &self,
        section_id: &str,
        element_id: &str,
        tier: Breakpoint,
    ) -> EditorResult<Element> {
        let element = self.state.page.element_in(section_id, element_id)?;
        Ok(get_element_at_breakpoint(element, tier).into_owned())
    }

    /// Override tiers the element carries patches for.
    pub fn overridden_breakpoints(
        &self,
        section_id: &str,
        element_id: &str,
    ) -> EditorResult<Vec<Breakpoint>> {
        let element = self.state.page.element_in(section_id, element_id)?;
        Ok(get_overridden_breakpoints(element))
    }

    /// The whole page collapsed to `tier`.
    pub fn resolved_page(&self, tier: Breakpoint) -> Page {
        resolve_page_at_breakpoint(&self.state.page, tier)
    }

    /// Final style of `field`, optionally for one item.
    pub fn resolve_style(
        &self,
        section_id: &str,
        field: &FieldName,
        item_id: Option<&str>,
    ) -> EditorResult<ResolvedStyle> {
        let (section, item) = self.style_target(section_id, item_id)?;
        Ok(resolve_element_style(&self.state.page, section, field, item))
    }

    /// Override record shown in the style panel for `field`.
    pub fn style_override(
        &self,
        section_id: &str,
        field: &FieldName,
        item_id: Option<&str>,
    ) -> EditorResult<StyleOverride> {
        let (section, item) = self.style_target(section_id, item_id)?;
        Ok(get_element_style_override(section, field, item))
    }

    fn style_target(
        &self,
        section_id: &str,
        item_id: Option<&str>,
    ) -> EditorResult<(&Section, Option<&Item>)> {
        let section = self
            .state
            .page
            .section(section_id)
            .ok_or_else(|| EditorError::section_not_found(section_id))?;
        let item = match item_id {
            Some(id) => Some(
                section
                    .item(id)
                    .ok_or_else(|| EditorError::item_not_found(id))?,
            ),
            None => None,
        };
        Ok((section, item))
    }

    // =========================================================================
    // SELECTION
    // =========================================================================

    pub fn select_section(&mut self, section_id: Option<&str>) -> bool {
        self.dispatch(Action::SelectSection(section_id.map(str::to_string)))
    }

    pub fn select_item(&mut self, item_id: Option<&str>) -> bool {
        self.dispatch(Action::SelectItem(item_id.map(str::to_string)))
    }

    pub fn select_element(&mut self, element_id: Option<&str>) -> bool {
        self.dispatch(Action::SelectElement(element_id.map(str::to_string)))
    }

    /// Adds or removes an element from the multi-selection.
    pub fn toggle_element_selection(&mut self, element_id: &str) -> bool {
        self.dispatch(Action::ToggleElementSelection(element_id.to_string()))
    }

    pub fn clear_selection(&mut self) -> bool {
        self.dispatch(Action::ClearSelection)
    }

    /// Switches the tier that element edits are written to.
    pub fn set_active_breakpoint(&mut self, tier: Breakpoint) -> bool {
        self.dispatch(Action::SetActiveBreakpoint(tier))
    }

    // =========================================================================
    // PAGE
    // =========================================================================

    /// Replaces the document; history and selection start over.
    pub fn load_page(&mut self, page: Page) -> bool {
        self.dispatch(Action::LoadPage(page))
    }

    pub fn update_page(&mut self, patch: PagePatch) -> bool {
        self.dispatch(Action::UpdatePage(patch))
    }

    // =========================================================================
    // SECTIONS
    // =========================================================================

    /// Adds a section of `section_type` with starter content. Appends when
    /// `index` is `None`.
    pub fn add_section(&mut self, section_type: SectionType, index: Option<usize>) -> Option<String> {
        self.insert_section(default_section(section_type), index)
    }

    /// Inserts a prepared section and selects it.
    pub fn insert_section(&mut self, section: Section, index: Option<usize>) -> Option<String> {
        let id = section.id.clone();
        if !self.dispatch(Action::InsertSection { section, index }) {
            return None;
        }
        self.dispatch(Action::SelectSection(Some(id.clone())));
        Some(id)
    }

    /// Copies a section, with fresh ids, directly after the original.
    pub fn duplicate_section(&mut self, section_id: &str) -> Option<String> {
        let index = self.state.page.section_index(section_id)?;
        let copy = self.state.page.sections[index].duplicate_with_fresh_ids();
        self.insert_section(copy, Some(index + 1))
    }

    /// Merges `patch` into the section content; `null` clears a field.
    pub fn update_section_content(&mut self, section_id: &str, patch: Record) -> bool {
        self.dispatch(Action::UpdateSectionContent {
            section_id: section_id.to_string(),
            patch,
        })
    }

    pub fn remove_section(&mut self, section_id: &str) -> bool {
        self.dispatch(Action::RemoveSection {
            section_id: section_id.to_string(),
        })
    }

    pub fn move_section(&mut self, section_id: &str, direction: Direction) -> bool {
        self.dispatch(Action::MoveSection {
            section_id: section_id.to_string(),
            direction,
        })
    }

    pub fn reorder_sections(&mut self, from: usize, to: usize) -> bool {
        self.dispatch(Action::ReorderSections { from, to })
    }

    // =========================================================================
    // ITEMS
    // =========================================================================

    /// Appends a blank item to the section.
    pub fn add_item(&mut self, section_id: &str) -> Option<String> {
        let item = Item::new(new_id("item")).with_title("New item");
        self.insert_item(section_id, item)
    }

    /// Appends a prepared item.
    pub fn insert_item(&mut self, section_id: &str, item: Item) -> Option<String> {
        let id = item.id.clone();
        self.dispatch(Action::AddItem {
            section_id: section_id.to_string(),
            item,
        })
        .then_some(id)
    }

    /// Merges `patch` into the item. The id cannot be changed.
    pub fn update_item(&mut self, section_id: &str, item_id: &str, patch: Record) -> bool {
        self.dispatch(Action::UpdateItem {
            section_id: section_id.to_string(),
            item_id: item_id.to_string(),
            patch,
        })
    }

    pub fn remove_item(&mut self, section_id: &str, item_id: &str) -> bool {
        self.dispatch(Action::RemoveItem {
            section_id: section_id.to_string(),
            item_id: item_id.to_string(),
        })
    }

    pub fn reorder_items(&mut self, section_id: &str, from: usize, to: usize) -> bool {
        self.dispatch(Action::ReorderItems {
            section_id: section_id.to_string(),
            from,
            to,
        })
    }

    // =========================================================================
    // ELEMENTS
    // =========================================================================

    /// Adds an element of `element_type` with starter content and selects it.
    pub fn add_element(&mut self, section_id: &str, element_type: ElementType) -> Option<String> {
        self.insert_element(section_id, default_element(element_type))
    }

    /// Adds a prepared element and selects it. Group membership is dropped.
    pub fn insert_element(&mut self, section_id: &str, element: Element) -> Option<String> {
        let id = element.id.clone();
        if !self.dispatch(Action::AddElement {
            section_id: section_id.to_string(),
            element,
        }) {
            return None;
        }
        self.dispatch(Action::SelectElement(Some(id.clone())));
        Some(id)
    }

    /// Copies an element, slightly offset, into the same section.
    pub fn duplicate_element(&mut self, section_id: &str, element_id: &str) -> Option<String> {
        let Ok(original) = self.state.page.element_in(section_id, element_id) else {
            debug!(element = %element_id, "duplicate of missing element");
            return None;
        };
        let mut copy = original.clone();
        copy.id = new_id("element");
        copy.group_id = None;
        copy.position = Position {
            x: clamp_percent(original.position.x + DUPLICATE_OFFSET),
            y: clamp_percent(original.position.y + DUPLICATE_OFFSET),
            ..original.position
        };
        self.insert_element(section_id, copy)
    }

    /// Patches the element at the active breakpoint.
    pub fn update_element(
        &mut self,
        section_id: &str,
        element_id: &str,
        patch: BreakpointOverride,
    ) -> bool {
        self.dispatch(Action::UpdateElement {
            section_id: section_id.to_string(),
            element_id: element_id.to_string(),
            patch,
        })
    }

    pub fn remove_element(&mut self, section_id: &str, element_id: &str) -> bool {
        self.dispatch(Action::RemoveElement {
            section_id: section_id.to_string(),
            element_id: element_id.to_string(),
        })
    }

    /// Moves the element at the active breakpoint; coordinates are clamped.
    pub fn move_element(&mut self, section_id: &str, element_id: &str, x: f64, y: f64) -> bool {
        self.dispatch(Action::MoveElement {
            section_id: section_id.to_string(),
            element_id: element_id.to_string(),
            x,
            y,
        })
    }

    pub fn reorder_elements(&mut self, section_id: &str, from: usize, to: usize) -> bool {
        self.dispatch(Action::ReorderElements {
            section_id: section_id.to_string(),
            from,
            to,
        })
    }

    // =========================================================================
    // STYLE OVERRIDES
    // =========================================================================

    /// Merges `style` into the section-level (or item-level) override for
    /// `field`.
    pub fn set_style_override(
        &mut self,
        section_id: &str,
        item_id: Option<&str>,
        field: FieldName,
        style: StyleOverride,
    ) -> bool {
        self.dispatch(Action::SetStyleOverride {
            section_id: section_id.to_string(),
            item_id: item_id.map(str::to_string),
            field,
            style,
        })
    }

    pub fn clear_style_override(
        &mut self,
        section_id: &str,
        item_id: Option<&str>,
        field: FieldName,
    ) -> bool {
        self.dispatch(Action::ClearStyleOverride {
            section_id: section_id.to_string(),
            item_id: item_id.map(str::to_string),
            field,
        })
    }

    // =========================================================================
    // BREAKPOINT OVERRIDES
    // =========================================================================

    /// Writes `patch` at an explicit tier regardless of the active one.
    pub fn set_breakpoint_override(
        &mut self,
        section_id: &str,
        element_id: &str,
        tier: Breakpoint,
        patch: BreakpointOverride,
    ) -> bool {
        self.dispatch(Action::SetBreakpointOverride {
            section_id: section_id.to_string(),
            element_id: element_id.to_string(),
            breakpoint: tier,
            patch,
        })
    }

    /// Drops one tier's override. Desktop is a no-op.
    pub fn clear_breakpoint_overrides(
        &mut self,
        section_id: &str,
        element_id: &str,
        tier: Breakpoint,
    ) -> bool {
        self.dispatch(Action::ClearBreakpointOverrides {
            section_id: section_id.to_string(),
            element_id: element_id.to_string(),
            breakpoint: tier,
        })
    }

    pub fn clear_all_breakpoint_overrides(&mut self, section_id: &str, element_id: &str) -> bool {
        self.dispatch(Action::ClearAllBreakpointOverrides {
            section_id: section_id.to_string(),
            element_id: element_id.to_string(),
        })
    }

    // =========================================================================
    // GROUPS
    // =========================================================================

    /// Groups the listed elements under a fresh id.
    pub fn group_elements(&mut self, element_ids: &[String]) -> Option<String> {
        let group_id = new_id("group");
        self.dispatch(Action::CreateGroup {
            group_id: group_id.clone(),
            element_ids: element_ids.to_vec(),
        })
        .then_some(group_id)
    }

    /// Groups the currently selected elements.
    pub fn group_selection(&mut self) -> Option<String> {
        let selected = self.state.selection.element_ids.clone();
        self.group_elements(&selected)
    }

    pub fn ungroup(&mut self, group_id: &str) -> bool {
        self.dispatch(Action::Ungroup {
            group_id: group_id.to_string(),
        })
    }

    /// Translates every member at the active breakpoint.
    pub fn move_group(&mut self, group_id: &str, dx: f64, dy: f64) -> bool {
        self.dispatch(Action::MoveGroup {
            group_id: group_id.to_string(),
            dx,
            dy,
        })
    }

    // =========================================================================
    // HISTORY
    // =========================================================================

    /// Records the current document as an undo point.
    pub fn push_history(&mut self) -> bool {
        self.dispatch(Action::PushHistory)
    }

    pub fn undo(&mut self) -> bool {
        self.dispatch(Action::Undo)
    }

    pub fn redo(&mut self) -> bool {
        self.dispatch(Action::Redo)
    }

    pub fn can_undo(&self) -> bool {
        !self.is_read_only() && self.state.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        !self.is_read_only() && self.state.history.can_redo()
    }

    pub fn undo_label(&self) -> Option<&'static str> {
        self.state.history.undo_label()
    }

    pub fn redo_label(&self) -> Option<&'static str> {
        self.state.history.redo_label()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::model::{FontWeight, TextAlign};
    use serde_json::json;

    fn editor() -> PageEditor {
        PageEditor::from_template("landing").unwrap()
    }

    fn hero_id(editor: &PageEditor) -> String {
        editor
            .page()
            .sections
            .iter()
            .find(|s| s.section_type == SectionType::Hero)
            .map(|s| s.id.clone())
            .unwrap()
    }

    #[test]
    fn test_from_template() {
        let editor = editor();
        assert_eq!(editor.page().sections.len(), 6);
        assert!(!editor.can_undo());
        assert_eq!(editor.design_width(), 1200.0);
        assert!(PageEditor::from_template("nope").is_err());
    }

    #[test]
    fn test_add_and_duplicate_section() {
        let mut editor = PageEditor::new(Page::new("Empty"));
        let first = editor.add_section(SectionType::Pricing, None).unwrap();
        assert_eq!(editor.selection().section_id.as_deref(), Some(first.as_str()));

        let copy = editor.duplicate_section(&first).unwrap();
        assert_ne!(copy, first);
        assert_eq!(editor.page().sections[1].id, copy);
        assert_ne!(
            editor.page().sections[0].items[0].id,
            editor.page().sections[1].items[0].id
        );

        assert!(editor.duplicate_section("ghost").is_none());
        assert!(editor.undo());
        assert_eq!(editor.page().sections.len(), 1);
    }

    #[test]
    fn test_element_lifecycle() {
        let mut editor = editor();
        let section = hero_id(&editor);

        let id = editor.add_element(&section, ElementType::Text).unwrap();
        assert_eq!(editor.selection().primary_element(), Some(id.as_str()));

        let copy = editor.duplicate_element(&section, &id).unwrap();
        let copied = editor.page().find_element(&copy).unwrap();
        assert_eq!(copied.position.x, 52.0);
        assert_eq!(copied.content["text"], json!("New text"));

        assert!(editor.move_element(&section, &id, 20.0, 30.0));
        assert!(editor.remove_element(&section, &copy));
        assert!(editor.page().find_element(&copy).is_none());
        assert!(editor.selection().element_ids.is_empty());
    }

    #[test]
    fn test_mobile_edit_leaves_desktop() {
        let mut editor = editor();
        let section = hero_id(&editor);
        let id = editor.add_element(&section, ElementType::Text).unwrap();

        editor.set_active_breakpoint(Breakpoint::Mobile);
        editor.update_element(
            &section,
            &id,
            BreakpointOverride::default().with_content("text", "Short"),
        );

        let desktop = editor
            .element_at_breakpoint(&section, &id, Breakpoint::Desktop)
            .unwrap();
        let mobile = editor
            .element_at_breakpoint(&section, &id, Breakpoint::Mobile)
            .unwrap();
        assert_eq!(desktop.content["text"], json!("New text"));
        assert_eq!(mobile.content["text"], json!("Short"));
        assert_eq!(
            editor.overridden_breakpoints(&section, &id).unwrap(),
            vec![Breakpoint::Mobile]
        );

        let resolved = editor.resolved_page(Breakpoint::Mobile);
        let flat = resolved.find_element(&id).unwrap();
        assert_eq!(flat.content["text"], json!("Short"));
        assert!(flat.breakpoint_overrides.is_none());

        assert!(editor.clear_breakpoint_overrides(&section, &id, Breakpoint::Mobile));
        assert!(editor.overridden_breakpoints(&section, &id).unwrap().is_empty());
    }

    #[test]
    fn test_group_selection_and_move() {
        let mut editor = editor();
        let section = hero_id(&editor);
        let a = editor.add_element(&section, ElementType::Text).unwrap();
        let b = editor.add_element(&section, ElementType::Badge).unwrap();
        editor.move_element(&section, &b, 70.0, 20.0);

        editor.select_element(Some(&a));
        editor.toggle_element_selection(&b);
        let group = editor.group_selection().unwrap();
        assert_eq!(editor.groups().get(&group).unwrap().element_ids.len(), 2);

        assert!(editor.move_group(&group, 40.0, 0.0));
        let moved = editor.page().find_element(&b).unwrap();
        assert_eq!(moved.position.x, 100.0);
        assert!(!editor.move_group(&group, 0.0, 0.0));

        assert!(editor.ungroup(&group));
        assert!(editor.groups().is_empty());
    }

    #[test]
    fn test_group_needs_two_elements() {
        let mut editor = editor();
        let section = hero_id(&editor);
        let a = editor.add_element(&section, ElementType::Text).unwrap();
        let undo_points = editor.history().len();

        assert!(editor.group_elements(&[a.clone()]).is_none());
        assert!(editor.group_elements(&[a.clone(), "ghost".to_string()]).is_none());
        assert_eq!(editor.history().len(), undo_points);
    }

    #[test]
    fn test_style_layering_through_editor() {
        let mut editor = editor();
        let section = hero_id(&editor);

        editor.set_style_override(
            &section,
            None,
            FieldName::Heading,
            StyleOverride::default()
                .with_font_size(48.0)
                .with_text_align(TextAlign::Center),
        );
        editor.set_style_override(
            &section,
            None,
            FieldName::Heading,
            StyleOverride::default().with_font_weight(FontWeight::Bold),
        );

        let style = editor.resolve_style(&section, &FieldName::Heading, None).unwrap();
        assert_eq!(style.font_size.as_deref(), Some("48px"));
        assert_eq!(style.font_weight, Some(700));
        assert_eq!(style.font_family, "Inter");

        let record = editor.style_override(&section, &FieldName::Heading, None).unwrap();
        assert_eq!(record.text_align, Some(TextAlign::Center));

        assert!(editor.clear_style_override(&section, None, FieldName::Heading));
        assert!(editor
            .style_override(&section, &FieldName::Heading, None)
            .unwrap()
            .is_empty());
        assert!(editor.resolve_style("ghost", &FieldName::Heading, None).is_err());
    }

    #[test]
    fn test_items() {
        let mut editor = editor();
        let features = editor.page().sections[2].id.clone();

        let id = editor.add_item(&features).unwrap();
        let patch = json!({"title": "Reliable", "description": "Always on"});
        assert!(editor.update_item(&features, &id, patch.as_object().unwrap().clone()));
        let item = editor.page().section(&features).unwrap().item(&id).unwrap();
        assert_eq!(item.title.as_deref(), Some("Reliable"));

        assert!(editor.reorder_items(&features, 3, 0));
        assert_eq!(editor.page().section(&features).unwrap().items[0].id, id);
        assert!(editor.remove_item(&features, &id));
        assert!(editor.add_item("ghost").is_none());
    }

    #[test]
    fn test_published_editor_is_read_only() {
        let page = editor().into_page();
        let mut viewer = PageEditor::published(page.clone());

        assert!(viewer.add_section(SectionType::Hero, None).is_none());
        assert!(!viewer.update_page(PagePatch::default().with_title("Nope")));
        assert!(!viewer.push_history());
        assert!(!viewer.can_undo());
        assert_eq!(viewer.page(), &page);
        assert_eq!(viewer.mode(), EditorMode::Published);
    }

    #[test]
    fn test_undo_redo_labels() {
        let mut editor = editor();
        editor.update_page(PagePatch::default().with_title("Renamed"));
        assert_eq!(editor.undo_label(), Some("update_page"));

        editor.undo();
        assert_eq!(editor.page().title, "Landing page");
        assert_eq!(editor.redo_label(), Some("update_page"));
        editor.redo();
        assert_eq!(editor.page().title, "Renamed");
    }

    #[test]
    fn test_json_round_trip() {
        let editor = editor();
        let json = editor.to_json().unwrap();
        let reopened = PageEditor::from_json(&json).unwrap();
        assert_eq!(reopened.page(), editor.page());
    }

    #[test]
    fn test_dispatch_owned() {
        let mut editor = editor();
        editor.dispatch_owned(Action::UpdatePage(PagePatch::default().with_title("Owned")));
        assert_eq!(editor.page().title, "Owned");
        assert!(editor.can_undo());
    }
}
