//! WASM bindings for the page editor.
//!
//! This module provides a JavaScript-friendly wrapper around [`PageEditor`]
//! for the browser editing UI and the published viewer. Structured values
//! cross the boundary as plain JS objects in the document's camelCase shape.

use js_sys::{Array, Object, Reflect};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;

use super::action::{Direction, PagePatch};
use super::manager::PageEditor;
use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::page::model::{
    Breakpoint, BreakpointOverride, Element, ElementType, FieldName, Page, Record, SectionType,
    StyleOverride,
};
use crate::scaling::{scale_factor, scale_font_size, scale_value, TextRole};

/// Serialize a value to JsValue with maps as plain JS objects (not Map).
fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&Serializer::new().serialize_maps_as_objects(true))
}

// =============================================================================
// ERROR CONVERSION
// =============================================================================

impl From<EditorError> for JsValue {
    fn from(err: EditorError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }
}

/// Helper macro for Result conversion
macro_rules! js_result {
    ($expr:expr) => {
        $expr.map_err(|e: EditorError| JsValue::from(e))
    };
}

/// Deletes `undefined`-valued keys from plain objects, recursively, so they
/// read as absent. Only an explicit `null` may reset a key.
fn strip_undefined(value: &JsValue) {
    if let Some(array) = value.dyn_ref::<Array>() {
        for entry in array.iter() {
            strip_undefined(&entry);
        }
        return;
    }
    if !value.is_object() || value.is_function() {
        return;
    }
    let object: &Object = value.unchecked_ref();
    for key in Object::keys(object).iter() {
        let Ok(entry) = Reflect::get(object, &key) else {
            continue;
        };
        if entry.is_undefined() {
            let _ = Reflect::delete_property(object, &key);
        } else {
            strip_undefined(&entry);
        }
    }
}

/// Deserializes a patch-shaped value with `undefined` keys dropped first.
fn patch_from_value<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    strip_undefined(&value);
    Ok(from_value(value)?)
}

fn parse_breakpoint(value: &str) -> Result<Breakpoint, JsValue> {
    js_result!(value.parse::<Breakpoint>())
}

fn parse_field(value: &str) -> FieldName {
    FieldName::from(value)
}

// =============================================================================
// MAIN WRAPPER TYPE
// =============================================================================

/// JavaScript-friendly wrapper around PageEditor.
#[wasm_bindgen]
pub struct JsPageEditor {
    inner: PageEditor,
}

#[wasm_bindgen]
impl JsPageEditor {
    /// Opens a page object for editing.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const editor = new JsPageEditor(pageObject);
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new(page: JsValue) -> Result<JsPageEditor, JsValue> {
        let page: Page = from_value(page)?;
        Ok(JsPageEditor {
            inner: PageEditor::new(page),
        })
    }

    /// Opens a page with session settings (`{ maxHistory, designWidth, initialBreakpoint }`).
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(page: JsValue, config: JsValue) -> Result<JsPageEditor, JsValue> {
        let page: Page = from_value(page)?;
        let config: EditorConfig = from_value(config)?;
        Ok(JsPageEditor {
            inner: PageEditor::with_config(page, &config),
        })
    }

    /// Starts from a built-in template.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const editor = JsPageEditor.fromTemplate("landing");
    /// ```
    #[wasm_bindgen(js_name = fromTemplate)]
    pub fn from_template(name: &str) -> Result<JsPageEditor, JsValue> {
        let inner = js_result!(PageEditor::from_template(name))?;
        Ok(JsPageEditor { inner })
    }

    /// Opens a page read-only for the published viewer.
    #[wasm_bindgen(js_name = published)]
    pub fn published(page: JsValue) -> Result<JsPageEditor, JsValue> {
        let page: Page = from_value(page)?;
        Ok(JsPageEditor {
            inner: PageEditor::published(page),
        })
    }

    /// Parses a page from a JSON string.
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<JsPageEditor, JsValue> {
        let inner = js_result!(PageEditor::from_json(json))?;
        Ok(JsPageEditor { inner })
    }

    /// Serializes the page to a JSON string.
    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<String, JsValue> {
        js_result!(self.inner.to_json())
    }

    // =========================================================================
    // STATE
    // =========================================================================

    /// Gets the page as a JavaScript object.
    #[wasm_bindgen(js_name = getPage)]
    pub fn get_page(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(self.inner.page())?)
    }

    /// Gets the group index (`{ [groupId]: { id, elementIds, bounds } }`).
    #[wasm_bindgen(js_name = getGroups)]
    pub fn get_groups(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(self.inner.groups())?)
    }

    /// Gets the selection (`{ sectionId, itemId, elementIds }`).
    #[wasm_bindgen(js_name = getSelection)]
    pub fn get_selection(&self) -> Result<JsValue, JsValue> {
        Ok(to_js_value(self.inner.selection())?)
    }

    #[wasm_bindgen(js_name = activeBreakpoint)]
    pub fn active_breakpoint(&self) -> String {
        self.inner.active_breakpoint().to_string()
    }

    #[wasm_bindgen(js_name = isReadOnly)]
    pub fn is_read_only(&self) -> bool {
        self.inner.is_read_only()
    }

    #[wasm_bindgen(js_name = designWidth)]
    pub fn design_width(&self) -> f64 {
        self.inner.design_width()
    }

    /// Effective element at a breakpoint.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const el = editor.getElementAtBreakpoint(sectionId, elementId, "mobile");
    /// console.log(el.position.x);
    /// ```
    #[wasm_bindgen(js_name = getElementAtBreakpoint)]
    pub fn get_element_at_breakpoint(
        &self,
        section_id: &str,
        element_id: &str,
        breakpoint: &str,
    ) -> Result<JsValue, JsValue> {
        let tier = parse_breakpoint(breakpoint)?;
        let element = js_result!(self.inner.element_at_breakpoint(section_id, element_id, tier))?;
        Ok(to_js_value(&element)?)
    }

    /// Tiers that carry overrides, as an array of names.
    #[wasm_bindgen(js_name = getOverriddenBreakpoints)]
    pub fn get_overridden_breakpoints(
        &self,
        section_id: &str,
        element_id: &str,
    ) -> Result<Array, JsValue> {
        let tiers = js_result!(self.inner.overridden_breakpoints(section_id, element_id))?;
        let array = Array::new();
        for tier in tiers {
            array.push(&JsValue::from_str(tier.as_str()));
        }
        Ok(array)
    }

    /// The page collapsed to one breakpoint, for static export.
    #[wasm_bindgen(js_name = resolvePage)]
    pub fn resolve_page(&self, breakpoint: &str) -> Result<JsValue, JsValue> {
        let tier = parse_breakpoint(breakpoint)?;
        Ok(to_js_value(&self.inner.resolved_page(tier))?)
    }

    /// Resolved style of a text field.
    #[wasm_bindgen(js_name = resolveStyle)]
    pub fn resolve_style(
        &self,
        section_id: &str,
        field: &str,
        item_id: Option<String>,
    ) -> Result<JsValue, JsValue> {
        let style = js_result!(self.inner.resolve_style(
            section_id,
            &parse_field(field),
            item_id.as_deref()
        ))?;
        Ok(to_js_value(&style)?)
    }

    /// The override record the style panel edits.
    #[wasm_bindgen(js_name = getStyleOverride)]
    pub fn get_style_override(
        &self,
        section_id: &str,
        field: &str,
        item_id: Option<String>,
    ) -> Result<JsValue, JsValue> {
        let style = js_result!(self.inner.style_override(
            section_id,
            &parse_field(field),
            item_id.as_deref()
        ))?;
        Ok(to_js_value(&style)?)
    }

    // =========================================================================
    // SELECTION
    // =========================================================================

    #[wasm_bindgen(js_name = selectSection)]
    pub fn select_section(&mut self, section_id: Option<String>) -> bool {
        self.inner.select_section(section_id.as_deref())
    }

    #[wasm_bindgen(js_name = selectItem)]
    pub fn select_item(&mut self, item_id: Option<String>) -> bool {
        self.inner.select_item(item_id.as_deref())
    }

    #[wasm_bindgen(js_name = selectElement)]
    pub fn select_element(&mut self, element_id: Option<String>) -> bool {
        self.inner.select_element(element_id.as_deref())
    }

    #[wasm_bindgen(js_name = toggleElementSelection)]
    pub fn toggle_element_selection(&mut self, element_id: &str) -> bool {
        self.inner.toggle_element_selection(element_id)
    }

    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection(&mut self) -> bool {
        self.inner.clear_selection()
    }

    #[wasm_bindgen(js_name = setActiveBreakpoint)]
    pub fn set_active_breakpoint(&mut self, breakpoint: &str) -> Result<bool, JsValue> {
        let tier = parse_breakpoint(breakpoint)?;
        Ok(self.inner.set_active_breakpoint(tier))
    }

    // =========================================================================
    // PAGE / SECTIONS
    // =========================================================================

    /// Replaces the document; history starts over.
    #[wasm_bindgen(js_name = loadPage)]
    pub fn load_page(&mut self, page: JsValue) -> Result<bool, JsValue> {
        let page: Page = from_value(page)?;
        Ok(self.inner.load_page(page))
    }

    /// Partial page settings update (`{ title, colorScheme, typography, ... }`).
    #[wasm_bindgen(js_name = updatePage)]
    pub fn update_page(&mut self, patch: JsValue) -> Result<bool, JsValue> {
        let patch: PagePatch = patch_from_value(patch)?;
        Ok(self.inner.update_page(patch))
    }

    /// Adds a section with starter content. Returns the new id, or undefined.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const id = editor.addSection("pricing", 2);
    /// ```
    #[wasm_bindgen(js_name = addSection)]
    pub fn add_section(
        &mut self,
        section_type: &str,
        index: Option<usize>,
    ) -> Result<Option<String>, JsValue> {
        let section_type: SectionType = js_result!(section_type.parse())?;
        Ok(self.inner.add_section(section_type, index))
    }

    #[wasm_bindgen(js_name = duplicateSection)]
    pub fn duplicate_section(&mut self, section_id: &str) -> Option<String> {
        self.inner.duplicate_section(section_id)
    }

    #[wasm_bindgen(js_name = updateSectionContent)]
    pub fn update_section_content(
        &mut self,
        section_id: &str,
        patch: JsValue,
    ) -> Result<bool, JsValue> {
        let patch: Record = patch_from_value(patch)?;
        Ok(self.inner.update_section_content(section_id, patch))
    }

    #[wasm_bindgen(js_name = removeSection)]
    pub fn remove_section(&mut self, section_id: &str) -> bool {
        self.inner.remove_section(section_id)
    }

    /// Moves a section one step; `direction` is `"up"` or `"down"`.
    #[wasm_bindgen(js_name = moveSection)]
    pub fn move_section(&mut self, section_id: &str, direction: &str) -> Result<bool, JsValue> {
        let direction: Direction = from_value(JsValue::from_str(direction))?;
        Ok(self.inner.move_section(section_id, direction))
    }

    #[wasm_bindgen(js_name = reorderSections)]
    pub fn reorder_sections(&mut self, from: usize, to: usize) -> bool {
        self.inner.reorder_sections(from, to)
    }

    // =========================================================================
    // ITEMS
    // =========================================================================

    #[wasm_bindgen(js_name = addItem)]
    pub fn add_item(&mut self, section_id: &str) -> Option<String> {
        self.inner.add_item(section_id)
    }

    #[wasm_bindgen(js_name = updateItem)]
    pub fn update_item(
        &mut self,
        section_id: &str,
        item_id: &str,
        patch: JsValue,
    ) -> Result<bool, JsValue> {
        let patch: Record = patch_from_value(patch)?;
        Ok(self.inner.update_item(section_id, item_id, patch))
    }

    #[wasm_bindgen(js_name = removeItem)]
    pub fn remove_item(&mut self, section_id: &str, item_id: &str) -> bool {
        self.inner.remove_item(section_id, item_id)
    }

    #[wasm_bindgen(js_name = reorderItems)]
    pub fn reorder_items(&mut self, section_id: &str, from: usize, to: usize) -> bool {
        self.inner.reorder_items(section_id, from, to)
    }

    // =========================================================================
    // ELEMENTS
    // =========================================================================

    /// Adds an element with starter content. Returns the new id, or undefined.
    #[wasm_bindgen(js_name = addElement)]
    pub fn add_element(
        &mut self,
        section_id: &str,
        element_type: &str,
    ) -> Result<Option<String>, JsValue> {
        let element_type: ElementType = js_result!(element_type.parse())?;
        Ok(self.inner.add_element(section_id, element_type))
    }

    /// Adds a fully specified element object.
    #[wasm_bindgen(js_name = insertElement)]
    pub fn insert_element(
        &mut self,
        section_id: &str,
        element: JsValue,
    ) -> Result<Option<String>, JsValue> {
        let element: Element = patch_from_value(element)?;
        Ok(self.inner.insert_element(section_id, element))
    }

    #[wasm_bindgen(js_name = duplicateElement)]
    pub fn duplicate_element(&mut self, section_id: &str, element_id: &str) -> Option<String> {
        self.inner.duplicate_element(section_id, element_id)
    }

    /// Patches an element at the active breakpoint
    /// (`{ position, content, styles, visible }`).
    #[wasm_bindgen(js_name = updateElement)]
    pub fn update_element(
        &mut self,
        section_id: &str,
        element_id: &str,
        patch: JsValue,
    ) -> Result<bool, JsValue> {
        let patch: BreakpointOverride = patch_from_value(patch)?;
        Ok(self.inner.update_element(section_id, element_id, patch))
    }

    #[wasm_bindgen(js_name = removeElement)]
    pub fn remove_element(&mut self, section_id: &str, element_id: &str) -> bool {
        self.inner.remove_element(section_id, element_id)
    }

    #[wasm_bindgen(js_name = moveElement)]
    pub fn move_element(&mut self, section_id: &str, element_id: &str, x: f64, y: f64) -> bool {
        self.inner.move_element(section_id, element_id, x, y)
    }

    #[wasm_bindgen(js_name = reorderElements)]
    pub fn reorder_elements(&mut self, section_id: &str, from: usize, to: usize) -> bool {
        self.inner.reorder_elements(section_id, from, to)
    }

    // =========================================================================
    // OVERRIDES
    // =========================================================================

    #[wasm_bindgen(js_name = setStyleOverride)]
    pub fn set_style_override(
        &mut self,
        section_id: &str,
        item_id: Option<String>,
        field: &str,
        style: JsValue,
    ) -> Result<bool, JsValue> {
        let style: StyleOverride = patch_from_value(style)?;
        Ok(self
            .inner
            .set_style_override(section_id, item_id.as_deref(), parse_field(field), style))
    }

    #[wasm_bindgen(js_name = clearStyleOverride)]
    pub fn clear_style_override(
        &mut self,
        section_id: &str,
        item_id: Option<String>,
        field: &str,
    ) -> bool {
        self.inner
            .clear_style_override(section_id, item_id.as_deref(), parse_field(field))
    }

    #[wasm_bindgen(js_name = setBreakpointOverride)]
    pub fn set_breakpoint_override(
        &mut self,
        section_id: &str,
        element_id: &str,
        breakpoint: &str,
        patch: JsValue,
    ) -> Result<bool, JsValue> {
        let tier = parse_breakpoint(breakpoint)?;
        let patch: BreakpointOverride = patch_from_value(patch)?;
        Ok(self
            .inner
            .set_breakpoint_override(section_id, element_id, tier, patch))
    }

    #[wasm_bindgen(js_name = clearBreakpointOverrides)]
    pub fn clear_breakpoint_overrides(
        &mut self,
        section_id: &str,
        element_id: &str,
        breakpoint: &str,
    ) -> Result<bool, JsValue> {
        let tier = parse_breakpoint(breakpoint)?;
        Ok(self
            .inner
            .clear_breakpoint_overrides(section_id, element_id, tier))
    }

    #[wasm_bindgen(js_name = clearAllBreakpointOverrides)]
    pub fn clear_all_breakpoint_overrides(&mut self, section_id: &str, element_id: &str) -> bool {
        self.inner
            .clear_all_breakpoint_overrides(section_id, element_id)
    }

    // =========================================================================
    // GROUPS
    // =========================================================================

    /// Groups elements by id (array of strings). Returns the group id, or undefined.
    #[wasm_bindgen(js_name = groupElements)]
    pub fn group_elements(&mut self, element_ids: JsValue) -> Result<Option<String>, JsValue> {
        let element_ids: Vec<String> = from_value(element_ids)?;
        Ok(self.inner.group_elements(&element_ids))
    }

    #[wasm_bindgen(js_name = groupSelection)]
    pub fn group_selection(&mut self) -> Option<String> {
        self.inner.group_selection()
    }

    #[wasm_bindgen(js_name = ungroup)]
    pub fn ungroup(&mut self, group_id: &str) -> bool {
        self.inner.ungroup(group_id)
    }

    #[wasm_bindgen(js_name = moveGroup)]
    pub fn move_group(&mut self, group_id: &str, dx: f64, dy: f64) -> bool {
        self.inner.move_group(group_id, dx, dy)
    }

    // =========================================================================
    // HISTORY
    // =========================================================================

    #[wasm_bindgen(js_name = pushHistory)]
    pub fn push_history(&mut self) -> bool {
        self.inner.push_history()
    }

    pub fn undo(&mut self) -> bool {
        self.inner.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.inner.redo()
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.inner.can_redo()
    }

    // =========================================================================
    // SCALING
    // =========================================================================

    /// Scales a design-space pixel value to the viewport.
    #[wasm_bindgen(js_name = scaleValue)]
    pub fn scale_value(&self, value: f64, viewport_width: f64) -> f64 {
        scale_value(value, scale_factor(viewport_width, self.inner.design_width()))
    }

    /// Fluid font size for a text role (`button`, `heading`, `subheading`,
    /// `paragraph`, `caption`, `badge`): `{ px, css }`.
    #[wasm_bindgen(js_name = scaleFontSize)]
    pub fn scale_font_size(
        &self,
        value: f64,
        viewport_width: f64,
        role: &str,
    ) -> Result<JsValue, JsValue> {
        let role: TextRole = from_value(JsValue::from_str(role))?;
        let factor = scale_factor(viewport_width, self.inner.design_width());
        let scaled = scale_font_size(value, factor, role);
        Ok(to_js_value(&scaled)?)
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use crate::page::model::{Section, SectionType};
    use wasm_bindgen_test::*;

    fn editor() -> JsPageEditor {
        let page = Page::new("Wasm").with_section(
            Section::new("s-1", SectionType::Hero).with_element(
                Element::new("e-1", ElementType::Text)
                    .with_content("text", "Hi")
                    .with_content("href", "/old"),
            ),
        );
        JsPageEditor {
            inner: PageEditor::new(page),
        }
    }

    fn content_patch(key: &str, value: &JsValue) -> JsValue {
        let content = Object::new();
        Reflect::set(&content, &JsValue::from_str(key), value).unwrap();
        let patch = Object::new();
        Reflect::set(&patch, &JsValue::from_str("content"), &content).unwrap();
        patch.into()
    }

    #[wasm_bindgen_test]
    fn test_undefined_keys_are_ignored() {
        let mut editor = editor();

        let patch = content_patch("text", &JsValue::UNDEFINED);
        let content = Reflect::get(&patch, &JsValue::from_str("content")).unwrap();
        Reflect::set(&content, &JsValue::from_str("href"), &JsValue::from_str("/new")).unwrap();
        assert!(editor.update_element("s-1", "e-1", patch).unwrap());

        let element = editor.inner.page().find_element("e-1").unwrap();
        assert_eq!(element.content["text"], "Hi");
        assert_eq!(element.content["href"], "/new");
    }

    #[wasm_bindgen_test]
    fn test_null_still_resets() {
        let mut editor = editor();

        let patch = content_patch("text", &JsValue::NULL);
        assert!(editor.update_element("s-1", "e-1", patch).unwrap());

        let element = editor.inner.page().find_element("e-1").unwrap();
        assert!(!element.content.contains_key("text"));
    }

    #[wasm_bindgen_test]
    fn test_undefined_only_patch_keeps_values() {
        let mut editor = editor();

        let patch = content_patch("text", &JsValue::UNDEFINED);
        let tier_patch = content_patch("text", &JsValue::UNDEFINED);
        editor.update_element("s-1", "e-1", patch).unwrap();
        editor
            .set_breakpoint_override("s-1", "e-1", "mobile", tier_patch)
            .unwrap();

        let element = editor.inner.page().find_element("e-1").unwrap();
        assert_eq!(element.content["text"], "Hi");
        let mobile = element.breakpoint_override(Breakpoint::Mobile);
        assert!(mobile.map_or(true, |o| o.content.as_ref().map_or(true, |c| c.is_empty())));
    }
}
