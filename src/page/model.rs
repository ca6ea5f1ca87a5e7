//! Data models for the page document.
//!
//! These structs map to the records the editing UI, the static emitter and the
//! published viewer exchange as JSON, so field names are camelCase on the wire.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{EditorError, EditorResult};

/// Free-form JSON record used for element content/styles and per-type fields.
pub type Record = Map<String, Value>;

/// Generates a fresh globally-unique id with a readable prefix.
pub fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

/// Clamps a coordinate to percentage space.
pub fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Parses a unit-variant enum from its wire name.
fn parse_wire_name<T: serde::de::DeserializeOwned>(s: &str) -> EditorResult<T> {
    Ok(serde_json::from_value(Value::String(s.to_string()))?)
}

// =============================================================================
// BREAKPOINT
// =============================================================================

/// Viewport tier. Desktop is the base record; tablet and mobile are override tiers.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl Breakpoint {
    /// Override tiers in reporting order.
    pub const OVERRIDE_TIERS: [Breakpoint; 2] = [Breakpoint::Mobile, Breakpoint::Tablet];

    pub fn as_str(self) -> &'static str {
        match self {
            Breakpoint::Desktop => "desktop",
            Breakpoint::Tablet => "tablet",
            Breakpoint::Mobile => "mobile",
        }
    }

    /// True for the authoritative tier.
    pub fn is_base(self) -> bool {
        self == Breakpoint::Desktop
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Breakpoint {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "desktop" => Ok(Breakpoint::Desktop),
            "tablet" => Ok(Breakpoint::Tablet),
            "mobile" => Ok(Breakpoint::Mobile),
            other => Err(EditorError::invalid_breakpoint(other)),
        }
    }
}

// =============================================================================
// PAGE
// =============================================================================

/// Root document: page settings plus the ordered sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Page {
    pub title: String,
    pub description: String,
    pub color_scheme: ColorScheme,
    pub typography: Typography,
    pub sections: Vec<Section>,
    pub smooth_scroll: bool,
    pub animation: AnimationPreset,
    /// Reference canvas width absolute positions were authored at.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design_width: Option<f64>,
}

impl Page {
    /// Creates an empty page with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            smooth_scroll: true,
            ..Default::default()
        }
    }

    /// Builder: Set description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder: Set color scheme.
    pub fn with_color_scheme(mut self, color_scheme: ColorScheme) -> Self {
        self.color_scheme = color_scheme;
        self
    }

    /// Builder: Set typography.
    pub fn with_typography(mut self, typography: Typography) -> Self {
        self.typography = typography;
        self
    }

    /// Builder: Append a section.
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Parses a page from JSON.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the page to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> EditorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_mut(&mut self, id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    pub fn section_index(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    /// Iterates every canvas element on the page, in section order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.sections.iter().flat_map(|s| s.elements.iter())
    }

    /// Finds an element anywhere on the page.
    pub fn find_element(&self, element_id: &str) -> Option<&Element> {
        self.elements().find(|e| e.id == element_id)
    }

    /// Finds an element anywhere on the page, mutably.
    pub fn find_element_mut(&mut self, element_id: &str) -> Option<&mut Element> {
        self.sections
            .iter_mut()
            .flat_map(|s| s.elements.iter_mut())
            .find(|e| e.id == element_id)
    }

    /// Looks up an element inside a specific section.
    pub fn element_in(&self, section_id: &str, element_id: &str) -> EditorResult<&Element> {
        let section = self
            .section(section_id)
            .ok_or_else(|| EditorError::section_not_found(section_id))?;
        section
            .element(element_id)
            .ok_or_else(|| EditorError::element_not_found(element_id))
    }
}

/// Five named page colors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorScheme {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            primary: "#2563eb".to_string(),
            secondary: "#64748b".to_string(),
            accent: "#f59e0b".to_string(),
            background: "#ffffff".to_string(),
            text: "#111827".to_string(),
        }
    }
}

/// Heading and body font families.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Typography {
    pub heading_font: String,
    pub body_font: String,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            heading_font: "Inter".to_string(),
            body_font: "Inter".to_string(),
        }
    }
}

/// Page-wide entrance animation preset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationPreset {
    None,
    #[default]
    Subtle,
    Moderate,
    Dynamic,
}

// =============================================================================
// SECTION
// =============================================================================

/// Closed set of section kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Header,
    Hero,
    Features,
    Pricing,
    Testimonials,
    About,
    Gallery,
    Team,
    Stats,
    Faq,
    Cta,
    Contact,
    Newsletter,
    Footer,
    Custom,
}

impl FromStr for SectionType {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_wire_name(s)
    }
}

/// A page section: typed content, optional list items and free canvas elements.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    #[serde(rename = "type")]
    pub section_type: SectionType,
    #[serde(default)]
    pub content: SectionContent,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Item>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<Element>,
}

impl Section {
    /// Creates an empty section of the given type.
    pub fn new(id: impl Into<String>, section_type: SectionType) -> Self {
        Self {
            id: id.into(),
            section_type,
            content: SectionContent::default(),
            items: Vec::new(),
            elements: Vec::new(),
        }
    }

    /// Builder: Set content.
    pub fn with_content(mut self, content: SectionContent) -> Self {
        self.content = content;
        self
    }

    /// Builder: Append an item.
    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    /// Builder: Append an element.
    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn item_mut(&mut self, id: &str) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Deep copy with fresh ids for the section, its items and its elements.
    /// Group membership is not copied.
    pub fn duplicate_with_fresh_ids(&self) -> Section {
        let mut copy = self.clone();
        copy.id = new_id("section");
        for item in &mut copy.items {
            item.id = new_id("item");
        }
        for element in &mut copy.elements {
            element.id = new_id("element");
            element.group_id = None;
        }
        copy
    }
}

/// Section content: common typed fields plus open per-type fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subheading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Section-level per-field style overrides.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub element_styles: BTreeMap<FieldName, StyleOverride>,
    /// Per-section-type fields (buttonText, logoText, links, ...).
    #[serde(flatten)]
    pub fields: Record,
}

impl SectionContent {
    /// Builder: Set heading.
    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    /// Builder: Set subheading.
    pub fn with_subheading(mut self, subheading: impl Into<String>) -> Self {
        self.subheading = Some(subheading.into());
        self
    }

    /// Builder: Set a per-type field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

// =============================================================================
// ITEM
// =============================================================================

/// Repeated entry inside a section (feature card, pricing tier, testimonial, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Item {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Item-level per-field style overrides; highest precedence.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub style_overrides: BTreeMap<FieldName, StyleOverride>,
    #[serde(flatten)]
    pub fields: Record,
}

impl Item {
    /// Creates a new Item with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Builder: Set title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder: Set description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: Set price.
    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }

    /// Builder: Add a feature line.
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.push(feature.into());
        self
    }
}

// =============================================================================
// STYLE OVERRIDES
// =============================================================================

/// Styleable field name. The common fields are a closed set; anything else is
/// carried verbatim in `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldName {
    Heading,
    Subheading,
    AccentHeading,
    Title,
    Description,
    LogoText,
    Badge,
    Price,
    ButtonText,
    Author,
    Quote,
    Custom(String),
}

impl FieldName {
    pub fn as_str(&self) -> &str {
        match self {
            FieldName::Heading => "heading",
            FieldName::Subheading => "subheading",
            FieldName::AccentHeading => "accentHeading",
            FieldName::Title => "title",
            FieldName::Description => "description",
            FieldName::LogoText => "logoText",
            FieldName::Badge => "badge",
            FieldName::Price => "price",
            FieldName::ButtonText => "buttonText",
            FieldName::Author => "author",
            FieldName::Quote => "quote",
            FieldName::Custom(name) => name,
        }
    }
}

impl From<&str> for FieldName {
    fn from(name: &str) -> Self {
        match name {
            "heading" => FieldName::Heading,
            "subheading" => FieldName::Subheading,
            "accentHeading" => FieldName::AccentHeading,
            "title" => FieldName::Title,
            "description" => FieldName::Description,
            "logoText" => FieldName::LogoText,
            "badge" => FieldName::Badge,
            "price" => FieldName::Price,
            "buttonText" => FieldName::ButtonText,
            "author" => FieldName::Author,
            "quote" => FieldName::Quote,
            other => FieldName::Custom(other.to_string()),
        }
    }
}

impl From<String> for FieldName {
    fn from(name: String) -> Self {
        FieldName::from(name.as_str())
    }
}

impl From<FieldName> for String {
    fn from(field: FieldName) -> Self {
        match field {
            FieldName::Custom(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partial visual override for one text field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleOverride {
    /// Pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_transform: Option<TextTransform>,
}

impl StyleOverride {
    pub fn is_empty(&self) -> bool {
        *self == StyleOverride::default()
    }

    /// Builder: Set color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Builder: Set font size in pixels.
    pub fn with_font_size(mut self, px: f64) -> Self {
        self.font_size = Some(px);
        self
    }

    /// Builder: Set font weight.
    pub fn with_font_weight(mut self, weight: FontWeight) -> Self {
        self.font_weight = Some(weight);
        self
    }

    /// Builder: Set text alignment.
    pub fn with_text_align(mut self, align: TextAlign) -> Self {
        self.text_align = Some(align);
        self
    }

    /// Copies every property set on `other` into `self`.
    pub fn merge(&mut self, other: &StyleOverride) {
        if other.font_size.is_some() {
            self.font_size = other.font_size;
        }
        if other.font_weight.is_some() {
            self.font_weight = other.font_weight;
        }
        if other.text_align.is_some() {
            self.text_align = other.text_align;
        }
        if other.color.is_some() {
            self.color = other.color.clone();
        }
        if other.letter_spacing.is_some() {
            self.letter_spacing = other.letter_spacing;
        }
        if other.line_height.is_some() {
            self.line_height = other.line_height;
        }
        if other.text_transform.is_some() {
            self.text_transform = other.text_transform;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Medium,
    Semibold,
    Bold,
}

impl FontWeight {
    /// CSS numeric weight.
    pub fn numeric(self) -> u16 {
        match self {
            FontWeight::Normal => 400,
            FontWeight::Medium => 500,
            FontWeight::Semibold => 600,
            FontWeight::Bold => 700,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTransform {
    None,
    Uppercase,
    Lowercase,
    Capitalize,
}

// =============================================================================
// ELEMENT
// =============================================================================

/// Kind of free canvas element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Button,
    Text,
    Image,
    Icon,
    Divider,
    Video,
    Badge,
    Countdown,
    Form,
    Html,
    Social,
}

impl FromStr for ElementType {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_wire_name(s)
    }
}

/// Position in percentage space of the containing section.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            width: None,
            height: None,
        }
    }

    /// Builder: Set width and height.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Writes every coordinate present in the patch.
    pub fn apply(&mut self, patch: &PositionPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if patch.width.is_some() {
            self.width = patch.width;
        }
        if patch.height.is_some() {
            self.height = patch.height;
        }
    }
}

/// Partial position; only present coordinates are applied.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PositionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl PositionPatch {
    /// Patch moving both coordinates.
    pub fn xy(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    /// Patch moving only x.
    pub fn x(x: f64) -> Self {
        Self {
            x: Some(x),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == PositionPatch::default()
    }

    /// Combines two patches; coordinates present in `other` win.
    pub fn merge(&mut self, other: &PositionPatch) {
        if other.x.is_some() {
            self.x = other.x;
        }
        if other.y.is_some() {
            self.y = other.y;
        }
        if other.width.is_some() {
            self.width = other.width;
        }
        if other.height.is_some() {
            self.height = other.height;
        }
    }
}

/// Free-form canvas element layered on a section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: String,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub position: Position,
    #[serde(default)]
    pub content: Record,
    #[serde(default)]
    pub styles: Record,
    /// Back-reference to the owning group, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Partial patches per override tier. Never holds an empty map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakpoint_overrides: Option<BTreeMap<Breakpoint, BreakpointOverride>>,
}

fn default_visible() -> bool {
    true
}

impl Element {
    /// Creates a visible element at the origin.
    pub fn new(id: impl Into<String>, element_type: ElementType) -> Self {
        Self {
            id: id.into(),
            element_type,
            position: Position::default(),
            content: Record::new(),
            styles: Record::new(),
            group_id: None,
            visible: true,
            breakpoint_overrides: None,
        }
    }

    /// Builder: Set position.
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Builder: Set a content field.
    pub fn with_content(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.content.insert(key.into(), value.into());
        self
    }

    /// Builder: Set a style field.
    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.styles.insert(key.into(), value.into());
        self
    }

    /// Override for a tier, if one is stored.
    pub fn breakpoint_override(&self, tier: Breakpoint) -> Option<&BreakpointOverride> {
        self.breakpoint_overrides.as_ref()?.get(&tier)
    }

    /// Drops empty tier entries, and the map itself once nothing is left.
    pub fn normalize_overrides(&mut self) {
        if let Some(overrides) = self.breakpoint_overrides.as_mut() {
            overrides.retain(|_, patch| !patch.is_empty());
            if overrides.is_empty() {
                self.breakpoint_overrides = None;
            }
        }
    }
}

/// Partial `{position, content, styles, visible}` patch.
///
/// Stored per override tier and also used as the patch shape for element
/// updates. Inside `content`/`styles`, a JSON `null` means "reset this key at
/// this tier".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BreakpointOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Record>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styles: Option<Record>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl BreakpointOverride {
    pub fn is_empty(&self) -> bool {
        self.position.is_none()
            && self.content.is_none()
            && self.styles.is_none()
            && self.visible.is_none()
    }

    /// Builder: Set position patch.
    pub fn with_position(mut self, position: PositionPatch) -> Self {
        self.position = Some(position);
        self
    }

    /// Builder: Set one content key.
    pub fn with_content(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.content
            .get_or_insert_with(Record::new)
            .insert(key.into(), value.into());
        self
    }

    /// Builder: Set one style key.
    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.styles
            .get_or_insert_with(Record::new)
            .insert(key.into(), value.into());
        self
    }

    /// Builder: Set visibility.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }
}

// =============================================================================
// GROUPS
// =============================================================================

/// Multi-element group. Membership mirrors the members' `group_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElementGroup {
    pub id: String,
    pub element_ids: Vec<String>,
    pub bounds: GroupBounds,
}

/// Cached bounding box of a group in percentage space.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl GroupBounds {
    /// Min/max over the given positions; `None` for an empty input.
    pub fn from_positions<'a>(positions: impl IntoIterator<Item = &'a Position>) -> Option<Self> {
        let mut iter = positions.into_iter();
        let first = iter.next()?;
        let init = GroupBounds {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        Some(iter.fold(init, |b, p| GroupBounds {
            min_x: b.min_x.min(p.x),
            max_x: b.max_x.max(p.x),
            min_y: b.min_y.min(p.y),
            max_y: b.max_y.max(p.y),
        }))
    }

    /// Shifts the box, clamping each edge to percentage space.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.min_x = clamp_percent(self.min_x + dx);
        self.max_x = clamp_percent(self.max_x + dx);
        self.min_y = clamp_percent(self.min_y + dy);
        self.max_y = clamp_percent(self.max_y + dy);
    }
}

// =============================================================================
// TESTS
// =============================================================================
