//! Style resolution for section text fields.
//!
//! Four layers, later wins per sub-property:
//! page defaults → section content defaults → section `elementStyles[field]`
//! → item `styleOverrides[field]`.

use serde::{Deserialize, Serialize};

use crate::page::model::{FieldName, Item, Page, Section, StyleOverride, TextAlign, TextTransform};

/// Final visual style of one field, ready for a renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStyle {
    pub font_family: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_transform: Option<TextTransform>,
}

impl ResolvedStyle {
    /// Applies every sub-property set on the override.
    pub fn apply(&mut self, style: &StyleOverride) {
        if let Some(size) = style.font_size {
            self.font_size = Some(format!("{}px", size));
        }
        if let Some(weight) = style.font_weight {
            self.font_weight = Some(weight.numeric());
        }
        if let Some(align) = style.text_align {
            self.text_align = Some(align);
        }
        if let Some(color) = &style.color {
            self.color = color.clone();
        }
        if let Some(spacing) = style.letter_spacing {
            self.letter_spacing = Some(format!("{}px", spacing));
        }
        if let Some(line_height) = style.line_height {
            self.line_height = Some(line_height);
        }
        if let Some(transform) = style.text_transform {
            self.text_transform = Some(transform);
        }
    }

    /// Inline CSS declarations (`font-family: ...; color: ...`).
    pub fn to_css(&self) -> String {
        let mut decls = vec![
            format!("font-family: {}", self.font_family),
            format!("color: {}", self.color),
        ];
        if let Some(size) = &self.font_size {
            decls.push(format!("font-size: {}", size));
        }
        if let Some(weight) = self.font_weight {
            decls.push(format!("font-weight: {}", weight));
        }
        if let Some(align) = self.text_align {
            let value = match align {
                TextAlign::Left => "left",
                TextAlign::Center => "center",
                TextAlign::Right => "right",
                TextAlign::Justify => "justify",
            };
            decls.push(format!("text-align: {}", value));
        }
        if let Some(spacing) = &self.letter_spacing {
            decls.push(format!("letter-spacing: {}", spacing));
        }
        if let Some(line_height) = self.line_height {
            decls.push(format!("line-height: {}", line_height));
        }
        if let Some(transform) = self.text_transform {
            let value = match transform {
                TextTransform::None => "none",
                TextTransform::Uppercase => "uppercase",
                TextTransform::Lowercase => "lowercase",
                TextTransform::Capitalize => "capitalize",
            };
            decls.push(format!("text-transform: {}", value));
        }
        decls.join("; ")
    }
}

/// Fields rendered with the heading font.
pub fn is_heading_field(field: &FieldName) -> bool {
    matches!(
        field,
        FieldName::Title | FieldName::LogoText | FieldName::Badge
    ) || field.as_str().contains("heading")
}

/// Fields that adopt the section accent color.
pub fn is_accent_field(field: &FieldName) -> bool {
    matches!(
        field,
        FieldName::AccentHeading | FieldName::Badge | FieldName::Price
    )
}

/// Computes the final style of `field` in `section`, optionally for one item.
pub fn resolve_element_style(
    page: &Page,
    section: &Section,
    field: &FieldName,
    item: Option<&Item>,
) -> ResolvedStyle {
    let font_family = if is_heading_field(field) {
        &page.typography.heading_font
    } else {
        &page.typography.body_font
    };
    let mut style = ResolvedStyle {
        font_family: font_family.clone(),
        color: page.color_scheme.text.clone(),
        ..Default::default()
    };

    let content = &section.content;
    if let Some(text_color) = &content.text_color {
        style.color = text_color.clone();
    }
    if is_accent_field(field) {
        if let Some(accent) = &content.accent_color {
            style.color = accent.clone();
        }
    }

    if let Some(section_override) = content.element_styles.get(field) {
        style.apply(section_override);
    }
    if let Some(item_override) = item.and_then(|i| i.style_overrides.get(field)) {
        style.apply(item_override);
    }
    style
}

/// The override record an editing panel shows for `field`: the item's record
/// if it has one, else the section's, else an empty record.
pub fn get_element_style_override(
    section: &Section,
    field: &FieldName,
    item: Option<&Item>,
) -> StyleOverride {
    item.and_then(|i| i.style_overrides.get(field))
        .or_else(|| section.content.element_styles.get(field))
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::model::{ColorScheme, FontWeight, SectionType, Typography};

    fn page() -> Page {
        Page::new("Styles")
            .with_color_scheme(ColorScheme {
                text: "#111".to_string(),
                ..Default::default()
            })
            .with_typography(Typography {
                heading_font: "Playfair Display".to_string(),
                body_font: "Inter".to_string(),
            })
    }

    #[test]
    fn test_heading_heuristic() {
        assert!(is_heading_field(&FieldName::Heading));
        assert!(is_heading_field(&FieldName::Subheading));
        assert!(is_heading_field(&FieldName::LogoText));
        assert!(is_heading_field(&FieldName::from("cardheading")));
        assert!(!is_heading_field(&FieldName::AccentHeading));
        assert!(!is_heading_field(&FieldName::from("cardHeading")));
        assert!(!is_heading_field(&FieldName::Description));
        assert!(!is_heading_field(&FieldName::Price));
    }

    #[test]
    fn test_page_defaults() {
        let page = page();
        let section = Section::new("s-1", SectionType::Hero);

        let heading = resolve_element_style(&page, &section, &FieldName::Heading, None);
        assert_eq!(heading.font_family, "Playfair Display");
        assert_eq!(heading.color, "#111");

        let body = resolve_element_style(&page, &section, &FieldName::Description, None);
        assert_eq!(body.font_family, "Inter");
        assert_eq!(body.font_size, None);
    }

    #[test]
    fn test_section_colors() {
        let page = page();
        let mut section = Section::new("s-1", SectionType::Pricing);
        section.content.text_color = Some("#eee".to_string());
        section.content.accent_color = Some("#f00".to_string());

        let price = resolve_element_style(&page, &section, &FieldName::Price, None);
        assert_eq!(price.color, "#f00");
        let title = resolve_element_style(&page, &section, &FieldName::Title, None);
        assert_eq!(title.color, "#eee");
    }

    #[test]
    fn test_precedence_chain() {
        let page = page();
        let mut section = Section::new("s-1", SectionType::Features);
        section.content.element_styles.insert(
            FieldName::Heading,
            StyleOverride::default().with_color("#222"),
        );
        let mut item = Item::new("i-1");
        item.style_overrides.insert(
            FieldName::Heading,
            StyleOverride::default().with_color("#333"),
        );

        let resolved = resolve_element_style(&page, &section, &FieldName::Heading, Some(&item));
        assert_eq!(resolved.color, "#333");

        item.style_overrides.clear();
        let resolved = resolve_element_style(&page, &section, &FieldName::Heading, Some(&item));
        assert_eq!(resolved.color, "#222");

        section.content.element_styles.clear();
        let resolved = resolve_element_style(&page, &section, &FieldName::Heading, Some(&item));
        assert_eq!(resolved.color, "#111");
    }

    #[test]
    fn test_sub_properties_layer_independently() {
        let page = page();
        let mut section = Section::new("s-1", SectionType::Hero);
        section.content.element_styles.insert(
            FieldName::Heading,
            StyleOverride::default()
                .with_font_size(48.0)
                .with_font_weight(FontWeight::Bold)
                .with_text_align(TextAlign::Center),
        );
        let mut item = Item::new("i-1");
        item.style_overrides.insert(
            FieldName::Heading,
            StyleOverride::default().with_font_weight(FontWeight::Medium),
        );

        let resolved = resolve_element_style(&page, &section, &FieldName::Heading, Some(&item));
        assert_eq!(resolved.font_size.as_deref(), Some("48px"));
        assert_eq!(resolved.font_weight, Some(500));
        assert_eq!(resolved.text_align, Some(TextAlign::Center));
        assert!(resolved.to_css().contains("font-size: 48px"));
    }

    #[test]
    fn test_override_accessor() {
        let mut section = Section::new("s-1", SectionType::Hero);
        section.content.element_styles.insert(
            FieldName::Heading,
            StyleOverride::default().with_color("#222"),
        );
        let mut item = Item::new("i-1");

        assert_eq!(
            get_element_style_override(&section, &FieldName::Heading, Some(&item)).color,
            Some("#222".to_string())
        );

        item.style_overrides.insert(
            FieldName::Heading,
            StyleOverride::default().with_font_size(12.0),
        );
        let record = get_element_style_override(&section, &FieldName::Heading, Some(&item));
        assert_eq!(record.font_size, Some(12.0));
        assert_eq!(record.color, None);

        assert!(get_element_style_override(&section, &FieldName::Badge, None).is_empty());
    }
}
