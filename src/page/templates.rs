//! Built-in page templates and per-type starter content.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{EditorError, EditorResult};
use crate::page::model::{
    new_id, Element, ElementType, Item, Page, Position, Section, SectionContent, SectionType,
    Typography,
};
use crate::scaling::DEFAULT_DESIGN_WIDTH;

const BLANK: &[SectionType] = &[];
const LANDING: &[SectionType] = &[
    SectionType::Header,
    SectionType::Hero,
    SectionType::Features,
    SectionType::Testimonials,
    SectionType::Cta,
    SectionType::Footer,
];
const PORTFOLIO: &[SectionType] = &[
    SectionType::Header,
    SectionType::Hero,
    SectionType::Gallery,
    SectionType::About,
    SectionType::Contact,
    SectionType::Footer,
];
const PRODUCT: &[SectionType] = &[
    SectionType::Header,
    SectionType::Hero,
    SectionType::Features,
    SectionType::Pricing,
    SectionType::Faq,
    SectionType::Footer,
];

/// Starter pages a session can be created from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    Blank,
    Landing,
    Portfolio,
    Product,
}

impl Template {
    pub const ALL: [Template; 4] = [
        Template::Blank,
        Template::Landing,
        Template::Portfolio,
        Template::Product,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Template::Blank => "blank",
            Template::Landing => "landing",
            Template::Portfolio => "portfolio",
            Template::Product => "product",
        }
    }

    /// Builds a fresh page; every section, item and element gets a new id.
    pub fn instantiate(self) -> Page {
        let (title, sections) = match self {
            Template::Blank => ("Untitled page", BLANK),
            Template::Landing => ("Landing page", LANDING),
            Template::Portfolio => ("Portfolio", PORTFOLIO),
            Template::Product => ("Product", PRODUCT),
        };

        let typography = match self {
            Template::Portfolio => Typography {
                heading_font: "Playfair Display".to_string(),
                body_font: "Inter".to_string(),
            },
            _ => Typography::default(),
        };
        let mut page = Page::new(title).with_typography(typography);
        page.design_width = Some(DEFAULT_DESIGN_WIDTH);
        page.sections = sections.iter().map(|t| default_section(*t)).collect();
        page
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Template {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Template::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| EditorError::unknown_template(s))
    }
}

/// Looks up a template by name and instantiates it.
pub fn instantiate_template(name: &str) -> EditorResult<Page> {
    Ok(name.parse::<Template>()?.instantiate())
}

/// A new section of the given type with starter content and a fresh id.
pub fn default_section(section_type: SectionType) -> Section {
    let section = Section::new(new_id("section"), section_type);
    match section_type {
        SectionType::Header => section.with_content(
            SectionContent::default()
                .with_field("logoText", "Brand")
                .with_field("links", json!(["Features", "Pricing", "Contact"])),
        ),
        SectionType::Hero => section
            .with_content(
                SectionContent::default()
                    .with_heading("Build something people love")
                    .with_subheading("A short sentence about what makes this great.")
                    .with_field("buttonText", "Get started"),
            )
            .with_element(
                default_element(ElementType::Button).with_position(Position::new(50.0, 75.0)),
            ),
        SectionType::Features => section
            .with_content(SectionContent::default().with_heading("Features"))
            .with_item(card("Fast", "Loads in the blink of an eye."))
            .with_item(card("Secure", "Your data stays yours."))
            .with_item(card("Simple", "No manual required.")),
        SectionType::Pricing => section
            .with_content(SectionContent::default().with_heading("Pricing"))
            .with_item(
                Item::new(new_id("item"))
                    .with_title("Starter")
                    .with_price("$9")
                    .with_feature("1 project"),
            )
            .with_item(
                Item::new(new_id("item"))
                    .with_title("Pro")
                    .with_price("$29")
                    .with_feature("Unlimited projects")
                    .with_feature("Priority support"),
            ),
        SectionType::Testimonials => {
            let mut quote = card("Great product", "It changed how our team works.");
            quote.author = Some("Alex Doe".to_string());
            section
                .with_content(SectionContent::default().with_heading("What people say"))
                .with_item(quote)
        }
        SectionType::Faq => section
            .with_content(SectionContent::default().with_heading("Questions"))
            .with_item(card("Can I cancel anytime?", "Yes, from your account page.")),
        SectionType::Team | SectionType::Stats | SectionType::Gallery => section
            .with_content(SectionContent::default().with_heading(heading_for(section_type))),
        SectionType::About => section.with_content(
            SectionContent::default()
                .with_heading("About us")
                .with_subheading("Who we are and why we do it."),
        ),
        SectionType::Cta => section.with_content(
            SectionContent::default()
                .with_heading("Ready to start?")
                .with_field("buttonText", "Sign up"),
        ),
        SectionType::Contact => section.with_content(
            SectionContent::default()
                .with_heading("Get in touch")
                .with_field("email", "hello@example.com"),
        ),
        SectionType::Newsletter => section.with_content(
            SectionContent::default()
                .with_heading("Stay in the loop")
                .with_field("placeholder", "you@example.com")
                .with_field("buttonText", "Subscribe"),
        ),
        SectionType::Footer => section.with_content(
            SectionContent::default().with_field("copyright", "© Brand. All rights reserved."),
        ),
        SectionType::Custom => section,
    }
}

fn heading_for(section_type: SectionType) -> &'static str {
    match section_type {
        SectionType::Team => "Our team",
        SectionType::Stats => "By the numbers",
        _ => "Gallery",
    }
}

fn card(title: &str, description: &str) -> Item {
    Item::new(new_id("item"))
        .with_title(title)
        .with_description(description)
}

/// A new canvas element of the given type with starter content and a fresh id,
/// centered in its section.
pub fn default_element(element_type: ElementType) -> Element {
    let element =
        Element::new(new_id("element"), element_type).with_position(Position::new(50.0, 50.0));
    match element_type {
        ElementType::Button => element
            .with_content("text", "Click me")
            .with_content("url", "#")
            .with_style("borderRadius", 8),
        ElementType::Text => element.with_content("text", "New text"),
        ElementType::Image => element
            .with_content("src", "")
            .with_content("alt", "")
            .with_position(Position::new(50.0, 50.0).with_size(30.0, 20.0)),
        ElementType::Icon => element.with_content("icon", "star"),
        ElementType::Divider => element
            .with_style("thickness", 1)
            .with_position(Position::new(50.0, 50.0).with_size(80.0, 0.0)),
        ElementType::Video => element
            .with_content("url", "")
            .with_position(Position::new(50.0, 50.0).with_size(40.0, 30.0)),
        ElementType::Badge => element.with_content("text", "New"),
        ElementType::Countdown => element.with_content("targetDate", ""),
        ElementType::Form => element
            .with_content("fields", json!(["email"]))
            .with_content("submitText", "Submit"),
        ElementType::Html => element.with_content("html", ""),
        ElementType::Social => element.with_content("networks", json!([])),
    }
}
