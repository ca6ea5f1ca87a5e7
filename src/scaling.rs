//! Responsive scaling helpers.
//!
//! Absolutely positioned elements are authored against a reference design
//! width. These functions map authored values to a runtime container width so
//! the canvas stays proportional without per-breakpoint authoring. All of them
//! are pure and total.

use serde::{Deserialize, Serialize};

/// Reference canvas width used when a page does not declare its own.
pub const DEFAULT_DESIGN_WIDTH: f64 = 1200.0;

/// Smallest spacing a scaled gap may shrink to, in pixels.
const MIN_SPACING: f64 = 4.0;
/// Largest growth factor applied to spacing.
const MAX_SPACING_GROWTH: f64 = 1.5;
/// Smallest radius a rounded corner may shrink to, in pixels.
const MIN_BORDER_RADIUS: f64 = 2.0;

/// Ratio of actual to reference width. Returns 1 for a non-positive design width.
pub fn scale_factor(container_width: f64, design_width: f64) -> f64 {
    if design_width <= 0.0 || !design_width.is_finite() || !container_width.is_finite() {
        return 1.0;
    }
    container_width / design_width
}

pub fn scale_value(value: f64, factor: f64) -> f64 {
    value * factor
}

/// Scales `value`, then clamps to whichever bounds are given.
pub fn scale_value_clamped(value: f64, factor: f64, min: Option<f64>, max: Option<f64>) -> f64 {
    let mut scaled = scale_value(value, factor);
    if let Some(max) = max {
        scaled = scaled.min(max);
    }
    if let Some(min) = min {
        scaled = scaled.max(min);
    }
    scaled
}

/// Text role used to pick font-size bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextRole {
    Button,
    Heading,
    Subheading,
    Paragraph,
    Caption,
    Badge,
}

/// Inclusive font-size range in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontBounds {
    pub min: f64,
    pub max: f64,
}

impl TextRole {
    pub fn bounds(self) -> FontBounds {
        let (min, max) = match self {
            TextRole::Button => (12.0, 24.0),
            TextRole::Heading => (24.0, 96.0),
            TextRole::Subheading => (16.0, 40.0),
            TextRole::Paragraph => (14.0, 24.0),
            TextRole::Caption => (10.0, 16.0),
            TextRole::Badge => (10.0, 18.0),
        };
        FontBounds { min, max }
    }
}

/// A scaled font size in both discrete and fluid form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaledFontSize {
    /// Clamped pixel value for the given factor.
    pub px: f64,
    /// `clamp(min, fluid, max)` expression for renderers that prefer fluid type.
    pub css: String,
}

/// Scales a font size and clamps it to the role's bounds.
pub fn scale_font_size(base: f64, factor: f64, role: TextRole) -> ScaledFontSize {
    let FontBounds { min, max } = role.bounds();
    let px = scale_value_clamped(base, factor, Some(min), Some(max));
    let vw = base / DEFAULT_DESIGN_WIDTH * 100.0;
    ScaledFontSize {
        px,
        css: format!("clamp({}px, {:.4}vw, {}px)", min, vw, max),
    }
}

/// Scales a gap or padding. Never shrinks below 4px (or the authored value if
/// smaller) and never grows past 1.5x the authored value.
pub fn scale_spacing(value: f64, factor: f64) -> f64 {
    let floor = value.min(MIN_SPACING);
    let ceiling = value * MAX_SPACING_GROWTH;
    scale_value(value, factor).clamp(floor.min(ceiling), ceiling.max(floor))
}

/// Scales a corner radius. Never shrinks below 2px (or the authored value if
/// smaller) and never grows past the authored value.
pub fn scale_border_radius(value: f64, factor: f64) -> f64 {
    let floor = value.min(MIN_BORDER_RADIUS);
    scale_value(value, factor).clamp(floor.min(value), value.max(floor))
}
