//! Breakpoint override resolution.
//!
//! Desktop is the base record. Tablet and mobile store *partial* patches in
//! `Element::breakpoint_overrides`; the effective element at a tier is the base
//! with that tier's patch merged on top. Readers (editor canvas, published
//! viewer, static emitter) must go through [`get_element_at_breakpoint`] rather
//! than merging themselves.

use std::borrow::Cow;

use tracing::debug;

use crate::page::merge::{deep_merge, merged, NullPolicy};
use crate::page::model::{Breakpoint, BreakpointOverride, Element, Page};

/// Effective element at `tier`.
///
/// Borrows the input unchanged for desktop and for tiers without an override.
pub fn get_element_at_breakpoint(element: &Element, tier: Breakpoint) -> Cow<'_, Element> {
    if tier.is_base() {
        return Cow::Borrowed(element);
    }
    let Some(patch) = element.breakpoint_override(tier) else {
        return Cow::Borrowed(element);
    };

    let mut resolved = element.clone();
    if let Some(position) = &patch.position {
        resolved.position.apply(position);
    }
    if let Some(content) = &patch.content {
        resolved.content = merged(&element.content, content, NullPolicy::Remove);
    }
    if let Some(styles) = &patch.styles {
        resolved.styles = merged(&element.styles, styles, NullPolicy::Remove);
    }
    if let Some(visible) = patch.visible {
        resolved.visible = visible;
    }
    Cow::Owned(resolved)
}

/// True when `tier` carries any overridden field. Always false for desktop.
pub fn has_breakpoint_overrides(element: &Element, tier: Breakpoint) -> bool {
    if tier.is_base() {
        return false;
    }
    element
        .breakpoint_override(tier)
        .is_some_and(|patch| !patch.is_empty())
}

/// Override tiers that carry a patch, mobile first.
pub fn get_overridden_breakpoints(element: &Element) -> Vec<Breakpoint> {
    Breakpoint::OVERRIDE_TIERS
        .into_iter()
        .filter(|tier| has_breakpoint_overrides(element, *tier))
        .collect()
}

/// Returns a copy of `element` with `patch` written to `tier`.
///
/// Desktop edits land on the base fields permanently; other tiers merge the
/// patch into whatever that tier already overrides.
pub fn set_breakpoint_override(
    element: &Element,
    tier: Breakpoint,
    patch: &BreakpointOverride,
) -> Element {
    let mut next = element.clone();
    write_breakpoint_override(&mut next, tier, patch);
    next
}

/// Returns a copy of `element` without the `tier` override.
pub fn clear_breakpoint_overrides(element: &Element, tier: Breakpoint) -> Element {
    let mut next = element.clone();
    remove_breakpoint_override(&mut next, tier);
    next
}

/// Returns a copy of `element` without any override map.
pub fn clear_all_breakpoint_overrides(element: &Element) -> Element {
    let mut next = element.clone();
    next.breakpoint_overrides = None;
    next
}

/// In-place form of [`set_breakpoint_override`].
pub fn write_breakpoint_override(element: &mut Element, tier: Breakpoint, patch: &BreakpointOverride) {
    if tier.is_base() {
        if let Some(position) = &patch.position {
            element.position.apply(position);
        }
        if let Some(content) = &patch.content {
            deep_merge(&mut element.content, content, NullPolicy::Remove);
        }
        if let Some(styles) = &patch.styles {
            deep_merge(&mut element.styles, styles, NullPolicy::Remove);
        }
        if let Some(visible) = patch.visible {
            element.visible = visible;
        }
        return;
    }

    let overrides = element.breakpoint_overrides.get_or_insert_with(Default::default);
    let existing = overrides.entry(tier).or_default();
    if let Some(position) = &patch.position {
        existing
            .position
            .get_or_insert_with(Default::default)
            .merge(position);
    }
    if let Some(content) = &patch.content {
        deep_merge(
            existing.content.get_or_insert_with(Default::default),
            content,
            NullPolicy::Keep,
        );
    }
    if let Some(styles) = &patch.styles {
        deep_merge(
            existing.styles.get_or_insert_with(Default::default),
            styles,
            NullPolicy::Keep,
        );
    }
    if patch.visible.is_some() {
        existing.visible = patch.visible;
    }
    // An empty incoming patch must not leave an empty container behind.
    if existing.is_empty() {
        overrides.remove(&tier);
    }
    if overrides.is_empty() {
        element.breakpoint_overrides = None;
    }
}

/// In-place form of [`clear_breakpoint_overrides`]. Returns false when nothing
/// was removed, which is always the case for desktop.
pub fn remove_breakpoint_override(element: &mut Element, tier: Breakpoint) -> bool {
    if tier.is_base() {
        debug!(element = %element.id, "desktop is the base tier and cannot be cleared");
        return false;
    }
    let Some(overrides) = element.breakpoint_overrides.as_mut() else {
        return false;
    };
    let removed = overrides.remove(&tier).is_some();
    if overrides.is_empty() {
        element.breakpoint_overrides = None;
    }
    removed
}

/// Collapses every element of the page to `tier` and drops the override maps.
/// This is the shape handed to static emitters.
pub fn resolve_page_at_breakpoint(page: &Page, tier: Breakpoint) -> Page {
    let mut resolved = page.clone();
    for section in &mut resolved.sections {
        for element in &mut section.elements {
            let effective = get_element_at_breakpoint(element, tier).into_owned();
            *element = effective;
            element.breakpoint_overrides = None;
        }
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::model::{ElementType, Position, PositionPatch, Section, SectionType};
    use serde_json::{json, Value};

    fn button() -> Element {
        Element::new("el-1", ElementType::Button)
            .with_position(Position::new(10.0, 20.0))
            .with_content("text", "Buy now")
            .with_content("buttonText", "Checkout")
            .with_style("background", "#000")
    }

    #[test]
    fn test_desktop_resolution_is_identity() {
        let element = set_breakpoint_override(
            &button(),
            Breakpoint::Tablet,
            &BreakpointOverride::default().with_position(PositionPatch::x(50.0)),
        );

        let resolved = get_element_at_breakpoint(&element, Breakpoint::Desktop);
        assert!(matches!(resolved, Cow::Borrowed(_)));
        assert!(std::ptr::eq(resolved.as_ref(), &element));
    }

    #[test]
    fn test_tier_without_override_is_identity() {
        let element = button();
        let resolved = get_element_at_breakpoint(&element, Breakpoint::Mobile);
        assert!(matches!(resolved, Cow::Borrowed(_)));
    }

    #[test]
    fn test_position_merge() {
        let element = set_breakpoint_override(
            &button(),
            Breakpoint::Tablet,
            &BreakpointOverride::default().with_position(PositionPatch::x(50.0)),
        );

        let tablet = get_element_at_breakpoint(&element, Breakpoint::Tablet);
        assert_eq!(tablet.position, Position::new(50.0, 20.0));
        assert_eq!(element.position, Position::new(10.0, 20.0));
    }

    #[test]
    fn test_override_partiality() {
        let element = set_breakpoint_override(
            &button(),
            Breakpoint::Mobile,
            &BreakpointOverride::default().with_content("text", "Buy"),
        );

        let mobile = get_element_at_breakpoint(&element, Breakpoint::Mobile);
        assert_eq!(mobile.content["text"], "Buy");
        assert_eq!(mobile.content["buttonText"], "Checkout");
        assert_eq!(mobile.styles["background"], "#000");
    }

    #[test]
    fn test_visibility_override() {
        let element = set_breakpoint_override(
            &button(),
            Breakpoint::Mobile,
            &BreakpointOverride::default().with_visible(false),
        );

        assert!(!get_element_at_breakpoint(&element, Breakpoint::Mobile).visible);
        assert!(get_element_at_breakpoint(&element, Breakpoint::Tablet).visible);
        assert!(element.visible);
    }

    #[test]
    fn test_base_change_surfaces_at_tier() {
        let mut element = set_breakpoint_override(
            &button(),
            Breakpoint::Tablet,
            &BreakpointOverride::default().with_content("text", "Tablet text"),
        );
        write_breakpoint_override(
            &mut element,
            Breakpoint::Desktop,
            &BreakpointOverride::default()
                .with_content("buttonText", "Pay")
                .with_content("text", "Desktop text"),
        );

        let tablet = get_element_at_breakpoint(&element, Breakpoint::Tablet);
        assert_eq!(tablet.content["buttonText"], "Pay");
        assert_eq!(tablet.content["text"], "Tablet text");
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let element = set_breakpoint_override(
            &button(),
            Breakpoint::Mobile,
            &BreakpointOverride::default()
                .with_position(PositionPatch::xy(5.0, 6.0))
                .with_content("text", Value::Null)
                .with_style("border", json!({"width": 2})),
        );

        for tier in [Breakpoint::Desktop, Breakpoint::Tablet, Breakpoint::Mobile] {
            let once = get_element_at_breakpoint(&element, tier).into_owned();
            let twice = get_element_at_breakpoint(&once, tier).into_owned();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_null_resets_key_at_tier_only() {
        let element = set_breakpoint_override(
            &button(),
            Breakpoint::Mobile,
            &BreakpointOverride::default().with_content("text", Value::Null),
        );

        let mobile = get_element_at_breakpoint(&element, Breakpoint::Mobile);
        assert!(!mobile.content.contains_key("text"));
        assert_eq!(
            element.breakpoint_override(Breakpoint::Mobile).unwrap().content.as_ref().unwrap()["text"],
            Value::Null
        );
        assert_eq!(element.content["text"], "Buy now");
    }

    #[test]
    fn test_patches_accumulate_per_tier() {
        let first = set_breakpoint_override(
            &button(),
            Breakpoint::Tablet,
            &BreakpointOverride::default()
                .with_position(PositionPatch::x(40.0))
                .with_style("border", json!({"width": 1, "color": "#111"})),
        );
        let second = set_breakpoint_override(
            &first,
            Breakpoint::Tablet,
            &BreakpointOverride::default()
                .with_position(PositionPatch {
                    y: Some(70.0),
                    ..Default::default()
                })
                .with_style("border", json!({"color": "#222"})),
        );

        let stored = second.breakpoint_override(Breakpoint::Tablet).unwrap();
        assert_eq!(stored.position, Some(PositionPatch::xy(40.0, 70.0)));
        assert_eq!(
            stored.styles.as_ref().unwrap()["border"],
            json!({"width": 1, "color": "#222"})
        );
    }

    #[test]
    fn test_desktop_patch_edits_base() {
        let element = set_breakpoint_override(
            &button(),
            Breakpoint::Desktop,
            &BreakpointOverride::default()
                .with_position(PositionPatch::x(33.0))
                .with_content("text", Value::Null),
        );

        assert_eq!(element.position.x, 33.0);
        assert!(!element.content.contains_key("text"));
        assert!(element.breakpoint_overrides.is_none());
    }

    #[test]
    fn test_has_and_list_overrides() {
        let mut element = button();
        assert!(get_overridden_breakpoints(&element).is_empty());

        write_breakpoint_override(
            &mut element,
            Breakpoint::Tablet,
            &BreakpointOverride::default().with_visible(false),
        );
        write_breakpoint_override(
            &mut element,
            Breakpoint::Mobile,
            &BreakpointOverride::default().with_content("text", "Hi"),
        );

        assert!(has_breakpoint_overrides(&element, Breakpoint::Tablet));
        assert!(!has_breakpoint_overrides(&element, Breakpoint::Desktop));
        assert_eq!(
            get_overridden_breakpoints(&element),
            vec![Breakpoint::Mobile, Breakpoint::Tablet]
        );
    }

    #[test]
    fn test_clear_semantics() {
        let element = set_breakpoint_override(
            &button(),
            Breakpoint::Mobile,
            &BreakpointOverride::default().with_content("text", "Hi"),
        );

        assert_eq!(clear_breakpoint_overrides(&element, Breakpoint::Desktop), element);

        let cleared = clear_breakpoint_overrides(&element, Breakpoint::Mobile);
        assert!(cleared.breakpoint_overrides.is_none());
        let json = serde_json::to_value(&cleared).unwrap();
        assert!(json.get("breakpointOverrides").is_none());
    }

    #[test]
    fn test_clear_one_tier_keeps_others() {
        let mut element = button();
        write_breakpoint_override(
            &mut element,
            Breakpoint::Tablet,
            &BreakpointOverride::default().with_visible(false),
        );
        write_breakpoint_override(
            &mut element,
            Breakpoint::Mobile,
            &BreakpointOverride::default().with_visible(false),
        );

        assert!(remove_breakpoint_override(&mut element, Breakpoint::Mobile));
        assert_eq!(get_overridden_breakpoints(&element), vec![Breakpoint::Tablet]);
        assert!(clear_all_breakpoint_overrides(&element).breakpoint_overrides.is_none());
    }

    #[test]
    fn test_empty_patch_leaves_no_container() {
        let element = set_breakpoint_override(
            &button(),
            Breakpoint::Tablet,
            &BreakpointOverride::default(),
        );
        assert!(element.breakpoint_overrides.is_none());
    }

    #[test]
    fn test_resolve_page_collapses_overrides() {
        let element = set_breakpoint_override(
            &button(),
            Breakpoint::Mobile,
            &BreakpointOverride::default().with_position(PositionPatch::x(80.0)),
        );
        let page = Page::new("Test")
            .with_section(Section::new("s-1", SectionType::Hero).with_element(element));

        let mobile = resolve_page_at_breakpoint(&page, Breakpoint::Mobile);
        let resolved = &mobile.sections[0].elements[0];
        assert_eq!(resolved.position.x, 80.0);
        assert!(resolved.breakpoint_overrides.is_none());

        let desktop = resolve_page_at_breakpoint(&page, Breakpoint::Desktop);
        assert_eq!(desktop.sections[0].elements[0].position.x, 10.0);
    }
}
