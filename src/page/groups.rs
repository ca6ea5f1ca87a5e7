//! Element grouping.
//!
//! The authoritative membership of a group is the set of elements whose
//! `group_id` points at it. [`GroupIndex`] is a materialized view over those
//! back-references with a cached bounding box, and every method here updates
//! both sides together.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::page::breakpoints::{get_element_at_breakpoint, write_breakpoint_override};
use crate::page::model::{
    clamp_percent, Breakpoint, BreakpointOverride, ElementGroup, GroupBounds, Page, PositionPatch,
};

/// Minimum number of members a group may have.
pub const MIN_GROUP_SIZE: usize = 2;

/// Group records keyed by group id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupIndex {
    groups: BTreeMap<String, ElementGroup>,
}

impl GroupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, group_id: &str) -> Option<&ElementGroup> {
        self.groups.get(group_id)
    }

    pub fn contains(&self, group_id: &str) -> bool {
        self.groups.contains_key(group_id)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ElementGroup> {
        self.groups.values()
    }

    /// Group the element currently belongs to, according to the index.
    pub fn group_of(&self, element_id: &str) -> Option<&ElementGroup> {
        self.groups
            .values()
            .find(|g| g.element_ids.iter().any(|id| id == element_id))
    }

    /// Recomputes the index from the page's back-references. Groups with fewer
    /// than two members are dissolved and their back-references cleared.
    /// Empty override maps left by the source document are dropped.
    pub fn rebuild_from_page(page: &mut Page) -> Self {
        for section in &mut page.sections {
            for element in &mut section.elements {
                element.normalize_overrides();
            }
        }

        let mut members: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for element in page.elements() {
            if let Some(group_id) = &element.group_id {
                members
                    .entry(group_id.clone())
                    .or_default()
                    .push(element.id.clone());
            }
        }

        let mut index = GroupIndex::new();
        for (group_id, element_ids) in members {
            if element_ids.len() < MIN_GROUP_SIZE {
                for id in &element_ids {
                    if let Some(element) = page.find_element_mut(id) {
                        element.group_id = None;
                    }
                }
                debug!(group = %group_id, "dropped under-sized group while rebuilding index");
                continue;
            }
            let bounds = member_bounds(page, &element_ids).unwrap_or_default();
            index.groups.insert(
                group_id.clone(),
                ElementGroup {
                    id: group_id,
                    element_ids,
                    bounds,
                },
            );
        }
        index
    }

    /// Distinct ids from `element_ids` that exist on the page, in input order.
    pub fn groupable_ids(page: &Page, element_ids: &[String]) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(element_ids.len());
        for id in element_ids {
            if !out.contains(id) && page.find_element(id).is_some() {
                out.push(id.clone());
            }
        }
        out
    }

    /// Groups the given elements under `group_id`.
    ///
    /// Members leave their previous groups first; a previous group left with
    /// fewer than two members dissolves. Returns `None` (and changes nothing)
    /// when fewer than two of the ids exist.
    pub fn create_group(
        &mut self,
        page: &mut Page,
        group_id: impl Into<String>,
        element_ids: &[String],
    ) -> Option<String> {
        let group_id = group_id.into();
        let members = Self::groupable_ids(page, element_ids);
        if members.len() < MIN_GROUP_SIZE {
            debug!(requested = element_ids.len(), "create_group needs at least two elements");
            return None;
        }

        for id in &members {
            self.release_member(page, id);
        }

        let bounds = member_bounds(page, &members).unwrap_or_default();
        for id in &members {
            if let Some(element) = page.find_element_mut(id) {
                element.group_id = Some(group_id.clone());
            }
        }
        self.groups.insert(
            group_id.clone(),
            ElementGroup {
                id: group_id.clone(),
                element_ids: members,
                bounds,
            },
        );
        Some(group_id)
    }

    /// Dissolves a group, clearing every member's back-reference.
    pub fn ungroup(&mut self, page: &mut Page, group_id: &str) -> bool {
        let Some(group) = self.groups.remove(group_id) else {
            debug!(group = %group_id, "ungroup on missing group");
            return false;
        };
        for id in &group.element_ids {
            if let Some(element) = page.find_element_mut(id) {
                element.group_id = None;
            }
        }
        true
    }

    /// Translates every member by the delta, clamping each coordinate to
    /// [0, 100], then recomputes the cached box. Off the base tier, positions
    /// are written as breakpoint overrides and the box is unchanged.
    pub fn move_group(
        &mut self,
        page: &mut Page,
        group_id: &str,
        dx: f64,
        dy: f64,
        tier: Breakpoint,
    ) -> bool {
        let Some(group) = self.groups.get_mut(group_id) else {
            debug!(group = %group_id, "move on missing group");
            return false;
        };

        for id in &group.element_ids {
            let Some(element) = page.find_element_mut(id) else {
                continue;
            };
            let current = get_element_at_breakpoint(element, tier).position;
            let patch = BreakpointOverride::default().with_position(PositionPatch::xy(
                clamp_percent(current.x + dx),
                clamp_percent(current.y + dy),
            ));
            write_breakpoint_override(element, tier, &patch);
        }
        if let Some(bounds) = member_bounds(page, &group.element_ids) {
            group.bounds = bounds;
        }
        true
    }

    /// Recomputes the cached box of the group holding `element_id` after its
    /// base position changed. Returns false when the element is ungrouped.
    pub fn refresh_bounds_of(&mut self, page: &Page, element_id: &str) -> bool {
        let Some(group) = self
            .groups
            .values_mut()
            .find(|g| g.element_ids.iter().any(|id| id == element_id))
        else {
            return false;
        };
        if let Some(bounds) = member_bounds(page, &group.element_ids) {
            group.bounds = bounds;
        }
        true
    }

    /// Removes an element from whatever group holds it.
    ///
    /// The group shrinks (bounds recomputed) or, below two members, dissolves
    /// and the survivor's back-reference is cleared. Safe to call after the
    /// element itself has been deleted from the page.
    pub fn release_member(&mut self, page: &mut Page, element_id: &str) {
        if let Some(element) = page.find_element_mut(element_id) {
            element.group_id = None;
        }
        let Some(group_id) = self.group_of(element_id).map(|g| g.id.clone()) else {
            return;
        };
        let Some(group) = self.groups.get_mut(&group_id) else {
            return;
        };

        group.element_ids.retain(|id| id != element_id);
        if group.element_ids.len() < MIN_GROUP_SIZE {
            debug!(group = %group_id, "group dissolved after losing a member");
            self.ungroup(page, &group_id);
            return;
        }
        if let Some(bounds) = member_bounds(page, &group.element_ids) {
            group.bounds = bounds;
        }
    }

    /// True when every record matches the page's back-references and base
    /// positions, and no element points at a missing group.
    pub fn is_consistent_with(&self, page: &Page) -> bool {
        let records_match = self.groups.values().all(|group| {
            group.element_ids.len() >= MIN_GROUP_SIZE
                && group.element_ids.iter().all(|id| {
                    page.find_element(id)
                        .is_some_and(|e| e.group_id.as_deref() == Some(group.id.as_str()))
                })
                && member_bounds(page, &group.element_ids) == Some(group.bounds)
        });
        let back_refs_match = page.elements().all(|element| match &element.group_id {
            Some(group_id) => self
                .groups
                .get(group_id)
                .is_some_and(|g| g.element_ids.contains(&element.id)),
            None => true,
        });
        records_match && back_refs_match
    }
}

/// Bounding box over the base positions of the listed elements.
fn member_bounds(page: &Page, element_ids: &[String]) -> Option<GroupBounds> {
    GroupBounds::from_positions(
        page.elements()
            .filter(|e| element_ids.contains(&e.id))
            .map(|e| &e.position),
    )
}
