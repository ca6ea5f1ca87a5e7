//! Recursive merge of JSON records.
//!
//! Plain nested objects merge key by key; every other value (arrays included)
//! replaces the target wholesale.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::{EditorError, EditorResult};
use crate::page::model::Record;

/// What a `null` in the source record does to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullPolicy {
    /// Store the `null` like any other value (stored override patches).
    Keep,
    /// Delete the key from the target (resolution and base edits).
    Remove,
}

/// Merges `source` into `target`; source leaves win.
pub fn deep_merge(target: &mut Record, source: &Record, nulls: NullPolicy) {
    for (key, value) in source {
        match value {
            Value::Null if nulls == NullPolicy::Remove => {
                target.remove(key);
            }
            Value::Object(source_obj) => match target.get_mut(key) {
                Some(Value::Object(target_obj)) => deep_merge(target_obj, source_obj, nulls),
                _ => {
                    let mut fresh = Record::new();
                    deep_merge(&mut fresh, source_obj, nulls);
                    target.insert(key.clone(), Value::Object(fresh));
                }
            },
            other => {
                target.insert(key.clone(), other.clone());
            }
        }
    }
}

/// Returns `base` with `overlay` merged on top.
pub fn merged(base: &Record, overlay: &Record, nulls: NullPolicy) -> Record {
    let mut out = base.clone();
    deep_merge(&mut out, overlay, nulls);
    out
}

/// Applies a JSON patch to a typed record by round-tripping it through JSON.
/// `null` in the patch clears the field.
pub fn patch_record<T>(record: &T, patch: &Record) -> EditorResult<T>
where
    T: Serialize + DeserializeOwned,
{
    let mut value = match serde_json::to_value(record)? {
        Value::Object(map) => map,
        _ => return Err(EditorError::invalid_patch("record is not a JSON object")),
    };
    deep_merge(&mut value, patch, NullPolicy::Remove);
    serde_json::from_value(Value::Object(value))
        .map_err(|e| EditorError::invalid_patch(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::model::{Item, SectionContent};
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_nested_objects_merge_per_leaf() {
        let base = record(json!({"border": {"width": 1, "color": "#000"}, "text": "a"}));
        let overlay = record(json!({"border": {"color": "#fff"}}));

        let out = merged(&base, &overlay, NullPolicy::Remove);
        assert_eq!(
            Value::Object(out),
            json!({"border": {"width": 1, "color": "#fff"}, "text": "a"})
        );
    }

    #[test]
    fn test_arrays_replace_wholesale() {
        let base = record(json!({"links": ["a", "b", "c"]}));
        let overlay = record(json!({"links": ["z"]}));

        let out = merged(&base, &overlay, NullPolicy::Remove);
        assert_eq!(out["links"], json!(["z"]));
    }

    #[test]
    fn test_null_policies() {
        let base = record(json!({"text": "Buy", "icon": "cart"}));
        let overlay = record(json!({"text": null}));

        let removed = merged(&base, &overlay, NullPolicy::Remove);
        assert!(!removed.contains_key("text"));
        assert_eq!(removed["icon"], "cart");

        let kept = merged(&base, &overlay, NullPolicy::Keep);
        assert_eq!(kept["text"], Value::Null);
    }

    #[test]
    fn test_null_inside_new_object_is_dropped_on_remove() {
        let base = Record::new();
        let overlay = record(json!({"shadow": {"blur": null, "x": 2}}));

        let out = merged(&base, &overlay, NullPolicy::Remove);
        assert_eq!(out["shadow"], json!({"x": 2}));
    }

    #[test]
    fn test_patch_typed_record() {
        let content = SectionContent::default()
            .with_heading("Old")
            .with_subheading("Sub")
            .with_field("buttonText", "Go");
        let patch = record(json!({"heading": "New", "subheading": null, "logoText": "ACME"}));

        let patched = patch_record(&content, &patch).unwrap();
        assert_eq!(patched.heading.as_deref(), Some("New"));
        assert_eq!(patched.subheading, None);
        assert_eq!(patched.fields["buttonText"], "Go");
        assert_eq!(patched.fields["logoText"], "ACME");
    }

    #[test]
    fn test_patch_with_wrong_shape_is_rejected() {
        let item = Item::new("i-1");
        let patch = record(json!({"features": "not-a-list"}));

        assert!(matches!(
            patch_record(&item, &patch),
            Err(EditorError::InvalidPatch(_))
        ));
    }
}
