//! Document flattening
//!
//! Converts one JSON document into an ordered set of attributes, each a
//! derived column name plus an optional text value.
//!
//! ## Rules
//!
//! | Node | Result |
//! |------|--------|
//! | Non-object root | Single attribute `rootValue` holding the string form |
//! | Object property | Recursed into with path `parentKey_childKey` |
//! | Array | Stored verbatim as serialized JSON text, never expanded |
//! | Null | Null attribute value |
//! | String / number / boolean | Canonical string representation |
//!
//! Nesting depth is unbounded here; callers needing a cap should enforce it
//! before handing the document over.
//!
//! Two different paths can derive the same column name (for example the key
//! `a_b` next to the nested object `{"a": {"b": …}}`). The later-arriving
//! name gets a `_2`, `_3`, … suffix, taking the first integer that is free
//! within the document. The check is exact-name; case-variant names remain
//! distinct attributes and are reconciled against the table by the store
//! layer. Because the scan runs in document order, the suffix assignment
//! depends on key order.

use crate::column::column_name;
use serde_json::Value;
use std::collections::HashSet;

/// Column name used when the document root is not an object
pub const ROOT_VALUE_COLUMN: &str = "rootValue";

/// A single derived attribute: column name plus optional text value.
///
/// `None` means the attribute is present but null (bound as SQL NULL, never
/// the string "null").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Derived column name, unique within one document's attribute set
    pub name: String,
    /// Text value, or `None` for JSON null
    pub value: Option<String>,
}

/// Insertion-ordered set of attributes with unique names.
///
/// Order is the order of first occurrence during traversal. It is not used
/// for correctness, only for stable output.
#[derive(Debug, Clone, Default)]
pub struct AttributeSet {
    entries: Vec<Attribute>,
    names: HashSet<String>,
}

impl AttributeSet {
    /// Add an attribute, resolving name collisions with `_2`, `_3`, …
    ///
    /// Returns the name the attribute was stored under.
    pub fn insert(&mut self, name: String, value: Option<String>) -> &str {
        let name = self.free_name(name);
        self.names.insert(name.clone());
        self.entries.push(Attribute { name, value });
        &self.entries[self.entries.len() - 1].name
    }

    /// First name not yet taken: the candidate itself, or candidate plus the
    /// lowest free integer suffix.
    fn free_name(&self, candidate: String) -> String {
        if !self.names.contains(&candidate) {
            return candidate;
        }
        let mut n = 2u64;
        loop {
            let suffixed = format!("{}_{}", candidate, n);
            if !self.names.contains(&suffixed) {
                return suffixed;
            }
            n += 1;
        }
    }

    /// Iterate attributes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.entries.iter()
    }

    /// Look up an attribute by exact name
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.entries.iter().find(|a| a.name == name)
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the document produced no attributes (empty object root)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a AttributeSet {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Flatten one JSON document into its attribute set.
///
/// Deterministic: a fixed document always yields the same names and values,
/// in the same order.
pub fn flatten(document: &Value) -> AttributeSet {
    let mut attrs = AttributeSet::default();
    match document {
        Value::Object(map) => {
            for (key, value) in map {
                flatten_value(&mut attrs, key, value);
            }
        }
        other => {
            attrs.insert(ROOT_VALUE_COLUMN.to_string(), leaf_text(other));
        }
    }
    attrs
}

/// Visit one node: recurse into objects, emit an attribute for everything
/// else under the derived name for `path`.
fn flatten_value(attrs: &mut AttributeSet, path: &str, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = format!("{}_{}", path, key);
                flatten_value(attrs, &child_path, child);
            }
        }
        other => {
            attrs.insert(column_name(path), leaf_text(other));
        }
    }
}

/// Text form of a non-object node.
///
/// Strings are stored unquoted; arrays keep their serialized JSON form.
fn leaf_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(attrs: &AttributeSet) -> Vec<&str> {
        attrs.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn scalar_root_becomes_root_value() {
        let attrs = flatten(&json!(42));
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get(ROOT_VALUE_COLUMN).unwrap().value, Some("42".to_string()));
    }

    #[test]
    fn string_root_is_unquoted() {
        let attrs = flatten(&json!("hello"));
        assert_eq!(attrs.get(ROOT_VALUE_COLUMN).unwrap().value, Some("hello".to_string()));
    }

    #[test]
    fn array_root_keeps_serialized_form() {
        let attrs = flatten(&json!([1, 2, 3]));
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get(ROOT_VALUE_COLUMN).unwrap().value, Some("[1,2,3]".to_string()));
    }

    #[test]
    fn null_root_is_null_attribute() {
        let attrs = flatten(&json!(null));
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get(ROOT_VALUE_COLUMN).unwrap().value, None);
    }

    #[test]
    fn empty_object_yields_no_attributes() {
        let attrs = flatten(&json!({}));
        assert!(attrs.is_empty());
    }

    #[test]
    fn scalar_properties_keep_document_order() {
        let attrs = flatten(&json!({"b": 1, "a": "x", "ok": true}));
        assert_eq!(names(&attrs), vec!["b", "a", "ok"]);
        assert_eq!(attrs.get("b").unwrap().value, Some("1".to_string()));
        assert_eq!(attrs.get("a").unwrap().value, Some("x".to_string()));
        assert_eq!(attrs.get("ok").unwrap().value, Some("true".to_string()));
    }

    #[test]
    fn nested_objects_join_paths_with_underscore() {
        let attrs = flatten(&json!({"a": 1, "b": {"c": "x", "d": {"e": 2}}}));
        assert_eq!(names(&attrs), vec!["a", "b_c", "b_d_e"]);
    }

    #[test]
    fn arrays_are_not_expanded() {
        let attrs = flatten(&json!({"tags": [1, 2, 3]}));
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get("tags").unwrap().value, Some("[1,2,3]".to_string()));
    }

    #[test]
    fn array_of_objects_stays_verbatim() {
        let attrs = flatten(&json!({"items": [{"id": 1}, {"id": 2}]}));
        assert_eq!(
            attrs.get("items").unwrap().value,
            Some("[{\"id\":1},{\"id\":2}]".to_string())
        );
    }

    #[test]
    fn null_property_maps_to_null_value() {
        let attrs = flatten(&json!({"a": null}));
        assert_eq!(attrs.get("a").unwrap().value, None);
    }

    #[test]
    fn float_keeps_canonical_form() {
        let attrs = flatten(&json!({"v": 1.5}));
        assert_eq!(attrs.get("v").unwrap().value, Some("1.5".to_string()));
    }

    #[test]
    fn colliding_paths_get_integer_suffixes() {
        // The literal key "a_b" and the nested path a.b derive the same name.
        let attrs = flatten(&json!({"a_b": 1, "a": {"b": 2}}));
        assert_eq!(names(&attrs), vec!["a_b", "a_b_2"]);
        assert_eq!(attrs.get("a_b").unwrap().value, Some("1".to_string()));
        assert_eq!(attrs.get("a_b_2").unwrap().value, Some("2".to_string()));
    }

    #[test]
    fn suffix_takes_first_free_integer() {
        // "x" appears three times after normalization: "x", "x!" and "x?".
        let attrs = flatten(&json!({"x": 1, "x!": 2, "x?": 3}));
        assert_eq!(names(&attrs), vec!["x", "x_2", "x_3"]);
    }

    #[test]
    fn suffixed_name_already_taken_skips_ahead() {
        // "a_2" is claimed by a real key before the collision on "a".
        let attrs = flatten(&json!({"a_2": 1, "a": 2, "a!": 3}));
        assert_eq!(names(&attrs), vec!["a_2", "a", "a_3"]);
    }

    #[test]
    fn case_variant_keys_stay_distinct() {
        // Collision handling is exact-name: "a" and "A" do not collide here.
        let attrs = flatten(&json!({"a": 1, "A": 2}));
        assert_eq!(names(&attrs), vec!["a", "A"]);
    }

    #[test]
    fn keys_needing_sanitization_flatten_under_derived_names() {
        let attrs = flatten(&json!({"user name": "x", "2fast": true}));
        assert_eq!(names(&attrs), vec!["user_name", "F_2fast"]);
    }

    #[test]
    fn deterministic_for_fixed_document() {
        let doc = json!({"a": {"b": [1, 2]}, "a_b": null, "c": "v"});
        let first: Vec<Attribute> = flatten(&doc).iter().cloned().collect();
        let second: Vec<Attribute> = flatten(&doc).iter().cloned().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn deep_nesting_flattens_fully() {
        let doc = json!({"l1": {"l2": {"l3": {"l4": {"l5": "deep"}}}}});
        let attrs = flatten(&doc);
        assert_eq!(names(&attrs), vec!["l1_l2_l3_l4_l5"]);
        assert_eq!(attrs.get("l1_l2_l3_l4_l5").unwrap().value, Some("deep".to_string()));
    }
}
