//! Property tests for extraction, validation and parameter state
//!
//! These cover the pure parts of the command path:
//! - JSON extraction from chatty model output
//! - Schema validation of untrusted candidates
//! - Merge and reset semantics of the parameter store

use proptest::prelude::*;
use serde_json::{json, Value};
use vrm_studio::core::types::{Category, Parameter};
use vrm_studio::llm::extract::{extract, locate, ExtractionError};
use vrm_studio::params::schema::{ParamRange, ParameterSchema};
use vrm_studio::params::store::{ParameterSet, ParameterStore};
use vrm_studio::params::validator::ParameterValidator;

fn prose() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,:;!?'\n-]{0,40}"
}

fn json_fragment() -> impl Strategy<Value = Value> {
    let object = prop::collection::btree_map("[a-z]{1,8}", -1000i64..1000, 0..5)
        .prop_map(|m| json!(m));
    let array = prop::collection::vec(
        prop::collection::btree_map("[a-z]{1,8}", -1.0f64..1.0, 0..4),
        0..4,
    )
    .prop_map(|v| json!(v));
    prop_oneof![object, array]
}

fn schema_entries() -> Vec<(Category, String, ParamRange)> {
    ParameterSchema::vrm_default()
        .iter()
        .map(|(category, name, range)| (category, name.to_string(), range))
        .collect()
}

fn parameter_list() -> impl Strategy<Value = Vec<Parameter>> {
    let names = prop::sample::select(vec!["happy", "sad", "blink", "opacity", "headRotationX"]);
    let categories = prop::sample::select(Category::ALL.to_vec());
    prop::collection::vec(
        (categories, names, -1.0f64..1.0)
            .prop_map(|(category, name, value)| Parameter::new(category, name, value)),
        0..12,
    )
}

proptest! {
    /// The JSON fragment surrounded by prose comes back unchanged
    #[test]
    fn prop_extract_returns_embedded_json(
        before in prose(),
        after in prose(),
        fragment in json_fragment(),
    ) {
        let text = fragment.to_string();
        let raw = format!("{}{}{}", before, text, after);

        prop_assert_eq!(locate(&raw).unwrap(), text.as_str());
        prop_assert_eq!(extract(&raw).unwrap(), fragment);
    }

    /// Text without any bracket never yields JSON
    #[test]
    fn prop_no_brackets_no_json(raw in "[^\\[\\]{}]{0,80}") {
        prop_assert_eq!(extract(&raw), Err(ExtractionError::NoJsonFound));
    }

    /// In-range candidates pass untouched; out-of-range ones are dropped
    #[test]
    fn prop_validator_filters_by_range(
        (category, name, range) in prop::sample::select(schema_entries()),
        fraction in 0.0f64..=1.0,
        overshoot in 0.001f64..100.0,
        above in any::<bool>(),
    ) {
        let schema = ParameterSchema::vrm_default();
        let validator = ParameterValidator::new(&schema);

        let inside = range.min + (range.max - range.min) * fraction;
        let accepted = validator.validate(&[json!({
            "category": category, "name": name, "value": inside
        })]);
        prop_assert_eq!(accepted, vec![Parameter::new(category, name.clone(), inside)]);

        let outside = if above { range.max + overshoot } else { range.min - overshoot };
        let rejected = validator.validate(&[json!({
            "category": category, "name": name, "value": outside
        })]);
        prop_assert!(rejected.is_empty());
    }

    /// Re-applying the same update changes nothing
    #[test]
    fn prop_merge_is_idempotent(initial in parameter_list(), incoming in parameter_list()) {
        let start = ParameterStore::merge(&ParameterSet::new(), &initial);
        let once = ParameterStore::merge(&start, &incoming);
        let twice = ParameterStore::merge(&once, &incoming);
        prop_assert_eq!(once, twice);
    }

    /// Reset followed by an empty merge stays empty
    #[test]
    fn prop_reset_then_empty_merge_is_empty(initial in parameter_list()) {
        let mut store = ParameterStore::new();
        store.apply(&initial);
        store.clear();
        prop_assert!(store.current().is_empty());

        let merged = ParameterStore::merge(&ParameterStore::reset(), &[]);
        prop_assert!(merged.is_empty());
    }
}

/// Later entries win over earlier ones for the same key
#[test]
fn test_merge_last_write_wins() {
    let merged = ParameterStore::merge(
        &ParameterSet::new(),
        &[
            Parameter::new(Category::Face, "happy", 0.2),
            Parameter::new(Category::Face, "happy", 0.9),
        ],
    );
    assert_eq!(merged.len(), 1);
    assert_eq!(merged.get(Category::Face, "happy"), Some(0.9));
}

/// Validation keeps the input order of survivors
#[test]
fn test_validator_preserves_order() {
    let schema = ParameterSchema::vrm_default();
    let candidates = vec![
        json!({"category": "material", "name": "roughness", "value": 0.1}),
        json!({"category": "face", "name": "wink", "value": 0.5}),
        json!({"category": "pose", "name": "leftLegRotationX", "value": -0.5}),
    ];
    let names: Vec<_> = ParameterValidator::new(&schema)
        .validate(&candidates)
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["roughness", "leftLegRotationX"]);
}

/// A schema loaded from TOML drives validation
#[test]
fn test_custom_schema_drives_validation() {
    let schema = ParameterSchema::from_toml_str(
        r#"
        [face]
        wink = { min = 0.0, max = 1.0 }
        "#,
    )
    .unwrap();
    let accepted = ParameterValidator::new(&schema).validate(&[
        json!({"category": "face", "name": "wink", "value": 0.5}),
        json!({"category": "face", "name": "happy", "value": 0.5}),
    ]);
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].name, "wink");
}
