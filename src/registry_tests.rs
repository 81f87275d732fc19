use super::*;
use serde_json::json;

// ─── Basic stub/lookup ───────────────────────────────────────────

#[test]
fn test_stub_then_get_returns_value() {
    let mut registry = StubRegistry::new();
    registry.stub("drupal_http_request", json!({"data": "abc"}));
    let value = registry.stubbed_value("drupal_http_request", None).unwrap();
    assert_eq!(value, json!({"data": "abc"}));
}

#[test]
fn test_unstubbed_name_is_missing_stub() {
    let registry = StubRegistry::new();
    let err = registry.stubbed_value("never_stubbed", None).unwrap_err();
    assert!(matches!(err, MockError::MissingStub { name } if name == "never_stubbed"));
}

#[test]
fn test_missing_stub_message_names_the_function() {
    let registry = StubRegistry::new();
    let err = registry.stubbed_value("weather_fetch", None).unwrap_err();
    assert_eq!(
        err.to_string(),
        "weather_fetch has not been stubbed yet. \
         Please call stub('weather_fetch', <value>) to set one."
    );
}

#[test]
fn test_stub_is_upsert() {
    let mut registry = StubRegistry::new();
    registry.stub("f", json!(1));
    registry.stub("f", json!(2));
    assert_eq!(registry.stubbed_value("f", None).unwrap(), json!(2));
}

// ─── Signature entries ───────────────────────────────────────────

#[test]
fn test_signature_and_default_are_independent() {
    let mut registry = StubRegistry::new();
    registry.stub("f", json!("default"));
    registry.stub_for("f", vec![json!(1), json!(2)], json!("specific"));

    assert_eq!(registry.stubbed_value("f", Some(&[json!(1), json!(2)])).unwrap(), json!("specific"));
    assert_eq!(registry.stubbed_value("f", None).unwrap(), json!("default"));
}

#[test]
fn test_unmatched_signature_falls_back_to_default() {
    let mut registry = StubRegistry::new();
    registry.stub("f", json!("default"));
    registry.stub_for("f", vec![json!(1)], json!("one"));

    assert_eq!(registry.stubbed_value("f", Some(&[json!(99)])).unwrap(), json!("default"));
}

#[test]
fn test_unmatched_signature_without_default_is_missing_stub() {
    let mut registry = StubRegistry::new();
    registry.stub_for("f", vec![json!(1)], json!("one"));

    let err = registry.stubbed_value("f", Some(&[json!(2)])).unwrap_err();
    assert!(matches!(err, MockError::MissingStub { .. }));
}

#[test]
fn test_signature_upsert_replaces_in_place() {
    let mut registry = StubRegistry::new();
    registry.stub_for("f", vec![json!("k")], json!(1));
    registry.stub_for("f", vec![json!("k")], json!(2));

    assert_eq!(registry.stubbed_value("f", Some(&[json!("k")])).unwrap(), json!(2));
    let entries = &registry.list_stubbed()["f"];
    assert_eq!(entries.signatures().len(), 1);
}

#[test]
fn test_signature_equality_is_order_sensitive() {
    let mut registry = StubRegistry::new();
    registry.stub_for("f", vec![json!(1), json!(2)], json!("ab"));
    registry.stub_for("f", vec![json!(2), json!(1)], json!("ba"));

    assert_eq!(registry.stubbed_value("f", Some(&[json!(1), json!(2)])).unwrap(), json!("ab"));
    assert_eq!(registry.stubbed_value("f", Some(&[json!(2), json!(1)])).unwrap(), json!("ba"));
}

#[test]
fn test_signature_equality_is_type_sensitive() {
    let mut registry = StubRegistry::new();
    registry.stub_for("f", vec![json!(1)], json!("number"));
    registry.stub_for("f", vec![json!("1")], json!("string"));

    assert_eq!(registry.stubbed_value("f", Some(&[json!(1)])).unwrap(), json!("number"));
    assert_eq!(registry.stubbed_value("f", Some(&[json!("1")])).unwrap(), json!("string"));
}

#[test]
fn test_signature_equality_is_length_sensitive() {
    let mut registry = StubRegistry::new();
    registry.stub_for("f", vec![json!(1)], json!("one"));

    let err = registry.stubbed_value("f", Some(&[json!(1), json!(1)])).unwrap_err();
    assert!(matches!(err, MockError::MissingStub { .. }));
}

#[test]
fn test_structural_equality_ignores_object_key_order() {
    // {"a":1,"b":2} and {"b":2,"a":1} are the same map; a serialized-string
    // key would treat them as different.
    let mut registry = StubRegistry::new();
    let sig_ab = vec![serde_json::from_str::<serde_json::Value>(r#"{"a":1,"b":2}"#).unwrap()];
    let sig_ba = vec![serde_json::from_str::<serde_json::Value>(r#"{"b":2,"a":1}"#).unwrap()];

    registry.stub_for("f", sig_ab, json!("hit"));
    assert_eq!(registry.stubbed_value("f", Some(&sig_ba)).unwrap(), json!("hit"));
}

// ─── Reset ───────────────────────────────────────────────────────

#[test]
fn test_reset_clears_everything() {
    let mut registry = StubRegistry::new();
    registry.stub("a", json!(1));
    registry.stub_for("b", vec![json!(1)], json!(2));

    registry.reset();

    assert!(registry.is_empty());
    assert!(registry.stubbed_value("a", None).is_err());
    assert!(registry.stubbed_value("b", Some(&[json!(1)])).is_err());
}

#[test]
fn test_restub_after_reset() {
    let mut registry = StubRegistry::new();
    registry.stub("f", json!("before"));
    registry.reset();
    registry.stub("f", json!("after"));
    assert_eq!(registry.stubbed_value("f", None).unwrap(), json!("after"));
}

#[test]
fn test_reset_does_not_leak_signature_entries() {
    let mut registry = StubRegistry::new();
    registry.stub_for("f", vec![json!("stale")], json!("old"));
    registry.reset();
    registry.stub("f", json!("fresh"));

    // The old signature entry must be gone, not shadowed by the default.
    let entries = &registry.list_stubbed()["f"];
    assert!(entries.signatures().is_empty());
    assert_eq!(registry.stubbed_value("f", Some(&[json!("stale")])).unwrap(), json!("fresh"));
}

// ─── Introspection ───────────────────────────────────────────────

#[test]
fn test_list_stubbed_reports_all_entries() {
    let mut registry = StubRegistry::new();
    registry.stub("f", json!("default"));
    registry.stub_for("f", vec![json!(1)], json!("one"));
    registry.stub("g", json!(0));

    let listed = registry.list_stubbed();
    assert_eq!(listed.len(), 2);

    let f_entries = listed["f"].entries();
    assert_eq!(f_entries.len(), 2);
    assert_eq!(f_entries[0], (StubKey::Default, json!("default")));
    assert_eq!(f_entries[1], (StubKey::Exact(vec![json!(1)]), json!("one")));
}

#[test]
fn test_list_stubbed_has_no_side_effects() {
    let mut registry = StubRegistry::new();
    registry.stub("f", json!(1));
    let before = registry.list_stubbed().len();
    let _ = registry.list_stubbed();
    assert_eq!(registry.list_stubbed().len(), before);
    assert_eq!(registry.stubbed_value("f", None).unwrap(), json!(1));
}

// ─── Property tests ──────────────────────────────────────────────

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_value() -> impl Strategy<Value = serde_json::Value> {
        prop_oneof![
            any::<bool>().prop_map(serde_json::Value::from),
            any::<i64>().prop_map(serde_json::Value::from),
            "[a-z0-9_]{0,12}".prop_map(serde_json::Value::from),
        ]
    }

    proptest! {
        /// stub-then-get always returns the stubbed value.
        #[test]
        fn stub_roundtrip(name in "[a-z_][a-z0-9_]{0,20}", value in arb_value()) {
            let mut registry = StubRegistry::new();
            registry.stub(name.clone(), value.clone());
            prop_assert_eq!(registry.stubbed_value(&name, None).unwrap(), value);
        }

        /// The last default upsert wins, regardless of how many came before.
        #[test]
        fn last_upsert_wins(name in "[a-z_]{1,10}", values in proptest::collection::vec(arb_value(), 1..8)) {
            let mut registry = StubRegistry::new();
            for v in &values {
                registry.stub(name.clone(), v.clone());
            }
            prop_assert_eq!(
                registry.stubbed_value(&name, None).unwrap(),
                values.last().unwrap().clone()
            );
        }

        /// A signature entry never shadows the default for other signatures.
        #[test]
        fn signature_does_not_shadow_default(
            default in arb_value(),
            sig_value in arb_value(),
            a in any::<i64>(),
            b in any::<i64>(),
        ) {
            prop_assume!(a != b);
            let mut registry = StubRegistry::new();
            registry.stub("f", default.clone());
            registry.stub_for("f", vec![serde_json::Value::from(a)], sig_value);

            prop_assert_eq!(
                registry.stubbed_value("f", Some(&[serde_json::Value::from(b)])).unwrap(),
                default
            );
        }

        /// After reset, every previously stubbed name fails with MissingStub.
        #[test]
        fn reset_forgets_all_names(names in proptest::collection::btree_set("[a-z_]{1,10}", 1..10)) {
            let mut registry = StubRegistry::new();
            for name in &names {
                registry.stub(name.clone(), serde_json::Value::from(1));
            }
            registry.reset();
            for name in &names {
                let is_missing_stub = matches!(
                    registry.stubbed_value(name, None),
                    Err(MockError::MissingStub { .. })
                );
                prop_assert!(is_missing_stub);
            }
        }
    }
}
