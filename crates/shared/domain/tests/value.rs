use cradle_domain::{Value, ValueKind};
use serde_json::json;

#[test]
fn json_document_becomes_value_tree() {
    let value: Value = serde_json::from_value(json!({
        "enabled": true,
        "name": "edge",
        "workers": 4,
        "ratio": 0.5,
        "events": { "connections": 1024 },
        "listen": [80, 443],
        "pid": null
    }))
    .expect("value");

    let map = value.as_mapping().expect("mapping at root");
    assert_eq!(map["enabled"].as_bool(), Some(true));
    assert_eq!(map["name"].as_str(), Some("edge"));
    assert_eq!(map["workers"].as_i64(), Some(4));
    assert_eq!(map["ratio"].kind(), ValueKind::Float);
    assert_eq!(map["events"].kind(), ValueKind::Mapping);
    assert_eq!(map["listen"].as_sequence().map(<[Value]>::len), Some(2));
    assert_eq!(map["pid"].kind(), ValueKind::Null);
}

#[test]
fn duplicate_keys_are_rejected() {
    let err = serde_json::from_str::<Value>(r#"{"enabled": true, "enabled": false}"#)
        .expect_err("duplicate directive must not parse");
    assert!(err.to_string().contains("duplicate directive `enabled`"));
}

#[test]
fn oversized_integers_are_rejected() {
    let err = serde_json::from_str::<Value>(r#"{"n": 18446744073709551615}"#)
        .expect_err("u64::MAX does not fit");
    assert!(err.to_string().contains("does not fit"));
}
