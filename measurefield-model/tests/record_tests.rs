use measurefield_model::Record;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn record_column_helpers() {
    let mut r = Record::new("Trip");
    r.set("title", json!("Coast road"));
    r.set("distance_value", json!(16093.44));

    assert_eq!(r.model, "Trip");
    assert_eq!(r.get_str("title"), Some("Coast road"));
    assert_eq!(r.get_str("distance_value"), None);
    assert_eq!(r.get_number("distance_value"), Some(16093.44));
    assert_eq!(r.get_number("missing"), None);
}

#[test]
fn set_overwrites_existing_column() {
    let mut r = Record::new("Trip");
    r.set("distance_unit", json!("km"));
    r.set("distance_unit", json!("mi"));
    assert_eq!(r.get_str("distance_unit"), Some("mi"));
    assert_eq!(r.values.len(), 1);
}

#[test]
fn record_serializes_as_model_and_values() {
    let mut r = Record::new("Trip");
    r.set("distance_unit", json!("mi"));
    let json = serde_json::to_value(&r).unwrap();
    assert_eq!(json, json!({"model": "Trip", "values": {"distance_unit": "mi"}}));

    let back: Record = serde_json::from_value(json).unwrap();
    assert_eq!(back, r);
}
