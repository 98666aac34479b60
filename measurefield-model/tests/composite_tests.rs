mod common;

use common::{close, measurement, registry};
use measurefield_model::{
    COMPOSITE_FIELD_PATH, ColumnSpec, ColumnType, CompositeField, FieldError, FieldValue, Kwargs,
    MEASURE_MAX_LENGTH, ModelSchema, Record, UNIT_MAX_LENGTH,
};
use measurefield_types::{Error, LinearMeasure, Measurement};
use std::sync::Arc;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn trip_schema() -> ModelSchema {
    let mut schema = ModelSchema::new("travel", "Trip");
    schema.add_column(ColumnSpec::text("title", Some(80))).unwrap();
    schema.add_composite("distance", CompositeField::new()).unwrap();
    schema
}

fn kwargs(pairs: Vec<(&str, FieldValue)>) -> Kwargs {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// A one-unit-per-length measure whose display unit is `len` characters long.
fn measurement_with_unit_of_len(len: usize) -> Measurement {
    let unit = "u".repeat(len);
    let measure = LinearMeasure::new("Spans", "span").unit(&unit, 2.0);
    Measurement::new(Arc::new(measure), 1.0, &unit).unwrap()
}

// ── Column provisioning ──────────────────────────────────────────

#[test]
fn attaching_provisions_three_backing_columns() {
    let schema = trip_schema();
    let names: Vec<&str> = schema.columns().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["title", "distance_unit", "distance_measure", "distance_value"]
    );
}

#[test]
fn backing_columns_are_hidden_and_sized() {
    let schema = trip_schema();

    let unit = schema.column("distance_unit").unwrap();
    assert_eq!(unit.column_type, ColumnType::Text);
    assert_eq!(unit.max_length, Some(UNIT_MAX_LENGTH));
    assert_eq!(unit.default, json!(""));

    let measure = schema.column("distance_measure").unwrap();
    assert_eq!(measure.max_length, Some(MEASURE_MAX_LENGTH));
    assert_eq!(measure.default, json!(""));

    let value = schema.column("distance_value").unwrap();
    assert_eq!(value.column_type, ColumnType::Float);

    for column in [unit, measure, value] {
        assert!(!column.editable);
        assert!(column.blank);
    }
}

#[test]
fn logical_name_is_not_a_column() {
    let schema = trip_schema();
    assert!(schema.column("distance").is_none());
    assert_eq!(schema.composite("distance").unwrap().name(), "distance");
}

#[test]
fn colliding_backing_column_is_rejected() {
    let mut schema = ModelSchema::new("travel", "Trip");
    schema.add_column(ColumnSpec::float("distance_value")).unwrap();
    let err = schema
        .add_composite("distance", CompositeField::new())
        .unwrap_err();
    assert!(matches!(
        err,
        FieldError::DuplicateColumn { ref column, .. } if column == "distance_value"
    ));
    assert_eq!(schema.columns().len(), 1);
}

// ── Constructor keyword rewriting ────────────────────────────────

#[test]
fn constructor_decomposes_rich_value() {
    let schema = trip_schema();
    let record = schema
        .build(kwargs(vec![
            ("title", "Coast road".into()),
            ("distance", measurement("Distance", 10.0, "mi").into()),
        ]))
        .unwrap();

    assert!(close(record.get_number("distance_value").unwrap(), 16_093.44));
    assert_eq!(record.get_str("distance_measure"), Some("Distance"));
    assert_eq!(record.get_str("distance_unit"), Some("mi"));
    assert_eq!(record.get_str("title"), Some("Coast road"));
    assert!(record.get("distance").is_none());
}

#[test]
fn rewrite_replaces_logical_key() {
    let field = trip_schema().composite("distance").unwrap().clone();
    let mut args = kwargs(vec![("distance", measurement("Mass", 2.0, "lb").into())]);
    field.rewrite_kwargs(&mut args).unwrap();

    let keys: Vec<&str> = args.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["distance_measure", "distance_unit", "distance_value"]);
    assert_eq!(args["distance_unit"], FieldValue::Text("lb".into()));
    assert_eq!(args["distance_measure"], FieldValue::Text("Mass".into()));
    assert_eq!(args["distance_value"], FieldValue::Number(2.0 * 0.453_592_37));
}

#[test]
fn rewrite_without_logical_key_is_noop() {
    let field = trip_schema().composite("distance").unwrap().clone();
    let mut args = kwargs(vec![("title", "x".into())]);
    field.rewrite_kwargs(&mut args).unwrap();
    assert_eq!(args, kwargs(vec![("title", "x".into())]));
}

#[test]
fn constructor_null_keeps_defaults() {
    let record = trip_schema()
        .build(kwargs(vec![("distance", FieldValue::Null)]))
        .unwrap();
    assert_eq!(record.get_str("distance_unit"), Some(""));
    assert_eq!(record.get_str("distance_measure"), Some(""));
    assert_eq!(record.get("distance_value"), Some(&Value::Null));
}

#[test]
fn constructor_rejects_bare_number_for_composite() {
    let err = trip_schema()
        .build(kwargs(vec![("distance", FieldValue::Number(3.0))]))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "'3' (float) value must be of type Measurement."
    );
}

#[test]
fn constructor_rejects_overlong_unit() {
    let err = trip_schema()
        .build(kwargs(vec![(
            "distance",
            measurement_with_unit_of_len(UNIT_MAX_LENGTH + 10).into(),
        )]))
        .unwrap_err();
    assert!(matches!(
        err,
        FieldError::TooLong { ref column, max_length: UNIT_MAX_LENGTH, length: 60 }
            if column == "distance_unit"
    ));
}

#[test]
fn rewrite_rejects_overlong_unit_before_inserting() {
    let field = trip_schema().composite("distance").unwrap().clone();
    let mut args = kwargs(vec![(
        "distance",
        measurement_with_unit_of_len(UNIT_MAX_LENGTH + 1).into(),
    )]);
    assert!(matches!(
        field.rewrite_kwargs(&mut args).unwrap_err(),
        FieldError::TooLong { .. }
    ));
    assert!(!args.contains_key("distance_measure"));
    assert!(!args.contains_key("distance_value"));
}

#[test]
fn unit_at_the_limit_is_accepted() {
    let record = trip_schema()
        .build(kwargs(vec![(
            "distance",
            measurement_with_unit_of_len(UNIT_MAX_LENGTH).into(),
        )]))
        .unwrap();
    assert_eq!(
        record.get_str("distance_unit").map(str::len),
        Some(UNIT_MAX_LENGTH)
    );
}

#[test]
fn constructor_rejects_overlong_text_column() {
    let mut schema = ModelSchema::new("travel", "Trip");
    schema.add_column(ColumnSpec::text("title", Some(5))).unwrap();
    let err = schema
        .build(kwargs(vec![("title", "far too long title".into())]))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Ensure title has at most 5 characters (it has 18)."
    );
}

#[test]
fn constructor_rejects_null_for_non_nullable_column() {
    let mut schema = ModelSchema::new("travel", "Trip");
    schema.add_column(ColumnSpec::float("fare")).unwrap();
    schema
        .add_column(ColumnSpec::float("tip").nullable(true))
        .unwrap();

    let err = schema
        .build(kwargs(vec![("fare", FieldValue::Null)]))
        .unwrap_err();
    assert!(matches!(err, FieldError::NotNullable { ref column } if column == "fare"));

    let record = schema
        .build(kwargs(vec![("tip", FieldValue::Null)]))
        .unwrap();
    assert_eq!(record.get("tip"), Some(&Value::Null));
}

#[test]
fn constructor_rejects_unknown_keyword() {
    let err = trip_schema()
        .build(kwargs(vec![("speed", FieldValue::Number(3.0))]))
        .unwrap_err();
    assert_eq!(err.to_string(), "Trip() got an unexpected keyword argument 'speed'");
}

// ── Accessor ─────────────────────────────────────────────────────

#[test]
fn get_rebuilds_from_backing_columns() {
    let schema = trip_schema();
    let record = schema
        .build(kwargs(vec![(
            "distance",
            measurement("Distance", 3.0, "km").into(),
        )]))
        .unwrap();

    let m = schema
        .composite("distance")
        .unwrap()
        .get(&record, &registry())
        .unwrap();
    assert_eq!(m, measurement("Distance", 3.0, "km"));
}

#[test]
fn set_rewrites_all_three_columns() {
    let schema = trip_schema();
    let field = schema.composite("distance").unwrap();
    let mut record = schema
        .build(kwargs(vec![(
            "distance",
            measurement("Distance", 3.0, "km").into(),
        )]))
        .unwrap();

    let temp = measurement("Temperature", 20.0, "c");
    field.set(Some(&mut record), &temp).unwrap();

    assert!(close(record.get_number("distance_value").unwrap(), 293.15));
    assert_eq!(record.get_str("distance_measure"), Some("Temperature"));
    assert_eq!(record.get_str("distance_unit"), Some("c"));
    assert_eq!(field.get(&record, &registry()).unwrap(), temp);
}

#[test]
fn set_then_get_keeps_display_unit() {
    let schema = trip_schema();
    let field = schema.composite("distance").unwrap();
    let mut record = schema.build(Kwargs::new()).unwrap();

    let marathon = measurement("Distance", 26.2, "mi");
    field.set(Some(&mut record), &marathon).unwrap();

    let m = field.get(&record, &registry()).unwrap();
    assert_eq!(m.unit(), "mi");
    assert!(close(m.value(), 26.2));
    assert_eq!(m, marathon);
}

#[test]
fn get_with_unregistered_measure_name_fails() {
    let field = trip_schema().composite("distance").unwrap().clone();
    let mut record = Record::new("Trip");
    record.set("distance_value", json!(1.0));
    record.set("distance_measure", json!("Luminosity"));
    record.set("distance_unit", json!("cd"));

    let err = field.get(&record, &registry()).unwrap_err();
    assert!(matches!(
        err,
        FieldError::Measure(Error::UnknownMeasure(ref name)) if name == "Luminosity"
    ));
}

#[test]
fn set_with_overlong_part_leaves_record_untouched() {
    let schema = trip_schema();
    let field = schema.composite("distance").unwrap();
    let original = measurement("Distance", 3.0, "km");
    let mut record = schema
        .build(kwargs(vec![("distance", original.clone().into())]))
        .unwrap();

    let err = field
        .set(Some(&mut record), &measurement_with_unit_of_len(UNIT_MAX_LENGTH + 1))
        .unwrap_err();
    assert!(matches!(err, FieldError::TooLong { .. }));

    let long_name = LinearMeasure::new("M".repeat(MEASURE_MAX_LENGTH + 1), "x");
    let err = field
        .set(
            Some(&mut record),
            &Measurement::new(Arc::new(long_name), 1.0, "x").unwrap(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        FieldError::TooLong { ref column, .. } if column == "distance_measure"
    ));

    assert_eq!(field.get(&record, &registry()).unwrap(), original);
}

#[test]
fn set_without_instance_is_unbound() {
    let schema = trip_schema();
    let field = schema.composite("distance").unwrap();
    let err = field
        .set(None, &measurement("Distance", 1.0, "m"))
        .unwrap_err();
    assert!(matches!(err, FieldError::Unbound(ref name) if name == "distance"));
    assert_eq!(err.to_string(), "distance must be accessed via instance");
}

#[test]
fn get_with_unset_measure_fails_resolution() {
    let schema = trip_schema();
    let record = schema.build(Kwargs::new()).unwrap();
    let err = schema
        .composite("distance")
        .unwrap()
        .get(&record, &registry())
        .unwrap_err();
    assert!(matches!(err, FieldError::Measure(Error::UnknownMeasure(_))));
}

#[test]
fn get_accepts_legacy_text_magnitude() {
    let field = trip_schema().composite("distance").unwrap().clone();
    let mut record = Record::new("Trip");
    record.set("distance_value", json!("1000"));
    record.set("distance_measure", json!("Distance"));
    record.set("distance_unit", json!("km"));
    let m = field.get(&record, &registry()).unwrap();
    assert!(close(m.value(), 1.0));
}

#[test]
fn deconstruct_has_no_options() {
    let d = trip_schema().composite("distance").unwrap().deconstruct();
    assert_eq!(d.name, "distance");
    assert_eq!(d.path, COMPOSITE_FIELD_PATH);
    assert!(d.kwargs.is_empty());
}
