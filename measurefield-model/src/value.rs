use crate::{FieldError, FieldResult};
use measurefield_types::Measurement;
use serde_json::Value;
use std::collections::BTreeMap;

/// Constructor keyword arguments for a model, keyed by attribute name.
pub type Kwargs = BTreeMap<String, FieldValue>;

/// A value handed to the model by application code.
///
/// Stored columns only ever hold JSON scalars; `FieldValue` additionally
/// carries rich measurements on their way in.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Number(f64),
    Text(String),
    Measurement(Measurement),
    /// Anything else (booleans, arrays, objects).
    Raw(Value),
}

impl FieldValue {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short type name used in diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Number(_) => "float",
            Self::Text(_) => "str",
            Self::Measurement(_) => "Measurement",
            Self::Raw(Value::Bool(_)) => "bool",
            Self::Raw(Value::Array(_)) => "list",
            Self::Raw(Value::Object(_)) => "dict",
            Self::Raw(Value::Number(_)) => "float",
            Self::Raw(Value::String(_)) => "str",
            Self::Raw(Value::Null) => "null",
        }
    }

    /// Renders the value for error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Null => "None".to_string(),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
            Self::Measurement(m) => m.to_string(),
            Self::Raw(v) => v.to_string(),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Measurement> for FieldValue {
    fn from(value: Measurement) -> Self {
        Self::Measurement(value)
    }
}

impl From<Option<Measurement>> for FieldValue {
    fn from(value: Option<Measurement>) -> Self {
        value.map_or(Self::Null, Self::Measurement)
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::String(s) => Self::Text(s),
            Value::Number(n) => match n.as_f64() {
                Some(f) => Self::Number(f),
                None => Self::Raw(Value::Number(n)),
            },
            other => Self::Raw(other),
        }
    }
}

/// Float coercion for a plain numeric column.
///
/// Numbers pass, booleans become 1.0/0.0 and strings are trimmed and parsed.
pub(crate) fn coerce_float(value: &FieldValue) -> FieldResult<f64> {
    let invalid = || FieldError::InvalidFloat {
        value: value.describe(),
    };
    match value {
        FieldValue::Number(n) => Ok(*n),
        FieldValue::Text(s) | FieldValue::Raw(Value::String(s)) => {
            s.trim().parse::<f64>().map_err(|_| invalid())
        }
        FieldValue::Raw(Value::Bool(b)) => Ok(if *b { 1.0 } else { 0.0 }),
        FieldValue::Raw(Value::Number(n)) => n.as_f64().ok_or_else(invalid),
        FieldValue::Measurement(m) => Err(FieldError::InvalidType {
            value: m.to_string(),
            type_given: m.measure_name().to_string(),
            type_wanted: "float".to_string(),
        }),
        _ => Err(invalid()),
    }
}

/// Wraps a float as a storable JSON number. Non-finite floats have no JSON form.
pub(crate) fn float_value(n: f64) -> FieldResult<Value> {
    serde_json::Number::from_f64(n)
        .map(Value::Number)
        .ok_or_else(|| FieldError::InvalidFloat {
            value: n.to_string(),
        })
}
