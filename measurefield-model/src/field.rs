//! Single-column measurement field.
//!
//! The measure type is fixed when the field is declared; each row stores only
//! a float in that measure's standard unit.

use crate::config::MeasurementFieldConfig;
use crate::units::{self, UnitChoice};
use crate::value::{coerce_float, float_value};
use crate::{ColumnSpec, FieldError, FieldResult, FieldValue, Record, codec, text};
use measurefield_types::{Measure, MeasureRegistry, Measurement};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

pub const MEASUREMENT_FIELD_PATH: &str = "measurefield_model::MeasurementField";

/// Field paths a schema-diffing tool should treat as introspectable.
pub const INTROSPECTION_RULES: &[&str] = &[
    MEASUREMENT_FIELD_PATH,
    crate::composite::COMPOSITE_FIELD_PATH,
];

/// What a field declaration reduces to for migrations: its attribute name,
/// its type path and the options needed to declare it again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deconstructed {
    pub name: String,
    pub path: String,
    pub kwargs: BTreeMap<String, Value>,
}

#[derive(Debug, Clone)]
pub struct MeasurementField {
    measure: Arc<dyn Measure>,
    unit_choices: Vec<UnitChoice>,
    null: bool,
    blank: bool,
    strict_units: bool,
    verbose_name: Option<String>,
    name: String,
    model: String,
    module: String,
}

impl MeasurementField {
    pub const DESCRIPTION: &'static str = "Easily store, retrieve, and convert measures.";
    pub const EMPTY_STRINGS_ALLOWED: bool = false;

    /// Declares a field storing `measure` values.
    ///
    /// Fails if `measure` does not convert its own standard unit as the identity.
    pub fn new(measure: Arc<dyn Measure>) -> FieldResult<Self> {
        check_measure(measure.as_ref())?;
        Ok(Self {
            measure,
            unit_choices: Vec::new(),
            null: false,
            blank: false,
            strict_units: false,
            verbose_name: None,
            name: String::new(),
            model: String::new(),
            module: String::new(),
        })
    }

    /// Declares a field from configuration, resolving the measure by name.
    pub fn from_config(
        config: &MeasurementFieldConfig,
        registry: &MeasureRegistry,
    ) -> FieldResult<Self> {
        let measure = match (&config.measurement, &config.measurement_class) {
            (Some(name), _) => registry.resolve(name)?,
            (None, Some(class)) => {
                warn!(
                    measurement_class = %class,
                    "\"measurement_class\" is deprecated, use \"measurement\""
                );
                registry.resolve(class)?
            }
            (None, None) => return Err(FieldError::MissingMeasure),
        };

        let mut field = Self::new(measure)?
            .with_unit_choices(config.unit_choices.clone())?
            .nullable(config.null)
            .blank(config.blank)
            .strict_units(config.strict_units);
        field.verbose_name = config.verbose_name.clone();
        Ok(field)
    }

    pub fn with_unit_choices(mut self, choices: Vec<UnitChoice>) -> FieldResult<Self> {
        units::check_choices(self.measure.as_ref(), &choices)?;
        self.unit_choices = choices;
        Ok(self)
    }

    #[must_use]
    pub fn nullable(mut self, null: bool) -> Self {
        self.null = null;
        self
    }

    #[must_use]
    pub fn blank(mut self, blank: bool) -> Self {
        self.blank = blank;
        self
    }

    /// Refuse bare numbers instead of guessing their unit.
    #[must_use]
    pub fn strict_units(mut self, strict: bool) -> Self {
        self.strict_units = strict;
        self
    }

    #[must_use]
    pub fn verbose_name(mut self, verbose_name: impl Into<String>) -> Self {
        self.verbose_name = Some(verbose_name.into());
        self
    }

    pub(crate) fn attach(mut self, module: &str, model: &str, name: &str) -> Self {
        self.module = module.to_string();
        self.model = model.to_string();
        self.name = name.to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn measure(&self) -> &Arc<dyn Measure> {
        &self.measure
    }

    pub fn unit_choices(&self) -> &[UnitChoice] {
        &self.unit_choices
    }

    /// The single float column backing this field.
    pub fn column(&self) -> ColumnSpec {
        let mut column = ColumnSpec::float(&self.name).nullable(self.null);
        column.blank = self.blank;
        column
    }

    pub fn default_unit(&self) -> &str {
        units::default_unit(self.measure.as_ref(), &self.unit_choices)
    }

    /// Converts a value into the float stored in the column.
    pub fn prepare_for_store(&self, value: &FieldValue) -> FieldResult<Value> {
        match value {
            FieldValue::Null => Ok(Value::Null),
            FieldValue::Measurement(m) => {
                if m.measure_name() != self.measure.name() {
                    return Err(FieldError::InvalidType {
                        value: m.to_string(),
                        type_given: m.measure_name().to_string(),
                        type_wanted: self.measure.name().to_string(),
                    });
                }
                float_value(m.standard())
            }
            other => float_value(coerce_float(other)?),
        }
    }

    /// Rebuilds a measurement from a stored float, displayed in the default unit.
    pub fn load_from_store(&self, value: &Value) -> FieldResult<Option<Measurement>> {
        if value.is_null() {
            return Ok(None);
        }
        let standard = coerce_float(&FieldValue::from(value.clone()))?;
        codec::restore(Arc::clone(&self.measure), standard, self.default_unit()).map(Some)
    }

    /// Serializes the record's value as `"<value>:<unit>"`.
    ///
    /// Null and values already stored as text are returned unchanged.
    pub fn value_to_string(&self, record: &Record) -> FieldResult<Value> {
        match record.get(&self.name) {
            None | Some(Value::Null) => Ok(Value::Null),
            Some(Value::String(s)) => Ok(Value::String(s.clone())),
            Some(stored) => Ok(self
                .load_from_store(stored)?
                .map_or(Value::Null, |m| Value::String(text::encode(&m)))),
        }
    }

    pub fn deserialize_value_from_string(&self, s: &str) -> FieldResult<Option<Measurement>> {
        text::decode(&self.measure, s)
    }

    /// Coerces arbitrary input into a measurement of this field's type.
    ///
    /// Bare numbers (and numeric strings) are read in the default unit and
    /// logged, since the unit was guessed.
    pub fn coerce(&self, value: FieldValue) -> FieldResult<Option<Measurement>> {
        let value = match value {
            FieldValue::Raw(raw) => FieldValue::from(raw),
            other => other,
        };
        match &value {
            FieldValue::Null => return Ok(None),
            FieldValue::Measurement(m) => return Ok(Some(m.clone())),
            FieldValue::Text(s) => {
                if let Some(parsed) = self.deserialize_value_from_string(s)? {
                    return Ok(Some(parsed));
                }
            }
            _ => {}
        }

        let number = coerce_float(&value)?;
        let unit = self.default_unit();
        if self.strict_units {
            return Err(FieldError::AmbiguousUnit {
                field: self.qualified_name(),
                measure: self.measure.name().to_string(),
                type_given: value.type_name().to_string(),
            });
        }

        // Reported as a float: the value is already coerced at this point.
        warn!(
            target: "measurefield",
            field = %self.qualified_name(),
            unit = %unit,
            "You assigned a float instead of {} to {}, unit was guessed to be \"{}\".",
            self.measure.name(),
            self.qualified_name(),
            unit,
        );
        Ok(Some(Measurement::new(
            Arc::clone(&self.measure),
            number,
            unit,
        )?))
    }

    /// Reads the field off a record.
    pub fn get(&self, record: &Record) -> FieldResult<Option<Measurement>> {
        match record.get(&self.name) {
            Some(stored) => self.load_from_store(stored),
            None => Ok(None),
        }
    }

    /// Coerces `value` and writes its standard-unit float into the record.
    ///
    /// Null is refused unless the field is nullable.
    pub fn set(&self, record: &mut Record, value: FieldValue) -> FieldResult<()> {
        let coerced = self.coerce(value)?;
        let stored = self.prepare_for_store(&FieldValue::from(coerced))?;
        self.column().check(&stored)?;
        record.set(self.name.clone(), stored);
        Ok(())
    }

    pub fn deconstruct(&self) -> Deconstructed {
        let mut kwargs = BTreeMap::new();
        kwargs.insert(
            "measurement".to_string(),
            Value::String(self.measure.name().to_string()),
        );
        if !self.unit_choices.is_empty() {
            kwargs.insert(
                "unit_choices".to_string(),
                serde_json::to_value(&self.unit_choices).unwrap_or_default(),
            );
        }
        if self.null {
            kwargs.insert("null".to_string(), Value::Bool(true));
        }
        if self.blank {
            kwargs.insert("blank".to_string(), Value::Bool(true));
        }
        if self.strict_units {
            kwargs.insert("strict_units".to_string(), Value::Bool(true));
        }
        if let Some(verbose_name) = &self.verbose_name {
            kwargs.insert("verbose_name".to_string(), Value::String(verbose_name.clone()));
        }
        Deconstructed {
            name: self.name.clone(),
            path: MEASUREMENT_FIELD_PATH.to_string(),
            kwargs,
        }
    }

    fn qualified_name(&self) -> String {
        format!("{}.{}.{}", self.module, self.model, self.name)
    }
}

/// A measure must know its standard unit and convert it as the identity.
fn check_measure(measure: &dyn Measure) -> FieldResult<()> {
    let standard = measure.standard_unit();
    let identity = !standard.is_empty()
        && [0.0, 1.0, 10.0].iter().all(|&x| {
            measure
                .to_standard(x, standard)
                .is_ok_and(|s| s == x)
        });
    if identity {
        Ok(())
    } else {
        Err(FieldError::InvalidMeasure(measure.name().to_string()))
    }
}
