//! Composite measurement field: one logical attribute backed by three columns.
//!
//! Each row stores its own measure type, so a single field can hold a
//! distance on one record and a mass on the next.

use crate::codec::{self, StandardTriple};
use crate::field::Deconstructed;
use crate::value::coerce_float;
use crate::{ColumnSpec, FieldError, FieldResult, FieldValue, Kwargs, Record};
use measurefield_types::{MeasureRegistry, Measurement};
use serde_json::Value;

/// Max length of the display unit column.
pub const UNIT_MAX_LENGTH: usize = 50;
/// Max length of the measure name column.
pub const MEASURE_MAX_LENGTH: usize = 255;

pub const COMPOSITE_FIELD_PATH: &str = "measurefield_model::CompositeField";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositeField {
    name: String,
}

impl CompositeField {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn attach(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// The logical attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_column(&self) -> String {
        format!("{}_unit", self.name)
    }

    pub fn measure_column(&self) -> String {
        format!("{}_measure", self.name)
    }

    pub fn value_column(&self) -> String {
        format!("{}_value", self.name)
    }

    /// The backing columns: display unit, measure name, standard magnitude.
    pub fn columns(&self) -> [ColumnSpec; 3] {
        [
            ColumnSpec::text(&self.unit_column(), Some(UNIT_MAX_LENGTH))
                .non_editable()
                .blank(),
            ColumnSpec::text(&self.measure_column(), Some(MEASURE_MAX_LENGTH))
                .non_editable()
                .blank(),
            ColumnSpec::float(&self.value_column())
                .non_editable()
                .blank()
                .nullable(true),
        ]
    }

    /// Reads the three backing columns as stored.
    pub fn triple(&self, record: &Record) -> FieldResult<StandardTriple> {
        let value = match record.get(&self.value_column()) {
            Some(Value::Number(n)) => n.as_f64().unwrap_or_default(),
            Some(other) => coerce_float(&FieldValue::from(other.clone()))?,
            None => coerce_float(&FieldValue::Null)?,
        };
        Ok(StandardTriple {
            value,
            measure: record.get_str(&self.measure_column()).unwrap_or_default().to_string(),
            unit: record.get_str(&self.unit_column()).unwrap_or_default().to_string(),
        })
    }

    /// Rebuilds the measurement from the backing columns.
    pub fn get(&self, record: &Record, registry: &MeasureRegistry) -> FieldResult<Measurement> {
        codec::recompose(&self.triple(record)?, registry)
    }

    /// Writes all three backing columns from `measurement`.
    ///
    /// Nothing is written unless every part fits its column.
    pub fn set(&self, instance: Option<&mut Record>, measurement: &Measurement) -> FieldResult<()> {
        let record = instance.ok_or_else(|| FieldError::Unbound(self.name.clone()))?;
        let [unit, measure, value] = self.clean_triple(codec::decompose(measurement))?;
        record.set(self.unit_column(), unit);
        record.set(self.measure_column(), measure);
        record.set(self.value_column(), value);
        Ok(())
    }

    /// Replaces the logical keyword with its three backing keywords.
    ///
    /// A null value is dropped so the backing columns keep their defaults.
    pub fn rewrite_kwargs(&self, kwargs: &mut Kwargs) -> FieldResult<()> {
        match kwargs.remove(&self.name) {
            None | Some(FieldValue::Null) => Ok(()),
            Some(FieldValue::Measurement(m)) => {
                let [unit, measure, value] = self.clean_triple(codec::decompose(&m))?;
                kwargs.insert(self.unit_column(), FieldValue::from(unit));
                kwargs.insert(self.measure_column(), FieldValue::from(measure));
                kwargs.insert(self.value_column(), FieldValue::from(value));
                Ok(())
            }
            Some(other) => Err(FieldError::InvalidType {
                value: other.describe(),
                type_given: other.type_name().to_string(),
                type_wanted: "Measurement".to_string(),
            }),
        }
    }

    /// Cleans the parts against the backing columns, in column order.
    fn clean_triple(&self, triple: StandardTriple) -> FieldResult<[Value; 3]> {
        let [unit_column, measure_column, value_column] = self.columns();
        Ok([
            unit_column.clean(FieldValue::Text(triple.unit))?,
            measure_column.clean(FieldValue::Text(triple.measure))?,
            value_column.clean(FieldValue::Number(triple.value))?,
        ])
    }

    /// Introspection record for schema-diffing tools. The field takes no
    /// options; everything it needs is stored per row.
    pub fn deconstruct(&self) -> Deconstructed {
        Deconstructed {
            name: self.name.clone(),
            path: COMPOSITE_FIELD_PATH.to_string(),
            kwargs: Default::default(),
        }
    }
}
