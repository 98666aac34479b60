//! Declarative model schemas.
//!
//! A schema is plain JSON so it can be shipped alongside data and resolved
//! against a [`MeasureRegistry`] at startup:
//!
//! ```json
//! {
//!   "module": "shipping",
//!   "model": "Parcel",
//!   "fields": [
//!     {"name": "label", "kind": "text", "max_length": 80},
//!     {"name": "weight", "kind": "measurement", "measurement": "Mass",
//!      "unit_choices": [["lb", "Pounds"], ["kg", "Kilograms"]]},
//!     {"name": "reading", "kind": "composite"}
//!   ]
//! }
//! ```

use crate::units::UnitChoice;
use crate::{ColumnSpec, CompositeField, FieldResult, MeasurementField, ModelSchema};
use measurefield_types::MeasureRegistry;
use serde::{Deserialize, Serialize};

/// Options for a single-column measurement field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementFieldConfig {
    /// Measure type name, resolved through the registry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurement: Option<String>,
    /// Deprecated spelling of `measurement`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurement_class: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unit_choices: Vec<UnitChoice>,
    pub null: bool,
    pub blank: bool,
    pub strict_units: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Float {
        #[serde(default)]
        null: bool,
    },
    Text {
        #[serde(default)]
        max_length: Option<usize>,
    },
    Measurement(MeasurementFieldConfig),
    Composite,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    pub module: String,
    pub model: String,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

impl SchemaConfig {
    pub fn from_json(json: &str) -> FieldResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl ModelSchema {
    /// Builds a schema from configuration, failing on the first field whose
    /// measure is missing or unknown.
    pub fn from_config(config: &SchemaConfig, registry: &MeasureRegistry) -> FieldResult<Self> {
        let mut schema = ModelSchema::new(&config.module, &config.model);
        for field in &config.fields {
            match &field.kind {
                FieldKind::Float { null } => {
                    schema.add_column(ColumnSpec::float(&field.name).nullable(*null))?;
                }
                FieldKind::Text { max_length } => {
                    schema.add_column(ColumnSpec::text(&field.name, *max_length))?;
                }
                FieldKind::Measurement(options) => {
                    let measurement = MeasurementField::from_config(options, registry)?;
                    schema.add_measurement(&field.name, measurement)?;
                }
                FieldKind::Composite => {
                    schema.add_composite(&field.name, CompositeField::new())?;
                }
            }
        }
        Ok(schema)
    }
}
