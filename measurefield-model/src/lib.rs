//! Model fields that persist unit-tagged measurements.
//!
//! Application code reads and writes [`Measurement`](measurefield_types::Measurement)
//! values; storage only ever sees scalars. Two mappings are offered:
//! - [`MeasurementField`]: one float column in a measure type fixed at
//!   declaration time. Values are normalized to the standard unit on the way
//!   in and rebuilt in the field's default unit on the way out.
//! - [`CompositeField`]: three columns (`<name>_value`, `<name>_measure`,
//!   `<name>_unit`) so each row carries its own measure type and display unit.
//!
//! Both plug into a [`ModelSchema`], which owns the column list and turns
//! constructor [`Kwargs`] into a stored [`Record`]. Rich values travel as
//! `"<value>:<unit>"` strings when serialized (see [`text`]).

pub mod codec;
mod composite;
mod config;
mod error;
mod field;
mod record;
mod schema;
pub mod text;
pub mod units;
mod value;

pub use codec::StandardTriple;
pub use composite::{COMPOSITE_FIELD_PATH, CompositeField, MEASURE_MAX_LENGTH, UNIT_MAX_LENGTH};
pub use config::{FieldConfig, FieldKind, MeasurementFieldConfig, SchemaConfig};
pub use error::{FieldError, FieldResult};
pub use field::{Deconstructed, INTROSPECTION_RULES, MEASUREMENT_FIELD_PATH, MeasurementField};
pub use record::Record;
pub use schema::{ColumnSpec, ColumnType, ModelSchema};
pub use units::UnitChoice;
pub use value::{FieldValue, Kwargs};
