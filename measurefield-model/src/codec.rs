//! Splitting a measurement into storage-safe parts and rebuilding it.

use crate::FieldResult;
use measurefield_types::{Measure, MeasureRegistry, Measurement};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The three stored parts of a measurement: standard-unit magnitude,
/// measure type name and display unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardTriple {
    pub value: f64,
    pub measure: String,
    pub unit: String,
}

/// Splits a measurement into its stored parts.
#[must_use]
pub fn decompose(measurement: &Measurement) -> StandardTriple {
    StandardTriple {
        value: measurement.standard(),
        measure: measurement.measure_name().to_string(),
        unit: measurement.unit().to_string(),
    }
}

/// Rebuilds a measurement, resolving the measure type by name.
pub fn recompose(triple: &StandardTriple, registry: &MeasureRegistry) -> FieldResult<Measurement> {
    let measure = registry.resolve(&triple.measure)?;
    restore(measure, triple.value, &triple.unit)
}

/// Rebuilds a measurement of a known measure type from a standard-unit
/// magnitude, then switches it to `unit` for display.
pub fn restore(measure: Arc<dyn Measure>, standard: f64, unit: &str) -> FieldResult<Measurement> {
    Ok(Measurement::from_standard(measure, standard).with_unit(unit)?)
}
