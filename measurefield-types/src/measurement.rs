//! Unit-tagged measurement values.

use crate::{Measure, Result};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;
use std::sync::Arc;

/// A magnitude tagged with its measure type and display unit.
///
/// The magnitude is held in the measure's standard unit. The display unit
/// only affects how the value is presented; changing it never changes the
/// stored magnitude.
#[derive(Debug, Clone)]
pub struct Measurement {
    measure: Arc<dyn Measure>,
    standard: f64,
    unit: String,
}

impl Measurement {
    /// Creates a measurement of `magnitude` expressed in `unit`.
    pub fn new(measure: Arc<dyn Measure>, magnitude: f64, unit: &str) -> Result<Self> {
        let standard = measure.to_standard(magnitude, unit)?;
        Ok(Self {
            measure,
            standard,
            unit: unit.to_string(),
        })
    }

    /// Creates a measurement from a standard-unit magnitude, displayed in the
    /// standard unit.
    #[must_use]
    pub fn from_standard(measure: Arc<dyn Measure>, standard: f64) -> Self {
        let unit = measure.standard_unit().to_string();
        Self {
            measure,
            standard,
            unit,
        }
    }

    /// The magnitude expressed in the display unit.
    #[must_use]
    pub fn value(&self) -> f64 {
        // `unit` is checked against the measure whenever it is set.
        self.measure
            .scale(&self.unit)
            .map_or(self.standard, |s| s.from_standard(self.standard))
    }

    /// The magnitude expressed in `unit`, leaving the display unit alone.
    pub fn value_in(&self, unit: &str) -> Result<f64> {
        self.measure.from_standard(self.standard, unit)
    }

    /// The magnitude in the measure's standard unit.
    #[must_use]
    pub fn standard(&self) -> f64 {
        self.standard
    }

    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    #[must_use]
    pub fn measure(&self) -> &Arc<dyn Measure> {
        &self.measure
    }

    #[must_use]
    pub fn measure_name(&self) -> &str {
        self.measure.name()
    }

    /// Switches the display unit.
    pub fn set_unit(&mut self, unit: &str) -> Result<()> {
        self.measure.from_standard(self.standard, unit)?;
        self.unit = unit.to_string();
        Ok(())
    }

    /// Consuming variant of [`Measurement::set_unit`].
    pub fn with_unit(mut self, unit: &str) -> Result<Self> {
        self.set_unit(unit)?;
        Ok(self)
    }
}

impl PartialEq for Measurement {
    fn eq(&self, other: &Self) -> bool {
        self.measure_name() == other.measure_name()
            && self.standard == other.standard
            && self.unit == other.unit
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value(), self.unit)
    }
}

impl Serialize for Measurement {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Measurement", 3)?;
        state.serialize_field("measure", self.measure_name())?;
        state.serialize_field("value", &self.value())?;
        state.serialize_field("unit", &self.unit)?;
        state.end()
    }
}
