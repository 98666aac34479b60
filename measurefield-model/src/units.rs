//! Which unit a bare number is read in or displayed as.

use crate::FieldResult;
use measurefield_types::{Error, Measure};
use serde::{Deserialize, Serialize};

/// A selectable `(unit, label)` pair. Serializes as a two-element array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitChoice(pub String, pub String);

impl UnitChoice {
    pub fn new(unit: impl Into<String>, label: impl Into<String>) -> Self {
        Self(unit.into(), label.into())
    }

    pub fn unit(&self) -> &str {
        &self.0
    }

    pub fn label(&self) -> &str {
        &self.1
    }
}

/// The unit a field falls back to: the first configured choice if there is
/// one, otherwise the measure's own standard unit.
pub fn default_unit<'a>(measure: &'a dyn Measure, choices: &'a [UnitChoice]) -> &'a str {
    choices
        .first()
        .map_or_else(|| measure.standard_unit(), UnitChoice::unit)
}

/// Rejects choices naming units the measure cannot convert.
pub fn check_choices(measure: &dyn Measure, choices: &[UnitChoice]) -> FieldResult<()> {
    match choices.iter().find(|c| !measure.has_unit(c.unit())) {
        Some(bad) => Err(Error::UnknownUnit {
            measure: measure.name().to_string(),
            unit: bad.unit().to_string(),
        }
        .into()),
        None => Ok(()),
    }
}
