//! Measure types: a physical quantity with a fixed standard unit and a set of
//! convertible alternate units.

use crate::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;

/// The capability set a measure type must expose.
///
/// A measure knows its own name, the unit it stores and compares values in,
/// and how each of its units relates to that standard unit.
pub trait Measure: fmt::Debug + Send + Sync {
    /// The measure type's identifier (e.g. `"Distance"`).
    fn name(&self) -> &str;

    /// The unit values are normalized to for storage and comparison.
    fn standard_unit(&self) -> &str;

    /// Looks up how `unit` relates to the standard unit.
    fn scale(&self, unit: &str) -> Option<UnitScale>;

    /// All unit tokens this measure accepts, aliases included.
    fn units(&self) -> Vec<&str>;

    fn has_unit(&self, unit: &str) -> bool {
        self.scale(unit).is_some()
    }

    /// Converts `magnitude` expressed in `unit` to the standard unit.
    fn to_standard(&self, magnitude: f64, unit: &str) -> Result<f64> {
        self.scale(unit)
            .map(|s| s.to_standard(magnitude))
            .ok_or_else(|| unknown_unit(self.name(), unit))
    }

    /// Converts a standard-unit magnitude into `unit`.
    fn from_standard(&self, standard: f64, unit: &str) -> Result<f64> {
        self.scale(unit)
            .map(|s| s.from_standard(standard))
            .ok_or_else(|| unknown_unit(self.name(), unit))
    }
}

fn unknown_unit(measure: &str, unit: &str) -> Error {
    Error::UnknownUnit {
        measure: measure.to_string(),
        unit: unit.to_string(),
    }
}

/// Affine relation between a unit and its measure's standard unit:
/// `standard = magnitude * factor + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitScale {
    pub factor: f64,
    pub offset: f64,
}

impl UnitScale {
    /// The standard unit's own scale.
    pub const IDENTITY: UnitScale = UnitScale {
        factor: 1.0,
        offset: 0.0,
    };

    #[must_use]
    pub const fn linear(factor: f64) -> Self {
        Self {
            factor,
            offset: 0.0,
        }
    }

    #[must_use]
    pub fn to_standard(&self, magnitude: f64) -> f64 {
        magnitude * self.factor + self.offset
    }

    #[must_use]
    pub fn from_standard(&self, standard: f64) -> f64 {
        (standard - self.offset) / self.factor
    }
}

/// A measure defined by a table of unit scales.
///
/// The standard unit is always registered with [`UnitScale::IDENTITY`].
#[derive(Debug, Clone)]
pub struct LinearMeasure {
    name: String,
    standard_unit: String,
    units: BTreeMap<String, UnitScale>,
}

impl LinearMeasure {
    /// Creates a measure with only its standard unit.
    pub fn new(name: impl Into<String>, standard_unit: impl Into<String>) -> Self {
        let standard_unit = standard_unit.into();
        let mut units = BTreeMap::new();
        units.insert(standard_unit.clone(), UnitScale::IDENTITY);
        Self {
            name: name.into(),
            standard_unit,
            units,
        }
    }

    /// Adds a unit worth `factor` standard units.
    #[must_use]
    pub fn unit(self, unit: &str, factor: f64) -> Self {
        self.scaled(unit, UnitScale::linear(factor))
    }

    /// Adds a unit with a zero point that differs from the standard unit's.
    #[must_use]
    pub fn offset_unit(self, unit: &str, factor: f64, offset: f64) -> Self {
        self.scaled(unit, UnitScale { factor, offset })
    }

    /// Adds `alias` as another spelling of an already registered unit.
    /// Aliases of unknown units are ignored.
    #[must_use]
    pub fn alias(self, alias: &str, target: &str) -> Self {
        match self.units.get(target).copied() {
            Some(scale) => self.scaled(alias, scale),
            None => self,
        }
    }

    /// Returns the same unit table under a different measure name.
    #[must_use]
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn scaled(mut self, unit: &str, scale: UnitScale) -> Self {
        if unit != self.standard_unit {
            self.units.insert(unit.to_string(), scale);
        }
        self
    }
}

impl Measure for LinearMeasure {
    fn name(&self) -> &str {
        &self.name
    }

    fn standard_unit(&self) -> &str {
        &self.standard_unit
    }

    fn scale(&self, unit: &str) -> Option<UnitScale> {
        self.units.get(unit).copied()
    }

    fn units(&self) -> Vec<&str> {
        self.units.keys().map(String::as_str).collect()
    }
}

/// The measure types available out of the box.
///
/// Unit tokens follow the short lowercase naming measurement libraries
/// commonly use (`mi`, `kg`, `sq_ft`, `mi__hr`).
pub mod builtin {
    use super::LinearMeasure;

    pub fn distance() -> LinearMeasure {
        LinearMeasure::new("Distance", "m")
            .unit("km", 1000.0)
            .unit("cm", 0.01)
            .unit("mm", 0.001)
            .unit("um", 1e-6)
            .unit("inch", 0.0254)
            .unit("ft", 0.3048)
            .unit("yd", 0.9144)
            .unit("chain", 20.1168)
            .unit("furlong", 201.168)
            .unit("mi", 1609.344)
            .unit("nmi", 1852.0)
            .alias("meter", "m")
            .alias("metre", "m")
            .alias("kilometer", "km")
            .alias("foot", "ft")
            .alias("yard", "yd")
            .alias("mile", "mi")
    }

    pub fn mass() -> LinearMeasure {
        LinearMeasure::new("Mass", "kg")
            .unit("g", 0.001)
            .unit("mg", 1e-6)
            .unit("ug", 1e-9)
            .unit("tonne", 1000.0)
            .unit("lb", 0.453_592_37)
            .unit("oz", 0.028_349_523_125)
            .unit("stone", 6.350_293_18)
            .unit("short_ton", 907.184_74)
            .unit("long_ton", 1016.046_908_8)
            .alias("gram", "g")
            .alias("kilogram", "kg")
            .alias("pound", "lb")
            .alias("ounce", "oz")
    }

    /// Same table as [`mass`], kept under the name older schemas used.
    pub fn weight() -> LinearMeasure {
        mass().renamed("Weight")
    }

    pub fn temperature() -> LinearMeasure {
        let f_factor = 5.0 / 9.0;
        LinearMeasure::new("Temperature", "k")
            .offset_unit("c", 1.0, 273.15)
            .offset_unit("f", f_factor, 273.15 - 32.0 * f_factor)
            .alias("kelvin", "k")
            .alias("celsius", "c")
            .alias("fahrenheit", "f")
    }

    pub fn volume() -> LinearMeasure {
        LinearMeasure::new("Volume", "cubic_meter")
            .unit("l", 0.001)
            .unit("ml", 1e-6)
            .unit("cubic_centimeter", 1e-6)
            .unit("cubic_foot", 0.028_316_846_592)
            .unit("cubic_inch", 1.638_706_4e-5)
            .unit("us_g", 0.003_785_411_784)
            .unit("us_qt", 0.000_946_352_946)
            .unit("us_pint", 0.000_473_176_473)
            .unit("us_oz", 2.957_352_956_25e-5)
            .unit("imperial_g", 0.004_546_09)
            .alias("liter", "l")
            .alias("litre", "l")
    }

    pub fn area() -> LinearMeasure {
        LinearMeasure::new("Area", "sq_m")
            .unit("sq_km", 1e6)
            .unit("sq_cm", 1e-4)
            .unit("sq_ft", 0.092_903_04)
            .unit("sq_in", 0.000_645_16)
            .unit("sq_mi", 2_589_988.110_336)
            .unit("acre", 4_046.856_422_4)
            .unit("hectare", 10_000.0)
    }

    pub fn time() -> LinearMeasure {
        LinearMeasure::new("Time", "s")
            .unit("ms", 0.001)
            .unit("us", 1e-6)
            .unit("min", 60.0)
            .unit("hr", 3600.0)
            .unit("day", 86_400.0)
            .unit("week", 604_800.0)
    }

    pub fn speed() -> LinearMeasure {
        LinearMeasure::new("Speed", "m__s")
            .unit("km__hr", 1.0 / 3.6)
            .unit("mi__hr", 0.447_04)
            .unit("ft__s", 0.3048)
            .unit("kt", 1852.0 / 3600.0)
    }

    /// Every built-in measure, in registration order.
    pub fn all() -> Vec<LinearMeasure> {
        vec![
            distance(),
            mass(),
            weight(),
            temperature(),
            volume(),
            area(),
            time(),
            speed(),
        ]
    }
}
