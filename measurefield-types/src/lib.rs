//! Measure types and unit-tagged measurement values.
//!
//! This crate defines the value layer that storage fields build on:
//! - [`Measure`]: the capability set every measure type exposes
//!   (standard unit, known units, conversion to and from the standard unit)
//! - [`LinearMeasure`]: a table-driven measure covering scaled and offset units
//! - [`Measurement`]: a magnitude tagged with its measure type and display unit
//! - [`MeasureRegistry`]: a read-only name → measure lookup, built once at startup
//!
//! Conversion is always routed through the measure's standard unit, so two
//! measurements of the same type compare by their standard magnitude no matter
//! which unit they were entered in.

mod measure;
mod measurement;
mod registry;

pub use measure::{LinearMeasure, Measure, UnitScale, builtin};
pub use measurement::Measurement;
pub use registry::MeasureRegistry;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when resolving or converting measures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("unknown measure type: {0}")]
    UnknownMeasure(String),

    #[error("unknown unit '{unit}' for measure {measure}")]
    UnknownUnit { measure: String, unit: String },
}
