//! The `"<value>:<unit>"` interchange format.

use crate::FieldResult;
use measurefield_types::{Measure, Measurement};
use std::sync::Arc;

pub const SEPARATOR: char = ':';

/// Formats a float the way dynamic-language runtimes print them: shortest
/// round-trip digits, always with a fractional part or an exponent, and
/// scientific notation outside `1e-4 <= |v| < 1e16`.
#[must_use]
pub fn format_magnitude(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let scientific = format!("{v:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if v == 0.0 || (-4..16).contains(&exponent) {
        let plain = v.to_string();
        if plain.contains('.') {
            plain
        } else {
            format!("{plain}.0")
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}

/// Serializes a measurement in its display unit.
#[must_use]
pub fn encode(measurement: &Measurement) -> String {
    format!(
        "{}{SEPARATOR}{}",
        format_magnitude(measurement.value()),
        measurement.unit()
    )
}

/// Parses `"<value>:<unit>"` into a measurement of `measure`.
///
/// Text without a separator is not an error: `Ok(None)` lets callers fall
/// back to plain numeric parsing. A non-numeric magnitude is an error.
pub fn decode(measure: &Arc<dyn Measure>, text: &str) -> FieldResult<Option<Measurement>> {
    let Some((magnitude, unit)) = text.split_once(SEPARATOR) else {
        return Ok(None);
    };
    let magnitude: f64 = magnitude.trim().parse()?;
    Ok(Some(Measurement::new(Arc::clone(measure), magnitude, unit)?))
}
