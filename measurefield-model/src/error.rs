//! Error types for the field layer.

use std::num::ParseFloatError;
use thiserror::Error;

/// Result type for field operations.
pub type FieldResult<T> = Result<T, FieldError>;

/// Errors that can occur when declaring, storing or loading measurement fields.
#[derive(Debug, Error)]
pub enum FieldError {
    /// Measure resolution or unit conversion failed.
    #[error(transparent)]
    Measure(#[from] measurefield_types::Error),

    /// A measurement field was declared without a measure type.
    #[error("MeasurementField() takes a measurement keyword argument. None given.")]
    MissingMeasure,

    /// The declared measure type does not behave like a measure.
    #[error("MeasurementField() takes a measurement keyword argument. {0} is not a valid measure type.")]
    InvalidMeasure(String),

    /// A composite field was written without a record to write into.
    #[error("{0} must be accessed via instance")]
    Unbound(String),

    /// Input could not be coerced to a float.
    #[error("'{value}' value must be a float.")]
    InvalidFloat { value: String },

    /// The magnitude half of a `"<value>:<unit>"` string is not a number.
    #[error("invalid magnitude: {0}")]
    ParseMagnitude(#[from] ParseFloatError),

    /// Value has the wrong type for the field.
    #[error("'{value}' ({type_given}) value must be of type {type_wanted}.")]
    InvalidType {
        value: String,
        type_given: String,
        type_wanted: String,
    },

    /// A bare number was assigned to a field that refuses to guess its unit.
    #[error("{field} expects a {measure} measurement, got a bare {type_given}")]
    AmbiguousUnit {
        field: String,
        measure: String,
        type_given: String,
    },

    /// Text longer than its column allows.
    #[error("Ensure {column} has at most {max_length} characters (it has {length}).")]
    TooLong {
        column: String,
        max_length: usize,
        length: usize,
    },

    /// Null written to a column that does not allow it.
    #[error("{column} cannot be null.")]
    NotNullable { column: String },

    /// Constructor keyword that matches no column or field.
    #[error("{model}() got an unexpected keyword argument '{column}'")]
    UnknownColumn { model: String, column: String },

    /// Two columns with the same name on one model.
    #[error("{model} already has a column named '{column}'")]
    DuplicateColumn { model: String, column: String },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
