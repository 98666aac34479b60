use crate::value::{coerce_float, float_value};
use crate::{CompositeField, FieldError, FieldResult, FieldValue, Kwargs, MeasurementField, Record};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// The storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Float,
    Text,
}

/// A stored column on a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub column_type: ColumnType,
    /// Maximum length. Only meaningful when `column_type` is Text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    pub editable: bool,
    pub blank: bool,
    pub null: bool,
    #[serde(default)]
    pub default: Value,
}

impl ColumnSpec {
    fn simple(name: &str, column_type: ColumnType, default: Value) -> Self {
        Self {
            name: name.into(),
            column_type,
            max_length: None,
            editable: true,
            blank: false,
            null: false,
            default,
        }
    }

    /// Shorthand for a float column (defaults to null).
    pub fn float(name: &str) -> Self {
        Self::simple(name, ColumnType::Float, Value::Null)
    }

    /// Shorthand for a text column (defaults to the empty string).
    pub fn text(name: &str, max_length: Option<usize>) -> Self {
        Self {
            max_length,
            ..Self::simple(name, ColumnType::Text, Value::String(String::new()))
        }
    }

    #[must_use]
    pub fn non_editable(mut self) -> Self {
        self.editable = false;
        self
    }

    #[must_use]
    pub fn blank(mut self) -> Self {
        self.blank = true;
        self
    }

    #[must_use]
    pub fn nullable(mut self, null: bool) -> Self {
        self.null = null;
        self
    }

    /// Converts a constructor argument into this column's stored form.
    ///
    /// Null is refused unless the column is nullable, and text is refused
    /// when it exceeds `max_length` characters.
    pub fn clean(&self, value: FieldValue) -> FieldResult<Value> {
        let cleaned = match (self.column_type, value) {
            (_, FieldValue::Null) => Value::Null,
            (_, FieldValue::Measurement(m)) => {
                return Err(FieldError::InvalidType {
                    value: m.to_string(),
                    type_given: m.measure_name().to_string(),
                    type_wanted: self.type_wanted().to_string(),
                });
            }
            (ColumnType::Float, other) => float_value(coerce_float(&other)?)?,
            (ColumnType::Text, FieldValue::Text(s)) => Value::String(s),
            (ColumnType::Text, FieldValue::Number(n)) => Value::String(n.to_string()),
            (ColumnType::Text, FieldValue::Raw(v)) => v,
        };
        self.check(&cleaned)?;
        Ok(cleaned)
    }

    /// Checks a stored-form value against the column's null and length limits.
    pub fn check(&self, value: &Value) -> FieldResult<()> {
        match value {
            Value::Null if !self.null => Err(FieldError::NotNullable {
                column: self.name.clone(),
            }),
            Value::String(s) => match self.max_length {
                Some(max_length) if s.chars().count() > max_length => Err(FieldError::TooLong {
                    column: self.name.clone(),
                    max_length,
                    length: s.chars().count(),
                }),
                _ => Ok(()),
            },
            _ => Ok(()),
        }
    }

    fn type_wanted(&self) -> &'static str {
        match self.column_type {
            ColumnType::Float => "float",
            ColumnType::Text => "str",
        }
    }
}

/// A model declaration: its columns plus the measurement fields attached to it.
#[derive(Debug, Clone)]
pub struct ModelSchema {
    pub module: String,
    pub model: String,
    columns: Vec<ColumnSpec>,
    composites: Vec<CompositeField>,
    measurements: Vec<MeasurementField>,
}

impl ModelSchema {
    pub fn new(module: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            model: model.into(),
            columns: Vec::new(),
            composites: Vec::new(),
            measurements: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn composite(&self, name: &str) -> Option<&CompositeField> {
        self.composites.iter().find(|c| c.name() == name)
    }

    pub fn measurement(&self, name: &str) -> Option<&MeasurementField> {
        self.measurements.iter().find(|m| m.name() == name)
    }

    pub fn add_column(&mut self, column: ColumnSpec) -> FieldResult<()> {
        self.check_free([column.name.as_str()])?;
        self.columns.push(column);
        Ok(())
    }

    /// Attaches a composite field under `name`: provisions its three backing
    /// columns and registers its constructor-argument rewrite.
    pub fn add_composite(&mut self, name: &str, field: CompositeField) -> FieldResult<()> {
        let field = field.attach(name);
        let columns = field.columns();
        self.check_free(columns.iter().map(|c| c.name.as_str()))?;
        self.check_free([name])?;
        debug!(
            model = %self.model,
            field = %name,
            "provisioned composite measurement columns"
        );
        self.columns.extend(columns);
        self.composites.push(field);
        Ok(())
    }

    /// Attaches a single-column measurement field under `name`.
    pub fn add_measurement(&mut self, name: &str, field: MeasurementField) -> FieldResult<()> {
        let field = field.attach(&self.module, &self.model, name);
        self.add_column(field.column())?;
        self.measurements.push(field);
        Ok(())
    }

    /// Builds a record from constructor arguments.
    ///
    /// Composite fields rewrite their logical keyword into the three backing
    /// keywords first; measurement fields coerce and normalize their value;
    /// any other keyword must name a column.
    pub fn build(&self, mut kwargs: Kwargs) -> FieldResult<Record> {
        for composite in &self.composites {
            composite.rewrite_kwargs(&mut kwargs)?;
        }

        let mut record = Record::new(&self.model);
        for column in &self.columns {
            record.set(&column.name, column.default.clone());
        }

        for (key, value) in kwargs {
            if let Some(field) = self.measurement(&key) {
                field.set(&mut record, value)?;
                continue;
            }
            let column = self.column(&key).ok_or_else(|| FieldError::UnknownColumn {
                model: self.model.clone(),
                column: key.clone(),
            })?;
            record.set(key, column.clean(value)?);
        }
        Ok(record)
    }

    fn check_free<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> FieldResult<()> {
        for name in names {
            let taken = self.column(name).is_some() || self.composite(name).is_some();
            if taken {
                return Err(FieldError::DuplicateColumn {
                    model: self.model.clone(),
                    column: name.to_string(),
                });
            }
        }
        Ok(())
    }
}
