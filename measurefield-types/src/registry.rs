use crate::measure::builtin;
use crate::{Error, Measure, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Read-only lookup of measure types by name.
///
/// Populated once at startup and then shared by reference; nothing mutates it
/// after construction, so concurrent reads need no locking.
#[derive(Debug, Clone, Default)]
pub struct MeasureRegistry {
    measures: BTreeMap<String, Arc<dyn Measure>>,
}

impl MeasureRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in measure.
    #[must_use]
    pub fn standard() -> Self {
        builtin::all()
            .into_iter()
            .fold(Self::new(), |registry, measure| registry.with(measure))
    }

    /// Adds a measure, replacing any previous measure of the same name.
    #[must_use]
    pub fn with(self, measure: impl Measure + 'static) -> Self {
        self.with_shared(Arc::new(measure))
    }

    #[must_use]
    pub fn with_shared(mut self, measure: Arc<dyn Measure>) -> Self {
        self.measures.insert(measure.name().to_string(), measure);
        self
    }

    /// Resolves a measure type by name.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Measure>> {
        self.measures
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownMeasure(name.to_string()))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.measures.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.measures.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.measures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.measures.is_empty()
    }
}
