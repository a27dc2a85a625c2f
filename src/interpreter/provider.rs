use std::{
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
    sync::Arc,
};

use parking_lot::RwLock;

/// Supplies the current value of named parameters.
///
/// Variables are looked up by exact, case-sensitive name every time an
/// expression is validated or evaluated, so an implementation may return
/// different values (or start and stop knowing a name) between calls. The
/// engine only reads through this trait and never mutates the provider.
pub trait ParameterProvider: Send + Sync {
    /// Returns the current value bound to `name`, if any.
    fn lookup(&self, name: &str) -> Option<f64>;

    /// Whether `name` currently has a binding.
    fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }
}

/// A provider shared between an expression and all of its sub-expressions.
pub type SharedProvider = Arc<dyn ParameterProvider>;

impl<S: BuildHasher + Send + Sync> ParameterProvider for HashMap<String, f64, S> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl ParameterProvider for BTreeMap<String, f64> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

/// A thread-safe table of live parameter values.
///
/// Keep an `Arc<ParameterTable>` to update values while expressions holding
/// the same table as their [`SharedProvider`] keep evaluating against it.
///
/// # Example
/// ```
/// use std::sync::Arc;
///
/// use expreval::interpreter::provider::{ParameterProvider, ParameterTable};
///
/// let table = Arc::new(ParameterTable::from([("A", 10.0)]));
/// assert_eq!(table.lookup("A"), Some(10.0));
///
/// table.set("A", 11.5);
/// assert_eq!(table.lookup("A"), Some(11.5));
/// assert!(!table.contains("a"));
/// ```
#[derive(Debug, Default)]
pub struct ParameterTable {
    values: RwLock<HashMap<String, f64>>,
}

impl ParameterTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `value`, returning the previous value.
    pub fn set(&self, name: impl Into<String>, value: f64) -> Option<f64> {
        self.values.write().insert(name.into(), value)
    }

    /// Removes the binding for `name`, returning its value.
    pub fn remove(&self, name: &str) -> Option<f64> {
        self.values.write().remove(name)
    }

    /// Number of bound names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Whether no names are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }

    /// Bound names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.values.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }
}

impl ParameterProvider for ParameterTable {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.values.read().get(name).copied()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for ParameterTable {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self { values: RwLock::new(iter.into_iter().map(|(k, v)| (k.into(), v)).collect()) }
    }
}

impl<K: Into<String>, const N: usize> From<[(K, f64); N]> for ParameterTable {
    fn from(pairs: [(K, f64); N]) -> Self {
        pairs.into_iter().collect()
    }
}
