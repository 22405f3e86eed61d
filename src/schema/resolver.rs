//! Schema resolution.
//!
//! The table catalog lives outside this crate. Consumers inject a
//! [`SchemaResolver`] that maps an event's alias to its [`Table`]; events call
//! it lazily, at most once each.

use std::collections::HashMap;
use std::sync::Arc;

use super::Table;

/// Maps a table alias to its metadata.
///
/// Implementations should be cheap and side-effect free. Returning `None`
/// means "unknown alias", which events treat as a permanent "no table" state.
///
/// Any `Fn(&str) -> Option<Arc<Table>>` closure is a resolver:
///
/// ```rust
/// use std::sync::Arc;
/// use rowguard::{SchemaResolver, Table};
///
/// let resolver = |alias: &str| -> Option<Arc<Table>> {
///     (alias == "orders").then(|| Arc::new(Table::new("shop", "orders_v2", vec![]).unwrap()))
/// };
/// assert!(resolver.resolve("orders").is_some());
/// assert!(resolver.resolve("refunds").is_none());
/// ```
pub trait SchemaResolver: Send + Sync {
    fn resolve(&self, alias: &str) -> Option<Arc<Table>>;
}

impl<F> SchemaResolver for F
where
    F: Fn(&str) -> Option<Arc<Table>> + Send + Sync,
{
    fn resolve(&self, alias: &str) -> Option<Arc<Table>> {
        self(alias)
    }
}

/// An in-memory alias to table map.
///
/// Filling the map is the caller's job; this type only answers lookups.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    tables: HashMap<String, Arc<Table>>,
}

impl MemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `table` under `alias`, returning the table previously registered there.
    pub fn insert(&mut self, alias: impl Into<String>, table: impl Into<Arc<Table>>) -> Option<Arc<Table>> {
        self.tables.insert(alias.into(), table.into())
    }

    pub fn remove(&mut self, alias: &str) -> Option<Arc<Table>> {
        self.tables.remove(alias)
    }

    #[must_use]
    pub fn get(&self, alias: &str) -> Option<&Arc<Table>> {
        self.tables.get(alias)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl SchemaResolver for MemoryCatalog {
    fn resolve(&self, alias: &str) -> Option<Arc<Table>> {
        self.tables.get(alias).cloned()
    }
}
