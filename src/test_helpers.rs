//! Helpers for tests of code built on rowguard.
//!
//! Enabled under `cfg(test)` and with the `test-helpers` feature.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::schema::{MemoryCatalog, SchemaResolver, Table};

/// A [`MemoryCatalog`] that counts how often it is asked to resolve an alias.
///
/// ```rust
/// use std::sync::Arc;
/// use rowguard::test_helpers::CountingResolver;
/// use rowguard::{Action, RowEvent, SchemaResolver, Table, TableColumn};
///
/// let table = Table::new("app", "users", vec![TableColumn::new("id", "bigint")])?;
/// let resolver = Arc::new(CountingResolver::with_table("users", table));
/// let event = RowEvent::new(1, Action::Insert, "app", "users")
///     .with_shared_resolver(Arc::clone(&resolver) as Arc<dyn SchemaResolver>);
/// event.resolved_table();
/// event.resolved_table();
/// assert_eq!(resolver.calls(), 1);
/// # Ok::<(), rowguard::SchemaError>(())
/// ```
#[derive(Debug, Default)]
pub struct CountingResolver {
    catalog: MemoryCatalog,
    calls: AtomicUsize,
}

impl CountingResolver {
    pub fn new(catalog: MemoryCatalog) -> Self {
        Self {
            catalog,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_table(alias: impl Into<String>, table: impl Into<Arc<Table>>) -> Self {
        let mut catalog = MemoryCatalog::new();
        catalog.insert(alias, table);
        Self::new(catalog)
    }

    /// Number of `resolve` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SchemaResolver for CountingResolver {
    fn resolve(&self, alias: &str) -> Option<Arc<Table>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.catalog.resolve(alias)
    }
}
