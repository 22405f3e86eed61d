//! # Rowguard
//!
//! Schema-aware row change events for MySQL change-data-capture consumers.
//!
//! A [`RowEvent`] holds the before and after snapshots of one captured row
//! mutation. Column metadata is looked up lazily through an injected
//! [`SchemaResolver`], and the event answers type-aware questions about its
//! columns: was it modified, is it empty, does it equal some value.
//!
//! ```rust
//! use std::sync::Arc;
//! use rowguard::{row, Action, EventContext, MemoryCatalog, Table, TableColumn, Value};
//!
//! let orders = Table::new(
//!     "shop",
//!     "orders",
//!     vec![
//!         TableColumn::new("id", "bigint(20) unsigned"),
//!         TableColumn::new("status", "enum('new','paid')"),
//!     ],
//! )?;
//!
//! let mut catalog = MemoryCatalog::new();
//! catalog.insert("orders", orders);
//! let ctx = Arc::new(EventContext::default().with_resolver(catalog));
//!
//! let mut event = ctx
//!     .create_event(42, Action::Update, "shop", "orders")
//!     .with_before(row! { "id" => 7_u64, "status" => "new" })
//!     .with_after(row! { "id" => 7_u64, "status" => "paid" });
//!
//! assert!(event.equal("status", &Value::from("paid")));
//! assert!(event.previous_equal("id", &Value::Int(7)));
//! assert!(event.is_col_modified("status"));
//!
//! event.set_value_as_decode_json("meta", r#"{"source":"web"}"#);
//! assert!(matches!(event.value("meta"), Value::Map(_)));
//! # Ok::<(), rowguard::SchemaError>(())
//! ```
//!
//! ## Features
//!
//! - `metrics`: Prometheus counters for resolver calls, unresolved aliases and
//!   JSON decode failures
//! - `tracing`: a `resolve_table` span around each resolver call
//! - `test-helpers`: exposes [`test_helpers::CountingResolver`]

pub mod compare;
pub mod config;
pub mod context;
pub mod event;
pub mod json_helpers;
mod macros;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod schema;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
#[cfg(test)]
mod tests_cfg;
pub mod value;

pub use config::ConsumerConfig;
pub use context::EventContext;
pub use event::{Action, ParseActionError, RowEvent};
pub use schema::{
    ColumnType, MemoryCatalog, SchemaError, SchemaResolver, Table, TableColumn, TableIndex,
};
pub use value::{Row, TryGetable, Value, ValueExtractionError, ValueType};
