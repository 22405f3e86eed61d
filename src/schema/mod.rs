//! Table schema descriptors and schema resolution.
//!
//! - [`ColumnType`] classifies raw engine types into logical categories
//! - [`TableColumn`], [`TableIndex`] and [`Table`] describe a table
//! - [`SchemaResolver`] is the injected alias-to-table lookup

pub mod column;
pub mod column_type;
pub mod resolver;
pub mod table;

pub use column::TableColumn;
pub use column_type::ColumnType;
pub use resolver::{MemoryCatalog, SchemaResolver};
pub use table::{SchemaError, Table, TableIndex};
