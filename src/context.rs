//! Processing context shared by the events of one consumer.
//!
//! The context carries the injected [`SchemaResolver`] and the
//! [`ConsumerConfig`]. It is created once per consumer lifetime, wrapped in an
//! `Arc`, and attached to every event the consumer builds.
//!
//! ```rust
//! use std::sync::Arc;
//! use rowguard::{Action, EventContext, MemoryCatalog, RowEvent, Table, TableColumn};
//!
//! let mut catalog = MemoryCatalog::new();
//! catalog.insert(
//!     "orders",
//!     Table::new("shop", "orders", vec![TableColumn::new("id", "bigint")]).unwrap(),
//! );
//! let ctx = Arc::new(EventContext::default().with_resolver(catalog));
//!
//! let event = ctx.create_event(1, Action::Insert, "shop", "orders");
//! assert!(event.resolved_table().is_some());
//!
//! let manual = RowEvent::new(2, Action::Delete, "shop", "orders").with_context(Arc::clone(&ctx));
//! assert!(manual.has_column("ID"));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::config::ConsumerConfig;
use crate::event::{Action, RowEvent};
use crate::schema::SchemaResolver;

#[derive(Clone, Default)]
pub struct EventContext {
    resolver: Option<Arc<dyn SchemaResolver>>,
    config: ConsumerConfig,
}

impl EventContext {
    /// A context with the given configuration and no resolver.
    #[must_use]
    pub fn new(config: ConsumerConfig) -> Self {
        Self {
            resolver: None,
            config,
        }
    }

    #[must_use]
    pub fn with_resolver(self, resolver: impl SchemaResolver + 'static) -> Self {
        self.with_shared_resolver(Arc::new(resolver))
    }

    #[must_use]
    pub fn with_shared_resolver(mut self, resolver: Arc<dyn SchemaResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    #[must_use]
    pub fn resolver(&self) -> Option<&dyn SchemaResolver> {
        self.resolver.as_deref()
    }

    #[must_use]
    pub fn config(&self) -> &ConsumerConfig {
        &self.config
    }

    /// A new event with empty snapshots, attached to this context.
    pub fn create_event(
        self: &Arc<Self>,
        id: u64,
        action: Action,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> RowEvent {
        RowEvent::new(id, action, schema, table).with_context(Arc::clone(self))
    }
}

impl fmt::Debug for EventContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventContext")
            .field("resolver", &self.resolver.as_ref().map(|_| "<resolver>"))
            .field("config", &self.config)
            .finish()
    }
}
