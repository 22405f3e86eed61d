//! The row change event.
//!
//! A [`RowEvent`] is one captured row mutation: identity, action, the before
//! and after snapshots, and the diff-column list. Schema metadata is not
//! carried with the event. It is looked up on demand through the resolver of
//! the attached [`EventContext`], at most once per event, and the result
//! (including "no table") is cached for the event's lifetime.
//!
//! # Reading values
//!
//! The value accessors always read the after snapshot, whatever the action.
//! The `previous_*` variants read the before snapshot.
//!
//! ```rust
//! use rowguard::{row, Action, RowEvent, Value};
//!
//! let event = RowEvent::new(7, Action::Update, "shop", "orders")
//!     .with_before(row! { "status" => "new" })
//!     .with_after(row! { "status" => "paid", "note" => Value::Null });
//!
//! assert_eq!(event.value("status"), &Value::from("paid"));
//! assert_eq!(event.previous_value("status"), &Value::from("new"));
//! assert!(event.is_nil("note"));
//! assert!(!event.is_nil("missing"));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};

use super::Action;
use crate::compare;
use crate::config::ConsumerConfig;
use crate::context::EventContext;
use crate::json_helpers::decode_json;
use crate::schema::{SchemaResolver, Table, TableColumn};
use crate::value::{conv, Row, TryGetable, Value, ValueExtractionError, NULL};

static DEFAULT_CONFIG: Lazy<ConsumerConfig> = Lazy::new(ConsumerConfig::default);

/// A captured row mutation.
///
/// `RowEvent` is `Send` but not `Sync`: the schema cache is a single-threaded
/// cell. Call [`RowEvent::resolved_table`] before handing clones of an event to
/// several workers so each clone starts with the cache already filled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowEvent {
    pub id: u64,
    pub schema: String,
    /// Physical table name
    pub table: String,
    /// Logical name passed to the schema resolver
    pub alias: String,
    pub action: Action,
    #[serde(default)]
    pub before: Row,
    #[serde(default)]
    pub after: Row,
    /// Changed columns, only consulted for deletes
    #[serde(default)]
    pub diff_columns: Vec<String>,
    #[serde(skip)]
    context: Option<Arc<EventContext>>,
    #[serde(skip)]
    resolved: OnceCell<Option<Arc<Table>>>,
}

impl RowEvent {
    /// Create an event with empty snapshots. The alias defaults to the table name.
    pub fn new(
        id: u64,
        action: Action,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        let table = table.into();
        Self {
            id,
            schema: schema.into(),
            alias: table.clone(),
            table,
            action,
            before: Row::new(),
            after: Row::new(),
            diff_columns: Vec::new(),
            context: None,
            resolved: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self.resolved = OnceCell::new();
        self
    }

    #[must_use]
    pub fn with_before(mut self, before: Row) -> Self {
        self.before = before;
        self
    }

    #[must_use]
    pub fn with_after(mut self, after: Row) -> Self {
        self.after = after;
        self
    }

    #[must_use]
    pub fn with_diff_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.diff_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a processing context. Clears any cached schema lookup.
    #[must_use]
    pub fn with_context(mut self, context: Arc<EventContext>) -> Self {
        self.context = Some(context);
        self.resolved = OnceCell::new();
        self
    }

    /// Attach a resolver directly, keeping the configuration of the current context.
    #[must_use]
    pub fn with_resolver(self, resolver: impl SchemaResolver + 'static) -> Self {
        self.with_shared_resolver(Arc::new(resolver))
    }

    #[must_use]
    pub fn with_shared_resolver(self, resolver: Arc<dyn SchemaResolver>) -> Self {
        let config = self.config().clone();
        let context = EventContext::new(config).with_shared_resolver(resolver);
        self.with_context(Arc::new(context))
    }

    #[must_use]
    pub fn context(&self) -> Option<&Arc<EventContext>> {
        self.context.as_ref()
    }

    fn config(&self) -> &ConsumerConfig {
        self.context
            .as_deref()
            .map_or(&*DEFAULT_CONFIG, EventContext::config)
    }

    // ============================================================================
    // Schema resolution
    // ============================================================================

    /// The table metadata for this event's alias, resolved on first call.
    ///
    /// The resolver runs at most once per event. A missing resolver or an
    /// unknown alias caches `None` permanently.
    pub fn resolved_table(&self) -> Option<&Table> {
        self.resolved.get_or_init(|| self.resolve()).as_deref()
    }

    /// Shared handle to the resolved table, for callers that outlive the event.
    pub fn shared_table(&self) -> Option<Arc<Table>> {
        self.resolved.get_or_init(|| self.resolve()).clone()
    }

    fn resolve(&self) -> Option<Arc<Table>> {
        let Some(resolver) = self.context.as_deref().and_then(EventContext::resolver) else {
            log::debug!("no schema resolver for alias {}", self.alias);
            return None;
        };

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("resolve_table", alias = %self.alias).entered();

        let table = resolver.resolve(&self.alias);

        #[cfg(feature = "metrics")]
        crate::metrics::METRICS.record_resolution(table.is_some());

        match &table {
            Some(t) => log::debug!("alias {} resolved to {}", self.alias, t.qualified_name()),
            None if self.config().warn_unresolved => {
                log::warn!("alias {} ({}.{}) resolved to no table", self.alias, self.schema, self.table)
            }
            None => log::debug!("alias {} resolved to no table", self.alias),
        }
        table
    }

    /// Column descriptor by name (case-insensitive), through the resolved table.
    pub fn column(&self, name: &str) -> Option<&TableColumn> {
        self.resolved_table()?.column(name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    /// The after snapshot.
    pub fn row(&self) -> &Row {
        &self.after
    }

    /// The before snapshot.
    pub fn previous_row(&self) -> &Row {
        &self.before
    }

    /// Value of `name` in the after snapshot, `Null` when absent.
    ///
    /// Use [`RowEvent::try_value`] to tell an absent column from a null one.
    pub fn value(&self, name: &str) -> &Value {
        self.after.get(name).unwrap_or(&NULL)
    }

    pub fn try_value(&self, name: &str) -> Option<&Value> {
        self.after.get(name)
    }

    /// Value of `name` in the before snapshot, `Null` when absent.
    pub fn previous_value(&self, name: &str) -> &Value {
        self.before.get(name).unwrap_or(&NULL)
    }

    pub fn try_previous_value(&self, name: &str) -> Option<&Value> {
        self.before.get(name)
    }

    /// Strictly typed value from the after snapshot.
    ///
    /// An absent column reports [`ValueExtractionError::NullValue`].
    ///
    /// ```rust
    /// use rowguard::{row, Action, RowEvent, ValueExtractionError};
    ///
    /// let event = RowEvent::new(1, Action::Insert, "shop", "orders")
    ///     .with_after(row! { "qty" => 3_i64, "sku" => "A-1" });
    ///
    /// assert_eq!(event.get::<i32>("qty"), Ok(3));
    /// assert_eq!(event.get::<Option<String>>("gone"), Ok(None));
    /// assert!(matches!(event.get::<i64>("sku"), Err(ValueExtractionError::TypeMismatch { .. })));
    /// ```
    pub fn get<T: TryGetable>(&self, name: &str) -> Result<T, ValueExtractionError> {
        T::try_get(self.value(name))
    }

    pub fn get_previous<T: TryGetable>(&self, name: &str) -> Result<T, ValueExtractionError> {
        T::try_get(self.previous_value(name))
    }

    /// True only when `name` is present in the after snapshot and holds `Null`.
    pub fn is_nil(&self, name: &str) -> bool {
        matches!(self.after.get(name), Some(Value::Null))
    }

    pub fn is_previous_nil(&self, name: &str) -> bool {
        matches!(self.before.get(name), Some(Value::Null))
    }

    /// Type-aware emptiness of the after value. False when the column is unknown.
    pub fn is_empty(&self, name: &str) -> bool {
        self.column(name)
            .is_some_and(|c| compare::is_empty(c.column_type, self.value(name)))
    }

    pub fn is_previous_empty(&self, name: &str) -> bool {
        self.column(name)
            .is_some_and(|c| compare::is_empty(c.column_type, self.previous_value(name)))
    }

    /// Type-aware equality of the after value with `other`. False when the column is unknown.
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use rowguard::{row, Action, RowEvent, Table, TableColumn, Value};
    ///
    /// let table = Arc::new(
    ///     Table::new("shop", "orders", vec![TableColumn::new("qty", "int(10) unsigned")]).unwrap(),
    /// );
    /// let event = RowEvent::new(1, Action::Insert, "shop", "orders")
    ///     .with_resolver(move |_: &str| Some(Arc::clone(&table)))
    ///     .with_after(row! { "qty" => "12" });
    ///
    /// assert!(event.equal("qty", &Value::UInt(12)));
    /// assert!(!event.equal("price", &Value::from("12")));
    /// ```
    pub fn equal(&self, name: &str, other: &Value) -> bool {
        self.column(name).is_some_and(|c| {
            compare::is_equal(c.column_type, c.is_unsigned, self.value(name), other)
        })
    }

    pub fn previous_equal(&self, name: &str, other: &Value) -> bool {
        self.column(name).is_some_and(|c| {
            compare::is_equal(c.column_type, c.is_unsigned, self.previous_value(name), other)
        })
    }

    /// Whether `name` changed in this event.
    ///
    /// A column absent from the after snapshot is never modified. Inserts and
    /// updates report every present column. Deletes consult the diff-column
    /// list, ignoring case.
    pub fn is_col_modified(&self, name: &str) -> bool {
        if !self.after.contains_key(name) {
            return false;
        }
        match self.action {
            Action::Insert | Action::Update => true,
            Action::Delete => {
                let wanted = name.to_lowercase();
                self.diff_columns.iter().any(|c| c.to_lowercase() == wanted)
            }
        }
    }

    // ============================================================================
    // Mutators
    // ============================================================================

    /// Insert or replace `name` in the after snapshot.
    pub fn set_value(&mut self, name: impl Into<String>, val: impl Into<Value>) {
        self.after.insert(name.into(), val.into());
    }

    /// Insert or replace `name` in the before snapshot.
    pub fn set_previous_value(&mut self, name: impl Into<String>, val: impl Into<Value>) {
        self.before.insert(name.into(), val.into());
    }

    /// Store `list[index]` under `name`, with `index` coerced to an integer.
    ///
    /// A negative or out-of-range index leaves the event untouched.
    pub fn set_value_by_list(&mut self, name: impl Into<String>, list: &[Value], index: impl Into<Value>) {
        let name = name.into();
        let index = conv::to_i64(&index.into());
        match usize::try_from(index).ok().and_then(|i| list.get(i)) {
            Some(v) => {
                self.after.insert(name, v.clone());
            }
            None => log::trace!("index {} out of range for {} ({} entries)", index, name, list.len()),
        }
    }

    /// Store `map[code]` under `name`, with `code` coerced to text.
    ///
    /// An unmapped code stores `Null`.
    pub fn set_value_by_map(
        &mut self,
        name: impl Into<String>,
        map: &HashMap<String, Value>,
        code: impl Into<Value>,
    ) {
        let name = name.into();
        let key = conv::to_text(&code.into());
        let mapped = match map.get(&key) {
            Some(v) => v.clone(),
            None => {
                log::trace!("code {:?} unmapped for {}", key, name);
                Value::Null
            }
        };
        self.after.insert(name, mapped);
    }

    /// Store the boolean coercion of `val` under `name`.
    pub fn set_value_as_bool(&mut self, name: impl Into<String>, val: impl Into<Value>) {
        let flag = conv::to_bool(&val.into());
        self.after.insert(name.into(), Value::Bool(flag));
    }

    /// Decode `val` (coerced to text) as JSON and store the result under `name`.
    ///
    /// Malformed JSON stores `Null`; the decode error is logged, not returned.
    pub fn set_value_as_decode_json(&mut self, name: impl Into<String>, val: impl Into<Value>) {
        let name = name.into();
        let text = conv::to_text(&val.into());
        let decoded = match decode_json(&text) {
            Ok(v) => v,
            Err(e) => {
                #[cfg(feature = "metrics")]
                crate::metrics::METRICS.record_decode_failure();

                if self.config().warn_decode_failures {
                    log::warn!("invalid JSON for column {} of {}: {}", name, self.alias, e);
                } else {
                    log::debug!("invalid JSON for column {} of {}: {}", name, self.alias, e);
                }
                Value::Null
            }
        };
        self.after.insert(name, decoded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;
    use crate::test_helpers::CountingResolver;
    use crate::tests_cfg;

    fn users_event(action: Action) -> (RowEvent, Arc<CountingResolver>) {
        let resolver = Arc::new(CountingResolver::with_table("users", tests_cfg::users_table()));
        let event = RowEvent::new(1, action, "app", "users")
            .with_shared_resolver(Arc::clone(&resolver) as Arc<dyn SchemaResolver>);
        (event, resolver)
    }

    // ============================================================================
    // Resolution
    // ============================================================================

    #[test]
    fn test_resolver_called_once() {
        let (event, resolver) = users_event(Action::Insert);
        assert!(event.resolved_table().is_some());
        assert!(event.resolved_table().is_some());
        assert!(event.has_column("email"));
        assert_eq!(resolver.calls(), 1);
    }

    #[test]
    fn test_unknown_alias_cached_as_none() {
        let (event, resolver) = users_event(Action::Insert);
        let event = event.with_alias("ghosts");
        assert!(event.resolved_table().is_none());
        assert!(event.column("id").is_none());
        assert!(!event.is_empty("id"));
        assert_eq!(resolver.calls(), 1);
    }

    #[test]
    fn test_no_resolver() {
        let event = RowEvent::new(1, Action::Insert, "app", "users").with_after(row! { "id" => 0_u64 });
        assert!(event.resolved_table().is_none());
        assert!(!event.is_empty("id"));
        assert!(!event.equal("id", &Value::UInt(0)));
    }

    #[test]
    fn test_column_case_insensitive() {
        let (event, _) = users_event(Action::Insert);
        let upper = event.column("Email").map(|c| c as *const TableColumn);
        let lower = event.column("email").map(|c| c as *const TableColumn);
        assert!(upper.is_some());
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_shared_table_survives_event() {
        let (event, _) = users_event(Action::Insert);
        let table = event.shared_table();
        drop(event);
        assert_eq!(table.map(|t| t.name().to_string()), Some("users".to_string()));
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    #[test]
    fn test_accessors_read_after_for_deletes() {
        let (event, _) = users_event(Action::Delete);
        let event = event
            .with_before(row! { "status" => "active" })
            .with_after(row! { "status" => "banned" });
        assert_eq!(event.value("status"), &Value::from("banned"));
        assert_eq!(event.previous_value("status"), &Value::from("active"));
        assert_eq!(event.try_value("missing"), None);
        assert_eq!(event.value("missing"), &Value::Null);
    }

    #[test]
    fn test_is_nil_distinguishes_absent() {
        let (event, _) = users_event(Action::Update);
        let event = event
            .with_before(row! { "email" => Value::Null })
            .with_after(row! { "email" => Value::Null });
        assert!(event.is_nil("email"));
        assert!(event.is_previous_nil("email"));
        assert!(!event.is_nil("status"));
        assert!(!event.is_previous_nil("status"));
    }

    #[test]
    fn test_is_empty_uses_column_type() {
        let (event, _) = users_event(Action::Update);
        let event = event
            .with_before(row! { "score" => 3_u64, "Email" => "" })
            .with_after(row! { "score" => 0_u64, "Email" => "a@b.c" });
        assert!(event.is_empty("score"));
        assert!(!event.is_previous_empty("score"));
        assert!(!event.is_empty("Email"));
        assert!(event.is_previous_empty("Email"));
        assert!(!event.is_empty("no_such_column"));
    }

    #[test]
    fn test_equal_uses_unsigned_flag() {
        let (event, _) = users_event(Action::Update);
        let event = event
            .with_before(row! { "id" => 5_i64 })
            .with_after(row! { "id" => -1_i64, "age" => -1_i64 });
        // id is bigint unsigned, age is signed
        assert!(event.equal("id", &Value::UInt(u64::MAX)));
        assert!(!event.equal("age", &Value::UInt(u64::MAX)));
        assert!(event.previous_equal("id", &Value::Text("5".into())));
        assert!(!event.equal("nope", &Value::Int(-1)));
    }

    #[test]
    fn test_typed_get() {
        let event = RowEvent::new(1, Action::Insert, "app", "users")
            .with_before(row! { "score" => 9_u64 })
            .with_after(row! { "score" => 10_u64, "Email" => Value::Null });
        assert_eq!(event.get::<u32>("score"), Ok(10));
        assert_eq!(event.get_previous::<u64>("score"), Ok(9));
        assert_eq!(event.get::<String>("Email"), Err(ValueExtractionError::NullValue));
        assert_eq!(event.get::<Option<String>>("Email"), Ok(None));
    }

    // ============================================================================
    // is_col_modified
    // ============================================================================

    #[test]
    fn test_delete_uses_diff_columns() {
        let event = RowEvent::new(1, Action::Delete, "app", "users")
            .with_after(row! { "status" => "banned", "name" => "bob" })
            .with_diff_columns(["STATUS"]);
        assert!(event.is_col_modified("status"));
        assert!(!event.is_col_modified("name"));
        assert!(!event.is_col_modified("missing_col"));
    }

    #[test]
    fn test_insert_and_update_mark_present_columns() {
        for action in [Action::Insert, Action::Update] {
            let event = RowEvent::new(1, action, "app", "users")
                .with_after(row! { "status" => "new", "name" => "bob" });
            assert!(event.is_col_modified("status"));
            assert!(event.is_col_modified("name"));
            assert!(!event.is_col_modified("missing_col"));
        }
    }

    // ============================================================================
    // Mutators
    // ============================================================================

    #[test]
    fn test_set_value_and_previous() {
        let mut event = RowEvent::new(1, Action::Update, "app", "users");
        event.set_value("score", 4_u32);
        event.set_previous_value("score", 3_u32);
        event.set_value("score", 5_u32);
        assert_eq!(event.value("score"), &Value::UInt(5));
        assert_eq!(event.previous_value("score"), &Value::UInt(3));
    }

    #[test]
    fn test_set_value_by_list() {
        let list = vec![Value::from("a"), Value::from("b"), Value::from("c")];
        let mut event = RowEvent::new(1, Action::Insert, "app", "users");

        event.set_value_by_list("status", &list, 5_i64);
        assert_eq!(event.try_value("status"), None);

        event.set_value_by_list("status", &list, -1_i64);
        assert_eq!(event.try_value("status"), None);

        event.set_value_by_list("status", &list, "1");
        assert_eq!(event.value("status"), &Value::from("b"));

        event.set_value_by_list("status", &list, 3_u64);
        assert_eq!(event.value("status"), &Value::from("b"));
    }

    #[test]
    fn test_set_value_by_map() {
        let mut map = HashMap::new();
        map.insert("1".to_string(), Value::from("active"));
        let mut event = RowEvent::new(1, Action::Insert, "app", "users");

        event.set_value_by_map("status", &map, 1_i64);
        assert_eq!(event.value("status"), &Value::from("active"));

        event.set_value_by_map("status", &map, 2_i64);
        assert!(event.is_nil("status"));
    }

    #[test]
    fn test_set_value_as_bool() {
        let mut event = RowEvent::new(1, Action::Insert, "app", "users");
        event.set_value_as_bool("a", 1_i64);
        event.set_value_as_bool("b", "yes");
        event.set_value_as_bool("c", 0_i64);
        event.set_value_as_bool("d", Value::Null);
        assert_eq!(event.value("a"), &Value::Bool(true));
        assert_eq!(event.value("b"), &Value::Bool(true));
        assert_eq!(event.value("c"), &Value::Bool(false));
        assert_eq!(event.value("d"), &Value::Bool(false));
    }

    #[test]
    fn test_set_value_as_decode_json() {
        let mut event = RowEvent::new(1, Action::Insert, "app", "users");
        event.set_value_as_decode_json("profile", r#"{"tags":["a"],"n":2}"#);
        let Value::Map(profile) = event.value("profile") else {
            panic!("expected a map, got {:?}", event.value("profile"));
        };
        assert_eq!(profile.get("n"), Some(&Value::Int(2)));
        assert_eq!(profile.get("tags"), Some(&Value::List(vec![Value::from("a")])));

        event.set_value_as_decode_json("profile", "{not json");
        assert!(event.is_nil("profile"));
    }

    // ============================================================================
    // Serde
    // ============================================================================

    #[test]
    fn test_serde_skips_context() {
        let (event, _) = users_event(Action::Delete);
        let event = event
            .with_alias("members")
            .with_after(row! { "id" => 3_u64 })
            .with_diff_columns(["id"]);
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("context"));

        let back: RowEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.alias, "members");
        assert_eq!(back.action, Action::Delete);
        assert_eq!(back.value("id"), &Value::Int(3));
        assert!(back.context().is_none());
        assert!(back.resolved_table().is_none());
    }

    #[test]
    fn test_deserialize_defaults_snapshots() {
        let json = r#"{"id":9,"schema":"app","table":"users","alias":"users","action":"insert"}"#;
        let event: RowEvent = serde_json::from_str(json).unwrap();
        assert!(event.row().is_empty());
        assert!(event.previous_row().is_empty());
        assert!(event.diff_columns.is_empty());
    }
}
