//! End-to-end behaviour of `RowEvent` through the public API.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rowguard::{
    row, Action, ConsumerConfig, EventContext, RowEvent, SchemaResolver, Table, TableColumn, Value,
};

fn orders_table() -> Arc<Table> {
    let table = Table::new(
        "shop",
        "orders_2024",
        vec![
            TableColumn::new("id", "bigint(20) unsigned"),
            TableColumn::new("Status", "enum('new','paid','void')"),
            TableColumn::new("name", "varchar(64)"),
            TableColumn::new("total", "decimal(10,2)"),
            TableColumn::new("meta", "json"),
            TableColumn::new("receipt", "blob"),
            TableColumn::new("note", "varchar(255)"),
        ],
    )
    .and_then(|t| t.with_primary_key(["id"]))
    .unwrap();
    Arc::new(table)
}

/// A resolver that knows only the `orders` alias and counts its calls.
fn counting_resolver() -> (Arc<dyn SchemaResolver>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let table = orders_table();
    let resolver = move |alias: &str| -> Option<Arc<Table>> {
        counter.fetch_add(1, Ordering::SeqCst);
        (alias == "orders").then(|| Arc::clone(&table))
    };
    (Arc::new(resolver), calls)
}

fn context() -> (Arc<EventContext>, Arc<AtomicUsize>) {
    let (resolver, calls) = counting_resolver();
    let ctx = EventContext::new(ConsumerConfig::default()).with_shared_resolver(resolver);
    (Arc::new(ctx), calls)
}

#[test]
fn test_resolution_is_memoized_per_event() {
    let (ctx, calls) = context();
    let event = ctx.create_event(1, Action::Insert, "shop", "orders_2024").with_alias("orders");

    assert_eq!(event.resolved_table().map(Table::name), Some("orders_2024"));
    assert!(event.has_column("status"));
    assert!(event.column("STATUS").is_some());
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let other = ctx.create_event(2, Action::Insert, "shop", "orders_2024").with_alias("orders");
    other.resolved_table();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_unknown_alias_degrades_quietly() {
    let (ctx, calls) = context();
    let event = ctx
        .create_event(1, Action::Update, "shop", "refunds")
        .with_after(row! { "id" => 0_u64 });

    assert!(event.resolved_table().is_none());
    assert!(!event.is_empty("id"));
    assert!(!event.equal("id", &Value::UInt(0)));
    assert!(event.is_col_modified("id"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_resolved_before_clone_is_shared() {
    let (ctx, calls) = context();
    let event = ctx.create_event(1, Action::Insert, "shop", "orders_2024").with_alias("orders");
    event.resolved_table();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let copy = event.clone();
            std::thread::spawn(move || copy.has_column("total"))
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_delete_modified_columns() {
    let (ctx, _) = context();
    let event = ctx
        .create_event(1, Action::Delete, "shop", "orders_2024")
        .with_alias("orders")
        .with_after(row! { "status" => "void", "name" => "bob" })
        .with_diff_columns(["status"]);

    assert!(event.is_col_modified("status"));
    assert!(!event.is_col_modified("name"));
    assert!(!event.is_col_modified("missing_col"));
}

#[test]
fn test_update_marks_every_present_column() {
    let (ctx, _) = context();
    let event = ctx
        .create_event(1, Action::Update, "shop", "orders_2024")
        .with_after(row! { "status" => "paid", "name" => "bob", "total" => "1.00" });
    for name in ["status", "name", "total"] {
        assert!(event.is_col_modified(name), "{name}");
    }
}

#[test]
fn test_type_aware_comparisons() {
    let (ctx, _) = context();
    let event = ctx
        .create_event(1, Action::Update, "shop", "orders_2024")
        .with_alias("orders")
        .with_before(row! { "id" => -1_i64, "total" => "0.00", "name" => "" })
        .with_after(row! { "id" => u64::MAX, "total" => 12.5, "name" => "bob" });

    assert!(event.equal("id", &Value::UInt(u64::MAX)));
    assert!(event.previous_equal("id", &Value::UInt(u64::MAX)));
    assert!(event.equal("total", &Value::from("12.50")));
    assert!(!event.is_previous_empty("total"));
    assert!(event.is_previous_empty("name"));
    assert!(!event.is_empty("name"));
}

#[test]
fn test_mutators() {
    let (ctx, _) = context();
    let mut event = ctx.create_event(1, Action::Insert, "shop", "orders_2024").with_alias("orders");

    let statuses = vec![Value::from("new"), Value::from("paid"), Value::from("void")];
    event.set_value_by_list("status", &statuses, 5_i64);
    assert_eq!(event.try_value("status"), None);
    event.set_value_by_list("status", &statuses, 1_i64);
    assert!(event.equal("status", &Value::from("paid")));

    let mut names = HashMap::new();
    names.insert("7".to_string(), Value::from("seven"));
    event.set_value_by_map("name", &names, "7");
    assert_eq!(event.value("name"), &Value::from("seven"));
    event.set_value_by_map("name", &names, "8");
    assert!(event.is_nil("name"));

    event.set_value_as_bool("paid", "true");
    assert_eq!(event.get::<bool>("paid"), Ok(true));

    event.set_value_as_decode_json("meta", "{not json");
    assert!(event.is_nil("meta"));
    event.set_value_as_decode_json("meta", r#"[1, "two", null]"#);
    assert_eq!(
        event.value("meta"),
        &Value::List(vec![Value::Int(1), Value::from("two"), Value::Null])
    );
}

#[test]
fn test_forwarding_round_trip() {
    let (ctx, _) = context();
    let event = ctx
        .create_event(99, Action::Update, "shop", "orders_2024")
        .with_alias("orders")
        .with_before(row! { "status" => "new" })
        .with_after(row! { "status" => "paid" });

    let json = serde_json::to_string(&event).unwrap();
    let forwarded: RowEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(forwarded.id, 99);
    assert_eq!(forwarded.row(), event.row());
    assert_eq!(forwarded.previous_row(), event.previous_row());

    // The resolver does not travel with the event.
    assert!(forwarded.resolved_table().is_none());
    let reattached = forwarded.with_context(ctx);
    assert!(reattached.equal("status", &Value::from("paid")));
}

#[test]
fn test_forwarding_keeps_binary_values() {
    let (ctx, _) = context();
    let receipt = Value::Bytes(vec![0x89, b'P', b'N', b'G', 0x00, 0xFF]);
    let latin1_note = Value::Bytes(b"caf\xE9".to_vec());
    let event = ctx
        .create_event(5, Action::Insert, "shop", "orders_2024")
        .with_alias("orders")
        .with_after(row! { "receipt" => receipt.clone(), "note" => latin1_note.clone() });

    let json = serde_json::to_string(&event).unwrap();
    let forwarded: RowEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(forwarded.value("receipt"), &receipt);
    assert_eq!(forwarded.value("note"), &latin1_note);

    let reattached = forwarded.with_context(ctx);
    assert!(reattached.equal("receipt", &receipt));
    assert!(reattached.equal("note", &latin1_note));
    assert!(!reattached.equal("note", &Value::Bytes(b"caf\xE8".to_vec())));
}
