//! Snapshot-building macros.

/// Build a [`Row`](crate::value::Row) snapshot from `name => value` pairs.
///
/// Values go through `Into<Value>`, so Rust primitives, `&str`, `Option<T>`
/// and `Value` itself are all accepted.
///
/// ```rust
/// use rowguard::{row, Value};
///
/// let snapshot = row! { "id" => 1_u64, "email" => "a@b.c", "deleted_at" => Value::Null };
/// assert_eq!(snapshot.len(), 3);
/// assert_eq!(snapshot["id"], Value::UInt(1));
///
/// let empty = row! {};
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! row {
    () => {
        $crate::value::Row::new()
    };
    ($( $name:expr => $val:expr ),+ $(,)?) => {{
        let mut row = $crate::value::Row::new();
        $(
            row.insert(::std::string::String::from($name), $crate::value::Value::from($val));
        )+
        row
    }};
}

#[cfg(test)]
mod tests {
    use crate::value::Value;

    #[test]
    fn test_row_macro() {
        let row = row! { "a" => 1_i64, "b" => Some("x"), "c" => None::<i64>, };
        assert_eq!(row["a"], Value::Int(1));
        assert_eq!(row["b"], Value::Text("x".into()));
        assert_eq!(row["c"], Value::Null);
    }

    #[test]
    fn test_later_entry_wins() {
        let row = row! { "a" => 1_i64, "a" => 2_i64 };
        assert_eq!(row.len(), 1);
        assert_eq!(row["a"], Value::Int(2));
    }
}
