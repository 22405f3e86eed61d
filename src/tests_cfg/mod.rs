//! Shared test fixtures.
//!
//! `users_table()` covers every logical column type. Positions matter to the
//! tests: `id` is 0 (primary key, unsigned), `Email` is 1, `status` is 2 and
//! `score` is 3 (unsigned). No other column is unsigned.

use crate::schema::{Table, TableColumn, TableIndex};

pub fn users_table() -> Table {
    let columns = vec![
        TableColumn::new("id", "bigint(20) unsigned").auto_increment(),
        TableColumn::new("Email", "varchar(255)").collation("utf8mb4_general_ci"),
        TableColumn::new("status", "enum('new','active','banned')"),
        TableColumn::new("score", "int(10) unsigned"),
        TableColumn::new("balance", "decimal(10,2)"),
        TableColumn::new("created_at", "datetime"),
        TableColumn::new("avatar", "blob"),
        TableColumn::new("flags", "bit(8)"),
        TableColumn::new("profile", "json"),
        TableColumn::new("location", "point"),
        TableColumn::new("rating", "float"),
        TableColumn::new("level", "mediumint(8)"),
        TableColumn::new("birthday", "date"),
        TableColumn::new("login_time", "time"),
        TableColumn::new("updated_at", "timestamp"),
        TableColumn::new("tags", "set('a','b','c')"),
        TableColumn::new("age", "tinyint(3)"),
    ];

    Table::new("app", "users", columns)
        .and_then(|t| t.with_primary_key(["id"]))
        .and_then(|t| t.with_index(TableIndex::new("uniq_email", ["Email"], true)))
        .expect("users fixture is valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;

    #[test]
    fn test_fixture_covers_every_type() {
        let table = users_table();
        for column_type in ColumnType::ALL {
            assert!(
                table.columns().iter().any(|c| c.column_type == column_type),
                "{column_type:?} missing from fixture"
            );
        }
    }
}
