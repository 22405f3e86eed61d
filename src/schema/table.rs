//! Table and index descriptors.
//!
//! A [`Table`] is built once from catalog metadata and then only read. The
//! primary-key and unsigned position lists index into the column list, which is
//! why the column list cannot be modified after construction.

use serde::{Deserialize, Serialize};

use super::TableColumn;

/// Error type for table construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A primary key or index references a column the table doesn't have
    UnknownColumn { table: String, column: String },
    /// Two columns share a name (compared case-insensitively)
    DuplicateColumn { table: String, column: String },
    /// An index carries a cardinality list of the wrong length
    CardinalityMismatch {
        index: String,
        columns: usize,
        cardinality: usize,
    },
    /// A stored primary-key position points past the column list
    PositionOutOfRange { table: String, position: usize },
    /// A stored unsigned-position list disagrees with the columns' unsigned flags
    UnsignedMismatch {
        table: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaError::UnknownColumn { table, column } => {
                write!(f, "Column not found in table {}: {}", table, column)
            }
            SchemaError::DuplicateColumn { table, column } => {
                write!(f, "Duplicate column in table {}: {}", table, column)
            }
            SchemaError::CardinalityMismatch {
                index,
                columns,
                cardinality,
            } => write!(
                f,
                "Index {} has {} columns but {} cardinality estimates",
                index, columns, cardinality
            ),
            SchemaError::PositionOutOfRange { table, position } => {
                write!(f, "Column position {} out of range in table {}", position, table)
            }
            SchemaError::UnsignedMismatch {
                table,
                expected,
                found,
            } => write!(
                f,
                "Unsigned columns of table {} are {:?}, stored list says {:?}",
                table, expected, found
            ),
        }
    }
}

impl std::error::Error for SchemaError {}

/// Index definition metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableIndex {
    /// Index name
    pub name: String,
    /// Column names, in index order
    pub columns: Vec<String>,
    /// Per-column cardinality estimates (empty when unknown)
    pub cardinality: Vec<u64>,
    /// Whether this is a unique index
    pub unique: bool,
}

impl TableIndex {
    pub fn new<I, S>(name: impl Into<String>, columns: I, unique: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            cardinality: Vec::new(),
            unique,
        }
    }

    #[must_use]
    pub fn with_cardinality(mut self, cardinality: Vec<u64>) -> Self {
        self.cardinality = cardinality;
        self
    }
}

/// Table metadata: identity, columns, indexes and derived column positions.
///
/// Deserialization runs the same checks as [`Table::new`], [`Table::with_index`]
/// and the primary-key builder, so a decoded table never holds dangling positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TableRepr")]
pub struct Table {
    schema: String,
    name: String,
    columns: Vec<TableColumn>,
    indices: Vec<TableIndex>,
    pk_columns: Vec<usize>,
    unsigned_columns: Vec<usize>,
}

impl Table {
    /// Create a table from its ordered column list.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::DuplicateColumn` if two columns share a name
    /// (case-insensitively).
    ///
    /// # Example
    ///
    /// ```rust
    /// use rowguard::{Table, TableColumn};
    ///
    /// let users = Table::new(
    ///     "shop",
    ///     "users",
    ///     vec![
    ///         TableColumn::new("id", "bigint unsigned").auto_increment(),
    ///         TableColumn::new("Email", "varchar(255)"),
    ///     ],
    /// )?
    /// .with_primary_key(["id"])?;
    ///
    /// assert_eq!(users.pk_columns(), &[0]);
    /// assert_eq!(users.unsigned_columns(), &[0]);
    /// assert!(users.column("email").is_some());
    /// # Ok::<(), rowguard::SchemaError>(())
    /// ```
    pub fn new(
        schema: impl Into<String>,
        name: impl Into<String>,
        columns: Vec<TableColumn>,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.matches_name(&column.name)) {
                return Err(SchemaError::DuplicateColumn {
                    table: name,
                    column: column.name.clone(),
                });
            }
        }

        let unsigned_columns = columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_unsigned)
            .map(|(i, _)| i)
            .collect();

        Ok(Self {
            schema: schema.into(),
            name,
            columns,
            indices: Vec::new(),
            pk_columns: Vec::new(),
            unsigned_columns,
        })
    }

    /// Set the primary key columns, in key order.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownColumn` for a name the table doesn't have.
    pub fn with_primary_key<I, S>(mut self, names: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut positions = Vec::new();
        for name in names {
            positions.push(self.require_position(name.as_ref())?);
        }
        self.pk_columns = positions;
        Ok(self)
    }

    /// Add an index.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownColumn` if the index names a missing column,
    /// or `SchemaError::CardinalityMismatch` if a non-empty cardinality list
    /// doesn't have one entry per column.
    pub fn with_index(mut self, index: TableIndex) -> Result<Self, SchemaError> {
        for column in &index.columns {
            self.require_position(column)?;
        }
        if !index.cardinality.is_empty() && index.cardinality.len() != index.columns.len() {
            return Err(SchemaError::CardinalityMismatch {
                index: index.name,
                columns: index.columns.len(),
                cardinality: index.cardinality.len(),
            });
        }
        self.indices.push(index);
        Ok(self)
    }

    #[must_use]
    pub fn schema(&self) -> &str {
        &self.schema
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `schema.name`
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    #[must_use]
    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    #[must_use]
    pub fn indices(&self) -> &[TableIndex] {
        &self.indices
    }

    /// Primary key column positions, in key order.
    #[must_use]
    pub fn pk_columns(&self) -> &[usize] {
        &self.pk_columns
    }

    /// Positions of unsigned columns, in column order.
    #[must_use]
    pub fn unsigned_columns(&self) -> &[usize] {
        &self.unsigned_columns
    }

    /// Look up a column by name, case-insensitively.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&TableColumn> {
        self.columns.iter().find(|c| c.matches_name(name))
    }

    /// Position of a column in the column list, case-insensitively.
    #[must_use]
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.matches_name(name))
    }

    /// Primary key columns, in key order.
    pub fn primary_key(&self) -> impl Iterator<Item = &TableColumn> + '_ {
        self.pk_columns.iter().filter_map(move |&i| self.columns.get(i))
    }

    #[must_use]
    pub fn is_primary_key(&self, name: &str) -> bool {
        self.column_position(name)
            .is_some_and(|pos| self.pk_columns.contains(&pos))
    }

    fn with_pk_positions(mut self, positions: Vec<usize>) -> Result<Self, SchemaError> {
        if let Some(&position) = positions.iter().find(|&&p| p >= self.columns.len()) {
            return Err(SchemaError::PositionOutOfRange {
                table: self.qualified_name(),
                position,
            });
        }
        self.pk_columns = positions;
        Ok(self)
    }

    fn require_position(&self, name: &str) -> Result<usize, SchemaError> {
        self.column_position(name)
            .ok_or_else(|| SchemaError::UnknownColumn {
                table: self.qualified_name(),
                column: name.to_string(),
            })
    }
}

/// Wire form of [`Table`], validated on the way in.
#[derive(Deserialize)]
struct TableRepr {
    schema: String,
    name: String,
    columns: Vec<TableColumn>,
    #[serde(default)]
    indices: Vec<TableIndex>,
    #[serde(default)]
    pk_columns: Vec<usize>,
    unsigned_columns: Option<Vec<usize>>,
}

impl TryFrom<TableRepr> for Table {
    type Error = SchemaError;

    fn try_from(repr: TableRepr) -> Result<Self, Self::Error> {
        let mut table = Table::new(repr.schema, repr.name, repr.columns)?
            .with_pk_positions(repr.pk_columns)?;
        if let Some(found) = repr.unsigned_columns {
            if found != table.unsigned_columns {
                return Err(SchemaError::UnsignedMismatch {
                    table: table.qualified_name(),
                    expected: table.unsigned_columns,
                    found,
                });
            }
        }
        for index in repr.indices {
            table = table.with_index(index)?;
        }
        Ok(table)
    }
}
