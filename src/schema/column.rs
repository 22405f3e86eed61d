//! Column descriptor and raw type parsing.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::ColumnType;

/// `keyword [ (args) ] [ modifiers ]`, e.g. `int(10) unsigned zerofill`
static RAW_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)^\s*([a-z_][a-z0-9_]*)\s*(?:\((.*)\))?\s*(.*?)\s*$")
        .expect("raw type pattern is valid")
});

/// A single-quoted member of an `enum(...)` / `set(...)` list. `''` escapes a quote.
static QUOTED_MEMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'((?:[^']|'')*)'").expect("member pattern is valid"));

/// Column metadata as reported by the schema catalog.
///
/// Name comparison is case-insensitive; see [`TableColumn::matches_name`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumn {
    pub name: String,
    /// Logical category driving emptiness and equality
    pub column_type: ColumnType,
    /// Raw engine type string, e.g. `"varchar(64)"`
    pub raw_type: String,
    pub collation: Option<String>,
    pub is_auto: bool,
    pub is_unsigned: bool,
    /// Virtual generated column
    pub is_virtual: bool,
    /// Stored generated column
    pub is_stored: bool,
    /// Permitted values of an `enum` column, in declaration order
    pub enum_values: Vec<String>,
    /// Permitted members of a `set` column, in declaration order
    pub set_values: Vec<String>,
    /// Fixed length for `char(n)`, `binary(n)` and `bit(n)`
    pub fixed_size: u32,
    /// Maximum length for variable-length strings and blobs
    pub max_size: u32,
}

impl TableColumn {
    /// Build a column from its raw engine type.
    ///
    /// Derives the logical type, the unsigned flag, enum/set members and sizes
    /// from `raw_type`. An unrecognized type falls back to
    /// [`ColumnType::String`], which compares values as text.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rowguard::{ColumnType, TableColumn};
    ///
    /// let col = TableColumn::new("status", "enum('new','paid')");
    /// assert_eq!(col.column_type, ColumnType::Enum);
    /// assert_eq!(col.enum_values, vec!["new", "paid"]);
    ///
    /// let col = TableColumn::new("id", "bigint(20) unsigned");
    /// assert!(col.is_unsigned);
    /// ```
    pub fn new(name: impl Into<String>, raw_type: impl Into<String>) -> Self {
        let name = name.into();
        let raw_type = raw_type.into();

        let column_type = ColumnType::from_raw_type(&raw_type).unwrap_or_else(|| {
            log::debug!(
                "column {}: unrecognized raw type {:?}, treating as string",
                name,
                raw_type
            );
            ColumnType::String
        });

        let mut column = Self {
            name,
            column_type,
            raw_type: String::new(),
            collation: None,
            is_auto: false,
            is_unsigned: false,
            is_virtual: false,
            is_stored: false,
            enum_values: Vec::new(),
            set_values: Vec::new(),
            fixed_size: 0,
            max_size: 0,
        };
        column.apply_raw_type(&raw_type);
        column.raw_type = raw_type;
        column
    }

    /// Build a column with an explicit logical type and no raw type information.
    pub fn with_type(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            raw_type: String::new(),
            collation: None,
            is_auto: false,
            is_unsigned: false,
            is_virtual: false,
            is_stored: false,
            enum_values: Vec::new(),
            set_values: Vec::new(),
            fixed_size: 0,
            max_size: 0,
        }
    }

    #[must_use]
    pub fn collation(mut self, collation: impl Into<String>) -> Self {
        self.collation = Some(collation.into());
        self
    }

    #[must_use]
    pub fn unsigned(mut self, is_unsigned: bool) -> Self {
        self.is_unsigned = is_unsigned;
        self
    }

    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.is_auto = true;
        self
    }

    #[must_use]
    pub fn virtual_generated(mut self) -> Self {
        self.is_virtual = true;
        self
    }

    #[must_use]
    pub fn stored_generated(mut self) -> Self {
        self.is_stored = true;
        self
    }

    /// Case-insensitive name comparison (full Unicode lowercase folding).
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        self.name
            .chars()
            .flat_map(char::to_lowercase)
            .eq(name.chars().flat_map(char::to_lowercase))
    }

    /// `true` for virtual or stored generated columns.
    #[must_use]
    pub fn is_generated(&self) -> bool {
        self.is_virtual || self.is_stored
    }

    fn apply_raw_type(&mut self, raw_type: &str) {
        let Some(caps) = RAW_TYPE.captures(raw_type) else {
            return;
        };
        let keyword = caps[1].to_ascii_lowercase();
        let args = caps.get(2).map_or("", |m| m.as_str());
        let modifiers = caps.get(3).map_or("", |m| m.as_str()).to_ascii_lowercase();

        self.is_unsigned = modifiers.split_whitespace().any(|m| m == "unsigned");

        match keyword.as_str() {
            "enum" => self.enum_values = quoted_members(args),
            "set" => self.set_values = quoted_members(args),
            "char" | "nchar" | "binary" | "bit" => {
                // char and binary default to one when no length is given.
                self.fixed_size = leading_size(args).unwrap_or(1);
            }
            "varchar" | "nvarchar" | "varbinary" => {
                self.max_size = leading_size(args).unwrap_or(0);
            }
            "tinytext" | "tinyblob" => self.max_size = 255,
            "text" | "blob" => self.max_size = leading_size(args).unwrap_or(65_535),
            "mediumtext" | "mediumblob" => self.max_size = 16_777_215,
            "longtext" | "longblob" => self.max_size = u32::MAX,
            _ => {}
        }
    }
}

fn leading_size(args: &str) -> Option<u32> {
    args.split(',').next()?.trim().parse().ok()
}

fn quoted_members(args: &str) -> Vec<String> {
    QUOTED_MEMBER
        .captures_iter(args)
        .map(|caps| caps[1].replace("''", "'"))
        .collect()
}
