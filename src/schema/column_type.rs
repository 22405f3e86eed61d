//! Logical column categories and raw type mapping.
//!
//! A [`ColumnType`] groups the engine's raw column types into the categories
//! that decide emptiness and equality semantics. It carries no behavior of its
//! own beyond classification helpers.

use serde::{Deserialize, Serialize};

/// Logical column category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// tinyint, smallint, int, bigint, year
    Integer,
    /// float, double
    Float,
    Enum,
    Set,
    /// char, varchar and the text family
    String,
    DateTime,
    Timestamp,
    Date,
    Time,
    Bit,
    Json,
    Decimal,
    MediumInt,
    /// binary, varbinary and the blob family
    Binary,
    /// Spatial types. Not implemented: values of this category always compare equal.
    Point,
}

impl ColumnType {
    /// Map a raw engine type (e.g. `"int(10) unsigned"`, `"varchar(64)"`) to its category.
    ///
    /// Only the leading type keyword is considered; length, precision and
    /// modifiers are ignored. Returns `None` for an unrecognized keyword.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rowguard::ColumnType;
    ///
    /// assert_eq!(ColumnType::from_raw_type("BIGINT(20) UNSIGNED"), Some(ColumnType::Integer));
    /// assert_eq!(ColumnType::from_raw_type("mediumtext"), Some(ColumnType::String));
    /// assert_eq!(ColumnType::from_raw_type("geometry"), Some(ColumnType::Point));
    /// assert_eq!(ColumnType::from_raw_type("hyperloglog"), None);
    /// ```
    #[must_use]
    pub fn from_raw_type(raw_type: &str) -> Option<Self> {
        let keyword: String = raw_type
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect::<String>()
            .to_ascii_lowercase();

        let column_type = match keyword.as_str() {
            "tinyint" | "smallint" | "int" | "integer" | "bigint" | "year" | "bool"
            | "boolean" => ColumnType::Integer,
            "mediumint" => ColumnType::MediumInt,
            "float" | "double" | "real" => ColumnType::Float,
            "decimal" | "numeric" | "dec" | "fixed" => ColumnType::Decimal,
            "enum" => ColumnType::Enum,
            "set" => ColumnType::Set,
            "char" | "varchar" | "nchar" | "nvarchar" | "tinytext" | "text" | "mediumtext"
            | "longtext" => ColumnType::String,
            "datetime" => ColumnType::DateTime,
            "timestamp" => ColumnType::Timestamp,
            "date" => ColumnType::Date,
            "time" => ColumnType::Time,
            "bit" => ColumnType::Bit,
            "json" => ColumnType::Json,
            "binary" | "varbinary" | "tinyblob" | "blob" | "mediumblob" | "longblob" => {
                ColumnType::Binary
            }
            "point" | "geometry" | "linestring" | "polygon" | "multipoint"
            | "multilinestring" | "multipolygon" | "geometrycollection" | "geomcollection" => {
                ColumnType::Point
            }
            _ => return None,
        };
        Some(column_type)
    }

    /// Integer categories, whose equality honours the unsigned flag.
    #[must_use]
    pub fn is_integer(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::MediumInt)
    }

    /// Integer, float and decimal categories: zero is the empty value.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        self.is_integer() || matches!(self, ColumnType::Float | ColumnType::Decimal)
    }

    #[must_use]
    pub fn is_temporal(self) -> bool {
        matches!(
            self,
            ColumnType::DateTime | ColumnType::Timestamp | ColumnType::Date | ColumnType::Time
        )
    }

    /// Categories compared byte-for-byte.
    #[must_use]
    pub fn is_binary(self) -> bool {
        matches!(self, ColumnType::Binary | ColumnType::Bit)
    }

    /// `false` only for [`ColumnType::Point`].
    #[must_use]
    pub fn is_implemented(self) -> bool {
        self != ColumnType::Point
    }

    /// Every category, in declaration order.
    pub const ALL: [ColumnType; 15] = [
        ColumnType::Integer,
        ColumnType::Float,
        ColumnType::Enum,
        ColumnType::Set,
        ColumnType::String,
        ColumnType::DateTime,
        ColumnType::Timestamp,
        ColumnType::Date,
        ColumnType::Time,
        ColumnType::Bit,
        ColumnType::Json,
        ColumnType::Decimal,
        ColumnType::MediumInt,
        ColumnType::Binary,
        ColumnType::Point,
    ];
}
