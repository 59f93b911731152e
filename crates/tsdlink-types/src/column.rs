//! Column descriptors produced from the server schema document.

use serde::{Deserialize, Serialize};

/// Catalog name reported for every column.
pub const DEFAULT_CATALOG_NAME: &str = "tsd";

/// SQL type of a column, with the JDBC-compatible type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SqlType {
    /// Variable-length character data.
    Varchar,
    /// 16-bit integer.
    Smallint,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    Bigint,
    /// Arbitrary-precision decimal.
    Decimal,
    /// Single-precision float.
    Float,
    /// Double-precision float.
    Double,
    /// Date and time.
    Timestamp,
}

impl SqlType {
    /// Returns the standard numeric SQL type code.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::Varchar => 12,
            Self::Smallint => 5,
            Self::Integer => 4,
            Self::Bigint => -5,
            Self::Decimal => 3,
            Self::Float => 6,
            Self::Double => 8,
            Self::Timestamp => 93,
        }
    }

    /// Returns the SQL name of the type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Varchar => "VARCHAR",
            Self::Smallint => "SMALLINT",
            Self::Integer => "INTEGER",
            Self::Bigint => "BIGINT",
            Self::Decimal => "DECIMAL",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::Timestamp => "TIMESTAMP",
        }
    }
}

impl std::fmt::Display for SqlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How values of a column are represented once decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    /// UTF-8 text.
    String,
    /// `i16`.
    Short,
    /// `i32`.
    Integer,
    /// `i64`.
    Long,
    /// Generic object; decimals are kept as their textual form.
    Decimal,
    /// `f32`.
    Float,
    /// `f64`.
    Double,
    /// Timestamp.
    Timestamp,
}

/// The concrete type of a column: SQL type plus value representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnType {
    /// SQL type.
    pub sql_type: SqlType,
    /// Value representation.
    pub representation: Representation,
}

impl ColumnType {
    /// The type used for unknown datatype names.
    pub const FALLBACK: Self = Self::new(SqlType::Varchar, Representation::String);

    /// Creates a column type.
    #[must_use]
    pub const fn new(sql_type: SqlType, representation: Representation) -> Self {
        Self {
            sql_type,
            representation,
        }
    }

    /// Maps a server datatype name to a column type.
    ///
    /// Unknown or missing names map to VARCHAR text rather than failing.
    ///
    /// ```
    /// use tsdlink_types::{ColumnType, SqlType};
    ///
    /// assert_eq!(ColumnType::from_datatype(Some("long")).sql_type, SqlType::Bigint);
    /// assert_eq!(ColumnType::from_datatype(Some("geo")), ColumnType::FALLBACK);
    /// ```
    #[must_use]
    pub fn from_datatype(datatype: Option<&str>) -> Self {
        match datatype {
            Some("string") => Self::new(SqlType::Varchar, Representation::String),
            Some("short") => Self::new(SqlType::Smallint, Representation::Short),
            Some("integer") => Self::new(SqlType::Integer, Representation::Integer),
            Some("long") => Self::new(SqlType::Bigint, Representation::Long),
            Some("decimal") => Self::new(SqlType::Decimal, Representation::Decimal),
            Some("float") => Self::new(SqlType::Float, Representation::Float),
            Some("double") => Self::new(SqlType::Double, Representation::Double),
            Some("timestamp") => Self::new(SqlType::Timestamp, Representation::Timestamp),
            _ => Self::FALLBACK,
        }
    }
}

/// Relational metadata of one result column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Zero-based position in the result row.
    pub ordinal: usize,
    /// Column name.
    pub name: String,
    /// Display title, if the server supplied one.
    pub title: Option<String>,
    /// Owning table, if the server supplied one.
    pub table: Option<String>,
    /// Schema name from the publisher section.
    pub schema: String,
    /// Catalog name.
    pub catalog: String,
    /// Datatype name exactly as the server sent it.
    pub type_name: Option<String>,
    /// Concrete column type.
    pub column_type: ColumnType,
    /// Whether the column may hold nulls.
    pub nullable: bool,
    /// Whether the column can appear in a `WHERE` clause.
    pub searchable: bool,
}

impl ColumnDescriptor {
    /// Returns the label to display: the title if present, else the name.
    #[must_use]
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    /// Returns the SQL type.
    #[must_use]
    pub const fn sql_type(&self) -> SqlType {
        self.column_type.sql_type
    }

    /// Returns the value representation.
    #[must_use]
    pub const fn representation(&self) -> Representation {
        self.column_type.representation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datatype_mapping() {
        let cases = [
            ("string", SqlType::Varchar, Representation::String),
            ("short", SqlType::Smallint, Representation::Short),
            ("integer", SqlType::Integer, Representation::Integer),
            ("long", SqlType::Bigint, Representation::Long),
            ("decimal", SqlType::Decimal, Representation::Decimal),
            ("float", SqlType::Float, Representation::Float),
            ("double", SqlType::Double, Representation::Double),
            ("timestamp", SqlType::Timestamp, Representation::Timestamp),
        ];
        for (name, sql_type, representation) in cases {
            let ty = ColumnType::from_datatype(Some(name));
            assert_eq!(ty.sql_type, sql_type, "{name}");
            assert_eq!(ty.representation, representation, "{name}");
        }
    }

    #[test]
    fn test_unknown_datatype_falls_back_to_varchar() {
        assert_eq!(ColumnType::from_datatype(Some("xml")), ColumnType::FALLBACK);
        assert_eq!(ColumnType::from_datatype(Some("LONG")), ColumnType::FALLBACK);
        assert_eq!(ColumnType::from_datatype(None), ColumnType::FALLBACK);
    }

    #[test]
    fn test_type_codes() {
        assert_eq!(SqlType::Varchar.code(), 12);
        assert_eq!(SqlType::Bigint.code(), -5);
        assert_eq!(SqlType::Timestamp.code(), 93);
    }
}
