//! Statement signature built from a discovered schema.

use serde::{Deserialize, Serialize};
use tsdlink_types::{ColumnDescriptor, ContentDescription, SchemaError};

use crate::build_metadata_list;

/// Kind of statement a signature describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatementType {
    /// A row-producing query.
    #[default]
    Select,
}

/// Column metadata of one statement together with its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMetadata {
    columns: Vec<ColumnDescriptor>,
    sql: String,
    connection_id: String,
    statement_id: u32,
    statement_type: StatementType,
}

impl ContentMetadata {
    /// Builds the signature for `sql` from optional schema text.
    ///
    /// Missing or empty schema text produces a signature without columns.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema text is not a valid schema document.
    pub fn new(
        scheme: Option<&str>,
        sql: impl Into<String>,
        connection_id: impl Into<String>,
        statement_id: u32,
    ) -> Result<Self, SchemaError> {
        let columns = match scheme {
            Some(json) => build_metadata_list(json)?,
            None => Vec::new(),
        };
        Ok(Self {
            columns,
            sql: sql.into(),
            connection_id: connection_id.into(),
            statement_id,
            statement_type: StatementType::Select,
        })
    }

    /// Builds the signature from the schema discovered on `description`.
    ///
    /// # Errors
    ///
    /// Returns an error if the discovered schema is not a valid schema document.
    pub fn from_description(
        description: &ContentDescription,
        connection_id: impl Into<String>,
        statement_id: u32,
    ) -> Result<Self, SchemaError> {
        Self::new(
            description.json_scheme(),
            description.query(),
            connection_id,
            statement_id,
        )
    }

    /// Returns the columns in schema declaration order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Returns the columns sorted by ordinal, i.e. in row order.
    #[must_use]
    pub fn columns_by_ordinal(&self) -> Vec<&ColumnDescriptor> {
        let mut sorted: Vec<_> = self.columns.iter().collect();
        sorted.sort_by_key(|column| column.ordinal);
        sorted
    }

    /// Looks up a column by name (case-insensitive).
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns
            .iter()
            .find(|column| column.name.eq_ignore_ascii_case(name))
    }

    /// Returns the SQL text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the owning connection id.
    #[must_use]
    pub fn connection_id(&self) -> &str {
        &self.connection_id
    }

    /// Returns the statement id.
    #[must_use]
    pub const fn statement_id(&self) -> u32 {
        self.statement_id
    }

    /// Returns the statement type.
    #[must_use]
    pub const fn statement_type(&self) -> StatementType {
        self.statement_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEME: &str = r#"{"publisher": {"schema": "atsd"},
        "tableSchema": {"columns": [
            {"name": "value", "datatype": "double", "index": 2},
            {"name": "datetime", "datatype": "timestamp", "index": 1}
        ]}}"#;

    #[test]
    fn test_without_scheme() {
        let metadata = ContentMetadata::new(None, "SELECT 1", "conn", 1).unwrap();
        assert!(metadata.columns().is_empty());
        assert_eq!(metadata.sql(), "SELECT 1");
        assert_eq!(metadata.statement_type(), StatementType::Select);
    }

    #[test]
    fn test_columns_by_ordinal() {
        let metadata = ContentMetadata::new(Some(SCHEME), "SELECT *", "conn", 7).unwrap();
        let names: Vec<_> = metadata
            .columns_by_ordinal()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["datetime", "value"]);
        assert_eq!(metadata.column("VALUE").map(|c| c.ordinal), Some(1));
        assert_eq!(metadata.statement_id(), 7);
        assert_eq!(metadata.connection_id(), "conn");
    }

    #[test]
    fn test_from_description() {
        let mut cd = ContentDescription::from_connection_string(
            "http://localhost:8088/api/sql",
            "SELECT * FROM cpu",
        )
        .unwrap();
        assert!(
            ContentMetadata::from_description(&cd, "c", 1)
                .unwrap()
                .columns()
                .is_empty()
        );

        cd.set_json_scheme(SCHEME.to_string());
        let metadata = ContentMetadata::from_description(&cd, "c", 1).unwrap();
        assert_eq!(metadata.columns().len(), 2);
        assert_eq!(metadata.sql(), "SELECT * FROM cpu");
    }
}
