//! Schema document to column descriptor conversion.

use serde_json::{Map, Value};
use tracing::{debug, warn};
use tsdlink_types::{ColumnDescriptor, ColumnType, DEFAULT_CATALOG_NAME, SchemaError};

const PUBLISHER_SECTION: &str = "publisher";
const SCHEMA_NAME_PROPERTY: &str = "schema";
const TABLE_SCHEMA_SECTION: &str = "tableSchema";
const COLUMNS_SCHEME: &str = "columns";
const NAME_PROPERTY: &str = "name";
const TITLE_PROPERTY: &str = "title";
const TABLE_PROPERTY: &str = "table";
const DATATYPE_PROPERTY: &str = "datatype";
const INDEX_PROPERTY: &str = "index";

/// Builds the column descriptors described by a schema document.
///
/// Empty text yields an empty list without parsing. Otherwise the document must
/// be an object with a `publisher.schema` string and a `tableSchema.columns`
/// array; unknown keys are ignored anywhere in the document.
///
/// A column's ordinal is its 1-based `index` minus one when present, else its
/// position in the array. An `index` outside `1..=columns.len()` is ignored in
/// favour of the position, so ordinals always stay below the column count.
///
/// # Errors
///
/// Returns the [`SchemaError`] variant naming the first missing piece, or
/// [`SchemaError::DuplicateOrdinal`] when two columns resolve to the same
/// ordinal. No partial list is returned.
///
/// # Example
///
/// ```
/// use tsdlink_metadata::build_metadata_list;
///
/// let json = r#"{
///     "publisher": {"schema": "atsd"},
///     "tableSchema": {"columns": [
///         {"name": "value", "datatype": "double", "index": 2},
///         {"name": "time", "datatype": "long", "index": 1}
///     ]}
/// }"#;
/// let columns = build_metadata_list(json).unwrap();
/// assert_eq!(columns[0].ordinal, 1);
/// assert_eq!(columns[1].name, "time");
/// ```
pub fn build_metadata_list(json: &str) -> Result<Vec<ColumnDescriptor>, SchemaError> {
    if json.is_empty() {
        return Ok(Vec::new());
    }

    let document: Value =
        serde_json::from_str(json).map_err(|e| SchemaError::Malformed(e.to_string()))?;
    let root = document.as_object().ok_or(SchemaError::NotAnObject)?;

    let publisher = section(root, PUBLISHER_SECTION).ok_or(SchemaError::MissingPublisher)?;
    let schema = publisher
        .get(SCHEMA_NAME_PROPERTY)
        .and_then(Value::as_str)
        .ok_or(SchemaError::MissingSchemaName)?;
    let table_schema =
        section(root, TABLE_SCHEMA_SECTION).ok_or(SchemaError::MissingTableSchema)?;
    let columns = table_schema
        .get(COLUMNS_SCHEME)
        .and_then(Value::as_array)
        .ok_or(SchemaError::MissingColumns)?;

    let count = columns.len();
    let list = columns
        .iter()
        .enumerate()
        .map(|(position, column)| column_descriptor(schema, position, count, column))
        .collect::<Result<Vec<_>, _>>()?;
    check_unique_ordinals(&list)?;

    debug!(columns = list.len(), schema, "schema processed");
    Ok(list)
}

fn section<'a>(root: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    root.get(key).and_then(Value::as_object)
}

fn column_descriptor(
    schema: &str,
    position: usize,
    count: usize,
    column: &Value,
) -> Result<ColumnDescriptor, SchemaError> {
    let property = column
        .as_object()
        .ok_or(SchemaError::InvalidColumn { position })?;
    let text = |key: &str| property.get(key).and_then(Value::as_str).map(str::to_string);

    let type_name = text(DATATYPE_PROPERTY);
    Ok(ColumnDescriptor {
        ordinal: ordinal(property.get(INDEX_PROPERTY), position, count),
        name: text(NAME_PROPERTY).unwrap_or_default(),
        title: text(TITLE_PROPERTY),
        table: text(TABLE_PROPERTY),
        schema: schema.to_string(),
        catalog: DEFAULT_CATALOG_NAME.to_string(),
        column_type: ColumnType::from_datatype(type_name.as_deref()),
        type_name,
        nullable: true,
        searchable: false,
    })
}

fn ordinal(index: Option<&Value>, position: usize, count: usize) -> usize {
    match index {
        None | Some(Value::Null) => position,
        Some(value) => match value
            .as_u64()
            .filter(|&index| index > 0)
            .and_then(|index| usize::try_from(index - 1).ok())
            .filter(|&ordinal| ordinal < count)
        {
            Some(ordinal) => ordinal,
            None => {
                warn!(%value, position, "ignoring invalid column index");
                position
            }
        },
    }
}

fn check_unique_ordinals(list: &[ColumnDescriptor]) -> Result<(), SchemaError> {
    let mut owners: Vec<Option<usize>> = vec![None; list.len()];
    for (position, column) in list.iter().enumerate() {
        match owners[column.ordinal] {
            Some(first) => {
                return Err(SchemaError::DuplicateOrdinal {
                    ordinal: column.ordinal,
                    first,
                    second: position,
                });
            }
            None => owners[column.ordinal] = Some(position),
        }
    }
    Ok(())
}
