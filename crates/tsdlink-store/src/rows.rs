//! CSV decoding of stored content.

use csv_async::AsyncReaderBuilder;
use futures::StreamExt;
use tokio::io::AsyncRead;
use tsdlink_types::{ColumnDescriptor, Value, ValueError};

use crate::StoreError;

/// Rows replayed from a store, with the header row split off.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowSet {
    /// Header row.
    pub headers: Vec<String>,
    /// Data rows in arrival order.
    pub rows: Vec<Vec<String>>,
}

impl RowSet {
    /// Returns the number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Decodes every cell with the representation of its column.
    ///
    /// Cells are matched to columns by ordinal; cells without a described
    /// column are kept as text. Columns whose ordinal is not below the column
    /// count are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error for the first cell that does not fit its column.
    pub fn typed(&self, columns: &[ColumnDescriptor]) -> Result<Vec<Vec<Value>>, ValueError> {
        let mut by_ordinal: Vec<Option<&ColumnDescriptor>> = vec![None; columns.len()];
        for column in columns {
            if let Some(slot) = by_ordinal.get_mut(column.ordinal) {
                *slot = Some(column);
            }
        }

        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(i, cell)| match by_ordinal.get(i).copied().flatten() {
                        Some(column) => Value::parse(column.representation(), cell),
                        None => Ok(Value::String(cell.clone())),
                    })
                    .collect()
            })
            .collect()
    }
}

/// Reads CSV from `reader`, stopping after `max_rows` data rows when set.
pub(crate) async fn read_csv<R>(reader: R, max_rows: Option<u64>) -> Result<RowSet, StoreError>
where
    R: AsyncRead + Unpin + Send,
{
    let mut reader = AsyncReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .create_reader(reader);

    let headers = reader.headers().await?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    let mut records = reader.records();
    while let Some(record) = records.next().await {
        if max_rows.is_some_and(|max| rows.len() as u64 >= max) {
            break;
        }
        rows.push(record?.iter().map(str::to_string).collect());
    }

    Ok(RowSet { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsdlink_types::{ColumnType, DEFAULT_CATALOG_NAME};

    fn column(name: &str, ordinal: usize, datatype: &str) -> ColumnDescriptor {
        ColumnDescriptor {
            ordinal,
            name: name.to_string(),
            title: None,
            table: None,
            schema: "atsd".to_string(),
            catalog: DEFAULT_CATALOG_NAME.to_string(),
            type_name: Some(datatype.to_string()),
            column_type: ColumnType::from_datatype(Some(datatype)),
            nullable: true,
            searchable: false,
        }
    }

    #[tokio::test]
    async fn test_read_csv() {
        let csv = b"entity,value\nnurswgvml007,1.5\n\"a,b\",2\n";
        let set = read_csv(&csv[..], None).await.unwrap();
        assert_eq!(set.headers, ["entity", "value"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.rows[1], ["a,b", "2"]);
    }

    #[tokio::test]
    async fn test_read_csv_respects_limit() {
        let csv = b"n\n1\n2\n3\n";
        let set = read_csv(&csv[..], Some(2)).await.unwrap();
        assert_eq!(set.rows, [["1"], ["2"]]);
    }

    #[tokio::test]
    async fn test_read_empty_content() {
        let set = read_csv(&b""[..], None).await.unwrap();
        assert!(set.is_empty());
        assert!(set.headers.is_empty());
    }

    #[test]
    fn test_typed_rows_follow_ordinals() {
        let set = RowSet {
            headers: vec!["time".into(), "value".into(), "extra".into()],
            rows: vec![vec!["1464945840000".into(), "".into(), "x".into()]],
        };
        let columns = [column("value", 1, "double"), column("time", 0, "long")];
        let typed = set.typed(&columns).unwrap();
        assert_eq!(
            typed[0],
            [
                Value::Long(1_464_945_840_000),
                Value::Null,
                Value::String("x".into())
            ]
        );
    }

    #[test]
    fn test_typed_rows_ignore_out_of_range_ordinal() {
        let set = RowSet {
            headers: vec!["n".into()],
            rows: vec![vec!["1".into()]],
        };
        let typed = set.typed(&[column("n", 1 << 40, "integer")]).unwrap();
        assert_eq!(typed[0], [Value::String("1".into())]);
    }

    #[test]
    fn test_typed_rows_report_bad_cell() {
        let set = RowSet {
            headers: vec!["n".into()],
            rows: vec![vec!["abc".into()]],
        };
        assert!(set.typed(&[column("n", 0, "integer")]).is_err());
    }
}
