//! Fixture generators for tsdlink benchmarks.

use serde_json::{Value, json};

const DATATYPES: [&str; 8] = [
    "string",
    "short",
    "integer",
    "long",
    "decimal",
    "float",
    "double",
    "timestamp",
];

/// Builds a schema document with `columns` columns cycling through every
/// datatype; every other column carries an explicit `index`.
pub fn schema_document(columns: usize) -> String {
    let columns: Vec<Value> = (0..columns)
        .map(|i| {
            let mut column = json!({
                "name": format!("col_{i}"),
                "title": format!("Column {i}"),
                "table": "bench_metric",
                "datatype": DATATYPES[i % DATATYPES.len()],
                "propertyUrl": "atsd:value",
            });
            if i % 2 == 0 {
                column["index"] = json!(i + 1);
            }
            column
        })
        .collect();

    json!({
        "@context": ["http://www.w3.org/ns/csvw"],
        "dc:created": {"@value": "2024-01-15T12:30:45.000Z", "@type": "xsd:date"},
        "publisher": {"schema": "atsd", "name": "Axibase Time-Series Database"},
        "tableSchema": {"columns": columns},
    })
    .to_string()
}

/// Builds CSV content for the datatypes of [`schema_document`].
pub fn csv_content(columns: usize, rows: usize) -> String {
    let mut out = String::new();
    let header: Vec<String> = (0..columns).map(|i| format!("col_{i}")).collect();
    out.push_str(&header.join(","));
    out.push('\n');

    for row in 0..rows {
        let cells: Vec<String> = (0..columns)
            .map(|i| match DATATYPES[i % DATATYPES.len()] {
                "string" => format!("entity-{row}"),
                "short" => (row % 100).to_string(),
                "timestamp" => format!("2024-01-15T12:{:02}:00.000Z", row % 60),
                "decimal" | "float" | "double" => format!("{row}.25"),
                _ => row.to_string(),
            })
            .collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_document_shape() {
        let doc: Value = serde_json::from_str(&schema_document(3)).unwrap();
        let columns = doc["tableSchema"]["columns"].as_array().unwrap();
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0]["index"], 1);
        assert!(columns[1].get("index").is_none());
    }

    #[test]
    fn test_csv_content_shape() {
        let csv = csv_content(4, 2);
        assert_eq!(csv.lines().count(), 3);
        assert_eq!(csv.lines().next(), Some("col_0,col_1,col_2,col_3"));
    }
}
