//! Schema discovery followed by a compressed content fetch.

use tsdlink_protocol::mock::{MockResponse, MockServer, gzip};
use tsdlink_protocol::{ClientConfig, encode_scheme_header};
use tsdlink_provider::{DataProvider, StatementContext};
use tsdlink_types::Value;

const SCHEME: &str = r#"{
  "publisher": {"schema": "atsd", "name": "ATSD"},
  "tableSchema": {
    "columns": [
      {"name": "value", "table": "cpu_busy", "datatype": "double", "index": 2},
      {"name": "entity", "table": "cpu_busy", "datatype": "string", "index": 1}
    ]
  }
}"#;

#[tokio::test]
async fn discovers_schema_then_spools_gzip_content() {
    let body = "entity,value\nnurswgvml007,12.5\nnurswgvml006,\n";
    let server = MockServer::start(vec![
        MockResponse::status(200).with_header("Link", encode_scheme_header(SCHEME)),
        MockResponse::ok(gzip(body.as_bytes())).with_header("Content-Encoding", "gzip"),
    ])
    .await
    .unwrap();

    let query = "SELECT entity, value FROM cpu_busy WHERE entity LIKE 'nur%'";
    let mut provider = DataProvider::connect(
        &format!("{};limit=100", server.url("/api/sql")),
        query,
        Some("reader"),
        Some("pass"),
        StatementContext::new("conn-7", 3),
        ClientConfig::default(),
    )
    .unwrap();
    provider.description_mut().set_strategy_name("file");

    provider.check_scheme(query).await.unwrap();
    let metadata = provider.metadata().unwrap();
    let names: Vec<_> = metadata
        .columns_by_ordinal()
        .iter()
        .map(|c| c.name.clone())
        .collect();
    assert_eq!(names, ["entity", "value"]);

    let stored = provider.fetch_data(0).await.unwrap();
    assert_eq!(stored, Some(body.len() as u64));

    let rows = provider.rows().await.unwrap().unwrap();
    let typed = rows.typed(metadata.columns()).unwrap();
    assert_eq!(
        typed,
        [
            vec![Value::String("nurswgvml007".into()), Value::Double(12.5)],
            vec![Value::String("nurswgvml006".into()), Value::Null],
        ]
    );

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[0].target,
        "/api/sql?q=SELECT+entity%2C+value+FROM+cpu_busy&limit=100"
    );
    assert_eq!(requests[1].method, "POST");
    assert!(requests[1].body_text().starts_with("q=SELECT+entity%2C+value+FROM+cpu_busy+WHERE"));
    assert!(requests[1].body_text().ends_with("&limit=100"));
    assert!(requests[1].header("authorization").is_some());

    provider.close().await.unwrap();
    provider.close().await.unwrap();
}
