use std::fs;

use orders_engine::{
    write_csv, write_json, write_outputs, write_sqlite, write_xlsx, Cell, NormalizedTable,
    SinkKind, SinkTargets, ORDERS_TABLE,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn orders_table() -> NormalizedTable {
    NormalizedTable {
        headers: vec!["Order #".into(), "Date".into(), "Total".into()],
        rows: vec![
            vec![
                Cell::Int(1001),
                Cell::Text("2024-01-01".into()),
                Cell::Float(19.99),
            ],
            vec![Cell::Int(1002), Cell::Text("2024-01-02".into()), Cell::Null],
        ],
    }
}

#[test]
fn csv_round_trips_headers_and_values() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("orders.csv");

    write_csv(&orders_table(), &path).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, vec!["Order #", "Date", "Total"]);

    let records: Vec<Vec<String>> = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    assert_eq!(
        records,
        vec![
            vec!["1001", "2024-01-01", "19.99"],
            vec!["1002", "2024-01-02", ""],
        ]
    );
}

#[test]
fn sqlite_write_replaces_instead_of_appending() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("orders.db");

    write_sqlite(&orders_table(), &path).unwrap();
    write_sqlite(&orders_table(), &path).unwrap();

    let conn = rusqlite::Connection::open(&path).unwrap();
    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [ORDERS_TABLE],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tables, 1);

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM \"orders\"", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 2);
}

#[test]
fn sqlite_columns_are_typed_by_inference() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("orders.db");

    write_sqlite(&orders_table(), &path).unwrap();

    let conn = rusqlite::Connection::open(&path).unwrap();
    let mut stmt = conn.prepare("PRAGMA table_info(\"orders\")").unwrap();
    let columns: Vec<(String, String)> = stmt
        .query_map([], |row| Ok((row.get(1)?, row.get(2)?)))
        .unwrap()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(
        columns,
        vec![
            ("Order #".to_string(), "INTEGER".to_string()),
            ("Date".to_string(), "TEXT".to_string()),
            ("Total".to_string(), "REAL".to_string()),
        ]
    );

    let total: Option<f64> = conn
        .query_row(
            "SELECT \"Total\" FROM \"orders\" WHERE \"Order #\" = 1002",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(total, None);
}

#[test]
fn xlsx_file_is_created() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("orders.xlsx");

    write_xlsx(&orders_table(), &path).unwrap();

    let meta = fs::metadata(&path).unwrap();
    assert!(meta.len() > 0);
}

#[test]
fn json_keeps_cell_types() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("orders.json");

    write_json(&orders_table(), &path).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let records = value.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["Order #"], serde_json::json!(1001));
    assert_eq!(records[0]["Total"], serde_json::json!(19.99));
    assert_eq!(records[1]["Date"], serde_json::json!("2024-01-02"));
    assert!(records[1]["Total"].is_null());
}

#[test]
fn one_failing_sink_does_not_stop_the_others() {
    let temp = TempDir::new().unwrap();

    // A file where the CSV sink expects a parent directory.
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "x").unwrap();

    let targets = SinkTargets {
        csv_path: blocker.join("orders.csv"),
        xlsx_path: temp.path().join("orders.xlsx"),
        json_path: temp.path().join("orders.json"),
        db_path: temp.path().join("orders.db"),
    };
    let manifest = write_outputs(&orders_table(), &targets, "2024-01-01T00:00:00Z".into());

    assert!(!manifest.all_sinks_succeeded());
    for report in &manifest.sinks {
        match report.sink {
            SinkKind::Csv => assert!(report.outcome.is_err()),
            _ => assert!(report.outcome.is_ok(), "{:?} should succeed", report.sink),
        }
    }
    assert!(targets.xlsx_path.exists());
    assert!(targets.json_path.exists());
    assert!(targets.db_path.exists());
}

#[test]
fn manifest_preview_is_bounded_and_ordered() {
    let temp = TempDir::new().unwrap();
    let table = NormalizedTable {
        headers: vec!["n".into()],
        rows: (0..30).map(|i| vec![Cell::Int(i)]).collect(),
    };
    let targets = SinkTargets {
        csv_path: temp.path().join("orders.csv"),
        xlsx_path: temp.path().join("orders.xlsx"),
        json_path: temp.path().join("orders.json"),
        db_path: temp.path().join("orders.db"),
    };
    let manifest = write_outputs(&table, &targets, "2024-01-01T00:00:00Z".into());

    assert_eq!(manifest.row_count, 30);
    assert_eq!(manifest.preview.rows.len(), 20);
    assert_eq!(manifest.preview.rows[0], vec!["0"]);
    assert_eq!(manifest.preview.rows[19], vec!["19"]);
}
