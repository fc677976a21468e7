use orders_engine::{find_orders_table, normalize, Cell, ColumnType, ExtractError};
use pretty_assertions::assert_eq;

fn wrap(table: &str) -> String {
    format!("<html><head><title>Orders</title></head><body><div>{table}</div></body></html>")
}

#[test]
fn table_found_by_id() {
    let html = wrap(
        r#"<table id="orders">
            <tr><th>Order #</th><th>Total</th></tr>
            <tr><td>1001</td><td>19.99</td></tr>
        </table>"#,
    );
    let raw = find_orders_table(&html).unwrap();
    assert_eq!(raw.headers, vec!["Order #", "Total"]);
    assert_eq!(raw.rows, vec![vec!["1001", "19.99"]]);
}

#[test]
fn table_found_by_class_when_id_absent() {
    let html = wrap(
        r#"<table class="orders">
            <tr><th>A</th></tr><tr><td>1</td></tr>
        </table>"#,
    );
    let raw = find_orders_table(&html).unwrap();
    assert_eq!(raw.headers, vec!["A"]);
}

#[test]
fn striped_table_is_the_last_resort() {
    let html = wrap(
        r#"<table class="table table-striped">
            <tr><th>A</th></tr><tr><td>1</td></tr>
        </table>"#,
    );
    let raw = find_orders_table(&html).unwrap();
    assert_eq!(raw.headers, vec!["A"]);
}

#[test]
fn id_match_wins_over_later_candidates() {
    let html = wrap(
        r#"<table class="table table-striped"><tr><th>Wrong</th></tr></table>
           <table id="orders"><tr><th>Right</th></tr></table>"#,
    );
    let raw = find_orders_table(&html).unwrap();
    assert_eq!(raw.headers, vec!["Right"]);
}

#[test]
fn page_without_candidates_fails_with_table_not_found() {
    let html = wrap(r#"<table class="unrelated"><tr><th>A</th></tr></table><div id="orders"></div>"#);
    let err = find_orders_table(&html).unwrap_err();
    assert!(matches!(err, ExtractError::TableNotFound));
}

#[test]
fn row_and_column_counts_follow_the_source() {
    let html = wrap(
        r#"<table id="orders">
            <thead><tr><th>A</th><th>B</th><th>C</th></tr></thead>
            <tbody>
                <tr><td>1</td><td>2</td><td>3</td></tr>
                <tr><td>4</td><td>5</td><td>6</td></tr>
                <tr><td>7</td><td>8</td><td>9</td></tr>
            </tbody>
        </table>"#,
    );
    let table = normalize(find_orders_table(&html).unwrap());
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.column_count(), 3);
}

#[test]
fn orders_scenario_coerces_types_and_nulls() {
    let html = wrap(
        r#"<table id="orders">
            <tr><th>Order #</th><th>Date</th><th>Total</th></tr>
            <tr><td>1001</td><td>2024-01-01</td><td>19.99</td></tr>
            <tr><td>1002</td><td>2024-01-02</td><td></td></tr>
        </table>"#,
    );
    let table = normalize(find_orders_table(&html).unwrap());

    assert_eq!(table.headers, vec!["Order #", "Date", "Total"]);
    assert_eq!(
        table.rows,
        vec![
            vec![
                Cell::Int(1001),
                Cell::Text("2024-01-01".into()),
                Cell::Float(19.99),
            ],
            vec![Cell::Int(1002), Cell::Text("2024-01-02".into()), Cell::Null],
        ]
    );
    assert_eq!(table.column_type(0), ColumnType::Integer);
    assert_eq!(table.column_type(1), ColumnType::Text);
    assert_eq!(table.column_type(2), ColumnType::Real);
}

#[test]
fn short_row_padded_against_three_column_header() {
    let html = wrap(
        r#"<table id="orders">
            <tr><th>A</th><th>B</th><th>C</th></tr>
            <tr><td>x</td><td>y</td></tr>
        </table>"#,
    );
    let table = normalize(find_orders_table(&html).unwrap());
    assert_eq!(
        table.rows,
        vec![vec![Cell::Text("x".into()), Cell::Text("y".into()), Cell::Null]]
    );
}

#[test]
fn duplicate_and_messy_headers_normalize_deterministically() {
    let html = wrap(
        r#"<table id="orders">
            <tr><th>  Total </th><th>Qty
            </th><th>Total</th></tr>
            <tr><td>1</td><td>2</td><td>3</td></tr>
        </table>"#,
    );
    let table = normalize(find_orders_table(&html).unwrap());
    assert_eq!(table.headers, vec!["Total", "Qty", "Total_2"]);
}
