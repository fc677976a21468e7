use std::path::PathBuf;

use log::{info, warn};

use crate::preview::build_preview;
use crate::sink_csv::write_csv;
use crate::sink_json::write_json;
use crate::sink_sqlite::write_sqlite;
use crate::sink_xlsx::write_xlsx;
use crate::types::{NormalizedTable, OutputManifest, SinkKind, SinkReport};

/// Where each sink writes. Defaults match the conventional output names.
#[derive(Debug, Clone)]
pub struct SinkTargets {
    pub csv_path: PathBuf,
    pub xlsx_path: PathBuf,
    pub json_path: PathBuf,
    pub db_path: PathBuf,
}

impl Default for SinkTargets {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("orders.csv"),
            xlsx_path: PathBuf::from("orders.xlsx"),
            json_path: PathBuf::from("orders.json"),
            db_path: PathBuf::from("orders.db"),
        }
    }
}

/// Persist the table to every sink and assemble the manifest.
///
/// Sinks are independent: one failing is recorded in its report and the
/// remaining sinks are still attempted. Partial success is a valid outcome
/// and is never collapsed into a single pass/fail.
pub fn write_outputs(
    table: &NormalizedTable,
    targets: &SinkTargets,
    fetched_utc: String,
) -> OutputManifest {
    let sinks = vec![
        run_sink(SinkKind::Csv, write_csv(table, &targets.csv_path)),
        run_sink(SinkKind::Xlsx, write_xlsx(table, &targets.xlsx_path)),
        run_sink(SinkKind::Sqlite, write_sqlite(table, &targets.db_path)),
        run_sink(SinkKind::Json, write_json(table, &targets.json_path)),
    ];

    OutputManifest {
        fetched_utc,
        row_count: table.row_count(),
        column_count: table.column_count(),
        preview: build_preview(table),
        sinks,
    }
}

fn run_sink(
    sink: SinkKind,
    outcome: Result<crate::types::SinkLocation, crate::types::WriteError>,
) -> SinkReport {
    match &outcome {
        Ok(location) => info!("{sink} sink wrote {location}"),
        Err(err) => warn!("{sink} sink failed: {err}"),
    }
    SinkReport { sink, outcome }
}
