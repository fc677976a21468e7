use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use crate::preview::Preview;

/// A single normalized table cell. Numeric coercion is best-effort: anything
/// that does not parse cleanly as an integer or float stays text, and an
/// empty cell becomes `Null`.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Stringified form used by the CSV sink and the preview. `Null` renders
    /// as the empty string.
    pub fn display_string(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Int(v) => v.to_string(),
            Cell::Float(v) => v.to_string(),
            Cell::Text(v) => v.clone(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

/// SQL column affinity inferred from a column's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
}

/// The canonical tabular value produced by extraction and consumed by the
/// output writer. Invariant: every row holds exactly `headers.len()` cells
/// and header names are unique.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl NormalizedTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Infer the SQL affinity of one column: `Integer` when every non-null
    /// cell is an integer, `Real` when every non-null cell is numeric,
    /// otherwise `Text`. An all-null column defaults to `Text`.
    pub fn column_type(&self, index: usize) -> ColumnType {
        let mut seen_value = false;
        let mut all_int = true;
        let mut all_numeric = true;
        for row in &self.rows {
            match row.get(index) {
                Some(Cell::Null) | None => {}
                Some(Cell::Int(_)) => seen_value = true,
                Some(Cell::Float(_)) => {
                    seen_value = true;
                    all_int = false;
                }
                Some(Cell::Text(_)) => {
                    seen_value = true;
                    all_int = false;
                    all_numeric = false;
                }
            }
        }
        match (seen_value, all_int, all_numeric) {
            (false, _, _) => ColumnType::Text,
            (true, true, _) => ColumnType::Integer,
            (true, false, true) => ColumnType::Real,
            _ => ColumnType::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FetchFailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FetchFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Network,
}

impl fmt::Display for FetchFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailureKind::InvalidUrl => write!(f, "invalid url"),
            FetchFailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FetchFailureKind::Timeout => write!(f, "timeout"),
            FetchFailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FetchFailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FetchFailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FetchFailureKind::Network => write!(f, "network error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthError {
    pub kind: AuthFailureKind,
    pub message: String,
}

impl AuthError {
    pub(crate) fn new(kind: AuthFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl Error for AuthError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFailureKind {
    InvalidUrl,
    Timeout,
    Network,
    /// Heuristic match against a known login-failure signature. There is no
    /// formal success token, so this can only say "the response still looks
    /// like the sign-in page".
    Rejected,
}

impl fmt::Display for AuthFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthFailureKind::InvalidUrl => write!(f, "invalid url"),
            AuthFailureKind::Timeout => write!(f, "timeout"),
            AuthFailureKind::Network => write!(f, "network error"),
            AuthFailureKind::Rejected => write!(f, "login rejected"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// No selector candidate matched. The usual cause is a page that renders
    /// its table through client-side scripting, which this pipeline cannot
    /// execute.
    #[error("no orders table found on the page")]
    TableNotFound,
    #[error("failed to decode page bytes with {encoding}")]
    Decode { encoding: String },
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// One of the persistence targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    Csv,
    Xlsx,
    Sqlite,
    Json,
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkKind::Csv => write!(f, "csv"),
            SinkKind::Xlsx => write!(f, "xlsx"),
            SinkKind::Sqlite => write!(f, "sqlite"),
            SinkKind::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("persist error: {0}")]
    Persist(#[from] crate::persist::PersistError),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where a successful sink write landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkLocation {
    File(PathBuf),
    Database { path: PathBuf, table: String },
}

impl fmt::Display for SinkLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkLocation::File(path) => write!(f, "{}", path.display()),
            SinkLocation::Database { path, table } => {
                write!(f, "{} (table {table})", path.display())
            }
        }
    }
}

/// Per-sink result. Sinks are independent, so a run can end with any mix of
/// successes and failures.
#[derive(Debug)]
pub struct SinkReport {
    pub sink: SinkKind,
    pub outcome: Result<SinkLocation, WriteError>,
}

/// Terminal artifact of one pipeline run.
#[derive(Debug)]
pub struct OutputManifest {
    pub fetched_utc: String,
    pub row_count: usize,
    pub column_count: usize,
    pub sinks: Vec<SinkReport>,
    pub preview: Preview,
}

impl OutputManifest {
    pub fn all_sinks_succeeded(&self) -> bool {
        self.sinks.iter().all(|report| report.outcome.is_ok())
    }

    pub fn failed_sinks(&self) -> impl Iterator<Item = &SinkReport> {
        self.sinks.iter().filter(|report| report.outcome.is_err())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),
    #[error("orders page fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("table extraction failed: {0}")]
    Extract(#[from] ExtractError),
    #[error("runtime error: {0}")]
    Runtime(String),
}
