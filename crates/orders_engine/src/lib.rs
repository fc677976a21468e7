//! Orders engine: login session, table extraction, multi-sink persistence.
mod auth;
mod decode;
mod extract;
mod fetch;
mod normalize;
mod persist;
mod pipeline;
mod preview;
mod sink_csv;
mod sink_json;
mod sink_sqlite;
mod sink_xlsx;
mod types;
mod writer;

pub use auth::{authenticate, Credentials, LoginCheck, SigninFormCheck};
pub use decode::{decode_page, DecodedPage};
pub use extract::{find_orders_table, RawTable};
pub use fetch::{FetchOutput, FetchSettings, Session};
pub use normalize::normalize;
pub use persist::{atomic_write, ensure_parent_dir, PersistError};
pub use pipeline::{
    default_login_url, extract_table, run, run_blocking, run_with_check, PipelineConfig, LOGIN_PATH,
};
pub use preview::{build_preview, Preview, MAX_PREVIEW_ROWS};
pub use sink_csv::write_csv;
pub use sink_json::write_json;
pub use sink_sqlite::{write_sqlite, ORDERS_TABLE};
pub use sink_xlsx::write_xlsx;
pub use types::{
    AuthError, AuthFailureKind, Cell, ColumnType, ExtractError, FetchError, FetchFailureKind,
    NormalizedTable, OutputManifest, PipelineError, SinkKind, SinkLocation, SinkReport, WriteError,
};
pub use writer::{write_outputs, SinkTargets};
