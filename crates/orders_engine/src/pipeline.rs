use log::info;
use url::Url;

use crate::auth::{authenticate, Credentials, LoginCheck, SigninFormCheck};
use crate::decode::decode_page;
use crate::extract::find_orders_table;
use crate::fetch::{FetchSettings, Session};
use crate::normalize::normalize;
use crate::types::{
    AuthError, AuthFailureKind, ExtractError, FetchError, FetchFailureKind, NormalizedTable,
    OutputManifest, PipelineError,
};
use crate::writer::{write_outputs, SinkTargets};

/// Path of the sign-in form action, relative to the site root.
pub const LOGIN_PATH: &str = "index.php";

/// Everything one run needs. The engine never reads environment state; the
/// caller (CLI or front-end) resolves flags, env vars and defaults into this
/// struct.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub base_url: String,
    pub login_url: String,
    pub orders_url: String,
    pub email: String,
    pub password: String,
    pub targets: SinkTargets,
    pub fetch: FetchSettings,
}

/// Resolve the conventional login URL from the base URL.
pub fn default_login_url(base_url: &str) -> Result<String, AuthError> {
    let base = Url::parse(base_url)
        .map_err(|err| AuthError::new(AuthFailureKind::InvalidUrl, err.to_string()))?;
    base.join(LOGIN_PATH)
        .map(|url| url.to_string())
        .map_err(|err| AuthError::new(AuthFailureKind::InvalidUrl, err.to_string()))
}

/// Run the whole pipeline: authenticate, fetch the orders page, extract and
/// normalize the table, persist to every sink. Uses the default
/// login-failure signature.
pub async fn run(config: &PipelineConfig) -> Result<OutputManifest, PipelineError> {
    run_with_check(config, &SigninFormCheck).await
}

/// Like [`run`], with a caller-supplied login-failure classifier.
pub async fn run_with_check(
    config: &PipelineConfig,
    check: &dyn LoginCheck,
) -> Result<OutputManifest, PipelineError> {
    let credentials = Credentials {
        email: config.email.clone(),
        password: config.password.clone(),
    };

    info!("logging in at {}", config.login_url);
    let session = authenticate(
        config.fetch.clone(),
        &config.base_url,
        &config.login_url,
        &credentials,
        check,
    )
    .await?;

    info!("fetching orders page {}", config.orders_url);
    let orders_url = Url::parse(&config.orders_url).map_err(|err| {
        PipelineError::Fetch(FetchError::new(FetchFailureKind::InvalidUrl, err.to_string()))
    })?;
    let fetched_utc = chrono::Utc::now().to_rfc3339();
    let table = extract_table(&session, &orders_url).await?;

    Ok(write_outputs(&table, &config.targets, fetched_utc))
}

/// Fetch the orders page with the authenticated session and turn its markup
/// into the canonical table. Pure apart from the single GET; produces no
/// partial table on failure.
pub async fn extract_table(
    session: &Session,
    orders_url: &Url,
) -> Result<NormalizedTable, ExtractError> {
    let output = session.fetch_page(orders_url).await?;
    let page = decode_page(&output.bytes, output.content_type.as_deref())?;
    let raw = find_orders_table(&page.html)?;
    let table = normalize(raw);
    info!(
        "extracted {} rows x {} columns (encoding {})",
        table.row_count(),
        table.column_count(),
        page.encoding_label
    );
    Ok(table)
}

/// Synchronous wrapper for callers without a runtime: builds a tokio runtime
/// for the duration of one run.
pub fn run_blocking(config: &PipelineConfig) -> Result<OutputManifest, PipelineError> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|err| PipelineError::Runtime(err.to_string()))?;
    runtime.block_on(run(config))
}
