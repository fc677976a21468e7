use std::time::Duration;

use futures_util::StreamExt;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, REFERER, USER_AGENT};
use url::Url;

use crate::types::{FetchError, FetchFailureKind};

/// Browser-like identity; some sites refuse the default reqwest agent.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Authenticated HTTP context for one pipeline run: a cookie-bearing client
/// with fixed default headers. Created by `auth::authenticate`, consumed by
/// the orders-page fetch, then dropped.
#[derive(Debug)]
pub struct Session {
    client: reqwest::Client,
    settings: FetchSettings,
}

/// Response body plus the details needed downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub final_url: String,
    pub content_type: Option<String>,
}

impl Session {
    /// Build the shared client: cookie jar, User-Agent, Referer pointing at
    /// the site root, bounded timeouts and redirects.
    pub(crate) fn open(settings: FetchSettings, referer: &Url) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(referer.as_str()) {
            headers.insert(REFERER, value);
        }
        let user_agent = HeaderValue::from_str(&settings.user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT));
        headers.insert(USER_AGENT, user_agent);

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| FetchError::new(FetchFailureKind::Network, err.to_string()))?;

        Ok(Self { client, settings })
    }

    /// GET with no status or content-type enforcement. The cookie warm-up
    /// step uses this: the site may answer non-2xx and still set cookies.
    pub(crate) async fn get_lenient(&self, url: &Url) -> Result<reqwest::Response, FetchError> {
        self.client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)
    }

    /// Form-encoded POST, following redirects. Returns the final URL and the
    /// decoded body so the caller can classify the response.
    pub(crate) async fn post_form(
        &self,
        url: &Url,
        fields: &[(&str, &str)],
    ) -> Result<(String, String), FetchError> {
        let response = self
            .client
            .post(url.clone())
            .form(fields)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let final_url = response.url().to_string();
        let body = response.text().await.map_err(map_reqwest_error)?;
        Ok((final_url, body))
    }

    /// Fetch one HTML page with the authenticated client. Enforces 2xx,
    /// an allowed content type, and the configured size cap while streaming
    /// the body.
    pub async fn fetch_page(&self, url: &Url) -> Result<FetchOutput, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FetchFailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FetchFailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        if let Some(ct) = content_type.as_deref() {
            if !self.is_content_type_allowed(ct) {
                return Err(FetchError::new(
                    FetchFailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "unsupported content type",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FetchFailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        debug!("fetched {} ({} bytes)", final_url, bytes.len());
        Ok(FetchOutput {
            bytes,
            final_url,
            content_type,
        })
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type
            .split(';')
            .next()
            .unwrap_or(content_type)
            .trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FetchFailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FetchFailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FetchFailureKind::Network, err.to_string())
}
