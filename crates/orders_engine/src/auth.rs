use std::fmt;

use log::{info, warn};
use scraper::{Html, Selector};
use url::Url;

use crate::fetch::{FetchSettings, Session};
use crate::types::{AuthError, AuthFailureKind, FetchFailureKind};

/// Login form values. The password never appears in `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Best-effort classifier over the login response. There is no formal
/// success token, so the pipeline can only look for known failure
/// signatures; extend the signature list by swapping the implementation.
pub trait LoginCheck: Send + Sync {
    fn is_login_failure(&self, html: &str) -> bool;
}

/// Default signature: the response still carries the sign-in form
/// (`form#signin` or `form[name="signin"]`), or an "invalid" credentials
/// marker near a password field.
#[derive(Debug, Default)]
pub struct SigninFormCheck;

impl LoginCheck for SigninFormCheck {
    fn is_login_failure(&self, html: &str) -> bool {
        let doc = Html::parse_document(html);
        for selector in ["form#signin", r#"form[name="signin"]"#] {
            if let Ok(sel) = Selector::parse(selector) {
                if doc.select(&sel).next().is_some() {
                    return true;
                }
            }
        }
        if let Ok(sel) = Selector::parse(r#"input[type="password"]"#) {
            if doc.select(&sel).next().is_some() {
                let text = html.to_ascii_lowercase();
                if text.contains("invalid credentials") || text.contains("invalid login") {
                    return true;
                }
            }
        }
        false
    }
}

/// Establish a cookie-bearing session and submit the sign-in form.
///
/// Step 1 issues a GET to `base_url` purely for session cookies; the body is
/// discarded and a non-2xx status is tolerated. Step 2 POSTs the credential
/// fields (`email`, `password`, `action=signin`) to `login_url` with those
/// cookies. Success is heuristic: the response must not match `check`'s
/// failure signature. Single attempt, no retry.
pub async fn authenticate(
    settings: FetchSettings,
    base_url: &str,
    login_url: &str,
    credentials: &Credentials,
    check: &dyn LoginCheck,
) -> Result<Session, AuthError> {
    let base = parse_url(base_url)?;
    let login = parse_url(login_url)?;

    let session = Session::open(settings, &base).map_err(auth_error_from_fetch)?;

    // Cookie warm-up. Some deployments answer the root with a redirect or
    // even an error page while still issuing the session cookie.
    match session.get_lenient(&base).await {
        Ok(response) => {
            let status = response.status();
            if !status.is_success() {
                warn!("base url answered {status}, proceeding with whatever cookies it set");
            }
        }
        Err(err) => return Err(auth_error_from_fetch(err)),
    }

    let fields = [
        ("email", credentials.email.as_str()),
        ("password", credentials.password.as_str()),
        ("action", "signin"),
    ];
    let (final_url, body) = session
        .post_form(&login, &fields)
        .await
        .map_err(auth_error_from_fetch)?;

    if check.is_login_failure(&body) {
        return Err(AuthError::new(
            AuthFailureKind::Rejected,
            format!("response from {final_url} still looks like the sign-in page"),
        ));
    }

    info!("login accepted for {}", credentials.email);
    Ok(session)
}

fn parse_url(raw: &str) -> Result<Url, AuthError> {
    Url::parse(raw).map_err(|err| AuthError::new(AuthFailureKind::InvalidUrl, err.to_string()))
}

fn auth_error_from_fetch(err: crate::types::FetchError) -> AuthError {
    let kind = match err.kind {
        FetchFailureKind::Timeout => AuthFailureKind::Timeout,
        FetchFailureKind::InvalidUrl => AuthFailureKind::InvalidUrl,
        _ => AuthFailureKind::Network,
    };
    AuthError::new(kind, err.message)
}
