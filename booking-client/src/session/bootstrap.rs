//! Session bootstrap.
//!
//! One GET to the site root yields both credentials every later request
//! needs: the session cookie from `Set-Cookie`, and the anti-bot token that
//! an obfuscated inline script writes to `localStorage`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use reqwest::header::SET_COOKIE;
use tracing::{debug, info, instrument};

use crate::error::BookingError;

use super::script::ScriptEvaluator;

/// Name of the site's session cookie.
pub const SESSION_COOKIE_NAME: &str = "_gv_sessid";

/// `localStorage` key the inline script stores the token under.
pub const TOKEN_STORAGE_KEY: &str = "gv-token";

/// Global the harness copies the captured token into.
const CAPTURE_VARIABLE: &str = "__gvCaptured";

/// The obfuscated token script: starts `$$_=~[];` and ends `)())();`.
static TOKEN_FRAGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\$\$_=~\[\];.*?\)\(\)\)\(\);").expect("token fragment pattern is valid")
});

/// Credentials for authorized requests.
///
/// Created once by [`bootstrap`] and read-only afterwards. There is no
/// renewal: once the server rejects it, the client is done.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    cookie: String,
    token: String,
}

impl Session {
    pub fn new(cookie: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            cookie: cookie.into(),
            token: token.into(),
        }
    }

    /// Cookie header value, e.g. `_gv_sessid=abc;`.
    pub fn cookie(&self) -> &str {
        &self.cookie
    }

    /// Anti-bot token.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("cookie", &"<redacted>")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Fetch the site root and derive a [`Session`] from it.
#[instrument(skip(http, evaluator))]
pub async fn bootstrap<E>(
    http: &reqwest::Client,
    base_url: &str,
    evaluator: &E,
) -> Result<Session, BookingError>
where
    E: ScriptEvaluator + ?Sized,
{
    let response = http.get(base_url).send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(BookingError::Status {
            status: status.as_u16(),
            message: body.chars().take(500).collect(),
        });
    }

    let set_cookie: Vec<String> = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::to_owned)
        .collect();

    let body = response.text().await?;
    debug!(
        cookies = set_cookie.len(),
        body_len = body.len(),
        "fetched bootstrap page"
    );

    let session = session_from_page(set_cookie.iter().map(String::as_str), &body, evaluator)?;
    info!("session established");
    Ok(session)
}

/// Build a session from the bootstrap response's cookies and body.
pub fn session_from_page<'a, E>(
    set_cookie: impl IntoIterator<Item = &'a str>,
    body: &str,
    evaluator: &E,
) -> Result<Session, BookingError>
where
    E: ScriptEvaluator + ?Sized,
{
    let cookie = extract_session_cookie(set_cookie).ok_or_else(|| {
        BookingError::Session(format!("no {SESSION_COOKIE_NAME} cookie in response"))
    })?;

    let fragment = extract_token_fragment(body).ok_or_else(|| {
        BookingError::TokenExtraction("token script not found in page".to_string())
    })?;

    let token = evaluator
        .evaluate(&storage_harness(fragment, TOKEN_STORAGE_KEY), CAPTURE_VARIABLE)
        .map_err(|e| BookingError::TokenExtraction(e.to_string()))?
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            BookingError::TokenExtraction(format!(
                "script did not store {TOKEN_STORAGE_KEY:?}"
            ))
        })?;

    Ok(Session::new(cookie, token))
}

/// Find the session cookie among `Set-Cookie` header values.
///
/// Returns the first `name=value` segment for [`SESSION_COOKIE_NAME`],
/// with its `;` separator. Handles both one header per cookie and several
/// cookies folded into one header with `, `.
pub fn extract_session_cookie<'a>(set_cookie: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let prefix = format!("{SESSION_COOKIE_NAME}=");

    set_cookie
        .into_iter()
        .flat_map(|header| header.split(';'))
        .flat_map(|segment| segment.split(", "))
        .map(str::trim)
        .find(|segment| segment.starts_with(&prefix) && segment.len() > prefix.len())
        .map(|segment| format!("{segment};"))
}

/// Locate the obfuscated token script in the page body.
pub fn extract_token_fragment(body: &str) -> Option<&str> {
    TOKEN_FRAGMENT.find(body).map(|m| m.as_str())
}

/// Wrap `fragment` so that writes to `localStorage[key]` land in
/// [`CAPTURE_VARIABLE`].
fn storage_harness(fragment: &str, key: &str) -> String {
    // serde_json string output is also a valid JS string literal
    let key = serde_json::Value::from(key).to_string();
    format!(
        "var {CAPTURE_VARIABLE};\n\
         var localStorage = {{\n\
           setItem: function (k, v) {{ if (k === {key}) {{ {CAPTURE_VARIABLE} = String(v); }} }},\n\
           getItem: function (k) {{ return null; }}\n\
         }};\n\
         var window = {{ localStorage: localStorage }};\n\
         {fragment}\n"
    )
}
