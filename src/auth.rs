//! Bearer credential bridging between browser cookies and the admin API.
//!
//! Inbound requests may carry the caller's token as an `auth_token` cookie,
//! an `Authorization` header, or a `token` query parameter; the admin API
//! only understands `Authorization`. In the other direction, a trusted editor
//! origin can trade its bearer header for an `auth_token` cookie so that
//! plain `<img>`/`<a>` requests authenticate too.

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Cookie carrying the bearer token.
pub const AUTH_COOKIE: &str = "auth_token";

/// Query parameter carrying the bearer token.
pub const TOKEN_PARAM: &str = "token";

/// Cookie lifetime in seconds (23.5 hours).
pub const COOKIE_MAX_AGE: u32 = 84_600;

/// Preview deployments of the editor: `https://<ref>--da-live--adobe.aem.{live,page}`.
static PREVIEW_ORIGIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://[a-zA-Z0-9]+-?-da-live--adobe\.aem\.(live|page)$")
        .expect("preview origin pattern is valid")
});

/// Resolve the outbound `authorization` value for an admin request.
///
/// Priority: `auth_token` cookie, then the `Authorization` header (passed
/// through as-is), then the `token` query parameter. Cookie and query tokens
/// are wrapped as `Bearer <token>`.
pub fn extract_bearer(headers: &HeaderMap, query_token: Option<&str>) -> Option<String> {
    if let Some(token) = auth_cookie(headers) {
        return Some(format!("Bearer {}", token));
    }

    if let Some(value) = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
    {
        return Some(value.to_string());
    }

    query_token
        .filter(|token| !token.is_empty())
        .map(|token| format!("Bearer {}", token))
}

/// Read the `auth_token` cookie across all `Cookie` headers.
pub fn auth_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            if name.trim() != AUTH_COOKIE {
                return None;
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            let decoded = urlencoding::decode(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string());
            Some(decoded)
        })
        .filter(|token| !token.is_empty())
}

/// Pull the `token` parameter out of a raw query string.
pub fn query_token(query: Option<&str>) -> Option<String> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query?).ok()?;
    pairs
        .into_iter()
        .find(|(name, _)| name == TOKEN_PARAM)
        .map(|(_, value)| value)
}

/// Build the `Set-Cookie` value for a bearer `Authorization` header.
///
/// The token is the part after the scheme, reduced to the RFC 6750 `b64token`
/// alphabet. Returns `None` when nothing usable remains.
pub fn mint_cookie(authorization: &str) -> Option<String> {
    let raw = authorization.split(' ').nth(1)?;
    let token: String = raw.chars().filter(is_b64token_char).collect();
    if token.is_empty() {
        return None;
    }
    Some(format!(
        "{}={}; Secure; Path=/; HttpOnly; SameSite=None; Partitioned; Max-Age={}",
        AUTH_COOKIE, token, COOKIE_MAX_AGE
    ))
}

fn is_b64token_char(c: &char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~' | '+' | '/' | '=')
}

/// Origins allowed to mint the auth cookie.
#[derive(Debug, Clone, Default)]
pub struct OriginPolicy {
    exact: HashSet<String>,
}

impl OriginPolicy {
    pub fn new(origins: impl IntoIterator<Item = String>) -> Self {
        Self {
            exact: origins.into_iter().collect(),
        }
    }

    /// Exact allow-list match, or an editor preview deployment.
    pub fn is_trusted(&self, origin: Option<&str>) -> bool {
        match origin {
            Some(origin) if !origin.is_empty() => {
                self.exact.contains(origin) || PREVIEW_ORIGIN.is_match(origin)
            }
            _ => false,
        }
    }
}
