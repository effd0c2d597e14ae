//! Access decision: which backend serves a request.
//!
//! Decision order:
//! 1. missing org or site          -> [`Route::NotFound`]
//! 2. cookie sentinel last segment -> [`Route::Cookie`]
//! 3. embeddable asset (unless the org opted in to admin) -> [`Route::Storage`]
//! 4. storage allow-listed org AND caller in a trusted network -> [`Route::Storage`]
//! 5. everything else              -> [`Route::Admin`]
//!
//! Assets are checked before the IP-gated allow-list, so they never need a
//! trusted caller.

use ipnet::IpNet;
use std::collections::HashSet;
use std::net::IpAddr;
use tracing::debug;

/// Last path segment that routes to the cookie mint endpoint.
pub const COOKIE_SENTINEL: &str = ".gimme_cookie";

/// Image and video suffixes served directly from storage.
pub const DEFAULT_EMBEDDABLE_EXTENSIONS: &[&str] = &[
    ".avif", ".jpg", ".jpeg", ".png", ".svg", ".gif", ".mp4", ".ico",
];

/// Outcome of the access decision for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Request shape lacks an org or site
    NotFound,
    /// Auth cookie mint endpoint
    Cookie,
    /// Serve straight from object storage
    Storage,
    /// Proxy to the admin source service
    Admin,
}

impl Route {
    pub fn label(&self) -> &'static str {
        match self {
            Route::NotFound => "not_found",
            Route::Cookie => "cookie",
            Route::Storage => "storage",
            Route::Admin => "admin",
        }
    }
}

/// Per-request inputs to the decision.
#[derive(Debug, Clone, Copy)]
pub struct AccessRequest<'a> {
    /// Raw URL path as received (not lowercased)
    pub path: &'a str,
    /// Value of the client IP header, if present
    pub caller_ip: Option<&'a str>,
}

impl<'a> AccessRequest<'a> {
    pub fn new(path: &'a str, caller_ip: Option<&'a str>) -> Self {
        Self { path, caller_ip }
    }

    /// First path segment, empty when missing.
    pub fn org(&self) -> &'a str {
        self.path.split('/').nth(1).unwrap_or_default()
    }

    /// Second path segment, empty when missing.
    pub fn site(&self) -> &'a str {
        self.path.split('/').nth(2).unwrap_or_default()
    }

    fn last_segment(&self) -> &'a str {
        self.path.rsplit('/').next().unwrap_or_default()
    }
}

/// Immutable routing policy built from configuration.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    storage_orgs: HashSet<String>,
    admin_optin_orgs: HashSet<String>,
    trusted_networks: Vec<IpNet>,
    embeddable_extensions: Vec<String>,
}

impl AccessPolicy {
    pub fn new(
        storage_orgs: impl IntoIterator<Item = String>,
        admin_optin_orgs: impl IntoIterator<Item = String>,
        trusted_networks: Vec<IpNet>,
        embeddable_extensions: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            storage_orgs: storage_orgs.into_iter().collect(),
            admin_optin_orgs: admin_optin_orgs.into_iter().collect(),
            trusted_networks,
            embeddable_extensions: embeddable_extensions.into_iter().collect(),
        }
    }

    /// Decide where a request goes.
    pub fn decide(&self, request: &AccessRequest<'_>) -> Route {
        let org = request.org();
        if org.is_empty() || request.site().is_empty() {
            return Route::NotFound;
        }

        if request.last_segment() == COOKIE_SENTINEL {
            return Route::Cookie;
        }

        if self.is_embeddable_asset(request.path) && !self.admin_optin_orgs.contains(org) {
            return Route::Storage;
        }

        if self.storage_orgs.contains(org) {
            if self.is_trusted_caller(request.caller_ip) {
                return Route::Storage;
            }
            debug!(org, caller_ip = ?request.caller_ip, "allow-listed org from untrusted caller");
        }

        Route::Admin
    }

    /// Whether the path names an image or video served from storage.
    /// Matches the raw path suffix, case-sensitively.
    pub fn is_embeddable_asset(&self, path: &str) -> bool {
        self.embeddable_extensions
            .iter()
            .any(|ext| path.ends_with(ext.as_str()))
    }

    /// Whether the client IP header value falls inside a trusted network.
    pub fn is_trusted_caller(&self, caller_ip: Option<&str>) -> bool {
        caller_ip
            .and_then(|value| value.trim().parse::<IpAddr>().ok())
            .is_some_and(|ip| self.trusted_networks.iter().any(|net| net.contains(&ip)))
    }
}
