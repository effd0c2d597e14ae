//! Edge gateway for a content platform
//!
//! Routes `/<org>/<site>/<path>` requests either straight to object storage
//! or to the admin source service, and bridges bearer credentials between
//! browser cookies and the admin API.

pub mod access;
pub mod api;
pub mod auth;
pub mod canonical;
pub mod config;
pub mod context;
pub mod path_rules;
pub mod storage;
pub mod upstream;
