//! Configuration for the edge gateway

use axum::http::HeaderName;
use ipnet::IpNet;
use serde::{Deserialize, Deserializer, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::access::{AccessPolicy, DEFAULT_EMBEDDABLE_EXTENSIONS};
use crate::auth::OriginPolicy;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address to listen on
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// Name of the shared content bucket. Informational only: it is carried
    /// on the request context, but storage reads always go to the
    /// `<org>-content` bucket.
    #[serde(default = "default_bucket_name")]
    pub bucket_name: String,

    /// Base URL of the admin source service (without the `/source` suffix)
    #[serde(default = "default_admin_url")]
    pub admin_url: String,

    /// Object storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Organizations allowed to read straight from storage when the caller
    /// comes from a trusted network.
    #[serde(default)]
    pub admin_excepted_orgs: Vec<String>,

    /// Organizations whose embeddable assets still go through the admin service.
    #[serde(default)]
    pub admin_optin_orgs: Vec<String>,

    /// Networks the trusted caller (the publish pipeline) connects from.
    /// Entries are CIDR ranges or bare addresses.
    #[serde(
        default = "default_trusted_networks",
        deserialize_with = "deserialize_networks"
    )]
    pub trusted_networks: Vec<IpNet>,

    /// Header carrying the connecting client's IP, as set by the CDN in front.
    #[serde(default = "default_client_ip_header")]
    pub client_ip_header: String,

    /// Path suffixes served from storage regardless of organization.
    #[serde(default = "default_embeddable_extensions")]
    pub embeddable_extensions: Vec<String>,

    /// Origins allowed to mint the auth cookie (exact match).
    #[serde(default = "default_trusted_origins")]
    pub trusted_origins: Vec<String>,

    /// Log level filter string. Overridden by RUST_LOG.
    /// Default: "edge_gateway=debug,tower_http=debug"
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Object storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Local directory laid out as `{path}/{bucket}/{key}`, for development
    Filesystem {
        /// Root directory holding one subdirectory per bucket
        path: PathBuf,
    },

    /// S3-compatible object storage (R2, MinIO, AWS)
    S3 {
        /// Endpoint URL. Uses the AWS default endpoint when unset.
        #[serde(default)]
        endpoint: Option<String>,

        /// Region; R2 expects "auto"
        #[serde(default = "default_region")]
        region: String,

        /// Use path-style URLs (required for MinIO, LocalStack)
        #[serde(default = "default_force_path_style")]
        force_path_style: bool,

        #[serde(default)]
        access_key_id: Option<String>,

        #[serde(default)]
        secret_access_key: Option<String>,
    },
}

// Default value functions for serde
fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8787))
}

fn default_bucket_name() -> String {
    "aem-content".to_string()
}

fn default_admin_url() -> String {
    "https://admin.da.live".to_string()
}

fn default_trusted_networks() -> Vec<IpNet> {
    // Egress address of the admin service's publish pipeline.
    vec!["3.227.118.73/32".parse().unwrap()]
}

fn default_client_ip_header() -> String {
    "cf-connecting-ip".to_string()
}

fn default_embeddable_extensions() -> Vec<String> {
    DEFAULT_EMBEDDABLE_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_trusted_origins() -> Vec<String> {
    vec![
        "https://da.live".to_string(),
        "http://localhost:3000".to_string(),
    ]
}

fn default_region() -> String {
    "auto".to_string()
}

fn default_force_path_style() -> bool {
    true
}

fn default_log_level() -> String {
    "edge_gateway=debug,tower_http=debug".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Filesystem {
            path: PathBuf::from("./data"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            bucket_name: default_bucket_name(),
            admin_url: default_admin_url(),
            storage: StorageConfig::default(),
            admin_excepted_orgs: Vec::new(),
            admin_optin_orgs: Vec::new(),
            trusted_networks: default_trusted_networks(),
            client_ip_header: default_client_ip_header(),
            embeddable_extensions: default_embeddable_extensions(),
            trusted_origins: default_trusted_origins(),
            log_level: default_log_level(),
        }
    }
}

/// Split a comma-separated env value, dropping blanks.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a trusted network entry. A bare address is treated as a single host.
pub fn parse_network(value: &str) -> Result<IpNet, ConfigError> {
    let value = value.trim();
    if let Ok(net) = value.parse::<IpNet>() {
        return Ok(net);
    }
    let invalid = || ConfigError::Invalid(format!("invalid trusted network: {}", value));
    let addr = value.parse::<IpAddr>().map_err(|_| invalid())?;
    let host_prefix = if addr.is_ipv4() { 32 } else { 128 };
    IpNet::new(addr, host_prefix).map_err(|_| invalid())
}

fn deserialize_networks<'de, D>(deserializer: D) -> Result<Vec<IpNet>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<String>::deserialize(deserializer)?
        .iter()
        .map(|entry| parse_network(entry).map_err(<D::Error as serde::de::Error>::custom))
        .collect()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("EDGE_LISTEN_ADDR") {
            config.listen_addr = addr
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("invalid listen address: {}", addr)))?;
        }

        if let Ok(bucket) = std::env::var("EDGE_BUCKET_NAME") {
            config.bucket_name = bucket;
        }

        if let Ok(url) = std::env::var("EDGE_ADMIN_URL") {
            config.admin_url = url;
        }

        // Check for S3 storage configuration
        if std::env::var("EDGE_S3_ENDPOINT").is_ok() || std::env::var("EDGE_S3_REGION").is_ok() {
            config.storage = StorageConfig::S3 {
                endpoint: std::env::var("EDGE_S3_ENDPOINT").ok(),
                region: std::env::var("EDGE_S3_REGION").unwrap_or_else(|_| default_region()),
                force_path_style: std::env::var("EDGE_S3_PATH_STYLE")
                    .map(|v| v == "true" || v == "1")
                    .unwrap_or(true),
                access_key_id: std::env::var("EDGE_S3_ACCESS_KEY_ID").ok(),
                secret_access_key: std::env::var("EDGE_S3_SECRET_ACCESS_KEY").ok(),
            };
        } else if let Ok(dir) = std::env::var("EDGE_DATA_DIR") {
            config.storage = StorageConfig::Filesystem {
                path: PathBuf::from(dir),
            };
        }

        if let Ok(orgs) = std::env::var("EDGE_ADMIN_EXCEPTED_ORGS") {
            config.admin_excepted_orgs = split_list(&orgs);
        }

        if let Ok(orgs) = std::env::var("EDGE_ADMIN_OPTIN_ORGS") {
            config.admin_optin_orgs = split_list(&orgs);
        }

        if let Ok(networks) = std::env::var("EDGE_TRUSTED_NETWORKS") {
            config.trusted_networks = split_list(&networks)
                .iter()
                .map(|n| parse_network(n))
                .collect::<Result<_, _>>()?;
        }

        if let Ok(header) = std::env::var("EDGE_CLIENT_IP_HEADER") {
            config.client_ip_header = header;
        }

        if let Ok(exts) = std::env::var("EDGE_EMBEDDABLE_EXTENSIONS") {
            config.embeddable_extensions = split_list(&exts);
        }

        if let Ok(origins) = std::env::var("EDGE_TRUSTED_ORIGINS") {
            config.trusted_origins = split_list(&origins);
        }

        if let Ok(level) = std::env::var("EDGE_LOG_LEVEL") {
            config.log_level = level;
        }

        Ok(config)
    }

    /// Load configuration from file if it exists, otherwise from environment
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var("EDGE_CONFIG") {
            return Self::from_file(&path);
        }

        for path in &["edge_gateway.toml", "/etc/edge_gateway/config.toml"] {
            if std::path::Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        Self::from_env()
    }

    /// Reject values that would only fail once requests start flowing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.client_ip_header_name()?;

        if !(self.admin_url.starts_with("https://") || self.admin_url.starts_with("http://")) {
            return Err(ConfigError::Invalid(format!(
                "admin_url must be an http(s) URL: {}",
                self.admin_url
            )));
        }

        if let StorageConfig::S3 {
            access_key_id,
            secret_access_key,
            ..
        } = &self.storage
        {
            if access_key_id.is_none() || secret_access_key.is_none() {
                return Err(ConfigError::Invalid(
                    "S3 storage requires both access_key_id and secret_access_key".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// The client IP header as a typed header name.
    pub fn client_ip_header_name(&self) -> Result<HeaderName, ConfigError> {
        HeaderName::from_bytes(self.client_ip_header.to_ascii_lowercase().as_bytes()).map_err(
            |_| ConfigError::Invalid(format!("invalid client_ip_header: {}", self.client_ip_header)),
        )
    }

    /// Routing policy derived from this configuration.
    pub fn access_policy(&self) -> AccessPolicy {
        AccessPolicy::new(
            self.admin_excepted_orgs.iter().cloned(),
            self.admin_optin_orgs.iter().cloned(),
            self.trusted_networks.clone(),
            self.embeddable_extensions.iter().cloned(),
        )
    }

    /// Cookie-mint origin policy derived from this configuration.
    pub fn origin_policy(&self) -> OriginPolicy {
        OriginPolicy::new(self.trusted_origins.iter().cloned())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
