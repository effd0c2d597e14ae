//! S3 object storage using the AWS SDK
//!
//! Works against any S3-compatible endpoint (R2, MinIO, AWS). Each org's
//! content lives in its own `<org>-content` bucket; the gateway only reads.

use super::traits::{ObjectStore, StorageError, StoredObject};
use crate::config::StorageConfig;
use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::BehaviorVersion;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::Client;
use tracing::{debug, instrument};

/// S3 object storage backend
pub struct S3Backend {
    client: Client,
}

impl S3Backend {
    /// Build an S3 client from a StorageConfig.
    pub fn build_client(config: &StorageConfig) -> Result<Client, StorageError> {
        let (endpoint, region, force_path_style, access_key_id, secret_access_key) = match config {
            StorageConfig::S3 {
                endpoint,
                region,
                force_path_style,
                access_key_id,
                secret_access_key,
            } => (
                endpoint.clone(),
                region.clone(),
                *force_path_style,
                access_key_id.clone(),
                secret_access_key.clone(),
            ),
            _ => {
                return Err(StorageError::Other(
                    "S3Backend requires S3 configuration".to_string(),
                ))
            }
        };

        // Require explicit credentials; the default AWS credential chain is never consulted
        let credentials = match (access_key_id, secret_access_key) {
            (Some(ref key_id), Some(ref secret)) => {
                Credentials::new(key_id, secret, None, None, "edge_gateway-config")
            }
            _ => {
                return Err(StorageError::Other(
                    "S3 storage requires explicit credentials: set EDGE_S3_ACCESS_KEY_ID and EDGE_S3_SECRET_ACCESS_KEY".to_string(),
                ));
            }
        };

        let mut s3_config_builder = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(region))
            .credentials_provider(credentials)
            .force_path_style(force_path_style);

        if let Some(ref ep) = endpoint {
            s3_config_builder = s3_config_builder.endpoint_url(ep);
        }

        Ok(Client::from_conf(s3_config_builder.build()))
    }

    /// Create a new S3 backend from configuration
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let client = Self::build_client(config)?;
        debug!("S3Backend initialized");
        Ok(Self { client })
    }

    /// Map a GetObject failure. Missing keys (and bare 404s from providers
    /// that omit the error code) become `NotFound`.
    fn classify_get_error(bucket: &str, key: &str, e: &SdkError<GetObjectError>) -> StorageError {
        if let SdkError::ServiceError(service_error) = e {
            if matches!(service_error.err(), GetObjectError::NoSuchKey(_))
                || service_error.raw().status().as_u16() == 404
            {
                return StorageError::NotFound(format!("{}/{}", bucket, key));
            }
        }
        StorageError::S3(format!("get_object {}/{} failed: {}", bucket, key, e))
    }
}

#[async_trait]
impl ObjectStore for S3Backend {
    #[instrument(skip(self))]
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, StorageError> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Self::classify_get_error(bucket, key, &e))?;

        let content_type = response.content_type().map(str::to_string);
        let body = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::S3(format!("Failed to read response body: {}", e)))?
            .into_bytes();

        debug!("S3 GET {}/{} ({} bytes)", bucket, key, body.len());
        Ok(StoredObject { body, content_type })
    }
}
