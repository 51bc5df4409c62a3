//! Authenticated single-object PUT against S3-compatible storage.
//!
//! Implements the `ObjectStore` port on top of the from-scratch signer in
//! [`crate::sigv4`]. Only PUT is supported; this is deliberately not a full
//! object-storage client.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, info};

use domains::{AppError, ObjectStore, Result, StoredObject};

use crate::sigv4::{self, Credentials, SigningRequest};

/// Long-term storage credentials and bucket location. Fields may be empty
/// at boot; `put` fail-fasts per request instead.
#[derive(Clone)]
pub struct S3Config {
    pub access_key_id: String,
    pub secret_access_key: SecretString,
    pub region: String,
    pub bucket: String,
}

impl S3Config {
    fn ensure_configured(&self) -> Result<()> {
        if self.access_key_id.is_empty()
            || self.secret_access_key.expose_secret().is_empty()
            || self.bucket.is_empty()
        {
            return Err(AppError::NotConfigured(
                "object storage credentials (access key id, secret access key, bucket)".into(),
            ));
        }
        Ok(())
    }

    fn host(&self) -> String {
        format!("{}.s3.{}.amazonaws.com", self.bucket, self.region)
    }
}

pub struct S3ObjectStore {
    http: reqwest::Client,
    config: S3Config,
}

impl S3ObjectStore {
    pub fn new(http: reqwest::Client, config: S3Config) -> Self {
        Self { http, config }
    }
}

/// `<millisecond-timestamp>-<sanitized-filename>`. The timestamp keeps
/// concurrent uploads of same-named files from colliding; a same-millisecond
/// collision for an identical filename is accepted and not guarded.
fn object_key(filename: &str, timestamp_millis: i64) -> String {
    format!("{timestamp_millis}-{}", sanitize(filename))
}

/// Replaces any character outside `[A-Za-z0-9.-]` with `_`, keeping keys
/// URL-safe without percent-encoding.
fn sanitize(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, data: Bytes, filename: &str, content_type: &str) -> Result<StoredObject> {
        self.config.ensure_configured()?;

        let now = Utc::now();
        let key = object_key(filename, now.timestamp_millis());
        let host = self.config.host();
        let url = format!("https://{host}/{key}");
        debug!(%key, size = data.len(), "uploading object");

        let signed = sigv4::sign(
            &SigningRequest {
                method: "PUT",
                host: &host,
                path: &format!("/{key}"),
                content_type,
                payload: &data,
                timestamp: now,
            },
            &Credentials {
                access_key_id: &self.config.access_key_id,
                secret_access_key: self.config.secret_access_key.expose_secret(),
                region: &self.config.region,
            },
        );

        let response = self
            .http
            .put(&url)
            .header("content-type", content_type)
            .header("x-amz-date", &signed.amz_date)
            .header("x-amz-content-sha256", &signed.content_sha256)
            .header("authorization", &signed.authorization)
            .body(data)
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("S3 PUT failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%key, status = status.as_u16(), %body, "S3 rejected upload");
            return Err(AppError::UpstreamRejection {
                status: status.as_u16(),
                body,
            });
        }

        info!(%key, "object uploaded");
        Ok(StoredObject { key, url })
    }
}
