//! Cloudinary-compatible hosted media backend.
//!
//! Uploads go to `{api_base}/{cloud_name}/auto/upload` so the host classifies
//! the file itself; deletes go to `{api_base}/{cloud_name}/{resource_type}/destroy`.
//! Every request is signed with SHA-256 over the sorted parameters plus the
//! API secret.

use crate::traits::{MediaBackend, StorageError, StorageResult};
use crate::MediaBackendKind;
use async_trait::async_trait;
use curio_core::models::{MediaReference, UploadFile, UploadResult};
use curio_core::CloudCredentials;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;

/// Derived renditions requested with every upload
pub const EAGER_TRANSFORMATIONS: &str = "c_limit,w_800,h_600|c_limit,w_400,h_300";

const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Deserialize)]
struct CloudUploadResponse {
    secure_url: String,
    public_id: String,
    resource_type: String,
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    bytes: Option<u64>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CloudDestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct CloudErrorBody {
    error: CloudErrorMessage,
}

#[derive(Debug, Deserialize)]
struct CloudErrorMessage {
    message: String,
}

/// Hosted media backend
pub struct CloudMediaBackend {
    http_client: reqwest::Client,
    credentials: CloudCredentials,
    api_base: String,
}

impl CloudMediaBackend {
    pub fn new(credentials: CloudCredentials, api_base: impl Into<String>) -> StorageResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                StorageError::ConfigError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            credentials,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, resource: &str, action: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.api_base, self.credentials.cloud_name, resource, action
        )
    }

    /// Sign `params` (excluding file, api_key and resource_type) with the API secret
    fn sign(&self, params: &[(&str, String)]) -> String {
        sign_params(params, &self.credentials.api_secret)
    }

    fn signed_form(&self, params: Vec<(&'static str, String)>) -> Form {
        let signature = self.sign(&params);
        params
            .into_iter()
            .fold(Form::new(), |form, (key, value)| form.text(key, value))
            .text("api_key", self.credentials.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256")
    }

    async fn error_text(response: reqwest::Response) -> String {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = serde_json::from_str::<CloudErrorBody>(&body)
            .map(|parsed| parsed.error.message)
            .unwrap_or(body);
        format!("{} - {}", status, message)
    }
}

/// `sha256(sorted "k=v" joined by '&' + secret)`, hex encoded
pub(crate) fn sign_params(params: &[(&str, String)], secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn timestamp() -> String {
    chrono::Utc::now().timestamp().to_string()
}

#[async_trait]
impl MediaBackend for CloudMediaBackend {
    async fn upload(&self, file: &UploadFile, folder: &str) -> StorageResult<UploadResult> {
        let folder = crate::keys::sanitize_folder(folder)?;
        let start = std::time::Instant::now();

        let mut params = vec![
            ("eager", EAGER_TRANSFORMATIONS.to_string()),
            ("eager_async", "true".to_string()),
            ("timestamp", timestamp()),
        ];
        if !folder.is_empty() {
            params.push(("folder", folder.clone()));
        }

        // The host classifies the file itself (`auto`), so no part MIME is sent.
        let part = Part::bytes(file.data.to_vec())
            .file_name(file.filename.clone().unwrap_or_else(|| "upload".to_string()));

        let form = self.signed_form(params).part("file", part);

        let response = self
            .http_client
            .post(self.endpoint("auto", "upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(format!("Failed to reach media host: {}", e)))?;

        if !response.status().is_success() {
            let error = Self::error_text(response).await;
            tracing::warn!(error = %error, "Media host rejected upload");
            return Err(StorageError::UploadFailed(format!(
                "Media host upload failed: {}",
                error
            )));
        }

        let body: CloudUploadResponse = response.json().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to parse media host response: {}", e))
        })?;

        tracing::info!(
            public_id = %body.public_id,
            resource_type = %body.resource_type,
            size_bytes = file.data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Cloud media upload successful"
        );

        Ok(UploadResult {
            url: body.secure_url,
            reference_id: body.public_id,
            resource_type: body.resource_type,
            format: body.format.unwrap_or_default(),
            bytes: body.bytes.unwrap_or(file.data.len() as u64),
            width: body.width,
            height: body.height,
        })
    }

    async fn delete(&self, reference: &MediaReference) -> StorageResult<bool> {
        let start = std::time::Instant::now();
        let params = vec![
            ("public_id", reference.reference_id.clone()),
            ("timestamp", timestamp()),
        ];

        let response = self
            .http_client
            .post(self.endpoint(reference.resource_type.as_str(), "destroy"))
            .multipart(self.signed_form(params))
            .send()
            .await
            .map_err(|e| StorageError::DeleteFailed(format!("Failed to reach media host: {}", e)))?;

        if !response.status().is_success() {
            let error = Self::error_text(response).await;
            return Err(StorageError::DeleteFailed(format!(
                "Media host delete failed: {}",
                error
            )));
        }

        let body: CloudDestroyResponse = response.json().await.map_err(|e| {
            StorageError::BackendError(format!("Failed to parse media host response: {}", e))
        })?;

        let deleted = body.result == "ok";
        tracing::info!(
            public_id = %reference.reference_id,
            result = %body.result,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Cloud media delete finished"
        );

        Ok(deleted)
    }

    fn backend_type(&self) -> MediaBackendKind {
        MediaBackendKind::Cloud
    }
}
