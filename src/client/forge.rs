//! ForgeML API client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client as HttpClient, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::api::{DatasetApi, ProjectApi, TrainingApi};
use super::models::{
    CreateProjectRequest, DatasetAnalysis, DatasetUpload, ProjectListItem, ProjectResponse,
    StartTrainingResponse, TrainingConfigOptions, TrainingLogs, TrainingRequest,
    TrainingResponse, TrainingSummary, UploadResponse,
};
use crate::error::{ApiError, Result};

/// Timeout for JSON endpoints
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Uploads and downloads move whole files
const TRANSFER_TIMEOUT: Duration = Duration::from_secs(300);

/// Retry-After fallback when a 429 carries no usable header
const DEFAULT_RETRY_AFTER: u64 = 60;

/// How to describe a failed response whose body has no structured detail
#[derive(Debug, Clone, Copy)]
enum ErrorFallback {
    /// "Request failed with status 500"
    StatusCode,
    /// "Internal Server Error"
    StatusText,
}

/// ForgeML API client
pub struct ForgeClient {
    http: HttpClient,
    base_url: String,
    api_token: Option<String>,
}

impl ForgeClient {
    /// Create a new client for the API rooted at `base_url`
    pub fn new(base_url: &str, api_token: Option<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("forgeml/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        })
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.http.request(method, &url);
        match self.api_token {
            Some(ref token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and decode a JSON body
    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await.map_err(ApiError::from)?;

        if !response.status().is_success() {
            return Err(error_from_response(response, ErrorFallback::StatusCode)
                .await
                .into());
        }

        let data = response.json::<T>().await.map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;
        Ok(data)
    }

    /// Send a request and return the raw body
    async fn send_bytes(&self, builder: RequestBuilder) -> Result<Vec<u8>> {
        let response = builder
            .timeout(TRANSFER_TIMEOUT)
            .send()
            .await
            .map_err(ApiError::from)?;

        if !response.status().is_success() {
            return Err(error_from_response(response, ErrorFallback::StatusText)
                .await
                .into());
        }

        let bytes = response.bytes().await.map_err(ApiError::from)?;
        Ok(bytes.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send_json(self.request(reqwest::Method::GET, path))
            .await
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send_json(self.request(reqwest::Method::POST, path).json(body))
            .await
    }
}

/// Map a non-success response to an `ApiError`.
///
/// The message is the server's structured detail when the body has one,
/// otherwise a message derived from the status.
async fn error_from_response(response: Response, fallback: ErrorFallback) -> ApiError {
    let status = response.status();
    let retry_after = response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER);

    let body = response.text().await.unwrap_or_default();
    let message = extract_detail(&body).unwrap_or_else(|| match fallback {
        ErrorFallback::StatusCode => format!("Request failed with status {}", status.as_u16()),
        ErrorFallback::StatusText => status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.as_u16().to_string()),
    });

    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::FORBIDDEN => ApiError::Forbidden,
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimit(Duration::from_secs(retry_after)),
        status if status.is_server_error() => ApiError::ServerError(message),
        status => ApiError::Remote {
            status: status.as_u16(),
            message,
        },
    }
}

/// Pull a human-readable message out of an error body.
///
/// Understands `{"detail": "..."}`, validation-style
/// `{"detail": [{"msg": "..."}, ...]}`, and top-level `message`/`error`.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    let text = match value.get("detail") {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(serde_json::Value::Array(items)) => {
            let parts: Vec<String> = items
                .iter()
                .map(|item| match item.get("msg").and_then(|m| m.as_str()) {
                    Some(msg) => msg.to_string(),
                    None => item.to_string(),
                })
                .collect();
            Some(parts.join("; "))
        }
        Some(serde_json::Value::Object(obj)) => obj
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string),
        _ => None,
    }
    .or_else(|| {
        ["message", "error"]
            .iter()
            .find_map(|field| value.get(*field).and_then(|v| v.as_str()))
            .map(str::to_string)
    })?;

    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[async_trait]
impl ProjectApi for ForgeClient {
    async fn create_project(&self, name: &str, prompt: &str) -> Result<ProjectResponse> {
        let body = CreateProjectRequest {
            name: name.to_string(),
            prompt: prompt.to_string(),
        };
        self.post_json("/projects", &body).await
    }

    async fn get_project_status(&self, project_id: &str) -> Result<ProjectResponse> {
        self.get_json(&format!("/projects/{}/status", project_id))
            .await
    }

    async fn list_projects(&self, limit: usize, offset: usize) -> Result<Vec<ProjectListItem>> {
        let builder = self
            .request(reqwest::Method::GET, "/projects")
            .query(&[("limit", limit), ("offset", offset)]);
        self.send_json(builder).await
    }

    async fn delete_project(&self, project_id: &str) -> Result<ProjectResponse> {
        let path = format!("/projects/{}", project_id);
        self.send_json(self.request(reqwest::Method::DELETE, &path))
            .await
    }

    async fn download_project_code(&self, project_id: &str) -> Result<Vec<u8>> {
        let path = format!("/projects/{}/code", project_id);
        self.send_bytes(self.request(reqwest::Method::GET, &path))
            .await
    }
}

#[async_trait]
impl DatasetApi for ForgeClient {
    async fn upload_dataset(
        &self,
        project_id: &str,
        upload: DatasetUpload,
    ) -> Result<UploadResponse> {
        let part = Part::bytes(upload.content).file_name(upload.file_name);
        let mut form = Form::new()
            .part("file", part)
            .text("dataset_type", upload.dataset_type);
        if let Some(prompt) = upload.visualization_prompt {
            form = form.text("visualization_prompt", prompt);
        }

        let path = format!("/projects/{}/dataset", project_id);
        let builder = self
            .request(reqwest::Method::POST, &path)
            .multipart(form)
            .timeout(TRANSFER_TIMEOUT);
        self.send_json(builder).await
    }

    async fn get_dataset_analysis(&self, project_id: &str) -> Result<DatasetAnalysis> {
        self.get_json(&format!("/projects/{}/dataset/analysis", project_id))
            .await
    }
}

#[async_trait]
impl TrainingApi for ForgeClient {
    async fn start_training(&self, request: TrainingRequest) -> Result<StartTrainingResponse> {
        request.validate()?;
        let path = format!("/projects/{}/training", request.project_id);
        self.post_json(&path, &request).await
    }

    async fn get_training_status(
        &self,
        project_id: &str,
        training_id: &str,
    ) -> Result<TrainingResponse> {
        self.get_json(&format!("/projects/{}/training/{}", project_id, training_id))
            .await
    }

    async fn get_training_logs(
        &self,
        project_id: &str,
        training_id: &str,
        last_n: usize,
    ) -> Result<TrainingLogs> {
        let path = format!("/projects/{}/training/{}/logs", project_id, training_id);
        let builder = self
            .request(reqwest::Method::GET, &path)
            .query(&[("last_n", last_n)]);
        self.send_json(builder).await
    }

    async fn get_training_summary(
        &self,
        project_id: &str,
        training_id: &str,
    ) -> Result<TrainingSummary> {
        self.get_json(&format!(
            "/projects/{}/training/{}/summary",
            project_id, training_id
        ))
        .await
    }

    async fn download_model_weights(
        &self,
        project_id: &str,
        training_id: &str,
    ) -> Result<Vec<u8>> {
        let path = format!("/projects/{}/training/{}/model", project_id, training_id);
        self.send_bytes(self.request(reqwest::Method::GET, &path))
            .await
    }

    async fn get_training_config_options(&self) -> Result<TrainingConfigOptions> {
        self.get_json("/training/config-options").await
    }
}
