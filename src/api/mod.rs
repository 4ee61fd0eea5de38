//! HTTP client for the analysis backend.
//!
//! One async method per endpoint. No retries: every failure is returned to the
//! caller as an [`ApiError`] and shown to the user.

pub mod types;

use gloo_net::http::{Request, Response};
use leptos::prelude::*;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use wasm_bindgen::JsValue;

use crate::config::{normalize_base_url, AppConfig};
use crate::error::ApiError;

pub use types::*;

/// Header carrying the user's OpenAI key on the start request.
pub const API_KEY_HEADER: &str = "X-OpenAI-API-Key";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Where the backend serves an uploaded file.
    pub fn image_url(&self, filename: &str) -> String {
        self.url(&format!("/uploads/{}", filename))
    }

    pub async fn list_sessions(&self) -> Result<Vec<Session>, ApiError> {
        debug!("Listing sessions");
        let resp = Request::get(&self.url("/api/sessions")).send().await?;
        decode(resp).await
    }

    pub async fn create_session(&self, request: &CreateSessionRequest) -> Result<Session, ApiError> {
        let resp = Request::post(&self.url("/api/sessions"))
            .json(request)
            .map_err(build_error)?
            .send()
            .await?;
        let session: Session = decode(resp).await?;
        info!("Created session {} ({})", session.id, session.title);
        Ok(session)
    }

    pub async fn get_session(&self, session_id: &str) -> Result<Session, ApiError> {
        debug!("Fetching session {}", session_id);
        let path = format!("/api/sessions/{}", path_segment(session_id));
        let resp = Request::get(&self.url(&path)).send().await?;
        decode(resp).await
    }

    pub async fn upload_image(
        &self,
        session_id: &str,
        slot: ImageSlot,
        file: &web_sys::File,
    ) -> Result<UploadResponse, ApiError> {
        let form = web_sys::FormData::new().map_err(js_error)?;
        form.append_with_blob_and_filename("file", file, &file.name())
            .map_err(js_error)?;

        info!("Uploading {} ({} bytes) as {}", file.name(), file.size(), slot.as_str());
        let resp = Request::post(&self.url("/api/upload"))
            .query([("session_id", session_id), ("image_type", slot.as_str())])
            .body(form)
            .map_err(build_error)?
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn start_analysis(
        &self,
        request: &StartAnalysisRequest,
        api_key: &str,
    ) -> Result<StartAnalysisResponse, ApiError> {
        info!(
            "Starting analysis for {} (performance data: {})",
            request.session_id,
            request.performance_data.is_some()
        );
        let resp = Request::post(&self.url("/api/analysis/start"))
            .header(API_KEY_HEADER, api_key)
            .json(request)
            .map_err(build_error)?
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn get_status(&self, session_id: &str) -> Result<AnalysisStatus, ApiError> {
        debug!("Polling analysis status for {}", session_id);
        let path = format!("/api/analysis/{}/status", path_segment(session_id));
        let resp = Request::get(&self.url(&path)).send().await?;
        decode(resp).await
    }

    pub async fn get_results(&self, session_id: &str) -> Result<ResultDocument, ApiError> {
        let path = format!("/api/analysis/{}/results", path_segment(session_id));
        let resp = Request::get(&self.url(&path)).send().await?;
        let raw: serde_json::Value = decode(resp).await?;
        ResultDocument::from_value(raw).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        let resp = Request::get(&self.url("/health")).send().await?;
        decode(resp).await
    }
}

/// Client for the currently configured backend.
pub fn use_api() -> ApiClient {
    let config = expect_context::<RwSignal<AppConfig>>();
    ApiClient::new(&config.get_untracked().api_base_url)
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let status = resp.status();
    let body = resp.text().await?;
    if !(200..300).contains(&status) {
        let err = ApiError::from_response(status, &body);
        warn!("Request to {} failed with {}: {}", resp.url(), status, err);
        return Err(err);
    }
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn path_segment(raw: &str) -> String {
    js_sys::encode_uri_component(raw).into()
}

fn build_error(err: gloo_net::Error) -> ApiError {
    ApiError::Request(err.to_string())
}

fn js_error(err: JsValue) -> ApiError {
    ApiError::Request(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client = ApiClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_image_url() {
        let client = ApiClient::new("https://api.example.com");
        assert_eq!(
            client.image_url("image_a_123.png"),
            "https://api.example.com/uploads/image_a_123.png"
        );
    }
}
