//! reqwest implementation of [`Backend`]

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sqlcoach_core::prelude::*;
use sqlcoach_core::{
    BusinessQuestion, ChatReply, ChatRequest, CheatSheetEntry, DetailedAnalytics, Difficulty,
    DynamicExample, DynamicExampleRequest, EvaluateAnswerRequest, Evaluation, HealthStatus,
    LearningModule, LearningPath, ModuleProgress, UserAnalytics,
};
use url::Url;

use crate::backend::Backend;
use crate::endpoints::{parse_base_url, Endpoint, Method};

/// Default API base
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest error body kept in an [`Error::Http`] message
const MAX_ERROR_BODY: usize = 200;

/// HTTP client for the learning backend
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Create a client for `base_url` with a per-request `timeout`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sqlcoach/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(&self, endpoint: &Endpoint) -> Result<RequestBuilder> {
        let url = endpoint.url(&self.base_url)?;
        Ok(match endpoint.method() {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        })
    }

    async fn send(&self, endpoint: &Endpoint, request: RequestBuilder) -> Result<Response> {
        debug!(op = endpoint.name(), path = %endpoint.path(), "backend request");

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::network(format!("{} timed out", endpoint.path()))
            } else if e.is_connect() {
                Error::network(format!("cannot reach backend at {}", self.base_url))
            } else {
                Error::network(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(Error::http(status.as_u16(), error_message(status, &body)))
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T> {
        let request = self.request(&endpoint)?;
        let response = self.send(&endpoint, request).await?;
        decode(&endpoint, response).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        body: &B,
    ) -> Result<T> {
        let request = self.request(&endpoint)?.json(body);
        let response = self.send(&endpoint, request).await?;
        decode(&endpoint, response).await
    }

    async fn get_list<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<Vec<T>> {
        let value: Value = self.get(endpoint.clone()).await?;
        Ok(lenient_list(&endpoint, value))
    }
}

async fn decode<T: DeserializeOwned>(endpoint: &Endpoint, response: Response) -> Result<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| Error::network(format!("{}: {e}", endpoint.path())))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| Error::decode(format!("{}: {e}", endpoint.path())))
}

/// Decode a list body; a non-array body becomes an empty list and
/// malformed elements are skipped.
pub(crate) fn lenient_list<T: DeserializeOwned>(endpoint: &Endpoint, value: Value) -> Vec<T> {
    let Value::Array(items) = value else {
        warn!(op = endpoint.name(), "expected a JSON array, treating as empty");
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!(op = endpoint.name(), "skipping malformed item: {e}");
                None
            }
        })
        .collect()
}

/// Human message for a failed response: the backend's `detail` field when
/// present, else the (truncated) body, else the status reason.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        if let Some(Value::String(detail)) = map.get("detail") {
            return detail.clone();
        }
    }

    let body = body.trim();
    if body.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string();
    }

    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((cut, _)) => format!("{}…", &body[..cut]),
        None => body.to_string(),
    }
}

impl Backend for HttpBackend {
    async fn cheat_sheet(&self) -> Result<Vec<CheatSheetEntry>> {
        self.get_list(Endpoint::CheatSheet).await
    }

    async fn cheat_sheet_by_category(&self, category: &str) -> Result<Vec<CheatSheetEntry>> {
        self.get_list(Endpoint::CheatSheetByCategory(category.to_string()))
            .await
    }

    async fn search_cheat_sheet(&self, term: &str) -> Result<Vec<CheatSheetEntry>> {
        self.get_list(Endpoint::SearchCheatSheet(term.to_string()))
            .await
    }

    async fn dynamic_example(&self, request: &DynamicExampleRequest) -> Result<DynamicExample> {
        self.post(Endpoint::DynamicExample, request).await
    }

    async fn modules(&self) -> Result<Vec<LearningModule>> {
        self.get_list(Endpoint::Modules).await
    }

    async fn module(&self, module_id: i64) -> Result<LearningModule> {
        self.get(Endpoint::Module(module_id)).await
    }

    async fn business_question(
        &self,
        module_id: i64,
        difficulty: Difficulty,
    ) -> Result<BusinessQuestion> {
        self.get(Endpoint::BusinessQuestion {
            module_id,
            difficulty,
        })
        .await
    }

    async fn evaluate_answer(&self, request: &EvaluateAnswerRequest) -> Result<Evaluation> {
        self.post(Endpoint::EvaluateAnswer, request).await
    }

    async fn progress(&self, user_id: &str) -> Result<Vec<ModuleProgress>> {
        self.get_list(Endpoint::Progress(user_id.to_string())).await
    }

    async fn analytics(&self, user_id: &str) -> Result<UserAnalytics> {
        self.get(Endpoint::Analytics(user_id.to_string())).await
    }

    async fn detailed_analytics(&self, user_id: &str) -> Result<DetailedAnalytics> {
        self.get(Endpoint::DetailedAnalytics(user_id.to_string()))
            .await
    }

    async fn learning_path(&self, user_id: &str) -> Result<LearningPath> {
        self.get(Endpoint::LearningPath(user_id.to_string())).await
    }

    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        self.post(Endpoint::ChatMessage, request).await
    }

    async fn clear_chat(&self) -> Result<()> {
        let _: Value = self.post(Endpoint::ChatClear, &Value::Object(Default::default())).await?;
        Ok(())
    }

    async fn health(&self) -> Result<HealthStatus> {
        self.get(Endpoint::Health).await
    }

    async fn chatbot_health(&self) -> Result<HealthStatus> {
        self.get(Endpoint::ChatHealth).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lenient_list_non_array_is_empty() {
        let entries: Vec<CheatSheetEntry> =
            lenient_list(&Endpoint::CheatSheet, json!({"error": "db down"}));
        assert!(entries.is_empty());
    }

    #[test]
    fn test_lenient_list_skips_malformed_items() {
        let modules: Vec<LearningModule> = lenient_list(
            &Endpoint::Modules,
            json!([
                {"id": 1, "name": "Basics"},
                {"name": "missing id"},
                {"id": 2, "name": "Joins", "order_index": 2}
            ]),
        );
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[1].name, "Joins");
    }

    #[test]
    fn test_error_message_prefers_detail() {
        let msg = error_message(
            StatusCode::NOT_FOUND,
            r#"{"detail": "Module not found"}"#,
        );
        assert_eq!(msg, "Module not found");
    }

    #[test]
    fn test_error_message_falls_back_to_reason() {
        let msg = error_message(StatusCode::INTERNAL_SERVER_ERROR, "  ");
        assert_eq!(msg, "Internal Server Error");
    }

    #[test]
    fn test_error_message_truncates_long_bodies() {
        let body = "x".repeat(500);
        let msg = error_message(StatusCode::BAD_GATEWAY, &body);
        assert_eq!(msg.chars().count(), MAX_ERROR_BODY + 1);
    }

    #[test]
    fn test_new_rejects_invalid_base() {
        assert!(HttpBackend::new("localhost:8000", DEFAULT_TIMEOUT).is_err());
        let backend = HttpBackend::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT).unwrap();
        assert_eq!(backend.base_url().as_str(), "http://localhost:8000/api");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        // Port 9 (discard) on localhost is closed on test machines
        let backend = HttpBackend::new("http://127.0.0.1:9/api", Duration::from_secs(2)).unwrap();
        let err = backend.modules().await.unwrap_err();
        assert!(matches!(err, Error::Network { .. }));
    }
}
