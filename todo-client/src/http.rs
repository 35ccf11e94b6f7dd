//! HTTP client for the todo REST API

use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{ClientConfig, ClientError, ClientResult};
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{
    BatchOrderEntry, BatchOrderRequest, BatchOrderResponse, Label, LabelInput, OrderUpdate, Todo,
    TodoCreate, TodoState, TodoUpdate,
};

/// HTTP client for making network requests to the todo server
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout_duration())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<T> {
        let mut request = self.client.request(method.clone(), self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(method = %method, path, "Sending request");
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send::<T, ()>(Method::GET, path, None).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send(Method::POST, path, Some(body)).await
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send(Method::PUT, path, Some(body)).await
    }

    /// Make a PATCH request, with or without body
    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<T> {
        self.send(Method::PATCH, path, body).await
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send::<T, ()>(Method::DELETE, path, None).await
    }

    /// Decode the body on success, or the error envelope otherwise
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            if let Ok(envelope) = serde_json::from_str::<ApiResponse<serde_json::Value>>(&text)
                && let Some(err) = envelope.to_error()
            {
                tracing::debug!(status = status.as_u16(), code = %err.code, "Server returned error");
                return Err(err.into());
            }

            return Err(match status {
                StatusCode::NOT_FOUND => ClientError::NotFound(text),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    ClientError::Validation(text)
                }
                s if s.is_server_error() => {
                    AppError::with_message(ErrorCode::InternalError, text).into()
                }
                _ => ClientError::InvalidResponse(format!("unexpected status {status}: {text}")),
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }

    // ========== Todo API ==========

    /// Active todos, optionally one partition only
    pub async fn list_todos(&self, state: Option<TodoState>) -> ClientResult<Vec<Todo>> {
        match state {
            Some(state) => self.get(&format!("/api/todos?state={state}")).await,
            None => self.get("/api/todos").await,
        }
    }

    pub async fn get_todo(&self, id: i64) -> ClientResult<Todo> {
        self.get(&format!("/api/todos/{id}")).await
    }

    pub async fn create_todo(&self, data: &TodoCreate) -> ClientResult<Todo> {
        self.post("/api/todos", data).await
    }

    pub async fn update_todo(&self, id: i64, data: &TodoUpdate) -> ClientResult<Todo> {
        self.put(&format!("/api/todos/{id}"), data).await
    }

    pub async fn set_todo_order(&self, id: i64, order: i64) -> ClientResult<Todo> {
        self.patch(&format!("/api/todos/{id}/order"), Some(&OrderUpdate { order }))
            .await
    }

    pub async fn batch_todo_order(
        &self,
        updates: &[BatchOrderEntry],
    ) -> ClientResult<BatchOrderResponse> {
        let body = BatchOrderRequest {
            updates: updates.to_vec(),
        };
        self.post("/api/todos/batch-order", &body).await
    }

    pub async fn toggle_todo(&self, id: i64) -> ClientResult<Todo> {
        self.patch::<_, ()>(&format!("/api/todos/{id}/toggle"), None)
            .await
    }

    pub async fn delete_todo(&self, id: i64) -> ClientResult<bool> {
        self.delete(&format!("/api/todos/{id}")).await
    }

    // ========== Label API ==========

    pub async fn list_labels(&self) -> ClientResult<Vec<Label>> {
        self.get("/api/labels").await
    }

    /// Find-or-create by name
    pub async fn create_label(&self, name: &str) -> ClientResult<Label> {
        self.post(
            "/api/labels",
            &LabelInput {
                name: name.to_string(),
            },
        )
        .await
    }

    pub async fn rename_label(&self, id: i64, name: &str) -> ClientResult<Label> {
        self.put(
            &format!("/api/labels/{id}"),
            &LabelInput {
                name: name.to_string(),
            },
        )
        .await
    }

    pub async fn delete_label(&self, id: i64) -> ClientResult<bool> {
        self.delete(&format!("/api/labels/{id}")).await
    }

    // ========== Health ==========

    pub async fn health(&self) -> ClientResult<serde_json::Value> {
        self.get("/health").await
    }
}
