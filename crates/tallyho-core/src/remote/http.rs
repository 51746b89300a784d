//! reqwest-backed client for the remote to-do REST API.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use super::TodoRemote;
use crate::auth::AuthToken;
use crate::config::RemoteConfig;
use crate::error::{SyncError, SyncResult};
use crate::models::{TodoId, TodoItem};

#[derive(Debug, Clone)]
pub struct HttpTodoRemote {
    config: RemoteConfig,
    client: Client,
}

impl HttpTodoRemote {
    pub fn new(config: RemoteConfig) -> SyncResult<Self> {
        let mut builder = Client::builder().timeout(config.timeout());
        if config.is_loopback() {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;
        Ok(Self { config, client })
    }

    fn authorized(request: RequestBuilder, token: &AuthToken) -> RequestBuilder {
        request
            .bearer_auth(token.expose())
            .header(ACCEPT, "application/json")
    }

    async fn send(&self, request: RequestBuilder) -> SyncResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(SyncError::from_status(status, parse_api_error(status, &body)))
    }
}

#[async_trait]
impl TodoRemote for HttpTodoRemote {
    async fn list(&self, token: &AuthToken) -> SyncResult<Vec<TodoItem>> {
        let url = self.config.collection_url();
        tracing::debug!("GET {}", url);
        let request = Self::authorized(self.client.get(url), token);
        let response = self.send(request).await?;
        Ok(response.json::<Vec<TodoItem>>().await?)
    }

    async fn create(&self, token: &AuthToken, text: &str) -> SyncResult<TodoItem> {
        let url = self.config.collection_url();
        tracing::debug!("POST {}", url);
        let payload = serde_json::json!({ "text": text });
        let request = Self::authorized(self.client.post(url).json(&payload), token);
        let response = self.send(request).await?;
        Ok(response.json::<TodoItem>().await?)
    }

    async fn update(
        &self,
        token: &AuthToken,
        id: TodoId,
        completed: bool,
    ) -> SyncResult<TodoItem> {
        let url = self.config.item_url(id);
        tracing::debug!("PATCH {} completed={}", url, completed);
        let payload = serde_json::json!({ "completed": completed });
        let request = Self::authorized(self.client.patch(url).json(&payload), token);
        let response = self.send(request).await?;
        Ok(response.json::<TodoItem>().await?)
    }

    async fn delete(&self, token: &AuthToken, id: TodoId) -> SyncResult<()> {
        let url = self.config.item_url(id);
        tracing::debug!("DELETE {}", url);
        let request = Self::authorized(self.client.delete(url), token);
        self.send(request).await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    message: Option<String>,
    error: Option<String>,
    detail: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorResponse>(body) {
        if let Some(message) = payload.message.or(payload.error).or(payload.detail) {
            return format!("{} ({})", compact_text(&message), status.as_u16());
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

/// Truncate text to at most 180 characters for error messages.
fn compact_text(value: &str) -> String {
    value.trim().chars().take(180).collect()
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use axum::http::header::AUTHORIZATION;
    use axum::http::HeaderMap;
    use axum::routing::{get, patch};
    use axum::{Json, Router};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    use super::*;

    type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

    #[derive(Clone)]
    struct FakeServer {
        items: Arc<Mutex<Vec<TodoItem>>>,
        next_id: Arc<AtomicI64>,
    }

    #[derive(Deserialize)]
    struct CreateBody {
        text: String,
    }

    #[derive(Deserialize)]
    struct UpdateBody {
        completed: bool,
    }

    fn authorize(headers: &HeaderMap) -> ApiResult<()> {
        match headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok()) {
            Some("Bearer good-token") => Ok(()),
            Some("Bearer revoked-token") => Err((
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "token revoked" })),
            )),
            Some("Bearer flaky-token") => Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "database unavailable" })),
            )),
            _ => Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "missing credential" })),
            )),
        }
    }

    fn not_found() -> (StatusCode, Json<Value>) {
        (StatusCode::NOT_FOUND, Json(json!({ "detail": "todo not found" })))
    }

    async fn list_todos(
        State(server): State<FakeServer>,
        headers: HeaderMap,
    ) -> ApiResult<Json<Vec<TodoItem>>> {
        authorize(&headers)?;
        Ok(Json(server.items.lock().unwrap().clone()))
    }

    async fn create_todo(
        State(server): State<FakeServer>,
        headers: HeaderMap,
        Json(body): Json<CreateBody>,
    ) -> ApiResult<(StatusCode, Json<TodoItem>)> {
        authorize(&headers)?;
        let item = TodoItem {
            id: TodoId::from_raw(server.next_id.fetch_add(1, Ordering::SeqCst)),
            text: body.text,
            completed: false,
        };
        server.items.lock().unwrap().push(item.clone());
        Ok((StatusCode::CREATED, Json(item)))
    }

    async fn update_todo(
        State(server): State<FakeServer>,
        headers: HeaderMap,
        Path(id): Path<i64>,
        Json(body): Json<UpdateBody>,
    ) -> ApiResult<Json<TodoItem>> {
        authorize(&headers)?;
        let mut items = server.items.lock().unwrap();
        let item = items
            .iter_mut()
            .find(|item| item.id.get() == id)
            .ok_or_else(not_found)?;
        item.completed = body.completed;
        Ok(Json(item.clone()))
    }

    async fn delete_todo(
        State(server): State<FakeServer>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> ApiResult<StatusCode> {
        authorize(&headers)?;
        let mut items = server.items.lock().unwrap();
        let before = items.len();
        items.retain(|item| item.id.get() != id);
        if items.len() == before {
            return Err(not_found());
        }
        Ok(StatusCode::NO_CONTENT)
    }

    async fn spawn_server(seed: Vec<TodoItem>) -> SocketAddr {
        let next_id = seed.iter().map(|item| item.id.get()).max().unwrap_or(0) + 1;
        let server = FakeServer {
            items: Arc::new(Mutex::new(seed)),
            next_id: Arc::new(AtomicI64::new(next_id)),
        };
        let app = Router::new()
            .route("/api/todos", get(list_todos).post(create_todo))
            .route("/api/todos/{id}", patch(update_todo).delete(delete_todo))
            .with_state(server);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn remote_for(addr: SocketAddr) -> HttpTodoRemote {
        HttpTodoRemote::new(RemoteConfig::new(format!("http://{addr}/api/")).unwrap()).unwrap()
    }

    fn item(id: i64, text: &str, completed: bool) -> TodoItem {
        TodoItem {
            id: TodoId::from_raw(id),
            text: text.to_string(),
            completed,
        }
    }

    fn token(raw: &str) -> AuthToken {
        AuthToken::new(raw).unwrap()
    }

    #[tokio::test]
    async fn crud_roundtrip_against_rest_api() {
        let addr = spawn_server(vec![item(1, "a", false)]).await;
        let remote = remote_for(addr);
        let good = token("good-token");

        assert_eq!(remote.list(&good).await.unwrap(), vec![item(1, "a", false)]);

        let created = remote.create(&good, "b").await.unwrap();
        assert_eq!(created, item(2, "b", false));

        let updated = remote
            .update(&good, TodoId::from_raw(1), true)
            .await
            .unwrap();
        assert_eq!(updated, item(1, "a", true));

        remote.delete(&good, TodoId::from_raw(2)).await.unwrap();
        assert_eq!(remote.list(&good).await.unwrap(), vec![item(1, "a", true)]);
    }

    #[tokio::test]
    async fn auth_statuses_become_unauthorized() {
        let addr = spawn_server(Vec::new()).await;
        let remote = remote_for(addr);

        let missing = remote.list(&token("unknown-token")).await.unwrap_err();
        assert!(matches!(
            missing,
            SyncError::Unauthorized {
                status: StatusCode::UNAUTHORIZED
            }
        ));

        let revoked = remote.create(&token("revoked-token"), "x").await.unwrap_err();
        assert!(matches!(
            revoked,
            SyncError::Unauthorized {
                status: StatusCode::FORBIDDEN
            }
        ));
    }

    #[tokio::test]
    async fn server_errors_carry_api_message() {
        let addr = spawn_server(Vec::new()).await;
        let remote = remote_for(addr);

        let error = remote.list(&token("flaky-token")).await.unwrap_err();
        match error {
            SyncError::Server { status, message } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(message, "database unavailable (500)");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let missing = remote
            .update(&token("good-token"), TodoId::from_raw(99), true)
            .await
            .unwrap_err();
        assert!(matches!(
            missing,
            SyncError::Server {
                status: StatusCode::NOT_FOUND,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let error = remote_for(addr)
            .list(&token("good-token"))
            .await
            .unwrap_err();
        assert!(matches!(error, SyncError::Network(_)));
    }

    #[test]
    fn parse_api_error_prefers_json_fields() {
        assert_eq!(
            parse_api_error(StatusCode::BAD_REQUEST, r#"{"error":"text required"}"#),
            "text required (400)"
        );
        assert_eq!(
            parse_api_error(StatusCode::BAD_GATEWAY, "  upstream down "),
            "upstream down (502)"
        );
        assert_eq!(parse_api_error(StatusCode::BAD_GATEWAY, ""), "HTTP 502");
    }
}
