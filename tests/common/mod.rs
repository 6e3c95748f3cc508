#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use todo_api::{app, AppError, AppState, MemoryTodoStore, Todo, TodoFilter, TodoId, TodoStore};
use tower::ServiceExt;

pub fn memory_app() -> Router {
    app(AppState::new(Arc::new(MemoryTodoStore::new())))
}

pub fn app_with(store: Arc<dyn TodoStore>) -> Router {
    app(AppState::new(store))
}

/// Send a request; `body` is sent as JSON when present.
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");
    dispatch(app, request).await
}

pub async fn send_form(app: &Router, method: Method, uri: &str, form: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .expect("request");
    dispatch(app, request).await
}

pub async fn send_raw(app: &Router, method: Method, uri: &str, content_type: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body.to_string()))
        .expect("request");
    dispatch(app, request).await
}

async fn dispatch(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body bytes");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Create a record and return its id.
pub async fn create(app: &Router, body: Value) -> String {
    let (status, json) = send(app, Method::POST, "/api/todos", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", json);
    json["data"]["id"].as_str().expect("id").to_string()
}

/// Store that fails every call, as an unreachable database would.
pub struct FailingStore;

#[async_trait]
impl TodoStore for FailingStore {
    async fn list(&self, _filter: &TodoFilter) -> Result<Vec<Todo>, AppError> {
        Err(AppError::Db(sqlx::Error::PoolTimedOut))
    }
    async fn find(&self, _id: &TodoId) -> Result<Option<Todo>, AppError> {
        Err(AppError::Db(sqlx::Error::PoolTimedOut))
    }
    async fn insert(&self, _todo: &Todo) -> Result<(), AppError> {
        Err(AppError::Db(sqlx::Error::PoolTimedOut))
    }
    async fn replace(&self, _todo: &Todo) -> Result<Option<Todo>, AppError> {
        Err(AppError::Db(sqlx::Error::PoolTimedOut))
    }
    async fn delete(&self, _id: &TodoId) -> Result<Option<Todo>, AppError> {
        Err(AppError::Db(sqlx::Error::PoolTimedOut))
    }
}

/// Memory store that counts every call reaching it.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryTodoStore,
    pub calls: AtomicUsize,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl TodoStore for CountingStore {
    async fn list(&self, filter: &TodoFilter) -> Result<Vec<Todo>, AppError> {
        self.hit();
        self.inner.list(filter).await
    }
    async fn find(&self, id: &TodoId) -> Result<Option<Todo>, AppError> {
        self.hit();
        self.inner.find(id).await
    }
    async fn insert(&self, todo: &Todo) -> Result<(), AppError> {
        self.hit();
        self.inner.insert(todo).await
    }
    async fn replace(&self, todo: &Todo) -> Result<Option<Todo>, AppError> {
        self.hit();
        self.inner.replace(todo).await
    }
    async fn delete(&self, id: &TodoId) -> Result<Option<Todo>, AppError> {
        self.hit();
        self.inner.delete(id).await
    }
}
