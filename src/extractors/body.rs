//! Request body as a JSON object, from either a JSON or a URL-encoded payload.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde_json::{Map, Value};

/// Fields of a to-do payload, not yet validated. Rejections use the standard error envelope.
#[derive(Clone, Debug)]
pub struct TodoBody(pub Map<String, Value>);

#[async_trait]
impl<S> FromRequest<S> for TodoBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(fields) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            return Ok(TodoBody(form_to_object(fields)));
        }
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        match value {
            Value::Object(m) => Ok(TodoBody(m)),
            _ => Err(AppError::BadRequest("Request body must be an object.".into())),
        }
    }
}

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

/// Form values are all strings; `completed` is the only field that needs a typed value.
/// An empty `completed` is treated like an omitted checkbox.
fn form_to_object(fields: Vec<(String, String)>) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(k, v)| {
            let value = match (k.as_str(), v.as_str()) {
                ("completed", "true") => Value::Bool(true),
                ("completed", "false") => Value::Bool(false),
                ("completed", "") => Value::Null,
                _ => Value::String(v),
            };
            (k, value)
        })
        .collect()
}
