//! Record id from the path, checked for shape before any handler runs.

use crate::error::AppError;
use crate::model::TodoId;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// A structurally valid id. Undecodable segments count as malformed ids.
#[derive(Clone, Debug)]
pub struct TodoPath(pub TodoId);

#[async_trait]
impl<S> FromRequestParts<S> for TodoPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::InvalidId(e.body_text()))?;
        TodoId::parse(&raw).map(TodoPath)
    }
}
