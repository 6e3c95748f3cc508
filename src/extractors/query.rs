//! List filter from the query string.

use crate::error::AppError;
use crate::store::TodoFilter;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

/// `completed=true` selects completed records, any other value open ones.
/// When the key repeats, the last value wins.
#[derive(Clone, Debug, Default)]
pub struct ListFilter(pub TodoFilter);

#[async_trait]
impl<S> FromRequestParts<S> for ListFilter
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(ListFilter(filter_from_pairs(pairs)))
    }
}

fn filter_from_pairs(pairs: Vec<(String, String)>) -> TodoFilter {
    TodoFilter {
        completed: pairs
            .into_iter()
            .filter(|(k, _)| k == "completed")
            .last()
            .map(|(_, v)| v == "true"),
    }
}
