//! Liveness route.

use axum::{routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct RootBody {
    message: &'static str,
}

async fn root() -> Json<RootBody> {
    Json(RootBody {
        message: "TODO Backend Server is running!",
    })
}

/// GET / answers as soon as the listener is up.
pub fn common_routes() -> Router {
    Router::new().route("/", get(root))
}
