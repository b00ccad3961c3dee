use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tokio::time::Instant;
use tower_http::catch_panic::CatchPanicLayer;

use crate::feed::BestStoriesFeed;
use crate::models::FeedRequest;

#[derive(Clone)]
pub struct AppState {
    pub feed: Arc<BestStoriesFeed>,
    pub request_timeout: Duration,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/beststories/{count}", get(get_best_stories))
        .layer(CatchPanicLayer::new())
        .with_state(state)
}

/// GET /beststories/{count}
///
/// 200 with the ranked stories, 400 for a non-positive count, 404 when no
/// stories are available. A panic anywhere below becomes a 500 through the
/// catch-panic layer.
async fn get_best_stories(State(state): State<AppState>, Path(count): Path<i32>) -> Response {
    // One deadline for the whole request, established before delegating.
    let deadline = Instant::now() + state.request_timeout;

    if count <= 0 {
        return (StatusCode::BAD_REQUEST, Json(count)).into_response();
    }

    let stories = state
        .feed
        .handle(FeedRequest { story_count: count }, deadline)
        .await;

    if stories.is_empty() {
        StatusCode::NOT_FOUND.into_response()
    } else {
        (StatusCode::OK, Json(stories)).into_response()
    }
}
