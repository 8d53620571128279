use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::info;
use wikiracer_core::Racer;

use crate::models::{RaceQuery, RaceResponse};
use crate::state::AppState;

pub async fn health() -> &'static str {
    "OK :)"
}

pub async fn race(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RaceQuery>,
) -> Response {
    let (start_title, end_title) = match (params.starttitle, params.endtitle) {
        (Some(start), Some(end)) if !start.is_empty() && !end.is_empty() => (start, end),
        _ => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Must pass starttitle and endtitle arguments.",
            )
                .into_response();
        }
    };
    if start_title == end_title {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            "starttitle cannot equal endtitle",
        )
            .into_response();
    }

    let request_timer = Instant::now();
    let cache_key = (start_title.clone(), end_title.clone());
    let bypass_cache = params.nocache.as_deref() == Some("1");

    if !bypass_cache {
        if let Some(path) = state.path_cache.get(&cache_key).await {
            return Json(RaceResponse {
                path,
                message: None,
                time_taken: format!("{:?}", request_timer.elapsed()),
            })
            .into_response();
        }
    }

    let racer = Racer::new(
        start_title,
        end_title,
        state.config.time_limit,
        state.config.racer.clone(),
    );
    match racer.run().await {
        Ok(Some(path)) => {
            info!(
                "race finished in {:?} with a path of {} titles",
                request_timer.elapsed(),
                path.len()
            );
            state.path_cache.insert(cache_key, path.clone()).await;
            Json(RaceResponse {
                path,
                message: None,
                time_taken: format!("{:?}", request_timer.elapsed()),
            })
            .into_response()
        }
        Ok(None) => Json(RaceResponse {
            path: Vec::new(),
            message: Some(format!(
                "no path found within {:?}",
                state.config.time_limit
            )),
            time_taken: format!("{:?}", state.config.time_limit),
        })
        .into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("An unexpected error has occurred:\n{err}"),
        )
            .into_response(),
    }
}
