use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use fragview_core::{Direction, FragviewError, SearchOptions};

use crate::WebState;
use crate::dto::{LoadQuery, SearchQuery};
use crate::error::{fragview_error_response, missing_param_response};

pub async fn search(State(state): State<WebState>, Query(query): Query<SearchQuery>) -> Response {
    let Some(q) = query.q.filter(|value| !value.is_empty()) else {
        return missing_param_response("search query", "search");
    };
    let options = match query.opts.as_deref() {
        None | Some("") => SearchOptions::default(),
        Some(raw) => match serde_json::from_str::<SearchOptions>(raw) {
            Ok(options) => options,
            Err(err) => return fragview_error_response(err.into(), "search"),
        },
    };

    tracing::debug!(query = %q, ?options, "executing search");
    match state.searcher.search(&q, &options) {
        Ok(fragments) => {
            tracing::debug!(fragments = fragments.len(), "search complete");
            (StatusCode::OK, Json(fragments)).into_response()
        }
        Err(err) => fragview_error_response(err, "search"),
    }
}

pub async fn load(State(state): State<WebState>, Query(query): Query<LoadQuery>) -> Response {
    let Some(kind) = query.k.filter(|value| !value.is_empty()) else {
        return missing_param_response("kind", "load");
    };
    let direction = match Direction::parse(&kind) {
        Ok(direction) => direction,
        Err(err) => return fragview_error_response(err, "load"),
    };
    let Some(raw_ix) = query.ix.filter(|value| !value.is_empty()) else {
        return missing_param_response("index", "load");
    };
    let anchor = match raw_ix.trim().parse::<usize>() {
        Ok(anchor) => anchor,
        Err(err) => {
            return fragview_error_response(
                FragviewError::Validation(format!("invalid load index: {err}")),
                "load",
            );
        }
    };
    // An absent or unparsable limit falls back to the configured context size.
    let limit = query
        .limit
        .as_deref()
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .unwrap_or(state.searcher.config().context_lines);

    tracing::debug!(%direction, anchor, limit, "loading context lines");
    let lines = match direction {
        Direction::Previous => state.searcher.previous_lines(anchor, limit),
        Direction::Next => state.searcher.next_lines(anchor, limit),
    };
    (StatusCode::OK, Json(lines)).into_response()
}
