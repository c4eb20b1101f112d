//! Chat endpoint: streamed, grounded answers
//!
//! This handler is the single recovery boundary for the pipeline. Any error
//! anywhere in rewrite, retrieval, or synthesis is logged here once and
//! collapsed into a generic 500; the caller never sees raw error text.
//! Because the provider stream is established before the response starts, a
//! failed request never begins a partial stream.

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use futures_util::StreamExt;
use serde_json::json;

use crate::server::state::AppState;
use crate::types::chat::ChatRequestBody;

/// POST /chat - answer the pending turn of a conversation
pub async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequestBody>) -> Response {
    match state.pipeline().handle(&request.messages).await {
        Ok(stream) => {
            let body = Body::from_stream(stream.map(|item| match item {
                Ok(fragment) => Ok(Bytes::from(fragment)),
                Err(e) => {
                    tracing::error!(error = %e, "Answer stream failed mid-flight");
                    Err(e)
                }
            }));

            (
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                body,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Chat request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response()
        }
    }
}
