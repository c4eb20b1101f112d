//! User registration endpoint
//!
//! Inputs are validated before any write. A duplicate phone comes back as a
//! structured `{success: false}` rather than an error, keeping the common
//! case non-fatal.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::Error;
use crate::server::state::AppState;
use crate::types::user::{RegisterRequest, RegisterResponse};
use crate::users::{validate_name, validate_phone};

/// POST /user - register a name and phone number
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Response {
    if let Err(err) = validate_name(&request.name).and_then(|_| validate_phone(&request.phone)) {
        let message = match err {
            Error::Validation(msg) => msg,
            other => other.to_string(),
        };
        return (
            StatusCode::BAD_REQUEST,
            Json(RegisterResponse::refused(message)),
        )
            .into_response();
    }

    let phone = request.phone.trim();

    match state.users().find_by_phone(phone).await {
        Ok(Some(_)) => {
            tracing::info!(phone, "Registration refused: phone number exists");
            Json(RegisterResponse::refused("Phone number exists")).into_response()
        }
        Ok(None) => match state.users().create(request.name.trim(), phone).await {
            Ok(record) => {
                tracing::info!(user_id = %record.id, "User registered");
                Json(RegisterResponse::saved(record)).into_response()
            }
            Err(e) => {
                tracing::error!(error = %e, "User insert failed");
                e.into_response()
            }
        },
        Err(e) => {
            tracing::error!(error = %e, "User lookup failed");
            e.into_response()
        }
    }
}
