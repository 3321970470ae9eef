//! Account registration endpoint.

use api_types::user::RegisterUser;
use axum::{Json, extract::State, http::StatusCode};

use crate::{ServerError, server::ServerState};

/// Creates a regular (non-admin) account. Admin accounts are provisioned
/// out of band.
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterUser>,
) -> Result<StatusCode, ServerError> {
    if payload.password != payload.confirm_password {
        return Err(ServerError::Generic("passwords do not match".to_string()));
    }

    state
        .engine
        .register_user(&payload.username, &payload.password)
        .await?;

    Ok(StatusCode::CREATED)
}
