use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, instrument};

use crate::{
    auth::{
        dto::{LoginRequest, PublicUser, RegisterRequest},
        extractors::AuthUser,
        services,
    },
    dto::{JsonBody, MessageResponse},
    error::{AppError, AppResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> AppResult<Json<MessageResponse>> {
    services::register(state.accounts.as_ref(), &payload.email, &payload.password).await?;
    Ok(Json(MessageResponse::new(
        "User and profile registered successfully.",
    )))
}

/// Responds with the bare token string.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> AppResult<String> {
    services::login(
        state.accounts.as_ref(),
        &state.keys,
        &payload.email,
        &payload.password,
    )
    .await
}

#[instrument(skip(state, identity), fields(account_id = identity.account_id))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> AppResult<Json<PublicUser>> {
    let account = state
        .accounts
        .find_by_id(identity.account_id)
        .await?
        .ok_or_else(|| {
            error!("token subject has no account");
            AppError::Unauthorized("User not found".into())
        })?;

    Ok(Json(PublicUser {
        id: account.id,
        email: account.email,
    }))
}
