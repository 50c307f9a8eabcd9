use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{ProfileDto, ProfileRequest},
    services,
};
use crate::{
    auth::extractors::AuthUser,
    dto::{JsonBody, MessageResponse},
    error::AppResult,
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_own_profile).post(save_profile))
        .route("/profile/:account_id", get(get_profile))
}

#[instrument(skip(state, identity), fields(account_id = identity.account_id))]
pub async fn get_own_profile(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> AppResult<Json<ProfileDto>> {
    let profile = services::load_own(state.profiles.as_ref(), &identity).await?;
    Ok(Json(profile.into()))
}

#[instrument(skip(state, identity), fields(caller = identity.account_id))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(account_id): Path<i64>,
) -> AppResult<Json<ProfileDto>> {
    let profile = services::load_for(state.profiles.as_ref(), &identity, account_id).await?;
    Ok(Json(profile.into()))
}

#[instrument(skip(state, identity, body), fields(account_id = identity.account_id))]
pub async fn save_profile(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    JsonBody(body): JsonBody<ProfileRequest>,
) -> AppResult<Json<MessageResponse>> {
    let data = body.into_data()?;
    services::save_own(
        state.accounts.as_ref(),
        state.profiles.as_ref(),
        &identity,
        &data,
    )
    .await?;
    info!("profile updated");
    Ok(Json(MessageResponse::new("Profile updated successfully")))
}
