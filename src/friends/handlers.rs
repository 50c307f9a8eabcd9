use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{FriendDto, FriendRequest, SearchQuery},
    search::NameFilter,
    services::FriendBook,
};
use crate::{
    auth::extractors::AuthUser,
    dto::{JsonBody, MessageResponse, QueryParams},
    error::AppResult,
    pagination::{Page, PageQuery},
    state::AppState,
};

pub fn friends_routes() -> Router<AppState> {
    Router::new()
        .route("/friends", get(list_friends).post(create_friend))
        .route("/friends/search", get(search_friends))
        .route(
            "/friends/:id",
            get(get_friend).put(update_friend).delete(delete_friend),
        )
}

#[instrument(skip(state, identity), fields(account_id = identity.account_id))]
pub async fn list_friends(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    QueryParams(q): QueryParams<PageQuery>,
) -> AppResult<Json<Page<FriendDto>>> {
    let req = q.resolve(&state.config.paging)?;
    let book = FriendBook::for_identity(state.friends.as_ref(), &identity);
    let page = book.list(req).await?;
    Ok(Json(page.map(FriendDto::from)))
}

#[instrument(skip(state, identity), fields(account_id = identity.account_id))]
pub async fn search_friends(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    QueryParams(q): QueryParams<SearchQuery>,
) -> AppResult<Json<Page<FriendDto>>> {
    let req = q.paging().resolve(&state.config.paging)?;
    let filter = NameFilter::parse(&q.search_term);
    let book = FriendBook::for_identity(state.friends.as_ref(), &identity);
    let page = book.search(&filter, req).await?;
    Ok(Json(page.map(FriendDto::from)))
}

#[instrument(skip(state, identity), fields(account_id = identity.account_id))]
pub async fn get_friend(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<FriendDto>> {
    let book = FriendBook::for_identity(state.friends.as_ref(), &identity);
    Ok(Json(book.get(id).await?.into()))
}

#[instrument(skip(state, identity, body), fields(account_id = identity.account_id))]
pub async fn create_friend(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    JsonBody(body): JsonBody<FriendRequest>,
) -> AppResult<Json<FriendDto>> {
    let data = body.into_data()?;
    let book = FriendBook::for_identity(state.friends.as_ref(), &identity);
    let friend = book.create(&data).await?;
    info!(friend_id = friend.id, "friend created");
    Ok(Json(friend.into()))
}

#[instrument(skip(state, identity, body), fields(account_id = identity.account_id))]
pub async fn update_friend(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<i64>,
    JsonBody(body): JsonBody<FriendRequest>,
) -> AppResult<Json<MessageResponse>> {
    let data = body.into_data()?;
    let book = FriendBook::for_identity(state.friends.as_ref(), &identity);
    book.update(id, &data).await?;
    Ok(Json(MessageResponse::new("Friend updated successfully")))
}

#[instrument(skip(state, identity), fields(account_id = identity.account_id))]
pub async fn delete_friend(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    let book = FriendBook::for_identity(state.friends.as_ref(), &identity);
    book.delete(id).await?;
    info!(friend_id = id, "friend deleted");
    Ok(Json(MessageResponse::new("Friend deleted successfully")))
}
