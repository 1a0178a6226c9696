use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use super::service::LeaderboardService;
use crate::accounts::AuthSession;
use crate::brands::{BrandId, BrandRepository};
use crate::error::ApiError;
use crate::lists::{BrandListId, ListItemId, ListRepository, ListService, NewBrandList, NewListItem};
use crate::ratings::{resolve_voter, RatingRepository, RatingService, RatingSubmission};

/// Services behind the `/api/leaderboard` surface.
pub struct LeaderboardState<S> {
    pub board: Arc<LeaderboardService<S>>,
    pub ratings: Arc<RatingService<S>>,
    pub lists: Arc<ListService<S>>,
}

impl<S> Clone for LeaderboardState<S> {
    fn clone(&self) -> Self {
        Self {
            board: self.board.clone(),
            ratings: self.ratings.clone(),
            lists: self.lists.clone(),
        }
    }
}

impl<S> LeaderboardState<S>
where
    S: BrandRepository + RatingRepository + ListRepository + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            board: Arc::new(LeaderboardService::new(store.clone())),
            ratings: Arc::new(RatingService::new(store.clone())),
            lists: Arc::new(ListService::new(store)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LeaderboardQuery {
    #[serde(default)]
    view: Option<String>,
}

pub fn leaderboard_router<S>(state: LeaderboardState<S>) -> Router
where
    S: BrandRepository + RatingRepository + ListRepository + 'static,
{
    Router::new()
        .route("/api/leaderboard", get(leaderboard_handler::<S>))
        .route(
            "/api/leaderboard/brands/:brand_id/rate",
            post(rate_handler::<S>),
        )
        .route(
            "/api/leaderboard/brands/:brand_id/ratings",
            get(brand_ratings_handler::<S>),
        )
        .route(
            "/api/leaderboard/lists",
            get(lists_handler::<S>).post(create_list_handler::<S>),
        )
        .route(
            "/api/leaderboard/lists/:list_id/items",
            post(add_item_handler::<S>),
        )
        .route(
            "/api/leaderboard/lists/:list_id/items/:item_id/vote",
            post(vote_handler::<S>),
        )
        .with_state(state)
}

pub(crate) async fn leaderboard_handler<S>(
    State(state): State<LeaderboardState<S>>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Response, ApiError>
where
    S: BrandRepository + RatingRepository + ListRepository + 'static,
{
    match query.view.as_deref() {
        Some("display") => Ok(Json(state.board.display()?).into_response()),
        None | Some("rows") => Ok(Json(state.board.rows()?).into_response()),
        Some(other) => Err(ApiError::validation(format!(
            "unknown leaderboard view '{other}'"
        ))),
    }
}

pub(crate) async fn rate_handler<S>(
    State(state): State<LeaderboardState<S>>,
    Path(brand_id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError>
where
    S: BrandRepository + RatingRepository + ListRepository + 'static,
{
    let submission: RatingSubmission = serde_json::from_value(body)
        .map_err(|_| ApiError::validation("rating body must be a JSON object"))?;
    let voter = resolve_voter(&headers);
    let receipt = state.ratings.rate(BrandId(brand_id), &voter, &submission)?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

pub(crate) async fn brand_ratings_handler<S>(
    State(state): State<LeaderboardState<S>>,
    Path(brand_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError>
where
    S: BrandRepository + RatingRepository + ListRepository + 'static,
{
    Ok(Json(state.ratings.ratings_for(BrandId(brand_id))?))
}

pub(crate) async fn lists_handler<S>(
    State(state): State<LeaderboardState<S>>,
) -> Result<impl IntoResponse, ApiError>
where
    S: BrandRepository + RatingRepository + ListRepository + 'static,
{
    Ok(Json(state.lists.active_lists()?))
}

pub(crate) async fn create_list_handler<S>(
    State(state): State<LeaderboardState<S>>,
    session: AuthSession,
    Json(request): Json<NewBrandList>,
) -> Result<impl IntoResponse, ApiError>
where
    S: BrandRepository + RatingRepository + ListRepository + 'static,
{
    session.require_staff()?;
    let list = state.lists.create_list(request)?;
    Ok((StatusCode::CREATED, Json(list)))
}

pub(crate) async fn add_item_handler<S>(
    State(state): State<LeaderboardState<S>>,
    session: AuthSession,
    Path(list_id): Path<i64>,
    Json(request): Json<NewListItem>,
) -> Result<impl IntoResponse, ApiError>
where
    S: BrandRepository + RatingRepository + ListRepository + 'static,
{
    session.require_staff()?;
    let item = state.lists.add_item(BrandListId(list_id), request)?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub(crate) async fn vote_handler<S>(
    State(state): State<LeaderboardState<S>>,
    Path((list_id, item_id)): Path<(i64, i64)>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError>
where
    S: BrandRepository + RatingRepository + ListRepository + 'static,
{
    let direction = body.get("vote").and_then(Value::as_str).unwrap_or_default();
    let item = state
        .lists
        .vote(BrandListId(list_id), ListItemId(item_id), direction)?;
    Ok(Json(item))
}
