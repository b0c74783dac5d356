use axum::extract::{Json, Path, State};
use validator::Validate;

use crate::AppState;
use crate::data::models::{ApiError, Card, CreateCardRequest, ReviewRequest};
use crate::data::repositories::CardRepository;
use crate::features::srs::Quality;
use crate::utils::{ApiJson, with_conn};

pub async fn create_card(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateCardRequest>,
) -> Result<Json<Card>, ApiError> {
    payload.validate()?;
    let now = state.clock.now();
    let card = with_conn(&state.pool, move |conn| {
        CardRepository::create(conn, &payload, now)
    })
    .await?;
    Ok(Json(card))
}

pub async fn get_card(
    State(state): State<AppState>,
    Path(card_id): Path<i32>,
) -> Result<Json<Card>, ApiError> {
    let card = with_conn(&state.pool, move |conn| CardRepository::get(conn, card_id)).await?;
    Ok(Json(card))
}

pub async fn review_card(
    State(state): State<AppState>,
    Path(card_id): Path<i32>,
    ApiJson(payload): ApiJson<ReviewRequest>,
) -> Result<Json<Card>, ApiError> {
    let quality = Quality::try_from(payload.quality)?;
    let now = state.clock.now();
    let card = with_conn(&state.pool, move |conn| {
        CardRepository::review(conn, card_id, quality, now)
    })
    .await?;
    Ok(Json(card))
}
