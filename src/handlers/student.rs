use axum::extract::{Json, Path, Query, State};
use diesel::Connection;
use validator::Validate;

use crate::AppState;
use crate::data::models::{
    ApiError, DailyDeck, Pagination, StudentCreate, StudentResponse, StudentUpdate,
};
use crate::data::repositories::{CardRepository, StudentRepository};
use crate::features::srs::build_deck;
use crate::utils::{ApiJson, with_conn};

pub async fn create_student(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<StudentCreate>,
) -> Result<Json<StudentResponse>, ApiError> {
    payload.validate()?;
    let default_budget = state.config.default_anki_budget;
    let now = state.clock.now();

    let student = with_conn(&state.pool, move |conn| {
        StudentRepository::create(conn, &payload, default_budget, now)
    })
    .await?;
    Ok(Json(student.into()))
}

pub async fn list_students(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<StudentResponse>>, ApiError> {
    if page.skip < 0 || page.limit < 0 {
        return Err(ApiError::InvalidInput(
            "skip and limit must not be negative".into(),
        ));
    }
    let students = with_conn(&state.pool, move |conn| {
        Ok(StudentRepository::list(conn, page.skip, page.limit)?)
    })
    .await?;
    Ok(Json(students.into_iter().map(Into::into).collect()))
}

pub async fn get_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<StudentResponse>, ApiError> {
    let student =
        with_conn(&state.pool, move |conn| StudentRepository::get(conn, &student_id)).await?;
    Ok(Json(student.into()))
}

pub async fn update_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    ApiJson(payload): ApiJson<StudentUpdate>,
) -> Result<Json<StudentResponse>, ApiError> {
    payload.validate()?;
    let student = with_conn(&state.pool, move |conn| {
        StudentRepository::update(conn, &student_id, &payload)
    })
    .await?;
    Ok(Json(student.into()))
}

/// Today's review deck. An unknown student is a 404 so the client can create
/// the student and retry.
pub async fn daily_review_deck(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<DailyDeck>, ApiError> {
    let today = state.clock.today();
    let deck = with_conn(&state.pool, move |conn| {
        // One read transaction so the student and the cards come from the
        // same snapshot.
        conn.transaction::<_, ApiError, _>(|conn| {
            let student = StudentRepository::get(conn, &student_id)?;
            let cards = CardRepository::due_cards(conn, &student.student_id, today)?;
            Ok(build_deck(&student, cards, today))
        })
    })
    .await?;

    log::info!(
        "Built deck for {}: {} of {} due cards",
        deck.student_id,
        deck.cards_in_deck,
        deck.total_due
    );
    Ok(Json(deck))
}
