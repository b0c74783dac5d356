use axum::extract::{Json, Query, State};
use validator::Validate;

use crate::AppState;
use crate::data::models::{
    ApiError, Decision, Feedback, FeedbackRequest, FeedbackUpdate, JudgmentLog,
    JudgmentResponse, LogQuery, RecordJudgmentRequest,
};
use crate::data::repositories::JudgmentLogRepository;
use crate::utils::dates::resolve_log_filter;
use crate::utils::{ApiJson, with_conn};

pub async fn record_judgment(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RecordJudgmentRequest>,
) -> Result<Json<JudgmentResponse>, ApiError> {
    payload.validate()?;
    let decision: Decision = payload.decision.parse()?;
    let now = state.clock.now();

    let (log, card) = with_conn(&state.pool, move |conn| {
        JudgmentLogRepository::record(conn, &payload, decision, now)
    })
    .await?;

    Ok(Json(JudgmentResponse {
        log_id: log.log_id,
        decision,
        reason: log.reason,
        card_id: card.map(|c| c.card_id),
    }))
}

pub async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<LogQuery>,
) -> Result<Json<Vec<JudgmentLog>>, ApiError> {
    let filter = resolve_log_filter(query, state.clock.today())?;
    let logs = with_conn(&state.pool, move |conn| {
        Ok(JudgmentLogRepository::list(conn, &filter)?)
    })
    .await?;
    Ok(Json(logs))
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<FeedbackRequest>,
) -> Result<Json<JudgmentLog>, ApiError> {
    payload.validate()?;
    let feedback: Feedback = payload.feedback.parse()?;
    if feedback == Feedback::Bad && payload.reason_code.is_none() {
        log::warn!("BAD feedback on log {} without a reason code", payload.log_id);
    }

    let log_id = payload.log_id;
    let update = FeedbackUpdate {
        coach_id: payload.coach_id,
        feedback,
        reason_code: payload.reason_code.filter(|code| !code.trim().is_empty()),
        memo: payload.memo,
        feedback_at: state.clock.now(),
    };
    let log = with_conn(&state.pool, move |conn| {
        JudgmentLogRepository::record_feedback(conn, log_id, &update)
    })
    .await?;
    Ok(Json(log))
}
