use axum::extract::{Json, Query, State};
use serde::Deserialize;

use crate::AppState;
use crate::data::models::ApiError;
use crate::data::repositories::JudgmentLogRepository;
use crate::features::feedback::{
    GroupBy, ModelStats, SignificanceConfig, SummaryEntry, compare_models, summarize,
    tally_by_model,
};
use crate::utils::with_conn;

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub group_by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AbTestQuery {
    pub baseline: Option<String>,
}

pub async fn feedback_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<Vec<SummaryEntry>>, ApiError> {
    let group_by = match query.group_by.as_deref() {
        Some(raw) => raw.parse()?,
        None => GroupBy::default(),
    };
    let logs = with_conn(&state.pool, |conn| {
        Ok(JudgmentLogRepository::with_feedback(conn)?)
    })
    .await?;
    Ok(Json(summarize(&logs, group_by)))
}

pub async fn ab_test_summary(
    State(state): State<AppState>,
    Query(query): Query<AbTestQuery>,
) -> Result<Json<Vec<ModelStats>>, ApiError> {
    let config = SignificanceConfig {
        baseline: query
            .baseline
            .filter(|b| !b.is_empty())
            .or_else(|| state.config.significance.baseline.clone()),
        ..state.config.significance.clone()
    };
    let logs = with_conn(&state.pool, |conn| {
        Ok(JudgmentLogRepository::with_feedback(conn)?)
    })
    .await?;

    let stats = compare_models(&tally_by_model(&logs), &config);
    Ok(Json(stats))
}
