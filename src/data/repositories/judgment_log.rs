use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sql_types::Integer;

use crate::data::models::{
    ApiError, Card, Decision, FeedbackUpdate, JudgmentLog, LogFilter, NewJudgmentLog,
    RecordJudgmentRequest,
};
use crate::data::repositories::CardRepository;
use crate::schema::llm_logs;
use crate::utils::dates::day_bounds;

pub struct JudgmentLogRepository;

impl JudgmentLogRepository {
    pub fn find(conn: &mut SqliteConnection, log_id: i32) -> QueryResult<Option<JudgmentLog>> {
        llm_logs::table
            .find(log_id)
            .select(JudgmentLog::as_select())
            .first(conn)
            .optional()
    }

    pub fn get(conn: &mut SqliteConnection, log_id: i32) -> Result<JudgmentLog, ApiError> {
        Self::find(conn, log_id)?.ok_or_else(|| ApiError::log_not_found(log_id))
    }

    /// Stores a judgment. An approved judgment about a known student also
    /// gets a review card, written in the same transaction.
    pub fn record(
        conn: &mut SqliteConnection,
        request: &RecordJudgmentRequest,
        decision: Decision,
        now: NaiveDateTime,
    ) -> Result<(JudgmentLog, Option<Card>), ApiError> {
        conn.immediate_transaction(|conn| {
            diesel::insert_into(llm_logs::table)
                .values(&NewJudgmentLog {
                    submission_id: request.submission_id,
                    student_id: request.student_id.as_deref(),
                    concept_name: request.concept_name.as_deref(),
                    decision: decision.as_str(),
                    reason: request.reason.as_deref(),
                    model_version: &request.model_version,
                    created_at: now,
                })
                .execute(conn)?;

            let log_id = diesel::select(diesel::dsl::sql::<Integer>("last_insert_rowid()"))
                .get_result::<i32>(conn)?;
            log::info!(
                "Recorded {} judgment {} from model {}",
                decision.as_str(),
                log_id,
                request.model_version
            );

            let card = match (decision, request.student_id.as_deref()) {
                (Decision::Approve, Some(student_id)) => {
                    let concept = request.concept_name.as_deref().unwrap_or("this concept");
                    let question = request
                        .question
                        .clone()
                        .unwrap_or_else(|| format!("Explain {}.", concept));
                    let answer = request
                        .answer
                        .clone()
                        .or_else(|| request.reason.clone())
                        .unwrap_or_default();
                    Some(CardRepository::insert(
                        conn,
                        student_id,
                        Some(log_id),
                        &question,
                        &answer,
                        now,
                    )?)
                }
                _ => None,
            };

            Ok((Self::get(conn, log_id)?, card))
        })
    }

    /// Logs created within the filter's dates, newest first.
    pub fn list(conn: &mut SqliteConnection, filter: &LogFilter) -> QueryResult<Vec<JudgmentLog>> {
        let (lower, upper) = day_bounds(filter.start_date, filter.end_date);
        let mut query = llm_logs::table
            .select(JudgmentLog::as_select())
            .filter(llm_logs::created_at.ge(lower))
            .filter(llm_logs::created_at.lt(upper))
            .into_boxed();
        if let Some(student_id) = &filter.student_id {
            query = query.filter(llm_logs::student_id.eq(student_id.clone()));
        }

        query
            .order((llm_logs::created_at.desc(), llm_logs::log_id.desc()))
            .offset(filter.skip)
            .limit(filter.limit)
            .load(conn)
    }

    /// Every log a coach has reviewed, oldest first.
    pub fn with_feedback(conn: &mut SqliteConnection) -> QueryResult<Vec<JudgmentLog>> {
        llm_logs::table
            .filter(llm_logs::coach_feedback.is_not_null())
            .order(llm_logs::log_id.asc())
            .select(JudgmentLog::as_select())
            .load(conn)
    }

    /// Overwrites the feedback fields of one log. Runs under the write lock so
    /// concurrent reviews of the same log apply one after the other and the
    /// last one wins.
    pub fn record_feedback(
        conn: &mut SqliteConnection,
        log_id: i32,
        update: &FeedbackUpdate,
    ) -> Result<JudgmentLog, ApiError> {
        conn.immediate_transaction(|conn| {
            Self::get(conn, log_id)?;

            diesel::update(llm_logs::table.find(log_id))
                .set((
                    llm_logs::coach_id.eq(Some(update.coach_id.as_str())),
                    llm_logs::coach_feedback.eq(Some(update.feedback.as_str())),
                    llm_logs::reason_code.eq(update.reason_code.as_deref()),
                    llm_logs::memo.eq(update.memo.as_deref()),
                    llm_logs::feedback_at.eq(Some(update.feedback_at)),
                ))
                .execute(conn)?;

            log::info!(
                "Coach {} marked log {} as {}",
                update.coach_id,
                log_id,
                update.feedback
            );
            Self::get(conn, log_id)
        })
    }
}
