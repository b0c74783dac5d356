use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::data::models::ApiError;
use crate::schema::llm_logs;

/// Outcome of an automated judgment on a student mistake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approve => "APPROVE",
            Decision::Reject => "REJECT",
        }
    }
}

impl FromStr for Decision {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("APPROVE") {
            Ok(Decision::Approve)
        } else if s.eq_ignore_ascii_case("REJECT") {
            Ok(Decision::Reject)
        } else {
            Err(ApiError::InvalidInput(format!(
                "decision must be APPROVE or REJECT, got {s:?}"
            )))
        }
    }
}

/// A coach's verdict on a judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Feedback {
    Good,
    Bad,
}

impl Feedback {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feedback::Good => "GOOD",
            Feedback::Bad => "BAD",
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feedback {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("GOOD") {
            Ok(Feedback::Good)
        } else if s.eq_ignore_ascii_case("BAD") {
            Ok(Feedback::Bad)
        } else {
            Err(ApiError::InvalidInput(format!(
                "feedback must be GOOD or BAD, got {s:?}"
            )))
        }
    }
}

#[derive(Debug, Clone, Serialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = llm_logs)]
#[diesel(primary_key(log_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct JudgmentLog {
    pub log_id: i32,
    pub submission_id: i32,
    pub student_id: Option<String>,
    pub concept_name: Option<String>,
    pub decision: String,
    pub reason: Option<String>,
    pub model_version: String,
    pub coach_id: Option<String>,
    pub coach_feedback: Option<String>,
    pub reason_code: Option<String>,
    pub memo: Option<String>,
    pub created_at: NaiveDateTime,
    pub feedback_at: Option<NaiveDateTime>,
}

impl JudgmentLog {
    /// Parsed coach feedback. Stored values are constrained to GOOD/BAD, so
    /// anything else is treated as absent.
    pub fn feedback(&self) -> Option<Feedback> {
        self.coach_feedback.as_deref().and_then(|f| f.parse().ok())
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = llm_logs)]
pub struct NewJudgmentLog<'a> {
    pub submission_id: i32,
    pub student_id: Option<&'a str>,
    pub concept_name: Option<&'a str>,
    pub decision: &'a str,
    pub reason: Option<&'a str>,
    pub model_version: &'a str,
    pub created_at: NaiveDateTime,
}

/// A judgment produced elsewhere, recorded so coaches can review it.
#[derive(Debug, Deserialize, Validate)]
pub struct RecordJudgmentRequest {
    pub submission_id: i32,
    pub student_id: Option<String>,
    pub concept_name: Option<String>,
    pub decision: String,
    pub reason: Option<String>,
    #[validate(length(min = 1, message = "model_version must not be empty"))]
    pub model_version: String,
    pub question: Option<String>,
    pub answer: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JudgmentResponse {
    pub log_id: i32,
    pub decision: Decision,
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_id: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct FeedbackRequest {
    pub log_id: i32,
    #[validate(length(min = 1, message = "coach_id must not be empty"))]
    pub coach_id: String,
    pub feedback: String,
    pub reason_code: Option<String>,
    pub memo: Option<String>,
}

/// Parsed feedback ready to be written to a log.
#[derive(Debug, Clone)]
pub struct FeedbackUpdate {
    pub coach_id: String,
    pub feedback: Feedback,
    pub reason_code: Option<String>,
    pub memo: Option<String>,
    pub feedback_at: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct LogQuery {
    pub student_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_log_page")]
    pub limit: i64,
}

fn default_log_page() -> i64 {
    20
}

/// Filter resolved against the clock: inclusive dates, both bounds set.
#[derive(Debug, Clone)]
pub struct LogFilter {
    pub student_id: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub skip: i64,
    pub limit: i64,
}
