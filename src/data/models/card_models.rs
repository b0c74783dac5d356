use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::schema::anki_cards;

/// A flashcard together with its review scheduling state.
#[derive(Debug, Clone, PartialEq, Serialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = anki_cards)]
#[diesel(primary_key(card_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Card {
    pub card_id: i32,
    pub student_id: String,
    pub llm_log_id: Option<i32>,
    pub question: String,
    pub answer: String,
    pub repetitions: i32,
    pub interval_days: f64,
    pub ease_factor: f64,
    pub next_review_date: NaiveDate,
    pub last_reviewed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = anki_cards)]
pub struct NewCard<'a> {
    pub student_id: &'a str,
    pub llm_log_id: Option<i32>,
    pub question: &'a str,
    pub answer: &'a str,
    pub repetitions: i32,
    pub interval_days: f64,
    pub ease_factor: f64,
    pub next_review_date: NaiveDate,
    pub created_at: NaiveDateTime,
}

/// The columns a review is allowed to touch.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = anki_cards)]
pub struct ScheduleUpdate {
    pub repetitions: i32,
    pub interval_days: f64,
    pub ease_factor: f64,
    pub next_review_date: NaiveDate,
    pub last_reviewed_at: Option<NaiveDateTime>,
}

impl From<&Card> for ScheduleUpdate {
    fn from(card: &Card) -> Self {
        ScheduleUpdate {
            repetitions: card.repetitions,
            interval_days: card.interval_days,
            ease_factor: card.ease_factor,
            next_review_date: card.next_review_date,
            last_reviewed_at: card.last_reviewed_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCardRequest {
    #[validate(length(min = 1, message = "student_id must not be empty"))]
    pub student_id: String,
    #[validate(length(min = 1, message = "question must not be empty"))]
    pub question: String,
    pub answer: String,
    pub llm_log_id: Option<i32>,
}

/// Body of `POST /cards/{card_id}/review`. Range checking is left to the
/// scheduler so that out-of-range values surface as invalid input.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub quality: i32,
}

/// A student's review session for one day.
#[derive(Debug, Serialize)]
pub struct DailyDeck {
    pub student_id: String,
    pub due_cards: Vec<Card>,
    pub total_due: usize,
    pub cards_in_deck: usize,
    pub budget_applied: bool,
}
