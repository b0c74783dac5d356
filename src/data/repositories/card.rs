use chrono::{NaiveDate, NaiveDateTime};
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::select;
use diesel::sql_types::Integer;

use crate::data::models::{ApiError, Card, CreateCardRequest, NewCard, ScheduleUpdate};
use crate::features::srs::scheduler::{self, Quality, initial_schedule};
use crate::schema::{anki_cards, llm_logs, students};

/// The card store: every flashcard and its scheduling state.
pub struct CardRepository;

impl CardRepository {
    pub fn find(conn: &mut SqliteConnection, card_id: i32) -> QueryResult<Option<Card>> {
        anki_cards::table
            .find(card_id)
            .select(Card::as_select())
            .first(conn)
            .optional()
    }

    pub fn get(conn: &mut SqliteConnection, card_id: i32) -> Result<Card, ApiError> {
        Self::find(conn, card_id)?.ok_or_else(|| ApiError::card_not_found(card_id))
    }

    /// Inserts a card for an existing student with the initial schedule.
    pub fn create(
        conn: &mut SqliteConnection,
        request: &CreateCardRequest,
        now: NaiveDateTime,
    ) -> Result<Card, ApiError> {
        conn.immediate_transaction(|conn| {
            Self::insert(
                conn,
                &request.student_id,
                request.llm_log_id,
                &request.question,
                &request.answer,
                now,
            )
        })
    }

    /// Insert without opening a transaction of its own, for callers that are
    /// already inside one.
    pub(crate) fn insert(
        conn: &mut SqliteConnection,
        student_id: &str,
        llm_log_id: Option<i32>,
        question: &str,
        answer: &str,
        now: NaiveDateTime,
    ) -> Result<Card, ApiError> {
        let student_exists: bool =
            select(exists(students::table.find(student_id))).get_result(conn)?;
        if !student_exists {
            return Err(ApiError::student_not_found(student_id));
        }
        if let Some(log_id) = llm_log_id {
            let log_exists: bool = select(exists(llm_logs::table.find(log_id))).get_result(conn)?;
            if !log_exists {
                return Err(ApiError::log_not_found(log_id));
            }
        }

        let schedule = initial_schedule(now.date());
        diesel::insert_into(anki_cards::table)
            .values(&NewCard {
                student_id,
                llm_log_id,
                question,
                answer,
                repetitions: schedule.repetitions,
                interval_days: schedule.interval_days,
                ease_factor: schedule.ease_factor,
                next_review_date: schedule.next_review_date,
                created_at: now,
            })
            .execute(conn)?;

        let card_id = diesel::select(diesel::dsl::sql::<Integer>("last_insert_rowid()"))
            .get_result::<i32>(conn)?;
        log::info!("Created card {} for student {}", card_id, student_id);
        Self::get(conn, card_id)
    }

    /// A student's cards due on or before `today`, most overdue first.
    pub fn due_cards(
        conn: &mut SqliteConnection,
        student_id: &str,
        today: NaiveDate,
    ) -> QueryResult<Vec<Card>> {
        anki_cards::table
            .filter(anki_cards::student_id.eq(student_id))
            .filter(anki_cards::next_review_date.le(today))
            .order((anki_cards::next_review_date.asc(), anki_cards::card_id.asc()))
            .select(Card::as_select())
            .load(conn)
    }

    /// Applies a review under the database write lock. A concurrent review of
    /// the same card waits for this one and then reschedules from its result.
    pub fn review(
        conn: &mut SqliteConnection,
        card_id: i32,
        quality: Quality,
        now: NaiveDateTime,
    ) -> Result<Card, ApiError> {
        conn.immediate_transaction(|conn| {
            let card = Self::get(conn, card_id)?;
            let updated = scheduler::review(&card, quality, now);

            diesel::update(anki_cards::table.find(card_id))
                .set(&ScheduleUpdate::from(&updated))
                .execute(conn)?;

            log::info!(
                "Reviewed card {} with quality {}: interval {} -> {} days, next review {}",
                card_id,
                quality.value(),
                card.interval_days,
                updated.interval_days,
                updated.next_review_date
            );
            Ok(updated)
        })
    }
}
