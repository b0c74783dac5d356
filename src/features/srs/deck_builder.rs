use chrono::NaiveDate;

use crate::data::models::{Card, DailyDeck, Student};

/// Picks today's review deck for `student` out of `cards`.
///
/// Only the student's cards that are due on or before `today` are eligible.
/// The most overdue come first, ties broken by `card_id`, and the result is
/// capped at the student's daily budget. Cards cut by the cap stay due and
/// keep their relative order on the following day.
pub fn build_deck(student: &Student, cards: Vec<Card>, today: NaiveDate) -> DailyDeck {
    let mut due: Vec<Card> = cards
        .into_iter()
        .filter(|card| card.student_id == student.student_id && card.next_review_date <= today)
        .collect();
    due.sort_by(|a, b| {
        a.next_review_date
            .cmp(&b.next_review_date)
            .then(a.card_id.cmp(&b.card_id))
    });

    let total_due = due.len();
    let budget = usize::try_from(student.anki_budget_per_day).unwrap_or(0);
    due.truncate(budget);

    DailyDeck {
        student_id: student.student_id.clone(),
        cards_in_deck: due.len(),
        due_cards: due,
        total_due,
        budget_applied: total_due > budget,
    }
}
