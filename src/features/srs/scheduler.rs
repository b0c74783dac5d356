//! SM-2 review scheduling.
//!
//! A review with quality below 3 is a lapse: the card goes back to a one day
//! interval and its repetition streak restarts. Successful reviews step the
//! interval 1 -> 6 -> previous interval times the ease factor. The ease factor
//! is adjusted after every review and never falls below [`MIN_EASE_FACTOR`].

use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::data::models::{ApiError, Card};

pub const MIN_EASE_FACTOR: f64 = 1.3;
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;
/// Longest interval a card can be pushed out to, about a century.
pub const MAX_INTERVAL_DAYS: f64 = 36_500.0;

/// Scheduling state a freshly created card starts with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialSchedule {
    pub repetitions: i32,
    pub interval_days: f64,
    pub ease_factor: f64,
    pub next_review_date: NaiveDate,
}

/// New cards are first shown the day after they are created.
pub fn initial_schedule(today: NaiveDate) -> InitialSchedule {
    InitialSchedule {
        repetitions: 0,
        interval_days: 1.0,
        ease_factor: DEFAULT_EASE_FACTOR,
        next_review_date: add_days(today, 1.0),
    }
}

/// Self-reported recall quality, 0 (blackout) to 5 (perfect).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quality(u8);

impl Quality {
    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_lapse(self) -> bool {
        self.0 < 3
    }
}

impl TryFrom<i32> for Quality {
    type Error = ApiError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0..=5 => Ok(Quality(value as u8)),
            _ => Err(ApiError::InvalidInput(format!(
                "quality must be between 0 and 5, got {value}"
            ))),
        }
    }
}

/// Ease factor after a review of the given quality.
pub fn next_ease_factor(ease_factor: f64, quality: Quality) -> f64 {
    let miss = 5.0 - f64::from(quality.value());
    (ease_factor + (0.1 - miss * (0.08 + miss * 0.02))).max(MIN_EASE_FACTOR)
}

/// Applies one review to `card` and returns the rescheduled copy.
///
/// The interval growth uses the ease factor the card had *before* this
/// review; the updated ease factor takes effect from the next review on.
pub fn review(card: &Card, quality: Quality, now: NaiveDateTime) -> Card {
    let (repetitions, interval_days) = if quality.is_lapse() {
        (0, 1.0)
    } else {
        let repetitions = card.repetitions + 1;
        let interval = match repetitions {
            1 => 1.0,
            2 => 6.0,
            _ => (card.interval_days * card.ease_factor)
                .round()
                .clamp(1.0, MAX_INTERVAL_DAYS),
        };
        (repetitions, interval)
    };

    Card {
        repetitions,
        interval_days,
        ease_factor: next_ease_factor(card.ease_factor, quality),
        next_review_date: add_days(now.date(), interval_days),
        last_reviewed_at: Some(now),
        ..card.clone()
    }
}

fn add_days(date: NaiveDate, days: f64) -> NaiveDate {
    date.checked_add_days(Days::new(days.max(0.0) as u64))
        .unwrap_or(NaiveDate::MAX)
}
