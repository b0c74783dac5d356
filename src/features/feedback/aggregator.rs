use std::collections::HashMap;
use std::str::FromStr;

use serde::Serialize;

use crate::data::models::{ApiError, Feedback, JudgmentLog};

/// How `summarize` buckets feedback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupBy {
    #[default]
    ReasonCode,
    ModelVersion,
}

impl FromStr for GroupBy {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reason_code" => Ok(GroupBy::ReasonCode),
            "model_version" => Ok(GroupBy::ModelVersion),
            other => Err(ApiError::InvalidInput(format!(
                "group_by must be reason_code or model_version, got {other:?}"
            ))),
        }
    }
}

/// One row of a feedback summary. Which keys are present depends on the
/// grouping that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SummaryEntry {
    Reason {
        reason_code: Option<String>,
        concept_name: Option<String>,
        count: u64,
    },
    Model {
        model_version: String,
        coach_feedback: Feedback,
        count: u64,
    },
}

impl SummaryEntry {
    pub fn count(&self) -> u64 {
        match self {
            SummaryEntry::Reason { count, .. } | SummaryEntry::Model { count, .. } => *count,
        }
    }
}

/// Good/bad feedback counts for one model version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackTally {
    pub model_version: String,
    pub good: u64,
    pub bad: u64,
    /// Smallest log id seen for this version; orders versions by first use.
    pub first_log_id: i32,
}

impl FeedbackTally {
    pub fn total(&self) -> u64 {
        self.good + self.bad
    }
}

/// Groups reviewed logs into summary rows, largest group first.
///
/// `ReasonCode` only looks at BAD feedback (what went wrong, and on which
/// concept). `ModelVersion` counts every reviewed log per version and verdict.
pub fn summarize(logs: &[JudgmentLog], group_by: GroupBy) -> Vec<SummaryEntry> {
    let mut entries = match group_by {
        GroupBy::ReasonCode => {
            let mut counts: HashMap<(Option<String>, Option<String>), u64> = HashMap::new();
            for log in logs.iter().filter(|l| l.feedback() == Some(Feedback::Bad)) {
                *counts
                    .entry((log.reason_code.clone(), log.concept_name.clone()))
                    .or_default() += 1;
            }
            counts
                .into_iter()
                .map(|((reason_code, concept_name), count)| SummaryEntry::Reason {
                    reason_code,
                    concept_name,
                    count,
                })
                .collect::<Vec<_>>()
        }
        GroupBy::ModelVersion => {
            let mut counts: HashMap<(String, Feedback), u64> = HashMap::new();
            for log in logs {
                if let Some(feedback) = log.feedback() {
                    *counts
                        .entry((log.model_version.clone(), feedback))
                        .or_default() += 1;
                }
            }
            counts
                .into_iter()
                .map(|((model_version, coach_feedback), count)| SummaryEntry::Model {
                    model_version,
                    coach_feedback,
                    count,
                })
                .collect::<Vec<_>>()
        }
    };

    entries.sort_by(|a, b| {
        b.count()
            .cmp(&a.count())
            .then_with(|| sort_key(a).cmp(&sort_key(b)))
    });
    entries
}

fn sort_key(entry: &SummaryEntry) -> (String, String) {
    match entry {
        SummaryEntry::Reason {
            reason_code,
            concept_name,
            ..
        } => (
            reason_code.clone().unwrap_or_default(),
            concept_name.clone().unwrap_or_default(),
        ),
        SummaryEntry::Model {
            model_version,
            coach_feedback,
            ..
        } => (model_version.clone(), coach_feedback.to_string()),
    }
}

/// Per-version good/bad counts over logs that carry coach feedback, in the
/// order the versions first appear.
pub fn tally_by_model(logs: &[JudgmentLog]) -> Vec<FeedbackTally> {
    let mut tallies: Vec<FeedbackTally> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for log in logs {
        let Some(feedback) = log.feedback() else {
            continue;
        };
        let slot = *index.entry(log.model_version.as_str()).or_insert_with(|| {
            tallies.push(FeedbackTally {
                model_version: log.model_version.clone(),
                good: 0,
                bad: 0,
                first_log_id: log.log_id,
            });
            tallies.len() - 1
        });
        let tally = &mut tallies[slot];
        tally.first_log_id = tally.first_log_id.min(log.log_id);
        match feedback {
            Feedback::Good => tally.good += 1,
            Feedback::Bad => tally.bad += 1,
        }
    }

    tallies.sort_by_key(|t| t.first_log_id);
    tallies
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn log(
        log_id: i32,
        model_version: &str,
        feedback: Option<&str>,
        reason_code: Option<&str>,
        concept_name: Option<&str>,
    ) -> JudgmentLog {
        JudgmentLog {
            log_id,
            submission_id: 100 + log_id,
            student_id: Some("kim".to_string()),
            concept_name: concept_name.map(str::to_string),
            decision: "APPROVE".to_string(),
            reason: None,
            model_version: model_version.to_string(),
            coach_id: feedback.map(|_| "coach-1".to_string()),
            coach_feedback: feedback.map(str::to_string),
            reason_code: reason_code.map(str::to_string),
            memo: None,
            created_at: NaiveDate::from_ymd_opt(2025, 5, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            feedback_at: None,
        }
    }

    #[test]
    fn reason_summary_counts_only_bad_feedback() {
        let logs = vec![
            log(1, "v1", Some("BAD"), Some("SIMPLE_MISTAKE"), Some("fractions")),
            log(2, "v1", Some("BAD"), Some("SIMPLE_MISTAKE"), Some("fractions")),
            log(3, "v2", Some("BAD"), None, Some("algebra")),
            log(4, "v1", Some("GOOD"), Some("SIMPLE_MISTAKE"), Some("fractions")),
            log(5, "v1", None, None, Some("fractions")),
        ];
        let summary = summarize(&logs, GroupBy::ReasonCode);
        assert_eq!(
            summary,
            vec![
                SummaryEntry::Reason {
                    reason_code: Some("SIMPLE_MISTAKE".to_string()),
                    concept_name: Some("fractions".to_string()),
                    count: 2,
                },
                SummaryEntry::Reason {
                    reason_code: None,
                    concept_name: Some("algebra".to_string()),
                    count: 1,
                },
            ]
        );
    }

    #[test]
    fn model_summary_splits_by_verdict() {
        let logs = vec![
            log(1, "v1", Some("GOOD"), None, None),
            log(2, "v1", Some("GOOD"), None, None),
            log(3, "v1", Some("BAD"), None, None),
            log(4, "v2", Some("GOOD"), None, None),
            log(5, "v2", None, None, None),
        ];
        let summary = summarize(&logs, GroupBy::ModelVersion);
        assert_eq!(summary.len(), 3);
        assert_eq!(
            summary[0],
            SummaryEntry::Model {
                model_version: "v1".to_string(),
                coach_feedback: Feedback::Good,
                count: 2,
            }
        );
        assert_eq!(summary.iter().map(SummaryEntry::count).sum::<u64>(), 4);
    }

    #[test]
    fn tallies_follow_first_seen_order() {
        let logs = vec![
            log(7, "v2", Some("GOOD"), None, None),
            log(3, "v1", Some("BAD"), None, None),
            log(9, "v1", Some("GOOD"), None, None),
            log(10, "v3", None, None, None),
        ];
        let tallies = tally_by_model(&logs);
        let versions: Vec<&str> = tallies.iter().map(|t| t.model_version.as_str()).collect();
        assert_eq!(versions, vec!["v1", "v2"]);
        assert_eq!((tallies[0].good, tallies[0].bad), (1, 1));
        assert_eq!(tallies[0].total(), 2);
    }

    #[test]
    fn group_by_parses_known_keys() {
        assert_eq!("model_version".parse::<GroupBy>().unwrap(), GroupBy::ModelVersion);
        assert!("concept".parse::<GroupBy>().is_err());
    }
}
