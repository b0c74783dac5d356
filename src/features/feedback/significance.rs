//! A/B comparison of judgment model versions on coach feedback.
//!
//! Each non-baseline version's bad-feedback rate is compared with the
//! baseline's using a two-proportion z-test with pooled variance.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::features::feedback::aggregator::FeedbackTally;

pub const DEFAULT_MIN_SAMPLE_SIZE: u64 = 30;
/// Two-sided 95% confidence.
pub const DEFAULT_Z_CRITICAL: f64 = 1.96;

#[derive(Debug, Clone, PartialEq)]
pub struct SignificanceConfig {
    /// Version every other version is compared against. Falls back to the
    /// earliest-seen version when unset or not observed.
    pub baseline: Option<String>,
    pub min_sample_size: u64,
    pub z_critical: f64,
}

impl Default for SignificanceConfig {
    fn default() -> Self {
        SignificanceConfig {
            baseline: None,
            min_sample_size: DEFAULT_MIN_SAMPLE_SIZE,
            z_critical: DEFAULT_Z_CRITICAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    SignificantBetter,
    SignificantWorse,
    NotSignificant,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::SignificantBetter => "Significant (better)",
            Verdict::SignificantWorse => "Significant (worse)",
            Verdict::NotSignificant => "Not Significant",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelStats {
    pub model_version: String,
    pub total_requests: u64,
    pub good_feedback_count: u64,
    pub bad_feedback_count: u64,
    pub good_feedback_rate: f64,
    pub bad_feedback_rate: f64,
    pub statistical_significance: Verdict,
    pub is_baseline: bool,
    pub z_score: Option<f64>,
}

fn rate(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// z statistic for `bad_a / n_a` against `bad_b / n_b`.
///
/// `None` when either cohort is empty or the pooled standard error is zero
/// (both cohorts all-good or all-bad).
pub fn two_proportion_z(bad_a: u64, n_a: u64, bad_b: u64, n_b: u64) -> Option<f64> {
    if n_a == 0 || n_b == 0 {
        return None;
    }
    let (n_a_f, n_b_f) = (n_a as f64, n_b as f64);
    let pooled = (bad_a + bad_b) as f64 / (n_a_f + n_b_f);
    let se = (pooled * (1.0 - pooled) * (1.0 / n_a_f + 1.0 / n_b_f)).sqrt();
    if se == 0.0 || !se.is_finite() {
        return None;
    }
    Some((rate(bad_a, n_a) - rate(bad_b, n_b)) / se)
}

/// Verdict for a candidate against the baseline given their z statistic.
/// A negative z means fewer bad verdicts than the baseline.
pub fn classify(z: f64, z_critical: f64) -> Verdict {
    if z.abs() <= z_critical {
        Verdict::NotSignificant
    } else if z < 0.0 {
        Verdict::SignificantBetter
    } else {
        Verdict::SignificantWorse
    }
}

/// Builds one [`ModelStats`] per tally, in tally order.
pub fn compare_models(tallies: &[FeedbackTally], config: &SignificanceConfig) -> Vec<ModelStats> {
    let baseline = config
        .baseline
        .as_deref()
        .and_then(|wanted| tallies.iter().find(|t| t.model_version == wanted))
        .or_else(|| tallies.iter().min_by_key(|t| t.first_log_id));

    tallies
        .iter()
        .map(|tally| {
            let total = tally.total();
            let is_baseline = baseline.is_some_and(|b| b.model_version == tally.model_version);

            let z_score = match baseline {
                Some(base) if !is_baseline => {
                    let sampled = total >= config.min_sample_size
                        && base.total() >= config.min_sample_size;
                    if sampled {
                        two_proportion_z(tally.bad, total, base.bad, base.total())
                    } else {
                        None
                    }
                }
                _ => None,
            };
            let verdict = z_score
                .map(|z| classify(z, config.z_critical))
                .unwrap_or(Verdict::NotSignificant);

            ModelStats {
                model_version: tally.model_version.clone(),
                total_requests: total,
                good_feedback_count: tally.good,
                bad_feedback_count: tally.bad,
                good_feedback_rate: rate(tally.good, total),
                bad_feedback_rate: rate(tally.bad, total),
                statistical_significance: verdict,
                is_baseline,
                z_score,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(model_version: &str, good: u64, bad: u64, first_log_id: i32) -> FeedbackTally {
        FeedbackTally {
            model_version: model_version.to_string(),
            good,
            bad,
            first_log_id,
        }
    }

    fn stats_for<'a>(stats: &'a [ModelStats], version: &str) -> &'a ModelStats {
        stats.iter().find(|s| s.model_version == version).unwrap()
    }

    #[test]
    fn forty_ten_against_thirty_five_fifteen_is_not_significant() {
        let tallies = vec![tally("model-b", 35, 15, 1), tally("model-a", 40, 10, 2)];
        let stats = compare_models(&tallies, &SignificanceConfig::default());

        let a = stats_for(&stats, "model-a");
        let z = a.z_score.unwrap();
        // p_a = 0.2, p_b = 0.3, pooled 0.25, se = sqrt(0.25 * 0.75 * 0.04)
        assert!((z - (-1.154_700_5)).abs() < 1e-6, "z = {z}");
        assert_eq!(a.statistical_significance, Verdict::NotSignificant);

        let b = stats_for(&stats, "model-b");
        assert!(b.is_baseline);
        assert_eq!(b.z_score, None);
        assert_eq!(b.statistical_significance, Verdict::NotSignificant);
    }

    #[test]
    fn large_gap_is_significant_in_both_directions() {
        let config = SignificanceConfig::default();
        let better = compare_models(&[tally("base", 60, 40, 1), tally("new", 90, 10, 2)], &config);
        let new = stats_for(&better, "new");
        assert!((new.z_score.unwrap() - (-4.898_979)).abs() < 1e-5);
        assert_eq!(new.statistical_significance, Verdict::SignificantBetter);

        let worse = compare_models(&[tally("base", 90, 10, 1), tally("new", 60, 40, 2)], &config);
        assert_eq!(
            stats_for(&worse, "new").statistical_significance,
            Verdict::SignificantWorse
        );
    }

    #[test]
    fn small_cohorts_are_never_significant() {
        let config = SignificanceConfig::default();
        let stats = compare_models(&[tally("base", 0, 29, 1), tally("new", 29, 0, 2)], &config);
        let new = stats_for(&stats, "new");
        assert_eq!(new.statistical_significance, Verdict::NotSignificant);
        assert_eq!(new.z_score, None);

        let stats = compare_models(&[tally("base", 0, 100, 1), tally("new", 20, 0, 2)], &config);
        assert_eq!(
            stats_for(&stats, "new").statistical_significance,
            Verdict::NotSignificant
        );
    }

    #[test]
    fn configured_baseline_overrides_first_seen() {
        let config = SignificanceConfig {
            baseline: Some("new".to_string()),
            ..SignificanceConfig::default()
        };
        let stats = compare_models(&[tally("old", 60, 40, 1), tally("new", 90, 10, 2)], &config);
        assert!(stats_for(&stats, "new").is_baseline);
        assert_eq!(
            stats_for(&stats, "old").statistical_significance,
            Verdict::SignificantWorse
        );
    }

    #[test]
    fn unknown_baseline_falls_back_to_earliest() {
        let config = SignificanceConfig {
            baseline: Some("missing".to_string()),
            ..SignificanceConfig::default()
        };
        let stats = compare_models(&[tally("late", 1, 1, 9), tally("early", 1, 1, 4)], &config);
        assert!(stats_for(&stats, "early").is_baseline);
    }

    #[test]
    fn rates_sum_to_one_or_are_zero() {
        let stats = compare_models(
            &[tally("a", 3, 7, 1), tally("b", 0, 0, 2), tally("c", 41, 0, 3)],
            &SignificanceConfig::default(),
        );
        for s in &stats {
            if s.total_requests > 0 {
                assert!((s.good_feedback_rate + s.bad_feedback_rate - 1.0).abs() < 1e-12);
            } else {
                assert_eq!(s.good_feedback_rate, 0.0);
                assert_eq!(s.bad_feedback_rate, 0.0);
            }
        }
        assert!((stats_for(&stats, "a").bad_feedback_rate - 0.7).abs() < 1e-12);
    }

    #[test]
    fn identical_extremes_have_no_z() {
        assert_eq!(two_proportion_z(0, 50, 0, 50), None);
        assert_eq!(two_proportion_z(50, 50, 50, 50), None);
        assert_eq!(two_proportion_z(1, 0, 1, 10), None);
    }

    #[test]
    fn verdicts_serialize_to_canonical_strings() {
        let rendered: Vec<String> = [
            Verdict::SignificantBetter,
            Verdict::SignificantWorse,
            Verdict::NotSignificant,
        ]
        .iter()
        .map(|v| serde_json::to_string(v).unwrap())
        .collect();
        assert_eq!(
            rendered,
            vec![
                "\"Significant (better)\"",
                "\"Significant (worse)\"",
                "\"Not Significant\"",
            ]
        );
    }
}
