pub mod aggregator;
pub mod significance;

pub use aggregator::{FeedbackTally, GroupBy, SummaryEntry, summarize, tally_by_model};
pub use significance::{ModelStats, SignificanceConfig, Verdict, compare_models};
