pub mod card;
pub mod judgment_log;
pub mod student;

pub use card::CardRepository;
pub use judgment_log::JudgmentLogRepository;
pub use student::StudentRepository;
