pub mod card_models;
pub mod error_models;
pub mod log_models;
pub mod student_models;

pub use card_models::{
    Card, CreateCardRequest, DailyDeck, NewCard, ReviewRequest, ScheduleUpdate,
};
pub use error_models::ApiError;
pub use log_models::{
    Decision, Feedback, FeedbackRequest, FeedbackUpdate, JudgmentLog, JudgmentResponse,
    LogFilter, LogQuery, NewJudgmentLog, RecordJudgmentRequest,
};
pub use student_models::{
    NewStudent, Pagination, Student, StudentCreate, StudentResponse, StudentSettings,
    StudentUpdate,
};
