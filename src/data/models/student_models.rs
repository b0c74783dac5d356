use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::schema::students;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Student {
    pub student_id: String,
    pub name: String,
    pub anki_budget_per_day: i32,
    pub created_at: NaiveDateTime,
}

impl Student {
    pub fn settings(&self) -> StudentSettings {
        StudentSettings {
            anki_budget_per_day: Some(self.anki_budget_per_day),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = students)]
pub struct NewStudent<'a> {
    pub student_id: &'a str,
    pub name: &'a str,
    pub anki_budget_per_day: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct StudentSettings {
    #[validate(range(min = 1, message = "anki_budget_per_day must be positive"))]
    pub anki_budget_per_day: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StudentCreate {
    #[validate(length(min = 1, message = "student_id must not be empty"))]
    pub student_id: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[serde(default)]
    #[validate(nested)]
    pub settings: StudentSettings,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StudentUpdate {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub settings: StudentSettings,
}

#[derive(Debug, Serialize)]
pub struct StudentResponse {
    pub student_id: String,
    pub name: String,
    pub settings: StudentSettings,
    pub created_at: NaiveDateTime,
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        let settings = student.settings();
        StudentResponse {
            student_id: student.student_id,
            name: student.name,
            settings,
            created_at: student.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_student_page")]
    pub limit: i64,
}

fn default_student_page() -> i64 {
    100
}
