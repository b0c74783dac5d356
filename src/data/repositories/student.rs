use chrono::NaiveDateTime;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::select;

use crate::data::models::{ApiError, NewStudent, Student, StudentCreate, StudentUpdate};
use crate::schema::students;

pub struct StudentRepository;

impl StudentRepository {
    pub fn find(conn: &mut SqliteConnection, student_id: &str) -> QueryResult<Option<Student>> {
        students::table
            .find(student_id)
            .select(Student::as_select())
            .first(conn)
            .optional()
    }

    pub fn get(conn: &mut SqliteConnection, student_id: &str) -> Result<Student, ApiError> {
        Self::find(conn, student_id)?.ok_or_else(|| ApiError::student_not_found(student_id))
    }

    pub fn list(conn: &mut SqliteConnection, skip: i64, limit: i64) -> QueryResult<Vec<Student>> {
        students::table
            .order(students::student_id.asc())
            .offset(skip)
            .limit(limit)
            .select(Student::as_select())
            .load(conn)
    }

    pub fn create(
        conn: &mut SqliteConnection,
        request: &StudentCreate,
        default_budget: i32,
        now: NaiveDateTime,
    ) -> Result<Student, ApiError> {
        conn.immediate_transaction(|conn| {
            let taken: bool =
                select(exists(students::table.find(&request.student_id))).get_result(conn)?;
            if taken {
                return Err(ApiError::InvalidInput("Student already registered".into()));
            }

            diesel::insert_into(students::table)
                .values(&NewStudent {
                    student_id: &request.student_id,
                    name: &request.name,
                    anki_budget_per_day: request
                        .settings
                        .anki_budget_per_day
                        .unwrap_or(default_budget),
                    created_at: now,
                })
                .execute(conn)?;

            log::info!("Registered student {}", request.student_id);
            Self::get(conn, &request.student_id)
        })
    }

    /// Changes the name and/or daily budget; absent fields keep their value.
    pub fn update(
        conn: &mut SqliteConnection,
        student_id: &str,
        request: &StudentUpdate,
    ) -> Result<Student, ApiError> {
        conn.immediate_transaction(|conn| {
            Self::get(conn, student_id)?;

            if let Some(name) = &request.name {
                diesel::update(students::table.find(student_id))
                    .set(students::name.eq(name))
                    .execute(conn)?;
            }
            if let Some(budget) = request.settings.anki_budget_per_day {
                diesel::update(students::table.find(student_id))
                    .set(students::anki_budget_per_day.eq(budget))
                    .execute(conn)?;
            }

            log::info!("Updated student {}", student_id);
            Self::get(conn, student_id)
        })
    }
}
