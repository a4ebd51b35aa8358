use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::UserRole;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) email: String,
    pub(crate) hashed_password: String,
    pub(crate) full_name: String,
    pub(crate) role: UserRole,
    pub(crate) profile_pic_url: Option<String>,
    pub(crate) roll_no: Option<String>,
    pub(crate) class_name: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct QuestionPaper {
    pub(crate) id: String,
    pub(crate) subject: String,
    pub(crate) class_name: String,
    pub(crate) total_marks: i32,
    pub(crate) difficulty: String,
    pub(crate) board: String,
    pub(crate) content: String,
    pub(crate) chapters: Json<Vec<String>>,
    pub(crate) created_by: String,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct StudentSubmission {
    pub(crate) id: String,
    pub(crate) question_paper_id: String,
    pub(crate) student_id: String,
    pub(crate) student_name: String,
    pub(crate) answers: String,
    pub(crate) submitted_at: PrimitiveDateTime,
    pub(crate) evaluated: bool,
    pub(crate) evaluation: Option<Json<serde_json::Value>>,
}
