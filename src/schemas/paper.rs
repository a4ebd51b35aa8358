use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::QuestionPaper;

/// Generation specification forwarded to the prompt composer. The frontend
/// sends camelCase keys.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct GeneratePaperRequest {
    #[validate(length(min = 1, message = "subject must not be empty"))]
    pub(crate) subject: String,
    #[serde(alias = "class")]
    #[validate(length(min = 1, message = "class must not be empty"))]
    pub(crate) class_name: String,
    #[serde(alias = "totalMarks")]
    #[validate(range(min = 1, message = "total_marks must be positive"))]
    pub(crate) total_marks: i32,
    #[validate(length(min = 1, message = "difficulty must not be empty"))]
    pub(crate) difficulty: String,
    #[validate(length(min = 1, message = "board must not be empty"))]
    pub(crate) board: String,
    #[serde(default)]
    pub(crate) chapters: Vec<String>,
    #[serde(default)]
    #[serde(alias = "specificTopic")]
    pub(crate) specific_topic: Option<String>,
    #[serde(default)]
    pub(crate) instructions: Option<String>,
    #[serde(alias = "paperPattern")]
    #[validate(length(min = 1, message = "paper_pattern must not be empty"))]
    pub(crate) paper_pattern: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct GeneratePaperResponse {
    pub(crate) content: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct PaperCreate {
    #[validate(length(min = 1, max = 100, message = "subject must be 1-100 characters"))]
    pub(crate) subject: String,
    #[serde(alias = "class")]
    #[validate(length(min = 1, max = 50, message = "class must be 1-50 characters"))]
    pub(crate) class_name: String,
    #[serde(alias = "totalMarks")]
    #[validate(range(min = 1, message = "total_marks must be positive"))]
    pub(crate) total_marks: i32,
    #[validate(length(min = 1, max = 20, message = "difficulty must be 1-20 characters"))]
    pub(crate) difficulty: String,
    #[validate(length(min = 1, max = 50, message = "board must be 1-50 characters"))]
    pub(crate) board: String,
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub(crate) content: String,
    #[serde(default)]
    pub(crate) chapters: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PaperCreated {
    pub(crate) message: String,
    pub(crate) paper_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct PaperResponse {
    pub(crate) id: String,
    pub(crate) subject: String,
    #[serde(rename = "class")]
    pub(crate) class_name: String,
    #[serde(rename = "totalMarks")]
    pub(crate) total_marks: i32,
    pub(crate) difficulty: String,
    pub(crate) board: String,
    pub(crate) content: String,
    pub(crate) chapters: Vec<String>,
    #[serde(rename = "createdBy")]
    pub(crate) created_by: String,
    #[serde(rename = "createdAt")]
    pub(crate) created_at: String,
}

impl PaperResponse {
    pub(crate) fn from_db(paper: QuestionPaper) -> Self {
        Self {
            id: paper.id,
            subject: paper.subject,
            class_name: paper.class_name,
            total_marks: paper.total_marks,
            difficulty: paper.difficulty,
            board: paper.board,
            content: paper.content,
            chapters: paper.chapters.0,
            created_by: paper.created_by,
            created_at: format_primitive(paper.created_at),
        }
    }
}
