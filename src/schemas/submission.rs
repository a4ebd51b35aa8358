use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::StudentSubmission;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SubmissionCreate {
    #[serde(alias = "questionPaperId")]
    #[validate(length(min = 1, message = "question_paper_id must not be empty"))]
    pub(crate) question_paper_id: String,
    #[validate(length(min = 1, message = "answers must not be empty"))]
    pub(crate) answers: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionCreated {
    pub(crate) message: String,
    pub(crate) submission_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EvaluationUpdate {
    pub(crate) evaluation: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionResponse {
    pub(crate) id: String,
    #[serde(rename = "questionPaperId")]
    pub(crate) question_paper_id: String,
    #[serde(rename = "studentId")]
    pub(crate) student_id: String,
    #[serde(rename = "studentName")]
    pub(crate) student_name: String,
    pub(crate) answers: String,
    #[serde(rename = "submittedAt")]
    pub(crate) submitted_at: String,
    pub(crate) evaluated: bool,
    pub(crate) evaluation: Option<serde_json::Value>,
}

impl SubmissionResponse {
    pub(crate) fn from_db(submission: StudentSubmission) -> Self {
        Self {
            id: submission.id,
            question_paper_id: submission.question_paper_id,
            student_id: submission.student_id,
            student_name: submission.student_name,
            answers: submission.answers,
            submitted_at: format_primitive(submission.submitted_at),
            evaluated: submission.evaluated,
            evaluation: submission.evaluation.map(|value| value.0),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct EvaluateRequest {
    #[validate(length(min = 1, message = "question must not be empty"))]
    pub(crate) question: String,
    pub(crate) answer: String,
    #[serde(alias = "maxMarks")]
    #[validate(range(min = 1, message = "max_marks must be positive"))]
    pub(crate) max_marks: i32,
    #[serde(default)]
    #[serde(alias = "expectedAnswer")]
    pub(crate) expected_answer: Option<String>,
}

/// Structured grade extracted from the model's reply, or the fixed fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct EvaluationResult {
    pub(crate) percentage: f64,
    pub(crate) grade: String,
    pub(crate) feedback: String,
    #[serde(rename = "scoreBreakdown")]
    pub(crate) score_breakdown: String,
}
