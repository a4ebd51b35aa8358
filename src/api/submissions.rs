use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{StudentSubmission, User};
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::submission::{
    EvaluateRequest, EvaluationResult, EvaluationUpdate, SubmissionCreate, SubmissionCreated,
    SubmissionResponse,
};
use crate::services::prompts;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/submissions", post(create_submission).get(list_submissions))
        .route("/submissions/:submission_id", get(get_submission).patch(update_evaluation))
        .route("/evaluate-submission", post(evaluate_submission))
}

async fn create_submission(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<SubmissionCreate>,
) -> Result<(StatusCode, Json<SubmissionCreated>), ApiError> {
    if user.role != UserRole::Student {
        return Err(ApiError::Forbidden("Only students can submit answers"));
    }

    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let paper = repositories::papers::find_by_id(state.db(), &payload.question_paper_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load paper"))?
        .ok_or_else(|| ApiError::NotFound("Paper not found".to_string()))?;

    let submission = repositories::submissions::create(
        state.db(),
        repositories::submissions::CreateSubmission {
            id: &Uuid::new_v4().to_string(),
            question_paper_id: &paper.id,
            student_id: &user.id,
            student_name: &user.full_name,
            answers: &payload.answers,
            submitted_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::unprocessable(e, "Failed to save submission"))?;

    Ok((
        StatusCode::CREATED,
        Json(SubmissionCreated {
            message: "Submission saved".to_string(),
            submission_id: submission.id,
        }),
    ))
}

/// Role-scoped listing: students see their own submissions, teachers see
/// submissions to the papers they created.
async fn list_submissions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<SubmissionResponse>>, ApiError> {
    let submissions = match user.role {
        UserRole::Student => repositories::submissions::list_by_student(state.db(), &user.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list submissions"))?,
        UserRole::Teacher => repositories::submissions::list_for_paper_owner(state.db(), &user.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list submissions"))?,
    };

    Ok(Json(submissions.into_iter().map(SubmissionResponse::from_db).collect()))
}

async fn get_submission(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(submission_id): Path<String>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let submission = fetch_submission(&state, &submission_id).await?;
    ensure_submission_visible(&state, &user, &submission).await?;
    Ok(Json(SubmissionResponse::from_db(submission)))
}

async fn update_evaluation(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(submission_id): Path<String>,
    Json(payload): Json<EvaluationUpdate>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let submission = fetch_submission(&state, &submission_id).await?;
    ensure_submission_visible(&state, &user, &submission).await?;

    repositories::submissions::set_evaluation(state.db(), &submission.id, &payload.evaluation)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update evaluation"))?;

    Ok(Json(serde_json::json!({ "message": "Submission evaluation updated" })))
}

async fn evaluate_submission(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(payload): Json<EvaluateRequest>,
) -> Result<Json<EvaluationResult>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let expected_answer = payload.expected_answer.as_deref().unwrap_or("N/A");
    let prompt = prompts::evaluation_prompt(
        &payload.question,
        expected_answer,
        &payload.answer,
        payload.max_marks,
    );

    let result = state
        .gemini()
        .evaluate_answer(&prompt)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to evaluate answer"))?;

    Ok(Json(result))
}

async fn fetch_submission(
    state: &AppState,
    submission_id: &str,
) -> Result<StudentSubmission, ApiError> {
    repositories::submissions::find_by_id(state.db(), submission_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load submission"))?
        .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))
}

/// A submission is visible to the student who made it and to the teacher who
/// owns the paper it answers.
async fn ensure_submission_visible(
    state: &AppState,
    user: &User,
    submission: &StudentSubmission,
) -> Result<(), ApiError> {
    match user.role {
        UserRole::Student => {
            if submission.student_id == user.id {
                Ok(())
            } else {
                Err(ApiError::Forbidden("Not allowed to view this submission"))
            }
        }
        UserRole::Teacher => {
            let paper = repositories::papers::find_by_id(state.db(), &submission.question_paper_id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to load paper"))?
                .ok_or_else(|| ApiError::NotFound("Paper not found".to_string()))?;

            if paper.created_by == user.id {
                Ok(())
            } else {
                Err(ApiError::Forbidden("Not allowed to view this submission"))
            }
        }
    }
}
