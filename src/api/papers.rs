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
use crate::db::models::{QuestionPaper, User};
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::paper::{
    GeneratePaperRequest, GeneratePaperResponse, PaperCreate, PaperCreated, PaperResponse,
};
use crate::services::prompts;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/generate-paper", post(generate_paper))
        .route("/papers", post(create_paper).get(list_papers))
        .route("/papers/:paper_id", get(get_paper).delete(delete_paper))
}

async fn generate_paper(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(spec): Json<GeneratePaperRequest>,
) -> Result<Json<GeneratePaperResponse>, ApiError> {
    spec.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let prompt = prompts::generation_prompt(&spec);

    let content = state
        .gemini()
        .generate_paper(&prompt)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to generate question paper"))?;

    Ok(Json(GeneratePaperResponse { content }))
}

async fn create_paper(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<PaperCreate>,
) -> Result<(StatusCode, Json<PaperCreated>), ApiError> {
    if user.role != UserRole::Teacher {
        return Err(ApiError::Forbidden("Only teachers can create papers"));
    }

    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let paper = repositories::papers::create(
        state.db(),
        repositories::papers::CreatePaper {
            id: &Uuid::new_v4().to_string(),
            subject: &payload.subject,
            class_name: &payload.class_name,
            total_marks: payload.total_marks,
            difficulty: &payload.difficulty,
            board: &payload.board,
            content: &payload.content,
            chapters: &payload.chapters,
            created_by: &user.id,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::unprocessable(e, "Failed to create paper"))?;

    Ok((
        StatusCode::CREATED,
        Json(PaperCreated { message: "Paper created".to_string(), paper_id: paper.id }),
    ))
}

/// Role-scoped listing: teachers see their own papers, students see papers
/// for their class. A student without a class gets an empty list, not an
/// error.
async fn list_papers(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<PaperResponse>>, ApiError> {
    let papers = match user.role {
        UserRole::Teacher => repositories::papers::list_by_creator(state.db(), &user.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list papers"))?,
        UserRole::Student => match user.class_name.as_deref() {
            Some(class_name) => repositories::papers::list_by_class(state.db(), class_name)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to list papers"))?,
            None => Vec::new(),
        },
    };

    Ok(Json(papers.into_iter().map(PaperResponse::from_db).collect()))
}

async fn get_paper(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(paper_id): Path<String>,
) -> Result<Json<PaperResponse>, ApiError> {
    let paper = fetch_paper(&state, &paper_id).await?;
    ensure_paper_visible(&user, &paper)?;
    Ok(Json(PaperResponse::from_db(paper)))
}

async fn delete_paper(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(paper_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let paper = fetch_paper(&state, &paper_id).await?;

    if !(user.role == UserRole::Teacher && paper.created_by == user.id) {
        return Err(ApiError::Forbidden("Only the paper's creator can delete it"));
    }

    repositories::papers::delete_with_submissions(state.db(), &paper.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete paper"))?;

    tracing::info!(paper_id = %paper.id, "Deleted paper and its submissions");

    Ok(Json(serde_json::json!({ "message": "Paper and related submissions deleted" })))
}

async fn fetch_paper(state: &AppState, paper_id: &str) -> Result<QuestionPaper, ApiError> {
    repositories::papers::find_by_id(state.db(), paper_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load paper"))?
        .ok_or_else(|| ApiError::NotFound("Paper not found".to_string()))
}

fn ensure_paper_visible(user: &User, paper: &QuestionPaper) -> Result<(), ApiError> {
    let visible = match user.role {
        UserRole::Teacher => paper.created_by == user.id,
        UserRole::Student => user.class_name.as_deref() == Some(paper.class_name.as_str()),
    };

    if visible {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Not allowed to view this paper"))
    }
}
