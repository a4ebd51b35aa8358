use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::validation;
use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::auth::TokenResponse;
use crate::schemas::user::{UserLogin, UserResponse};
use crate::services::uploads;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/me", get(me))
}

#[derive(Default)]
struct SignupForm {
    email: Option<String>,
    name: Option<String>,
    role: Option<String>,
    password: Option<String>,
    roll_no: Option<String>,
    class_name: Option<String>,
    profile_pic: Option<ProfilePicUpload>,
}

struct ProfilePicUpload {
    filename: String,
    content_type: String,
    bytes: Vec<u8>,
}

async fn signup(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    let form = read_signup_form(multipart).await?;

    let (Some(email), Some(name), Some(role), Some(password)) =
        (form.email, form.name, form.role, form.password)
    else {
        return Err(ApiError::BadRequest(
            "All fields (email, password, name, role) are required".to_string(),
        ));
    };

    validation::validate_email(&email)?;
    validation::validate_password_len(&password)?;
    let role = UserRole::parse(&role)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown role '{role}'")))?;

    let existing = repositories::users::exists_by_email(state.db(), &email)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check existing user"))?;
    if existing.is_some() {
        return Err(ApiError::BadRequest("User already exists".to_string()));
    }

    let profile_pic_url = match form.profile_pic {
        Some(upload) => {
            validation::validate_image_upload(
                &upload.filename,
                &upload.content_type,
                &state.settings().uploads().allowed_image_extensions,
            )?;
            let url =
                uploads::store_profile_picture(state.settings(), &upload.filename, &upload.bytes)
                    .await
                    .map_err(|e| match e {
                        uploads::UploadError::TooLarge { .. } => {
                            ApiError::BadRequest(e.to_string())
                        }
                        uploads::UploadError::Io(_) => {
                            ApiError::internal(e, "Failed to store profile picture")
                        }
                    })?;
            Some(url)
        }
        None => None,
    };

    let hashed_password = security::hash_password(&password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;

    let user = repositories::users::create(
        state.db(),
        repositories::users::CreateUser {
            id: &Uuid::new_v4().to_string(),
            email: &email,
            hashed_password,
            full_name: &name,
            role,
            profile_pic_url,
            roll_no: form.roll_no,
            class_name: form.class_name,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create user"))?;

    let token = security::create_access_token(&user, state.settings(), None)
        .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token, user: UserResponse::from_db(user) })))
}

async fn read_signup_form(mut multipart: Multipart) -> Result<SignupForm, ApiError> {
    let mut form = SignupForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart form: {e}")))?
    {
        let Some(name) = field.name().map(|value| value.to_string()) else {
            continue;
        };

        match name.as_str() {
            "profile_pic" => {
                let filename = field.file_name().unwrap_or("profile").to_string();
                let content_type = field.content_type().unwrap_or("").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid upload: {e}")))?;
                if !bytes.is_empty() {
                    form.profile_pic =
                        Some(ProfilePicUpload { filename, content_type, bytes: bytes.to_vec() });
                }
            }
            other => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid multipart form: {e}")))?;
                let value = value.trim().to_string();
                if value.is_empty() {
                    continue;
                }
                match other {
                    "email" => form.email = Some(value),
                    "name" => form.name = Some(value),
                    "role" => form.role = Some(value),
                    "password" => form.password = Some(value),
                    "roll_no" => form.roll_no = Some(value),
                    "class_name" => form.class_name = Some(value),
                    _ => {}
                }
            }
        }
    }

    Ok(form)
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<UserLogin>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = repositories::users::find_by_email(state.db(), &payload.email)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load user"))?
        .ok_or(ApiError::Unauthorized("Invalid email or password"))?;

    let verified = security::verify_password(&payload.password, &user.hashed_password)
        .map_err(|_| ApiError::Unauthorized("Invalid email or password"))?;

    if !verified {
        return Err(ApiError::Unauthorized("Invalid email or password"));
    }

    let token = security::create_access_token(&user, state.settings(), None)
        .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;

    Ok(Json(TokenResponse { token, user: UserResponse::from_db(user) }))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from_db(user))
}
