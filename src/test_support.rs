use std::sync::{Arc, OnceLock};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    Router,
};
use sqlx::PgPool;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::api;
use crate::core::{config::Settings, security, state::AppState, time::primitive_now_utc};
use crate::db::models::{QuestionPaper, StudentSubmission, User};
use crate::db::types::UserRole;
use crate::repositories;
use crate::services::gemini::GeminiService;

const TEST_SECRET_KEY: &str = "test-secret";
pub(crate) const TEST_PASSWORD: &str = "correct-horse-battery";

pub(crate) struct TestContext {
    pub(crate) state: AppState,
    pub(crate) app: Router,
    _guard: OwnedMutexGuard<()>,
}

pub(crate) async fn env_lock() -> OwnedMutexGuard<()> {
    static LOCK: OnceLock<Arc<Mutex<()>>> = OnceLock::new();
    let lock = LOCK.get_or_init(|| Arc::new(Mutex::new(()))).clone();
    lock.lock_owned().await
}

pub(crate) fn set_test_env() {
    dotenvy::dotenv().ok();

    std::env::set_var("EXAMSPARK_ENV", "test");
    std::env::set_var("EXAMSPARK_STRICT_CONFIG", "0");
    std::env::set_var("SECRET_KEY", TEST_SECRET_KEY);
    std::env::remove_var("PROJECT_NAME");
    std::env::remove_var("BACKEND_CORS_ORIGINS");
    std::env::remove_var("GEMINI_API_KEY");
    std::env::set_var("PROMETHEUS_ENABLED", "0");
    std::env::set_var("UPLOADS_DIR", std::env::temp_dir().join("examspark-test-uploads").display().to_string());
}

/// Build a full router against the configured test database, or `None` (with
/// a skip notice) when `DATABASE_URL` is not set.
pub(crate) async fn setup_test_context() -> Option<TestContext> {
    let guard = env_lock().await;
    set_test_env();

    let database_url = std::env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty());
    let Some(_database_url) = database_url else {
        eprintln!("skipping database-backed test: DATABASE_URL is not set");
        return None;
    };

    let settings = Settings::load().expect("settings");
    let db = prepare_db(&settings).await;

    crate::services::uploads::ensure_uploads_dir(&settings).await.expect("uploads dir");

    let gemini = GeminiService::from_settings(&settings).expect("gemini service");
    let state = AppState::new(settings, db, gemini);
    let app = api::router::router(state.clone());

    Some(TestContext { state, app, _guard: guard })
}

async fn prepare_db(settings: &Settings) -> PgPool {
    let db = crate::db::init_pool(settings).await.expect("db pool");

    ensure_schema(&db).await.expect("schema");
    reset_db(&db).await.expect("reset db");
    db
}

async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    let migrations_dir =
        std::env::var("EXAMSPARK_MIGRATIONS_DIR").unwrap_or_else(|_| "migrations".to_string());
    let mut migrator = sqlx::migrate::Migrator::new(std::path::Path::new(&migrations_dir))
        .await
        .map_err(|error| sqlx::Error::Migrate(Box::new(error)))?;
    migrator.set_ignore_missing(true);
    migrator.run(pool).await.map_err(|error| sqlx::Error::Migrate(Box::new(error)))?;
    Ok(())
}

async fn reset_db(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("TRUNCATE student_submissions, question_papers, users RESTART IDENTITY CASCADE")
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) async fn insert_user(
    pool: &PgPool,
    email: &str,
    full_name: &str,
    role: UserRole,
    class_name: Option<&str>,
) -> User {
    let hashed_password = security::hash_password(TEST_PASSWORD).expect("hash password");

    repositories::users::create(
        pool,
        repositories::users::CreateUser {
            id: &Uuid::new_v4().to_string(),
            email,
            hashed_password,
            full_name,
            role,
            profile_pic_url: None,
            roll_no: None,
            class_name: class_name.map(|value| value.to_string()),
            created_at: primitive_now_utc(),
        },
    )
    .await
    .expect("insert user")
}

pub(crate) async fn insert_paper(
    pool: &PgPool,
    created_by: &str,
    class_name: &str,
    subject: &str,
) -> QuestionPaper {
    repositories::papers::create(
        pool,
        repositories::papers::CreatePaper {
            id: &Uuid::new_v4().to_string(),
            subject,
            class_name,
            total_marks: 80,
            difficulty: "medium",
            board: "CBSE",
            content: "# Sample paper",
            chapters: &["Chapter 1".to_string()],
            created_by,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .expect("insert paper")
}

pub(crate) async fn insert_submission(
    pool: &PgPool,
    paper: &QuestionPaper,
    student: &User,
) -> StudentSubmission {
    repositories::submissions::create(
        pool,
        repositories::submissions::CreateSubmission {
            id: &Uuid::new_v4().to_string(),
            question_paper_id: &paper.id,
            student_id: &student.id,
            student_name: &student.full_name,
            answers: "Answer text",
            submitted_at: primitive_now_utc(),
        },
    )
    .await
    .expect("insert submission")
}

pub(crate) fn bearer_token(user: &User, settings: &Settings) -> String {
    security::create_access_token(user, settings, None).expect("token")
}

pub(crate) fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    if let Some(body) = body {
        let bytes = serde_json::to_vec(&body).expect("serialize body");
        builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(bytes))
            .expect("request body")
    } else {
        builder.body(Body::empty()).expect("request body")
    }
}

/// Multipart signup request body, field order preserved.
pub(crate) fn signup_request(fields: &[(&str, &str)]) -> Request<Body> {
    let boundary = "----examspark-test-boundary";
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));

    Request::builder()
        .method(Method::POST)
        .uri("/api/auth/signup")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .expect("signup request")
}

pub(crate) async fn read_json(response: axum::response::Response<Body>) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("response body");
    serde_json::from_slice(&body).unwrap_or_else(|err| {
        let body_text = String::from_utf8_lossy(&body);
        panic!("json parse: {err}; body: {body_text}");
    })
}
