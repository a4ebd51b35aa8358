use sqlx::PgPool;

use crate::db::models::StudentSubmission;

const COLUMNS: &str = "\
    id, question_paper_id, student_id, student_name, answers, \
    submitted_at, evaluated, evaluation";

pub(crate) async fn find_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<StudentSubmission>, sqlx::Error> {
    sqlx::query_as::<_, StudentSubmission>(&format!(
        "SELECT {COLUMNS} FROM student_submissions WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_by_student(
    pool: &PgPool,
    student_id: &str,
) -> Result<Vec<StudentSubmission>, sqlx::Error> {
    sqlx::query_as::<_, StudentSubmission>(&format!(
        "SELECT {COLUMNS} FROM student_submissions \
         WHERE student_id = $1 ORDER BY submitted_at DESC"
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await
}

/// Submissions to papers the given teacher created, joined through paper
/// ownership.
pub(crate) async fn list_for_paper_owner(
    pool: &PgPool,
    teacher_id: &str,
) -> Result<Vec<StudentSubmission>, sqlx::Error> {
    sqlx::query_as::<_, StudentSubmission>(
        "SELECT s.id, s.question_paper_id, s.student_id, s.student_name, s.answers, \
                s.submitted_at, s.evaluated, s.evaluation \
         FROM student_submissions s \
         JOIN question_papers p ON p.id = s.question_paper_id \
         WHERE p.created_by = $1 \
         ORDER BY s.submitted_at DESC",
    )
    .bind(teacher_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn count_for_paper(pool: &PgPool, paper_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM student_submissions WHERE question_paper_id = $1")
        .bind(paper_id)
        .fetch_one(pool)
        .await
}

pub(crate) struct CreateSubmission<'a> {
    pub id: &'a str,
    pub question_paper_id: &'a str,
    pub student_id: &'a str,
    pub student_name: &'a str,
    pub answers: &'a str,
    pub submitted_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateSubmission<'_>,
) -> Result<StudentSubmission, sqlx::Error> {
    sqlx::query_as::<_, StudentSubmission>(&format!(
        "INSERT INTO student_submissions (
            id, question_paper_id, student_id, student_name, answers,
            submitted_at, evaluated, evaluation
        ) VALUES ($1,$2,$3,$4,$5,$6,FALSE,NULL)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.question_paper_id)
    .bind(params.student_id)
    .bind(params.student_name)
    .bind(params.answers)
    .bind(params.submitted_at)
    .fetch_one(pool)
    .await
}

/// Attaching any evaluation payload marks the submission evaluated, even an
/// empty object.
pub(crate) async fn set_evaluation(
    pool: &PgPool,
    id: &str,
    evaluation: &serde_json::Value,
) -> Result<StudentSubmission, sqlx::Error> {
    sqlx::query_as::<_, StudentSubmission>(&format!(
        "UPDATE student_submissions \
         SET evaluation = $1, evaluated = TRUE \
         WHERE id = $2 \
         RETURNING {COLUMNS}",
    ))
    .bind(sqlx::types::Json(evaluation))
    .bind(id)
    .fetch_one(pool)
    .await
}
