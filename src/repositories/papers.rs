use sqlx::PgPool;

use crate::db::models::QuestionPaper;

const COLUMNS: &str = "\
    id, subject, class_name, total_marks, difficulty, board, content, \
    chapters, created_by, created_at";

pub(crate) async fn find_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<QuestionPaper>, sqlx::Error> {
    sqlx::query_as::<_, QuestionPaper>(&format!(
        "SELECT {COLUMNS} FROM question_papers WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_by_creator(
    pool: &PgPool,
    created_by: &str,
) -> Result<Vec<QuestionPaper>, sqlx::Error> {
    sqlx::query_as::<_, QuestionPaper>(&format!(
        "SELECT {COLUMNS} FROM question_papers \
         WHERE created_by = $1 ORDER BY created_at DESC"
    ))
    .bind(created_by)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_class(
    pool: &PgPool,
    class_name: &str,
) -> Result<Vec<QuestionPaper>, sqlx::Error> {
    sqlx::query_as::<_, QuestionPaper>(&format!(
        "SELECT {COLUMNS} FROM question_papers \
         WHERE class_name = $1 ORDER BY created_at DESC"
    ))
    .bind(class_name)
    .fetch_all(pool)
    .await
}

pub(crate) struct CreatePaper<'a> {
    pub id: &'a str,
    pub subject: &'a str,
    pub class_name: &'a str,
    pub total_marks: i32,
    pub difficulty: &'a str,
    pub board: &'a str,
    pub content: &'a str,
    pub chapters: &'a [String],
    pub created_by: &'a str,
    pub created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreatePaper<'_>,
) -> Result<QuestionPaper, sqlx::Error> {
    sqlx::query_as::<_, QuestionPaper>(&format!(
        "INSERT INTO question_papers (
            id, subject, class_name, total_marks, difficulty, board,
            content, chapters, created_by, created_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.subject)
    .bind(params.class_name)
    .bind(params.total_marks)
    .bind(params.difficulty)
    .bind(params.board)
    .bind(params.content)
    .bind(sqlx::types::Json(params.chapters))
    .bind(params.created_by)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

/// Delete a paper together with every submission referencing it.
/// Dependents go first and both statements share one transaction, so a
/// failure leaves the paper and its submissions untouched.
pub(crate) async fn delete_with_submissions(pool: &PgPool, id: &str) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM student_submissions WHERE question_paper_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM question_papers WHERE id = $1").bind(id).execute(&mut *tx).await?;

    tx.commit().await
}
