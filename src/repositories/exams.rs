use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Exam;

pub(crate) const COLUMNS: &str = "\
    id, course_id, title, description, chapter, exam_type, duration_minutes, \
    total_score, start_time, end_time, is_published, is_answer_published, \
    published_at, created_at, updated_at";

/// Exam joined with its course name and question count, as consumed by the
/// dashboard list projection.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ExamListRow {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) course_name: String,
    pub(crate) question_count: i64,
    pub(crate) duration_minutes: i32,
    pub(crate) total_score: i32,
    pub(crate) exam_type: String,
    pub(crate) start_time: Option<PrimitiveDateTime>,
    pub(crate) end_time: Option<PrimitiveDateTime>,
    pub(crate) is_published: bool,
    pub(crate) published_at: Option<PrimitiveDateTime>,
    pub(crate) created_at: PrimitiveDateTime,
}

pub(crate) struct CreateExam<'a> {
    pub(crate) id: &'a str,
    pub(crate) course_id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) chapter: &'a str,
    pub(crate) exam_type: &'a str,
    pub(crate) duration_minutes: i32,
    pub(crate) total_score: i32,
    pub(crate) start_time: Option<PrimitiveDateTime>,
    pub(crate) end_time: Option<PrimitiveDateTime>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) struct UpdateExam {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) chapter: Option<String>,
    pub(crate) exam_type: Option<String>,
    pub(crate) duration_minutes: Option<i32>,
    pub(crate) total_score: Option<i32>,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) async fn create<'e, E>(executor: E, params: CreateExam<'_>) -> Result<Exam, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    sqlx::query_as::<_, Exam>(&format!(
        "INSERT INTO exams (
            id, course_id, title, description, chapter, exam_type,
            duration_minutes, total_score, start_time, end_time,
            is_published, is_answer_published, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,FALSE,FALSE,$11,$12)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.course_id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.chapter)
    .bind(params.exam_type)
    .bind(params.duration_minutes)
    .bind(params.total_score)
    .bind(params.start_time)
    .bind(params.end_time)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(executor)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!("SELECT {COLUMNS} FROM exams WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn update(
    pool: &PgPool,
    id: &str,
    params: UpdateExam,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE exams SET
            title = COALESCE($1, title),
            description = COALESCE($2, description),
            chapter = COALESCE($3, chapter),
            exam_type = COALESCE($4, exam_type),
            duration_minutes = COALESCE($5, duration_minutes),
            total_score = COALESCE($6, total_score),
            updated_at = $7
         WHERE id = $8",
    )
    .bind(params.title)
    .bind(params.description)
    .bind(params.chapter)
    .bind(params.exam_type)
    .bind(params.duration_minutes)
    .bind(params.total_score)
    .bind(params.updated_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn delete_by_id(pool: &PgPool, id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM exams WHERE id = $1").bind(id).execute(pool).await?;
    Ok(())
}

/// Marks the exam published with the given window. `published_at` is only
/// stamped on first publication and kept on republish.
pub(crate) async fn publish(
    pool: &PgPool,
    id: &str,
    start_time: Option<PrimitiveDateTime>,
    end_time: Option<PrimitiveDateTime>,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE exams SET
            is_published = TRUE,
            published_at = COALESCE(published_at, $1),
            start_time = $2,
            end_time = $3,
            updated_at = $4
         WHERE id = $5",
    )
    .bind(now)
    .bind(start_time)
    .bind(end_time)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn publish_answers(
    pool: &PgPool,
    id: &str,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE exams SET is_answer_published = TRUE, updated_at = $1 WHERE id = $2")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) async fn list_rows(pool: &PgPool) -> Result<Vec<ExamListRow>, sqlx::Error> {
    sqlx::query_as::<_, ExamListRow>(
        "SELECT e.id,
                e.title,
                c.name AS course_name,
                (SELECT COUNT(*) FROM questions q WHERE q.exam_id = e.id) AS question_count,
                e.duration_minutes,
                e.total_score,
                e.exam_type,
                e.start_time,
                e.end_time,
                e.is_published,
                e.published_at,
                e.created_at
         FROM exams e
         JOIN courses c ON c.id = e.course_id
         ORDER BY e.created_at DESC",
    )
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_published(pool: &PgPool) -> Result<Vec<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!(
        "SELECT {COLUMNS} FROM exams WHERE is_published ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await
}
