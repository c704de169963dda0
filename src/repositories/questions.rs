use time::PrimitiveDateTime;

use crate::db::models::Question;

const QUESTION_COLUMNS: &str = "\
    id, exam_id, question_type, content, options, answer, explanation, \
    score, knowledge_point, order_index, created_at";

pub(crate) struct CreateQuestion<'a> {
    pub(crate) id: &'a str,
    pub(crate) exam_id: &'a str,
    pub(crate) question_type: &'a str,
    pub(crate) content: &'a str,
    pub(crate) options: Option<&'a str>,
    pub(crate) answer: &'a str,
    pub(crate) explanation: Option<&'a str>,
    pub(crate) score: i32,
    pub(crate) knowledge_point: Option<&'a str>,
    pub(crate) order_index: i32,
    pub(crate) created_at: PrimitiveDateTime,
}

pub(crate) async fn create<'e, E>(
    executor: E,
    params: CreateQuestion<'_>,
) -> Result<Question, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    sqlx::query_as::<_, Question>(&format!(
        "INSERT INTO questions (
            id, exam_id, question_type, content, options, answer,
            explanation, score, knowledge_point, order_index, created_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11)
         RETURNING {QUESTION_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.exam_id)
    .bind(params.question_type)
    .bind(params.content)
    .bind(params.options)
    .bind(params.answer)
    .bind(params.explanation)
    .bind(params.score)
    .bind(params.knowledge_point)
    .bind(params.order_index)
    .bind(params.created_at)
    .fetch_one(executor)
    .await
}

pub(crate) async fn list_by_exam(
    pool: &sqlx::PgPool,
    exam_id: &str,
) -> Result<Vec<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM questions WHERE exam_id = $1 ORDER BY order_index"
    ))
    .bind(exam_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn delete_by_exam(pool: &sqlx::PgPool, exam_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM questions WHERE exam_id = $1").bind(exam_id).execute(pool).await?;
    Ok(())
}
