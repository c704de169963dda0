use sqlx::PgPool;

pub(crate) async fn count_by_exam(pool: &PgPool, exam_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM exam_results WHERE exam_id = $1")
        .bind(exam_id)
        .fetch_one(pool)
        .await
}
