use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use time::Duration;
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::core::time::{primitive_now_utc, to_primitive_utc};
use crate::db::models::{Course, Exam, Question};
use crate::repositories;
use crate::schemas::exam::{
    ExamCreate, ExamListResponse, ExamUpdate, PublishWindowRequest, StudentExamResponse,
};
use crate::services::{exam_status, exam_views};

use super::queries::{ListExamsQuery, StudentViewQuery};

pub(super) async fn create_exam(
    State(state): State<AppState>,
    Json(payload): Json<ExamCreate>,
) -> Result<(StatusCode, Json<StudentExamResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let start_time = payload.start_time.map(to_primitive_utc);
    let end_time = payload.end_time.map(to_primitive_utc);
    if !exam_status::window_is_ordered(start_time, end_time) {
        return Err(ApiError::BadRequest("end_time must not precede start_time".to_string()));
    }

    let course = repositories::courses::find_by_id(state.db(), &payload.course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load course"))?
        .ok_or_else(|| ApiError::NotFound(format!("Course {} not found", payload.course_id)))?;

    let now = primitive_now_utc();
    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    let exam = repositories::exams::create(
        &mut *tx,
        repositories::exams::CreateExam {
            id: &Uuid::new_v4().to_string(),
            course_id: &payload.course_id,
            title: &payload.title,
            description: payload.description.as_deref(),
            chapter: &payload.chapter,
            exam_type: &payload.exam_type,
            duration_minutes: payload.duration_minutes,
            total_score: payload.total_score,
            start_time,
            end_time,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create exam"))?;

    let mut questions = Vec::with_capacity(payload.questions.len());
    for (index, question) in payload.questions.iter().enumerate() {
        let created = repositories::questions::create(
            &mut *tx,
            repositories::questions::CreateQuestion {
                id: &Uuid::new_v4().to_string(),
                exam_id: &exam.id,
                question_type: &question.question_type,
                content: &question.content,
                options: question.options.as_deref(),
                answer: &question.answer,
                explanation: question.explanation.as_deref(),
                score: question.score,
                knowledge_point: question.knowledge_point.as_deref(),
                order_index: index as i32,
                created_at: now,
            },
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to create question"))?;
        questions.push(created);
    }

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    // Creator-facing detail, with full answer disclosure.
    let response =
        exam_views::build_student_view(&exam, Some(&course), &questions, true, true, true, now);
    Ok((StatusCode::CREATED, Json(response)))
}

pub(super) async fn list_exams(
    State(state): State<AppState>,
    Query(params): Query<ListExamsQuery>,
) -> Result<Json<Vec<ExamListResponse>>, ApiError> {
    let rows = repositories::exams::list_rows(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list exams"))?;

    let now = primitive_now_utc();
    let mut views = Vec::with_capacity(rows.len());
    for row in &rows {
        let participant_count = repositories::results::count_by_exam(state.db(), &row.id)
            .await
            .unwrap_or_else(|err| {
                tracing::warn!(exam_id = %row.id, error = %err, "participant count unavailable");
                0
            });
        views.push(exam_views::build_list_view(row, participant_count, now));
    }

    // Statuses are derived, not stored, so both filters apply after assembly.
    views.retain(|view| params.matches(view));

    Ok(Json(views))
}

pub(super) async fn get_exam(
    State(state): State<AppState>,
    Path(exam_id): Path<String>,
) -> Result<Json<StudentExamResponse>, ApiError> {
    let (exam, course, questions) = load_exam_detail(&state, &exam_id).await?;
    let now = primitive_now_utc();
    // Teacher-facing detail always discloses answers.
    let response = exam_views::build_student_view(
        &exam,
        course.as_ref(),
        &questions,
        true,
        true,
        true,
        now,
    );
    Ok(Json(response))
}

pub(super) async fn update_exam(
    State(state): State<AppState>,
    Path(exam_id): Path<String>,
    Json(payload): Json<ExamUpdate>,
) -> Result<Json<StudentExamResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    require_exam(&state, &exam_id).await?;

    let now = primitive_now_utc();
    repositories::exams::update(
        state.db(),
        &exam_id,
        repositories::exams::UpdateExam {
            title: payload.title,
            description: payload.description,
            chapter: payload.chapter,
            exam_type: payload.exam_type,
            duration_minutes: payload.duration_minutes,
            total_score: payload.total_score,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update exam"))?;

    let (exam, course, questions) = load_exam_detail(&state, &exam_id).await?;
    let response = exam_views::build_student_view(
        &exam,
        course.as_ref(),
        &questions,
        true,
        true,
        true,
        now,
    );
    Ok(Json(response))
}

pub(super) async fn delete_exam(
    State(state): State<AppState>,
    Path(exam_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_exam(&state, &exam_id).await?;

    let participant_count = repositories::results::count_by_exam(state.db(), &exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count participants"))?;
    if participant_count > 0 {
        return Err(ApiError::Conflict(format!(
            "Exam has {participant_count} participant(s) and cannot be deleted"
        )));
    }

    repositories::questions::delete_by_exam(state.db(), &exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete questions"))?;
    repositories::exams::delete_by_id(state.db(), &exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete exam"))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Immediate publication: the window opens now and closes after the exam's
/// configured duration.
pub(super) async fn publish_exam(
    State(state): State<AppState>,
    Path(exam_id): Path<String>,
) -> Result<Json<StudentExamResponse>, ApiError> {
    let exam = require_exam(&state, &exam_id).await?;

    let now = primitive_now_utc();
    let end = now + Duration::minutes(i64::from(exam.duration_minutes));
    repositories::exams::publish(state.db(), &exam_id, Some(now), Some(end), now)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to publish exam"))?;

    exam_detail_response(&state, &exam_id, now).await
}

/// Scheduled publication with an explicit, possibly half-open window.
pub(super) async fn publish_exam_with_time(
    State(state): State<AppState>,
    Path(exam_id): Path<String>,
    payload: Option<Json<PublishWindowRequest>>,
) -> Result<Json<StudentExamResponse>, ApiError> {
    require_exam(&state, &exam_id).await?;

    let window = payload.map(|Json(body)| body).unwrap_or_default();
    let start_time = window.start_time.map(to_primitive_utc);
    let end_time = window.end_time.map(to_primitive_utc);
    if !exam_status::window_is_ordered(start_time, end_time) {
        return Err(ApiError::BadRequest("end_time must not precede start_time".to_string()));
    }

    let now = primitive_now_utc();
    repositories::exams::publish(state.db(), &exam_id, start_time, end_time, now)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to publish exam"))?;

    exam_detail_response(&state, &exam_id, now).await
}

/// Flips answer disclosure on. Independent of the publication window.
pub(super) async fn publish_answers(
    State(state): State<AppState>,
    Path(exam_id): Path<String>,
) -> Result<Json<StudentExamResponse>, ApiError> {
    require_exam(&state, &exam_id).await?;

    let now = primitive_now_utc();
    repositories::exams::publish_answers(state.db(), &exam_id, now)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to publish answers"))?;

    exam_detail_response(&state, &exam_id, now).await
}

pub(super) async fn student_view(
    State(state): State<AppState>,
    Path(exam_id): Path<String>,
    Query(params): Query<StudentViewQuery>,
) -> Result<Json<StudentExamResponse>, ApiError> {
    let (exam, course, questions) = load_exam_detail(&state, &exam_id).await?;

    let now = primitive_now_utc();
    let response = exam_views::build_student_view(
        &exam,
        course.as_ref(),
        &questions,
        true,
        exam.is_answer_published,
        params.show_knowledge_point,
        now,
    );
    Ok(Json(response))
}

/// Published exams as a student sees them on their dashboard: headers only,
/// no question payloads.
pub(super) async fn list_student_exams(
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentExamResponse>>, ApiError> {
    let exams = repositories::exams::list_published(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list published exams"))?;

    let now = primitive_now_utc();
    let mut views = Vec::with_capacity(exams.len());
    for exam in &exams {
        let course = repositories::courses::find_by_id(state.db(), &exam.course_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load course"))?;
        let questions = repositories::questions::list_by_exam(state.db(), &exam.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load questions"))?;
        views.push(exam_views::build_student_view(
            exam,
            course.as_ref(),
            &questions,
            false,
            false,
            false,
            now,
        ));
    }

    Ok(Json(views))
}

async fn require_exam(state: &AppState, exam_id: &str) -> Result<Exam, ApiError> {
    repositories::exams::find_by_id(state.db(), exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load exam"))?
        .ok_or_else(|| ApiError::NotFound(format!("Exam {exam_id} not found")))
}

async fn load_exam_detail(
    state: &AppState,
    exam_id: &str,
) -> Result<(Exam, Option<Course>, Vec<Question>), ApiError> {
    let exam = require_exam(state, exam_id).await?;
    let course = repositories::courses::find_by_id(state.db(), &exam.course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load course"))?;
    let questions = repositories::questions::list_by_exam(state.db(), exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load questions"))?;
    Ok((exam, course, questions))
}

async fn exam_detail_response(
    state: &AppState,
    exam_id: &str,
    now: time::PrimitiveDateTime,
) -> Result<Json<StudentExamResponse>, ApiError> {
    let (exam, course, questions) = load_exam_detail(state, exam_id).await?;
    Ok(Json(exam_views::build_student_view(
        &exam,
        course.as_ref(),
        &questions,
        true,
        true,
        true,
        now,
    )))
}
