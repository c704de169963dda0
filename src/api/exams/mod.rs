use axum::routing::{get, post};
use axum::Router;

use crate::core::state::AppState;

mod handlers;
mod queries;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_exam).get(handlers::list_exams))
        .route("/student", get(handlers::list_student_exams))
        .route(
            "/:exam_id",
            get(handlers::get_exam).patch(handlers::update_exam).delete(handlers::delete_exam),
        )
        .route("/:exam_id/publish", post(handlers::publish_exam))
        .route("/:exam_id/publish-with-time", post(handlers::publish_exam_with_time))
        .route("/:exam_id/publish-answers", post(handlers::publish_answers))
        .route("/:exam_id/student-view", get(handlers::student_view))
}
