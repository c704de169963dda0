use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::PrimitiveDateTime;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Course {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) course_code: String,
    pub(crate) description: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// `start_time` and `end_time` are independently nullable: an exam may be
/// published with no window, only a start, only an end, or both.
/// `is_answer_published` is deliberately not tied to `is_published`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Exam {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) chapter: String,
    pub(crate) exam_type: String,
    pub(crate) duration_minutes: i32,
    pub(crate) total_score: i32,
    pub(crate) start_time: Option<PrimitiveDateTime>,
    pub(crate) end_time: Option<PrimitiveDateTime>,
    pub(crate) is_published: bool,
    pub(crate) is_answer_published: bool,
    pub(crate) published_at: Option<PrimitiveDateTime>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// `options` holds the raw encoded payload as stored: a JSON array of
/// strings for well-formed rows, otherwise free text.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Question {
    pub(crate) id: String,
    pub(crate) exam_id: String,
    pub(crate) question_type: String,
    pub(crate) content: String,
    pub(crate) options: Option<String>,
    pub(crate) answer: String,
    pub(crate) explanation: Option<String>,
    pub(crate) score: i32,
    pub(crate) knowledge_point: Option<String>,
    pub(crate) order_index: i32,
    pub(crate) created_at: PrimitiveDateTime,
}
