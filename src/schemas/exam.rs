use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use time::{
    format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime,
    PrimitiveDateTime,
};
use validator::Validate;

use crate::services::exam_status::{ExamListStatus, StudentExamStatus};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuestionCreate {
    #[serde(alias = "type", alias = "questionType")]
    #[validate(length(min = 1, message = "question_type must not be empty"))]
    pub(crate) question_type: String,
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub(crate) content: String,
    /// Raw option payload as stored: a JSON array of strings, or
    /// newline-separated text. Decoded only when projecting.
    #[serde(default)]
    pub(crate) options: Option<String>,
    #[validate(length(min = 1, message = "answer must not be empty"))]
    pub(crate) answer: String,
    #[serde(default)]
    pub(crate) explanation: Option<String>,
    #[validate(range(min = 0, message = "score must be non-negative"))]
    pub(crate) score: i32,
    #[serde(default)]
    #[serde(alias = "knowledgePoint")]
    pub(crate) knowledge_point: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ExamCreate {
    #[serde(alias = "courseId")]
    #[validate(length(min = 1, message = "course_id must not be empty"))]
    pub(crate) course_id: String,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[validate(length(min = 1, message = "chapter must not be empty"))]
    pub(crate) chapter: String,
    #[serde(alias = "examType")]
    #[validate(length(min = 1, message = "exam_type must not be empty"))]
    pub(crate) exam_type: String,
    #[serde(alias = "durationMinutes", alias = "duration")]
    #[validate(range(min = 1, message = "duration_minutes must be positive"))]
    pub(crate) duration_minutes: i32,
    #[serde(alias = "totalScore")]
    #[validate(range(min = 1, message = "total_score must be positive"))]
    pub(crate) total_score: i32,
    #[serde(
        default,
        alias = "startTime",
        deserialize_with = "deserialize_option_offset_datetime_flexible"
    )]
    pub(crate) start_time: Option<OffsetDateTime>,
    #[serde(
        default,
        alias = "endTime",
        deserialize_with = "deserialize_option_offset_datetime_flexible"
    )]
    pub(crate) end_time: Option<OffsetDateTime>,
    #[serde(default)]
    #[validate(nested)]
    pub(crate) questions: Vec<QuestionCreate>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ExamUpdate {
    #[serde(default)]
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) chapter: Option<String>,
    #[serde(default, alias = "examType")]
    pub(crate) exam_type: Option<String>,
    #[serde(default, alias = "durationMinutes", alias = "duration")]
    #[validate(range(min = 1, message = "duration_minutes must be positive"))]
    pub(crate) duration_minutes: Option<i32>,
    #[serde(default, alias = "totalScore")]
    #[validate(range(min = 1, message = "total_score must be positive"))]
    pub(crate) total_score: Option<i32>,
}

/// Body for scheduled publication. Both bounds are independently optional;
/// an omitted bound leaves that side of the window open.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PublishWindowRequest {
    #[serde(
        default,
        alias = "startTime",
        deserialize_with = "deserialize_option_offset_datetime_flexible"
    )]
    pub(crate) start_time: Option<OffsetDateTime>,
    #[serde(
        default,
        alias = "endTime",
        deserialize_with = "deserialize_option_offset_datetime_flexible"
    )]
    pub(crate) end_time: Option<OffsetDateTime>,
}

/// Question as disclosed to students. `answer`, `explanation` and
/// `knowledge_point` are omitted from the payload entirely when the
/// corresponding disclosure gate is closed. The grading fields at the tail
/// are never filled by this service; a grading pass populates them after
/// submission evaluation.
#[derive(Debug, Serialize)]
pub(crate) struct StudentQuestionResponse {
    pub(crate) id: String,
    pub(crate) question_type: String,
    pub(crate) content: String,
    pub(crate) options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) explanation: Option<String>,
    pub(crate) score: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) knowledge_point: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) student_answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) student_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) is_correct: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) teacher_feedback: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentExamResponse {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) course_name: Option<String>,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) chapter: String,
    pub(crate) exam_type: String,
    pub(crate) duration_minutes: i32,
    pub(crate) total_score: i32,
    pub(crate) start_time: Option<String>,
    pub(crate) end_time: Option<String>,
    pub(crate) is_published: bool,
    pub(crate) is_answer_published: bool,
    pub(crate) published_at: Option<String>,
    pub(crate) exam_status: StudentExamStatus,
    pub(crate) can_take_exam: bool,
    pub(crate) total_questions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) questions: Option<Vec<StudentQuestionResponse>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExamListResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) course_name: String,
    pub(crate) question_count: i64,
    pub(crate) duration_minutes: i32,
    pub(crate) total_score: i32,
    pub(crate) exam_type: String,
    pub(crate) status: ExamListStatus,
    pub(crate) publish_time: String,
    pub(crate) participant_count: i64,
    pub(crate) created_at: String,
}

fn parse_offset_datetime_flexible(raw: &str) -> Option<OffsetDateTime> {
    if let Ok(value) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(value);
    }

    // Frontend's datetime-local often sends without timezone.
    if raw.len() == 16 && raw.as_bytes().get(10) == Some(&b'T') {
        let candidate = format!("{raw}:00Z");
        if let Ok(value) = OffsetDateTime::parse(&candidate, &Rfc3339) {
            return Some(value);
        }
    }

    if raw.len() == 19 && raw.as_bytes().get(10) == Some(&b'T') {
        let candidate = format!("{raw}Z");
        if let Ok(value) = OffsetDateTime::parse(&candidate, &Rfc3339) {
            return Some(value);
        }
    }

    // Fallback for explicit format "YYYY-MM-DDTHH:MM[:SS]"
    if let Ok(value) =
        PrimitiveDateTime::parse(raw, &format_description!("[year]-[month]-[day]T[hour]:[minute]"))
    {
        return Some(value.assume_utc());
    }
    if let Ok(value) = PrimitiveDateTime::parse(
        raw,
        &format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    ) {
        return Some(value.assume_utc());
    }

    None
}

fn deserialize_option_offset_datetime_flexible<'de, D>(
    deserializer: D,
) -> Result<Option<OffsetDateTime>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        Some(value) => parse_offset_datetime_flexible(&value)
            .ok_or_else(|| D::Error::custom(format!("invalid datetime: {value}")))
            .map(Some),
        None => Ok(None),
    }
}
