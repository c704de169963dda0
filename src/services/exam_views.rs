use time::PrimitiveDateTime;

use crate::core::time::{format_primitive, format_publish_time};
use crate::db::models::{Course, Exam, Question};
use crate::repositories::exams::ExamListRow;
use crate::schemas::exam::{ExamListResponse, StudentExamResponse, StudentQuestionResponse};
use crate::services::exam_status::{can_take_exam, list_status, student_status};
use crate::services::options::decode_options;

/// Rendered in place of a publish timestamp for exams that were never
/// published.
pub(crate) const NOT_PUBLISHED_PLACEHOLDER: &str = "Not published";

/// Projects a question for student consumption. Answer and explanation are
/// carried only when `show_answers` holds; the knowledge point only when
/// `show_knowledge_point` holds. Grading fields stay unset here.
pub(crate) fn question_view(
    question: &Question,
    show_answers: bool,
    show_knowledge_point: bool,
) -> StudentQuestionResponse {
    StudentQuestionResponse {
        id: question.id.clone(),
        question_type: question.question_type.clone(),
        content: question.content.clone(),
        options: decode_options(question.options.as_deref()),
        answer: show_answers.then(|| question.answer.clone()),
        explanation: if show_answers { question.explanation.clone() } else { None },
        score: question.score,
        knowledge_point: if show_knowledge_point {
            question.knowledge_point.clone()
        } else {
            None
        },
        student_answer: None,
        student_score: None,
        is_correct: None,
        teacher_feedback: None,
    }
}

pub(crate) fn build_student_view(
    exam: &Exam,
    course: Option<&Course>,
    questions: &[Question],
    include_questions: bool,
    show_answers: bool,
    show_knowledge_point: bool,
    now: PrimitiveDateTime,
) -> StudentExamResponse {
    let status = student_status(exam.is_published, exam.start_time, exam.end_time, now);

    StudentExamResponse {
        id: exam.id.clone(),
        course_id: exam.course_id.clone(),
        course_name: course.map(|course| course.name.clone()),
        title: exam.title.clone(),
        description: exam.description.clone(),
        chapter: exam.chapter.clone(),
        exam_type: exam.exam_type.clone(),
        duration_minutes: exam.duration_minutes,
        total_score: exam.total_score,
        start_time: exam.start_time.map(format_primitive),
        end_time: exam.end_time.map(format_primitive),
        is_published: exam.is_published,
        is_answer_published: exam.is_answer_published,
        published_at: exam.published_at.map(format_primitive),
        exam_status: status,
        can_take_exam: can_take_exam(exam.is_published, exam.start_time, exam.end_time, now),
        total_questions: questions.len(),
        questions: include_questions.then(|| {
            questions
                .iter()
                .map(|question| question_view(question, show_answers, show_knowledge_point))
                .collect()
        }),
    }
}

pub(crate) fn build_list_view(
    row: &ExamListRow,
    participant_count: i64,
    now: PrimitiveDateTime,
) -> ExamListResponse {
    let publish_time = match (row.is_published, row.published_at) {
        (true, Some(published_at)) => format_publish_time(published_at),
        _ => NOT_PUBLISHED_PLACEHOLDER.to_string(),
    };

    ExamListResponse {
        id: row.id.clone(),
        title: row.title.clone(),
        course_name: row.course_name.clone(),
        question_count: row.question_count,
        duration_minutes: row.duration_minutes,
        total_score: row.total_score,
        exam_type: row.exam_type.clone(),
        status: list_status(row.is_published, row.start_time, row.end_time, now),
        publish_time,
        participant_count,
        created_at: format_primitive(row.created_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::exam_status::{ExamListStatus, StudentExamStatus};
    use time::macros::datetime;
    use time::Duration;

    const T: PrimitiveDateTime = datetime!(2025-06-01 09:00:00);

    fn sample_exam() -> Exam {
        Exam {
            id: "exam-1".to_string(),
            course_id: "course-1".to_string(),
            title: "Midterm".to_string(),
            description: Some("Chapters 1-3".to_string()),
            chapter: "3".to_string(),
            exam_type: "midterm".to_string(),
            duration_minutes: 60,
            total_score: 100,
            start_time: Some(T),
            end_time: Some(T + Duration::minutes(60)),
            is_published: true,
            is_answer_published: false,
            published_at: Some(T - Duration::days(1)),
            created_at: T - Duration::days(2),
            updated_at: T - Duration::days(1),
        }
    }

    fn sample_question() -> Question {
        Question {
            id: "q-1".to_string(),
            exam_id: "exam-1".to_string(),
            question_type: "choice".to_string(),
            content: "Pick one".to_string(),
            options: Some(r#"["A","B","C"]"#.to_string()),
            answer: "A".to_string(),
            explanation: Some("Because A".to_string()),
            score: 5,
            knowledge_point: Some("unit-3".to_string()),
            order_index: 1,
            created_at: T - Duration::days(2),
        }
    }

    #[test]
    fn answers_hidden_unless_disclosed() {
        let question = sample_question();

        let hidden = question_view(&question, false, true);
        assert!(hidden.answer.is_none());
        assert!(hidden.explanation.is_none());

        let shown = question_view(&question, true, true);
        assert_eq!(shown.answer.as_deref(), Some("A"));
        assert_eq!(shown.explanation.as_deref(), Some("Because A"));
    }

    #[test]
    fn hidden_answer_is_absent_from_json_not_null() {
        let question = sample_question();
        let value = serde_json::to_value(question_view(&question, false, true)).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("answer"));
        assert!(!object.contains_key("explanation"));
        assert!(!object.contains_key("student_answer"));
        assert!(!object.contains_key("teacher_feedback"));
    }

    #[test]
    fn knowledge_point_follows_its_own_flag() {
        let question = sample_question();
        assert!(question_view(&question, true, false).knowledge_point.is_none());
        assert_eq!(
            question_view(&question, false, true).knowledge_point.as_deref(),
            Some("unit-3")
        );
    }

    #[test]
    fn options_are_decoded_into_the_view() {
        let mut question = sample_question();
        let view = question_view(&question, false, true);
        assert_eq!(view.options, vec!["A", "B", "C"]);

        question.options = Some("yes\nno".to_string());
        let view = question_view(&question, false, true);
        assert_eq!(view.options, vec!["yes", "no"]);

        question.options = None;
        assert!(question_view(&question, false, true).options.is_empty());
    }

    #[test]
    fn student_view_mid_window_is_takeable() {
        let exam = sample_exam();
        let questions = vec![sample_question()];
        let view = build_student_view(
            &exam,
            None,
            &questions,
            true,
            false,
            true,
            T + Duration::minutes(30),
        );

        assert_eq!(view.exam_status, StudentExamStatus::Ongoing);
        assert!(view.can_take_exam);
        assert_eq!(view.total_questions, 1);
        let nested = view.questions.expect("questions included");
        assert!(nested[0].answer.is_none());
    }

    #[test]
    fn student_view_after_window_is_expired() {
        let exam = sample_exam();
        let view =
            build_student_view(&exam, None, &[], false, false, true, T + Duration::minutes(61));
        assert_eq!(view.exam_status, StudentExamStatus::Expired);
        assert!(!view.can_take_exam);
        assert!(view.questions.is_none());
    }

    #[test]
    fn student_view_never_leaks_answers_when_closed() {
        let exam = sample_exam();
        let questions = vec![sample_question()];
        let view = build_student_view(&exam, None, &questions, true, false, true, T);
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("Because A"));
        assert!(!json.contains("\"answer\""));
    }

    fn sample_row() -> ExamListRow {
        ExamListRow {
            id: "exam-1".to_string(),
            title: "Midterm".to_string(),
            course_name: "Algebra".to_string(),
            question_count: 12,
            duration_minutes: 60,
            total_score: 100,
            exam_type: "midterm".to_string(),
            start_time: Some(T),
            end_time: Some(T + Duration::minutes(60)),
            is_published: true,
            published_at: Some(datetime!(2025-05-31 08:30:00)),
            created_at: T - Duration::days(2),
        }
    }

    #[test]
    fn list_view_formats_publish_time() {
        let view = build_list_view(&sample_row(), 7, T + Duration::minutes(30));
        assert_eq!(view.status, ExamListStatus::Ongoing);
        assert_eq!(view.publish_time, "2025-05-31 08:30");
        assert_eq!(view.participant_count, 7);
    }

    #[test]
    fn list_view_placeholder_for_unpublished() {
        let mut row = sample_row();
        row.is_published = false;
        row.published_at = None;
        let view = build_list_view(&row, 0, T);
        assert_eq!(view.status, ExamListStatus::Draft);
        assert_eq!(view.publish_time, NOT_PUBLISHED_PLACEHOLDER);
    }

    // Published exam, window T..T+60: both projections agree mid-window and
    // after expiry, but via different vocabularies.
    #[test]
    fn scenario_mid_window_and_after_expiry() {
        let exam = sample_exam();
        let row = sample_row();

        let student = build_student_view(&exam, None, &[], false, false, true, T + Duration::minutes(30));
        let list = build_list_view(&row, 0, T + Duration::minutes(30));
        assert_eq!(student.exam_status, StudentExamStatus::Ongoing);
        assert!(student.can_take_exam);
        assert_eq!(list.status, ExamListStatus::Ongoing);

        let student = build_student_view(&exam, None, &[], false, false, true, T + Duration::minutes(61));
        let list = build_list_view(&row, 0, T + Duration::minutes(61));
        assert_eq!(student.exam_status, StudentExamStatus::Expired);
        assert_eq!(list.status, ExamListStatus::Finished);
    }
}
