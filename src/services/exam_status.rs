use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

/// Lifecycle status shown to students. Derived from the publication flag and
/// the optional time window; `now` is supplied by the caller and read once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum StudentExamStatus {
    Unpublished,
    Upcoming,
    Ongoing,
    Expired,
}

/// Lifecycle status shown on dashboard/list views. Computed separately from
/// [`StudentExamStatus`] with its own branch table; the two vocabularies are
/// not interchangeable and may disagree for the same exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum ExamListStatus {
    Draft,
    Published,
    Ongoing,
    Finished,
}

pub(crate) fn student_status(
    is_published: bool,
    start_time: Option<PrimitiveDateTime>,
    end_time: Option<PrimitiveDateTime>,
    now: PrimitiveDateTime,
) -> StudentExamStatus {
    if !is_published {
        return StudentExamStatus::Unpublished;
    }

    match (start_time, end_time) {
        (Some(start), Some(end)) => {
            if now < start {
                StudentExamStatus::Upcoming
            } else if now > end {
                StudentExamStatus::Expired
            } else {
                StudentExamStatus::Ongoing
            }
        }
        // No end bound: an exam that has started never expires.
        (Some(start), None) => {
            if now < start {
                StudentExamStatus::Upcoming
            } else {
                StudentExamStatus::Ongoing
            }
        }
        // No start bound: takeable right away until the end passes.
        (None, Some(end)) => {
            if now > end {
                StudentExamStatus::Expired
            } else {
                StudentExamStatus::Ongoing
            }
        }
        (None, None) => StudentExamStatus::Ongoing,
    }
}

/// Sole gate for taking an exam. Submission exclusion and other checks are
/// the caller's concern.
pub(crate) fn can_take_exam(
    is_published: bool,
    start_time: Option<PrimitiveDateTime>,
    end_time: Option<PrimitiveDateTime>,
    now: PrimitiveDateTime,
) -> bool {
    is_published && student_status(is_published, start_time, end_time, now) == StudentExamStatus::Ongoing
}

/// List-view status. Unlike the student-facing derivation this never yields
/// `Ongoing` unless both bounds are set; a published exam with an open window
/// stays `Published`.
pub(crate) fn list_status(
    is_published: bool,
    start_time: Option<PrimitiveDateTime>,
    end_time: Option<PrimitiveDateTime>,
    now: PrimitiveDateTime,
) -> ExamListStatus {
    if !is_published {
        return ExamListStatus::Draft;
    }

    match (start_time, end_time) {
        (Some(start), Some(end)) => {
            if now < start {
                ExamListStatus::Published
            } else if now > end {
                ExamListStatus::Finished
            } else {
                ExamListStatus::Ongoing
            }
        }
        _ => ExamListStatus::Published,
    }
}

/// A window is acceptable when either bound is absent or the bounds are in
/// order. Half-open and fully open windows are valid states, not errors.
pub(crate) fn window_is_ordered(
    start_time: Option<PrimitiveDateTime>,
    end_time: Option<PrimitiveDateTime>,
) -> bool {
    match (start_time, end_time) {
        (Some(start), Some(end)) => start <= end,
        _ => true,
    }
}
