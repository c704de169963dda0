use serde::Deserialize;

use crate::schemas::exam::ExamListResponse;
use crate::services::exam_status::ExamListStatus;

/// Filters for the dashboard list. Status filtering happens after the
/// per-exam status is derived, so it is applied in memory.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListExamsQuery {
    #[serde(default)]
    pub(crate) status: Option<ExamListStatus>,
    #[serde(default)]
    pub(crate) search: Option<String>,
}

impl ListExamsQuery {
    /// Normalized search term: trimmed, lowercased, `None` when blank.
    fn search_needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
    }

    pub(crate) fn matches(&self, view: &ExamListResponse) -> bool {
        if let Some(status) = self.status {
            if view.status != status {
                return false;
            }
        }

        if let Some(needle) = self.search_needle() {
            return view.title.to_lowercase().contains(&needle)
                || view.course_name.to_lowercase().contains(&needle)
                || view.exam_type.to_lowercase().contains(&needle);
        }

        true
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StudentViewQuery {
    #[serde(default = "default_true", alias = "showKnowledgePoint")]
    pub(crate) show_knowledge_point: bool,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_view(status: ExamListStatus) -> ExamListResponse {
        ExamListResponse {
            id: "exam-1".to_string(),
            title: "Midterm Algebra".to_string(),
            course_name: "Linear Algebra".to_string(),
            question_count: 10,
            duration_minutes: 60,
            total_score: 100,
            exam_type: "Quiz".to_string(),
            status,
            publish_time: "2025-05-31 08:30".to_string(),
            participant_count: 3,
            created_at: "2025-05-29T12:00:00Z".to_string(),
        }
    }

    #[test]
    fn list_query_parses_status() {
        let query: ListExamsQuery =
            serde_json::from_value(serde_json::json!({"status": "ONGOING", "search": "mid"}))
                .expect("query");
        assert_eq!(query.status, Some(ExamListStatus::Ongoing));
        assert_eq!(query.search.as_deref(), Some("mid"));
    }

    #[test]
    fn list_query_defaults_empty() {
        let query: ListExamsQuery = serde_json::from_value(serde_json::json!({})).expect("query");
        assert!(query.status.is_none());
        assert!(query.search.is_none());
    }

    #[test]
    fn empty_query_matches_everything() {
        let query = ListExamsQuery::default();
        assert!(query.matches(&sample_view(ExamListStatus::Draft)));
        assert!(query.matches(&sample_view(ExamListStatus::Finished)));
    }

    #[test]
    fn status_filter_applies_to_derived_status() {
        let query =
            ListExamsQuery { status: Some(ExamListStatus::Ongoing), search: None };
        assert!(query.matches(&sample_view(ExamListStatus::Ongoing)));
        assert!(!query.matches(&sample_view(ExamListStatus::Published)));
        assert!(!query.matches(&sample_view(ExamListStatus::Draft)));
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let view = sample_view(ExamListStatus::Published);

        // title
        let query = ListExamsQuery { status: None, search: Some("MIDTERM".to_string()) };
        assert!(query.matches(&view));
        // course name
        let query = ListExamsQuery { status: None, search: Some("linear".to_string()) };
        assert!(query.matches(&view));
        // exam type
        let query = ListExamsQuery { status: None, search: Some("quiz".to_string()) };
        assert!(query.matches(&view));

        let query = ListExamsQuery { status: None, search: Some("chemistry".to_string()) };
        assert!(!query.matches(&view));
    }

    #[test]
    fn blank_search_is_ignored() {
        let view = sample_view(ExamListStatus::Published);
        let query = ListExamsQuery { status: None, search: Some("   ".to_string()) };
        assert!(query.matches(&view));
        let query = ListExamsQuery { status: None, search: Some(String::new()) };
        assert!(query.matches(&view));
    }

    #[test]
    fn status_and_search_combine() {
        let query = ListExamsQuery {
            status: Some(ExamListStatus::Published),
            search: Some("algebra".to_string()),
        };
        assert!(query.matches(&sample_view(ExamListStatus::Published)));
        assert!(!query.matches(&sample_view(ExamListStatus::Ongoing)));
    }

    #[test]
    fn student_view_knowledge_point_defaults_on() {
        let query: StudentViewQuery =
            serde_json::from_value(serde_json::json!({})).expect("query");
        assert!(query.show_knowledge_point);

        let query: StudentViewQuery =
            serde_json::from_value(serde_json::json!({"show_knowledge_point": false}))
                .expect("query");
        assert!(!query.show_knowledge_point);
    }
}
