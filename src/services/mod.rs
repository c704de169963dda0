pub(crate) mod exam_status;
pub(crate) mod exam_views;
pub(crate) mod options;
