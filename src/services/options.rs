/// Decodes a question's stored option payload into an ordered option list.
///
/// Well-formed rows store a JSON array of strings and are returned verbatim.
/// Anything else is treated as newline-separated text, one option per line,
/// with segments preserved literally: a trailing newline yields a trailing
/// empty option. Malformed payloads never error.
pub(crate) fn decode_options(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    if raw.is_empty() {
        return Vec::new();
    }

    if let Ok(parsed) = serde_json::from_str::<Vec<String>>(raw) {
        return parsed;
    }

    raw.split('\n').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_payload_is_empty() {
        assert!(decode_options(None).is_empty());
    }

    #[test]
    fn empty_payload_is_empty() {
        assert!(decode_options(Some("")).is_empty());
    }

    #[test]
    fn json_array_returned_in_order() {
        assert_eq!(decode_options(Some(r#"["A","B","C"]"#)), vec!["A", "B", "C"]);
    }

    #[test]
    fn non_json_falls_back_to_line_split() {
        assert_eq!(decode_options(Some("A\nB\nC")), vec!["A", "B", "C"]);
    }

    #[test]
    fn json_array_of_mixed_types_falls_back() {
        // Not an array of strings, so the textual fallback applies to the raw text.
        assert_eq!(decode_options(Some(r#"["A",1]"#)), vec![r#"["A",1]"#]);
    }

    #[test]
    fn fallback_preserves_literal_segments() {
        assert_eq!(decode_options(Some("  A \n\nB")), vec!["  A ", "", "B"]);
    }

    #[test]
    fn trailing_newline_keeps_trailing_empty_segment() {
        assert_eq!(decode_options(Some("A\nB\n")), vec!["A", "B", ""]);
    }

    #[test]
    fn single_line_text_is_one_option() {
        assert_eq!(decode_options(Some("true or false")), vec!["true or false"]);
    }
}
