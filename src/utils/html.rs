//! HTML escaping utilities.

/// Escape HTML special characters for safe rendering.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(html_escape("Student has many Enrollments"), "Student has many Enrollments");
    }

    #[test]
    fn test_model_markup_is_neutralised() {
        assert_eq!(
            html_escape("<b>Course</b> & \"Section\""),
            "&lt;b&gt;Course&lt;/b&gt; &amp; &quot;Section&quot;"
        );
    }

    #[test]
    fn test_ampersand_escaped_once() {
        assert_eq!(html_escape("&lt;"), "&amp;lt;");
    }
}
