/// Convert a URL to a sanitized filename
pub fn sanitize_filename(url: &str) -> String {
    // Remove protocol and replace invalid filename characters
    let mut name = url.replace("http://", "").replace("https://", "");
    name = name.replace(['/', ':', '?', '&', '=', '#', '%', '\\', '*', '"', '<', '>', '|'], "_");
    let name = name.trim_end_matches('_');

    // Limit filename length on a char boundary
    name.chars().take(100).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("https://example.com/"), "example.com");
        assert_eq!(
            sanitize_filename("http://example.com/a?b=c#d"),
            "example.com_a_b_c_d"
        );
    }

    #[test]
    fn test_sanitize_filename_length_limit() {
        let long = format!("https://example.com/{}", "é".repeat(200));
        assert_eq!(sanitize_filename(&long).chars().count(), 100);
    }
}
