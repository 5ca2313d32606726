use url::Url;

/// Parses `value` and accepts it only if it has both a scheme and a host.
pub fn parse_absolute_url(value: &str) -> Option<Url> {
    let url = Url::parse(value).ok()?;
    if url.scheme().is_empty() || url.host_str().is_none_or(str::is_empty) {
        return None;
    }
    Some(url)
}

/// Normalizes a root URL typed on the command line: trimmed, lower-cased and
/// without a trailing slash.
pub fn prepare_root_input(value: &str) -> String {
    let value = value.trim().to_lowercase();
    value.strip_suffix('/').unwrap_or(&value).to_string()
}

/// Turns a URL into something usable as a file name stem: `/` becomes `-`
/// and `:` is dropped.
pub fn sanitize_file_stem(url: &str) -> String {
    url.replace('/', "-").replace(':', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absolute_url() {
        assert!(parse_absolute_url("https://example.com").is_some());
        assert!(parse_absolute_url("http://localhost:8080/a").is_some());
        assert!(parse_absolute_url("example.com").is_none());
        assert!(parse_absolute_url("mailto:someone@example.com").is_none());
        assert!(parse_absolute_url("not a url").is_none());
    }

    #[test]
    fn test_prepare_root_input() {
        assert_eq!(prepare_root_input("  HTTPS://Example.com/ "), "https://example.com");
        assert_eq!(prepare_root_input("https://example.com"), "https://example.com");
    }

    #[test]
    fn test_sanitize_file_stem() {
        assert_eq!(sanitize_file_stem("https://example.com/about"), "https--example.com-about");
        assert_eq!(sanitize_file_stem("http://localhost:8080"), "http--localhost8080");
    }
}
