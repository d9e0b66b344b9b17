//! Endpoint URL helpers
//!
//! The chat proxy is addressed by a base URL (`http://localhost:5000`) to which
//! endpoint paths such as `api/chat` are appended.

/// Normalize a base URL by removing trailing slashes
///
/// ```
/// use parley::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:5000/"), "http://localhost:5000");
/// assert_eq!(normalize_base_url("http://localhost:5000///"), "http://localhost:5000");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path with exactly one slash between them
///
/// ```
/// use parley::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:5000/", "/api/chat"),
///     "http://localhost:5000/api/chat"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

/// Check that a user-supplied endpoint is an absolute http(s) URL and return
/// it normalized.
pub fn validate_endpoint(raw: &str) -> Result<String, String> {
    let normalized = normalize_base_url(raw);
    let rest = normalized
        .strip_prefix("http://")
        .or_else(|| normalized.strip_prefix("https://"))
        .ok_or_else(|| format!("Endpoint must start with http:// or https://: {raw}"))?;

    if rest.is_empty() || rest.starts_with('/') {
        return Err(format!("Endpoint is missing a host: {raw}"));
    }
    if rest.chars().any(char::is_whitespace) {
        return Err(format!("Endpoint must not contain whitespace: {raw}"));
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_trailing_slashes_and_space() {
        assert_eq!(
            normalize_base_url(" http://localhost:5000/ "),
            "http://localhost:5000"
        );
        assert_eq!(
            normalize_base_url("https://chat.example.com/proxy//"),
            "https://chat.example.com/proxy"
        );
        assert_eq!(normalize_base_url(""), "");
        assert_eq!(normalize_base_url("///"), "");
    }

    #[test]
    fn construct_handles_slashes_on_both_sides() {
        assert_eq!(
            construct_api_url("http://localhost:5000", "api/chat"),
            "http://localhost:5000/api/chat"
        );
        assert_eq!(
            construct_api_url("https://chat.example.com/proxy/", "/api/chat"),
            "https://chat.example.com/proxy/api/chat"
        );
    }

    #[test]
    fn validate_accepts_http_and_https() {
        assert_eq!(
            validate_endpoint("http://127.0.0.1:5000/").unwrap(),
            "http://127.0.0.1:5000"
        );
        assert_eq!(
            validate_endpoint("https://chat.example.com").unwrap(),
            "https://chat.example.com"
        );
    }

    #[test]
    fn validate_rejects_bad_endpoints() {
        assert!(validate_endpoint("localhost:5000").is_err());
        assert!(validate_endpoint("ftp://example.com").is_err());
        assert!(validate_endpoint("http://").is_err());
        assert!(validate_endpoint("http://exa mple.com").is_err());
    }
}
