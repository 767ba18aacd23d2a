//! URL helpers.
//!
//! - Public URL formatting (`base_path`, `public_url`)
//! - Link type detection (external vs local)
//! - Relative reference cleanup (`collapse_parent_segments`)

/// Join a base path and an optional subdirectory with exactly one slash.
///
/// # Examples
/// ```
/// use webhead::utils::path::base_path;
/// assert_eq!(base_path("/app/", Some("webtemp")), "/app/webtemp");
/// assert_eq!(base_path("/app", None), "/app/");
/// ```
pub fn base_path(base: &str, subdir: Option<&str>) -> String {
    format!("{}/{}", base.trim_end_matches('/'), subdir.unwrap_or(""))
}

/// Public URL of a file served from `prefix`.
///
/// # Examples
/// ```
/// use webhead::utils::path::public_url;
/// assert_eq!(public_url("/webtemp/", "site-ab12.css"), "/webtemp/site-ab12.css");
/// assert_eq!(public_url("", "site-ab12.css"), "/site-ab12.css");
/// ```
pub fn public_url(prefix: &str, file_name: &str) -> String {
    base_path(prefix, Some(file_name))
}

/// Check if a link is external (has a URL scheme like http:, data:, etc.)
/// or is protocol-relative (`//cdn.example.com/...`).
///
/// # Examples
/// ```
/// use webhead::utils::path::is_external_link;
/// assert!(is_external_link("https://example.com/app.js"));
/// assert!(is_external_link("data:image/png;base64,AAAA"));
/// assert!(is_external_link("//cdn.example.com/app.js"));
/// assert!(!is_external_link("css/site.css"));
/// ```
#[inline]
pub fn is_external_link(link: &str) -> bool {
    if link.starts_with("//") {
        return true;
    }
    link.find(':').is_some_and(|pos| {
        pos > 1
            && link[..pos]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Collapse `segment/../` pairs in a slash-separated reference.
///
/// Leading `../` segments that have nothing to cancel are kept, `./` is dropped.
///
/// # Examples
/// ```
/// use webhead::utils::path::collapse_parent_segments;
/// assert_eq!(collapse_parent_segments("a/b/../c"), "a/c");
/// assert_eq!(collapse_parent_segments("../../css/../img/x.png"), "../../img/x.png");
/// ```
pub fn collapse_parent_segments(reference: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in reference.split('/') {
        match segment {
            "." => {}
            ".." if segments.last().is_some_and(|s| *s != ".." && !s.is_empty()) => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_path() {
        assert_eq!(base_path("/", Some("webtemp")), "/webtemp");
        assert_eq!(base_path("", None), "/");
        assert_eq!(base_path("https://x.org/app//", Some("a.css")), "https://x.org/app/a.css");
    }

    #[test]
    fn test_is_external_link() {
        assert!(is_external_link("http://example.com"));
        assert!(is_external_link("https://example.com"));
        assert!(is_external_link("data:image/gif;base64,R0lGOD"));
        assert!(!is_external_link("/css/site.css"));
        assert!(!is_external_link("./img/bg.png"));
        // Windows drive letters are local paths
        assert!(!is_external_link("C:/site/css/a.css"));
    }

    #[test]
    fn test_collapse_parent_segments() {
        assert_eq!(collapse_parent_segments("a/b/../c"), "a/c");
        assert_eq!(collapse_parent_segments("a/./b"), "a/b");
        assert_eq!(collapse_parent_segments("../x.png"), "../x.png");
        assert_eq!(collapse_parent_segments("../../a/../../b"), "../../../b");
        assert_eq!(collapse_parent_segments("images/x.png"), "images/x.png");
    }
}
