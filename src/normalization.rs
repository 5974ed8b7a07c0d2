use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::NormalizeError;

pub const THUMBNAIL_SERVICE_URL: &str = "https://commons.wikimedia.org/w/thumb.php";

static ENTITY_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[QPL][0-9]+$").expect("invalid entity id regex"));

const FILE_PATH_SEGMENT: &str = "Special:FilePath/";
const FILE_PAGE_SEGMENT: &str = "File:";

/// Upgrades an `http:` URL to `https:`. Anything else, including malformed
/// input, passes through untouched.
pub fn to_canonical_https_url(url: &str) -> String {
    match url.strip_prefix("http:") {
        Some(rest) => format!("https:{rest}"),
        None => url.to_owned(),
    }
}

/// Turns a `[@]user@host` handle into `https://host/@user`. Anything after a
/// second `@` is ignored.
pub fn to_federated_account_url(handle: &str) -> Result<String, NormalizeError> {
    let trimmed = handle.strip_prefix('@').unwrap_or(handle);
    let mut parts = trimmed.split('@');
    let user = parts.next().unwrap_or_default();
    let Some(host) = parts.next() else {
        return Err(NormalizeError::MalformedHandle {
            handle: handle.to_owned(),
        });
    };

    Ok(format!("https://{host}/@{user}"))
}

pub fn to_file_page_url(file_repo_url: &str) -> String {
    to_canonical_https_url(file_repo_url).replacen(FILE_PATH_SEGMENT, FILE_PAGE_SEGMENT, 1)
}

/// Builds a thumbnail-service URL for the file named by the last path
/// segment of `file_repo_url`. The filename is used as supplied.
pub fn to_thumbnail_url(file_repo_url: &str, width: u32) -> String {
    let filename = last_path_segment(file_repo_url);
    format!("{THUMBNAIL_SERVICE_URL}?f={filename}&w={width}")
}

/// Extracts the entity id (`Q1930187`) from an entity URL. Input without a
/// path separator is returned whole.
pub fn entity_id_from_uri(entity_uri: &str) -> &str {
    last_path_segment(entity_uri.trim())
}

pub fn is_entity_id(value: &str) -> bool {
    ENTITY_ID_RE.is_match(value)
}

fn last_path_segment(value: &str) -> &str {
    match value.rfind('/') {
        Some(idx) => &value[idx + 1..],
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upgrades_insecure_scheme() {
        assert_eq!(to_canonical_https_url("http://x.org/y"), "https://x.org/y");
        assert_eq!(to_canonical_https_url("https://x.org/y"), "https://x.org/y");
        assert_eq!(to_canonical_https_url("x.org/http:y"), "x.org/http:y");
        assert_eq!(to_canonical_https_url("not a url"), "not a url");
    }

    #[test]
    fn account_url_ignores_leading_at() {
        let expected = "https://example.social/@alice";
        assert_eq!(
            to_federated_account_url("@alice@example.social").unwrap(),
            expected
        );
        assert_eq!(
            to_federated_account_url("alice@example.social").unwrap(),
            expected
        );
    }

    #[test]
    fn account_url_ignores_trailing_segments() {
        assert_eq!(to_federated_account_url("a@b@c").unwrap(), "https://b/@a");
        assert_eq!(
            to_federated_account_url("@a@b@c").unwrap(),
            "https://b/@a"
        );
    }

    #[test]
    fn handle_without_separator_is_malformed() {
        let err = to_federated_account_url("@alice").unwrap_err();
        assert!(matches!(
            err,
            NormalizeError::MalformedHandle { ref handle } if handle == "@alice"
        ));
    }

    #[test]
    fn rewrites_file_path_to_file_page() {
        assert_eq!(
            to_file_page_url("http://commons.wikimedia.org/wiki/Special:FilePath/Foo.jpg"),
            "https://commons.wikimedia.org/wiki/File:Foo.jpg"
        );
        assert_eq!(
            to_file_page_url("https://example.org/Foo.jpg"),
            "https://example.org/Foo.jpg"
        );
    }

    #[test]
    fn builds_thumbnail_from_filename() {
        assert_eq!(
            to_thumbnail_url(
                "http://commons.wikimedia.org/wiki/Special:FilePath/Jane%20Doe.jpg",
                250
            ),
            "https://commons.wikimedia.org/w/thumb.php?f=Jane%20Doe.jpg&w=250"
        );
    }

    #[test]
    fn extracts_entity_id() {
        assert_eq!(
            entity_id_from_uri("http://www.wikidata.org/entity/Q1930187"),
            "Q1930187"
        );
        assert_eq!(entity_id_from_uri("Q42"), "Q42");
        assert!(is_entity_id("Q42"));
        assert!(!is_entity_id("journalist"));
    }
}
