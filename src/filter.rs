use std::collections::HashSet;

use tracing::{debug, warn};

use crate::model::{DisplayRow, PersonRecord};
use crate::normalization::{
    to_canonical_https_url, to_federated_account_url, to_file_page_url, to_thumbnail_url,
};

/// People who asked not to be listed, as `https://www.wikidata.org/entity/Q…`
/// URLs.
pub const DENY_LIST: &[&str] = &[];

pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 250;

/// Entity URLs excluded from every result set.
#[derive(Debug, Clone, Default)]
pub struct DenyList {
    entries: HashSet<String>,
}

impl DenyList {
    pub fn builtin() -> Self {
        DENY_LIST.iter().copied().collect()
    }

    /// Membership test after upgrading `person_uri` to https.
    pub fn contains(&self, person_uri: &str) -> bool {
        self.entries.contains(&to_canonical_https_url(person_uri))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for DenyList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    pub rows: Vec<DisplayRow>,
    pub denied: u64,
    pub duplicates: u64,
    pub malformed_handles: u64,
}

/// Drops deny-listed people and repeated account handles, then derives
/// presentation links for the survivors. Input order is preserved.
///
/// Handles are compared exactly as supplied, so `@a@h` and `a@h` are
/// distinct accounts here.
pub fn filter_and_dedup(
    records: &[PersonRecord],
    deny_list: &DenyList,
    thumbnail_width: u32,
) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();
    let mut seen_handles: HashSet<&str> = HashSet::new();

    for record in records {
        if deny_list.contains(&record.person_uri) {
            outcome.denied += 1;
            debug!(person = %record.person_uri, "dropped by deny-list");
            continue;
        }

        if let Some(handle) = record.account_handle.as_deref()
            && !seen_handles.insert(handle)
        {
            outcome.duplicates += 1;
            debug!(person = %record.person_uri, handle, "dropped duplicate account");
            continue;
        }

        let row = to_display_row(record, thumbnail_width, &mut outcome.malformed_handles);
        outcome.rows.push(row);
    }

    outcome
}

fn to_display_row(record: &PersonRecord, thumbnail_width: u32, malformed: &mut u64) -> DisplayRow {
    let account_link = record
        .account_handle
        .as_deref()
        .and_then(|handle| match to_federated_account_url(handle) {
            Ok(link) => Some(link),
            Err(error) => {
                *malformed += 1;
                warn!(person = %record.person_uri, %error, "account link omitted");
                None
            }
        });

    let picture = record.picture_uri.as_deref();

    DisplayRow {
        person_uri: record.person_uri.clone(),
        label: record.label.clone(),
        account_handle: record.account_handle.clone(),
        description: record.description.clone(),
        picture_uri: record.picture_uri.clone(),
        profile_link: to_canonical_https_url(&record.person_uri),
        account_link,
        file_page_link: picture.map(to_file_page_url),
        thumbnail_link: picture.map(|uri| to_thumbnail_url(uri, thumbnail_width)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uris(outcome: &FilterOutcome) -> Vec<&str> {
        outcome.rows.iter().map(|row| row.person_uri.as_str()).collect()
    }

    #[test]
    fn drops_later_duplicate_handles() {
        let records = vec![
            PersonRecord::new("u1").with_handle("a@h"),
            PersonRecord::new("u2").with_handle("a@h"),
            PersonRecord::new("u3").with_handle("b@h"),
        ];

        let outcome = filter_and_dedup(&records, &DenyList::default(), 250);

        assert_eq!(uris(&outcome), ["u1", "u3"]);
        assert_eq!(outcome.duplicates, 1);
    }

    #[test]
    fn deny_list_wins_over_uniqueness() {
        let deny: DenyList = ["https://www.wikidata.org/entity/Q1"].into_iter().collect();
        let records = vec![
            PersonRecord::new("http://www.wikidata.org/entity/Q1").with_handle("a@h"),
            PersonRecord::new("http://www.wikidata.org/entity/Q2").with_handle("a@h"),
        ];

        let outcome = filter_and_dedup(&records, &deny, 250);

        // The denied record never claims the handle, so Q2 survives.
        assert_eq!(uris(&outcome), ["http://www.wikidata.org/entity/Q2"]);
        assert_eq!(outcome.denied, 1);
        assert_eq!(outcome.duplicates, 0);
    }

    #[test]
    fn records_without_handle_are_never_deduplicated() {
        let records = vec![
            PersonRecord::new("u1"),
            PersonRecord::new("u1"),
            PersonRecord::new("u2"),
        ];

        let outcome = filter_and_dedup(&records, &DenyList::default(), 250);
        assert_eq!(uris(&outcome), ["u1", "u1", "u2"]);
    }

    #[test]
    fn handles_are_compared_raw() {
        let records = vec![
            PersonRecord::new("u1").with_handle("@a@h"),
            PersonRecord::new("u2").with_handle("a@h"),
        ];

        let outcome = filter_and_dedup(&records, &DenyList::default(), 250);

        assert_eq!(outcome.rows.len(), 2);
        assert_eq!(outcome.rows[0].account_link, outcome.rows[1].account_link);
    }

    #[test]
    fn malformed_handle_keeps_row_without_link() {
        let records = vec![
            PersonRecord::new("u1").with_handle("nobody"),
            PersonRecord::new("u2").with_handle("b@h"),
        ];

        let outcome = filter_and_dedup(&records, &DenyList::default(), 250);

        assert_eq!(outcome.rows.len(), 2);
        assert!(outcome.rows[0].account_link.is_none());
        assert_eq!(outcome.rows[0].account_cell_text(), "nobody");
        assert_eq!(
            outcome.rows[1].account_link.as_deref(),
            Some("https://h/@b")
        );
        assert_eq!(outcome.malformed_handles, 1);
    }

    #[test]
    fn derives_presentation_links() {
        let records = vec![
            PersonRecord::new("http://www.wikidata.org/entity/Q7")
                .with_label("Jane")
                .with_handle("@jane@example.social")
                .with_picture("http://commons.wikimedia.org/wiki/Special:FilePath/Jane.jpg"),
        ];

        let outcome = filter_and_dedup(&records, &DenyList::default(), 120);
        let row = &outcome.rows[0];

        assert_eq!(row.profile_link, "https://www.wikidata.org/entity/Q7");
        assert_eq!(
            row.account_link.as_deref(),
            Some("https://example.social/@jane")
        );
        assert_eq!(
            row.file_page_link.as_deref(),
            Some("https://commons.wikimedia.org/wiki/File:Jane.jpg")
        );
        assert_eq!(
            row.thumbnail_link.as_deref(),
            Some("https://commons.wikimedia.org/w/thumb.php?f=Jane.jpg&w=120")
        );
    }

    #[test]
    fn bare_record_still_renders() {
        let records = vec![PersonRecord::new("u1")];
        let outcome = filter_and_dedup(&records, &DenyList::default(), 250);

        let row = &outcome.rows[0];
        assert!(row.label.is_none());
        assert!(row.description.is_none());
        assert!(row.account_link.is_none());
        assert!(row.thumbnail_link.is_none());
    }

    #[test]
    fn repeated_runs_agree() {
        let deny: DenyList = ["https://e/Q9"].into_iter().collect();
        let records = vec![
            PersonRecord::new("http://e/Q9").with_handle("x@h"),
            PersonRecord::new("u1").with_handle("x@h"),
            PersonRecord::new("u2").with_handle("x@h"),
            PersonRecord::new("u3"),
        ];

        let first = filter_and_dedup(&records, &deny, 250);
        let second = filter_and_dedup(&records, &deny, 250);

        assert_eq!(first, second);
        assert_eq!(uris(&first), ["u1", "u3"]);
    }

    #[test]
    fn builtin_list_matches_constant() {
        assert_eq!(DenyList::builtin().len(), DENY_LIST.len());
    }
}
