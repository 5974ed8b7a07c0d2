use serde::Deserialize;

/// One occupation from the static catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Profession {
    #[serde(rename = "item")]
    pub entity_id: String,
    #[serde(rename = "itemLabel")]
    pub label: String,
    pub count: u64,
}

impl Profession {
    pub fn display_text(&self) -> String {
        format!("{} ({})", self.label, self.count)
    }
}

/// A person as returned by the knowledge-graph query, before filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonRecord {
    pub person_uri: String,
    pub label: Option<String>,
    pub account_handle: Option<String>,
    pub picture_uri: Option<String>,
    pub description: Option<String>,
}

impl PersonRecord {
    pub fn new(person_uri: impl Into<String>) -> Self {
        Self {
            person_uri: person_uri.into(),
            ..Self::default()
        }
    }

    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.account_handle = Some(handle.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_picture(mut self, picture_uri: impl Into<String>) -> Self {
        self.picture_uri = Some(picture_uri.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A record that survived filtering, with its presentation links derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub person_uri: String,
    pub label: Option<String>,
    pub account_handle: Option<String>,
    pub description: Option<String>,
    pub picture_uri: Option<String>,
    pub profile_link: String,
    pub account_link: Option<String>,
    pub file_page_link: Option<String>,
    pub thumbnail_link: Option<String>,
}

impl DisplayRow {
    /// Text shown in the account cell; this is what the CSV export reads.
    pub fn account_cell_text(&self) -> &str {
        self.account_handle.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    pub results: QueryResults,
}

#[derive(Debug, Deserialize)]
pub struct QueryResults {
    pub bindings: Vec<Binding>,
}

#[derive(Debug, Deserialize)]
pub struct Term {
    pub value: String,
}

/// One result row of the fixed person query.
#[derive(Debug, Deserialize)]
pub struct Binding {
    pub person: Term,
    #[serde(rename = "personLabel")]
    pub person_label: Option<Term>,
    #[serde(rename = "mastodonName")]
    pub mastodon_name: Option<Term>,
    pub pic: Option<Term>,
    #[serde(rename = "personDescription")]
    pub person_description: Option<Term>,
}

impl From<Binding> for PersonRecord {
    fn from(binding: Binding) -> Self {
        Self {
            person_uri: binding.person.value,
            label: binding.person_label.map(|term| term.value),
            account_handle: binding.mastodon_name.map(|term| term.value),
            picture_uri: binding.pic.map(|term| term.value),
            description: binding.person_description.map(|term| term.value),
        }
    }
}

impl QueryResponse {
    pub fn into_records(self) -> Vec<PersonRecord> {
        self.results
            .bindings
            .into_iter()
            .map(PersonRecord::from)
            .collect()
    }
}
