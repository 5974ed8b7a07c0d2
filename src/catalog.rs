use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use deunicode::deunicode;
use tracing::debug;

use crate::model::Profession;
use crate::normalization::{entity_id_from_uri, is_entity_id};

/// The selectable occupations, sorted by label with one entry per label
/// and per entity id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    professions: Vec<Profession>,
}

impl Catalog {
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog {}", path.display()))?;
        let parsed: Vec<Profession> = serde_json::from_str(&raw)
            .with_context(|| format!("invalid catalog JSON in {}", path.display()))?;
        Ok(Self::from_professions(parsed))
    }

    /// Sorts alphabetically (ties keep catalog order) and keeps the first
    /// entry for each label and for each entity id.
    pub fn from_professions(mut professions: Vec<Profession>) -> Self {
        let loaded = professions.len();
        professions.sort_by(|a, b| compare_labels(&a.label, &b.label));

        let mut seen_labels = HashSet::new();
        let mut seen_ids = HashSet::new();
        professions.retain(|profession| {
            let id = entity_id_from_uri(&profession.entity_id).to_owned();
            if seen_labels.contains(&profession.label) || seen_ids.contains(&id) {
                return false;
            }
            seen_labels.insert(profession.label.clone());
            seen_ids.insert(id);
            true
        });

        debug!(
            loaded,
            kept = professions.len(),
            "profession catalog loaded"
        );

        Self { professions }
    }

    pub fn professions(&self) -> &[Profession] {
        &self.professions
    }

    pub fn is_empty(&self) -> bool {
        self.professions.is_empty()
    }

    /// Looks up by label, entity id (`Q1930187`), or full entity URL.
    pub fn find(&self, query: &str) -> Option<&Profession> {
        let query = query.trim();
        if is_entity_id(query) || query.contains('/') {
            let wanted = entity_id_from_uri(query);
            return self
                .professions
                .iter()
                .find(|profession| entity_id_from_uri(&profession.entity_id) == wanted);
        }

        self.professions
            .iter()
            .find(|profession| profession.label == query)
            .or_else(|| {
                self.professions
                    .iter()
                    .find(|profession| profession.label.eq_ignore_ascii_case(query))
            })
    }

    /// The preselected entry: `label` when present, otherwise the first one.
    pub fn default_selection(&self, label: &str) -> Option<&Profession> {
        self.professions
            .iter()
            .find(|profession| profession.label == label)
            .or_else(|| self.professions.first())
    }
}

fn compare_labels(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
}

fn collation_key(label: &str) -> String {
    deunicode(label).to_lowercase()
}
