use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::LookupError;
use crate::export::export_display_rows;
use crate::filter::{DenyList, filter_and_dedup};
use crate::model::DisplayRow;
use crate::query::QueryClient;
use crate::sink::{ControlsGuard, PresentationSink};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LookupMetrics {
    pub raw_records: u64,
    pub denied: u64,
    pub duplicates: u64,
    pub malformed_handles: u64,
    pub rendered_rows: u64,
    pub elapsed_ms: u128,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the table with people of this profession (entity URL or id).
    Lookup { profession: String },
    RemoveRow { index: usize },
    /// Remove the first row whose account cell reads `address`.
    RemoveAccount { address: String },
    Export,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Lookup(LookupMetrics),
    Removed(Option<DisplayRow>),
    Csv(String),
}

/// Runs one lookup against `sink`. Previous rows and errors are cleared up
/// front; on failure nothing is rendered. Controls are re-enabled on every
/// exit.
#[tracing::instrument(skip(client, sink, deny_list))]
pub fn run_lookup<C, S>(
    client: &C,
    sink: &mut S,
    deny_list: &DenyList,
    profession: &str,
    thumbnail_width: u32,
) -> Result<LookupMetrics, LookupError>
where
    C: QueryClient + ?Sized,
    S: PresentationSink + ?Sized,
{
    let started = Instant::now();

    sink.clear_error();
    sink.clear();

    let mut guard = ControlsGuard::engage(sink);

    let records = match client.fetch_people(profession) {
        Ok(records) => records,
        Err(error) => {
            warn!(%error, "lookup failed");
            guard.show_error(&error);
            return Err(error);
        }
    };

    let outcome = filter_and_dedup(&records, deny_list, thumbnail_width);
    let metrics = LookupMetrics {
        raw_records: records.len() as u64,
        denied: outcome.denied,
        duplicates: outcome.duplicates,
        malformed_handles: outcome.malformed_handles,
        rendered_rows: outcome.rows.len() as u64,
        elapsed_ms: started.elapsed().as_millis(),
    };

    guard.render(outcome.rows);
    drop(guard);

    info!(
        raw_records = metrics.raw_records,
        denied = metrics.denied,
        duplicates = metrics.duplicates,
        malformed_handles = metrics.malformed_handles,
        rendered_rows = metrics.rendered_rows,
        elapsed_ms = metrics.elapsed_ms,
        "lookup complete"
    );

    Ok(metrics)
}

/// Owns the collaborators of a session and applies commands to them one at
/// a time.
pub struct Orchestrator<C, S> {
    client: C,
    sink: S,
    deny_list: DenyList,
    thumbnail_width: u32,
}

impl<C: QueryClient, S: PresentationSink> Orchestrator<C, S> {
    pub fn new(client: C, sink: S, deny_list: DenyList, thumbnail_width: u32) -> Self {
        Self {
            client,
            sink,
            deny_list,
            thumbnail_width,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn dispatch(&mut self, command: Command) -> Result<CommandOutcome, LookupError> {
        match command {
            Command::Lookup { profession } => run_lookup(
                &self.client,
                &mut self.sink,
                &self.deny_list,
                &profession,
                self.thumbnail_width,
            )
            .map(CommandOutcome::Lookup),
            Command::RemoveRow { index } => {
                let removed = self.sink.remove_row(index);
                debug!(index, removed = removed.is_some(), "row removal");
                Ok(CommandOutcome::Removed(removed))
            }
            Command::RemoveAccount { address } => {
                let index = self
                    .sink
                    .rows()
                    .iter()
                    .position(|row| row.account_cell_text() == address);
                let removed = index.and_then(|index| self.sink.remove_row(index));
                if removed.is_none() {
                    warn!(address = %address, "no visible row has this account");
                }
                Ok(CommandOutcome::Removed(removed))
            }
            Command::Export => Ok(CommandOutcome::Csv(export_display_rows(self.sink.rows()))),
        }
    }
}
