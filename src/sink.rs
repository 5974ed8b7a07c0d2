//! Where lookup results end up.
//!
//! The orchestrator only talks to a [`PresentationSink`]; the CLI uses the
//! in-memory [`TableSink`] and renders it as text or HTML afterwards.

use std::fmt::Write as _;
use std::ops::{Deref, DerefMut};

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::error::LookupError;
use crate::model::DisplayRow;

pub trait PresentationSink {
    fn set_controls_enabled(&mut self, enabled: bool);
    fn set_loading(&mut self, loading: bool);
    fn show_error(&mut self, error: &LookupError);
    fn clear_error(&mut self);
    /// Drops every rendered row.
    fn clear(&mut self);
    fn render(&mut self, rows: Vec<DisplayRow>);
    fn rows(&self) -> &[DisplayRow];
    fn remove_row(&mut self, index: usize) -> Option<DisplayRow>;
}

/// Disables the controls for as long as it lives. Dropping it re-enables
/// them, whichever way the lookup ends.
pub struct ControlsGuard<'a, S: PresentationSink + ?Sized> {
    sink: &'a mut S,
}

impl<'a, S: PresentationSink + ?Sized> ControlsGuard<'a, S> {
    pub fn engage(sink: &'a mut S) -> Self {
        sink.set_controls_enabled(false);
        sink.set_loading(true);
        Self { sink }
    }
}

impl<S: PresentationSink + ?Sized> Deref for ControlsGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.sink
    }
}

impl<S: PresentationSink + ?Sized> DerefMut for ControlsGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.sink
    }
}

impl<S: PresentationSink + ?Sized> Drop for ControlsGuard<'_, S> {
    fn drop(&mut self) {
        self.sink.set_loading(false);
        self.sink.set_controls_enabled(true);
    }
}

#[derive(Debug, Clone)]
pub struct TableSink {
    rows: Vec<DisplayRow>,
    controls_enabled: bool,
    loading: bool,
    error: Option<String>,
}

impl Default for TableSink {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            controls_enabled: true,
            loading: false,
            error: None,
        }
    }
}

impl TableSink {
    pub fn controls_enabled(&self) -> bool {
        self.controls_enabled
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl PresentationSink for TableSink {
    fn set_controls_enabled(&mut self, enabled: bool) {
        self.controls_enabled = enabled;
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn show_error(&mut self, error: &LookupError) {
        self.error = Some(error.to_string());
    }

    fn clear_error(&mut self) {
        self.error = None;
    }

    fn clear(&mut self) {
        self.rows.clear();
    }

    fn render(&mut self, rows: Vec<DisplayRow>) {
        self.rows = rows;
    }

    fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }

    fn remove_row(&mut self, index: usize) -> Option<DisplayRow> {
        (index < self.rows.len()).then(|| self.rows.remove(index))
    }
}

const TEXT_COLUMNS: [&str; 5] = ["#", "Name", "Account", "Description", "Picture"];

/// Fixed-width table for a terminal.
pub fn render_text(rows: &[DisplayRow]) -> String {
    let cells: Vec<[String; 5]> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            [
                idx.to_string(),
                row.label.clone().unwrap_or_default(),
                row.account_cell_text().to_owned(),
                row.description.clone().unwrap_or_default(),
                row.file_page_link.clone().unwrap_or_default(),
            ]
        })
        .collect();

    let mut widths = TEXT_COLUMNS.map(|title| title.chars().count());
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_text_line(&mut out, &TEXT_COLUMNS.map(str::to_owned), &widths);
    for line in &cells {
        push_text_line(&mut out, line, &widths);
    }
    out
}

fn push_text_line(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Standalone HTML report, one table row per visible result.
pub fn render_html(title: &str, rows: &[DisplayRow]) -> String {
    let mut out = String::new();
    let title = encode_text(title);

    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, "<html lang=\"en\">");
    let _ = writeln!(
        out,
        "<head><meta charset=\"utf-8\"><title>{title}</title></head>"
    );
    let _ = writeln!(out, "<body>");
    let _ = writeln!(out, "<h1>{title}</h1>");
    let _ = writeln!(
        out,
        "<table id=\"results-table\" cellspacing=\"0\" cellpadding=\"0\">"
    );

    for row in rows {
        out.push_str("<tr>");

        out.push_str("<td class=\"name\">");
        if let Some(label) = &row.label {
            let _ = write!(
                out,
                "<a href=\"{}\" title=\"Click to view on Wikidata\" target=\"_blank\">{}</a>",
                encode_double_quoted_attribute(&row.profile_link),
                encode_text(label)
            );
        }
        out.push_str("</td>");

        out.push_str("<td class=\"account\">");
        match &row.account_link {
            Some(link) => {
                let _ = write!(
                    out,
                    "<a href=\"{}\" target=\"_blank\">{}</a>",
                    encode_double_quoted_attribute(link),
                    encode_text(row.account_cell_text())
                );
            }
            None => out.push_str(&encode_text(row.account_cell_text())),
        }
        out.push_str("</td>");

        out.push_str("<td class=\"description\">");
        if let Some(description) = &row.description {
            out.push_str(&encode_text(description));
        }
        out.push_str("</td>");

        out.push_str("<td class=\"picture\">");
        if let (Some(page), Some(thumb)) = (&row.file_page_link, &row.thumbnail_link) {
            let _ = write!(
                out,
                "<a href=\"{}\" target=\"_blank\" title=\"Click for attribution and larger sizes\"><img src=\"{}\"></a>",
                encode_double_quoted_attribute(page),
                encode_double_quoted_attribute(thumb)
            );
        }
        out.push_str("</td>");

        out.push_str("</tr>\n");
    }

    let _ = writeln!(out, "</table>");
    let _ = writeln!(out, "</body>");
    let _ = writeln!(out, "</html>");
    out
}
