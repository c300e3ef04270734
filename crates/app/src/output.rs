//! Printing results as JSON or aligned tables.

use folio_domain::{
    AuthUser, Chapter, ChapterDocument, Manuscript, User, UserSummary, Workspace,
    WorkspaceManuscript, WorkspaceMembership,
};
use serde::Serialize;

/// A value with a one-line table rendering.
pub trait Row {
    /// Column titles.
    const HEADER: &'static [&'static str];

    /// Cells, one per header column.
    fn cells(&self) -> Vec<String>;
}

/// Writes results to stdout in the format chosen on the command line.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    json: bool,
}

impl Printer {
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn list<T: Serialize + Row>(&self, items: &[T]) -> anyhow::Result<()> {
        if self.json {
            return self.value(&items);
        }
        if items.is_empty() {
            println!("(none)");
            return Ok(());
        }
        let rows: Vec<_> = items.iter().map(Row::cells).collect();
        print!("{}", table(T::HEADER, &rows));
        Ok(())
    }

    pub fn one<T: Serialize + Row>(&self, item: &T) -> anyhow::Result<()> {
        self.list(std::slice::from_ref(item))
    }

    /// Prints any serializable value as pretty JSON, whatever the format.
    pub fn value<T: Serialize + ?Sized>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Confirms a command that returns nothing.
    pub fn done(&self, message: &str) {
        if self.json {
            println!("{}", serde_json::json!({ "ok": true, "message": message }));
        } else {
            println!("{message}");
        }
    }
}

fn table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = render_line(header.iter().copied(), &widths);
    for row in rows {
        out.push_str(&render_line(row.iter().map(String::as_str), &widths));
    }
    out
}

fn render_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    format!("{}\n", padded.join("  ").trim_end())
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

impl Row for AuthUser {
    const HEADER: &'static [&'static str] = &["ID", "USERNAME", "EMAIL"];

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.username.clone(), self.email.clone()]
    }
}

impl Row for UserSummary {
    const HEADER: &'static [&'static str] = &["ID", "USERNAME"];

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.username.clone()]
    }
}

impl Row for User {
    const HEADER: &'static [&'static str] = &["ID", "USERNAME", "NAME", "EMAIL", "ROLE", "STATUS"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.username.clone(),
            self.full_name(),
            self.email.clone(),
            self.role.to_string(),
            self.status.to_string(),
        ]
    }
}

impl Row for Workspace {
    const HEADER: &'static [&'static str] = &["ID", "NAME", "CREATED"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.created_at
                .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d").to_string()),
        ]
    }
}

impl Row for WorkspaceManuscript {
    const HEADER: &'static [&'static str] = &["ID", "TITLE"];

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.title.clone()]
    }
}

impl Row for WorkspaceMembership {
    const HEADER: &'static [&'static str] = &["MEMBERSHIP", "USER", "ROLE"];

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.display_name(), self.role.to_string()]
    }
}

impl Row for Manuscript {
    const HEADER: &'static [&'static str] = &["ID", "TITLE", "STATUS", "DESCRIPTION"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.status.to_string(),
            or_dash(self.description.as_deref()),
        ]
    }
}

impl Row for Chapter {
    const HEADER: &'static [&'static str] = &["#", "ID", "TITLE", "UPDATED"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.order_index.to_string(),
            self.id.to_string(),
            self.title.clone(),
            self.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        ]
    }
}

impl Row for ChapterDocument {
    const HEADER: &'static [&'static str] = &["ID", "FILE", "CURRENT VERSION"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            or_dash(self.file.as_deref()),
            or_dash(self.current_version.as_deref()),
        ]
    }
}
