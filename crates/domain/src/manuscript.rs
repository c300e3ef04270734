//! Manuscripts, their ordered chapters, and chapter documents

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult, require};

/// Publication state of a manuscript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ManuscriptStatus {
    /// Work in progress
    #[default]
    Draft,
    /// Released
    Published,
    /// Retired
    Archived,
}

impl ManuscriptStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for ManuscriptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ManuscriptStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            _ => Err(DomainError::InvalidValue {
                field: "status",
                message: format!("unknown status '{s}', expected draft, published or archived"),
            }),
        }
    }
}

/// A manuscript inside a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manuscript {
    /// Server-side identifier
    pub id: Uuid,
    /// Owning workspace
    pub workspace: Uuid,
    /// Owning user
    pub owner: Uuid,
    /// Title
    pub title: String,
    /// Optional blurb
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Publication state
    #[serde(default)]
    pub status: ManuscriptStatus,
    /// Hyperlink to the chapter collection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapters: Option<String>,
}

/// Payload for creating a manuscript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateManuscript {
    /// Target workspace
    pub workspace: Uuid,
    /// Title
    pub title: String,
    /// Optional blurb
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Initial state; the server defaults to draft
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ManuscriptStatus>,
}

impl CreateManuscript {
    /// Builds a payload with a non-blank title.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` if the title is blank.
    pub fn new(workspace: Uuid, title: impl Into<String>) -> DomainResult<Self> {
        let title = title.into();
        require("title", &title)?;
        Ok(Self {
            workspace,
            title,
            description: None,
            status: None,
        })
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: ManuscriptStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Partial update of a manuscript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UpdateManuscript {
    /// New title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ManuscriptStatus>,
}

impl UpdateManuscript {
    /// Returns true if nothing would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }

    /// Rejects empty updates and blank titles.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidValue` for an empty update and
    /// `DomainError::MissingField` for a blank title.
    pub fn validate(&self) -> DomainResult<()> {
        if self.is_empty() {
            return Err(DomainError::InvalidValue {
                field: "update",
                message: "nothing to change".to_string(),
            });
        }
        if let Some(title) = &self.title {
            require("title", title)?;
        }
        Ok(())
    }
}

/// A chapter, positioned by `order_index` within its manuscript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Server-side identifier
    pub id: Uuid,
    /// Owning manuscript
    pub manuscript: Uuid,
    /// Title
    pub title: String,
    /// 1-based position
    pub order_index: u32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Puts chapters in reading order: by `order_index`, ties broken by title.
pub fn sort_chapters(chapters: &mut [Chapter]) {
    chapters.sort_by(|a, b| {
        a.order_index
            .cmp(&b.order_index)
            .then_with(|| a.title.cmp(&b.title))
    });
}

fn check_order_index(order_index: u32) -> DomainResult<()> {
    if order_index == 0 {
        return Err(DomainError::InvalidValue {
            field: "order_index",
            message: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

/// Payload for creating a chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateChapter {
    /// Title
    pub title: String,
    /// 1-based position
    pub order_index: u32,
}

impl CreateChapter {
    /// Builds a payload with a non-blank title and a positive position.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank title or an `order_index` of zero.
    pub fn new(title: impl Into<String>, order_index: u32) -> DomainResult<Self> {
        let title = title.into();
        require("title", &title)?;
        check_order_index(order_index)?;
        Ok(Self { title, order_index })
    }
}

/// Partial update of a chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UpdateChapter {
    /// New title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_index: Option<u32>,
}

impl UpdateChapter {
    /// Rejects empty updates, blank titles and a zero position.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidValue` or `DomainError::MissingField`.
    pub fn validate(&self) -> DomainResult<()> {
        if self.title.is_none() && self.order_index.is_none() {
            return Err(DomainError::InvalidValue {
                field: "update",
                message: "nothing to change".to_string(),
            });
        }
        if let Some(title) = &self.title {
            require("title", title)?;
        }
        if let Some(order_index) = self.order_index {
            check_order_index(order_index)?;
        }
        Ok(())
    }
}

/// A document attached to a chapter and edited in the office editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterDocument {
    /// Server-side identifier
    pub id: Uuid,
    /// Owning chapter
    pub chapter: Uuid,
    /// Current version reference
    #[serde(default)]
    pub current_version: Option<String>,
    /// Stored file reference
    #[serde(default)]
    pub file: Option<String>,
    /// Hyperlink to the version collection
    #[serde(default)]
    pub document_versions: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn chapter(title: &str, order_index: u32) -> Chapter {
        Chapter {
            id: Uuid::new_v4(),
            manuscript: Uuid::nil(),
            title: title.to_string(),
            order_index,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_round_trips_lowercase() {
        assert_eq!(
            serde_json::to_value(ManuscriptStatus::Published).unwrap(),
            json!("published")
        );
        assert_eq!("ARCHIVED".parse::<ManuscriptStatus>(), Ok(ManuscriptStatus::Archived));
        assert!("lost".parse::<ManuscriptStatus>().is_err());
    }

    #[test]
    fn test_manuscript_missing_status_defaults_to_draft() {
        let raw = json!({
            "id": "3f5c9f8e-2f0b-4a3b-9d1e-7c6a5b4d3e21",
            "workspace": "a0d7d6a2-3c0f-4a8e-8e0c-2b0c8f1a9e77",
            "owner": "0b8f3c44-4f55-4b51-9d1f-4ab1a0c6b0d2",
            "title": "The Long Winter"
        });
        let manuscript: Manuscript = serde_json::from_value(raw).unwrap();
        assert_eq!(manuscript.status, ManuscriptStatus::Draft);
        assert_eq!(manuscript.description, None);
    }

    #[test]
    fn test_create_manuscript_payload() {
        let payload = CreateManuscript::new(Uuid::nil(), "Notes")
            .unwrap()
            .with_status(ManuscriptStatus::Draft);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "workspace": "00000000-0000-0000-0000-000000000000",
                "title": "Notes",
                "status": "draft"
            })
        );
    }

    #[test]
    fn test_update_manuscript_rejects_empty() {
        assert!(UpdateManuscript::default().validate().is_err());
        let update = UpdateManuscript {
            status: Some(ManuscriptStatus::Archived),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_create_chapter_requires_positive_order() {
        assert!(CreateChapter::new("Prologue", 1).is_ok());
        assert!(matches!(
            CreateChapter::new("Prologue", 0),
            Err(DomainError::InvalidValue { field: "order_index", .. })
        ));
        assert_eq!(
            CreateChapter::new(" ", 2),
            Err(DomainError::MissingField("title"))
        );
    }

    #[test]
    fn test_update_chapter_validation() {
        assert!(UpdateChapter::default().validate().is_err());
        let update = UpdateChapter {
            order_index: Some(0),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_sort_chapters_by_order_then_title() {
        let mut chapters = vec![chapter("Three", 3), chapter("B", 1), chapter("A", 1)];
        sort_chapters(&mut chapters);
        let titles: Vec<_> = chapters.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "Three"]);
    }

    #[test]
    fn test_document_tolerates_null_links() {
        let raw = json!({
            "id": "3f5c9f8e-2f0b-4a3b-9d1e-7c6a5b4d3e21",
            "chapter": "a0d7d6a2-3c0f-4a8e-8e0c-2b0c8f1a9e77",
            "current_version": null,
            "file": "documents/ch1.docx"
        });
        let document: ChapterDocument = serde_json::from_value(raw).unwrap();
        assert_eq!(document.file.as_deref(), Some("documents/ch1.docx"));
        assert!(document.current_version.is_none());
    }
}
