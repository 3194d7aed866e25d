//! crates/project_workspace_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};

use crate::ports::{PortError, PortResult};

/// The answer stored for every question until a real answering backend exists.
pub const PLACEHOLDER_ANSWER: &str = "This is a placeholder answer from the backend. \
Once AI integration is added, this endpoint will call your agent \
to search project documents and generate a real answer.";

/// Status recorded for a document whose bytes are fully written to storage.
pub const DOCUMENT_STATUS_READY: &str = "ready";

/// The top-level grouping under which documents and questions live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Metadata for a file uploaded into a project. The bytes live on disk at `path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: i64,
    pub project_id: i64,
    pub filename: String,
    pub path: String,
    pub status: String,
    pub uploaded_at: DateTime<Utc>,
}

/// A stored question with its (placeholder) answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: i64,
    pub project_id: i64,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    name: String,
    description: Option<String>,
}

impl NewProject {
    /// Trims the name and rejects it when nothing is left.
    /// A blank description is stored as absent.
    pub fn parse(name: &str, description: Option<&str>) -> PortResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PortError::Validation(
                "name: must not be empty".to_string(),
            ));
        }
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        Ok(Self {
            name: name.to_string(),
            description,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Validated question text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    text: String,
}

impl NewQuestion {
    pub fn parse(text: &str) -> PortResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PortError::Validation(
                "question: must not be empty".to_string(),
            ));
        }
        Ok(Self {
            text: text.to_string(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Where the storage adapter put an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// The caller's filename reduced to its final path component.
    pub filename: String,
    /// Stable reference to the bytes, kept in the document record.
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_project_trims_name_and_drops_blank_description() {
        let p = NewProject::parse("  Capstone ", Some("   ")).unwrap();
        assert_eq!(p.name(), "Capstone");
        assert_eq!(p.description(), None);

        let p = NewProject::parse("Solar", Some(" rooftop array ")).unwrap();
        assert_eq!(p.description(), Some("rooftop array"));
    }

    #[test]
    fn new_project_rejects_blank_name() {
        let err = NewProject::parse("   ", None).unwrap_err();
        assert!(matches!(err, PortError::Validation(msg) if msg.starts_with("name")));
    }

    #[test]
    fn new_question_rejects_blank_text() {
        assert!(matches!(
            NewQuestion::parse("\n\t"),
            Err(PortError::Validation(_))
        ));
        assert_eq!(NewQuestion::parse(" What is this? ").unwrap().text(), "What is this?");
    }
}
