//! crates/project_workspace_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete database and file storage.

use async_trait::async_trait;

use crate::domain::{Document, NewProject, NewQuestion, Project, Question, StoredFile};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (database, filesystem).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Storage failure: {0}")]
    Storage(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Every operation that names a project fails with `NotFound` when it does not exist.
#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Projects ---
    async fn create_project(&self, new_project: &NewProject) -> PortResult<Project>;

    /// Newest first.
    async fn list_projects(&self) -> PortResult<Vec<Project>>;

    async fn get_project(&self, project_id: i64) -> PortResult<Project>;

    /// Removes the project together with its documents and questions.
    async fn delete_project(&self, project_id: i64) -> PortResult<()>;

    // --- Documents ---
    async fn create_document(&self, project_id: i64, stored: &StoredFile) -> PortResult<Document>;

    /// Newest first.
    async fn list_documents(&self, project_id: i64) -> PortResult<Vec<Document>>;

    /// Fails with `NotFound` when the document belongs to another project.
    async fn get_document(&self, project_id: i64, document_id: i64) -> PortResult<Document>;

    async fn delete_document(&self, project_id: i64, document_id: i64) -> PortResult<()>;

    // --- Questions ---
    /// Stores the question with the placeholder answer in a single insert.
    async fn create_question(&self, project_id: i64, question: &NewQuestion)
        -> PortResult<Question>;

    /// Oldest first.
    async fn list_questions(&self, project_id: i64) -> PortResult<Vec<Question>>;
}

#[async_trait]
pub trait FileStorageService: Send + Sync {
    /// Writes the bytes under the project's directory without replacing any existing file.
    async fn save_file(&self, project_id: i64, filename: &str, data: &[u8])
        -> PortResult<StoredFile>;

    /// Reads back the bytes behind a reference returned by `save_file`.
    /// No route serves file content; this is the read-back used to verify uploads.
    async fn read_file(&self, path: &str) -> PortResult<Vec<u8>>;

    async fn remove_file(&self, path: &str) -> PortResult<()>;

    /// Removes the project's whole directory. Missing directories are not an error.
    async fn remove_project_files(&self, project_id: i64) -> PortResult<()>;
}
