//! services/api/src/web/rest.rs
//!
//! The request and response payloads of the REST API and the master
//! definition for the OpenAPI specification.

use chrono::{DateTime, Utc};
use project_workspace_core::domain::{Document, Project, Question};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    info(title = "Project Workspace API"),
    paths(
        crate::web::health::health_handler,
        crate::web::projects::create_project_handler,
        crate::web::projects::list_projects_handler,
        crate::web::projects::get_project_handler,
        crate::web::projects::delete_project_handler,
        crate::web::documents::upload_document_handler,
        crate::web::documents::list_documents_handler,
        crate::web::documents::delete_document_handler,
        crate::web::questions::create_question_handler,
        crate::web::questions::list_questions_handler,
    ),
    components(
        schemas(
            HealthResponse,
            CreateProjectRequest,
            ProjectResponse,
            DocumentResponse,
            AskQuestionRequest,
            QuestionResponse,
        )
    ),
    tags(
        (name = "Project Workspace API", description = "Projects, their uploaded documents and stored questions.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Request Payloads
//=========================================================================================

/// Body of `POST /projects`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of `POST /projects/{project_id}/questions`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AskQuestionRequest {
    pub question: String,
}

//=========================================================================================
// Response Payloads
//=========================================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            name: project.name,
            description: project.description,
            created_at: project.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentResponse {
    pub id: i64,
    pub project_id: i64,
    /// The name the file was uploaded with.
    pub filename: String,
    /// Where the bytes were stored.
    pub path: String,
    pub status: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<Document> for DocumentResponse {
    fn from(document: Document) -> Self {
        Self {
            id: document.id,
            project_id: document.project_id,
            filename: document.filename,
            path: document.path,
            status: document.status,
            uploaded_at: document.uploaded_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionResponse {
    pub id: i64,
    pub project_id: i64,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
}

impl From<Question> for QuestionResponse {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            project_id: question.project_id,
            question: question.question,
            answer: question.answer,
            created_at: question.created_at,
        }
    }
}
