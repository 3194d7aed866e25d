pub mod documents;
pub mod health;
pub mod projects;
pub mod questions;
pub mod rest;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{delete, get},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use documents::{delete_document_handler, list_documents_handler, upload_document_handler};
pub use health::health_handler;
pub use projects::{
    create_project_handler, delete_project_handler, get_project_handler, list_projects_handler,
};
pub use questions::{create_question_handler, list_questions_handler};

use rest::ApiDoc;
use state::AppState;

/// Builds the complete application: the REST routes behind the CORS and
/// body-limit layers, plus the Swagger UI.
pub fn router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        // Other origins get no Access-Control-Allow-Origin header at all.
        .allow_origin(AllowOrigin::list([app_state.config.frontend_origin.clone()]))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    let api_router = Router::new()
        .route("/health", get(health_handler))
        .route(
            "/projects",
            get(list_projects_handler).post(create_project_handler),
        )
        .route(
            "/projects/{project_id}",
            get(get_project_handler).delete(delete_project_handler),
        )
        .route(
            "/projects/{project_id}/documents",
            get(list_documents_handler).post(upload_document_handler),
        )
        .route(
            "/projects/{project_id}/documents/{document_id}",
            delete(delete_document_handler),
        )
        .route(
            "/projects/{project_id}/questions",
            get(list_questions_handler).post(create_question_handler),
        )
        .layer(DefaultBodyLimit::max(app_state.config.max_upload_bytes))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
