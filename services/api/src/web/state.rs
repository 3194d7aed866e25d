//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use project_workspace_core::ports::{DatabaseService, FileStorageService};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
///
/// Holds no connection itself: the database adapter checks one out per query.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub storage: Arc<dyn FileStorageService>,
    pub config: Arc<Config>,
}
