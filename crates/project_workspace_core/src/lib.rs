pub mod domain;
pub mod ports;

pub use domain::{
    Document, NewProject, NewQuestion, Project, Question, StoredFile, DOCUMENT_STATUS_READY,
    PLACEHOLDER_ANSWER,
};
pub use ports::{DatabaseService, FileStorageService, PortError, PortResult};
