use std::path::PathBuf;

use serde::Deserialize;

use crate::backend::{Backend, RequestContext};
use crate::roster::{RosterHeader, StudentRecord};

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

#[derive(Clone, Debug, Default)]
pub struct EmailField {
    pub value: String,
    /// Set when the directory already knows the address; locked fields
    /// reject hand edits.
    pub locked: bool,
}

/// The import the teacher is currently previewing. Replaced wholesale on
/// every new file selection, dropped on successful submission.
pub struct PendingImport {
    pub import_id: String,
    pub file_name: String,
    pub file_path: PathBuf,
    pub header: RosterHeader,
    pub students: Vec<StudentRecord>,
    pub email: EmailField,
}

pub struct AppState {
    pub ctx: RequestContext,
    pub backend: Box<dyn Backend>,
    pub pending: Option<PendingImport>,
}

impl AppState {
    pub fn new(ctx: RequestContext, backend: Box<dyn Backend>) -> Self {
        AppState {
            ctx,
            backend,
            pending: None,
        }
    }
}
