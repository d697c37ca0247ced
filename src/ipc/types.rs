use std::path::PathBuf;

use serde::Deserialize;

use super::error::HandlerErr;
use crate::repo::Repos;
use crate::store::KvStore;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

#[derive(Default)]
pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub store: Option<KvStore>,
}

impl AppState {
    /// `None` until a workspace is selected.
    pub fn repos(&self) -> Option<Repos<'_>> {
        self.store.as_ref().map(Repos::new)
    }

    pub fn require_repos(&self) -> Result<Repos<'_>, HandlerErr> {
        self.repos().ok_or_else(HandlerErr::no_workspace)
    }
}
