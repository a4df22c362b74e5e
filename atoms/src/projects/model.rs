use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Project {
    pub project_id: String,
    pub title: String,
    pub description: String,
    /// Persisted and returned, but not settable through the CRUD surface.
    #[serde(default)]
    pub member_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectPayload {
    pub title: String,
    pub description: String,
}
