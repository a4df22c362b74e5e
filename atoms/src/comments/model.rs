use serde::{Deserialize, Serialize};

/// A comment on a task. Immutable once posted - there is no edit or delete
/// surface anywhere in the API.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Comment {
    pub comment_id: String,
    pub task_id: String,
    pub author_id: String,
    pub author_name: String,
    pub text: String,
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentPayload {
    pub text: String,
}
