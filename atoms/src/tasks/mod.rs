pub mod http;
pub mod model;
pub mod service;

pub use model::{CreateTaskPayload, Task, TaskPriority, TaskStatus, UpdateStatusPayload};
pub use service::*;
