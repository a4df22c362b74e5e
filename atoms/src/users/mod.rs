pub mod http;
pub mod model;
pub mod service;

pub use model::{Role, UpdateRolePayload, UpdateSkillsPayload, User};
pub use service::*;
