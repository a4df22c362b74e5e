use serde::{Deserialize, Serialize};

/// The two personas of the system. Flat and mutually exclusive: an admin is
/// never implicitly a developer, and no operation is valid for both roles
/// through the same gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Developer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Developer => "developer",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "admin" => Some(Role::Admin),
            "developer" => Some(Role::Developer),
            _ => None,
        }
    }
}

/// User profile document, keyed by the Cognito subject id.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub user_role: Role,
    pub skills: Vec<String>,
    pub user_created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRolePayload {
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSkillsPayload {
    pub skills: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_wire_values_are_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::to_string(&Role::Developer).unwrap(),
            "\"developer\""
        );
        let parsed: Role = serde_json::from_str("\"developer\"").unwrap();
        assert_eq!(parsed, Role::Developer);
    }

    #[test]
    fn role_parse_rejects_unknown_values() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("Admin"), None);
        assert_eq!(Role::parse("owner"), None);
    }
}
