use aws_sdk_cognitoidentityprovider::Client as CognitoClient;
use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::http::HeaderMap;

use taskforge_atoms::error::ApiError;
use taskforge_atoms::tasks::model::Task;
use taskforge_atoms::tasks::service::get_task;
use taskforge_atoms::users::model::{Role, User};
use taskforge_atoms::users::service as users;

/// Per-request session context. Rebuilt from Cognito plus the profile store
/// on every request; never cached across requests.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
    pub role: Role,
}

/// What Cognito vouches for after verifying the access token.
#[derive(Debug)]
struct VerifiedIdentity {
    subject_id: String,
    email: String,
    display_name: Option<String>,
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Verify the bearer credential and hydrate the session context.
///
/// A subject seen for the first time gets a profile with the developer role
/// and no skills. A stored email that drifted from the freshly verified one
/// is corrected in place - the identity provider wins.
pub async fn authenticate(
    cognito: &CognitoClient,
    dynamo: &DynamoClient,
    table_name: &str,
    headers: &HeaderMap,
) -> Result<AuthUser, ApiError> {
    let token = bearer_token(headers)
        .ok_or_else(|| ApiError::Unauthenticated("Missing bearer credential".to_string()))?;

    let identity = verify_token(cognito, token).await?;

    let profile = match users::find_user(dynamo, table_name, &identity.subject_id).await? {
        Some(profile) => {
            if profile.user_email != identity.email {
                users::update_email(dynamo, table_name, &identity.subject_id, &identity.email)
                    .await?;
            }
            profile
        }
        None => {
            tracing::info!("New user. Creating profile for subject {}", identity.subject_id);
            let profile = new_profile(&identity);
            users::put_user(dynamo, table_name, &profile).await?;
            profile
        }
    };

    Ok(AuthUser {
        user_id: identity.subject_id,
        email: identity.email,
        role: profile.user_role,
    })
}

async fn verify_token(
    cognito: &CognitoClient,
    token: &str,
) -> Result<VerifiedIdentity, ApiError> {
    let result = cognito
        .get_user()
        .access_token(token)
        .send()
        .await
        .map_err(|e| {
            let bad_credential = e
                .as_service_error()
                .map(|se| {
                    se.is_not_authorized_exception()
                        || se.is_user_not_found_exception()
                        || se.is_user_not_confirmed_exception()
                        || se.is_password_reset_required_exception()
                })
                .unwrap_or(false);
            if bad_credential {
                ApiError::Unauthenticated("Invalid or expired access token".to_string())
            } else {
                ApiError::Unavailable(format!("Cognito get_user error: {}", e))
            }
        })?;

    // The pool username is the stable subject id; AdminDeleteUser keys on it
    // when an account is revoked.
    let subject_id = result.username().to_string();

    let mut email = None;
    let mut display_name = None;
    for attr in result.user_attributes() {
        match attr.name() {
            "email" => email = attr.value().map(|v| v.to_string()),
            "name" => display_name = attr.value().map(|v| v.to_string()),
            _ => {}
        }
    }

    let email = email.ok_or_else(|| {
        ApiError::Unauthenticated("Token subject has no verified email".to_string())
    })?;

    Ok(VerifiedIdentity {
        subject_id,
        email,
        display_name,
    })
}

fn new_profile(identity: &VerifiedIdentity) -> User {
    User {
        user_id: identity.subject_id.clone(),
        user_name: display_name_or_fallback(identity.display_name.as_deref(), &identity.email),
        user_email: identity.email.clone(),
        user_role: Role::Developer,
        skills: vec![],
        user_created_at: chrono::Utc::now().to_rfc3339(),
    }
}

fn display_name_or_fallback(name: Option<&str>, email: &str) -> String {
    match name {
        Some(n) if !n.trim().is_empty() => n.to_string(),
        _ => email.split('@').next().unwrap_or("New User").to_string(),
    }
}

/// Exact-match role gate. Admin is not a superset of developer; each role
/// has its own disjoint surface.
pub fn require_admin(user: &AuthUser) -> Result<(), ApiError> {
    if user.role != Role::Admin {
        return Err(ApiError::Forbidden(
            "Operation not permitted. Admin access required.".to_string(),
        ));
    }
    Ok(())
}

pub fn require_developer(user: &AuthUser) -> Result<(), ApiError> {
    if user.role != Role::Developer {
        return Err(ApiError::Forbidden(
            "Operation not permitted. Developer access required.".to_string(),
        ));
    }
    Ok(())
}

/// Who may touch a task: admins always; a developer only when the task is
/// assigned to them AND has cleared the approval gate.
pub fn task_access(user: &AuthUser, task: &Task) -> Result<(), ApiError> {
    match user.role {
        Role::Admin => Ok(()),
        Role::Developer => {
            if task.assignee_id.as_deref() == Some(user.user_id.as_str()) && task.is_approved {
                Ok(())
            } else {
                Err(ApiError::Forbidden(
                    "You are not authorized to access this task.".to_string(),
                ))
            }
        }
    }
}

/// Load-then-gate. An unknown task id is NotFound before any role branch
/// runs, for admins and developers alike.
pub async fn check_task_access(
    dynamo: &DynamoClient,
    table_name: &str,
    user: &AuthUser,
    task_id: &str,
) -> Result<Task, ApiError> {
    let task = get_task(dynamo, table_name, task_id).await?;
    task_access(user, &task)?;
    Ok(task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_http::http::HeaderValue;
    use taskforge_atoms::tasks::model::{TaskPriority, TaskStatus};

    fn admin() -> AuthUser {
        AuthUser {
            user_id: "sub-admin".to_string(),
            email: "boss@example.com".to_string(),
            role: Role::Admin,
        }
    }

    fn developer(user_id: &str) -> AuthUser {
        AuthUser {
            user_id: user_id.to_string(),
            email: format!("{}@example.com", user_id),
            role: Role::Developer,
        }
    }

    fn task(assignee_id: Option<&str>, is_approved: bool) -> Task {
        Task {
            task_id: "t-1".to_string(),
            project_id: "p-1".to_string(),
            title: "Wire login".to_string(),
            description: "OIDC flow".to_string(),
            status: TaskStatus::ToDo,
            priority: TaskPriority::Medium,
            assignee_id: assignee_id.map(|s| s.to_string()),
            creator: "Admin: boss@example.com".to_string(),
            is_approved,
            created_at: "2026-02-01T08:00:00+00:00".to_string(),
            updated_at: "2026-02-01T08:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers), Some("abc123"));

        let mut no_scheme = HeaderMap::new();
        no_scheme.insert("Authorization", HeaderValue::from_static("abc123"));
        assert_eq!(bearer_token(&no_scheme), None);

        let mut empty = HeaderMap::new();
        empty.insert("Authorization", HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&empty), None);

        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn roles_are_mutually_exclusive_not_hierarchical() {
        assert!(require_admin(&admin()).is_ok());
        assert!(require_developer(&admin()).is_err());
        assert!(require_admin(&developer("sub-1")).is_err());
        assert!(require_developer(&developer("sub-1")).is_ok());
    }

    #[test]
    fn admin_passes_task_access_unconditionally() {
        assert!(task_access(&admin(), &task(None, false)).is_ok());
        assert!(task_access(&admin(), &task(Some("someone-else"), false)).is_ok());
    }

    #[test]
    fn developer_needs_assignment_and_approval() {
        let dev = developer("sub-1");
        assert!(task_access(&dev, &task(Some("sub-1"), true)).is_ok());

        // Assigned but still behind the approval gate
        let err = task_access(&dev, &task(Some("sub-1"), false)).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));

        // Approved but assigned to someone else
        let err = task_access(&dev, &task(Some("sub-2"), true)).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));

        // Unassigned entirely
        let err = task_access(&dev, &task(None, true)).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn first_sight_profile_defaults() {
        let identity = VerifiedIdentity {
            subject_id: "sub-9".to_string(),
            email: "grace@example.com".to_string(),
            display_name: Some("Grace".to_string()),
        };
        let profile = new_profile(&identity);
        assert_eq!(profile.user_id, "sub-9");
        assert_eq!(profile.user_name, "Grace");
        assert_eq!(profile.user_role, Role::Developer);
        assert!(profile.skills.is_empty());
    }

    #[test]
    fn display_name_falls_back_to_email_local_part() {
        assert_eq!(
            display_name_or_fallback(None, "grace@example.com"),
            "grace"
        );
        assert_eq!(
            display_name_or_fallback(Some("  "), "grace@example.com"),
            "grace"
        );
        assert_eq!(
            display_name_or_fallback(Some("Grace"), "grace@example.com"),
            "Grace"
        );
    }
}
