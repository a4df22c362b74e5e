use lambda_http::{
    http::{Method, StatusCode},
    Body, Error, Request, Response,
};
use std::sync::Arc;

use synthesis_block as synthesis;
use taskforge_atoms::error::{error_response, ApiError};
use taskforge_atoms::{comments, projects, tasks, users};
use taskforge_shared::{accounts, auth, AppState};

/// Main Lambda handler - verifies the session and routes to the domain
/// handlers. Every route except the root and the CORS preflight runs behind
/// a freshly hydrated session context.
pub(crate) async fn function_handler(
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    let method = event.method();
    let path = event.uri().path();
    let body = event.body();
    tracing::info!("API invoked - Method: {} Path: {}", method, path);

    // Handle CORS preflight
    if method == "OPTIONS" {
        return Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET,POST,PUT,DELETE,OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type,Authorization")
            .body(Body::Empty)
            .map_err(Box::new)?);
    }

    // Public root
    if path == "/" {
        return Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "application/json")
            .header("Access-Control-Allow-Origin", "*")
            .body(
                serde_json::json!({"message": "Welcome to the TaskForge API!"})
                    .to_string()
                    .into(),
            )
            .map_err(Box::new)?);
    }

    let dynamo = &state.dynamo_client;
    let table_name = state.config.table_name.as_str();

    // Everything else requires a verified session
    let user = match auth::authenticate(&state.cognito_client, dynamo, table_name, event.headers())
        .await
    {
        Ok(u) => u,
        Err(e) => return error_response(&e),
    };

    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    // The whole /admin and /projects surface is admin-only
    if matches!(parts.first(), Some(&"admin") | Some(&"projects")) {
        if let Err(e) = auth::require_admin(&user) {
            return error_response(&e);
        }
    }

    match (method, parts.as_slice()) {
        // --- GENERAL ---
        (&Method::GET, ["users", "me"]) => {
            users::http::get_me(dynamo, table_name, &user.user_id).await
        }
        (&Method::PUT, ["users", "me", "skills"]) => {
            if let Err(e) = auth::require_developer(&user) {
                return error_response(&e);
            }
            users::http::update_my_skills(dynamo, table_name, &user.user_id, body).await
        }

        // --- AI SYNTHESIS ---
        (&Method::POST, ["admin", "generate-tasks"]) => match state.gemini.as_ref() {
            Some(gemini) => {
                synthesis::generate_tasks(dynamo, gemini, table_name, &user.email, body).await
            }
            None => error_response(&ApiError::Unavailable(
                "Gemini API is not configured on the server.".to_string(),
            )),
        },
        (&Method::GET, ["admin", "list-models"]) => match state.gemini.as_ref() {
            Some(gemini) => synthesis::list_models(gemini).await,
            None => error_response(&ApiError::Unavailable(
                "Gemini API is not configured on the server.".to_string(),
            )),
        },

        // --- PROJECTS ---
        (&Method::POST, ["projects"]) => {
            projects::http::create_project(dynamo, table_name, body).await
        }
        (&Method::GET, ["projects"]) => projects::http::list_projects(dynamo, table_name).await,
        (&Method::GET, ["projects", project_id]) => {
            projects::http::get_project(dynamo, table_name, project_id).await
        }
        (&Method::PUT, ["projects", project_id]) => {
            projects::http::update_project(dynamo, table_name, project_id, body).await
        }
        (&Method::DELETE, ["projects", project_id]) => {
            projects::http::delete_project(dynamo, table_name, project_id).await
        }

        // --- ADMIN TASK MANAGEMENT ---
        (&Method::GET, ["admin", "tasks"]) => {
            tasks::http::list_all_tasks(dynamo, table_name).await
        }
        (&Method::POST, ["admin", "tasks"]) => {
            tasks::http::create_task(dynamo, table_name, &user.email, body).await
        }
        (&Method::PUT, ["admin", "tasks", task_id, "approve"]) => {
            tasks::http::approve_task(dynamo, table_name, task_id).await
        }
        (&Method::PUT, ["admin", "tasks", task_id]) => {
            tasks::http::update_task(dynamo, table_name, task_id, body).await
        }
        (&Method::DELETE, ["admin", "tasks", task_id]) => {
            tasks::http::delete_task(dynamo, table_name, task_id).await
        }

        // --- ADMIN USER MANAGEMENT ---
        (&Method::GET, ["admin", "users"]) => users::http::list_users(dynamo, table_name).await,
        (&Method::PUT, ["admin", "users", user_id, "role"]) => {
            users::http::update_user_role(dynamo, table_name, user_id, body).await
        }
        (&Method::DELETE, ["admin", "users", user_id]) => {
            accounts::delete_account(
                dynamo,
                &state.cognito_client,
                table_name,
                &state.config.user_pool_id,
                user_id,
            )
            .await
        }
        (&Method::GET, ["admin", "developers"]) => {
            users::http::list_developers(dynamo, table_name).await
        }

        // --- DEVELOPER TASKS ---
        (&Method::GET, ["tasks", "my"]) => {
            if let Err(e) = auth::require_developer(&user) {
                return error_response(&e);
            }
            tasks::http::list_my_tasks(dynamo, table_name, &user.user_id).await
        }
        (&Method::PUT, ["tasks", task_id, "status"]) => {
            if let Err(e) = auth::check_task_access(dynamo, table_name, &user, task_id).await {
                return error_response(&e);
            }
            tasks::http::update_task_status(dynamo, table_name, task_id, body).await
        }

        // --- COLLABORATION (COMMENTS) ---
        (&Method::POST, ["tasks", task_id, "comments"]) => {
            if let Err(e) = auth::check_task_access(dynamo, table_name, &user, task_id).await {
                return error_response(&e);
            }
            comments::http::create_comment(dynamo, table_name, task_id, &user.user_id, body).await
        }
        (&Method::GET, ["tasks", task_id, "comments"]) => {
            if let Err(e) = auth::check_task_access(dynamo, table_name, &user, task_id).await {
                return error_response(&e);
            }
            comments::http::list_comments(dynamo, table_name, task_id).await
        }

        _ => {
            tracing::warn!("No route matched - Method: {} Path: {}", method, path);
            not_found()
        }
    }
}

fn not_found() -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::json!({"error": "Not found"}).to_string().into())
        .map_err(Box::new)?)
}
