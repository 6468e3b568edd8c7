use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::{
    error::Result,
    models::todo::{NewTodo, TodoChanges},
    services::todos as todo_service,
    state::AppState,
};

/// The request payload for creating a todo.
#[derive(Deserialize, Debug)]
pub struct CreateTodoRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// The request payload for updating a todo. Omitted and `null` fields are left unchanged.
#[derive(Deserialize, Debug, Default)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_completed: Option<bool>,
}

impl From<CreateTodoRequest> for NewTodo {
    fn from(req: CreateTodoRequest) -> Self {
        NewTodo {
            title: req.title,
            description: req.description,
        }
    }
}

impl From<UpdateTodoRequest> for TodoChanges {
    fn from(req: UpdateTodoRequest) -> Self {
        TodoChanges {
            title: req.title,
            description: req.description,
            is_completed: req.is_completed,
        }
    }
}

/// Lists all todos.
#[axum::debug_handler]
pub async fn list_todos(State(state): State<AppState>) -> Result<Response> {
    let todos = todo_service::list_todos(&state).await?;
    Ok((StatusCode::OK, Json(todos)).into_response())
}

/// Gets a single todo.
#[axum::debug_handler]
pub async fn get_todo(
    State(state): State<AppState>,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Response> {
    let Path(todo_id) = path?;
    let todo = todo_service::get_todo(&state, todo_id).await?;
    Ok((StatusCode::OK, Json(todo)).into_response())
}

/// Creates a todo.
#[axum::debug_handler]
pub async fn create_todo(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload?;
    let todo = todo_service::create_todo(&state, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(todo)).into_response())
}

/// Partially updates a todo.
#[axum::debug_handler]
pub async fn update_todo(
    State(state): State<AppState>,
    path: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Response> {
    let Path(todo_id) = path?;
    let Json(payload) = payload?;
    let todo = todo_service::update_todo(&state, todo_id, payload.into()).await?;
    Ok((StatusCode::OK, Json(todo)).into_response())
}

/// Deletes a todo and echoes it back.
#[axum::debug_handler]
pub async fn delete_todo(
    State(state): State<AppState>,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Response> {
    let Path(todo_id) = path?;
    let todo = todo_service::delete_todo(&state, todo_id).await?;
    Ok((StatusCode::OK, Json(todo)).into_response())
}
