use crate::{
    error::{AppError, Result},
    models::todo::{NewTodo, Todo, TodoChanges},
    state::AppState,
    validation::todo::validate_title,
};

/// Lists every todo, newest first.
pub async fn list_todos(state: &AppState) -> Result<Vec<Todo>> {
    let todos = state.store.list().await?;
    tracing::debug!("Listed {} todos", todos.len());
    Ok(todos)
}

/// Gets a single todo.
///
/// # Returns
///
/// The todo, or `AppError::NotFound`.
pub async fn get_todo(state: &AppState, id: i64) -> Result<Todo> {
    state.store.get_by_id(id).await?.ok_or(AppError::NotFound)
}

/// Creates a todo. The title is validated before anything is written.
pub async fn create_todo(state: &AppState, todo: NewTodo) -> Result<Todo> {
    validate_title(&todo.title)?;

    let created = state.store.create(todo).await?;
    tracing::info!("✅ Todo created with ID: {}", created.id);
    Ok(created)
}

/// Partially updates a todo.
///
/// A present title is validated first, so a rejected request never touches storage.
pub async fn update_todo(state: &AppState, id: i64, changes: TodoChanges) -> Result<Todo> {
    if let Some(title) = &changes.title {
        validate_title(title)?;
    }

    let updated = state
        .store
        .update(id, changes)
        .await?
        .ok_or(AppError::NotFound)?;

    tracing::info!("✅ Todo updated: {}", updated.id);
    Ok(updated)
}

/// Deletes a todo and returns what was removed.
pub async fn delete_todo(state: &AppState, id: i64) -> Result<Todo> {
    let deleted = state.store.delete(id).await?.ok_or(AppError::NotFound)?;
    tracing::info!("🗑️ Todo deleted: {}", deleted.id);
    Ok(deleted)
}
