use async_trait::async_trait;
use deadpool_postgres::Pool;

use crate::{
    error::Result,
    models::todo::{NewTodo, Todo, TodoChanges},
};

const TODO_COLUMNS: &str = "id, title, description, is_completed, created_at";

/// Persistence operations for todos.
///
/// Absence is reported as `Ok(None)`; `Err` is reserved for storage faults.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All todos, newest first.
    async fn list(&self) -> Result<Vec<Todo>>;

    /// Looks up a single todo by id.
    async fn get_by_id(&self, id: i64) -> Result<Option<Todo>>;

    /// Inserts a todo and returns it as stored.
    async fn create(&self, todo: NewTodo) -> Result<Todo>;

    /// Applies the present fields of `changes`. Either all of them land or none do.
    async fn update(&self, id: i64, changes: TodoChanges) -> Result<Option<Todo>>;

    /// Removes a todo and returns its last state.
    async fn delete(&self, id: i64) -> Result<Option<Todo>>;
}

/// `TodoStore` backed by PostgreSQL.
///
/// Every call checks one client out of the pool; it goes back when dropped.
#[derive(Clone)]
pub struct PgTodoStore {
    pool: Pool,
}

impl PgTodoStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn list(&self) -> Result<Vec<Todo>> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                &format!(
                    "SELECT {} FROM todos ORDER BY created_at DESC, id DESC",
                    TODO_COLUMNS
                ),
                &[],
            )
            .await?;
        rows.iter().map(Todo::try_from).collect()
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Todo>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                &format!("SELECT {} FROM todos WHERE id = $1", TODO_COLUMNS),
                &[&id],
            )
            .await?;
        row.as_ref().map(Todo::try_from).transpose()
    }

    async fn create(&self, todo: NewTodo) -> Result<Todo> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                &format!(
                    r#"
                    INSERT INTO todos (title, description)
                    VALUES ($1, $2)
                    RETURNING {}
                    "#,
                    TODO_COLUMNS
                ),
                &[&todo.title, &todo.description],
            )
            .await?;
        Todo::try_from(&row)
    }

    async fn update(&self, id: i64, changes: TodoChanges) -> Result<Option<Todo>> {
        if changes.is_empty() {
            return self.get_by_id(id).await;
        }

        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                &format!(
                    r#"
                    UPDATE todos
                    SET
                        title = COALESCE($2, title),
                        description = COALESCE($3, description),
                        is_completed = COALESCE($4, is_completed)
                    WHERE id = $1
                    RETURNING {}
                    "#,
                    TODO_COLUMNS
                ),
                &[&id, &changes.title, &changes.description, &changes.is_completed],
            )
            .await?;
        row.as_ref().map(Todo::try_from).transpose()
    }

    async fn delete(&self, id: i64) -> Result<Option<Todo>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                &format!("DELETE FROM todos WHERE id = $1 RETURNING {}", TODO_COLUMNS),
                &[&id],
            )
            .await?;
        row.as_ref().map(Todo::try_from).transpose()
    }
}
