use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    error::Result,
    models::todo::{NewTodo, Todo, TodoChanges},
    repositories::todo::TodoStore,
};

#[derive(Default)]
struct Rows {
    last_id: i64,
    todos: BTreeMap<i64, Todo>,
}

/// `TodoStore` kept in process memory. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryTodoStore {
    rows: RwLock<Rows>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn list(&self) -> Result<Vec<Todo>> {
        let rows = self.rows.read().await;
        let mut todos: Vec<Todo> = rows.todos.values().cloned().collect();
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(todos)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Todo>> {
        Ok(self.rows.read().await.todos.get(&id).cloned())
    }

    async fn create(&self, todo: NewTodo) -> Result<Todo> {
        let mut rows = self.rows.write().await;
        rows.last_id += 1;
        let created = Todo {
            id: rows.last_id,
            title: todo.title,
            description: todo.description,
            is_completed: false,
            created_at: Utc::now(),
        };
        rows.todos.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, changes: TodoChanges) -> Result<Option<Todo>> {
        let mut rows = self.rows.write().await;
        Ok(rows.todos.get_mut(&id).map(|todo| {
            changes.apply_to(todo);
            todo.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<Option<Todo>> {
        Ok(self.rows.write().await.todos.remove(&id))
    }
}
