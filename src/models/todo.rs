use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

use crate::error::{AppError, Result};

/// A todo item as stored and as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Storage-assigned identifier, never reused.
    pub id: i64,
    /// The title of the todo (1..=200 characters).
    pub title: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Whether the todo is done.
    pub is_completed: bool,
    /// Insertion time, set by the storage layer.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<&Row> for Todo {
    type Error = AppError;

    fn try_from(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
            title: row.try_get("title").map_err(|_| AppError::MissingData("title".to_string()))?,
            description: row.try_get("description").map_err(|_| AppError::MissingData("description".to_string()))?,
            is_completed: row.try_get("is_completed").map_err(|_| AppError::MissingData("is_completed".to_string()))?,
            created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
        })
    }
}

/// The fields a caller supplies when creating a todo.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
}

/// A partial update. `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_completed: Option<bool>,
}

impl TodoChanges {
    /// Returns true when no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.is_completed.is_none()
    }

    /// Applies the present fields to `todo` in place.
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(description) = &self.description {
            todo.description = Some(description.clone());
        }
        if let Some(is_completed) = self.is_completed {
            todo.is_completed = is_completed;
        }
    }
}
