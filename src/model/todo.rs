//! The to-do record, its creation draft, and the sparse patch applied on update.

use super::id::TodoId;
use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;

/// Current instant at millisecond precision, the resolution every store keeps.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    pub fn new(draft: NewTodo, now: DateTime<Utc>) -> Self {
        Todo {
            id: TodoId::generate(now),
            title: draft.title,
            description: draft.description,
            completed: draft.completed,
            due_date: draft.due_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reset `updated_at`; never earlier than `created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }
}

/// Validated fields for a record that does not exist yet.
#[derive(Clone, Debug, PartialEq)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub due_date: Option<DateTime<Utc>>,
}

/// Validated sparse update. `None` leaves the stored field alone; for `due_date`,
/// `Some(None)` clears it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl TodoChanges {
    pub fn apply(self, todo: &mut Todo) {
        if let Some(title) = self.title {
            todo.title = title;
        }
        if let Some(description) = self.description {
            todo.description = description;
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
        if let Some(due_date) = self.due_date {
            todo.due_date = due_date;
        }
    }
}
