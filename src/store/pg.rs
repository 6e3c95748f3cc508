//! PostgreSQL store: one row per record in `todos`.

use super::{TodoFilter, TodoStore};
use crate::error::AppError;
use crate::model::{Todo, TodoId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgConnectOptions;
use sqlx::{ConnectOptions, PgPool};

const COLUMNS: &str = "id, title, description, completed, due_date, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct TodoRow {
    id: String,
    title: String,
    description: String,
    completed: bool,
    due_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TodoRow> for Todo {
    type Error = AppError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        let id = TodoId::parse(&row.id)
            .map_err(|_| AppError::Store(format!("stored todo has malformed id '{}'", row.id)))?;
        Ok(Todo {
            id,
            title: row.title,
            description: row.description,
            completed: row.completed,
            due_date: row.due_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_todos(rows: Vec<TodoRow>) -> Result<Vec<Todo>, AppError> {
    rows.into_iter().map(Todo::try_from).collect()
}

#[derive(Clone)]
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn list(&self, filter: &TodoFilter) -> Result<Vec<Todo>, AppError> {
        let rows: Vec<TodoRow> = match filter.completed {
            Some(completed) => {
                sqlx::query_as(&format!(
                    "SELECT {} FROM todos WHERE completed = $1 ORDER BY created_at DESC",
                    COLUMNS
                ))
                .bind(completed)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!("SELECT {} FROM todos ORDER BY created_at DESC", COLUMNS))
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        into_todos(rows)
    }

    async fn find(&self, id: &TodoId) -> Result<Option<Todo>, AppError> {
        let row: Option<TodoRow> = sqlx::query_as(&format!("SELECT {} FROM todos WHERE id = $1", COLUMNS))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Todo::try_from).transpose()
    }

    async fn insert(&self, todo: &Todo) -> Result<(), AppError> {
        sqlx::query(&format!(
            "INSERT INTO todos ({}) VALUES ($1, $2, $3, $4, $5, $6, $7)",
            COLUMNS
        ))
        .bind(todo.id.as_str())
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.completed)
        .bind(todo.due_date)
        .bind(todo.created_at)
        .bind(todo.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn replace(&self, todo: &Todo) -> Result<Option<Todo>, AppError> {
        let row: Option<TodoRow> = sqlx::query_as(&format!(
            "UPDATE todos SET title = $2, description = $3, completed = $4, due_date = $5, updated_at = $6 \
             WHERE id = $1 RETURNING {}",
            COLUMNS
        ))
        .bind(todo.id.as_str())
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.completed)
        .bind(todo.due_date)
        .bind(todo.updated_at)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Todo::try_from).transpose()
    }

    async fn delete(&self, id: &TodoId) -> Result<Option<Todo>, AppError> {
        let row: Option<TodoRow> = sqlx::query_as(&format!("DELETE FROM todos WHERE id = $1 RETURNING {}", COLUMNS))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Todo::try_from).transpose()
    }
}

/// Create the `todos` table and its listing index if missing.
pub async fn ensure_todo_table(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS todos (
            id CHAR(24) PRIMARY KEY,
            title VARCHAR(200) NOT NULL CHECK (length(btrim(title)) > 0),
            description VARCHAR(1000) NOT NULL DEFAULT '',
            completed BOOLEAN NOT NULL DEFAULT FALSE,
            due_date TIMESTAMPTZ,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL,
            CHECK (updated_at >= created_at)
        )
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS todos_created_at_idx ON todos (created_at DESC)")
        .execute(pool)
        .await?;
    Ok(())
}

/// Create the target database through the `postgres` maintenance database if it
/// does not exist yet.
pub async fn ensure_database_exists(options: &PgConnectOptions) -> Result<(), sqlx::Error> {
    let Some((admin, db_name)) = maintenance_target(options) else {
        return Ok(());
    };
    let mut conn: sqlx::PgConnection = admin.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "created database");
    }
    Ok(())
}

/// Same server and credentials pointed at `postgres`, plus the database to create.
/// `None` when there is nothing to create.
fn maintenance_target(options: &PgConnectOptions) -> Option<(PgConnectOptions, String)> {
    let db_name = options.get_database()?.trim();
    if db_name.is_empty() || db_name == "postgres" {
        return None;
    }
    let db_name = db_name.to_string();
    Some((options.clone().database("postgres"), db_name))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
