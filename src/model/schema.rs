//! Field rules for to-do input. Every violated field contributes one message.

use super::todo::{NewTodo, TodoChanges};
use crate::error::AppError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

pub const TITLE_REQUIRED: &str = "Todo title is required.";
pub const TITLE_TOO_LONG: &str = "Todo title must be 200 characters or fewer.";
pub const TITLE_NOT_STRING: &str = "Todo title must be a string.";
pub const DESCRIPTION_TOO_LONG: &str = "Todo description must be 1000 characters or fewer.";
pub const DESCRIPTION_NOT_STRING: &str = "Todo description must be a string.";
pub const TITLE_HAS_NUL: &str = "Todo title must not contain NUL characters.";
pub const DESCRIPTION_HAS_NUL: &str = "Todo description must not contain NUL characters.";
pub const COMPLETED_NOT_BOOL: &str = "completed must be true or false.";
pub const DUE_DATE_INVALID: &str = "dueDate must be a valid date.";

/// Validate a creation body. Missing optional fields take their defaults.
pub fn decode_new(body: &Map<String, Value>) -> Result<NewTodo, AppError> {
    let mut errors = Vec::new();
    let title = keep(&mut errors, title(body.get("title")));
    let description = match body.get("description") {
        None => Some(String::new()),
        Some(v) => keep(&mut errors, description(v)),
    };
    let completed = match body.get("completed") {
        None | Some(Value::Null) => Some(false),
        Some(v) => keep(&mut errors, completed(v)),
    };
    let due_date = match body.get("dueDate") {
        None => Some(None),
        Some(v) => keep(&mut errors, due_date(v)),
    };
    match (title, description, completed, due_date) {
        (Some(title), Some(description), Some(completed), Some(due_date)) if errors.is_empty() => {
            Ok(NewTodo {
                title,
                description,
                completed,
                due_date,
            })
        }
        _ => Err(AppError::Validation(errors)),
    }
}

/// Validate an update body. Only keys present in the body end up in the patch.
pub fn decode_changes(body: &Map<String, Value>) -> Result<TodoChanges, AppError> {
    let mut errors = Vec::new();
    let changes = TodoChanges {
        title: body
            .get("title")
            .and_then(|v| keep(&mut errors, title(Some(v)))),
        description: body
            .get("description")
            .and_then(|v| keep(&mut errors, description(v))),
        completed: body
            .get("completed")
            .and_then(|v| keep(&mut errors, completed(v))),
        due_date: body
            .get("dueDate")
            .and_then(|v| keep(&mut errors, due_date(v))),
    };
    if errors.is_empty() {
        Ok(changes)
    } else {
        Err(AppError::Validation(errors))
    }
}

fn keep<T>(errors: &mut Vec<String>, result: Result<T, &'static str>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(message) => {
            errors.push(message.to_string());
            None
        }
    }
}

fn title(v: Option<&Value>) -> Result<String, &'static str> {
    match v {
        None | Some(Value::Null) => Err(TITLE_REQUIRED),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                Err(TITLE_REQUIRED)
            } else if s.contains('\0') {
                Err(TITLE_HAS_NUL)
            } else if s.chars().count() > TITLE_MAX_CHARS {
                Err(TITLE_TOO_LONG)
            } else {
                Ok(s.to_string())
            }
        }
        Some(_) => Err(TITLE_NOT_STRING),
    }
}

fn description(v: &Value) -> Result<String, &'static str> {
    match v {
        Value::Null => Ok(String::new()),
        Value::String(s) => {
            let s = s.trim();
            if s.contains('\0') {
                Err(DESCRIPTION_HAS_NUL)
            } else if s.chars().count() > DESCRIPTION_MAX_CHARS {
                Err(DESCRIPTION_TOO_LONG)
            } else {
                Ok(s.to_string())
            }
        }
        _ => Err(DESCRIPTION_NOT_STRING),
    }
}

fn completed(v: &Value) -> Result<bool, &'static str> {
    v.as_bool().ok_or(COMPLETED_NOT_BOOL)
}

/// Null, `false` and the empty string mean "no due date". Dates outside the
/// `timestamptz` range are rejected so every store accepts what passes here.
fn due_date(v: &Value) -> Result<Option<DateTime<Utc>>, &'static str> {
    let parsed = match v {
        Value::Null | Value::Bool(false) => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => parse_date(s.trim()).map(Some).ok_or(DUE_DATE_INVALID),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(Some)
            .ok_or(DUE_DATE_INVALID),
        _ => Err(DUE_DATE_INVALID),
    }?;
    match parsed {
        Some(dt) if !storable(dt) => Err(DUE_DATE_INVALID),
        other => Ok(other),
    }
}

/// PostgreSQL `timestamptz` starts at 4713-11-24 BC; its upper end lies past
/// anything chrono can represent.
fn storable(dt: DateTime<Utc>) -> bool {
    NaiveDate::from_ymd_opt(-4712, 11, 24).is_some_and(|min| dt.date_naive() >= min)
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    use chrono::SubsecRound;

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).trunc_subsecs(3));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc().trunc_subsecs(3));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
