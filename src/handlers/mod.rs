//! HTTP handlers for to-do CRUD.

pub mod todo;
