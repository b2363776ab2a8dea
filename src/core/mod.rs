//! Core logic — record model, inventory parsing, command synthesis, queries.

pub mod codegen;
pub mod columns;
pub mod config;
pub mod error;
pub mod parser;
pub mod query;
pub mod summary;
pub mod types;
