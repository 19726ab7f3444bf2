//! Request handlers.
//!
//! Reads go straight to the repositories in `cytomine_db`. Writes run inside
//! one database transaction through the command engine in
//! [`crate::services::command`], so they can be undone.

pub mod auth;
pub mod command;
pub mod command_history;
pub mod ontology;
pub mod project;
pub mod property;
