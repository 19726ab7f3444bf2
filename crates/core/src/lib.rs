//! Domain-agnostic building blocks of the Cytomine core server.
//!
//! Nothing in this crate touches the database or HTTP: the command model,
//! the undo/redo log, search-filter translation and pagination are all pure
//! so they can be shared by the repository and API layers.

pub mod command;
pub mod diff;
pub mod error;
pub mod json;
pub mod naming;
pub mod pagination;
pub mod roles;
pub mod search;
pub mod types;
pub mod undo;
