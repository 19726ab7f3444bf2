//! Business logic shared by the HTTP handlers: the command engine and the
//! per-domain model services it drives.

pub mod command;
pub mod model;
pub mod ontology;
pub mod project;
pub mod property;
pub mod registry;
pub mod transaction;
