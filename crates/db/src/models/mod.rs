//! Row models and DTOs.
//!
//! Domain rows (`Ontology`, `Project`, `Property`) serialize to the JSON form
//! clients exchange: camelCase keys, references named after the referenced
//! domain (`ontology`, `project`) and timestamps named `created`/`updated`.
//! Their `*Input` DTOs deserialize from that same JSON.

pub mod command;
pub mod command_history;
pub mod ontology;
pub mod project;
pub mod property;
pub mod stack;
pub mod transaction;
pub mod user;
