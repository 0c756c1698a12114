//! Core types and the tool-session contract for the SPLAT scatter-sweep
//! engine.

#![deny(missing_docs)]

pub mod catalog;
pub mod errors;
pub mod session;
mod types;

pub use catalog::{quote_path, ScriptCatalog, ScriptText};
pub use errors::{ErrorInfo, SplatError};
pub use session::{
    load_verb, save_verb, CommandArity, CommandDescriptor, CommandTable, StateEffect, ToolReply,
    ToolSession,
};
pub use types::{Metrics, ResultRow, ResultTable};
