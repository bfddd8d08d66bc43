//! Application services turning user intents into store mutations and
//! backend requests.

mod boards;
mod catalog;
mod details;
mod tasks;
mod workspace;

pub use workspace::{BoardWorkspace, WorkspaceError, WorkspaceResult};
