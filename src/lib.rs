//! Trellis: board state engine for kanban-style task boards.
//!
//! The engine keeps an in-memory model of boards, ordered lists, and
//! ordered tasks consistent while the user edits optimistically and remote
//! changes stream in from other sessions.
//!
//! # Architecture
//!
//! Trellis follows hexagonal architecture principles:
//!
//! - **Domain**: records, validation, and ordering rules
//! - **Ports**: persistence and change-feed contracts
//! - **Adapters**: in-memory implementations of the ports
//! - **Services**: the workspace turning intents into store mutations and
//!   backend requests
//!
//! # Modules
//!
//! - [`board`]: the board state engine
//! - [`config`]: TOML engine configuration
//! - [`logging`]: tracing subscriber setup

pub mod board;
pub mod config;
pub mod logging;
