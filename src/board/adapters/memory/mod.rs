//! In-memory adapters for tests and single-process use.

mod backend;
mod change_feed;

pub use backend::InMemoryBoardBackend;
pub use change_feed::InMemoryChangeFeed;
