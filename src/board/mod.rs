//! Board state engine.
//!
//! The [`store`] holds normalized collections for every entity kind and is
//! the single source of truth for rendering. [`view`] derives the visible
//! task subset of a list, [`reorder`] plans drag-initiated position changes,
//! and [`feed`] folds remote change notifications into the store using the
//! same primitives as local edits. [`services::BoardWorkspace`] ties these
//! to the persistence and change-feed [`ports`].

pub mod adapters;
pub mod domain;
pub mod feed;
pub mod ports;
pub mod reorder;
pub mod services;
pub mod store;
pub mod view;

#[cfg(test)]
mod tests;
