//! Unit tests for the board state engine.

mod reorder_tests;
mod support;
