//! Step definitions for drag and drop scenarios.

pub mod world;

mod given;
mod then;
mod when;
