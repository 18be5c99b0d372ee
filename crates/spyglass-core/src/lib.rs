//! Core types for the spyglass dashboard.
//!
//! This crate provides fundamental data structures with no external dependencies:
//! - `Bar` - one annotated OHLCV observation
//! - `Direction` - trading bias attached to a bar
//! - `Table` - the time-sorted, load-once bar collection

pub mod bar;
pub mod direction;
pub mod table;

pub use bar::Bar;
pub use direction::Direction;
pub use table::Table;
