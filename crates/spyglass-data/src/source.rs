//! Table source trait definition.

use spyglass_core::Table;

/// Trait for types that can load the bar table.
///
/// This trait uses `anyhow::Result` for flexible error handling.
pub trait TableSource {
    fn load(&self) -> anyhow::Result<Table>;
}
