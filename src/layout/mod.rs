//! Keyboard driver table engine.
//!
//! Reads the `KBDTABLES` structure a keyboard layout driver exports, indexes
//! it once, and resolves virtual key + modifier state into characters.

pub mod builder;
pub mod index;
pub mod memory;
pub mod pointer;
pub mod resolve;
pub mod tables;
#[cfg(test)]
mod tests;
pub mod types;
pub mod variant;

pub use builder::KbdTablesBuilder;
pub use index::LayoutIndex;
pub use memory::{MemoryArena, ProcessMemory, TableError, TableMemory};
pub use pointer::{HostPtr, NativePtr, PointerModel, PointerWidth, Ptr32, Ptr64, Wow64Ptr};
pub use types::*;
pub use variant::LayoutImpl;
