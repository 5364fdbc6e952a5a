//! Keyboard layout emulation on top of Windows keyboard layout drivers.
//!
//! Installed layouts are loaded from their driver DLLs, their `KBDTABLES`
//! are indexed, and key + modifier state is resolved into characters and
//! toolkit key symbols. The OS is reached through [`KeyboardPlatform`], so
//! everything except [`platform::windows`] works against synthetic layouts
//! on any host.

pub mod config;
pub mod error;
pub mod keymap;
pub mod keysym;
pub mod layout;
pub mod loader;
pub mod manager;
pub mod modifiers;
pub mod platform;
pub mod util;
pub mod vk;

pub use config::{KeymapConfig, PointerModelSetting};
pub use error::KeymapError;
pub use keymap::{Direction, KeycodeEntry, Keymap, KeymapKey, Translation};
pub use manager::{LayoutInfo, LayoutSetManager};
pub use modifiers::ModifierType;
pub use platform::{DriverLibrary, KeyboardPlatform, LayoutHandle, RegistryHive};
