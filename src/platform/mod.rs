//! Operating system surface used by the layout manager.

#[cfg(windows)]
pub mod windows;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::KeymapError;
use crate::layout::TableMemory;

const LANG_ARABIC: u16 = 0x01;
const LANG_HEBREW: u16 = 0x0d;
const LANG_URDU: u16 = 0x20;
const LANG_FARSI: u16 = 0x29;

/// An installed keyboard layout as identified by the OS (an `HKL`).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutHandle(pub isize);

impl LayoutHandle {
    /// Language identifier encoded in the low word.
    pub fn language_id(self) -> u16 {
        (self.0 as usize & 0xFFFF) as u16
    }

    pub fn primary_language(self) -> u16 {
        self.language_id() & 0x3FF
    }

    /// Whether the layout's language is written right to left.
    pub fn is_rtl(self) -> bool {
        matches!(
            self.primary_language(),
            LANG_HEBREW | LANG_ARABIC | LANG_URDU | LANG_FARSI
        )
    }
}

impl fmt::Debug for LayoutHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayoutHandle({:#010x})", self.0 as usize)
    }
}

impl fmt::Display for LayoutHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.0 as usize)
    }
}

/// Registry hive a configuration value lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryHive {
    LocalMachine,
    CurrentUser,
}

/// A loaded keyboard layout driver. Dropping it unloads the library.
pub trait DriverLibrary {
    /// Calls the exported table descriptor `symbol` and returns the address of
    /// the tables, or `None` if the export is missing.
    fn descriptor(&self, symbol: &str) -> Option<u64>;
}

/// Keyboard layout services of the host OS.
pub trait KeyboardPlatform {
    /// Installed layouts, in the order the OS reports them.
    fn layout_list(&self) -> Vec<LayoutHandle>;

    fn current_layout(&self) -> LayoutHandle;

    /// Makes `handle` the calling thread's active layout.
    fn activate_layout(&self, handle: LayoutHandle) -> bool;

    /// Layout name (`KLID`, e.g. `00000407`) of the active layout.
    fn current_layout_name(&self) -> Option<String>;

    /// String value `value` under `key`.
    fn registry_string(&self, hive: RegistryHive, key: &str, value: &str) -> Option<String>;

    fn system_directory(&self) -> Option<PathBuf>;

    fn load_library(&self, path: &Path) -> Result<Box<dyn DriverLibrary>, KeymapError>;

    /// Live state of all virtual keys: bit 7 set when down, bit 0 when toggled.
    fn key_state(&self) -> [u8; 256];

    fn vk_to_scancode(&self, vk: u8) -> u32;

    fn scancode_to_vk(&self, scancode: u32) -> u8;

    /// True for a 32-bit process running on a 64-bit host.
    fn is_wow64_process(&self) -> bool;

    /// Memory the driver tables are read from.
    fn table_memory(&self) -> &dyn TableMemory;
}
