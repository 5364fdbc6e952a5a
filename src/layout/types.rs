//! Type definitions shared by the table accessors, the indexer and the resolver.

use bitflags::bitflags;

bitflags! {
    /// Modifier bits in the keyboard driver's own vocabulary (`KBDSHIFT`, ...).
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct ModBits: u8 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const KANA = 1 << 3;
        /// Right OYAYUBI shift (vendor specific).
        const ROYA = 1 << 4;
        /// Left OYAYUBI shift (vendor specific).
        const LOYA = 1 << 5;
        const GRPSELTAP = 1 << 7;
        /// AltGr is Ctrl+Alt held together.
        const ALTGR = Self::CTRL.bits() | Self::ALT.bits();
    }
}

bitflags! {
    /// Toggle keys that are latched rather than held.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct LockBits: u8 {
        const CAPSLOCK = 1 << 0;
        const KANALOCK = 1 << 1;
    }
}

bitflags! {
    /// Per-key attribute byte of a `VK_TO_WCHARS` entry.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct VkAttributes: u8 {
        const CAPLOK = 0x01;
        const SGCAPS = 0x02;
        const CAPLOKALTGR = 0x04;
        const KANALOK = 0x08;
        const GRPSELTAP = 0x80;
    }
}

/// No character at this level.
pub const WCH_NONE: u16 = 0xF000;
/// Dead key; the base character lives in the following entry.
pub const WCH_DEAD: u16 = 0xF001;
/// Ligature; not expanded.
pub const WCH_LGTR: u16 = 0xF002;

/// `ModNumber` value marking a modifier combination the layout does not support.
pub const SHFT_INVALID: u8 = 0x0F;

/// Levels are nibble-sized in the driver tables.
pub const MAX_LEVELS: usize = 16;

/// Locale flag: right Alt acts as AltGr.
pub const KLLF_ALTGR: u32 = 0x0001;

/// Dead-key table flag: the composed character is itself a dead key.
pub const DKF_DEAD: u16 = 0x0001;

/// Virtual key of the pseudo-entries that follow dead keys in a character table.
pub const VK_DEAD_BASE: u8 = 0xFF;

/// Index of the synthetic Shift+Tab entry in [`KeyEntry`] arrays.
pub const SHIFT_TAB_ENTRY: usize = 256;

/// Returns true for the values a character table uses in place of a character.
#[inline]
pub fn is_sentinel(wch: u16) -> bool {
    matches!(wch, WCH_NONE | WCH_DEAD | WCH_LGTR)
}

/// Address of a driver's `KBDTABLES` structure, as returned by its descriptor export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawLayoutTables(pub u64);

/// Position of a virtual key's first entry in the driver's character tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VkSlot {
    pub table: usize,
    pub entry: usize,
}

/// One link in the character → key reverse index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEntry {
    pub vk: u8,
    pub mod_bits: ModBits,
    /// The key is a dead key and the character is its base.
    pub is_dead: bool,
    /// Index of the next entry producing the same character.
    pub next: Option<usize>,
}

/// Outcome of a successful character resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    /// UTF-16 unit from the driver table.
    pub wch: u16,
    /// Modifier combination of the winning level.
    pub consumed: ModBits,
    pub is_dead: bool,
    /// CapsLock inverted Shift before matching.
    pub caps_inverted: bool,
}

impl Resolved {
    /// The resolved character, if the unit is a scalar value on its own.
    pub fn character(&self) -> Option<char> {
        char::from_u32(self.wch as u32)
    }
}

/// A dead-key composition read from the driver's dead-key table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Composed {
    pub character: char,
    /// The result starts another dead-key sequence.
    pub is_dead: bool,
}
