//! Toolkit modifier masks and their relation to driver modifier bits.

use bitflags::bitflags;

use crate::layout::{LockBits, ModBits};

bitflags! {
    /// Modifier mask in the toolkit's vocabulary.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct ModifierType: u32 {
        const SHIFT = 1 << 0;
        const LOCK = 1 << 1;
        const CONTROL = 1 << 2;
        /// Alt.
        const MOD1 = 1 << 3;
        /// AltGr.
        const MOD2 = 1 << 4;
        /// Kana.
        const MOD3 = 1 << 5;
        const MOD4 = 1 << 6;
        const MOD5 = 1 << 7;
    }
}

/// One row per driver bit. AltGr is not a driver bit of its own, it is
/// handled separately.
const MOD_BIT_TABLE: [(ModBits, ModifierType); 6] = [
    (ModBits::SHIFT, ModifierType::SHIFT),
    (ModBits::CTRL, ModifierType::CONTROL),
    (ModBits::ALT, ModifierType::MOD1),
    (ModBits::KANA, ModifierType::MOD3),
    (ModBits::ROYA, ModifierType::MOD4),
    (ModBits::LOYA, ModifierType::MOD5),
];

/// Converts driver modifier bits to a toolkit mask. Ctrl and Alt held
/// together also report MOD2.
pub fn mod_bits_to_mask(bits: ModBits) -> ModifierType {
    let mut mask = ModifierType::empty();
    for (bit, flag) in MOD_BIT_TABLE {
        if bits.contains(bit) {
            mask |= flag;
        }
    }
    if bits.contains(ModBits::ALTGR) {
        mask |= ModifierType::MOD2;
    }
    mask
}

/// Converts a toolkit mask to driver modifier bits. MOD2 stands for Ctrl+Alt.
pub fn mask_to_mod_bits(mask: ModifierType) -> ModBits {
    let mut bits = ModBits::empty();
    for (bit, flag) in MOD_BIT_TABLE {
        if mask.contains(flag) {
            bits |= bit;
        }
    }
    if mask.contains(ModifierType::MOD2) {
        bits |= ModBits::ALTGR;
    }
    bits
}

/// Lock state carried by a toolkit mask.
pub fn mask_to_lock_bits(mask: ModifierType) -> LockBits {
    if mask.contains(ModifierType::LOCK) {
        LockBits::CAPSLOCK
    } else {
        LockBits::empty()
    }
}
