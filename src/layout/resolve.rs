//! Character resolution against a layout's driver tables.

use super::index::LayoutIndex;
use super::memory::{TableError, TableMemory};
use super::pointer::PointerWidth;
use super::tables::KbdTables;
use super::types::{
    Composed, DKF_DEAD, LockBits, ModBits, RawLayoutTables, Resolved, VkAttributes, WCH_DEAD,
    WCH_LGTR, WCH_NONE,
};
use crate::util::unlikely;

/// Finds the character `vk` produces with `mod_bits` held and `lock_bits` latched.
///
/// Every level of the key's table is a candidate if it needs no modifier
/// that is not held. Candidates needing Ctrl without Alt are skipped, since
/// layouts carry legacy control-character levels that must not shadow normal
/// typing. The candidate consuming the most held modifiers wins; on a tie the
/// lowest level is kept.
pub fn resolve<P: PointerWidth>(
    mem: &dyn TableMemory,
    tables: RawLayoutTables,
    index: &LayoutIndex,
    vk: u8,
    mod_bits: ModBits,
    lock_bits: LockBits,
) -> Option<Resolved> {
    match try_resolve::<P>(mem, tables, index, vk, mod_bits, lock_bits) {
        Ok(resolved) => resolved,
        Err(err) => {
            log::trace!("vk {vk:#04x}: unreadable table entry: {err}");
            None
        }
    }
}

fn try_resolve<P: PointerWidth>(
    mem: &dyn TableMemory,
    tables: RawLayoutTables,
    index: &LayoutIndex,
    vk: u8,
    mut mod_bits: ModBits,
    lock_bits: LockBits,
) -> Result<Option<Resolved>, TableError> {
    let Some(slot) = index.vk_slot(vk) else {
        return Ok(None);
    };
    let kbd = KbdTables::<P>::new(mem, tables);
    let Some(table) = kbd.wchar_table(slot.table)? else {
        return Ok(None);
    };
    let entry = table.entry_at(slot.entry)?;
    if unlikely(entry.vk != vk) {
        return Ok(None);
    }

    let caps = lock_bits.contains(LockBits::CAPSLOCK);
    let held = mod_bits;

    // CapsLock is ignored once anything but Shift is held: German
    // CapsLock+AltGr+Q is AltGr+Q, not Shift+AltGr+Q.
    if entry.attributes.contains(VkAttributes::CAPLOK)
        && (mod_bits & !ModBits::SHIFT).is_empty()
        && caps
    {
        mod_bits ^= ModBits::SHIFT;
    }

    if entry.attributes.contains(VkAttributes::CAPLOKALTGR)
        && mod_bits.intersects(ModBits::ALTGR)
        && caps
    {
        mod_bits ^= ModBits::SHIFT;
    }

    let caps_inverted = (held ^ mod_bits).contains(ModBits::SHIFT);

    // The CapsLock characters of an SGCAPS key are in the next entry.
    let sgcaps = entry.attributes.contains(VkAttributes::SGCAPS) && caps;

    if entry.attributes.contains(VkAttributes::KANALOK)
        && lock_bits.contains(LockBits::KANALOCK)
    {
        mod_bits ^= ModBits::KANA;
    }

    let mut best: Option<Resolved> = None;
    let mut best_score = -1i32;

    for level in 0..table.n_levels {
        let Some(candidate) = index.level_to_modbits.get(level as usize).copied() else {
            break;
        };

        if !(candidate & !mod_bits).is_empty() {
            continue;
        }
        if candidate.contains(ModBits::CTRL) && !candidate.contains(ModBits::ALT) {
            continue;
        }

        let mut wch = if sgcaps {
            table.entry_at(slot.entry + 1)?.wch(level)?
        } else {
            entry.wch(level)?
        };
        let mut is_dead = false;
        if wch == WCH_DEAD {
            wch = table.entry_at(slot.entry + 1)?.wch(level)?;
            is_dead = true;
        }

        if matches!(wch, WCH_DEAD | WCH_LGTR | WCH_NONE) {
            continue;
        }

        let score = (candidate & mod_bits).bits().count_ones() as i32;
        if score > best_score {
            best_score = score;
            best = Some(Resolved {
                wch,
                consumed: candidate,
                is_dead,
                caps_inverted,
            });
        }
    }

    Ok(best)
}

/// ORs the bits of every modifier key reported down in `key_state`.
pub fn keystate_to_modbits<P: PointerWidth>(
    mem: &dyn TableMemory,
    tables: Option<RawLayoutTables>,
    key_state: &[u8; 256],
) -> ModBits {
    let Some(tables) = tables else {
        return ModBits::empty();
    };
    let read = || -> Result<ModBits, TableError> {
        let modifiers = KbdTables::<P>::new(mem, tables).modifiers()?;
        let mut result = ModBits::empty();
        for i in 0.. {
            let Some((vk, bits)) = modifiers.vk_to_bit(i)? else {
                break;
            };
            if key_state[vk as usize] & 0x80 != 0 {
                result |= bits;
            }
        }
        Ok(result)
    };
    read().unwrap_or_else(|err| {
        log::trace!("modifier keys unreadable: {err}");
        ModBits::empty()
    })
}

/// Level for `mod_bits`, straight from `ModNumber[]`. Combinations beyond the
/// layout's largest declared bitset, and layouts without tables, give level 0.
pub fn modbits_to_level<P: PointerWidth>(
    mem: &dyn TableMemory,
    tables: Option<RawLayoutTables>,
    mod_bits: ModBits,
) -> u8 {
    let Some(tables) = tables else {
        return 0;
    };
    let read = || -> Result<u8, TableError> {
        let modifiers = KbdTables::<P>::new(mem, tables).modifiers()?;
        let bits = mod_bits.bits() as u16;
        if bits > modifiers.max_mod_bits {
            return Ok(0);
        }
        modifiers.mod_number(bits)
    };
    read().unwrap_or(0)
}

/// Looks up what `base` becomes after dead key `dead`.
pub fn compose_dead_key<P: PointerWidth>(
    mem: &dyn TableMemory,
    tables: RawLayoutTables,
    dead: u16,
    base: u16,
) -> Option<Composed> {
    let lookup = || -> Result<Option<Composed>, TableError> {
        let Some(dead_keys) = KbdTables::<P>::new(mem, tables).dead_keys()? else {
            return Ok(None);
        };
        Ok(dead_keys.find(dead, base)?.and_then(|entry| {
            Some(Composed {
                character: char::from_u32(entry.composed as u32)?,
                is_dead: entry.flags & DKF_DEAD != 0,
            })
        }))
    };
    lookup().ok().flatten()
}

/// `fLocaleFlags` of the layout.
pub fn locale_flags<P: PointerWidth>(mem: &dyn TableMemory, tables: RawLayoutTables) -> u32 {
    KbdTables::<P>::new(mem, tables)
        .locale_flags()
        .unwrap_or(0)
}
