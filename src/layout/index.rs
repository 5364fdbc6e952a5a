//! Lookup structures built once per loaded layout.

use std::collections::HashMap;

use super::memory::{TableError, TableMemory};
use super::pointer::PointerWidth;
use super::tables::KbdTables;
use super::types::{
    KeyEntry, MAX_LEVELS, ModBits, RawLayoutTables, SHFT_INVALID, VK_DEAD_BASE, VkSlot, WCH_DEAD,
    is_sentinel,
};
use crate::vk::VK_TAB;

/// Per-layout indexes over the driver tables.
///
/// A default index is empty: every lookup against it misses, which is how
/// stub layouts without tables behave.
#[derive(Debug, Clone)]
pub struct LayoutIndex {
    pub(crate) vk_lookup: [Option<VkSlot>; 256],
    pub(crate) level_to_modbits: [ModBits; MAX_LEVELS],
    pub(crate) max_level: u8,
    pub(crate) max_modbit_value: u16,
    pub(crate) key_entries: Vec<KeyEntry>,
    pub(crate) reverse: HashMap<u16, usize>,
}

impl Default for LayoutIndex {
    fn default() -> Self {
        Self {
            vk_lookup: [None; 256],
            level_to_modbits: [ModBits::empty(); MAX_LEVELS],
            max_level: 0,
            max_modbit_value: 0,
            key_entries: Vec::new(),
            reverse: HashMap::new(),
        }
    }
}

impl LayoutIndex {
    pub fn vk_slot(&self, vk: u8) -> Option<VkSlot> {
        self.vk_lookup[vk as usize]
    }

    /// Modifier combination selecting `level`, if the level is in range.
    pub fn level_to_modbits(&self, level: u8) -> Option<ModBits> {
        (level <= self.max_level)
            .then(|| self.level_to_modbits.get(level as usize).copied())
            .flatten()
    }

    pub fn max_level(&self) -> u8 {
        self.max_level
    }

    pub fn max_modbit_value(&self) -> u16 {
        self.max_modbit_value
    }

    pub fn key_entry(&self, index: usize) -> Option<&KeyEntry> {
        self.key_entries.get(index)
    }

    /// Head of the chain of entries producing UTF-16 unit `wch`.
    pub fn chain_head(&self, wch: u16) -> Option<usize> {
        self.reverse.get(&wch).copied()
    }

    /// Walks the chain of (key, modifiers) combinations producing `wch`,
    /// newest first.
    pub fn entries_for_char(&self, wch: u16) -> ChainIter<'_> {
        ChainIter {
            index: self,
            next: self.chain_head(wch),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.key_entries.is_empty()
    }
}

/// Iterator over one reverse-index chain.
pub struct ChainIter<'a> {
    index: &'a LayoutIndex,
    next: Option<usize>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = &'a KeyEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.index.key_entries.get(self.next?)?;
        self.next = entry.next;
        Some(entry)
    }
}

/// Walks the driver tables and builds the layout's indexes.
pub fn build_index<P: PointerWidth>(
    mem: &dyn TableMemory,
    tables: RawLayoutTables,
) -> Result<LayoutIndex, TableError> {
    let kbd = KbdTables::<P>::new(mem, tables);
    let modifiers = kbd.modifiers()?;
    let mut index = LayoutIndex::default();

    // Level 0 entries are skipped: some layouts wrongly map valid combinations
    // to level 0, which would clobber the unmodified level.
    let max_bits = modifiers.max_mod_bits.min(u8::MAX as u16);
    for bits in 0..=max_bits {
        let level = modifiers.mod_number(bits)?;
        if level == SHFT_INVALID || level == 0 || level as usize >= MAX_LEVELS {
            continue;
        }
        index.max_level = index.max_level.max(level);
        index.level_to_modbits[level as usize] = ModBits::from_bits_retain(bits as u8);
    }
    index.max_modbit_value = modifiers.max_mod_bits;

    // Identity entries so a bare virtual key can serve as a chain head.
    index.key_entries.reserve(257);
    for vk in 0..=u8::MAX {
        index.key_entries.push(KeyEntry {
            vk,
            mod_bits: ModBits::empty(),
            is_dead: false,
            next: None,
        });
    }
    index.key_entries.push(KeyEntry {
        vk: VK_TAB,
        mod_bits: ModBits::SHIFT,
        is_dead: false,
        next: None,
    });

    for table_idx in 0.. {
        let Some(table) = kbd.wchar_table(table_idx)? else {
            break;
        };

        for entry_idx in 0.. {
            let Some(entry) = table.entry(entry_idx)? else {
                break;
            };

            // Base characters of the dead key before it; reached through
            // that key only.
            if entry.vk == VK_DEAD_BASE {
                continue;
            }

            // SGCAPS layouts repeat a key in the following entry; only the
            // first one is reachable by virtual key.
            let slot = &mut index.vk_lookup[entry.vk as usize];
            if slot.is_none() {
                *slot = Some(VkSlot {
                    table: table_idx,
                    entry: entry_idx,
                });
            }

            for level in 0..table.n_levels {
                let mut wch = entry.wch(level)?;
                let is_dead = wch == WCH_DEAD;
                if is_dead {
                    wch = match table.entry(entry_idx + 1)? {
                        Some(base) => base.wch(level)?,
                        None => continue,
                    };
                }
                if is_sentinel(wch) {
                    continue;
                }

                let mod_bits = index
                    .level_to_modbits
                    .get(level as usize)
                    .copied()
                    .unwrap_or_default();
                let inserted = index.key_entries.len();
                index.key_entries.push(KeyEntry {
                    vk: entry.vk,
                    mod_bits,
                    is_dead,
                    next: index.reverse.get(&wch).copied(),
                });
                index.reverse.insert(wch, inserted);
            }
        }
    }

    log::trace!(
        "indexed layout at {:#x}: {} key entries, max level {}, max modbits {}",
        tables.0,
        index.key_entries.len(),
        index.max_level,
        index.max_modbit_value
    );

    Ok(index)
}
