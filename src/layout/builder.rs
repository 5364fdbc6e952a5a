//! Writer for synthetic `KBDTABLES` images.
//!
//! Produces the same byte layout a keyboard driver exports, for a chosen
//! pointer width. Used to serve layouts from a [`MemoryArena`] where no
//! driver library is available, and by the test suites.
//!
//! [`MemoryArena`]: super::memory::MemoryArena

use std::marker::PhantomData;

use super::pointer::{PointerWidth, align_to_ptr};
use super::tables::{DEAD_KEY_SIZE, DeadKeyEntry, Offsets, VK_TO_BIT_SIZE};
use super::types::{ModBits, SHFT_INVALID, VkAttributes, WCH_NONE};

#[derive(Debug, Clone)]
struct TableSpec {
    n_levels: u8,
    entries: Vec<(u8, VkAttributes, Vec<u16>)>,
}

/// Builder for a `KBDTABLES` image with pointer fields of width `P`.
#[derive(Debug, Clone)]
pub struct KbdTablesBuilder<P: PointerWidth> {
    vk_to_bit: Vec<(u8, ModBits)>,
    mod_numbers: Vec<u8>,
    tables: Vec<TableSpec>,
    dead_keys: Vec<DeadKeyEntry>,
    locale_flags: u32,
    pointer_tag: u64,
    _width: PhantomData<P>,
}

impl<P: PointerWidth> Default for KbdTablesBuilder<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PointerWidth> KbdTablesBuilder<P> {
    pub fn new() -> Self {
        Self {
            vk_to_bit: Vec::new(),
            mod_numbers: vec![0],
            tables: Vec::new(),
            dead_keys: Vec::new(),
            locale_flags: 0,
            pointer_tag: 0,
            _width: PhantomData,
        }
    }

    /// Declares that holding `vk` sets `bits`.
    pub fn modifier_key(mut self, vk: u8, bits: ModBits) -> Self {
        self.vk_to_bit.push((vk, bits));
        self
    }

    /// `ModNumber[]`, indexed by modifier combination. Its length defines
    /// `wMaxModBits + 1`.
    pub fn mod_numbers(mut self, numbers: &[u8]) -> Self {
        self.mod_numbers = numbers.to_vec();
        self
    }

    /// Marks `bits` as level `level`, growing `ModNumber[]` with
    /// [`SHFT_INVALID`] as needed.
    pub fn level(mut self, bits: ModBits, level: u8) -> Self {
        let index = bits.bits() as usize;
        if self.mod_numbers.len() <= index {
            self.mod_numbers.resize(index + 1, SHFT_INVALID);
        }
        self.mod_numbers[index] = level;
        self
    }

    /// Appends a character table whose entries carry `n_levels` characters.
    /// Short character lists are padded with [`WCH_NONE`].
    pub fn table(mut self, n_levels: u8, entries: &[(u8, VkAttributes, &[u16])]) -> Self {
        let entries = entries
            .iter()
            .map(|(vk, attrs, chars)| {
                let mut chars = chars.to_vec();
                chars.resize(n_levels as usize, WCH_NONE);
                (*vk, *attrs, chars)
            })
            .collect();
        self.tables.push(TableSpec { n_levels, entries });
        self
    }

    /// Adds a dead-key composition: `dead` followed by `base` gives `composed`.
    pub fn dead_key(mut self, dead: u16, base: u16, composed: u16, flags: u16) -> Self {
        self.dead_keys.push(DeadKeyEntry {
            base,
            dead,
            composed,
            flags,
        });
        self
    }

    pub fn locale_flags(mut self, flags: u32) -> Self {
        self.locale_flags = flags;
        self
    }

    /// Bits ORed into every non-null pointer field, to emulate garbage in the
    /// unused upper half of WOW64 pointers.
    pub fn pointer_tag(mut self, tag: u64) -> Self {
        self.pointer_tag = tag;
        self
    }

    /// Lays the image out for placement at `base`; the `KBDTABLES` root is at
    /// offset 0.
    pub fn build(&self, base: u64) -> Vec<u8> {
        let mut cursor = Offsets::<P>::kbd_tables_size();
        let mut reserve = |len: u64| {
            let at = cursor;
            cursor = align_to_ptr::<P>(cursor + len);
            at
        };

        let modifiers = reserve(Offsets::<P>::MODS_MOD_NUMBER + self.mod_numbers.len() as u64);
        let vk_to_bit = reserve(VK_TO_BIT_SIZE * (self.vk_to_bit.len() as u64 + 1));
        let table_array = reserve(Offsets::<P>::table_stride() * (self.tables.len() as u64 + 1));
        let table_entries: Vec<u64> = self
            .tables
            .iter()
            .map(|t| {
                let size = Offsets::<P>::entry_size(t.n_levels) as u64;
                reserve(size * (t.entries.len() as u64 + 1))
            })
            .collect();
        let dead_keys = if self.dead_keys.is_empty() {
            None
        } else {
            Some(reserve(DEAD_KEY_SIZE * (self.dead_keys.len() as u64 + 1)))
        };

        let mut image = Image {
            bytes: vec![0u8; cursor as usize],
            base,
            tag: self.pointer_tag,
            _width: PhantomData::<P>,
        };

        image.put_ptr(Offsets::<P>::CHAR_MODIFIERS, Some(modifiers));
        image.put_ptr(Offsets::<P>::VK_TO_WCHAR_TABLE, Some(table_array));
        image.put_ptr(Offsets::<P>::DEAD_KEY, dead_keys);
        image.put(Offsets::<P>::LOCALE_FLAGS, &self.locale_flags.to_le_bytes());

        image.put_ptr(modifiers, Some(vk_to_bit));
        let max_mod_bits = self.mod_numbers.len().saturating_sub(1) as u16;
        image.put(
            modifiers + Offsets::<P>::MODS_MAX_MOD_BITS,
            &max_mod_bits.to_le_bytes(),
        );
        image.put(modifiers + Offsets::<P>::MODS_MOD_NUMBER, &self.mod_numbers);

        for (i, (vk, bits)) in self.vk_to_bit.iter().enumerate() {
            image.put(vk_to_bit + VK_TO_BIT_SIZE * i as u64, &[*vk, bits.bits()]);
        }

        for (i, (table, entries_at)) in self.tables.iter().zip(&table_entries).enumerate() {
            let at = table_array + Offsets::<P>::table_stride() * i as u64;
            let entry_size = Offsets::<P>::entry_size(table.n_levels);
            image.put_ptr(at, Some(*entries_at));
            image.put(at + Offsets::<P>::TABLE_N_MODIFICATIONS, &[table.n_levels]);
            image.put(at + Offsets::<P>::TABLE_CB_SIZE, &[entry_size]);

            for (j, (vk, attrs, chars)) in table.entries.iter().enumerate() {
                let entry = entries_at + entry_size as u64 * j as u64;
                image.put(entry, &[*vk, attrs.bits()]);
                for (level, wch) in chars.iter().enumerate() {
                    image.put(entry + 2 + 2 * level as u64, &wch.to_le_bytes());
                }
            }
        }

        if let Some(dead_at) = dead_keys {
            for (i, entry) in self.dead_keys.iter().enumerate() {
                let at = dead_at + DEAD_KEY_SIZE * i as u64;
                let both = (entry.base as u32) | ((entry.dead as u32) << 16);
                image.put(at, &both.to_le_bytes());
                image.put(at + 4, &entry.composed.to_le_bytes());
                image.put(at + 6, &entry.flags.to_le_bytes());
            }
        }

        image.bytes
    }
}

struct Image<P> {
    bytes: Vec<u8>,
    base: u64,
    tag: u64,
    _width: PhantomData<P>,
}

impl<P: PointerWidth> Image<P> {
    fn put(&mut self, at: u64, data: &[u8]) {
        let at = at as usize;
        self.bytes[at..at + data.len()].copy_from_slice(data);
    }

    fn put_ptr(&mut self, at: u64, target: Option<u64>) {
        let raw = target.map_or(0, |offset| (self.base + offset) | self.tag);
        match P::SIZE {
            4 => self.put(at, &(raw as u32).to_le_bytes()),
            _ => self.put(at, &raw.to_le_bytes()),
        }
    }
}
