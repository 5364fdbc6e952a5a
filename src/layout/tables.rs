//! Typed read-only views over a driver's `KBDTABLES` structure.
//!
//! ```text
//! KBDTABLES            (P = pointer field size, fields P-aligned)
//!   0     pCharModifiers    -> MODIFIERS
//!   P     pVkToWcharTable   -> VK_TO_WCHAR_TABLE[]   (null pVkToWchars ends the list)
//!   2P    pDeadKey          -> DEADKEY[]             (dwBoth == 0 ends the list)
//!   3P..6P key name tables, scan code map
//!   7P    bMaxVSCtoVK
//!   8P,9P extended scan code maps
//!   10P   fLocaleFlags
//!
//! MODIFIERS            0 pVkToBit -> VK_TO_BIT[] (Vk == 0 ends), P wMaxModBits, P+2 ModNumber[]
//! VK_TO_WCHAR_TABLE    0 pVkToWchars, P nModifications, P+1 cbSize
//! VK_TO_WCHARS         0 VirtualKey (0 ends), 1 Attributes, 2 wch[nModifications]
//! DEADKEY              0 dwBoth = MAKELONG(base, dead), 4 wchComposed, 6 uFlags
//! ```

use std::marker::PhantomData;

use super::memory::{TableError, TableMemory};
use super::pointer::{HostPtr, PointerWidth, align_to_ptr};
use super::types::{ModBits, RawLayoutTables, VkAttributes};

pub(crate) const VK_TO_BIT_SIZE: u64 = 2;
pub(crate) const DEAD_KEY_SIZE: u64 = 8;

/// Byte offsets of the structures above for pointer width `P`.
pub(crate) struct Offsets<P>(PhantomData<P>);

impl<P: PointerWidth> Offsets<P> {
    pub const CHAR_MODIFIERS: u64 = 0;
    pub const VK_TO_WCHAR_TABLE: u64 = P::SIZE;
    pub const DEAD_KEY: u64 = 2 * P::SIZE;
    pub const LOCALE_FLAGS: u64 = 10 * P::SIZE;

    pub const MODS_MAX_MOD_BITS: u64 = P::SIZE;
    pub const MODS_MOD_NUMBER: u64 = P::SIZE + 2;

    pub const TABLE_N_MODIFICATIONS: u64 = P::SIZE;
    pub const TABLE_CB_SIZE: u64 = P::SIZE + 1;

    pub fn kbd_tables_size() -> u64 {
        // pLigature follows nLgMax/cbLgEntry, then dwType and dwSubType.
        let ligature = align_to_ptr::<P>(Self::LOCALE_FLAGS + 6);
        align_to_ptr::<P>(ligature + P::SIZE + 8)
    }

    pub fn table_stride() -> u64 {
        align_to_ptr::<P>(P::SIZE + 2)
    }

    pub fn entry_size(n_levels: u8) -> u8 {
        2 + 2 * n_levels
    }
}

/// Root view of a driver's tables.
pub struct KbdTables<'m, P: PointerWidth> {
    mem: &'m dyn TableMemory,
    root: u64,
    _width: PhantomData<P>,
}

impl<'m, P: PointerWidth> KbdTables<'m, P> {
    pub fn new(mem: &'m dyn TableMemory, tables: RawLayoutTables) -> Self {
        Self {
            mem,
            root: tables.0,
            _width: PhantomData,
        }
    }

    fn pointer(&self, offset: u64) -> Result<HostPtr<P>, TableError> {
        HostPtr::<P>::read(self.mem, self.root + offset)
    }

    pub fn modifiers(&self) -> Result<Modifiers<'m>, TableError> {
        let base = self
            .pointer(Offsets::<P>::CHAR_MODIFIERS)?
            .deref("pCharModifiers")?;
        let vk_to_bit = HostPtr::<P>::read(self.mem, base)?.deref("pVkToBit")?;
        let max_mod_bits = self.mem.read_u16(base + Offsets::<P>::MODS_MAX_MOD_BITS)?;
        Ok(Modifiers {
            mem: self.mem,
            vk_to_bit,
            max_mod_bits,
            mod_number: base + Offsets::<P>::MODS_MOD_NUMBER,
        })
    }

    /// Character table `index`, or `None` once the terminating entry is reached.
    pub fn wchar_table(&self, index: usize) -> Result<Option<WcharTable<'m>>, TableError> {
        let tables = self
            .pointer(Offsets::<P>::VK_TO_WCHAR_TABLE)?
            .deref("pVkToWcharTable")?;
        let at = tables + Offsets::<P>::table_stride() * index as u64;
        let entries = HostPtr::<P>::read(self.mem, at)?;
        if entries.is_null() {
            return Ok(None);
        }
        Ok(Some(WcharTable {
            mem: self.mem,
            entries: entries.address(),
            n_levels: self.mem.read_u8(at + Offsets::<P>::TABLE_N_MODIFICATIONS)?,
            entry_size: self.mem.read_u8(at + Offsets::<P>::TABLE_CB_SIZE)?,
        }))
    }

    /// The dead-key composition table, if the layout has one.
    pub fn dead_keys(&self) -> Result<Option<DeadKeys<'m>>, TableError> {
        let ptr = self.pointer(Offsets::<P>::DEAD_KEY)?;
        if ptr.is_null() {
            return Ok(None);
        }
        Ok(Some(DeadKeys {
            mem: self.mem,
            base: ptr.address(),
        }))
    }

    pub fn locale_flags(&self) -> Result<u32, TableError> {
        self.mem.read_u32(self.root + Offsets::<P>::LOCALE_FLAGS)
    }
}

/// `MODIFIERS`: which keys set which bits, and which bit combinations are levels.
pub struct Modifiers<'m> {
    mem: &'m dyn TableMemory,
    vk_to_bit: u64,
    pub max_mod_bits: u16,
    mod_number: u64,
}

impl Modifiers<'_> {
    /// Level for modifier combination `bits`; callers keep `bits <= max_mod_bits`.
    pub fn mod_number(&self, bits: u16) -> Result<u8, TableError> {
        self.mem.read_u8(self.mod_number + bits as u64)
    }

    /// The `index`-th (virtual key, bit) pair, `None` at the terminator.
    pub fn vk_to_bit(&self, index: usize) -> Result<Option<(u8, ModBits)>, TableError> {
        let at = self.vk_to_bit + VK_TO_BIT_SIZE * index as u64;
        let vk = self.mem.read_u8(at)?;
        if vk == 0 {
            return Ok(None);
        }
        let bits = ModBits::from_bits_retain(self.mem.read_u8(at + 1)?);
        Ok(Some((vk, bits)))
    }
}

/// `VK_TO_WCHAR_TABLE`: a run of entries sharing the same number of levels.
#[derive(Clone, Copy)]
pub struct WcharTable<'m> {
    mem: &'m dyn TableMemory,
    entries: u64,
    pub n_levels: u8,
    pub entry_size: u8,
}

impl<'m> WcharTable<'m> {
    /// Entry `index`, or `None` at the zero virtual-key terminator.
    pub fn entry(&self, index: usize) -> Result<Option<VkToWchars<'m>>, TableError> {
        let entry = self.entry_at(index)?;
        Ok((entry.vk != 0).then_some(entry))
    }

    /// Entry `index` without terminator check, for the entry following a dead
    /// or SGCAPS key.
    pub fn entry_at(&self, index: usize) -> Result<VkToWchars<'m>, TableError> {
        let addr = self.entries + self.entry_size as u64 * index as u64;
        Ok(VkToWchars {
            mem: self.mem,
            addr,
            vk: self.mem.read_u8(addr)?,
            attributes: VkAttributes::from_bits_retain(self.mem.read_u8(addr + 1)?),
        })
    }
}

/// `VK_TO_WCHARS`: one virtual key's characters, one per level.
#[derive(Clone, Copy)]
pub struct VkToWchars<'m> {
    mem: &'m dyn TableMemory,
    addr: u64,
    pub vk: u8,
    pub attributes: VkAttributes,
}

impl VkToWchars<'_> {
    pub fn wch(&self, level: u8) -> Result<u16, TableError> {
        self.mem.read_u16(self.addr + 2 + 2 * level as u64)
    }
}

/// A single `DEADKEY` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadKeyEntry {
    pub base: u16,
    pub dead: u16,
    pub composed: u16,
    pub flags: u16,
}

/// `DEADKEY[]`: (dead, base) → composed character.
pub struct DeadKeys<'m> {
    mem: &'m dyn TableMemory,
    base: u64,
}

impl DeadKeys<'_> {
    pub fn entry(&self, index: usize) -> Result<Option<DeadKeyEntry>, TableError> {
        let at = self.base + DEAD_KEY_SIZE * index as u64;
        let both = self.mem.read_u32(at)?;
        if both == 0 {
            return Ok(None);
        }
        Ok(Some(DeadKeyEntry {
            base: (both & 0xFFFF) as u16,
            dead: (both >> 16) as u16,
            composed: self.mem.read_u16(at + 4)?,
            flags: self.mem.read_u16(at + 6)?,
        }))
    }

    pub fn find(&self, dead: u16, base: u16) -> Result<Option<DeadKeyEntry>, TableError> {
        for index in 0.. {
            match self.entry(index)? {
                Some(entry) if entry.dead == dead && entry.base == base => return Ok(Some(entry)),
                Some(_) => {}
                None => break,
            }
        }
        Ok(None)
    }
}
