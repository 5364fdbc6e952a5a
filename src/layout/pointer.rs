//! Host-sized pointer fields inside keyboard driver tables.
//!
//! A keyboard driver is built for the pointer width of the *host* system. A
//! 32-bit process on a 64-bit Windows (WOW64) therefore receives tables whose
//! pointer fields are 8 bytes wide, of which only the low 4 bytes address
//! anything in the process. Every pointer-sized field is read through a
//! [`PointerWidth`] so the same table code serves both layouts.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use super::memory::{TableError, TableMemory};

/// How pointer fields in the driver tables must be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerModel {
    /// Fields match the consuming process's pointer width.
    Native,
    /// 32-bit process, 64-bit host: 8-byte fields, low 4 bytes significant.
    Wow64,
}

impl fmt::Display for PointerModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerModel::Native => f.write_str("native"),
            PointerModel::Wow64 => f.write_str("wow64"),
        }
    }
}

/// Physical representation of a pointer field.
pub trait PointerWidth: 'static {
    /// Bytes the field occupies, which is also its alignment.
    const SIZE: u64;
    const MODEL: PointerModel;

    /// Converts the raw field value into an address in the consuming process.
    fn address(raw: u64) -> u64;
}

/// Pointer fields of a 32-bit driver read by a 32-bit process.
#[derive(Debug, Clone, Copy)]
pub struct Ptr32;

/// Pointer fields of a 64-bit driver read by a 64-bit process.
#[derive(Debug, Clone, Copy)]
pub struct Ptr64;

/// Pointer fields of a 64-bit driver read by a 32-bit process.
#[derive(Debug, Clone, Copy)]
pub struct Wow64Ptr;

impl PointerWidth for Ptr32 {
    const SIZE: u64 = 4;
    const MODEL: PointerModel = PointerModel::Native;

    #[inline(always)]
    fn address(raw: u64) -> u64 {
        raw
    }
}

impl PointerWidth for Ptr64 {
    const SIZE: u64 = 8;
    const MODEL: PointerModel = PointerModel::Native;

    #[inline(always)]
    fn address(raw: u64) -> u64 {
        raw
    }
}

impl PointerWidth for Wow64Ptr {
    const SIZE: u64 = 8;
    const MODEL: PointerModel = PointerModel::Wow64;

    #[inline(always)]
    fn address(raw: u64) -> u64 {
        // Only the low half is meaningful to a 32-bit consumer.
        raw as u32 as u64
    }
}

#[cfg(target_pointer_width = "64")]
pub type NativePtr = Ptr64;
#[cfg(target_pointer_width = "32")]
pub type NativePtr = Ptr32;

/// A pointer field value tagged with the width it was read with.
pub struct HostPtr<P: PointerWidth> {
    raw: u64,
    _width: PhantomData<P>,
}

impl<P: PointerWidth> HostPtr<P> {
    pub fn from_raw(raw: u64) -> Self {
        Self {
            raw,
            _width: PhantomData,
        }
    }

    /// Reads the pointer field stored at `at`.
    pub fn read(mem: &dyn TableMemory, at: u64) -> Result<Self, TableError> {
        let raw = match P::SIZE {
            4 => mem.read_u32(at)? as u64,
            _ => mem.read_u64(at)?,
        };
        Ok(Self::from_raw(raw))
    }

    pub fn raw(&self) -> u64 {
        self.raw
    }

    pub fn address(&self) -> u64 {
        P::address(self.raw)
    }

    pub fn is_null(&self) -> bool {
        self.address() == 0
    }

    /// Address of the pointee, or [`TableError::NullPointer`] naming the field.
    pub fn deref(&self, field: &'static str) -> Result<u64, TableError> {
        match self.address() {
            0 => Err(TableError::NullPointer(field)),
            addr => Ok(addr),
        }
    }
}

impl<P: PointerWidth> Clone for HostPtr<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: PointerWidth> Copy for HostPtr<P> {}

impl<P: PointerWidth> fmt::Debug for HostPtr<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostPtr<{}>({:#x})", P::MODEL, self.raw)
    }
}

/// Rounds `offset` up to a multiple of the pointer size.
#[inline]
pub(crate) fn align_to_ptr<P: PointerWidth>(offset: u64) -> u64 {
    offset.div_ceil(P::SIZE) * P::SIZE
}
