//! Pointer-width variants of the layout engine behind one function table.

use std::path::Path;

use super::index::{LayoutIndex, build_index};
use super::memory::{TableError, TableMemory};
use super::pointer::{NativePtr, PointerModel, PointerWidth, Wow64Ptr};
use super::resolve;
use super::types::{Composed, LockBits, ModBits, RawLayoutTables, Resolved};
use crate::error::KeymapError;
use crate::loader::{self, LoadedDriver};
use crate::platform::KeyboardPlatform;

/// The engine operations for one pointer model.
///
/// The rest of the crate only calls through this table, so it does not care
/// which variant was selected.
#[derive(Clone, Copy)]
pub struct LayoutImpl {
    pub model: PointerModel,
    pub load: fn(&dyn KeyboardPlatform, &Path, &str) -> Result<LoadedDriver, KeymapError>,
    pub build_index: fn(&dyn TableMemory, RawLayoutTables) -> Result<LayoutIndex, TableError>,
    pub keystate_to_modbits: fn(&dyn TableMemory, Option<RawLayoutTables>, &[u8; 256]) -> ModBits,
    pub modbits_to_level: fn(&dyn TableMemory, Option<RawLayoutTables>, ModBits) -> u8,
    pub resolve: fn(
        &dyn TableMemory,
        RawLayoutTables,
        &LayoutIndex,
        u8,
        ModBits,
        LockBits,
    ) -> Option<Resolved>,
    pub compose_dead_key: fn(&dyn TableMemory, RawLayoutTables, u16, u16) -> Option<Composed>,
    pub locale_flags: fn(&dyn TableMemory, RawLayoutTables) -> u32,
}

impl std::fmt::Debug for LayoutImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutImpl")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl LayoutImpl {
    const fn for_width<P: PointerWidth>() -> Self {
        Self {
            model: P::MODEL,
            load: loader::load_driver::<P>,
            build_index: build_index::<P>,
            keystate_to_modbits: resolve::keystate_to_modbits::<P>,
            modbits_to_level: resolve::modbits_to_level::<P>,
            resolve: resolve::resolve::<P>,
            compose_dead_key: resolve::compose_dead_key::<P>,
            locale_flags: resolve::locale_flags::<P>,
        }
    }

    /// Tables built for the consuming process's own pointer width.
    pub fn native() -> &'static LayoutImpl {
        static NATIVE: LayoutImpl = LayoutImpl::for_width::<NativePtr>();
        &NATIVE
    }

    /// Tables of a 64-bit host read from a 32-bit process.
    pub fn wow64() -> &'static LayoutImpl {
        static WOW64: LayoutImpl = LayoutImpl::for_width::<Wow64Ptr>();
        &WOW64
    }

    pub fn for_model(model: PointerModel) -> &'static LayoutImpl {
        match model {
            PointerModel::Native => Self::native(),
            PointerModel::Wow64 => Self::wow64(),
        }
    }

    /// Picks the variant for a process. Only a 32-bit process on a 64-bit
    /// host needs the WOW64 one.
    pub fn detect(is_wow64_process: bool) -> &'static LayoutImpl {
        if cfg!(target_pointer_width = "32") && is_wow64_process {
            Self::wow64()
        } else {
            Self::native()
        }
    }
}
