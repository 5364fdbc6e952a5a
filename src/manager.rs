//! The set of installed keyboard layouts and its lazy re-synchronisation.

use std::path::{Path, PathBuf};

use crate::config::KeymapConfig;
use crate::layout::{
    Composed, LayoutImpl, LayoutIndex, LockBits, ModBits, RawLayoutTables, Resolved,
};
use crate::loader::{self, LoadedDriver};
use crate::platform::{KeyboardPlatform, LayoutHandle};

/// One installed layout: its OS handle, its loaded driver and its indexes.
///
/// A layout whose driver could not be located or loaded stays as a stub
/// with no tables. Every query against a stub misses.
#[derive(Debug)]
pub struct LayoutInfo {
    handle: LayoutHandle,
    name: Option<String>,
    file: Option<PathBuf>,
    index: LayoutIndex,
    // Declared last so the index goes before the library it describes.
    driver: Option<LoadedDriver>,
}

impl LayoutInfo {
    fn stub(handle: LayoutHandle) -> Self {
        Self {
            handle,
            name: None,
            file: None,
            index: LayoutIndex::default(),
            driver: None,
        }
    }

    pub fn handle(&self) -> LayoutHandle {
        self.handle
    }

    /// Layout name (`KLID`) the OS reported for this layout.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Driver file, once located.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn tables(&self) -> Option<RawLayoutTables> {
        self.driver.as_ref().map(|driver| driver.tables)
    }

    pub fn index(&self) -> &LayoutIndex {
        &self.index
    }

    pub fn is_stub(&self) -> bool {
        self.driver.is_none()
    }

    fn unload(&mut self) {
        if let Some(driver) = self.driver.take() {
            log::debug!("unloading keyboard layout {} ({:?})", self.handle, driver.tables);
        }
        self.index = LayoutIndex::default();
        self.name = None;
        self.file = None;
    }
}

/// Restores the thread's active layout when a sync is done with it.
struct RestoreActiveLayout<'a> {
    platform: &'a dyn KeyboardPlatform,
    original: LayoutHandle,
    switched: bool,
}

impl RestoreActiveLayout<'_> {
    fn activate(&mut self, handle: LayoutHandle) -> bool {
        self.switched = true;
        self.platform.activate_layout(handle)
    }
}

impl Drop for RestoreActiveLayout<'_> {
    fn drop(&mut self) {
        if self.switched && !self.platform.activate_layout(self.original) {
            log::warn!("failed to restore keyboard layout {}", self.original);
        }
    }
}

/// Owns every installed layout and keeps the set in step with the OS.
///
/// The set is rebuilt lazily: [`notify_layouts_changed`] only bumps a serial
/// number, and the next query compares it to the serial of the last sync.
///
/// [`notify_layouts_changed`]: LayoutSetManager::notify_layouts_changed
pub struct LayoutSetManager<K: KeyboardPlatform> {
    platform: K,
    config: KeymapConfig,
    imp: &'static LayoutImpl,
    infos: Vec<LayoutInfo>,
    active: usize,
    serial: u64,
    synced_serial: Option<u64>,
}

impl<K: KeyboardPlatform> LayoutSetManager<K> {
    pub fn new(platform: K, config: KeymapConfig) -> Self {
        let imp = match config.pointer_model.forced() {
            Some(model) => LayoutImpl::for_model(model),
            None => LayoutImpl::detect(platform.is_wow64_process()),
        };
        log::debug!("reading keyboard layout tables with the {} pointer model", imp.model);

        Self {
            platform,
            config,
            imp,
            infos: Vec::new(),
            active: 0,
            serial: 0,
            synced_serial: None,
        }
    }

    pub fn platform(&self) -> &K {
        &self.platform
    }

    pub fn config(&self) -> &KeymapConfig {
        &self.config
    }

    pub fn layout_impl(&self) -> &'static LayoutImpl {
        self.imp
    }

    /// Marks the layout set stale. Call when the OS reports that the list of
    /// installed layouts changed.
    pub fn notify_layouts_changed(&mut self) {
        self.serial = self.serial.wrapping_add(1);
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn is_stale(&self) -> bool {
        self.synced_serial != Some(self.serial) || self.infos.is_empty()
    }

    /// Brings the layout set in line with the OS if it is stale.
    ///
    /// Positions whose handle is unchanged keep their loaded driver. Changed
    /// positions are torn down and rebuilt, and positions beyond the new list
    /// are dropped. Layout names are only available for the active layout,
    /// so each changed layout is activated in turn and the original one is
    /// restored afterwards.
    pub fn sync(&mut self) {
        if !self.is_stale() {
            return;
        }

        let handles = self.platform.layout_list();
        let original = self.platform.current_layout();
        log::debug!(
            "syncing {} keyboard layouts (serial {})",
            handles.len(),
            self.serial
        );

        self.infos.truncate(handles.len());
        {
            let mut restore = RestoreActiveLayout {
                platform: &self.platform,
                original,
                switched: false,
            };

            for (position, &handle) in handles.iter().enumerate() {
                match self.infos.get_mut(position) {
                    Some(info) if info.handle == handle => continue,
                    Some(info) => info.unload(),
                    None => {}
                }

                let info = load_layout(&mut restore, &self.config, self.imp, handle);
                match self.infos.get_mut(position) {
                    Some(slot) => *slot = info,
                    None => self.infos.push(info),
                }
            }
        }

        self.active = handles
            .iter()
            .position(|&handle| handle == original)
            .unwrap_or(0);
        self.synced_serial = Some(self.serial);
    }

    /// Installed layouts, synced first.
    pub fn layouts(&mut self) -> &[LayoutInfo] {
        self.sync();
        &self.infos
    }

    /// Installed layouts as of the last sync.
    pub fn synced_layouts(&self) -> &[LayoutInfo] {
        &self.infos
    }

    pub fn layout_count(&mut self) -> usize {
        self.sync();
        self.infos.len()
    }

    pub fn layout(&mut self, group: usize) -> Option<&LayoutInfo> {
        self.sync();
        self.infos.get(group)
    }

    pub fn active_group(&mut self) -> usize {
        self.sync();
        self.active
    }

    /// Makes `group` the active group. Out-of-range groups are ignored.
    pub fn set_active_group(&mut self, group: usize) -> bool {
        self.sync();
        if group >= self.infos.len() {
            return false;
        }
        self.active = group;
        true
    }

    /// Makes the group of OS layout `handle` active.
    pub fn set_active_layout(&mut self, handle: LayoutHandle) -> bool {
        self.sync();
        match self.infos.iter().position(|info| info.handle == handle) {
            Some(group) => {
                self.active = group;
                true
            }
            None => {
                log::debug!("keyboard layout {handle} is not installed");
                false
            }
        }
    }

    /// Resolves a key with explicit lock bits.
    pub fn resolve_with_locks(
        &mut self,
        group: usize,
        vk: u8,
        mod_bits: ModBits,
        lock_bits: LockBits,
    ) -> Option<Resolved> {
        self.sync();
        self.resolve(group, vk, mod_bits, lock_bits)
    }

    // Queries below read the set as of the last sync.

    pub(crate) fn resolve(
        &self,
        group: usize,
        vk: u8,
        mod_bits: ModBits,
        lock_bits: LockBits,
    ) -> Option<Resolved> {
        let info = self.infos.get(group)?;
        let tables = info.tables()?;
        (self.imp.resolve)(
            self.platform.table_memory(),
            tables,
            &info.index,
            vk,
            mod_bits,
            lock_bits,
        )
    }

    pub(crate) fn modbits_to_level(&self, group: usize, mod_bits: ModBits) -> u8 {
        let tables = self.infos.get(group).and_then(LayoutInfo::tables);
        (self.imp.modbits_to_level)(self.platform.table_memory(), tables, mod_bits)
    }

    pub(crate) fn level_to_modbits(&self, group: usize, level: u8) -> Option<ModBits> {
        self.infos.get(group)?.index.level_to_modbits(level)
    }

    pub(crate) fn keystate_to_modbits(&self, group: usize, key_state: &[u8; 256]) -> ModBits {
        let tables = self.infos.get(group).and_then(LayoutInfo::tables);
        (self.imp.keystate_to_modbits)(self.platform.table_memory(), tables, key_state)
    }

    pub(crate) fn compose_dead_key(&self, group: usize, dead: u16, base: u16) -> Option<Composed> {
        let tables = self.infos.get(group)?.tables()?;
        (self.imp.compose_dead_key)(self.platform.table_memory(), tables, dead, base)
    }

    pub(crate) fn locale_flags(&self, group: usize) -> u32 {
        match self.infos.get(group).and_then(LayoutInfo::tables) {
            Some(tables) => (self.imp.locale_flags)(self.platform.table_memory(), tables),
            None => 0,
        }
    }
}

fn load_layout(
    restore: &mut RestoreActiveLayout<'_>,
    config: &KeymapConfig,
    imp: &LayoutImpl,
    handle: LayoutHandle,
) -> LayoutInfo {
    let platform = restore.platform;
    let mut info = LayoutInfo::stub(handle);

    if !restore.activate(handle) {
        log::warn!("failed to activate keyboard layout {handle}");
        return info;
    }
    let Some(name) = platform.current_layout_name() else {
        log::warn!("keyboard layout {handle} has no name");
        return info;
    };
    info.name = Some(name.clone());

    let path = match loader::locate_driver_file(platform, config, &name) {
        Ok(path) => path,
        Err(err) => {
            log::warn!("keyboard layout {handle}: {err}");
            return info;
        }
    };
    info.file = Some(path.clone());

    let driver = match (imp.load)(platform, &path, &config.descriptor_symbol) {
        Ok(driver) => driver,
        Err(err) => {
            log::warn!("keyboard layout {handle}: {err}");
            return info;
        }
    };

    match (imp.build_index)(platform.table_memory(), driver.tables) {
        Ok(index) => {
            log::debug!("loaded keyboard layout {handle} ({name}) from {}", path.display());
            info.index = index;
            info.driver = Some(driver);
        }
        Err(err) => {
            log::warn!("keyboard layout {handle}: unreadable tables in {}: {err}", path.display());
        }
    }
    info
}
