//! Fake keyboard platform with synthetic US, German and Swiss-German layouts.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use winkeymap::layout::{
    KLLF_ALTGR, KbdTablesBuilder, MemoryArena, ModBits, NativePtr, SHFT_INVALID, TableMemory,
    VkAttributes, WCH_DEAD, WCH_NONE,
};
use winkeymap::vk::*;
use winkeymap::{
    DriverLibrary, KeyboardPlatform, KeymapConfig, KeymapError, LayoutHandle, RegistryHive,
};

pub const US: LayoutHandle = LayoutHandle(0x0409_0409);
pub const GERMAN: LayoutHandle = LayoutHandle(0x0407_0407);
pub const SWISS: LayoutHandle = LayoutHandle(0x0807_0807);
/// US-International, registered only through a substitute.
pub const US_INTL: LayoutHandle = LayoutHandle(0x0002_0409);
/// Hebrew without a registered driver.
pub const HEBREW: LayoutHandle = LayoutHandle(0x040D_040D);
/// Registered driver without the table export.
pub const BROKEN: LayoutHandle = LayoutHandle(0x0419_0419);

pub const SYSTEM_DIR: &str = "C:\\Windows\\System32";

const US_BASE: u64 = 0x0010_0000;
const GERMAN_BASE: u64 = 0x0020_0000;
const SWISS_BASE: u64 = 0x0030_0000;

pub const VK_A: u8 = b'A';
pub const VK_E: u8 = b'E';
pub const VK_Q: u8 = b'Q';
pub const VK_2: u8 = b'2';

fn w(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

type Entry = (u8, VkAttributes, Vec<u16>);

fn refs(entries: &[Entry]) -> Vec<(u8, VkAttributes, &[u16])> {
    entries
        .iter()
        .map(|(vk, attrs, chars)| (*vk, *attrs, chars.as_slice()))
        .collect()
}

fn letters(skip: &[u8]) -> Vec<Entry> {
    (b'A'..=b'Z')
        .filter(|vk| !skip.contains(vk))
        .map(|vk| {
            let lower = vk.to_ascii_lowercase() as u16;
            (vk, VkAttributes::CAPLOK, vec![lower, vk as u16])
        })
        .collect()
}

fn plain(vk: u8, chars: &str) -> Entry {
    (vk, VkAttributes::empty(), w(chars))
}

fn modifier_keys() -> KbdTablesBuilder<NativePtr> {
    KbdTablesBuilder::new()
        .modifier_key(VK_SHIFT, ModBits::SHIFT)
        .modifier_key(VK_CONTROL, ModBits::CTRL)
        .modifier_key(VK_MENU, ModBits::ALT)
}

/// Levels: none, Shift, Ctrl, Shift+Ctrl.
pub fn us_layout() -> KbdTablesBuilder<NativePtr> {
    let mut two = letters(&[]);
    two.extend([
        plain(b'1', "1!"),
        plain(b'3', "3#"),
        plain(VK_OEM_1, ";:"),
        plain(VK_OEM_7, "'\""),
        plain(VK_OEM_3, "`~"),
        plain(VK_OEM_COMMA, ",<"),
        plain(VK_OEM_PERIOD, ".>"),
        plain(VK_OEM_2, "/?"),
        plain(VK_OEM_PLUS, "=+"),
        plain(VK_TAB, "\t\t"),
    ]);
    let three = vec![
        (VK_OEM_4, VkAttributes::empty(), vec![0x5B, 0x7B, 0x1B]),
        (VK_OEM_6, VkAttributes::empty(), vec![0x5D, 0x7D, 0x1D]),
        (VK_OEM_5, VkAttributes::empty(), vec![0x5C, 0x7C, 0x1C]),
        (VK_OEM_8, VkAttributes::empty(), vec![0xA7, WCH_NONE, WCH_NONE]),
        (VK_BACK, VkAttributes::empty(), vec![0x08, 0x08, 0x7F]),
        (VK_ESCAPE, VkAttributes::empty(), vec![0x1B, 0x1B, 0x1B]),
        (VK_RETURN, VkAttributes::empty(), vec![0x0D, 0x0D, 0x0A]),
        plain(VK_SPACE, "   "),
    ];
    let four = vec![
        (VK_2, VkAttributes::empty(), vec![0x32, 0x40, WCH_NONE, 0x00]),
        (b'6', VkAttributes::empty(), vec![0x36, 0x5E, WCH_NONE, 0x1E]),
        (VK_OEM_MINUS, VkAttributes::empty(), vec![0x2D, 0x5F, WCH_NONE, 0x1F]),
    ];

    modifier_keys()
        .mod_numbers(&[0, 1, 2, 3])
        .table(2, &refs(&two))
        .table(3, &refs(&three))
        .table(4, &refs(&four))
}

/// Levels: none, Shift, AltGr, Ctrl, Shift+Ctrl. Two dead keys.
pub fn german_layout() -> KbdTablesBuilder<NativePtr> {
    let mut two = letters(&[VK_Q, VK_E, b'M']);
    two.extend([
        (VK_OEM_1, VkAttributes::CAPLOK, w("üÜ")),
        (VK_OEM_3, VkAttributes::CAPLOK, w("öÖ")),
        (VK_OEM_7, VkAttributes::CAPLOK, w("äÄ")),
        plain(b'1', "1!"),
        plain(VK_TAB, "\t\t"),
    ]);
    let three = vec![
        (VK_Q, VkAttributes::CAPLOK, w("qQ@")),
        (VK_E, VkAttributes::CAPLOK, w("eE€")),
        (b'M', VkAttributes::CAPLOK, w("mMµ")),
        plain(VK_2, "2\"²"),
        plain(b'7', "7/{"),
        plain(VK_OEM_PLUS, "+*~"),
        plain(VK_OEM_102, "<>|"),
        plain(VK_OEM_4, "ß?\\"),
        (VK_OEM_5, VkAttributes::empty(), vec![WCH_DEAD, 0xB0, WCH_NONE]),
        (0xFF, VkAttributes::empty(), vec![0x5E, WCH_NONE, WCH_NONE]),
        (VK_OEM_6, VkAttributes::empty(), vec![WCH_DEAD, WCH_DEAD, WCH_NONE]),
        (0xFF, VkAttributes::empty(), vec![0xB4, 0x60, WCH_NONE]),
        plain(VK_SPACE, "   "),
    ];

    let mut builder = modifier_keys()
        .mod_numbers(&[0, 1, 3, 4, SHFT_INVALID, SHFT_INVALID, 2, SHFT_INVALID])
        .locale_flags(KLLF_ALTGR)
        .table(2, &refs(&two))
        .table(3, &refs(&three));
    for (dead, base, composed) in [
        ('^', 'a', 'â'),
        ('^', 'e', 'ê'),
        ('^', ' ', '^'),
        ('´', 'a', 'á'),
        ('´', 'e', 'é'),
        ('`', 'a', 'à'),
        ('`', 'e', 'è'),
    ] {
        builder = builder.dead_key(dead as u16, base as u16, composed as u16, 0);
    }
    builder
}

/// German modifiers; the umlaut keys are SGCAPS.
pub fn swiss_layout() -> KbdTablesBuilder<NativePtr> {
    let three = vec![
        (VK_OEM_1, VkAttributes::SGCAPS, w("üè[")),
        (VK_OEM_1, VkAttributes::empty(), w("Üè[")),
        (VK_OEM_7, VkAttributes::SGCAPS, w("äà{")),
        (VK_OEM_7, VkAttributes::empty(), w("Äà{")),
        plain(VK_2, "2\"@"),
    ];

    modifier_keys()
        .mod_numbers(&[0, 1, 3, 4, SHFT_INVALID, SHFT_INVALID, 2, SHFT_INVALID])
        .locale_flags(KLLF_ALTGR)
        .table(2, &refs(&letters(&[])))
        .table(3, &refs(&three))
}

/// Observable state shared between a [`FakePlatform`] and its libraries.
#[derive(Debug)]
pub struct FakeState {
    pub installed: Vec<LayoutHandle>,
    pub current: LayoutHandle,
    pub names: HashMap<LayoutHandle, String>,
    pub registry: HashMap<(RegistryHive, String, String), String>,
    /// Driver file name to the address its export returns; `None` means the
    /// export is missing.
    pub drivers: HashMap<String, Option<u64>>,
    pub key_state: [u8; 256],
    pub loads: Vec<(u64, String)>,
    pub unloads: Vec<(u64, String)>,
    pub activations: Vec<LayoutHandle>,
    next_library: u64,
}

#[derive(Clone)]
pub struct FakePlatform {
    pub state: Rc<RefCell<FakeState>>,
    memory: Rc<MemoryArena>,
}

struct FakeLibrary {
    id: u64,
    file: String,
    tables: Option<u64>,
    state: Rc<RefCell<FakeState>>,
}

impl DriverLibrary for FakeLibrary {
    fn descriptor(&self, symbol: &str) -> Option<u64> {
        if symbol != "KbdLayerDescriptor" {
            return None;
        }
        self.tables
    }
}

impl Drop for FakeLibrary {
    fn drop(&mut self) {
        self.state
            .borrow_mut()
            .unloads
            .push((self.id, self.file.clone()));
    }
}

impl FakePlatform {
    /// US and German installed, US active.
    pub fn new() -> Self {
        Self::with_layouts(&[US, GERMAN])
    }

    pub fn with_layouts(layouts: &[LayoutHandle]) -> Self {
        let mut memory = MemoryArena::new();
        memory.add_region(US_BASE, us_layout().build(US_BASE));
        memory.add_region(GERMAN_BASE, german_layout().build(GERMAN_BASE));
        memory.add_region(SWISS_BASE, swiss_layout().build(SWISS_BASE));

        let config = KeymapConfig::default();
        let mut registry = HashMap::new();
        for (klid, file) in [
            ("00000409", "KBDUS.DLL"),
            ("00000407", "KBDGR.DLL"),
            ("00000807", "KBDSG.DLL"),
            ("00000419", "KBDRU.DLL"),
        ] {
            registry.insert(
                (
                    RegistryHive::LocalMachine,
                    format!("{}\\{}", config.layouts_key, klid),
                    "Layout File".to_string(),
                ),
                file.to_string(),
            );
        }
        registry.insert(
            (
                RegistryHive::CurrentUser,
                config.substitutes_key.clone(),
                "00020409".to_string(),
            ),
            "00000409".to_string(),
        );

        let names = HashMap::from([
            (US, "00000409".to_string()),
            (GERMAN, "00000407".to_string()),
            (SWISS, "00000807".to_string()),
            (US_INTL, "00020409".to_string()),
            (HEBREW, "0000040D".to_string()),
            (BROKEN, "00000419".to_string()),
        ]);

        let drivers = HashMap::from([
            ("KBDUS.DLL".to_string(), Some(US_BASE)),
            ("KBDGR.DLL".to_string(), Some(GERMAN_BASE)),
            ("KBDSG.DLL".to_string(), Some(SWISS_BASE)),
            ("KBDRU.DLL".to_string(), None),
        ]);

        let state = FakeState {
            installed: layouts.to_vec(),
            current: layouts.first().copied().unwrap_or(US),
            names,
            registry,
            drivers,
            key_state: [0; 256],
            loads: Vec::new(),
            unloads: Vec::new(),
            activations: Vec::new(),
            next_library: 1,
        };

        Self {
            state: Rc::new(RefCell::new(state)),
            memory: Rc::new(memory),
        }
    }

    pub fn set_installed(&self, layouts: &[LayoutHandle]) {
        self.state.borrow_mut().installed = layouts.to_vec();
    }

    pub fn set_current(&self, handle: LayoutHandle) {
        self.state.borrow_mut().current = handle;
    }

    pub fn current(&self) -> LayoutHandle {
        self.state.borrow().current
    }

    /// Library ids loaded so far, with their file names.
    pub fn loads(&self) -> Vec<(u64, String)> {
        self.state.borrow().loads.clone()
    }

    pub fn unloads(&self) -> Vec<(u64, String)> {
        self.state.borrow().unloads.clone()
    }

    pub fn activations(&self) -> Vec<LayoutHandle> {
        self.state.borrow().activations.clone()
    }

    pub fn press(&self, vk: u8) {
        self.state.borrow_mut().key_state[vk as usize] |= 0x80;
    }

    pub fn release(&self, vk: u8) {
        self.state.borrow_mut().key_state[vk as usize] &= !0x80;
    }

    pub fn toggle(&self, vk: u8) {
        self.state.borrow_mut().key_state[vk as usize] ^= 0x01;
    }
}

impl KeyboardPlatform for FakePlatform {
    fn layout_list(&self) -> Vec<LayoutHandle> {
        self.state.borrow().installed.clone()
    }

    fn current_layout(&self) -> LayoutHandle {
        self.state.borrow().current
    }

    fn activate_layout(&self, handle: LayoutHandle) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.installed.contains(&handle) {
            return false;
        }
        state.current = handle;
        state.activations.push(handle);
        true
    }

    fn current_layout_name(&self) -> Option<String> {
        let state = self.state.borrow();
        state.names.get(&state.current).cloned()
    }

    fn registry_string(&self, hive: RegistryHive, key: &str, value: &str) -> Option<String> {
        self.state
            .borrow()
            .registry
            .get(&(hive, key.to_string(), value.to_string()))
            .cloned()
    }

    fn system_directory(&self) -> Option<PathBuf> {
        Some(PathBuf::from(SYSTEM_DIR))
    }

    fn load_library(&self, path: &Path) -> Result<Box<dyn DriverLibrary>, KeymapError> {
        let file = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let mut state = self.state.borrow_mut();
        let Some(tables) = state.drivers.get(&file).copied() else {
            return Err(KeymapError::LoadFailed {
                path: path.to_path_buf(),
                reason: "module not found".to_string(),
            });
        };

        let id = state.next_library;
        state.next_library += 1;
        state.loads.push((id, file.clone()));
        Ok(Box::new(FakeLibrary {
            id,
            file,
            tables,
            state: Rc::clone(&self.state),
        }))
    }

    fn key_state(&self) -> [u8; 256] {
        self.state.borrow().key_state
    }

    fn vk_to_scancode(&self, vk: u8) -> u32 {
        match vk {
            VK_A => 0x1E,
            VK_TAB => 0x0F,
            VK_ESCAPE => 0x01,
            _ => 0,
        }
    }

    fn scancode_to_vk(&self, scancode: u32) -> u8 {
        (0..=u8::MAX)
            .find(|&vk| vk != 0 && self.vk_to_scancode(vk) == scancode)
            .unwrap_or(0)
    }

    fn is_wow64_process(&self) -> bool {
        false
    }

    fn table_memory(&self) -> &dyn TableMemory {
        self.memory.as_ref()
    }
}
