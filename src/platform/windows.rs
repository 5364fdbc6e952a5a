//! Win32 implementation of the keyboard platform.

use std::ffi::{CString, c_void};
use std::path::{Path, PathBuf};

use windows::Win32::Foundation::{ERROR_SUCCESS, HMODULE};
use windows::Win32::System::LibraryLoader::{FreeLibrary, GetProcAddress, LoadLibraryW};
use windows::Win32::System::Registry::{
    HKEY, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_READ, REG_EXPAND_SZ, REG_SZ,
    REG_VALUE_TYPE, RegCloseKey, RegOpenKeyExW, RegQueryValueExW,
};
use windows::Win32::System::SystemInformation::GetSystemDirectoryW;
use windows::Win32::System::Threading::{GetCurrentProcess, IsWow64Process};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    ACTIVATE_KEYBOARD_LAYOUT_FLAGS, ActivateKeyboardLayout, GetKeyboardLayout,
    GetKeyboardLayoutList, GetKeyboardLayoutNameW, GetKeyboardState, MAPVK_VK_TO_VSC,
    MAPVK_VSC_TO_VK, MapVirtualKeyW,
};
use windows::Win32::UI::TextServices::HKL;
use windows::core::{BOOL, PCSTR, PCWSTR};

use super::{DriverLibrary, KeyboardPlatform, LayoutHandle, RegistryHive};
use crate::error::KeymapError;
use crate::layout::{ProcessMemory, TableMemory};
use crate::util::{from_wide, from_wide_bytes, to_wide};

/// `KL_NAMELENGTH`: eight hex digits and a null.
const LAYOUT_NAME_LEN: usize = 9;
const MAX_PATH: usize = 260;

fn hkl(handle: LayoutHandle) -> HKL {
    HKL(handle.0 as *mut c_void)
}

fn handle(hkl: HKL) -> LayoutHandle {
    LayoutHandle(hkl.0 as isize)
}

/// A keyboard driver mapped with `LoadLibraryW`.
struct Win32Library {
    module: HMODULE,
    path: PathBuf,
}

impl DriverLibrary for Win32Library {
    fn descriptor(&self, symbol: &str) -> Option<u64> {
        let name = CString::new(symbol).ok()?;
        let proc = unsafe { GetProcAddress(self.module, PCSTR(name.as_ptr() as *const u8)) }?;
        // The export takes no arguments and returns the tables' address.
        let tables = unsafe { proc() };
        Some(tables as usize as u64)
    }
}

impl Drop for Win32Library {
    fn drop(&mut self) {
        if let Err(err) = unsafe { FreeLibrary(self.module) } {
            log::warn!("failed to unload {}: {err}", self.path.display());
        }
    }
}

/// The calling thread's keyboard layouts, registry and key state.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Platform;

impl Win32Platform {
    pub fn new() -> Self {
        Self
    }
}

impl KeyboardPlatform for Win32Platform {
    fn layout_list(&self) -> Vec<LayoutHandle> {
        let count = unsafe { GetKeyboardLayoutList(None) };
        if count <= 0 {
            return Vec::new();
        }
        let mut list = vec![HKL::default(); count as usize];
        let written = unsafe { GetKeyboardLayoutList(Some(&mut list)) };
        list.truncate(written.max(0) as usize);
        list.into_iter().map(handle).collect()
    }

    fn current_layout(&self) -> LayoutHandle {
        handle(unsafe { GetKeyboardLayout(0) })
    }

    fn activate_layout(&self, handle: LayoutHandle) -> bool {
        unsafe { ActivateKeyboardLayout(hkl(handle), ACTIVATE_KEYBOARD_LAYOUT_FLAGS(0)) }.is_ok()
    }

    fn current_layout_name(&self) -> Option<String> {
        let mut name = [0u16; LAYOUT_NAME_LEN];
        unsafe { GetKeyboardLayoutNameW(&mut name) }.ok()?;
        Some(from_wide(&name))
    }

    fn registry_string(&self, hive: RegistryHive, key: &str, value: &str) -> Option<String> {
        let root = match hive {
            RegistryHive::LocalMachine => HKEY_LOCAL_MACHINE,
            RegistryHive::CurrentUser => HKEY_CURRENT_USER,
        };
        let key_wide = to_wide(key);
        let value_wide = to_wide(value);

        unsafe {
            let mut hkey = HKEY::default();
            let result = RegOpenKeyExW(
                root,
                PCWSTR::from_raw(key_wide.as_ptr()),
                Some(0),
                KEY_READ,
                &mut hkey,
            );
            if result != ERROR_SUCCESS {
                return None;
            }

            let value_name = PCWSTR::from_raw(value_wide.as_ptr());
            let mut kind = REG_VALUE_TYPE::default();
            let mut size = 0u32;
            let mut data = Vec::new();
            let mut result =
                RegQueryValueExW(hkey, value_name, None, Some(&mut kind), None, Some(&mut size));
            if result == ERROR_SUCCESS {
                data.resize(size as usize, 0);
                result = RegQueryValueExW(
                    hkey,
                    value_name,
                    None,
                    Some(&mut kind),
                    Some(data.as_mut_ptr()),
                    Some(&mut size),
                );
                data.truncate(size as usize);
            }
            let _ = RegCloseKey(hkey);

            if result != ERROR_SUCCESS || (kind != REG_SZ && kind != REG_EXPAND_SZ) {
                return None;
            }
            Some(from_wide_bytes(&data))
        }
    }

    fn system_directory(&self) -> Option<PathBuf> {
        let mut buf = [0u16; MAX_PATH];
        let len = unsafe { GetSystemDirectoryW(Some(&mut buf)) } as usize;
        if len == 0 || len >= buf.len() {
            return None;
        }
        Some(PathBuf::from(from_wide(&buf[..len])))
    }

    fn load_library(&self, path: &Path) -> Result<Box<dyn DriverLibrary>, KeymapError> {
        let path_wide = to_wide(&path.to_string_lossy());
        let module = unsafe { LoadLibraryW(PCWSTR::from_raw(path_wide.as_ptr())) }.map_err(
            |err| KeymapError::LoadFailed {
                path: path.to_path_buf(),
                reason: err.to_string(),
            },
        )?;
        Ok(Box::new(Win32Library {
            module,
            path: path.to_path_buf(),
        }))
    }

    fn key_state(&self) -> [u8; 256] {
        let mut state = [0u8; 256];
        if let Err(err) = unsafe { GetKeyboardState(&mut state) } {
            log::debug!("GetKeyboardState failed: {err}");
        }
        state
    }

    fn vk_to_scancode(&self, vk: u8) -> u32 {
        unsafe { MapVirtualKeyW(vk as u32, MAPVK_VK_TO_VSC) }
    }

    fn scancode_to_vk(&self, scancode: u32) -> u8 {
        let vk = unsafe { MapVirtualKeyW(scancode, MAPVK_VSC_TO_VK) };
        u8::try_from(vk).unwrap_or(0)
    }

    fn is_wow64_process(&self) -> bool {
        let mut wow64 = BOOL::default();
        match unsafe { IsWow64Process(GetCurrentProcess(), &mut wow64) } {
            Ok(()) => wow64.as_bool(),
            Err(err) => {
                log::debug!("IsWow64Process failed: {err}");
                false
            }
        }
    }

    fn table_memory(&self) -> &dyn TableMemory {
        &ProcessMemory
    }
}
