//! Locating and loading keyboard layout drivers.

use std::path::{Path, PathBuf};

use crate::config::KeymapConfig;
use crate::error::KeymapError;
use crate::layout::tables::KbdTables;
use crate::layout::{PointerWidth, RawLayoutTables};
use crate::platform::{DriverLibrary, KeyboardPlatform, RegistryHive};

const LAYOUT_FILE_VALUE: &str = "Layout File";

/// A loaded driver library and the tables it exported.
///
/// The tables live inside the library's image, so the two are kept together
/// and released together.
pub struct LoadedDriver {
    pub tables: RawLayoutTables,
    // Declared last: tables must not outlive the mapping.
    pub library: Box<dyn DriverLibrary>,
}

impl std::fmt::Debug for LoadedDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedDriver")
            .field("tables", &self.tables)
            .finish_non_exhaustive()
    }
}

fn layout_file(
    platform: &dyn KeyboardPlatform,
    config: &KeymapConfig,
    layout_name: &str,
) -> Option<String> {
    let key = format!("{}\\{}", config.layouts_key, layout_name);
    platform
        .registry_string(RegistryHive::LocalMachine, &key, LAYOUT_FILE_VALUE)
        .filter(|file| !file.is_empty())
}

/// Finds the driver file for `layout_name`, following the user's layout
/// substitution once if the name itself has no registered driver.
pub fn locate_driver_file(
    platform: &dyn KeyboardPlatform,
    config: &KeymapConfig,
    layout_name: &str,
) -> Result<PathBuf, KeymapError> {
    let file = layout_file(platform, config, layout_name).or_else(|| {
        let substitute = platform.registry_string(
            RegistryHive::CurrentUser,
            &config.substitutes_key,
            layout_name,
        )?;
        log::debug!("keyboard layout {layout_name} is substituted by {substitute}");
        layout_file(platform, config, &substitute)
    });

    let file = file.ok_or_else(|| KeymapError::DriverNotFound(layout_name.to_string()))?;
    let dir = platform
        .system_directory()
        .ok_or(KeymapError::SystemDirectory)?;
    Ok(dir.join(file))
}

/// Loads the driver at `path` and fetches its tables through `symbol`.
///
/// The tables are validated by reading their modifier descriptor. On any
/// failure the library is released before the error is returned.
pub fn load_driver<P: PointerWidth>(
    platform: &dyn KeyboardPlatform,
    path: &Path,
    symbol: &str,
) -> Result<LoadedDriver, KeymapError> {
    let library = platform.load_library(path)?;

    let root = library
        .descriptor(symbol)
        .ok_or_else(|| KeymapError::MissingExport {
            path: path.to_path_buf(),
            symbol: symbol.to_string(),
        })?;
    if root == 0 {
        return Err(KeymapError::NullTables(path.to_path_buf()));
    }

    let tables = RawLayoutTables(root);
    KbdTables::<P>::new(platform.table_memory(), tables)
        .modifiers()
        .map_err(|source| KeymapError::BadTables {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(LoadedDriver { tables, library })
}
