use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::error::KeymapError;
use crate::layout::PointerModel;

/// How to pick the pointer model driver tables are read with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerModelSetting {
    /// Probe the process at startup.
    #[default]
    Auto,
    Native,
    Wow64,
}

impl PointerModelSetting {
    pub fn forced(self) -> Option<PointerModel> {
        match self {
            PointerModelSetting::Auto => None,
            PointerModelSetting::Native => Some(PointerModel::Native),
            PointerModelSetting::Wow64 => Some(PointerModel::Wow64),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct KeymapConfig {
    #[serde(default)]
    pub pointer_model: PointerModelSetting,
    #[serde(default = "default_layouts_key")]
    pub layouts_key: String,
    #[serde(default = "default_substitutes_key")]
    pub substitutes_key: String,
    #[serde(default = "default_descriptor_symbol")]
    pub descriptor_symbol: String,
}

fn default_layouts_key() -> String {
    "SYSTEM\\CurrentControlSet\\Control\\Keyboard Layouts".to_string()
}
fn default_substitutes_key() -> String {
    "Keyboard Layout\\Substitutes".to_string()
}
fn default_descriptor_symbol() -> String {
    "KbdLayerDescriptor".to_string()
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            pointer_model: PointerModelSetting::Auto,
            layouts_key: default_layouts_key(),
            substitutes_key: default_substitutes_key(),
            descriptor_symbol: default_descriptor_symbol(),
        }
    }
}

impl KeymapConfig {
    /// Load config from file, or create default if not exists
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self, KeymapError> {
        if !path.as_ref().exists() {
            let default_config = Self::default();
            default_config.save_to_file(&path)?;
            return Ok(default_config);
        }
        Self::load_from_file(path)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, KeymapError> {
        let content = fs::read_to_string(path)?;
        let mut config: KeymapConfig = toml::from_str(&content)?;

        // Blank strings would make every lookup fail
        if config.layouts_key.trim().is_empty() {
            config.layouts_key = default_layouts_key();
        }
        if config.substitutes_key.trim().is_empty() {
            config.substitutes_key = default_substitutes_key();
        }
        if config.descriptor_symbol.trim().is_empty() {
            config.descriptor_symbol = default_descriptor_symbol();
        }

        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), KeymapError> {
        let pointer_model = match self.pointer_model {
            PointerModelSetting::Auto => "auto",
            PointerModelSetting::Native => "native",
            PointerModelSetting::Wow64 => "wow64",
        };
        // Add comments to make the config file more readable
        let commented = format!(
            "pointer_model = \"{}\"    # Driver table pointer model: auto, native or wow64\n\n\
             # Registry locations (HKLM and HKCU respectively)\n\
             layouts_key = {:?}\n\
             substitutes_key = {:?}\n\n\
             descriptor_symbol = {:?}    # Export returning the driver tables\n",
            pointer_model, self.layouts_key, self.substitutes_key, self.descriptor_symbol,
        );

        fs::write(path, commented)?;
        Ok(())
    }
}
