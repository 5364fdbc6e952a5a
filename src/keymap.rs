//! Keymap queries in the toolkit's vocabulary of key symbols and modifier
//! masks, answered from the installed layouts.

use smallvec::SmallVec;

use crate::config::KeymapConfig;
use crate::keysym::{self, ISO_LEFT_TAB, TAB};
use crate::layout::{Composed, KLLF_ALTGR, LockBits, ModBits, SHFT_INVALID};
use crate::manager::{LayoutInfo, LayoutSetManager};
use crate::modifiers::{ModifierType, mask_to_lock_bits, mask_to_mod_bits, mod_bits_to_mask};
use crate::platform::{KeyboardPlatform, LayoutHandle};
use crate::vk::{VK_CAPITAL, VK_NUMLOCK, VK_SCROLL, VK_TAB};

/// Result of [`Keymap::translate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translation {
    pub keyval: u32,
    pub effective_group: usize,
    pub level: u8,
    /// Modifiers of `state` that took part in choosing `keyval`.
    pub consumed: ModifierType,
}

/// A key position: virtual key code, group and level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeymapKey {
    pub keycode: u32,
    pub group: usize,
    pub level: u8,
}

/// One symbol a key produces, from [`Keymap::entries_for_keycode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeycodeEntry {
    pub key: KeymapKey,
    pub keyval: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ltr,
    Rtl,
}

pub type KeymapKeys = SmallVec<[KeymapKey; 4]>;

/// The keymap of the installed layouts.
///
/// Every query syncs the layout set first, so results always describe the
/// layouts the OS currently reports.
pub struct Keymap<K: KeyboardPlatform> {
    manager: LayoutSetManager<K>,
}

impl<K: KeyboardPlatform> Keymap<K> {
    pub fn new(platform: K, config: KeymapConfig) -> Self {
        Self {
            manager: LayoutSetManager::new(platform, config),
        }
    }

    pub fn manager(&self) -> &LayoutSetManager<K> {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut LayoutSetManager<K> {
        &mut self.manager
    }

    pub fn notify_layouts_changed(&mut self) {
        self.manager.notify_layouts_changed();
    }

    /// Symbol `keycode` produces in `group` with `state` applied.
    pub fn translate(
        &mut self,
        keycode: u32,
        state: ModifierType,
        group: usize,
    ) -> Option<Translation> {
        self.manager.sync();
        let vk = u8::try_from(keycode).ok()?;
        let mod_bits = mask_to_mod_bits(state);
        let lock_bits = mask_to_lock_bits(state);

        let symbol = self.keysym_for(group, vk, mod_bits, lock_bits)?;
        let level = self.manager.modbits_to_level(group, symbol.consumed);

        let mut consumed = mod_bits_to_mask(symbol.consumed) & state;
        // CapsLock flipped Shift for this key and the flip picked the level
        if symbol.caps_inverted && (symbol.consumed ^ mod_bits).contains(ModBits::SHIFT) {
            consumed |= ModifierType::LOCK | (state & ModifierType::SHIFT);
        }

        Some(Translation {
            keyval: symbol.keyval,
            effective_group: group,
            level,
            consumed,
        })
    }

    /// Every key position producing `keyval`.
    ///
    /// Besides the position of each table entry, modifier combinations that
    /// add only unrelated modifiers to it and still produce `keyval` are
    /// reported as well. Dead-key symbols are found through the base
    /// characters their keys carry.
    pub fn entries_for_keyval(&mut self, keyval: u32) -> KeymapKeys {
        self.manager.sync();
        let mut keys = KeymapKeys::new();

        for (group, info) in self.manager.synced_layouts().iter().enumerate() {
            if info.is_stub() {
                continue;
            }

            if keyval == TAB || keyval == ISO_LEFT_TAB {
                let bits = if keyval == ISO_LEFT_TAB {
                    ModBits::SHIFT
                } else {
                    ModBits::empty()
                };
                push_unique(&mut keys, VK_TAB, group, self.manager.modbits_to_level(group, bits));
                continue;
            }

            if let Some(vk) = keysym::non_char_vk(keyval) {
                let level = self.manager.modbits_to_level(group, ModBits::empty());
                push_unique(&mut keys, vk, group, level);
                continue;
            }

            let mut bases: SmallVec<[u32; 4]> = SmallVec::new();
            bases.push(keyval);
            if keysym::is_dead_keysym(keyval) {
                bases.extend(keysym::dead_base_keysyms(keyval));
            }
            for base in bases {
                let Some(wch) = keysym::keysym_to_unicode(base).and_then(single_unit) else {
                    continue;
                };
                self.collect_char_entries(group, info, wch, base, keyval, &mut keys);
            }
        }

        keys
    }

    fn collect_char_entries(
        &self,
        group: usize,
        info: &LayoutInfo,
        wch: u16,
        base: u32,
        keyval: u32,
        keys: &mut KeymapKeys,
    ) {
        let max_bits = info.index().max_modbit_value().min(u8::MAX as u16) as u8;

        for entry in info.index().entries_for_char(wch) {
            let produced = if entry.is_dead {
                keysym::dead_keysym(base)
            } else {
                base
            };
            if produced != keyval {
                continue;
            }

            let level = self.manager.modbits_to_level(group, entry.mod_bits);
            push_unique(keys, entry.vk, group, level);

            for extra in 1..=max_bits {
                let extra = ModBits::from_bits_retain(extra);
                if extra.intersects(entry.mod_bits) {
                    continue;
                }
                let combined = entry.mod_bits | extra;
                let level = self.manager.modbits_to_level(group, combined);
                if level == SHFT_INVALID {
                    continue;
                }
                let same = self
                    .keysym_for(group, entry.vk, combined, LockBits::empty())
                    .is_some_and(|symbol| symbol.keyval == keyval);
                if same {
                    push_unique(keys, entry.vk, group, level);
                }
            }
        }
    }

    /// Every symbol `keycode` produces, one per group and level. Levels whose
    /// modifiers are only partly used by the resolved symbol are left out.
    pub fn entries_for_keycode(&mut self, keycode: u32) -> Vec<KeycodeEntry> {
        self.manager.sync();
        let mut entries = Vec::new();
        let Ok(vk) = u8::try_from(keycode) else {
            return entries;
        };

        for (group, info) in self.manager.synced_layouts().iter().enumerate() {
            if info.is_stub() {
                continue;
            }
            for level in 0..=info.index().max_level() {
                let Some(bits) = self.level_bits(group, level) else {
                    continue;
                };
                let Some(symbol) = self.keysym_for(group, vk, bits, LockBits::empty()) else {
                    continue;
                };
                if symbol.consumed != bits {
                    continue;
                }
                entries.push(KeycodeEntry {
                    key: KeymapKey {
                        keycode,
                        group,
                        level,
                    },
                    keyval: symbol.keyval,
                });
            }
        }

        entries
    }

    /// Symbol at one key position.
    pub fn lookup_key(&mut self, key: KeymapKey) -> Option<u32> {
        self.manager.sync();
        let vk = u8::try_from(key.keycode).ok()?;
        let bits = self.level_bits(key.group, key.level)?;
        self.keysym_for(key.group, vk, bits, LockBits::empty())
            .map(|symbol| symbol.keyval)
    }

    /// Modifiers currently held, according to the active layout.
    pub fn get_modifier_mask(&mut self) -> ModifierType {
        self.manager.sync();
        let key_state = self.manager.platform().key_state();
        let group = self.manager.active_group();
        mod_bits_to_mask(self.manager.keystate_to_modbits(group, &key_state))
    }

    pub fn active_group(&mut self) -> usize {
        self.manager.active_group()
    }

    pub fn set_active_group(&mut self, group: usize) -> bool {
        self.manager.set_active_group(group)
    }

    pub fn set_active_layout(&mut self, handle: LayoutHandle) -> bool {
        self.manager.set_active_layout(handle)
    }

    pub fn layout_count(&mut self) -> usize {
        self.manager.layout_count()
    }

    pub fn layout_name(&mut self, group: usize) -> Option<String> {
        self.manager
            .layout(group)
            .and_then(|info| info.name().map(str::to_string))
    }

    pub fn is_rtl(&mut self, group: usize) -> bool {
        self.manager
            .layout(group)
            .is_some_and(|info| info.handle().is_rtl())
    }

    /// Direction of the active group.
    pub fn direction(&mut self) -> Direction {
        let group = self.manager.active_group();
        if self.is_rtl(group) {
            Direction::Rtl
        } else {
            Direction::Ltr
        }
    }

    /// Whether both directions are among the installed layouts.
    pub fn have_bidi_layouts(&mut self) -> bool {
        let layouts = self.manager.layouts();
        let rtl = layouts.iter().any(|info| info.handle().is_rtl());
        let ltr = layouts.iter().any(|info| !info.handle().is_rtl());
        rtl && ltr
    }

    pub fn caps_lock_state(&self) -> bool {
        self.toggled(VK_CAPITAL)
    }

    pub fn num_lock_state(&self) -> bool {
        self.toggled(VK_NUMLOCK)
    }

    pub fn scroll_lock_state(&self) -> bool {
        self.toggled(VK_SCROLL)
    }

    pub fn has_altgr(&mut self, group: usize) -> bool {
        self.manager.sync();
        self.manager.locale_flags(group) & KLLF_ALTGR != 0
    }

    /// What `base` becomes when typed after dead key `dead`.
    pub fn compose_dead_key(&mut self, group: usize, dead: char, base: char) -> Option<Composed> {
        self.manager.sync();
        let dead = single_unit(dead)?;
        let base = single_unit(base)?;
        self.manager.compose_dead_key(group, dead, base)
    }

    pub fn hardware_scancode(&self, keycode: u32) -> Option<u32> {
        let vk = u8::try_from(keycode).ok()?;
        Some(self.manager.platform().vk_to_scancode(vk))
    }

    pub fn keycode_for_scancode(&self, scancode: u32) -> Option<u32> {
        match self.manager.platform().scancode_to_vk(scancode) {
            0 => None,
            vk => Some(vk as u32),
        }
    }

    fn toggled(&self, vk: u8) -> bool {
        self.manager.platform().key_state()[vk as usize] & 0x01 != 0
    }

    /// Modifiers of `level`. Levels the layout never declares have none.
    fn level_bits(&self, group: usize, level: u8) -> Option<ModBits> {
        let bits = self.manager.level_to_modbits(group, level)?;
        if level != 0 && bits.is_empty() {
            return None;
        }
        Some(bits)
    }

    /// Symbol and consumed modifiers for `vk` against the last synced set.
    fn keysym_for(
        &self,
        group: usize,
        vk: u8,
        mod_bits: ModBits,
        lock_bits: LockBits,
    ) -> Option<Symbol> {
        let info = self.manager.synced_layouts().get(group)?;
        if info.is_stub() {
            return None;
        }

        if vk == VK_TAB {
            let consumed = mod_bits & ModBits::SHIFT;
            let keyval = if consumed.is_empty() { TAB } else { ISO_LEFT_TAB };
            return Some(Symbol::plain(keyval, consumed));
        }
        if let Some(keyval) = keysym::non_char_keysym(vk) {
            return Some(Symbol::plain(keyval, ModBits::empty()));
        }

        let Some(resolved) = self.manager.resolve(group, vk, mod_bits, lock_bits) else {
            log::trace!("vk {vk:#04x} unmapped in group {group} with {mod_bits:?}");
            return None;
        };
        let character = resolved.character()?;
        let mut keyval = keysym::unicode_to_keysym(character);
        if resolved.is_dead {
            keyval = keysym::dead_keysym(keyval);
        }
        Some(Symbol {
            keyval,
            consumed: resolved.consumed,
            caps_inverted: resolved.caps_inverted,
        })
    }
}

/// What one key produces with one modifier state.
struct Symbol {
    keyval: u32,
    consumed: ModBits,
    caps_inverted: bool,
}

impl Symbol {
    fn plain(keyval: u32, consumed: ModBits) -> Self {
        Self {
            keyval,
            consumed,
            caps_inverted: false,
        }
    }
}

fn single_unit(c: char) -> Option<u16> {
    u16::try_from(c as u32).ok()
}

fn push_unique(keys: &mut KeymapKeys, vk: u8, group: usize, level: u8) {
    let key = KeymapKey {
        keycode: vk as u32,
        group,
        level,
    };
    if !keys.contains(&key) {
        keys.push(key);
    }
}
