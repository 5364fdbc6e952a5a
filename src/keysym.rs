//! Toolkit key symbols and their relation to characters and virtual keys.

use crate::vk::*;

pub const BACKSPACE: u32 = 0xFF08;
pub const TAB: u32 = 0xFF09;
pub const CLEAR: u32 = 0xFF0B;
pub const RETURN: u32 = 0xFF0D;
pub const PAUSE: u32 = 0xFF13;
pub const SCROLL_LOCK: u32 = 0xFF14;
pub const ESCAPE: u32 = 0xFF1B;
pub const DELETE: u32 = 0xFFFF;
pub const ISO_LEFT_TAB: u32 = 0xFE20;

pub const HOME: u32 = 0xFF50;
pub const LEFT: u32 = 0xFF51;
pub const UP: u32 = 0xFF52;
pub const RIGHT: u32 = 0xFF53;
pub const DOWN: u32 = 0xFF54;
pub const PRIOR: u32 = 0xFF55;
pub const NEXT: u32 = 0xFF56;
pub const END: u32 = 0xFF57;
pub const SELECT: u32 = 0xFF60;
pub const PRINT: u32 = 0xFF61;
pub const EXECUTE: u32 = 0xFF62;
pub const INSERT: u32 = 0xFF63;
pub const MENU: u32 = 0xFF67;
pub const CANCEL: u32 = 0xFF69;
pub const HELP: u32 = 0xFF6A;
pub const NUM_LOCK: u32 = 0xFF7F;

pub const KP_MULTIPLY: u32 = 0xFFAA;
pub const KP_ADD: u32 = 0xFFAB;
pub const KP_SEPARATOR: u32 = 0xFFAC;
pub const KP_SUBTRACT: u32 = 0xFFAD;
pub const KP_DECIMAL: u32 = 0xFFAE;
pub const KP_DIVIDE: u32 = 0xFFAF;
pub const KP_0: u32 = 0xFFB0;
pub const KP_9: u32 = 0xFFB9;
pub const F1: u32 = 0xFFBE;

pub const SHIFT_L: u32 = 0xFFE1;
pub const SHIFT_R: u32 = 0xFFE2;
pub const CONTROL_L: u32 = 0xFFE3;
pub const CONTROL_R: u32 = 0xFFE4;
pub const CAPS_LOCK: u32 = 0xFFE5;
pub const META_L: u32 = 0xFFE7;
pub const META_R: u32 = 0xFFE8;
pub const ALT_L: u32 = 0xFFE9;
pub const ALT_R: u32 = 0xFFEA;

pub const DEAD_GRAVE: u32 = 0xFE50;
pub const DEAD_ACUTE: u32 = 0xFE51;
pub const DEAD_CIRCUMFLEX: u32 = 0xFE52;
pub const DEAD_TILDE: u32 = 0xFE53;
pub const DEAD_BREVE: u32 = 0xFE55;
pub const DEAD_ABOVEDOT: u32 = 0xFE56;
pub const DEAD_DIAERESIS: u32 = 0xFE57;
pub const DEAD_ABOVERING: u32 = 0xFE58;
pub const DEAD_DOUBLEACUTE: u32 = 0xFE59;
pub const DEAD_CARON: u32 = 0xFE5A;
pub const DEAD_CEDILLA: u32 = 0xFE5B;
pub const DEAD_OGONEK: u32 = 0xFE5C;

pub const QUOTEDBL: u32 = 0x22;
pub const APOSTROPHE: u32 = 0x27;
pub const ASCIICIRCUM: u32 = 0x5E;
pub const GRAVE: u32 = 0x60;
pub const ASCIITILDE: u32 = 0x7E;
pub const DIAERESIS: u32 = 0xA8;
pub const DEGREE: u32 = 0xB0;
pub const ACUTE: u32 = 0xB4;
pub const PERIODCENTERED: u32 = 0xB7;
pub const CEDILLA: u32 = 0xB8;
pub const BREVE: u32 = 0x1A2;
pub const OGONEK: u32 = 0x1B2;
pub const CARON: u32 = 0x1B7;
pub const DOUBLEACUTE: u32 = 0x1BD;
pub const ABOVEDOT: u32 = 0x1FF;
pub const EURO_SIGN: u32 = 0x20AC;

/// Keysym of a code point without a legacy keysym.
const UNICODE_KEYSYM_BASE: u32 = 0x0100_0000;
/// Greek tonos, which has no legacy keysym.
const GREEK_TONOS: u32 = UNICODE_KEYSYM_BASE | 0x0384;

/// Legacy keysyms outside Latin-1 and the code points they stand for.
/// Latin-2 keysyms are `0x100` plus the ISO 8859-2 byte.
static LEGACY_KEYSYMS: &[(u32, u32)] = &[
    (0x01A1, 0x0104),
    (0x01A2, 0x02D8),
    (0x01A3, 0x0141),
    (0x01A5, 0x013D),
    (0x01A6, 0x015A),
    (0x01A9, 0x0160),
    (0x01AA, 0x015E),
    (0x01AB, 0x0164),
    (0x01AC, 0x0179),
    (0x01AE, 0x017D),
    (0x01AF, 0x017B),
    (0x01B1, 0x0105),
    (0x01B2, 0x02DB),
    (0x01B3, 0x0142),
    (0x01B5, 0x013E),
    (0x01B6, 0x015B),
    (0x01B7, 0x02C7),
    (0x01B9, 0x0161),
    (0x01BA, 0x015F),
    (0x01BB, 0x0165),
    (0x01BC, 0x017A),
    (0x01BD, 0x02DD),
    (0x01BE, 0x017E),
    (0x01BF, 0x017C),
    (0x01C0, 0x0154),
    (0x01C3, 0x0102),
    (0x01C5, 0x0139),
    (0x01C6, 0x0106),
    (0x01C8, 0x010C),
    (0x01CA, 0x0118),
    (0x01CC, 0x011A),
    (0x01CF, 0x010E),
    (0x01D0, 0x0110),
    (0x01D1, 0x0143),
    (0x01D2, 0x0147),
    (0x01D5, 0x0150),
    (0x01D8, 0x0158),
    (0x01D9, 0x016E),
    (0x01DB, 0x0170),
    (0x01DE, 0x0162),
    (0x01E0, 0x0155),
    (0x01E3, 0x0103),
    (0x01E5, 0x013A),
    (0x01E6, 0x0107),
    (0x01E8, 0x010D),
    (0x01EA, 0x0119),
    (0x01EC, 0x011B),
    (0x01EF, 0x010F),
    (0x01F0, 0x0111),
    (0x01F1, 0x0144),
    (0x01F2, 0x0148),
    (0x01F5, 0x0151),
    (0x01F8, 0x0159),
    (0x01F9, 0x016F),
    (0x01FB, 0x0171),
    (0x01FE, 0x0163),
    (0x01FF, 0x02D9),
    (0x07AE, 0x0385),
    (0x20AC, 0x20AC),
];

/// Keysym for a character.
pub fn unicode_to_keysym(c: char) -> u32 {
    let cp = c as u32;
    if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
        return cp;
    }
    LEGACY_KEYSYMS
        .iter()
        .find(|(_, u)| *u == cp)
        .map_or(UNICODE_KEYSYM_BASE | cp, |(sym, _)| *sym)
}

/// Character a keysym stands for, if any.
pub fn keysym_to_unicode(keysym: u32) -> Option<char> {
    let cp = match keysym {
        0x20..=0x7E | 0xA0..=0xFF => keysym,
        BACKSPACE | TAB | CLEAR | RETURN | ESCAPE => keysym & 0x7F,
        DELETE => 0x7F,
        KP_0..=KP_9 => '0' as u32 + (keysym - KP_0),
        KP_MULTIPLY..=KP_DIVIDE => keysym - 0xFF80,
        _ if keysym & 0xFF00_0000 == UNICODE_KEYSYM_BASE => keysym & 0x00FF_FFFF,
        _ => LEGACY_KEYSYMS
            .iter()
            .find(|(sym, _)| *sym == keysym)
            .map(|(_, u)| *u)?,
    };
    char::from_u32(cp)
}

/// Keysym for keys that never produce a character, independent of layout.
pub fn non_char_keysym(vk: u8) -> Option<u32> {
    let sym = match vk {
        VK_CANCEL => CANCEL,
        VK_BACK => BACKSPACE,
        VK_CLEAR => CLEAR,
        VK_RETURN => RETURN,
        VK_LSHIFT => SHIFT_L,
        VK_RSHIFT => SHIFT_R,
        VK_LCONTROL => CONTROL_L,
        VK_RCONTROL => CONTROL_R,
        VK_LMENU => ALT_L,
        VK_RMENU => ALT_R,
        VK_PAUSE => PAUSE,
        VK_CAPITAL => CAPS_LOCK,
        VK_ESCAPE => ESCAPE,
        VK_PRIOR => PRIOR,
        VK_NEXT => NEXT,
        VK_END => END,
        VK_HOME => HOME,
        VK_LEFT => LEFT,
        VK_UP => UP,
        VK_RIGHT => RIGHT,
        VK_DOWN => DOWN,
        VK_SELECT => SELECT,
        VK_PRINT => PRINT,
        VK_EXECUTE => EXECUTE,
        VK_INSERT => INSERT,
        VK_DELETE => DELETE,
        VK_HELP => HELP,
        VK_LWIN => META_L,
        VK_RWIN => META_R,
        VK_APPS => MENU,
        VK_DECIMAL => KP_DECIMAL,
        VK_MULTIPLY => KP_MULTIPLY,
        VK_ADD => KP_ADD,
        VK_SEPARATOR => KP_SEPARATOR,
        VK_SUBTRACT => KP_SUBTRACT,
        VK_DIVIDE => KP_DIVIDE,
        VK_NUMPAD0..=VK_NUMPAD9 => KP_0 + (vk - VK_NUMPAD0) as u32,
        VK_F1..=VK_F24 => F1 + (vk - VK_F1) as u32,
        VK_NUMLOCK => NUM_LOCK,
        VK_SCROLL => SCROLL_LOCK,
        _ => return None,
    };
    Some(sym)
}

/// Reverse of [`non_char_keysym`].
pub fn non_char_vk(keysym: u32) -> Option<u8> {
    (0..=u8::MAX).find(|&vk| non_char_keysym(vk) == Some(keysym))
}

/// Base symbols a dead key's table entry can carry, with the dead keysym each
/// one stands for.
const DEAD_KEYSYMS: &[(u32, u32)] = &[
    (QUOTEDBL, DEAD_DIAERESIS),
    (APOSTROPHE, DEAD_ACUTE),
    (ASCIICIRCUM, DEAD_CIRCUMFLEX),
    (GRAVE, DEAD_GRAVE),
    (ASCIITILDE, DEAD_TILDE),
    (DIAERESIS, DEAD_DIAERESIS),
    (DEGREE, DEAD_ABOVERING),
    (ACUTE, DEAD_ACUTE),
    (PERIODCENTERED, DEAD_ABOVEDOT),
    (CEDILLA, DEAD_CEDILLA),
    (BREVE, DEAD_BREVE),
    (OGONEK, DEAD_OGONEK),
    (CARON, DEAD_CARON),
    (DOUBLEACUTE, DEAD_DOUBLEACUTE),
    (ABOVEDOT, DEAD_ABOVEDOT),
    (GREEK_TONOS, DEAD_ACUTE),
];

/// Dead-key keysym for the base symbol a dead key's table entry carries.
/// Symbols without a dead counterpart are used as-is.
pub fn dead_keysym(sym: u32) -> u32 {
    DEAD_KEYSYMS
        .iter()
        .find(|(base, _)| *base == sym)
        .map_or(sym, |(_, dead)| *dead)
}

/// Every base symbol [`dead_keysym`] turns into `dead`.
pub fn dead_base_keysyms(dead: u32) -> impl Iterator<Item = u32> {
    DEAD_KEYSYMS
        .iter()
        .filter(move |(_, d)| *d == dead)
        .map(|(base, _)| *base)
}

/// Whether `keysym` is one of the dead-key symbols.
pub fn is_dead_keysym(keysym: u32) -> bool {
    (DEAD_GRAVE..=DEAD_OGONEK).contains(&keysym)
}
