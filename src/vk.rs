//! Virtual key codes and their names.

pub const VK_CANCEL: u8 = 0x03;
pub const VK_BACK: u8 = 0x08;
pub const VK_TAB: u8 = 0x09;
pub const VK_CLEAR: u8 = 0x0C;
pub const VK_RETURN: u8 = 0x0D;
pub const VK_SHIFT: u8 = 0x10;
pub const VK_CONTROL: u8 = 0x11;
pub const VK_MENU: u8 = 0x12;
pub const VK_PAUSE: u8 = 0x13;
pub const VK_CAPITAL: u8 = 0x14;
pub const VK_KANA: u8 = 0x15;
pub const VK_ESCAPE: u8 = 0x1B;
pub const VK_SPACE: u8 = 0x20;
pub const VK_PRIOR: u8 = 0x21;
pub const VK_NEXT: u8 = 0x22;
pub const VK_END: u8 = 0x23;
pub const VK_HOME: u8 = 0x24;
pub const VK_LEFT: u8 = 0x25;
pub const VK_UP: u8 = 0x26;
pub const VK_RIGHT: u8 = 0x27;
pub const VK_DOWN: u8 = 0x28;
pub const VK_SELECT: u8 = 0x29;
pub const VK_PRINT: u8 = 0x2A;
pub const VK_EXECUTE: u8 = 0x2B;
pub const VK_SNAPSHOT: u8 = 0x2C;
pub const VK_INSERT: u8 = 0x2D;
pub const VK_DELETE: u8 = 0x2E;
pub const VK_HELP: u8 = 0x2F;
pub const VK_LWIN: u8 = 0x5B;
pub const VK_RWIN: u8 = 0x5C;
pub const VK_APPS: u8 = 0x5D;
pub const VK_NUMPAD0: u8 = 0x60;
pub const VK_NUMPAD9: u8 = 0x69;
pub const VK_MULTIPLY: u8 = 0x6A;
pub const VK_ADD: u8 = 0x6B;
pub const VK_SEPARATOR: u8 = 0x6C;
pub const VK_SUBTRACT: u8 = 0x6D;
pub const VK_DECIMAL: u8 = 0x6E;
pub const VK_DIVIDE: u8 = 0x6F;
pub const VK_F1: u8 = 0x70;
pub const VK_F24: u8 = 0x87;
pub const VK_NUMLOCK: u8 = 0x90;
pub const VK_SCROLL: u8 = 0x91;
pub const VK_LSHIFT: u8 = 0xA0;
pub const VK_RSHIFT: u8 = 0xA1;
pub const VK_LCONTROL: u8 = 0xA2;
pub const VK_RCONTROL: u8 = 0xA3;
pub const VK_LMENU: u8 = 0xA4;
pub const VK_RMENU: u8 = 0xA5;
pub const VK_OEM_1: u8 = 0xBA;
pub const VK_OEM_PLUS: u8 = 0xBB;
pub const VK_OEM_COMMA: u8 = 0xBC;
pub const VK_OEM_MINUS: u8 = 0xBD;
pub const VK_OEM_PERIOD: u8 = 0xBE;
pub const VK_OEM_2: u8 = 0xBF;
pub const VK_OEM_3: u8 = 0xC0;
pub const VK_OEM_4: u8 = 0xDB;
pub const VK_OEM_5: u8 = 0xDC;
pub const VK_OEM_6: u8 = 0xDD;
pub const VK_OEM_7: u8 = 0xDE;
pub const VK_OEM_8: u8 = 0xDF;
pub const VK_OEM_102: u8 = 0xE2;

/// Converts virtual key code to key name string.
pub fn vk_to_key_name(vk: u8) -> String {
    match vk {
        // A-Z, 0-9
        0x41..=0x5A | 0x30..=0x39 => (vk as char).to_string(),
        VK_NUMPAD0..=VK_NUMPAD9 => format!("NUMPAD{}", vk - VK_NUMPAD0),
        VK_F1..=VK_F24 => format!("F{}", vk - VK_F1 + 1),
        VK_SPACE => "SPACE".to_string(),
        VK_RETURN => "RETURN".to_string(),
        VK_TAB => "TAB".to_string(),
        VK_ESCAPE => "ESCAPE".to_string(),
        VK_BACK => "BACK".to_string(),
        VK_DELETE => "DELETE".to_string(),
        VK_INSERT => "INSERT".to_string(),
        VK_HOME => "HOME".to_string(),
        VK_END => "END".to_string(),
        VK_PRIOR => "PAGEUP".to_string(),
        VK_NEXT => "PAGEDOWN".to_string(),
        VK_UP => "UP".to_string(),
        VK_DOWN => "DOWN".to_string(),
        VK_LEFT => "LEFT".to_string(),
        VK_RIGHT => "RIGHT".to_string(),
        VK_CAPITAL => "CAPITAL".to_string(),
        VK_NUMLOCK => "NUMLOCK".to_string(),
        VK_SCROLL => "SCROLL".to_string(),
        VK_PAUSE => "PAUSE".to_string(),
        VK_SNAPSHOT => "SNAPSHOT".to_string(),
        VK_MULTIPLY => "MULTIPLY".to_string(),
        VK_ADD => "ADD".to_string(),
        VK_SEPARATOR => "SEPARATOR".to_string(),
        VK_SUBTRACT => "SUBTRACT".to_string(),
        VK_DECIMAL => "DECIMAL".to_string(),
        VK_DIVIDE => "DIVIDE".to_string(),
        VK_OEM_1 => "OEM_1".to_string(),
        VK_OEM_PLUS => "OEM_PLUS".to_string(),
        VK_OEM_COMMA => "OEM_COMMA".to_string(),
        VK_OEM_MINUS => "OEM_MINUS".to_string(),
        VK_OEM_PERIOD => "OEM_PERIOD".to_string(),
        VK_OEM_2 => "OEM_2".to_string(),
        VK_OEM_3 => "OEM_3".to_string(),
        VK_OEM_4 => "OEM_4".to_string(),
        VK_OEM_5 => "OEM_5".to_string(),
        VK_OEM_6 => "OEM_6".to_string(),
        VK_OEM_7 => "OEM_7".to_string(),
        VK_OEM_8 => "OEM_8".to_string(),
        VK_OEM_102 => "OEM_102".to_string(),
        VK_LCONTROL => "LCTRL".to_string(),
        VK_RCONTROL => "RCTRL".to_string(),
        VK_LMENU => "LALT".to_string(),
        VK_RMENU => "RALT".to_string(),
        VK_LSHIFT => "LSHIFT".to_string(),
        VK_RSHIFT => "RSHIFT".to_string(),
        VK_LWIN => "LWIN".to_string(),
        VK_RWIN => "RWIN".to_string(),
        VK_APPS => "APPS".to_string(),
        // Unknown key - format as hex
        _ => format!("VK_{:02X}", vk),
    }
}

/// Parses a key name (case insensitive) or a `VK_xx` hex code.
pub fn key_name_to_vk(key_name: &str) -> Option<u8> {
    let key = key_name.to_uppercase();

    // letter and number keys
    if key.len() == 1
        && let Some(c) = key.chars().next()
        && (c.is_ascii_alphabetic() || c.is_ascii_digit())
    {
        return Some(c as u8);
    }

    // F1-F24
    if let Some(num) = key.strip_prefix('F')
        && let Ok(num) = num.parse::<u8>()
        && (1..=24).contains(&num)
    {
        return Some(VK_F1 + num - 1);
    }

    if let Some(num) = key.strip_prefix("NUMPAD")
        && let Ok(num) = num.parse::<u8>()
        && num <= 9
    {
        return Some(VK_NUMPAD0 + num);
    }

    if let Some(hex) = key.strip_prefix("VK_")
        && let Ok(vk) = u8::from_str_radix(hex, 16)
    {
        return Some(vk);
    }

    match key.as_str() {
        "ESC" | "ESCAPE" => Some(VK_ESCAPE),
        "ENTER" | "RETURN" => Some(VK_RETURN),
        "TAB" => Some(VK_TAB),
        "CLEAR" => Some(VK_CLEAR),
        "SHIFT" => Some(VK_SHIFT),
        "CTRL" => Some(VK_CONTROL),
        "ALT" => Some(VK_MENU),
        "PAUSE" => Some(VK_PAUSE),
        "CAPSLOCK" | "CAPITAL" => Some(VK_CAPITAL),
        "SPACE" => Some(VK_SPACE),
        "BACKSPACE" | "BACK" => Some(VK_BACK),
        "DELETE" => Some(VK_DELETE),
        "INSERT" => Some(VK_INSERT),
        "HOME" => Some(VK_HOME),
        "END" => Some(VK_END),
        "PAGEUP" => Some(VK_PRIOR),
        "PAGEDOWN" => Some(VK_NEXT),
        "UP" => Some(VK_UP),
        "DOWN" => Some(VK_DOWN),
        "LEFT" => Some(VK_LEFT),
        "RIGHT" => Some(VK_RIGHT),
        "LSHIFT" => Some(VK_LSHIFT),
        "RSHIFT" => Some(VK_RSHIFT),
        "LCTRL" => Some(VK_LCONTROL),
        "RCTRL" => Some(VK_RCONTROL),
        "LALT" => Some(VK_LMENU),
        "RALT" => Some(VK_RMENU),
        "LWIN" => Some(VK_LWIN),
        "RWIN" => Some(VK_RWIN),
        "APPS" => Some(VK_APPS),
        "NUMLOCK" => Some(VK_NUMLOCK),
        "SCROLL" | "SCROLLLOCK" => Some(VK_SCROLL),
        "SNAPSHOT" | "PRINTSCREEN" => Some(VK_SNAPSHOT),
        "MULTIPLY" => Some(VK_MULTIPLY),
        "ADD" => Some(VK_ADD),
        "SEPARATOR" => Some(VK_SEPARATOR),
        "SUBTRACT" => Some(VK_SUBTRACT),
        "DECIMAL" => Some(VK_DECIMAL),
        "DIVIDE" => Some(VK_DIVIDE),
        "OEM_1" => Some(VK_OEM_1),
        "OEM_PLUS" => Some(VK_OEM_PLUS),
        "OEM_COMMA" => Some(VK_OEM_COMMA),
        "OEM_MINUS" => Some(VK_OEM_MINUS),
        "OEM_PERIOD" => Some(VK_OEM_PERIOD),
        "OEM_2" => Some(VK_OEM_2),
        "OEM_3" => Some(VK_OEM_3),
        "OEM_4" => Some(VK_OEM_4),
        "OEM_5" => Some(VK_OEM_5),
        "OEM_6" => Some(VK_OEM_6),
        "OEM_7" => Some(VK_OEM_7),
        "OEM_8" => Some(VK_OEM_8),
        "OEM_102" => Some(VK_OEM_102),
        _ => None,
    }
}
