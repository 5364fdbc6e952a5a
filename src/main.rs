use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};

use winkeymap::keysym;
use winkeymap::vk::{key_name_to_vk, vk_to_key_name};
use winkeymap::{KeyboardPlatform, Keymap, KeymapConfig, ModifierType};

#[derive(Parser, Debug)]
#[command(name = "winkeymap", version, about = "Inspect the installed keyboard layouts")]
struct Args {
    /// Configuration file, created with defaults when missing
    #[arg(short, long, value_name = "FILE", default_value = "Keymap.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List installed layouts
    List,
    /// Show the symbol a key produces
    Translate {
        /// Key name, e.g. A, OEM_1, NUMPAD3 or VK_BA
        key: String,
        #[arg(long)]
        shift: bool,
        #[arg(long)]
        ctrl: bool,
        #[arg(long)]
        alt: bool,
        #[arg(long)]
        altgr: bool,
        #[arg(long)]
        caps: bool,
        /// Layout group, defaults to the active one
        #[arg(short, long)]
        group: Option<usize>,
    },
    /// List every key producing a character
    Lookup { character: char },
    /// List every symbol a key produces
    Keycode { key: String },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = KeymapConfig::load_or_create(&args.config)
        .with_context(|| format!("Failed to load configuration: {}", args.config.display()))?;

    run_on_host(config, args.command)
}

#[cfg(windows)]
fn run_on_host(config: KeymapConfig, command: Command) -> Result<()> {
    let mut keymap = Keymap::new(winkeymap::platform::windows::Win32Platform::new(), config);
    run(&mut keymap, command)
}

#[cfg(not(windows))]
fn run_on_host(_config: KeymapConfig, _command: Command) -> Result<()> {
    anyhow::bail!("keyboard layout drivers are only available on Windows")
}

#[cfg_attr(not(windows), allow(dead_code))]
fn run<K: KeyboardPlatform>(keymap: &mut Keymap<K>, command: Command) -> Result<()> {
    match command {
        Command::List => list(keymap),
        Command::Translate {
            key,
            shift,
            ctrl,
            alt,
            altgr,
            caps,
            group,
        } => {
            let vk = parse_key(&key)?;
            let mut state = ModifierType::empty();
            state.set(ModifierType::SHIFT, shift);
            state.set(ModifierType::CONTROL, ctrl);
            state.set(ModifierType::MOD1, alt);
            state.set(ModifierType::MOD2, altgr);
            state.set(ModifierType::LOCK, caps);
            let group = group.unwrap_or_else(|| keymap.active_group());

            match keymap.translate(vk as u32, state, group) {
                Some(t) => println!(
                    "{}  group {}  level {}  consumed {:?}",
                    describe_keyval(t.keyval),
                    t.effective_group,
                    t.level,
                    t.consumed
                ),
                None => println!("{} is unmapped in group {group}", vk_to_key_name(vk)),
            }
            Ok(())
        }
        Command::Lookup { character } => {
            let keyval = keysym::unicode_to_keysym(character);
            let keys = keymap.entries_for_keyval(keyval);
            if keys.is_empty() {
                println!("no key produces {}", describe_keyval(keyval));
            }
            for key in keys {
                println!(
                    "{:<10} group {}  level {}",
                    vk_to_key_name(key.keycode as u8),
                    key.group,
                    key.level
                );
            }
            Ok(())
        }
        Command::Keycode { key } => {
            let vk = parse_key(&key)?;
            for entry in keymap.entries_for_keycode(vk as u32) {
                println!(
                    "group {}  level {}  {}",
                    entry.key.group,
                    entry.key.level,
                    describe_keyval(entry.keyval)
                );
            }
            if let Some(scancode) = keymap.hardware_scancode(vk as u32) {
                println!("scan code {scancode:#04x}");
            }
            Ok(())
        }
    }
}

#[cfg_attr(not(windows), allow(dead_code))]
fn list<K: KeyboardPlatform>(keymap: &mut Keymap<K>) -> Result<()> {
    let active = keymap.active_group();
    let layouts: Vec<_> = keymap
        .manager_mut()
        .layouts()
        .iter()
        .map(|info| {
            (
                info.handle(),
                info.name().unwrap_or("?").to_string(),
                info.file()
                    .map_or_else(|| "-".to_string(), |file| file.display().to_string()),
            )
        })
        .collect();

    for (group, (handle, name, file)) in layouts.into_iter().enumerate() {
        println!(
            "{} {group}: {handle} {name} {file}{}{}",
            if group == active { '*' } else { ' ' },
            if handle.is_rtl() { " rtl" } else { "" },
            if keymap.has_altgr(group) { " altgr" } else { "" },
        );
    }
    Ok(())
}

#[cfg_attr(not(windows), allow(dead_code))]
fn parse_key(name: &str) -> Result<u8> {
    key_name_to_vk(name).ok_or_else(|| anyhow!("unknown key name: {name}"))
}

#[cfg_attr(not(windows), allow(dead_code))]
fn describe_keyval(keyval: u32) -> String {
    match keysym::keysym_to_unicode(keyval) {
        Some(c) if !c.is_control() => format!("{keyval:#06x} '{c}'"),
        _ => format!("{keyval:#06x}"),
    }
}
