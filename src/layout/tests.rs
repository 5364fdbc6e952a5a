use super::index::build_index;
use super::pointer::align_to_ptr;
use super::resolve::{compose_dead_key, keystate_to_modbits, locale_flags, modbits_to_level, resolve};
use super::*;
use crate::vk::*;

const BASE: u64 = 0x0001_0000;
const VK_A: u8 = b'A';
const VK_B: u8 = b'B';
const VK_Q: u8 = b'Q';
const VK_2: u8 = b'2';
const VK_Y: u8 = b'Y';

fn w(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

struct TestLayout {
    mem: MemoryArena,
    tables: RawLayoutTables,
    index: LayoutIndex,
}

impl TestLayout {
    fn load<P: PointerWidth>(builder: KbdTablesBuilder<P>) -> Self {
        let mut mem = MemoryArena::new();
        mem.add_region(BASE, builder.build(BASE));
        let tables = RawLayoutTables(BASE);
        let index = build_index::<P>(&mem, tables).expect("tables should index");
        Self { mem, tables, index }
    }

    fn resolve<P: PointerWidth>(&self, vk: u8, bits: ModBits, locks: LockBits) -> Option<Resolved> {
        resolve::<P>(&self.mem, self.tables, &self.index, vk, bits, locks)
    }

    fn char_of<P: PointerWidth>(&self, vk: u8, bits: ModBits, locks: LockBits) -> Option<char> {
        self.resolve::<P>(vk, bits, locks)
            .and_then(|r| r.character())
    }
}

fn us_like<P: PointerWidth>() -> KbdTablesBuilder<P> {
    KbdTablesBuilder::new()
        .modifier_key(VK_SHIFT, ModBits::SHIFT)
        .modifier_key(VK_CONTROL, ModBits::CTRL)
        .modifier_key(VK_MENU, ModBits::ALT)
        .mod_numbers(&[0, 1, 2, 3])
        .table(
            2,
            &[
                (VK_A, VkAttributes::CAPLOK, &w("aA")[..]),
                (VK_B, VkAttributes::CAPLOK, &w("bB")[..]),
                (VK_TAB, VkAttributes::empty(), &w("\t\t")[..]),
            ],
        )
        .table(
            3,
            &[
                (VK_OEM_4, VkAttributes::empty(), &[0x5B, 0x7B, 0x1B][..]),
                (VK_SPACE, VkAttributes::empty(), &w("   ")[..]),
            ],
        )
        .table(
            4,
            &[(VK_2, VkAttributes::empty(), &[0x32, 0x40, WCH_NONE, 0x00][..])],
        )
}

/// German-style modifiers: AltGr is level 2 and Ctrl+Alt+Shift is not a level.
fn altgr_like<P: PointerWidth>() -> KbdTablesBuilder<P> {
    KbdTablesBuilder::new()
        .modifier_key(VK_SHIFT, ModBits::SHIFT)
        .modifier_key(VK_CONTROL, ModBits::CTRL)
        .modifier_key(VK_MENU, ModBits::ALT)
        .mod_numbers(&[0, 1, 3, 4, SHFT_INVALID, SHFT_INVALID, 2, SHFT_INVALID])
        .locale_flags(KLLF_ALTGR)
}

#[test]
fn test_pointer_widths() {
    assert_eq!(Ptr32::SIZE, 4);
    assert_eq!(Ptr64::SIZE, 8);
    assert_eq!(Wow64Ptr::SIZE, 8);
    assert_eq!(Wow64Ptr::MODEL, PointerModel::Wow64);
    assert_eq!(Wow64Ptr::address(0xDEAD_BEEF_0001_0000), 0x0001_0000);
    assert_eq!(Ptr64::address(0xDEAD_BEEF_0001_0000), 0xDEAD_BEEF_0001_0000);

    assert_eq!(align_to_ptr::<Ptr32>(6), 8);
    assert_eq!(align_to_ptr::<Ptr64>(10), 16);
    assert_eq!(align_to_ptr::<Ptr64>(16), 16);
}

#[test]
fn test_host_ptr_null_is_an_error() {
    let ptr = HostPtr::<Wow64Ptr>::from_raw(0xFFFF_FFFF_0000_0000);
    assert!(ptr.is_null());
    assert_eq!(ptr.deref("pDeadKey"), Err(TableError::NullPointer("pDeadKey")));
    assert_eq!(ptr.raw(), 0xFFFF_FFFF_0000_0000);
}

#[test]
fn test_arena_rejects_reads_outside_regions() {
    let mut mem = MemoryArena::new();
    mem.add_region(0x100, vec![1, 2, 3, 4]);
    assert_eq!(mem.read_u16(0x102), Ok(0x0403));
    assert!(matches!(
        mem.read_u32(0x102),
        Err(TableError::OutOfRange { address: 0x102, len: 4 })
    ));
    assert!(mem.read_u8(0xFF).is_err());
}

#[test]
fn test_basic_levels() {
    let layout = TestLayout::load(us_like::<NativePtr>());
    let none = LockBits::empty();

    let a = layout
        .resolve::<NativePtr>(VK_A, ModBits::empty(), none)
        .unwrap();
    assert_eq!(a.character(), Some('a'));
    assert_eq!(a.consumed, ModBits::empty());
    assert!(!a.is_dead);

    let shifted = layout
        .resolve::<NativePtr>(VK_A, ModBits::SHIFT, none)
        .unwrap();
    assert_eq!(shifted.character(), Some('A'));
    assert_eq!(shifted.consumed, ModBits::SHIFT);
}

#[test]
fn test_ctrl_without_alt_never_wins() {
    let layout = TestLayout::load(us_like::<NativePtr>());
    let none = LockBits::empty();

    // Level 2 of '[' is ESC under Ctrl, but Ctrl alone is excluded
    let bracket = layout
        .resolve::<NativePtr>(VK_OEM_4, ModBits::CTRL, none)
        .unwrap();
    assert_eq!(bracket.character(), Some('['));
    assert_eq!(bracket.consumed, ModBits::empty());

    let a = layout
        .resolve::<NativePtr>(VK_A, ModBits::CTRL, none)
        .unwrap();
    assert_eq!(a.character(), Some('a'));
    assert_eq!(a.consumed, ModBits::empty());

    // Ctrl+Shift+2 is NUL in the table; Shift+2 wins instead
    let two = layout
        .resolve::<NativePtr>(VK_2, ModBits::CTRL | ModBits::SHIFT, none)
        .unwrap();
    assert_eq!(two.character(), Some('@'));
    assert_eq!(two.consumed, ModBits::SHIFT);
}

#[test]
fn test_unknown_key_is_unmapped() {
    let layout = TestLayout::load(us_like::<NativePtr>());
    assert_eq!(
        layout.resolve::<NativePtr>(VK_Q, ModBits::empty(), LockBits::empty()),
        None
    );
    assert_eq!(
        layout.resolve::<NativePtr>(0, ModBits::empty(), LockBits::empty()),
        None
    );
}

#[test]
fn test_caps_lock_inverts_shift() {
    let layout = TestLayout::load(us_like::<NativePtr>());
    let caps = LockBits::CAPSLOCK;

    assert_eq!(
        layout.char_of::<NativePtr>(VK_A, ModBits::empty(), caps),
        Some('A')
    );
    assert_eq!(
        layout.char_of::<NativePtr>(VK_A, ModBits::SHIFT, caps),
        Some('a')
    );
    // Keys without CAPLOK ignore the lock
    assert_eq!(
        layout.char_of::<NativePtr>(VK_2, ModBits::empty(), caps),
        Some('2')
    );
}

#[test]
fn test_caps_inversion_is_reported() {
    let layout = TestLayout::load(us_like::<NativePtr>());
    let caps = LockBits::CAPSLOCK;

    let upper = layout
        .resolve::<NativePtr>(VK_A, ModBits::empty(), caps)
        .unwrap();
    assert!(upper.caps_inverted);
    let lower = layout
        .resolve::<NativePtr>(VK_A, ModBits::SHIFT, caps)
        .unwrap();
    assert!(lower.caps_inverted);

    let plain = layout
        .resolve::<NativePtr>(VK_A, ModBits::SHIFT, LockBits::empty())
        .unwrap();
    assert!(!plain.caps_inverted);
    let digit = layout
        .resolve::<NativePtr>(VK_2, ModBits::SHIFT, caps)
        .unwrap();
    assert!(!digit.caps_inverted);
    assert_eq!(digit.character(), Some('@'));
}

#[test]
fn test_caps_lock_ignored_with_altgr_unless_caplokaltgr() {
    let layout = TestLayout::load(
        altgr_like::<NativePtr>()
            .level(ModBits::ALTGR | ModBits::SHIFT, 4)
            .table(
                5,
                &[
                    (VK_Q, VkAttributes::CAPLOK, &w("qQ@")[..]),
                    (
                        VK_Y,
                        VkAttributes::CAPLOK | VkAttributes::CAPLOKALTGR,
                        &[0x79, 0x59, 0x7A, WCH_NONE, 0x5A][..],
                    ),
                ],
            ),
    );
    let caps = LockBits::CAPSLOCK;

    assert_eq!(
        layout.char_of::<NativePtr>(VK_Q, ModBits::ALTGR, caps),
        Some('@')
    );
    assert_eq!(
        layout.char_of::<NativePtr>(VK_Y, ModBits::ALTGR, LockBits::empty()),
        Some('z')
    );
    assert_eq!(
        layout.char_of::<NativePtr>(VK_Y, ModBits::ALTGR, caps),
        Some('Z')
    );
}

#[test]
fn test_sgcaps_reads_following_entry() {
    let layout = TestLayout::load(
        KbdTablesBuilder::<NativePtr>::new()
            .modifier_key(VK_SHIFT, ModBits::SHIFT)
            .mod_numbers(&[0, 1])
            .table(
                2,
                &[
                    (VK_OEM_1, VkAttributes::SGCAPS, &w("üè")[..]),
                    (VK_OEM_1, VkAttributes::empty(), &w("Üè")[..]),
                    (VK_B, VkAttributes::CAPLOK, &w("bB")[..]),
                ],
            ),
    );

    assert_eq!(
        layout.index.vk_slot(VK_OEM_1),
        Some(VkSlot { table: 0, entry: 0 })
    );
    assert_eq!(
        layout.char_of::<NativePtr>(VK_OEM_1, ModBits::empty(), LockBits::empty()),
        Some('ü')
    );
    assert_eq!(
        layout.char_of::<NativePtr>(VK_OEM_1, ModBits::empty(), LockBits::CAPSLOCK),
        Some('Ü')
    );
    assert_eq!(
        layout.char_of::<NativePtr>(VK_OEM_1, ModBits::SHIFT, LockBits::empty()),
        Some('è')
    );
}

#[test]
fn test_kana_lock() {
    let layout = TestLayout::load(
        KbdTablesBuilder::<NativePtr>::new()
            .modifier_key(VK_SHIFT, ModBits::SHIFT)
            .modifier_key(VK_KANA, ModBits::KANA)
            .level(ModBits::empty(), 0)
            .level(ModBits::SHIFT, 1)
            .level(ModBits::KANA, 2)
            .table(3, &[(VK_A, VkAttributes::KANALOK, &w("aAチ")[..])]),
    );

    assert_eq!(
        layout.char_of::<NativePtr>(VK_A, ModBits::empty(), LockBits::KANALOCK),
        Some('チ')
    );
    assert_eq!(
        layout.char_of::<NativePtr>(VK_A, ModBits::empty(), LockBits::empty()),
        Some('a')
    );
}

#[test]
fn test_dead_key_reads_base_from_following_entry() {
    let layout = TestLayout::load(
        altgr_like::<NativePtr>()
            .table(
                3,
                &[
                    (VK_OEM_6, VkAttributes::empty(), &[WCH_DEAD, WCH_DEAD, WCH_NONE][..]),
                    (0xFF, VkAttributes::empty(), &[0xB4, 0x60, WCH_NONE][..]),
                ],
            )
            .dead_key(0xB4, 'e' as u16, 'é' as u16, 0)
            .dead_key(0x60, 'e' as u16, 'è' as u16, 0)
            .dead_key(0xB4, ' ' as u16, 0xB4, DKF_DEAD),
    );

    let acute = layout
        .resolve::<NativePtr>(VK_OEM_6, ModBits::empty(), LockBits::empty())
        .unwrap();
    assert!(acute.is_dead);
    assert_eq!(acute.wch, 0xB4);

    let grave = layout
        .resolve::<NativePtr>(VK_OEM_6, ModBits::SHIFT, LockBits::empty())
        .unwrap();
    assert!(grave.is_dead);
    assert_eq!(grave.character(), Some('`'));
    assert_eq!(grave.consumed, ModBits::SHIFT);

    let composed = compose_dead_key::<NativePtr>(&layout.mem, layout.tables, 0xB4, 'e' as u16);
    assert_eq!(
        composed,
        Some(Composed {
            character: 'é',
            is_dead: false
        })
    );
    let chained = compose_dead_key::<NativePtr>(&layout.mem, layout.tables, 0xB4, ' ' as u16);
    assert_eq!(chained.map(|c| c.is_dead), Some(true));
    assert_eq!(
        compose_dead_key::<NativePtr>(&layout.mem, layout.tables, 0x60, 'x' as u16),
        None
    );
}

#[test]
fn test_compose_without_dead_key_table() {
    let layout = TestLayout::load(us_like::<NativePtr>());
    assert_eq!(
        compose_dead_key::<NativePtr>(&layout.mem, layout.tables, 0xB4, 'e' as u16),
        None
    );
}

#[test]
fn test_tie_keeps_lowest_level() {
    // Shift and Alt are separate levels and Shift+Alt is not a level
    let layout = TestLayout::load(
        KbdTablesBuilder::<NativePtr>::new()
            .modifier_key(VK_SHIFT, ModBits::SHIFT)
            .modifier_key(VK_MENU, ModBits::ALT)
            .mod_numbers(&[0, 1, SHFT_INVALID, SHFT_INVALID, 2])
            .table(3, &[(VK_A, VkAttributes::empty(), &w("aAå")[..])]),
    );

    let r = layout
        .resolve::<NativePtr>(VK_A, ModBits::SHIFT | ModBits::ALT, LockBits::empty())
        .unwrap();
    assert_eq!(r.character(), Some('A'));
    assert_eq!(r.consumed, ModBits::SHIFT);
}

#[test]
fn test_most_specific_level_wins() {
    let layout = TestLayout::load(altgr_like::<NativePtr>().table(
        4,
        &[(VK_Q, VkAttributes::empty(), &w("qQ@Ω")[..])],
    ));

    let r = layout
        .resolve::<NativePtr>(VK_Q, ModBits::ALTGR | ModBits::SHIFT, LockBits::empty())
        .unwrap();
    assert_eq!(r.character(), Some('@'));
    assert_eq!(r.consumed, ModBits::ALTGR);
}

#[test]
fn test_sentinels_are_never_returned() {
    let layout = TestLayout::load(us_like::<NativePtr>().table(
        2,
        &[(VK_Q, VkAttributes::empty(), &[WCH_LGTR, WCH_NONE][..])],
    ));
    assert_eq!(
        layout.resolve::<NativePtr>(VK_Q, ModBits::SHIFT, LockBits::empty()),
        None
    );
}

#[test]
fn test_level_zero_mod_number_is_skipped() {
    // Known special case: a non-empty combination mapped to level 0 is
    // treated as a broken table and never recorded. A genuine level 0 for
    // such a combination cannot be represented.
    let layout = TestLayout::load(
        KbdTablesBuilder::<NativePtr>::new()
            .modifier_key(VK_SHIFT, ModBits::SHIFT)
            .modifier_key(VK_CONTROL, ModBits::CTRL)
            .mod_numbers(&[0, 1, 0])
            .table(2, &[(VK_A, VkAttributes::empty(), &w("aA")[..])]),
    );

    assert_eq!(layout.index.level_to_modbits(0), Some(ModBits::empty()));
    assert_eq!(layout.index.level_to_modbits(1), Some(ModBits::SHIFT));
    assert_eq!(layout.index.max_level(), 1);
    assert_eq!(layout.index.max_modbit_value(), 2);
}

#[test]
fn test_level_modbits_round_trip() {
    let layout = TestLayout::load(altgr_like::<NativePtr>().table(
        1,
        &[(VK_A, VkAttributes::empty(), &w("a")[..])],
    ));
    let tables = Some(layout.tables);

    for level in 0..=layout.index.max_level() {
        let bits = layout.index.level_to_modbits(level).unwrap();
        assert_eq!(
            modbits_to_level::<NativePtr>(&layout.mem, tables, bits),
            level,
            "level {level}"
        );
    }
    assert_eq!(layout.index.level_to_modbits(layout.index.max_level() + 1), None);
}

#[test]
fn test_modbits_to_level_out_of_range() {
    let layout = TestLayout::load(us_like::<NativePtr>());
    let tables = Some(layout.tables);

    assert_eq!(
        modbits_to_level::<NativePtr>(&layout.mem, tables, ModBits::SHIFT | ModBits::CTRL),
        3
    );
    assert_eq!(
        modbits_to_level::<NativePtr>(&layout.mem, tables, ModBits::ALT),
        0
    );
    assert_eq!(
        modbits_to_level::<NativePtr>(&layout.mem, None, ModBits::SHIFT),
        0
    );
}

#[test]
fn test_keystate_to_modbits() {
    let layout = TestLayout::load(us_like::<NativePtr>());
    let tables = Some(layout.tables);
    let mut state = [0u8; 256];

    assert_eq!(
        keystate_to_modbits::<NativePtr>(&layout.mem, tables, &state),
        ModBits::empty()
    );

    state[VK_SHIFT as usize] = 0x80;
    state[VK_MENU as usize] = 0x81;
    // Toggled but not down
    state[VK_CONTROL as usize] = 0x01;
    assert_eq!(
        keystate_to_modbits::<NativePtr>(&layout.mem, tables, &state),
        ModBits::SHIFT | ModBits::ALT
    );
    assert_eq!(
        keystate_to_modbits::<NativePtr>(&layout.mem, None, &state),
        ModBits::empty()
    );
}

#[test]
fn test_reverse_chains() {
    let layout = TestLayout::load(us_like::<NativePtr>().table(
        2,
        &[(VK_Q, VkAttributes::empty(), &w("aq")[..])],
    ));

    // Newest first
    let entries: Vec<(u8, ModBits)> = layout
        .index
        .entries_for_char('a' as u16)
        .map(|e| (e.vk, e.mod_bits))
        .collect();
    assert_eq!(
        entries,
        vec![(VK_Q, ModBits::empty()), (VK_A, ModBits::empty())]
    );

    let upper: Vec<_> = layout.index.entries_for_char('A' as u16).collect();
    assert_eq!(upper.len(), 1);
    assert_eq!(upper[0].mod_bits, ModBits::SHIFT);

    // Sentinels have no chain
    for sentinel in [WCH_NONE, WCH_DEAD, WCH_LGTR] {
        assert!(layout.index.chain_head(sentinel).is_none());
    }
    assert!(layout.index.entries_for_char('z' as u16).next().is_none());
}

#[test]
fn test_dead_key_indexed_under_its_own_key() {
    let layout = TestLayout::load(altgr_like::<NativePtr>().table(
        3,
        &[
            (VK_OEM_6, VkAttributes::empty(), &[WCH_DEAD, WCH_DEAD, WCH_NONE][..]),
            (VK_DEAD_BASE, VkAttributes::empty(), &[0xB4, 0x60, WCH_NONE][..]),
            (VK_OEM_4, VkAttributes::empty(), &[0xB4, WCH_NONE, WCH_NONE][..]),
        ],
    ));

    let acute: Vec<(u8, ModBits, bool)> = layout
        .index
        .entries_for_char(0xB4)
        .map(|e| (e.vk, e.mod_bits, e.is_dead))
        .collect();
    assert_eq!(
        acute,
        vec![
            (VK_OEM_4, ModBits::empty(), false),
            (VK_OEM_6, ModBits::empty(), true),
        ]
    );

    let grave: Vec<(u8, ModBits, bool)> = layout
        .index
        .entries_for_char(0x60)
        .map(|e| (e.vk, e.mod_bits, e.is_dead))
        .collect();
    assert_eq!(grave, vec![(VK_OEM_6, ModBits::SHIFT, true)]);

    // The pseudo-entry is neither a key nor a chain member
    assert!(layout.index.vk_slot(VK_DEAD_BASE).is_none());
    assert!(layout.index.chain_head(WCH_DEAD).is_none());
    for wch in [0xB4, 0x60] {
        assert!(layout.index.entries_for_char(wch).all(|e| e.vk != VK_DEAD_BASE));
    }
}

#[test]
fn test_identity_entries() {
    let layout = TestLayout::load(us_like::<NativePtr>());

    for vk in [0u8, VK_A, 0xFF] {
        let entry = layout.index.key_entry(vk as usize).unwrap();
        assert_eq!(entry.vk, vk);
        assert_eq!(entry.mod_bits, ModBits::empty());
    }
    let shift_tab = layout.index.key_entry(SHIFT_TAB_ENTRY).unwrap();
    assert_eq!(shift_tab.vk, VK_TAB);
    assert_eq!(shift_tab.mod_bits, ModBits::SHIFT);
}

#[test]
fn test_layout_without_character_tables() {
    let layout = TestLayout::load(
        KbdTablesBuilder::<NativePtr>::new()
            .modifier_key(VK_SHIFT, ModBits::SHIFT)
            .mod_numbers(&[0, 1]),
    );

    assert_eq!(layout.index.key_entries.len(), SHIFT_TAB_ENTRY + 1);
    assert_eq!(
        layout.resolve::<NativePtr>(VK_A, ModBits::empty(), LockBits::empty()),
        None
    );
}

#[test]
fn test_empty_index_misses_everything() {
    let index = LayoutIndex::default();
    assert!(index.is_empty());
    assert_eq!(index.vk_slot(VK_A), None);
    assert_eq!(index.level_to_modbits(1), None);
    assert!(index.entries_for_char('a' as u16).next().is_none());
}

#[test]
fn test_ptr32_tables() {
    let layout = TestLayout::load(us_like::<Ptr32>());
    assert_eq!(
        layout.char_of::<Ptr32>(VK_B, ModBits::SHIFT, LockBits::empty()),
        Some('B')
    );
    assert_eq!(
        layout.char_of::<Ptr32>(VK_2, ModBits::SHIFT, LockBits::empty()),
        Some('@')
    );
}

#[test]
fn test_wow64_ignores_upper_pointer_half() {
    let builder = us_like::<Wow64Ptr>().pointer_tag(0xDEAD_BEEF_0000_0000);
    let mut mem = MemoryArena::new();
    mem.add_region(BASE, builder.build(BASE));
    let tables = RawLayoutTables(BASE);

    let index = build_index::<Wow64Ptr>(&mem, tables).unwrap();
    let r = resolve::<Wow64Ptr>(&mem, tables, &index, VK_A, ModBits::SHIFT, LockBits::empty());
    assert_eq!(r.and_then(|r| r.character()), Some('A'));

    // Read as plain 64-bit pointers the tag makes every address invalid
    assert!(matches!(
        build_index::<Ptr64>(&mem, tables),
        Err(TableError::OutOfRange { .. })
    ));
}

#[test]
fn test_unreadable_tables() {
    let mem = MemoryArena::new();
    let tables = RawLayoutTables(BASE);
    assert!(build_index::<NativePtr>(&mem, tables).is_err());

    let index = LayoutIndex::default();
    assert_eq!(
        resolve::<NativePtr>(&mem, tables, &index, VK_A, ModBits::empty(), LockBits::empty()),
        None
    );
    assert_eq!(locale_flags::<NativePtr>(&mem, tables), 0);
    assert_eq!(
        keystate_to_modbits::<NativePtr>(&mem, Some(tables), &[0x80; 256]),
        ModBits::empty()
    );
}

#[test]
fn test_locale_flags() {
    let altgr = TestLayout::load(altgr_like::<NativePtr>());
    assert_eq!(
        locale_flags::<NativePtr>(&altgr.mem, altgr.tables) & KLLF_ALTGR,
        KLLF_ALTGR
    );
    let us = TestLayout::load(us_like::<NativePtr>());
    assert_eq!(locale_flags::<NativePtr>(&us.mem, us.tables), 0);
}

#[test]
fn test_resolve_is_idempotent() {
    let layout = TestLayout::load(us_like::<NativePtr>());
    for bits in 0..8u8 {
        let bits = ModBits::from_bits_retain(bits);
        let first = layout.resolve::<NativePtr>(VK_2, bits, LockBits::CAPSLOCK);
        let second = layout.resolve::<NativePtr>(VK_2, bits, LockBits::CAPSLOCK);
        assert_eq!(first, second);
    }
}

#[test]
fn test_variant_selection() {
    assert_eq!(LayoutImpl::for_model(PointerModel::Wow64).model, PointerModel::Wow64);
    assert_eq!(LayoutImpl::for_model(PointerModel::Native).model, PointerModel::Native);
    assert_eq!(LayoutImpl::detect(false).model, PointerModel::Native);
    if cfg!(target_pointer_width = "64") {
        assert_eq!(LayoutImpl::detect(true).model, PointerModel::Native);
    }
}

#[test]
fn test_variant_table_dispatch() {
    let layout = TestLayout::load(us_like::<NativePtr>());
    let imp = LayoutImpl::native();

    let index = (imp.build_index)(&layout.mem, layout.tables).unwrap();
    let r = (imp.resolve)(
        &layout.mem,
        layout.tables,
        &index,
        VK_A,
        ModBits::SHIFT,
        LockBits::empty(),
    );
    assert_eq!(r.and_then(|r| r.character()), Some('A'));
    assert_eq!(
        (imp.modbits_to_level)(&layout.mem, Some(layout.tables), ModBits::CTRL),
        2
    );
}
