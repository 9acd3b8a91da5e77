//! Fixed PPU constants: the 64-entry NES-to-RGB palette and the layout
//! constants the scanline engine indexes into.

/// Packed 0xRRGGBB entries for the 2C02's 64 palette indices, in the
/// conventional $00-$3F order. Index $0D and its row ("blacker than
/// black") are reproduced as-is rather than clamped; software that pokes
/// it is relying on undefined behavior this core doesn't special-case.
pub const NES_PALETTE: [u32; 64] = [
    0x626262, 0x001F_B2, 0x2404_C8, 0x5200_BE, 0x7300_76, 0x8000_08, 0x7A00_00, 0x6210_00,
    0x3F2B_00, 0x0042_00, 0x004A_00, 0x004412, 0x002E_66, 0x000000, 0x000000, 0x000000,
    0xABAB_AB, 0x0D57_FF, 0x4B30_FF, 0x8A13_FF, 0xBC08_D6, 0xD210_6A, 0xCC2C_00, 0xA755_00,
    0x744E_00, 0x158E_00, 0x009A_00, 0x009437, 0x00748D, 0x000000, 0x000000, 0x000000,
    0xFFFF_FF, 0x53AE_FF, 0x9085_FF, 0xD365_FF, 0xFF57_FF, 0xFF5D_CF, 0xFF77_70, 0xF09A_28,
    0xBCBE_00, 0x88D8_00, 0x5CE4_30, 0x45E0_82, 0x48CD_DE, 0x4E4E_4E, 0x000000, 0x000000,
    0xFFFF_FF, 0xB6E1_FF, 0xCED1_FF, 0xE9C3_FF, 0xFFBC_FF, 0xFFBD_F4, 0xFFC6_C3, 0xFFD5_9A,
    0xE9E6_81, 0xCEF4_81, 0xB6F8_B8, 0xA9F8_E2, 0xABEB_F6, 0xB3B3_B3, 0x000000, 0x000000,
];

/// Width/height of the frame this core emits.
pub const FRAME_WIDTH: u16 = 256;
pub const FRAME_HEIGHT: u16 = 240;

/// Scanline indices, per §4.4: -1 is the pre-render line, 0..=239 visible,
/// 240 post-render, 241..=260 VBlank idle.
pub const PRERENDER_SCANLINE: i16 = -1;
pub const POSTRENDER_SCANLINE: i16 = 240;
pub const LAST_SCANLINE: i16 = 260;

pub fn lookup_rgb(palette_index: u8) -> u32 {
    NES_PALETTE[(palette_index & 0x3F) as usize]
}
