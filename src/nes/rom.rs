//! iNES cartridge intake.
//!
//! This is deliberately a small, fixed-mapper-0 loader, not a general iNES /
//! NES 2.0 implementation: trainers, bank-switching mappers, and the
//! NES 2.0 extension fields are all rejected rather than interpreted. See
//! <https://wiki.nesdev.org/w/index.php/INES> for the full header layout;
//! only the fields this core actually consumes are decoded below.

use std::error::Error as StdError;
use std::fs::File;
use std::io::Read;

use crate::nes::util::Error;

pub const HEADER_LEN: usize = 16;
pub const PRG_ROM_UNIT_SIZE: usize = 0x4000;
pub const CHR_ROM_UNIT_SIZE: usize = 0x2000;

/// Nametable mirroring mode, taken from flag byte 6 of the header. Used by
/// the PPU's VRAM controller to fold the four logical nametables onto the
/// 2 KiB of physical VRAM.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
}

/// The parsed, validated contents of an iNES image: raw PRG/CHR bytes ready
/// to be copied into CPU/PPU memory, plus the mirroring mode the PPU needs.
pub struct Cartridge {
    prg_rom: Vec<u8>,
    chr_rom: Vec<u8>,
    mirroring: Mirroring,
}

impl Cartridge {
    pub fn prg_rom(&self) -> &[u8] {
        &self.prg_rom
    }

    pub fn chr_rom(&self) -> &[u8] {
        &self.chr_rom
    }

    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    /// Builds a `Cartridge` directly from raw banks, bypassing header
    /// parsing. Only used by other modules' tests that need a minimal
    /// cartridge to wire up a `Bus`/`Ppu` without an on-disk iNES file.
    #[cfg(test)]
    pub fn for_tests(prg_rom: Vec<u8>, chr_rom: Vec<u8>, mirroring: Mirroring) -> Self {
        Cartridge {
            prg_rom,
            chr_rom,
            mirroring,
        }
    }

    /// Reads an iNES image from disk and validates it per the header rules
    /// in `parse` (§6, external interfaces).
    pub fn load_from_file(path: &str) -> Result<Cartridge, Error> {
        let mut file = File::open(path).map_err(|e| Error::load(format!("{}: {}", path, e)))?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)
            .map_err(|e| Error::load(format!("{}: {}", path, e)))?;
        parse(&buf).map_err(|e| Error::load(format!("{}: {}", path, e)))
    }
}

fn parse(rom: &[u8]) -> Result<Cartridge, Box<dyn StdError>> {
    if rom.len() < HEADER_LEN {
        return Err("header size is too short".into());
    }

    let header = &rom[..HEADER_LEN];
    if header[0] != b'N' || header[1] != b'E' || header[2] != b'S' || header[3] != 0x1A {
        return Err("missing NES<EOF> magic bytes".into());
    }

    let prg_units = header[4];
    let chr_units = header[5];
    if prg_units != 1 && prg_units != 2 {
        return Err(format!("unsupported PRG-ROM size: {} x 16KiB", prg_units).into());
    }
    if chr_units != 1 {
        return Err(format!("unsupported CHR-ROM size: {} x 8KiB", chr_units).into());
    }

    // Flags 6:
    //   76543210
    //   ||||||||
    //   |||||||+- Mirroring: 0 = horizontal, 1 = vertical
    //   ||||||+-- Battery-backed PRG RAM (ignored)
    //   |||||+--- 512-byte trainer present
    //   ||||+---- Four-screen VRAM (unsupported)
    //   ++++----- Mapper number, low nibble
    let flags6 = header[6];
    let has_trainer = (flags6 & 0b0000_0100) != 0;
    let four_screen = (flags6 & 0b0000_1000) != 0;
    let mapper_low = (flags6 & 0b1111_0000) >> 4;
    if has_trainer {
        return Err("trainer-equipped images are not supported".into());
    }
    if four_screen {
        return Err("four-screen mirroring is not supported".into());
    }
    if mapper_low != 0 {
        return Err(format!("unsupported mapper number (low nibble {})", mapper_low).into());
    }

    // Flags 7's high mapper nibble must also be 0: anything else means a
    // mapper beyond the fixed-bank mapper 0 this core implements.
    let flags7 = header[7];
    let mapper_high = (flags7 & 0b1111_0000) >> 4;
    if mapper_high != 0 {
        return Err(format!("unsupported mapper number (high nibble {})", mapper_high).into());
    }

    for (i, &b) in header[7..16].iter().enumerate() {
        if b != 0 {
            return Err(format!("reserved header byte {} is non-zero (${:02X})", i + 7, b).into());
        }
    }

    let mirroring = if (flags6 & 0b0000_0001) != 0 {
        Mirroring::Vertical
    } else {
        Mirroring::Horizontal
    };

    let prg_len = prg_units as usize * PRG_ROM_UNIT_SIZE;
    let chr_len = chr_units as usize * CHR_ROM_UNIT_SIZE;
    let prg_start = HEADER_LEN;
    let prg_end = prg_start + prg_len;
    let chr_end = prg_end + chr_len;
    if rom.len() < chr_end {
        return Err("file is shorter than the header's PRG/CHR sizes declare".into());
    }

    Ok(Cartridge {
        prg_rom: rom[prg_start..prg_end].to_vec(),
        chr_rom: rom[prg_end..chr_end].to_vec(),
        mirroring,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(prg: u8, chr: u8, flags6: u8, flags7: u8) -> Vec<u8> {
        let mut h = vec![b'N', b'E', b'S', 0x1A, prg, chr, flags6, flags7];
        h.extend(std::iter::repeat(0u8).take(8));
        h
    }

    fn make_rom(prg: u8, chr: u8, flags6: u8) -> Vec<u8> {
        let mut rom = header(prg, chr, flags6, 0);
        rom.extend(std::iter::repeat(0xEAu8).take(prg as usize * PRG_ROM_UNIT_SIZE));
        rom.extend(std::iter::repeat(0x00u8).take(chr as usize * CHR_ROM_UNIT_SIZE));
        rom
    }

    #[test]
    fn rejects_bad_magic() {
        let mut rom = make_rom(1, 1, 0);
        rom[0] = b'X';
        assert!(parse(&rom).is_err());
    }

    #[test]
    fn accepts_minimal_mapper0_rom() {
        let rom = make_rom(1, 1, 0);
        let cart = parse(&rom).unwrap();
        assert_eq!(cart.prg_rom().len(), PRG_ROM_UNIT_SIZE);
        assert_eq!(cart.chr_rom().len(), CHR_ROM_UNIT_SIZE);
        assert_eq!(cart.mirroring(), Mirroring::Horizontal);
    }

    #[test]
    fn reads_vertical_mirroring_bit() {
        let rom = make_rom(2, 1, 0b0000_0001);
        let cart = parse(&rom).unwrap();
        assert_eq!(cart.mirroring(), Mirroring::Vertical);
        assert_eq!(cart.prg_rom().len(), 2 * PRG_ROM_UNIT_SIZE);
    }

    #[test]
    fn rejects_trainer() {
        let rom = make_rom(1, 1, 0b0000_0100);
        assert!(parse(&rom).is_err());
    }

    #[test]
    fn rejects_nonzero_mapper() {
        let rom = make_rom(1, 1, 0b0001_0000);
        assert!(parse(&rom).is_err());
    }

    #[test]
    fn rejects_short_file() {
        let mut rom = make_rom(1, 1, 0);
        rom.truncate(rom.len() - 1);
        assert!(parse(&rom).is_err());
    }
}
