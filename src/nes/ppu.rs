//! The Picture Processing Unit: registers, VRAM, OAM, and the scanline
//! rendering pipeline (the pipeline itself lives in `ppu::rendering`).

pub mod constants;
pub mod memory;
pub mod registers;
pub mod rendering;

use bitflags::bitflags;

use crate::nes::ppu_databus::{PpuDataBus, PpuRegs};
use crate::nes::rom::Cartridge;
use memory::PpuMemory;
use registers::VramAddr;

bitflags! {
    /// PPUCTRL ($2000, write-only).
    pub struct CtrlFlags: u8 {
        const BASE_NAME_TABLE      = 0b0000_0011;
        /// 0: +1 per PPUDATA access, going across; 1: +32, going down.
        const VRAM_INCREMENT       = 0b0000_0100;
        /// 0: $0000; 1: $1000 (ignored in 8x16 sprite mode).
        const SPRITE_PATTERN_TABLE = 0b0000_1000;
        /// 0: $0000; 1: $1000.
        const BG_PATTERN_TABLE     = 0b0001_0000;
        /// 0: 8x8 sprites; 1: 8x16 sprites.
        const SPRITE_SIZE          = 0b0010_0000;
        const PPU_MASTER_SLAVE     = 0b0100_0000;
        const NMI_ON_VBLANK        = 0b1000_0000;
    }
}

bitflags! {
    /// PPUMASK ($2001, write-only).
    pub struct MaskFlags: u8 {
        const GRAYSCALE            = 0b0000_0001;
        const SHOW_BG_LEFTMOST     = 0b0000_0010;
        const SHOW_SPRITE_LEFTMOST = 0b0000_0100;
        const SHOW_BG              = 0b0000_1000;
        const SHOW_SPRITE          = 0b0001_0000;
        const EMPHASIZE_RED        = 0b0010_0000;
        const EMPHASIZE_GREEN      = 0b0100_0000;
        const EMPHASIZE_BLUE       = 0b1000_0000;
    }
}

bitflags! {
    /// PPUSTATUS ($2002, read-only). Bits 0-4 are open-bus: they read back
    /// whatever was last driven on the CPU/PPU data bus.
    pub struct StatusFlags: u8 {
        const SPRITE_OVERFLOW = 0b0010_0000;
        const SPRITE_ZERO_HIT = 0b0100_0000;
        const VBLANK_OCCURRED = 0b1000_0000;
    }
}

pub struct Ppu {
    ctrl: CtrlFlags,
    mask: MaskFlags,
    status: StatusFlags,

    oam_addr: u8,
    oam: [u8; 256],

    v: VramAddr,
    t: VramAddr,
    fine_x: u8,
    write_toggle: bool,
    data_read_buffer: u8,

    mem: PpuMemory,

    bg_next_tile_lsb: u8,
    bg_next_tile_msb: u8,
    bg_next_tile_attrib: u8,
    bg_shifter_pattern_lo: u16,
    bg_shifter_pattern_hi: u16,
    bg_shifter_attrib_lo: u16,
    bg_shifter_attrib_hi: u16,

    sprite_count: usize,
    sprite_pattern_lo: [u8; 8],
    sprite_pattern_hi: [u8; 8],
    sprite_attr: [u8; 8],
    sprite_x: [u8; 8],
    sprite_zero_in_range: bool,

    /// Last byte driven onto the shared bus by a PPU register access; used
    /// to answer reads of write-only registers' open-bus bits.
    open_bus: u8,
}

impl Ppu {
    pub fn new(cart: &Cartridge) -> Self {
        Ppu {
            ctrl: CtrlFlags::empty(),
            mask: MaskFlags::empty(),
            // Power-on state per https://wiki.nesdev.org/w/index.php/PPU_power_up_state:
            // PPUSTATUS's top bits come up set.
            status: StatusFlags::SPRITE_OVERFLOW | StatusFlags::VBLANK_OCCURRED,
            oam_addr: 0,
            oam: [0; 256],
            v: VramAddr::default(),
            t: VramAddr::default(),
            fine_x: 0,
            write_toggle: false,
            data_read_buffer: 0,
            mem: PpuMemory::new(cart.chr_rom(), cart.mirroring()),
            bg_next_tile_lsb: 0,
            bg_next_tile_msb: 0,
            bg_next_tile_attrib: 0,
            bg_shifter_pattern_lo: 0,
            bg_shifter_pattern_hi: 0,
            bg_shifter_attrib_lo: 0,
            bg_shifter_attrib_hi: 0,
            sprite_count: 0,
            sprite_pattern_lo: [0; 8],
            sprite_pattern_hi: [0; 8],
            sprite_attr: [0; 8],
            sprite_x: [0; 8],
            sprite_zero_in_range: false,
            open_bus: 0,
        }
    }

    fn increment_vram_addr(&mut self) {
        let step = if self.ctrl.contains(CtrlFlags::VRAM_INCREMENT) {
            32
        } else {
            1
        };
        self.v.increment_addr(step);
    }
}

impl PpuDataBus for Ppu {
    fn write_register(&mut self, reg: PpuRegs, data: u8) {
        self.open_bus = data;
        match reg {
            PpuRegs::Ctrl => {
                self.ctrl = CtrlFlags::from_bits_truncate(data);
                self.t.set_nametable(data & 0b11);
            }
            PpuRegs::Mask => self.mask = MaskFlags::from_bits_truncate(data),
            PpuRegs::Status => {} // read-only
            PpuRegs::OamAddr => self.oam_addr = data,
            PpuRegs::OamData => {
                self.oam[self.oam_addr as usize] = data;
                self.oam_addr = self.oam_addr.wrapping_add(1);
            }
            PpuRegs::Scroll => {
                if !self.write_toggle {
                    self.t.set_coarse_x(data >> 3);
                    self.fine_x = data & 0b111;
                } else {
                    self.t.set_coarse_y(data >> 3);
                    self.t.set_fine_y(data & 0b111);
                }
                self.write_toggle = !self.write_toggle;
            }
            PpuRegs::PpuAddr => {
                if !self.write_toggle {
                    let raw = (self.t.raw() & 0x00FF) | (((data & 0x3F) as u16) << 8);
                    self.t.set_raw(raw);
                } else {
                    let raw = (self.t.raw() & 0xFF00) | data as u16;
                    self.t.set_raw(raw);
                    self.v = self.t;
                }
                self.write_toggle = !self.write_toggle;
            }
            PpuRegs::PpuData => {
                self.mem.write(self.v.addr(), data);
                self.increment_vram_addr();
            }
        }
    }

    fn read_register(&mut self, reg: PpuRegs) -> u8 {
        let value = match reg {
            PpuRegs::Status => {
                let result = (self.status.bits() & 0xE0) | (self.open_bus & 0x1F);
                self.status.remove(StatusFlags::VBLANK_OCCURRED);
                self.write_toggle = false;
                result
            }
            PpuRegs::OamData => self.oam[self.oam_addr as usize],
            PpuRegs::PpuData => {
                let addr = self.v.addr();
                let result = if addr >= 0x3F00 {
                    let value = self.mem.read(addr);
                    self.data_read_buffer = self.mem.read(addr - 0x1000);
                    value
                } else {
                    let buffered = self.data_read_buffer;
                    self.data_read_buffer = self.mem.read(addr);
                    buffered
                };
                self.increment_vram_addr();
                result
            }
            _ => self.open_bus,
        };
        self.open_bus = value;
        value
    }

    fn oam_dma_load(&mut self, page: &[u8]) {
        for (i, &byte) in page.iter().enumerate() {
            let addr = self.oam_addr.wrapping_add(i as u8);
            self.oam[addr as usize] = byte;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nes::rom::Mirroring;

    fn ppu() -> Ppu {
        Ppu::new(&Cartridge::for_tests(
            vec![0u8; 0x4000],
            vec![0u8; 0x2000],
            Mirroring::Horizontal,
        ))
    }

    #[test]
    fn status_read_clears_vblank_and_write_toggle() {
        let mut p = ppu();
        p.status.insert(StatusFlags::VBLANK_OCCURRED);
        p.write_toggle = true;
        let status = p.read_register(PpuRegs::Status);
        assert_eq!(status & 0x80, 0x80);
        assert!(!p.status.contains(StatusFlags::VBLANK_OCCURRED));
        assert!(!p.write_toggle);
    }

    #[test]
    fn ppuaddr_two_writes_commit_t_into_v() {
        let mut p = ppu();
        p.write_register(PpuRegs::PpuAddr, 0x12);
        p.write_register(PpuRegs::PpuAddr, 0x34);
        assert_eq!(p.v.addr(), 0x1234);
        assert!(!p.write_toggle);
    }

    #[test]
    fn ppudata_write_increments_by_ctrl_bit() {
        let mut p = ppu();
        p.write_register(PpuRegs::PpuAddr, 0x20);
        p.write_register(PpuRegs::PpuAddr, 0x00);
        p.write_register(PpuRegs::PpuData, 0xAB);
        assert_eq!(p.v.addr(), 0x2001);

        p.write_register(PpuRegs::Ctrl, 0b0000_0100);
        p.write_register(PpuRegs::PpuData, 0xCD);
        assert_eq!(p.v.addr(), 0x2021);
    }

    #[test]
    fn ppudata_read_is_buffered_outside_palette() {
        let mut p = ppu();
        p.mem.write(0x2000, 0x11);
        p.mem.write(0x2001, 0x22);
        p.write_register(PpuRegs::PpuAddr, 0x20);
        p.write_register(PpuRegs::PpuAddr, 0x00);
        let first = p.read_register(PpuRegs::PpuData);
        let second = p.read_register(PpuRegs::PpuData);
        assert_eq!(first, 0); // buffer starts empty
        assert_eq!(second, 0x11);
    }

    #[test]
    fn ppudata_read_bypasses_buffer_for_palette() {
        let mut p = ppu();
        p.mem.write(0x3F00, 0x0F);
        p.write_register(PpuRegs::PpuAddr, 0x3F);
        p.write_register(PpuRegs::PpuAddr, 0x00);
        assert_eq!(p.read_register(PpuRegs::PpuData), 0x0F);
    }

    #[test]
    fn oam_dma_loads_starting_at_oam_addr() {
        let mut p = ppu();
        p.write_register(PpuRegs::OamAddr, 0x10);
        let page: Vec<u8> = (0..=255u8).collect();
        p.oam_dma_load(&page);
        assert_eq!(p.oam[0x10], 0);
        assert_eq!(p.oam[0x11], 1);
        assert_eq!(p.oam[0x0F], 255);
    }
}
