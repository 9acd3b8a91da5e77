//! The eight memory-mapped registers the CPU uses to drive the PPU, and the
//! trait that exposes them without requiring callers to know about the
//! PPU's internal state layout.

use num_derive::FromPrimitive;

/// Register index as seen from the CPU's $2000-$2007 window.
#[derive(FromPrimitive, Debug, Copy, Clone, PartialEq, Eq)]
pub enum PpuRegs {
    /// $2000, write-only.
    Ctrl = 0,
    /// $2001, write-only.
    Mask = 1,
    /// $2002, read-only.
    Status = 2,
    /// $2003, write-only.
    OamAddr = 3,
    /// $2004, read/write.
    OamData = 4,
    /// $2005, write-twice.
    Scroll = 5,
    /// $2006, write-twice.
    PpuAddr = 6,
    /// $2007, read/write.
    PpuData = 7,
}

/// The only path the CPU side of the bus has into PPU state. Implemented by
/// `ppu::Ppu`; kept as a trait so the bus doesn't need to know about shift
/// registers, OAM, or the v/t address machinery.
pub trait PpuDataBus {
    fn write_register(&mut self, reg: PpuRegs, data: u8);
    fn read_register(&mut self, reg: PpuRegs) -> u8;
    /// Bulk OAM load driven by a CPU write to OAMDMA ($4014). `page` is the
    /// already-read 256 bytes from `page_index << 8` in CPU memory.
    fn oam_dma_load(&mut self, page: &[u8]);
}
