//! Core NES emulation library: 6502 interpreter, PPU, and the scheduler that
//! keeps them in lockstep. The host binary (`main.rs`) only wires this up to
//! a concrete window, clock, and ROM path.

pub mod nes;

pub use nes::emulator::Emulator;
pub use nes::util::Error;
