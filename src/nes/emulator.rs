//! The frame/scanline scheduler (§5): keeps the CPU and PPU in lockstep
//! under a wall-clock budget, the one piece of the original main loop the
//! teacher's own TODOs never actually filled in.

use crate::nes::cpu::{Cpu, NMI_VECTOR};
use crate::nes::display::{Clock, DisplaySink, EventPoll, Quit};
use crate::nes::mem::Bus;
use crate::nes::ppu::constants::LAST_SCANLINE;
use crate::nes::rom::Cartridge;
use crate::nes::util::Error;

/// CPU cycles budgeted per scanline (§5). 262 scanlines/frame * 114 ~=
/// one NTSC frame's worth of 1.79 MHz CPU cycles at ~60 Hz.
const CYCLES_PER_SCANLINE: i32 = 114;

/// Wall-clock budget per scanline, matching 262 * 64us ~= 16.66ms/frame.
const SCANLINE_BUDGET_US: u64 = 64;

/// How much of the remaining per-scanline budget is spun rather than
/// slept: sleeping this close to the deadline risks the OS scheduler
/// overshooting it (§5, REDESIGN FLAGS timing guidance).
const SPIN_TAIL_US: u64 = 20;

const FIRST_SCANLINE: i16 = -1;

pub struct Emulator<D> {
    cpu: Cpu,
    bus: Bus,
    display: D,
    /// CPU cycles executed beyond the previous scanline's budget, carried
    /// forward so the running total tracks 114 cycles/scanline on average.
    cycle_debt: i32,
}

impl<D: DisplaySink + Clock + EventPoll> Emulator<D> {
    pub fn new(cart: &Cartridge, display: D) -> Self {
        let bus = Bus::new(cart);
        let mut cpu = Cpu::new();
        cpu.power_on(&bus);
        Emulator {
            cpu,
            bus,
            display,
            cycle_debt: 0,
        }
    }

    /// Runs until the host requests quit. Propagates a `Decode` error if
    /// the CPU fetches an opcode outside the 151 recognized instructions.
    pub fn run(&mut self) -> Result<(), Error> {
        loop {
            if self.run_frame()? {
                return Ok(());
            }
        }
    }

    /// Runs one 262-scanline frame. Returns `true` if the host requested
    /// quit during this frame.
    fn run_frame(&mut self) -> Result<bool, Error> {
        let mut quit = false;
        let mut n = FIRST_SCANLINE;
        while n <= LAST_SCANLINE {
            self.run_scanline(n)?;
            n += 1;
        }
        self.display.present();
        if let Some(Quit::UserRequested) = self.display.poll() {
            quit = true;
        }
        Ok(quit)
    }

    fn run_scanline(&mut self, n: i16) -> Result<(), Error> {
        let scanline_start = self.display.now_us();

        let budget = CYCLES_PER_SCANLINE - self.cycle_debt;
        let mut executed = 0i32;
        while executed < budget {
            executed += self.cpu.step(&mut self.bus)? as i32;
        }
        self.cycle_debt = executed - budget;

        let nmi_requested = self.bus.ppu.scanline(&mut self.display, n);
        if nmi_requested {
            self.cpu.interrupt(&mut self.bus, NMI_VECTOR, false);
        }

        self.pace(scanline_start);
        Ok(())
    }

    /// Waits out whatever remains of this scanline's 64us wall-clock
    /// budget: sleep for the bulk of it, then spin the last slice.
    fn pace(&self, scanline_start: u64) {
        loop {
            let elapsed = self.display.now_us().saturating_sub(scanline_start);
            if elapsed >= SCANLINE_BUDGET_US {
                return;
            }
            let remaining = SCANLINE_BUDGET_US - elapsed;
            if remaining > SPIN_TAIL_US {
                self.display.sleep_us(remaining - SPIN_TAIL_US);
            } else {
                std::thread::yield_now();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nes::rom::Mirroring;
    use std::cell::{Cell, RefCell};

    /// A deterministic host stub: clock advances only when asked, never
    /// sleeps for real, and quits after a fixed number of polls.
    struct FakeHost {
        clock_us: Cell<u64>,
        polls_until_quit: Cell<u32>,
        pixels: RefCell<Vec<(u16, u16, u32)>>,
    }

    impl DisplaySink for FakeHost {
        fn pixel(&mut self, x: u16, y: u16, rgb: u32) {
            self.pixels.borrow_mut().push((x, y, rgb));
        }
        fn present(&mut self) {}
    }

    impl Clock for FakeHost {
        fn now_us(&self) -> u64 {
            let t = self.clock_us.get();
            self.clock_us.set(t + SCANLINE_BUDGET_US);
            t
        }
        fn sleep_us(&self, _us: u64) {}
    }

    impl EventPoll for FakeHost {
        fn poll(&mut self) -> Option<Quit> {
            let remaining = self.polls_until_quit.get();
            if remaining == 0 {
                Some(Quit::UserRequested)
            } else {
                self.polls_until_quit.set(remaining - 1);
                None
            }
        }
    }

    fn cart() -> Cartridge {
        let mut prg = vec![0xEAu8; 0x4000]; // NOP sled
        prg[0x3FFC] = 0x00;
        prg[0x3FFD] = 0x80; // reset vector -> 0x8000
        Cartridge::for_tests(prg, vec![0u8; 0x2000], Mirroring::Horizontal)
    }

    #[test]
    fn runs_until_host_quits() {
        let cart = cart();
        let host = FakeHost {
            clock_us: Cell::new(0),
            polls_until_quit: Cell::new(2),
            pixels: RefCell::new(Vec::new()),
        };
        let mut emu = Emulator::new(&cart, host);
        emu.run().unwrap();
    }

    #[test]
    fn nmi_fires_on_postrender_transition_when_enabled() {
        let cart = cart();
        let host = FakeHost {
            clock_us: Cell::new(0),
            polls_until_quit: Cell::new(0),
            pixels: RefCell::new(Vec::new()),
        };
        let mut emu = Emulator::new(&cart, host);
        emu.bus.write(0x2000, 0x80); // PPUCTRL NMI-enable
        emu.run_frame().unwrap();
        // PC should point at the NMI vector target; the NOP sled's reset
        // vector and NMI vector both resolve to zeroed PRG (0x0000) since
        // only the reset vector bytes were patched, so a non-zero PC
        // confirms the interrupt actually redirected execution.
        assert_ne!(emu.cpu.regs.pc, 0);
    }
}
