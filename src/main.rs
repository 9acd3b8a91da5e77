//! CLI entry point: a single positional ROM-path argument, wired to the
//! Piston display/clock/event adapter and the frame scheduler.

use nes_emu_core::nes::display::window::PistonDisplay;
use nes_emu_core::nes::rom::Cartridge;
use nes_emu_core::nes::util::{err_exit, Error};
use nes_emu_core::Emulator;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("usage: nes-emu-core <path-to-rom.nes>");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(&path) {
        err_exit(&err.to_string());
    }
}

fn run(path: &str) -> Result<(), Error> {
    let cart = Cartridge::load_from_file(path)?;
    log::info!("loaded {} ({:?} mirroring)", path, cart.mirroring());

    let display = PistonDisplay::new("nes-emu-core").map_err(|msg| Error::host(msg))?;

    let mut emulator = Emulator::new(&cart, display);
    emulator.run()?;

    log::info!("shutting down");
    Ok(())
}
