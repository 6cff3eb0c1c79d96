use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use olivine_core::core::machine::Machine;
use olivine_core::device::Cartridge;
use olivine_core::machine::GameBoy;

mod audio;
mod emulator;
mod input;
mod overlay;
mod rom_path;
mod screenshot;
mod video;

/// Olivine — DMG/CGB emulator
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Cartridge image (.gb/.gbc, or a .zip containing one)
    rom: PathBuf,

    /// Integer window scale factor
    #[arg(long, default_value_t = 3)]
    scale: u32,

    /// Run CGB-flagged cartridges on the original grayscale hardware
    #[arg(long)]
    force_dmg: bool,

    /// Disable audio output
    #[arg(long)]
    mute: bool,

    /// Draw a frames-per-second counter in the corner
    #[arg(long)]
    show_fps: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let rom = match rom_path::load_rom_bytes(&args.rom) {
        Ok(rom) => rom,
        Err(e) => {
            eprintln!("Failed to read {}: {e}", args.rom.display());
            return ExitCode::FAILURE;
        }
    };

    let cartridge = match Cartridge::from_bytes_lenient(rom) {
        Ok(cartridge) => cartridge,
        Err(e) => {
            eprintln!("Not a usable cartridge image: {e}");
            return ExitCode::FAILURE;
        }
    };

    log::info!(
        "loaded \"{}\" ({:?}, CGB: {})",
        cartridge.title(),
        cartridge.kind(),
        cartridge.is_cgb()
    );

    let cgb = cartridge.is_cgb() && !args.force_dmg;
    let save_path = save_path_for(&args.rom, cartridge.global_checksum());
    let mut machine = GameBoy::with_model(cartridge, cgb);

    // Battery save from a previous run, keyed by the cartridge checksum
    if let Ok(data) = std::fs::read(&save_path) {
        machine.load_nvram(&data);
    }

    let key_map = input::load_key_map(machine.input_map());
    emulator::run(&mut machine, &key_map, args.scale, args.mute, args.show_fps);

    if let Some(data) = machine.save_nvram()
        && let Err(e) = std::fs::write(&save_path, data)
    {
        eprintln!("Warning: failed to save battery RAM: {e}");
    }

    ExitCode::SUCCESS
}

/// Battery save lives next to the ROM, keyed by the header's global
/// checksum so renamed or patched images get their own file.
fn save_path_for(rom_path: &std::path::Path, checksum: u16) -> PathBuf {
    rom_path.with_extension(format!("{checksum:04x}.sav"))
}
