//! The assembled DMG/CGB machine: one CPU plus the system bus.

use crate::core::machine::{InputButton, Machine};
use crate::cpu::{Cpu, Sm83};
use crate::device::joypad::{self, Button};
use crate::device::Cartridge;
use crate::machine::SystemBus;
use crate::{CPU_CLOCK_HZ, CYCLES_PER_FRAME, LCD_HEIGHT, LCD_WIDTH};

/// DMG / CGB handheld (Nintendo, 1989 / 1998)
///
/// Hardware: Sharp LR35902 @ 4.194 MHz (8.388 MHz in CGB double speed),
/// 160×144 LCD driven by a scanline PPU, four-channel PSG.
/// The frame loop pulls one instruction at a time from the CPU and
/// advances the PPU/APU/timer by the returned cycle count; 70 224 dots
/// make one frame at 59.73 Hz.
pub struct GameBoy {
    cpu: Sm83,
    bus: SystemBus,
    /// Dot-clock cycles into the current frame; carries the overshoot of
    /// the last instruction across frame boundaries.
    frame_cycles: u32,
}

impl GameBoy {
    /// Build a machine for the cartridge, honoring its CGB flag.
    pub fn new(cartridge: Cartridge) -> Self {
        let cgb = cartridge.is_cgb();
        Self::with_model(cartridge, cgb)
    }

    /// Build a machine with an explicit hardware model (`cgb` false
    /// forces DMG behavior regardless of the cartridge flag).
    pub fn with_model(cartridge: Cartridge, cgb: bool) -> Self {
        Self {
            cpu: Sm83::new(),
            bus: SystemBus::new(cartridge, cgb),
            frame_cycles: 0,
        }
    }

    pub fn cpu(&self) -> &Sm83 {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Sm83 {
        &mut self.cpu
    }

    pub fn bus(&self) -> &SystemBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut SystemBus {
        &mut self.bus
    }

    /// Execute one instruction and advance the devices by its cost.
    /// Returns the T-cycles consumed, including any DMA stall.
    pub fn step(&mut self) -> u32 {
        let cycles = self.cpu.step(&mut self.bus) + self.bus.take_stall_cycles();
        self.bus.tick(cycles);
        cycles
    }
}

impl Machine for GameBoy {
    fn display_size(&self) -> (u32, u32) {
        (LCD_WIDTH as u32, LCD_HEIGHT as u32)
    }

    fn run_frame(&mut self) {
        while self.frame_cycles < CYCLES_PER_FRAME {
            let cycles = self.step();
            // The frame is measured on the dot clock, which double-speed
            // mode does not change.
            let dots = if self.bus.double_speed() { cycles / 2 } else { cycles };
            self.frame_cycles += dots;
        }
        self.frame_cycles -= CYCLES_PER_FRAME;
    }

    fn render_frame(&self, buffer: &mut [u8]) {
        self.bus.ppu.copy_frame(buffer);
    }

    fn set_input(&mut self, button: u8, pressed: bool) {
        if let Some(button) = Button::from_id(button) {
            self.bus.press(button, pressed);
        }
    }

    fn input_map(&self) -> &[InputButton] {
        joypad::INPUT_MAP
    }

    fn reset(&mut self) {
        self.cpu.reset();
        self.bus.reset();
        self.frame_cycles = 0;
    }

    fn save_nvram(&self) -> Option<&[u8]> {
        self.bus.cartridge.battery_ram()
    }

    fn load_nvram(&mut self, data: &[u8]) {
        self.bus.cartridge.load_battery_ram(data);
    }

    fn fill_audio(&mut self, buffer: &mut [f32]) -> usize {
        self.bus.apu.fill_audio(buffer)
    }

    fn audio_sample_rate(&self) -> u32 {
        self.bus.apu.sample_rate()
    }

    fn frame_rate_hz(&self) -> f64 {
        CPU_CLOCK_HZ as f64 / CYCLES_PER_FRAME as f64
    }
}
