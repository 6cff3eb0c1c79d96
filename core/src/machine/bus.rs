//! System bus: the single owner of all memory arrays and devices.
//!
//! One 64 KiB address space routed to the cartridge mapper, VRAM, WRAM,
//! OAM, HRAM, and the I/O register file. Register side effects (DIV
//! clear, OAM DMA, APU/PPU routing, CGB bank/speed/DMA ports) live in
//! the write dispatcher here; the CPU, PPU, and APU never hold
//! references to each other.

use crate::core::{Bus, BusMaster, Interrupt, InterruptLine};
use crate::device::{Apu, Cartridge, Joypad, Ppu, Timer};
use crate::device::joypad::Button;
use crate::core::Component;

pub struct SystemBus {
    pub cartridge: Cartridge,
    cgb: bool,

    /// 8 banks of 4 KiB; DMG uses banks 0 and 1 only.
    wram: Box<[u8; 0x8000]>,
    /// CGB WRAM bank select for 0xD000–0xDFFF (0 reads as 1).
    svbk: u8,
    hram: [u8; 0x7F],

    pub ppu: Ppu,
    pub apu: Apu,
    pub timer: Timer,
    pub joypad: Joypad,

    intf: InterruptLine,
    ie: u8,

    /// Last value written to the OAM DMA register (0xFF46).
    dma: u8,
    /// T-cycles owed to the CPU for DMA transfers, drained by the frame loop.
    stall_cycles: u32,

    // Serial port registers (link transfer itself is not emulated)
    serial_data: u8,
    serial_ctrl: u8,

    // CGB speed switch (KEY1)
    key1_armed: bool,
    double_speed: bool,

    // CGB VRAM DMA (HDMA1–5)
    hdma_src: u16,
    hdma_dst: u16,
    hdma_remaining: u8,
    hdma_active: bool,
}

impl SystemBus {
    pub fn new(cartridge: Cartridge, cgb: bool) -> Self {
        Self {
            cartridge,
            cgb,
            wram: Box::new([0; 0x8000]),
            svbk: 1,
            hram: [0; 0x7F],
            ppu: Ppu::new(cgb),
            apu: Apu::new(),
            timer: Timer::new(),
            joypad: Joypad::new(),
            intf: InterruptLine::new(),
            ie: 0,
            dma: 0,
            stall_cycles: 0,
            serial_data: 0,
            serial_ctrl: 0,
            key1_armed: false,
            double_speed: false,
            hdma_src: 0,
            hdma_dst: 0,
            hdma_remaining: 0xFF,
            hdma_active: false,
        }
    }

    pub fn is_cgb(&self) -> bool {
        self.cgb
    }

    pub fn double_speed(&self) -> bool {
        self.double_speed
    }

    pub fn interrupt_flags(&self) -> u8 {
        self.intf.bits()
    }

    pub fn request_interrupt(&mut self, int: Interrupt) {
        self.intf.request(int);
    }

    /// T-cycles accrued by DMA since the last call; the frame loop
    /// charges them to the CPU.
    pub fn take_stall_cycles(&mut self) -> u32 {
        std::mem::take(&mut self.stall_cycles)
    }

    pub fn press(&mut self, button: Button, pressed: bool) {
        self.joypad.set_button(button, pressed, &mut self.intf);
    }

    /// Advance the devices after one CPU instruction. `cpu_cycles` is in
    /// the CPU clock domain; in CGB double-speed mode the PPU and APU run
    /// at half that rate (the dot clock never changes).
    pub fn tick(&mut self, cpu_cycles: u32) {
        self.timer.advance(cpu_cycles, &mut self.intf);

        let dots = if self.double_speed { cpu_cycles / 2 } else { cpu_cycles };
        self.ppu.advance(dots, &mut self.intf);
        self.apu.advance(dots, &mut self.intf);

        // HBlank-paced VRAM DMA moves one 16-byte block per HBlank.
        let hblanks = self.ppu.take_hblank_events();
        if self.hdma_active {
            for _ in 0..hblanks {
                self.hdma_block();
                if !self.hdma_active {
                    break;
                }
            }
        }
    }

    fn wram_bank(&self) -> usize {
        if self.cgb {
            let bank = (self.svbk & 0x07) as usize;
            if bank == 0 { 1 } else { bank }
        } else {
            1
        }
    }

    /// OAM DMA: copy 160 bytes from `src << 8` into OAM atomically.
    /// Costs 160 T-cycles, charged to the CPU via the stall counter.
    fn dma_oam(&mut self, src: u8) {
        let base = (src as u16) << 8;
        for i in 0..0xA0u16 {
            let byte = self.read(BusMaster::Dma, base.wrapping_add(i));
            self.ppu.write_oam_raw(i as u8, byte);
        }
        self.stall_cycles += 160;
    }

    /// Copy one 16-byte HDMA block and advance the source/destination.
    fn hdma_block(&mut self) {
        for _ in 0..0x10 {
            let byte = self.read(BusMaster::Dma, self.hdma_src);
            self.ppu.write_vram(0x8000 | (self.hdma_dst & 0x1FFF), byte);
            self.hdma_src = self.hdma_src.wrapping_add(1);
            self.hdma_dst = self.hdma_dst.wrapping_add(1);
        }
        if self.hdma_remaining == 0 {
            self.hdma_remaining = 0xFF;
            self.hdma_active = false;
        } else {
            self.hdma_remaining -= 1;
        }
    }

    /// HDMA5 write: bit 7 selects HBlank pacing; clear starts an
    /// immediate general-purpose copy of the whole span.
    fn start_vram_dma(&mut self, value: u8) {
        if self.hdma_active && value & 0x80 == 0 {
            // Writing with bit 7 clear cancels an in-flight HBlank DMA.
            self.hdma_active = false;
            self.hdma_remaining = 0xFF;
            return;
        }

        self.hdma_remaining = value & 0x7F;
        if value & 0x80 != 0 {
            self.hdma_active = true;
        } else {
            let blocks = (value & 0x7F) as u32 + 1;
            for _ in 0..blocks {
                self.hdma_block();
            }
            self.hdma_remaining = 0xFF;
        }
    }

    fn read_io(&mut self, addr: u16) -> u8 {
        match addr {
            0xFF00 => self.joypad.read(),
            0xFF01 => self.serial_data,
            0xFF02 => self.serial_ctrl | 0x7E,
            0xFF04..=0xFF07 => self.timer.read(addr),
            0xFF0F => self.intf.bits() | 0xE0,
            0xFF10..=0xFF3F => self.apu.read(addr),
            0xFF46 => self.dma,
            0xFF40..=0xFF4B => self.ppu.read_register(addr),
            0xFF4D if self.cgb => {
                0x7E | if self.double_speed { 0x80 } else { 0 }
                    | if self.key1_armed { 0x01 } else { 0 }
            }
            0xFF4F if self.cgb => self.ppu.read_register(addr),
            0xFF55 if self.cgb => {
                self.hdma_remaining | if self.hdma_active { 0 } else { 0x80 }
            }
            0xFF68..=0xFF6B if self.cgb => self.ppu.read_register(addr),
            0xFF70 if self.cgb => 0xF8 | self.svbk,
            _ => 0xFF,
        }
    }

    fn write_io(&mut self, addr: u16, data: u8) {
        match addr {
            0xFF00 => self.joypad.write(data),
            0xFF01 => self.serial_data = data,
            0xFF02 => self.serial_ctrl = data,
            0xFF04..=0xFF07 => self.timer.write(addr, data),
            0xFF0F => self.intf.set_bits(data),
            0xFF10..=0xFF3F => self.apu.write(addr, data),
            0xFF46 => {
                self.dma = data;
                self.dma_oam(data);
            }
            0xFF40..=0xFF4B => self.ppu.write_register(addr, data, &mut self.intf),
            0xFF4D if self.cgb => self.key1_armed = data & 0x01 != 0,
            0xFF4F if self.cgb => self.ppu.write_register(addr, data, &mut self.intf),
            0xFF51 if self.cgb => self.hdma_src = (self.hdma_src & 0x00FF) | ((data as u16) << 8),
            0xFF52 if self.cgb => self.hdma_src = (self.hdma_src & 0xFF00) | (data & 0xF0) as u16,
            0xFF53 if self.cgb => {
                self.hdma_dst = (self.hdma_dst & 0x00FF) | (((data & 0x1F) as u16) << 8)
            }
            0xFF54 if self.cgb => self.hdma_dst = (self.hdma_dst & 0xFF00) | (data & 0xF0) as u16,
            0xFF55 if self.cgb => self.start_vram_dma(data),
            0xFF68..=0xFF6B if self.cgb => self.ppu.write_register(addr, data, &mut self.intf),
            0xFF70 if self.cgb => self.svbk = data & 0x07,
            _ => {}
        }
    }

    pub fn reset(&mut self) {
        self.cartridge.reset_mapper();
        self.wram.fill(0);
        self.svbk = 1;
        self.hram = [0; 0x7F];
        self.ppu.reset();
        self.apu.reset();
        self.timer.reset();
        self.joypad.reset();
        self.intf = InterruptLine::new();
        self.ie = 0;
        self.dma = 0;
        self.stall_cycles = 0;
        self.serial_data = 0;
        self.serial_ctrl = 0;
        self.key1_armed = false;
        self.double_speed = false;
        self.hdma_src = 0;
        self.hdma_dst = 0;
        self.hdma_remaining = 0xFF;
        self.hdma_active = false;
    }
}

impl Bus for SystemBus {
    fn read(&mut self, master: BusMaster, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF => self.cartridge.read_rom(addr),
            0x8000..=0x9FFF => self.ppu.read_vram(addr),
            0xA000..=0xBFFF => self.cartridge.read_ram(addr),
            0xC000..=0xCFFF => self.wram[(addr - 0xC000) as usize],
            0xD000..=0xDFFF => {
                self.wram[self.wram_bank() * 0x1000 + (addr - 0xD000) as usize]
            }
            // Echo RAM forwards to 0xC000–0xDDFF
            0xE000..=0xFDFF => self.read(master, addr - 0x2000),
            0xFE00..=0xFE9F => self.ppu.read_oam(addr),
            0xFEA0..=0xFEFF => {
                log::trace!("read from prohibited region {addr:#06X}");
                0xFF
            }
            0xFF00..=0xFF7F => self.read_io(addr),
            0xFF80..=0xFFFE => self.hram[(addr - 0xFF80) as usize],
            0xFFFF => self.ie,
        }
    }

    fn write(&mut self, master: BusMaster, addr: u16, data: u8) {
        match addr {
            // ROM range: mapper registers only, never the ROM bytes
            0x0000..=0x7FFF => self.cartridge.write_registers(addr, data),
            0x8000..=0x9FFF => self.ppu.write_vram(addr, data),
            0xA000..=0xBFFF => self.cartridge.write_ram(addr, data),
            0xC000..=0xCFFF => self.wram[(addr - 0xC000) as usize] = data,
            0xD000..=0xDFFF => {
                self.wram[self.wram_bank() * 0x1000 + (addr - 0xD000) as usize] = data
            }
            0xE000..=0xFDFF => self.write(master, addr - 0x2000, data),
            0xFE00..=0xFE9F => self.ppu.write_oam(addr, data),
            0xFEA0..=0xFEFF => {
                log::trace!("write to prohibited region {addr:#06X}");
            }
            0xFF00..=0xFF7F => self.write_io(addr, data),
            0xFF80..=0xFFFE => self.hram[(addr - 0xFF80) as usize] = data,
            0xFFFF => self.ie = data,
        }
    }

    fn pending_interrupts(&self) -> u8 {
        self.ie & self.intf.bits() & 0x1F
    }

    fn acknowledge(&mut self, int: Interrupt) {
        self.intf.clear(int);
    }

    fn perform_speed_switch(&mut self) -> bool {
        if self.cgb && self.key1_armed {
            self.double_speed = !self.double_speed;
            self.key1_armed = false;
            true
        } else {
            false
        }
    }
}
