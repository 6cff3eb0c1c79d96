use crate::core::{Bus, BusMaster};
use crate::cpu::sm83::Sm83;

impl Sm83 {
    /// LD r, r' — 4 T (8 when either side is (HL))
    pub(crate) fn op_ld_r_r<B: Bus + ?Sized>(&mut self, opcode: u8, bus: &mut B) -> u32 {
        let dst = (opcode >> 3) & 0x07;
        let src = opcode & 0x07;
        let val = self.read_r8(src, bus);
        self.write_r8(dst, val, bus);
        if dst == 6 || src == 6 { 8 } else { 4 }
    }

    /// LD r, n — 8 T (12 for (HL))
    pub(crate) fn op_ld_r_n<B: Bus + ?Sized>(&mut self, opcode: u8, bus: &mut B) -> u32 {
        let dst = (opcode >> 3) & 0x07;
        let val = self.fetch8(bus);
        self.write_r8(dst, val, bus);
        if dst == 6 { 12 } else { 8 }
    }

    /// LD rr, nn — 12 T
    pub(crate) fn op_ld_rp_nn<B: Bus + ?Sized>(&mut self, opcode: u8, bus: &mut B) -> u32 {
        let val = self.fetch16(bus);
        self.set_rp((opcode >> 4) & 0x03, val);
        12
    }

    /// The 0x02/0x0A column: LD (BC)/(DE)/(HL+)/(HL-), A and the A-loading
    /// mirrors. HL+ and HL- post-increment/-decrement HL. 8 T.
    pub(crate) fn op_ld_indirect<B: Bus + ?Sized>(&mut self, opcode: u8, bus: &mut B) -> u32 {
        let p = (opcode >> 4) & 0x03;
        let addr = match p {
            0 => self.get_bc(),
            1 => self.get_de(),
            _ => self.get_hl(),
        };

        if opcode & 0x08 == 0 {
            bus.write(BusMaster::Cpu, addr, self.a);
        } else {
            self.a = bus.read(BusMaster::Cpu, addr);
        }

        match p {
            2 => self.set_hl(addr.wrapping_add(1)),
            3 => self.set_hl(addr.wrapping_sub(1)),
            _ => {}
        }
        8
    }

    /// LD (nn), SP — 20 T, little-endian store
    pub(crate) fn op_ld_nn_sp<B: Bus + ?Sized>(&mut self, bus: &mut B) -> u32 {
        let addr = self.fetch16(bus);
        bus.write(BusMaster::Cpu, addr, self.sp as u8);
        bus.write(BusMaster::Cpu, addr.wrapping_add(1), (self.sp >> 8) as u8);
        20
    }

    /// LDH (n), A — 12 T
    pub(crate) fn op_ldh_n_a<B: Bus + ?Sized>(&mut self, bus: &mut B) -> u32 {
        let offset = self.fetch8(bus);
        bus.write(BusMaster::Cpu, 0xFF00 | offset as u16, self.a);
        12
    }

    /// LDH A, (n) — 12 T
    pub(crate) fn op_ldh_a_n<B: Bus + ?Sized>(&mut self, bus: &mut B) -> u32 {
        let offset = self.fetch8(bus);
        self.a = bus.read(BusMaster::Cpu, 0xFF00 | offset as u16);
        12
    }

    /// LD (0xFF00+C), A — 8 T
    pub(crate) fn op_ldh_c_a<B: Bus + ?Sized>(&mut self, bus: &mut B) -> u32 {
        bus.write(BusMaster::Cpu, 0xFF00 | self.c as u16, self.a);
        8
    }

    /// LD A, (0xFF00+C) — 8 T
    pub(crate) fn op_ldh_a_c<B: Bus + ?Sized>(&mut self, bus: &mut B) -> u32 {
        self.a = bus.read(BusMaster::Cpu, 0xFF00 | self.c as u16);
        8
    }

    /// LD (nn), A — 16 T
    pub(crate) fn op_ld_nn_a<B: Bus + ?Sized>(&mut self, bus: &mut B) -> u32 {
        let addr = self.fetch16(bus);
        bus.write(BusMaster::Cpu, addr, self.a);
        16
    }

    /// LD A, (nn) — 16 T
    pub(crate) fn op_ld_a_nn<B: Bus + ?Sized>(&mut self, bus: &mut B) -> u32 {
        let addr = self.fetch16(bus);
        self.a = bus.read(BusMaster::Cpu, addr);
        16
    }

    /// LD SP, HL — 8 T
    pub(crate) fn op_ld_sp_hl(&mut self) -> u32 {
        self.sp = self.get_hl();
        8
    }

    /// LD HL, SP+s8 — 12 T, flags as ADD SP,s8
    pub(crate) fn op_ld_hl_sp_d<B: Bus + ?Sized>(&mut self, bus: &mut B) -> u32 {
        let offset = self.fetch8(bus);
        let result = self.add_sp_signed(offset);
        self.set_hl(result);
        12
    }
}
