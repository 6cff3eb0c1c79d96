use crate::core::Bus;
use crate::cpu::sm83::{Flag, ImeState, Sm83};

impl Sm83 {
    /// Condition table {NZ, Z, NC, C} indexed by opcode bits 4:3.
    fn condition(&self, index: u8) -> bool {
        match index {
            0 => !self.flag(Flag::Z),
            1 => self.flag(Flag::Z),
            2 => !self.flag(Flag::C),
            3 => self.flag(Flag::C),
            _ => unreachable!("condition called with index {}", index),
        }
    }

    /// JR e — 12 T
    pub(crate) fn op_jr<B: Bus + ?Sized>(&mut self, bus: &mut B) -> u32 {
        let offset = self.fetch8(bus) as i8;
        self.pc = self.pc.wrapping_add(offset as i16 as u16);
        12
    }

    /// JR cc, e — 12 T taken, 8 T not taken
    pub(crate) fn op_jr_cc<B: Bus + ?Sized>(&mut self, opcode: u8, bus: &mut B) -> u32 {
        let offset = self.fetch8(bus) as i8;
        if self.condition((opcode >> 3) & 0x03) {
            self.pc = self.pc.wrapping_add(offset as i16 as u16);
            12
        } else {
            8
        }
    }

    /// JP nn — 16 T
    pub(crate) fn op_jp_nn<B: Bus + ?Sized>(&mut self, bus: &mut B) -> u32 {
        self.pc = self.fetch16(bus);
        16
    }

    /// JP cc, nn — 16 T taken, 12 T not taken
    pub(crate) fn op_jp_cc<B: Bus + ?Sized>(&mut self, opcode: u8, bus: &mut B) -> u32 {
        let target = self.fetch16(bus);
        if self.condition((opcode >> 3) & 0x03) {
            self.pc = target;
            16
        } else {
            12
        }
    }

    /// JP HL — 4 T
    pub(crate) fn op_jp_hl(&mut self) -> u32 {
        self.pc = self.get_hl();
        4
    }

    /// CALL nn — 24 T
    pub(crate) fn op_call_nn<B: Bus + ?Sized>(&mut self, bus: &mut B) -> u32 {
        let target = self.fetch16(bus);
        self.push16(self.pc, bus);
        self.pc = target;
        24
    }

    /// CALL cc, nn — 24 T taken, 12 T not taken
    pub(crate) fn op_call_cc<B: Bus + ?Sized>(&mut self, opcode: u8, bus: &mut B) -> u32 {
        let target = self.fetch16(bus);
        if self.condition((opcode >> 3) & 0x03) {
            self.push16(self.pc, bus);
            self.pc = target;
            24
        } else {
            12
        }
    }

    /// RET — 16 T
    pub(crate) fn op_ret<B: Bus + ?Sized>(&mut self, bus: &mut B) -> u32 {
        self.pc = self.pop16(bus);
        16
    }

    /// RETI — 16 T; IME enabled immediately, no EI deferral
    pub(crate) fn op_reti<B: Bus + ?Sized>(&mut self, bus: &mut B) -> u32 {
        self.pc = self.pop16(bus);
        self.ime = ImeState::Enabled;
        16
    }

    /// RET cc — 20 T taken, 8 T not taken
    pub(crate) fn op_ret_cc<B: Bus + ?Sized>(&mut self, opcode: u8, bus: &mut B) -> u32 {
        if self.condition((opcode >> 3) & 0x03) {
            self.pc = self.pop16(bus);
            20
        } else {
            8
        }
    }

    /// RST n — push PC, jump to y*8 — 16 T
    pub(crate) fn op_rst<B: Bus + ?Sized>(&mut self, opcode: u8, bus: &mut B) -> u32 {
        self.push16(self.pc, bus);
        self.pc = (opcode & 0x38) as u16;
        16
    }
}
