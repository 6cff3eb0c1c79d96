use crate::core::Bus;
use crate::cpu::sm83::{Flag, Sm83};

impl Sm83 {
    // --- Rotate/shift primitives (Z from result, N/H cleared, C out) ---

    fn rlc(&mut self, val: u8) -> u8 {
        let carry = val >> 7;
        let result = (val << 1) | carry;
        self.set_rot_flags(result, carry != 0);
        result
    }

    fn rrc(&mut self, val: u8) -> u8 {
        let carry = val & 1;
        let result = (val >> 1) | (carry << 7);
        self.set_rot_flags(result, carry != 0);
        result
    }

    fn rl(&mut self, val: u8) -> u8 {
        let carry_in = if self.flag(Flag::C) { 1 } else { 0 };
        let result = (val << 1) | carry_in;
        self.set_rot_flags(result, val & 0x80 != 0);
        result
    }

    fn rr(&mut self, val: u8) -> u8 {
        let carry_in = if self.flag(Flag::C) { 0x80 } else { 0 };
        let result = (val >> 1) | carry_in;
        self.set_rot_flags(result, val & 1 != 0);
        result
    }

    fn sla(&mut self, val: u8) -> u8 {
        let result = val << 1;
        self.set_rot_flags(result, val & 0x80 != 0);
        result
    }

    /// Arithmetic shift right: bit 7 is preserved.
    fn sra(&mut self, val: u8) -> u8 {
        let result = (val >> 1) | (val & 0x80);
        self.set_rot_flags(result, val & 1 != 0);
        result
    }

    fn swap(&mut self, val: u8) -> u8 {
        let result = (val >> 4) | (val << 4);
        self.set_rot_flags(result, false);
        result
    }

    fn srl(&mut self, val: u8) -> u8 {
        let result = val >> 1;
        self.set_rot_flags(result, val & 1 != 0);
        result
    }

    fn set_rot_flags(&mut self, result: u8, carry: bool) {
        let mut f = 0;
        if result == 0 { f |= Flag::Z as u8; }
        if carry { f |= Flag::C as u8; }
        self.f = f;
    }

    // --- Accumulator rotates (main table) — Z always cleared ---

    pub(crate) fn op_rlca(&mut self) -> u32 {
        self.a = self.rlc(self.a);
        self.set_flag(Flag::Z, false);
        4
    }

    pub(crate) fn op_rrca(&mut self) -> u32 {
        self.a = self.rrc(self.a);
        self.set_flag(Flag::Z, false);
        4
    }

    pub(crate) fn op_rla(&mut self) -> u32 {
        self.a = self.rl(self.a);
        self.set_flag(Flag::Z, false);
        4
    }

    pub(crate) fn op_rra(&mut self) -> u32 {
        self.a = self.rr(self.a);
        self.set_flag(Flag::Z, false);
        4
    }

    // --- CB-prefixed table ---

    /// Fetch and execute one CB-prefixed opcode.
    ///
    /// x=0: rotate/shift family on r[z]; x=1: BIT y, r[z];
    /// x=2: RES y, r[z]; x=3: SET y, r[z].
    pub(crate) fn execute_cb<B: Bus + ?Sized>(&mut self, bus: &mut B) -> u32 {
        let opcode = self.fetch8(bus);
        let y = (opcode >> 3) & 0x07;
        let z = opcode & 0x07;

        match opcode >> 6 {
            0 => {
                let val = self.read_r8(z, bus);
                let result = match y {
                    0 => self.rlc(val),
                    1 => self.rrc(val),
                    2 => self.rl(val),
                    3 => self.rr(val),
                    4 => self.sla(val),
                    5 => self.sra(val),
                    6 => self.swap(val),
                    7 => self.srl(val),
                    _ => unreachable!(),
                };
                self.write_r8(z, result, bus);
                if z == 6 { 16 } else { 8 }
            }
            1 => {
                // BIT: Z set when the tested bit is 0; C untouched
                let val = self.read_r8(z, bus);
                self.set_flag(Flag::Z, val & (1 << y) == 0);
                self.set_flag(Flag::N, false);
                self.set_flag(Flag::H, true);
                if z == 6 { 12 } else { 8 }
            }
            2 => {
                // RES: no flags
                let val = self.read_r8(z, bus);
                self.write_r8(z, val & !(1 << y), bus);
                if z == 6 { 16 } else { 8 }
            }
            3 => {
                // SET: no flags
                let val = self.read_r8(z, bus);
                self.write_r8(z, val | (1 << y), bus);
                if z == 6 { 16 } else { 8 }
            }
            _ => unreachable!(),
        }
    }
}
