use crate::core::Bus;
use crate::cpu::sm83::{Flag, Sm83};

impl Sm83 {
    // --- Flag helpers ---

    fn do_add(&mut self, val: u8, carry_in: bool) {
        let a = self.a;
        let c_val = if carry_in && self.flag(Flag::C) { 1u8 } else { 0 };
        let result_u16 = (a as u16) + (val as u16) + (c_val as u16);
        let result = result_u16 as u8;

        let mut f = 0;
        if result == 0 { f |= Flag::Z as u8; }
        // H: bit-4 carry out of the nibble sum
        if ((a & 0xF) + (val & 0xF) + c_val) > 0xF { f |= Flag::H as u8; }
        // C: bit-8 overflow
        if result_u16 > 0xFF { f |= Flag::C as u8; }

        self.a = result;
        self.f = f;
    }

    fn do_sub(&mut self, val: u8, carry_in: bool) {
        let a = self.a;
        let c_val = if carry_in && self.flag(Flag::C) { 1u8 } else { 0 };
        let result_u16 = (a as u16)
            .wrapping_sub(val as u16)
            .wrapping_sub(c_val as u16);
        let result = result_u16 as u8;

        let mut f = Flag::N as u8;
        if result == 0 { f |= Flag::Z as u8; }
        // H: borrow out of bit 4
        if (a & 0xF) < (val & 0xF) + c_val { f |= Flag::H as u8; }
        // C: full borrow
        if result_u16 > 0xFF { f |= Flag::C as u8; }

        self.a = result;
        self.f = f;
    }

    fn do_cp(&mut self, val: u8) {
        let a = self.a;
        let result_u16 = (a as u16).wrapping_sub(val as u16);

        let mut f = Flag::N as u8;
        if result_u16 as u8 == 0 { f |= Flag::Z as u8; }
        if (a & 0xF) < (val & 0xF) { f |= Flag::H as u8; }
        if result_u16 > 0xFF { f |= Flag::C as u8; }

        self.f = f;
    }

    fn update_flags_logic(&mut self, result: u8, is_and: bool) {
        let mut f = 0;
        if result == 0 { f |= Flag::Z as u8; }
        if is_and { f |= Flag::H as u8; } // AND sets H; OR/XOR clear it
        self.f = f;
    }

    fn perform_alu_op(&mut self, op: u8, val: u8) {
        match op {
            0 => self.do_add(val, false), // ADD
            1 => self.do_add(val, true),  // ADC
            2 => self.do_sub(val, false), // SUB
            3 => self.do_sub(val, true),  // SBC
            4 => { self.a &= val; self.update_flags_logic(self.a, true); }  // AND
            5 => { self.a ^= val; self.update_flags_logic(self.a, false); } // XOR
            6 => { self.a |= val; self.update_flags_logic(self.a, false); } // OR
            7 => self.do_cp(val),         // CP
            _ => unreachable!(),
        }
    }

    // --- Instructions ---

    /// ALU A, r — ADD/ADC/SUB/SBC/AND/XOR/OR/CP, opcode mask 10 yyy zzz
    pub(crate) fn op_alu_r<B: Bus + ?Sized>(&mut self, opcode: u8, bus: &mut B) -> u32 {
        let alu_op = (opcode >> 3) & 0x07;
        let r = opcode & 0x07;
        let val = self.read_r8(r, bus);
        self.perform_alu_op(alu_op, val);
        if r == 6 { 8 } else { 4 }
    }

    /// ALU A, n — opcode mask 11 yyy 110
    pub(crate) fn op_alu_n<B: Bus + ?Sized>(&mut self, opcode: u8, bus: &mut B) -> u32 {
        let alu_op = (opcode >> 3) & 0x07;
        let val = self.fetch8(bus);
        self.perform_alu_op(alu_op, val);
        8
    }

    /// INC r — Z/H from the increment, N cleared, C untouched
    pub(crate) fn op_inc_r<B: Bus + ?Sized>(&mut self, opcode: u8, bus: &mut B) -> u32 {
        let r = (opcode >> 3) & 0x07;
        let val = self.read_r8(r, bus);
        let result = val.wrapping_add(1);
        self.write_r8(r, result, bus);

        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, (val & 0xF) == 0xF);
        if r == 6 { 12 } else { 4 }
    }

    /// DEC r — Z/H from the decrement, N set, C untouched
    pub(crate) fn op_dec_r<B: Bus + ?Sized>(&mut self, opcode: u8, bus: &mut B) -> u32 {
        let r = (opcode >> 3) & 0x07;
        let val = self.read_r8(r, bus);
        let result = val.wrapping_sub(1);
        self.write_r8(r, result, bus);

        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::N, true);
        self.set_flag(Flag::H, (val & 0xF) == 0);
        if r == 6 { 12 } else { 4 }
    }

    /// ADD HL, rr — H from bit 11, C from bit 15, Z untouched
    pub(crate) fn op_add_hl_rp(&mut self, opcode: u8) -> u32 {
        let rr = self.get_rp((opcode >> 4) & 0x03);
        let hl = self.get_hl();
        let result = hl.wrapping_add(rr);

        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, (hl & 0x0FFF) + (rr & 0x0FFF) > 0x0FFF);
        self.set_flag(Flag::C, (hl as u32) + (rr as u32) > 0xFFFF);
        self.set_hl(result);
        8
    }

    /// INC rr — no flags
    pub(crate) fn op_inc_rp(&mut self, opcode: u8) -> u32 {
        let p = (opcode >> 4) & 0x03;
        self.set_rp(p, self.get_rp(p).wrapping_add(1));
        8
    }

    /// DEC rr — no flags
    pub(crate) fn op_dec_rp(&mut self, opcode: u8) -> u32 {
        let p = (opcode >> 4) & 0x03;
        self.set_rp(p, self.get_rp(p).wrapping_sub(1));
        8
    }

    /// SP + signed immediate, shared by ADD SP,s8 and LD HL,SP+s8.
    /// Z and N clear; H and C from the unsigned low-byte addition.
    pub(crate) fn add_sp_signed(&mut self, offset: u8) -> u16 {
        let sp = self.sp;
        let d = offset as i8 as i16 as u16;
        let result = sp.wrapping_add(d);

        let mut f = 0;
        if (sp & 0x0F) + (d & 0x0F) > 0x0F { f |= Flag::H as u8; }
        if (sp & 0xFF) + (d & 0xFF) > 0xFF { f |= Flag::C as u8; }
        self.f = f;
        result
    }

    /// ADD SP, s8 — 16 T
    pub(crate) fn op_add_sp_d<B: Bus + ?Sized>(&mut self, bus: &mut B) -> u32 {
        let offset = self.fetch8(bus);
        self.sp = self.add_sp_signed(offset);
        16
    }

    /// DAA — BCD adjustment after ADD/SUB, driven by N/H/C
    pub(crate) fn op_daa(&mut self) -> u32 {
        let mut a = self.a;
        let mut carry = self.flag(Flag::C);

        if !self.flag(Flag::N) {
            if carry || a > 0x99 {
                a = a.wrapping_add(0x60);
                carry = true;
            }
            if self.flag(Flag::H) || (a & 0x0F) > 0x09 {
                a = a.wrapping_add(0x06);
            }
        } else {
            if carry {
                a = a.wrapping_sub(0x60);
            }
            if self.flag(Flag::H) {
                a = a.wrapping_sub(0x06);
            }
        }

        self.a = a;
        self.set_flag(Flag::Z, a == 0);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, carry);
        4
    }

    /// CPL — complement A; N and H set
    pub(crate) fn op_cpl(&mut self) -> u32 {
        self.a = !self.a;
        self.set_flag(Flag::N, true);
        self.set_flag(Flag::H, true);
        4
    }

    /// SCF — set carry; N and H cleared
    pub(crate) fn op_scf(&mut self) -> u32 {
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, true);
        4
    }

    /// CCF — complement carry; N and H cleared
    pub(crate) fn op_ccf(&mut self) -> u32 {
        let c = self.flag(Flag::C);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, !c);
        4
    }
}
