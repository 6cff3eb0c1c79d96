use olivine_core::cpu::sm83::Sm83;
mod common;
use common::TestBus;

fn fresh() -> (Sm83, TestBus) {
    let mut cpu = Sm83::new();
    cpu.pc = 0;
    cpu.f = 0;
    (cpu, TestBus::new())
}

#[test]
fn rlca_rotates_into_carry_and_clears_z() {
    let (mut cpu, mut bus) = fresh();
    cpu.a = 0x80;
    // RLCA
    bus.load(0, &[0x07]);

    let cycles = cpu.step(&mut bus);

    assert_eq!(cpu.a, 0x01);
    assert_eq!(cpu.f, 0x10); // C set, Z cleared despite no special result
    assert_eq!(cycles, 4);
}

#[test]
fn rla_shifts_carry_in() {
    let (mut cpu, mut bus) = fresh();
    cpu.a = 0x00;
    cpu.f = 0x10;
    // RLA
    bus.load(0, &[0x17]);

    cpu.step(&mut bus);

    assert_eq!(cpu.a, 0x01);
    assert_eq!(cpu.f, 0x00);
}

#[test]
fn rra_zero_result_still_clears_z() {
    let (mut cpu, mut bus) = fresh();
    cpu.a = 0x01;
    // RRA — result 0, carry out set, Z must stay clear
    bus.load(0, &[0x1F]);

    cpu.step(&mut bus);

    assert_eq!(cpu.a, 0x00);
    assert_eq!(cpu.f, 0x10);
}

#[test]
fn cb_rlc_sets_z_on_zero() {
    let (mut cpu, mut bus) = fresh();
    cpu.b = 0x00;
    // RLC B
    bus.load(0, &[0xCB, 0x00]);

    let cycles = cpu.step(&mut bus);

    assert_eq!(cpu.b, 0x00);
    assert_eq!(cpu.f, 0x80);
    assert_eq!(cycles, 8);
}

#[test]
fn cb_rr_through_carry() {
    let (mut cpu, mut bus) = fresh();
    cpu.c = 0x02;
    cpu.f = 0x10;
    // RR C
    bus.load(0, &[0xCB, 0x19]);

    cpu.step(&mut bus);

    assert_eq!(cpu.c, 0x81);
    assert_eq!(cpu.f, 0x00);
}

#[test]
fn cb_sla_srl() {
    let (mut cpu, mut bus) = fresh();
    cpu.d = 0x81;
    // SLA D; SRL D
    bus.load(0, &[0xCB, 0x22, 0xCB, 0x3A]);

    cpu.step(&mut bus);
    assert_eq!(cpu.d, 0x02);
    assert_eq!(cpu.f, 0x10);

    cpu.step(&mut bus);
    assert_eq!(cpu.d, 0x01);
    assert_eq!(cpu.f, 0x00);
}

#[test]
fn cb_sra_preserves_sign_bit() {
    let (mut cpu, mut bus) = fresh();
    cpu.e = 0x81;
    // SRA E
    bus.load(0, &[0xCB, 0x2B]);

    cpu.step(&mut bus);

    assert_eq!(cpu.e, 0xC0);
    assert_eq!(cpu.f, 0x10);
}

#[test]
fn cb_swap_exchanges_nibbles() {
    let (mut cpu, mut bus) = fresh();
    cpu.a = 0xF1;
    // SWAP A
    bus.load(0, &[0xCB, 0x37]);

    cpu.step(&mut bus);

    assert_eq!(cpu.a, 0x1F);
    assert_eq!(cpu.f, 0x00);
}

#[test]
fn bit_test_sets_z_h_preserves_c() {
    let (mut cpu, mut bus) = fresh();
    cpu.h = 0x7F;
    cpu.f = 0x10;
    // BIT 7, H
    bus.load(0, &[0xCB, 0x7C]);

    let cycles = cpu.step(&mut bus);

    assert_eq!(cpu.f, 0xB0); // Z (bit clear), H, C preserved
    assert_eq!(cycles, 8);
}

#[test]
fn res_set_roundtrip_without_flags() {
    let (mut cpu, mut bus) = fresh();
    cpu.l = 0xFF;
    cpu.f = 0x90;
    // RES 3, L; SET 3, L
    bus.load(0, &[0xCB, 0x9D, 0xCB, 0xDD]);

    cpu.step(&mut bus);
    assert_eq!(cpu.l, 0xF7);
    assert_eq!(cpu.f, 0x90);

    cpu.step(&mut bus);
    assert_eq!(cpu.l, 0xFF);
    assert_eq!(cpu.f, 0x90);
}

#[test]
fn cb_hl_operand_cycle_counts() {
    let (mut cpu, mut bus) = fresh();
    cpu.set_hl(0x8000);
    bus.memory[0x8000] = 0x01;
    // SRL (HL); BIT 0, (HL)
    bus.load(0, &[0xCB, 0x3E, 0xCB, 0x46]);

    let cycles = cpu.step(&mut bus);
    assert_eq!(bus.memory[0x8000], 0x00);
    assert_eq!(cycles, 16);

    let cycles = cpu.step(&mut bus);
    assert_eq!(cycles, 12);
    assert_eq!(cpu.f & 0x80, 0x80);
}
