use olivine_core::core::{Component, bus::InterruptLine};
use olivine_core::device::Apu;

fn fresh() -> (Apu, InterruptLine) {
    (Apu::new(), InterruptLine::new())
}

#[test]
fn trigger_raises_channel_status() {
    let (mut apu, _) = fresh();
    apu.write(0xFF12, 0xF0); // full volume, envelope off
    apu.write(0xFF14, 0x80); // trigger

    assert_eq!(apu.read(0xFF26) & 0x01, 0x01);
}

#[test]
fn trigger_with_dac_off_stays_silent() {
    let (mut apu, _) = fresh();
    apu.write(0xFF12, 0x00); // volume 0, decreasing: DAC off
    apu.write(0xFF14, 0x80);

    assert_eq!(apu.read(0xFF26) & 0x01, 0x00);
}

#[test]
fn length_counter_disables_channel_on_first_step() {
    let (mut apu, mut irq) = fresh();
    apu.write(0xFF11, 0x3F); // length load 63 → counter = 1
    apu.write(0xFF12, 0xF0);
    apu.write(0xFF14, 0xC0); // trigger + length enable

    assert_eq!(apu.read(0xFF26) & 0x01, 0x01);

    // One frame-sequencer period reaches step 0, a length step
    apu.advance(8192, &mut irq);

    assert_eq!(apu.read(0xFF26) & 0x01, 0x00);
}

#[test]
fn length_counter_idle_without_enable_bit() {
    let (mut apu, mut irq) = fresh();
    apu.write(0xFF11, 0x3F);
    apu.write(0xFF12, 0xF0);
    apu.write(0xFF14, 0x80); // trigger, length DISABLED

    apu.advance(8192 * 8, &mut irq);

    assert_eq!(apu.read(0xFF26) & 0x01, 0x01);
}

#[test]
fn sweep_overflow_disables_channel() {
    let (mut apu, mut irq) = fresh();
    // Period 1, add mode, shift 1, starting frequency 0x400:
    // 0x400 → 0x600 on the first sweep tick, then 0x900 overflows.
    apu.write(0xFF10, 0x11);
    apu.write(0xFF12, 0xF0);
    apu.write(0xFF13, 0x00);
    apu.write(0xFF14, 0x84); // trigger, frequency high bits = 4

    // Sweep ticks land on sequencer steps 2 and 6
    apu.advance(8192 * 3, &mut irq);
    assert_eq!(apu.read(0xFF26) & 0x01, 0x01);

    apu.advance(8192 * 4, &mut irq);
    assert_eq!(apu.read(0xFF26) & 0x01, 0x00);
}

#[test]
fn wave_channel_needs_dac() {
    let (mut apu, _) = fresh();
    apu.write(0xFF1E, 0x80); // trigger with DAC off
    assert_eq!(apu.read(0xFF26) & 0x04, 0x00);

    apu.write(0xFF1A, 0x80); // DAC on
    apu.write(0xFF1E, 0x80);
    assert_eq!(apu.read(0xFF26) & 0x04, 0x04);
}

#[test]
fn wave_ram_round_trips() {
    let (mut apu, _) = fresh();
    for i in 0..16u16 {
        apu.write(0xFF30 + i, (i as u8) << 4 | 0x0A);
    }
    for i in 0..16u16 {
        assert_eq!(apu.read(0xFF30 + i), (i as u8) << 4 | 0x0A);
    }
}

#[test]
fn power_off_clears_registers_but_keeps_wave_ram() {
    let (mut apu, _) = fresh();
    apu.write(0xFF30, 0xAB);
    apu.write(0xFF12, 0xF0);
    apu.write(0xFF14, 0x80);
    apu.write(0xFF25, 0xFF);

    apu.write(0xFF26, 0x00); // power off

    assert_eq!(apu.read(0xFF26), 0x70);
    assert_eq!(apu.read(0xFF25), 0x00);
    assert_eq!(apu.read(0xFF30), 0xAB);

    // Writes are ignored while off
    apu.write(0xFF25, 0x12);
    assert_eq!(apu.read(0xFF25), 0x00);

    apu.write(0xFF26, 0x80);
    assert_eq!(apu.read(0xFF26) & 0x80, 0x80);
}

#[test]
fn unreadable_bits_come_back_set() {
    let (mut apu, _) = fresh();
    apu.write(0xFF13, 0x55); // NR13 is write-only
    assert_eq!(apu.read(0xFF13), 0xFF);

    apu.write(0xFF11, 0x80); // only the duty bits read back
    assert_eq!(apu.read(0xFF11), 0xBF);
}

#[test]
fn mixer_produces_host_rate_samples() {
    let (mut apu, mut irq) = fresh();
    // One frame of cycles at 4.19 MHz → ~700 stereo pairs at 44.1 kHz
    apu.advance(70_224, &mut irq);

    let mut buffer = [0.0f32; 4096];
    let n = apu.fill_audio(&mut buffer);

    assert_eq!(n % 2, 0);
    let expected = 2 * (70_224u64 * 44_100 / 4_194_304);
    assert!((n as i64 - expected as i64).abs() <= 2, "{n} vs {expected}");
    assert!(buffer[..n].iter().all(|s| (-1.0..=1.0).contains(s)));
}

#[test]
fn fill_audio_empty_ring_yields_zero() {
    let (mut apu, _) = fresh();
    let mut buffer = [0.0f32; 64];
    assert_eq!(apu.fill_audio(&mut buffer), 0);
}
