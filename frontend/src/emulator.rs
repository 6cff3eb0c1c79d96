use std::time::{Duration, Instant};

use olivine_core::core::machine::Machine;
use sdl2::event::Event;
use sdl2::keyboard::Scancode;

use crate::audio::AudioOutput;
use crate::input::KeyMap;
use crate::video::Video;
use crate::{overlay, screenshot};

pub fn run(machine: &mut dyn Machine, key_map: &KeyMap, scale: u32, mute: bool, show_fps: bool) {
    let sdl_context = sdl2::init().expect("Failed to initialize SDL2");
    let sdl_video = sdl_context.video().expect("Failed to init SDL video");

    let (width, height) = machine.display_size();
    let mut video = Video::new(&sdl_video, "Olivine", width, height, scale);
    let mut event_pump = sdl_context.event_pump().expect("Failed to get event pump");

    let mut audio = if mute {
        None
    } else {
        let sdl_audio = sdl_context.audio().expect("Failed to init SDL audio");
        AudioOutput::open(&sdl_audio, machine.audio_sample_rate())
    };

    let buffer_size = (width * height * 4) as usize;
    let mut framebuffer = vec![0u8; buffer_size];
    let mut sample_buffer = vec![0.0f32; 4096];

    // VSync paces most displays to ~60 Hz; the sleep below keeps the
    // machine at its native rate when VSync free-runs or is unavailable.
    let frame_duration = Duration::from_secs_f64(1.0 / machine.frame_rate_hz());
    let mut next_frame = Instant::now();

    let mut fps_window_start = Instant::now();
    let mut fps_window_frames = 0u32;
    let mut fps = 0.0f64;

    'main: loop {
        // Poll all pending SDL events, translate to machine input
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => break 'main,

                Event::KeyDown {
                    scancode: Some(Scancode::Escape),
                    ..
                } => break 'main,

                Event::KeyDown {
                    scancode: Some(Scancode::F12),
                    ..
                } => {
                    machine.render_frame(&mut framebuffer);
                    match screenshot::save(&framebuffer, width, height) {
                        Ok(path) => log::info!("screenshot saved to {}", path.display()),
                        Err(e) => eprintln!("Screenshot failed: {e}"),
                    }
                }

                Event::KeyDown {
                    scancode: Some(sc),
                    repeat: false,
                    ..
                } => {
                    if let Some(button_id) = key_map.get(sc) {
                        machine.set_input(button_id, true);
                    }
                }

                Event::KeyUp {
                    scancode: Some(sc), ..
                } => {
                    if let Some(button_id) = key_map.get(sc) {
                        machine.set_input(button_id, false);
                    }
                }

                _ => {}
            }
        }

        // Run one frame of emulation
        machine.run_frame();

        // Hand generated audio to the output stage
        if let Some(out) = audio.as_mut() {
            loop {
                let n = machine.fill_audio(&mut sample_buffer);
                if n == 0 {
                    break;
                }
                out.queue_samples(&sample_buffer[..n]);
                if n < sample_buffer.len() {
                    break;
                }
            }
        }

        // Render the framebuffer and present
        machine.render_frame(&mut framebuffer);
        if show_fps {
            fps_window_frames += 1;
            let elapsed = fps_window_start.elapsed();
            if elapsed >= Duration::from_secs(1) {
                fps = fps_window_frames as f64 / elapsed.as_secs_f64();
                fps_window_start = Instant::now();
                fps_window_frames = 0;
            }
            overlay::draw_fps(&mut framebuffer, width as usize, fps);
        }
        video.present(&framebuffer);

        // Frame pacing on top of VSync
        next_frame += frame_duration;
        let now = Instant::now();
        if next_frame > now {
            std::thread::sleep(next_frame - now);
        } else {
            next_frame = now;
        }
    }

    if let Some(out) = audio {
        out.shutdown();
    }
}
