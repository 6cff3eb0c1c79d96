//! SDL audio output stage.
//!
//! The core mixes stereo f32 pairs at the host rate and the emulation
//! thread hands them over via [`AudioOutput::queue_samples`]; SDL's
//! callback thread drains them. The queue is the only cross-thread
//! buffer: the producer drops samples when it runs ahead, the callback
//! substitutes silence when it starves (and counts the underrun).
//!
//! Each channel passes through a one-pole high-pass on the way out,
//! the same charge-factor filter the console's output capacitors apply
//! to the DC offset that the channel DACs ride on.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};

/// Upper bound on queued stereo pairs (~0.19 s at 44.1 kHz). Keeping
/// this short bounds audio latency; the emulator refills every frame.
const QUEUE_LIMIT_PAIRS: usize = 8192;

/// Capacitor charge factor per output sample. Pan Docs gives
/// 0.999958^(4194304/rate) for the DMG headphone path, which works out
/// to ~0.996 at 44.1 kHz.
const CHARGE_FACTOR: f32 = 0.996;

/// DC-blocking high-pass: `out = in - cap; cap = in - out * charge`.
#[derive(Default)]
struct Capacitor {
    charge: f32,
}

impl Capacitor {
    fn filter(&mut self, input: f32) -> f32 {
        let output = input - self.charge;
        self.charge = input - output * CHARGE_FACTOR;
        output
    }
}

type SampleQueue = Arc<Mutex<VecDeque<(f32, f32)>>>;

/// Runs on SDL's audio thread; everything it shares with the emulation
/// thread goes through `queue` and the underrun counter.
struct OutputStage {
    queue: SampleQueue,
    underruns: Arc<AtomicUsize>,
    left: Capacitor,
    right: Capacitor,
}

impl AudioCallback for OutputStage {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        let mut queue = self.queue.lock().unwrap();
        let mut starved = false;

        for frame in out.chunks_exact_mut(2) {
            let (l, r) = queue.pop_front().unwrap_or_else(|| {
                starved = true;
                (0.0, 0.0)
            });
            frame[0] = self.left.filter(l);
            frame[1] = self.right.filter(r);
        }

        if starved {
            self.underruns.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Handle owned by the emulation thread.
pub struct AudioOutput {
    device: AudioDevice<OutputStage>,
    queue: SampleQueue,
    underruns: Arc<AtomicUsize>,
    started: bool,
    dropped: usize,
}

impl AudioOutput {
    /// Open a stereo f32 device at the machine's sample rate. Returns
    /// `None` (with a logged reason) when the machine has no audio or
    /// the host device cannot be opened; the emulator runs silent then.
    pub fn open(sdl_audio: &sdl2::AudioSubsystem, sample_rate: u32) -> Option<AudioOutput> {
        if sample_rate == 0 {
            return None;
        }

        let queue: SampleQueue = Arc::new(Mutex::new(VecDeque::with_capacity(QUEUE_LIMIT_PAIRS)));
        let underruns = Arc::new(AtomicUsize::new(0));

        let desired_spec = AudioSpecDesired {
            freq: Some(sample_rate as i32),
            channels: Some(2),
            samples: Some(512), // ~11.6 ms at 44100 Hz
        };

        let device = sdl_audio.open_playback(None, &desired_spec, |_spec| OutputStage {
            queue: Arc::clone(&queue),
            underruns: Arc::clone(&underruns),
            left: Capacitor::default(),
            right: Capacitor::default(),
        });

        match device {
            Ok(device) => Some(AudioOutput {
                device,
                queue,
                underruns,
                started: false,
                dropped: 0,
            }),
            Err(e) => {
                log::warn!("no audio device: {e}");
                None
            }
        }
    }

    /// Queue interleaved stereo samples from the core. Excess beyond the
    /// latency bound is dropped. Playback starts on the first call, so
    /// the device never runs before there is something to play.
    pub fn queue_samples(&mut self, interleaved: &[f32]) {
        {
            let mut queue = self.queue.lock().unwrap();
            for pair in interleaved.chunks_exact(2) {
                if queue.len() < QUEUE_LIMIT_PAIRS {
                    queue.push_back((pair[0], pair[1]));
                } else {
                    self.dropped += 1;
                }
            }
        }

        if !self.started {
            self.device.resume();
            self.started = true;
        }
    }

    /// Stop playback and report queue health for the session.
    pub fn shutdown(self) {
        self.device.pause();
        let underruns = self.underruns.load(Ordering::Relaxed);
        if underruns > 0 || self.dropped > 0 {
            log::info!(
                "audio: {underruns} underrun callbacks, {} dropped pairs",
                self.dropped
            );
        }
    }
}
