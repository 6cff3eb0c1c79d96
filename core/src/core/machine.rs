/// Describes a single input button that a machine accepts.
pub struct InputButton {
    /// Machine-defined button identifier, passed to `set_input()`.
    pub id: u8,
    /// Human-readable name for display/configuration (e.g., "A", "Start").
    pub name: &'static str,
}

/// Machine-agnostic interface for emulated systems.
///
/// The frontend is a pure presentation engine that does not know about
/// specific hardware (mappers, palette formats, channel mixing, etc.).
pub trait Machine {
    /// Native display resolution as (width, height) in pixels.
    fn display_size(&self) -> (u32, u32);

    /// Run one frame of emulation (advance the clock by one frame's worth
    /// of cycles).
    fn run_frame(&mut self);

    /// Render the current video state into an RGBA8888 pixel buffer.
    ///
    /// The buffer must be at least `width * height * 4` bytes (from
    /// `display_size()`). Pixels are stored left-to-right, top-to-bottom,
    /// 4 bytes per pixel (R, G, B, A).
    fn render_frame(&self, buffer: &mut [u8]);

    /// Handle an input event. `button` is a machine-defined ID from
    /// `input_map()`. `pressed` is true for key-down, false for key-up.
    ///
    /// Called per-event, not per-frame. Each call latches the button state
    /// so that `run_frame()` sees the accumulated input.
    fn set_input(&mut self, button: u8, pressed: bool);

    /// Get the list of input buttons this machine accepts.
    fn input_map(&self) -> &[InputButton];

    /// Reset the machine to its initial power-on state.
    fn reset(&mut self);

    /// Battery-backed cartridge RAM to persist, if any.
    fn save_nvram(&self) -> Option<&[u8]>;

    /// Restore previously persisted battery RAM.
    fn load_nvram(&mut self, data: &[u8]);

    /// Drain queued audio into `buffer` as interleaved stereo f32 pairs in
    /// [-1, 1]. Returns the number of samples written (always even).
    fn fill_audio(&mut self, buffer: &mut [f32]) -> usize;

    /// Output sample rate in Hz, or 0 if the machine has no audio.
    fn audio_sample_rate(&self) -> u32;

    /// Native frame rate for host pacing.
    fn frame_rate_hz(&self) -> f64;
}
