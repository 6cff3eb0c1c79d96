use super::bus::InterruptLine;

/// Anything that advances by discrete T-cycle counts (video, sound, timers).
///
/// The frame loop advances each component by the cycle count the CPU
/// just consumed; components that raise interrupts do so through the
/// shared request line.
pub trait Component {
    /// Advance by `cycles` T-cycles of this component's clock domain.
    fn advance(&mut self, cycles: u32, irq: &mut InterruptLine);

    /// Return to power-on state.
    fn reset(&mut self);
}
