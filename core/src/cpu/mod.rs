/// Generic CPU interface
pub trait Cpu: CpuStateTrait {
    /// Return to the power-on register profile.
    fn reset(&mut self);

    /// Query if the CPU is suspended internally (HALT/STOP instruction).
    fn is_sleeping(&self) -> bool;
}

// Re-export state types
pub mod state;
pub use state::{CpuStateTrait, Sm83State};

// Sharp LR35902 (SM83) CPU
pub mod sm83;
pub use sm83::Sm83;
