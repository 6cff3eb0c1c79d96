pub mod bus;
pub mod gameboy;

pub use bus::SystemBus;
pub use gameboy::GameBoy;
