pub mod cmd;
pub mod controller;
pub mod fifo;
pub mod regs;

pub use controller::I2cController;

/// Capacity of each data FIFO in bytes.
pub const FIFO_CAPACITY: usize = 32;
/// Number of host-programmable command slots.
pub const NUM_COMMAND_SLOTS: usize = 16;
/// Size of the controller's register window in bytes.
pub const REG_WINDOW_SIZE: usize = 0x1000;
