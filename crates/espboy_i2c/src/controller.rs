use espboy_common::irq::IrqLine;

use crate::cmd::CommandSlot;
use crate::fifo::ByteFifo;
use crate::regs::{Control, FifoConf, IntFlags, Status, TimingRegs};
use crate::{FIFO_CAPACITY, NUM_COMMAND_SLOTS};

mod engine;
mod mmio;

/// Emulated I2C master controller.
///
/// Owns the register bank, both data FIFOs and the command slots, and
/// drives one level-triggered interrupt line. Guest software talks to it
/// exclusively through [`read_reg`](I2cController::read_reg) and
/// [`write_reg`](I2cController::write_reg); the enclosing machine routes
/// the controller's MMIO window here and supplies the bus transport on
/// writes.
pub struct I2cController {
    ctr: Control,
    sr: Status,
    fifo_conf: FifoConf,
    int_raw: IntFlags,
    int_ena: IntFlags,
    int_st: IntFlags,
    timing: TimingRegs,
    cmd: [CommandSlot; NUM_COMMAND_SLOTS],
    tx_fifo: ByteFifo,
    rx_fifo: ByteFifo,
    irq: IrqLine,
}

impl I2cController {
    pub fn new(irq: IrqLine) -> Self {
        let mut i2c = Self {
            ctr: Control::default(),
            sr: Status::default(),
            fifo_conf: FifoConf::default(),
            int_raw: IntFlags::empty(),
            int_ena: IntFlags::empty(),
            int_st: IntFlags::empty(),
            timing: TimingRegs::default(),
            cmd: [CommandSlot::default(); NUM_COMMAND_SLOTS],
            tx_fifo: ByteFifo::new(FIFO_CAPACITY),
            rx_fifo: ByteFifo::new(FIFO_CAPACITY),
            irq,
        };
        i2c.reset();
        i2c
    }

    /// Power-on / system reset. Registers return to their documented
    /// reset values, every command slot reads as already executed, both
    /// FIFOs empty and the interrupt line drops.
    pub fn reset(&mut self) {
        self.ctr = Control::reset();
        self.sr = Status::default();
        self.fifo_conf = FifoConf::default();
        self.int_raw = IntFlags::empty();
        self.int_ena = IntFlags::empty();
        self.int_st = IntFlags::empty();
        self.timing = TimingRegs::default();
        self.cmd = [CommandSlot::reset(); NUM_COMMAND_SLOTS];
        self.tx_fifo.clear();
        self.rx_fifo.clear();
        self.irq.lower();
    }

    /// Record an interrupt event. The raw bit is set unconditionally;
    /// the status bit and the output line follow only when the event is
    /// enabled.
    fn raise_interrupt(&mut self, event: IntFlags) {
        self.int_raw |= event;
        if self.int_ena.intersects(event) {
            self.int_st |= event;
            self.irq.raise();
        }
    }
}
