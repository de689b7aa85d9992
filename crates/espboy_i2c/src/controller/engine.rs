use espboy_common::i2c::{Direction, I2cBus};

use super::I2cController;
use crate::cmd::Opcode;
use crate::regs::IntFlags;
use crate::NUM_COMMAND_SLOTS;

impl I2cController {
    /// Execute the programmed command sequence.
    ///
    /// One synchronous pass over slots 0..15 in ascending order: slots
    /// whose done flag is set are skipped, every other slot executes
    /// exactly once and is then marked done. There is no retry and no
    /// suspension; a failed address phase surfaces through the ack-error
    /// event and the pass moves on.
    pub(super) fn run_commands(&mut self, bus: &mut dyn I2cBus) {
        for index in 0..NUM_COMMAND_SLOTS {
            if self.cmd[index].done() {
                continue;
            }
            match self.cmd[index].opcode() {
                Opcode::RStart => self.exec_rstart(bus),
                Opcode::Write => self.exec_write(index, bus),
                Opcode::Read => self.exec_read(bus),
                Opcode::Stop => self.exec_stop(bus),
                Opcode::End => self.raise_interrupt(IntFlags::END_DETECT),
                Opcode::Unknown(code) => {
                    log::debug!("i2c: slot {} has undefined opcode {}, skipped", index, code)
                }
            }
            self.cmd[index].set_done();
        }
    }

    /// Logical restart: the open transfer is closed so the next WRITE
    /// re-addresses the target. No bus-level repeated start is modelled.
    fn exec_rstart(&mut self, bus: &mut dyn I2cBus) {
        self.sr.set_bus_busy(false);
        bus.end_transfer();
    }

    fn exec_write(&mut self, index: usize, bus: &mut dyn I2cBus) {
        let mut remaining = self.cmd[index].byte_num() as usize;

        if !self.sr.bus_busy() {
            // Opening a transaction: the first queued byte carries the
            // 7-bit target address and the direction bit.
            let Some(address_byte) = self.pop_tx_byte() else {
                self.raise_interrupt(IntFlags::TXFIFO_EMPTY);
                return;
            };
            let address = address_byte >> 1;
            let direction = if address_byte & 1 != 0 {
                Direction::Read
            } else {
                Direction::Write
            };

            if !bus.begin_transfer(address, direction) {
                self.sr.set_ack_rec(false);
                self.raise_interrupt(IntFlags::ACK_ERR);
                return;
            }

            self.sr.set_bus_busy(true);
            self.sr.set_ack_rec(true);
            self.sr.set_byte_trans(true);
            let observed = self.cmd[index].ack_check_en() && self.cmd[index].ack_exp();
            self.cmd[index].set_ack_value(observed);
            self.raise_interrupt(IntFlags::TRANS_START);
            // The address byte consumed one unit of the slot's count.
            remaining = remaining.saturating_sub(1);
        }

        for _ in 0..remaining {
            let Some(byte) = self.pop_tx_byte() else {
                self.raise_interrupt(IntFlags::TXFIFO_EMPTY);
                break;
            };
            bus.send_byte(byte);
            self.sr.set_byte_trans(true);
        }
        self.raise_interrupt(IntFlags::TX_SEND_EMPTY);
    }

    /// Receive a single byte into the rx queue. The byte count of a READ
    /// slot is not consulted; hosts program one READ slot per byte.
    fn exec_read(&mut self, bus: &mut dyn I2cBus) {
        if self.rx_fifo.is_full() {
            self.raise_interrupt(IntFlags::RXFIFO_OVF);
            return;
        }
        let byte = bus.receive_byte();
        self.rx_fifo.push(byte);
        self.sr.set_rxfifo_cnt(self.rx_fifo.len() as u8);
        if self.rx_fifo.is_full() {
            self.raise_interrupt(IntFlags::RXFIFO_FULL);
        }
    }

    fn exec_stop(&mut self, bus: &mut dyn I2cBus) {
        self.sr.set_bus_busy(false);
        bus.end_transfer();
        self.raise_interrupt(IntFlags::TRANS_COMPLETE);
    }

    fn pop_tx_byte(&mut self) -> Option<u8> {
        let byte = self.tx_fifo.pop()?;
        self.sr.set_txfifo_cnt(self.tx_fifo.len() as u8);
        Some(byte)
    }
}
