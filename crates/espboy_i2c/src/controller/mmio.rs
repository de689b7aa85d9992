use espboy_common::i2c::I2cBus;

use super::I2cController;
use crate::regs::{self, IntFlags};

impl I2cController {
    /// Service a full-word register read.
    ///
    /// Offsets are byte offsets into the controller's window, 4-byte
    /// aligned. Unknown offsets read as zero.
    pub fn read_reg(&mut self, offset: u32) -> u32 {
        match offset {
            regs::SCL_LOW_PERIOD => self.timing.scl_low_period,
            regs::CTR => self.ctr.value(),
            regs::SR => self.sr.value(),
            regs::TO => self.timing.timeout,
            regs::SLAVE_ADDR => self.timing.slave_addr,
            regs::FIFO_CONF => self.fifo_conf.value(),
            regs::DATA => self.pop_rx_fifo(),
            regs::INT_RAW => {
                // Reading the raw register hands the bits over and
                // clears them; only the explicit-clear write touches the
                // status register.
                let value = self.int_raw.bits();
                self.int_raw = IntFlags::empty();
                value
            }
            regs::INT_CLR => 0,
            regs::INT_ENA => self.int_ena.bits(),
            regs::INT_ST => self.int_st.bits(),
            regs::SDA_HOLD => self.timing.sda_hold,
            regs::SDA_SAMPLE => self.timing.sda_sample,
            regs::SCL_HIGH_PERIOD => self.timing.scl_high_period,
            regs::SCL_START_HOLD => self.timing.scl_start_hold,
            regs::SCL_RSTART_SETUP => self.timing.scl_rstart_setup,
            regs::SCL_STOP_HOLD => self.timing.scl_stop_hold,
            regs::SCL_STOP_SETUP => self.timing.scl_stop_setup,
            regs::SCL_FILTER => self.timing.scl_filter,
            regs::SDA_FILTER => self.timing.sda_filter,
            regs::COMD_BASE..=regs::COMD_LAST => {
                let index = ((offset - regs::COMD_BASE) / 4) as usize;
                self.cmd[index].value()
            }
            _ => {
                log::trace!("i2c: unhandled register read at {:#05x}", offset);
                0
            }
        }
    }

    /// Service a full-word register write.
    ///
    /// `bus` is the transport the command engine runs against when the
    /// write pulses the start trigger. Unknown offsets are ignored.
    pub fn write_reg(&mut self, offset: u32, value: u32, bus: &mut dyn I2cBus) {
        match offset {
            regs::SCL_LOW_PERIOD => self.timing.scl_low_period = value,
            regs::CTR => self.write_ctr(value, bus),
            regs::SR => self.sr.host_write(value),
            regs::TO => self.timing.timeout = value,
            regs::SLAVE_ADDR => self.timing.slave_addr = value,
            regs::FIFO_CONF => self.write_fifo_conf(value),
            regs::DATA => self.push_tx_fifo(value as u8),
            regs::INT_RAW => {}
            regs::INT_CLR => {
                // Any written value acknowledges everything: latched
                // status clears and the line drops. Raw bits survive.
                self.int_st = IntFlags::empty();
                self.irq.lower();
            }
            regs::INT_ENA => self.int_ena = IntFlags::from_bits_truncate(value),
            regs::INT_ST => {}
            regs::SDA_HOLD => self.timing.sda_hold = value,
            regs::SDA_SAMPLE => self.timing.sda_sample = value,
            regs::SCL_HIGH_PERIOD => self.timing.scl_high_period = value,
            regs::SCL_START_HOLD => self.timing.scl_start_hold = value,
            regs::SCL_RSTART_SETUP => self.timing.scl_rstart_setup = value,
            regs::SCL_STOP_HOLD => self.timing.scl_stop_hold = value,
            regs::SCL_STOP_SETUP => self.timing.scl_stop_setup = value,
            regs::SCL_FILTER => self.timing.scl_filter = value,
            regs::SDA_FILTER => self.timing.sda_filter = value,
            regs::COMD_BASE..=regs::COMD_LAST => {
                let index = ((offset - regs::COMD_BASE) / 4) as usize;
                // Rewriting a slot re-arms it.
                self.cmd[index].host_write(value);
            }
            _ => log::trace!(
                "i2c: unhandled register write at {:#05x} (value {:#010x})",
                offset,
                value
            ),
        }
    }

    fn write_ctr(&mut self, value: u32, bus: &mut dyn I2cBus) {
        self.ctr.set_value(value);
        if !self.ctr.trans_start() {
            return;
        }
        // The start trigger is an edge: it pulses the engine once and
        // never reads back as set.
        self.ctr.clear_trans_start();
        if self.ctr.ms_mode() {
            self.run_commands(bus);
        } else {
            log::error!("i2c: slave mode is not implemented, start trigger ignored");
        }
    }

    fn write_fifo_conf(&mut self, value: u32) {
        // The queue reset bits act immediately and are never stored.
        if value & regs::FIFO_CONF_RX_FIFO_RST != 0 {
            self.rx_fifo.clear();
            self.sr.set_rxfifo_cnt(0);
        }
        if value & regs::FIFO_CONF_TX_FIFO_RST != 0 {
            self.tx_fifo.clear();
            self.sr.set_txfifo_cnt(0);
        }
        self.fifo_conf.set_value(value);
    }

    fn push_tx_fifo(&mut self, byte: u8) {
        if !self.tx_fifo.push(byte) {
            log::warn!("i2c: tx FIFO full, dropping byte {:#04x}", byte);
            return;
        }
        self.sr.set_txfifo_cnt(self.tx_fifo.len() as u8);
    }

    fn pop_rx_fifo(&mut self) -> u32 {
        match self.rx_fifo.pop() {
            Some(byte) => {
                self.sr.set_rxfifo_cnt(self.rx_fifo.len() as u8);
                byte as u32
            }
            None => {
                log::warn!("i2c: rx FIFO empty, data read returns 0");
                0
            }
        }
    }
}
