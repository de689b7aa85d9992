//! Register bank types and the controller's offset map.
//!
//! Each register is a single backing word with named accessor pairs, so
//! the exact bit positions live in one place instead of in a
//! layout-dependent packed struct. Reserved bits read as zero and are
//! dropped on write.

use bitflags::bitflags;

// Byte offsets of the memory-mapped registers (4-byte aligned).
pub const SCL_LOW_PERIOD: u32 = 0x00;
pub const CTR: u32 = 0x04;
pub const SR: u32 = 0x08;
pub const TO: u32 = 0x0c;
pub const SLAVE_ADDR: u32 = 0x10;
pub const FIFO_CONF: u32 = 0x18;
pub const DATA: u32 = 0x1c;
pub const INT_RAW: u32 = 0x20;
pub const INT_CLR: u32 = 0x24;
pub const INT_ENA: u32 = 0x28;
pub const INT_ST: u32 = 0x2c;
pub const SDA_HOLD: u32 = 0x30;
pub const SDA_SAMPLE: u32 = 0x34;
pub const SCL_HIGH_PERIOD: u32 = 0x38;
pub const SCL_START_HOLD: u32 = 0x40;
pub const SCL_RSTART_SETUP: u32 = 0x44;
pub const SCL_STOP_HOLD: u32 = 0x48;
pub const SCL_STOP_SETUP: u32 = 0x4c;
pub const SCL_FILTER: u32 = 0x50;
pub const SDA_FILTER: u32 = 0x54;
/// First command slot; slots 1..15 follow at 4-byte strides up to
/// [`COMD_LAST`].
pub const COMD_BASE: u32 = 0x58;
pub const COMD_LAST: u32 = 0x94;

// Control register bits.
const CTR_SDA_FORCE_OUT: u32 = 1 << 0;
const CTR_SCL_FORCE_OUT: u32 = 1 << 1;
const CTR_SAMPLE_SCL_LEVEL: u32 = 1 << 2;
const CTR_MS_MODE: u32 = 1 << 4;
const CTR_TRANS_START: u32 = 1 << 5;
const CTR_TX_LSB_FIRST: u32 = 1 << 6;
const CTR_RX_LSB_FIRST: u32 = 1 << 7;
const CTR_FSM_RST: u32 = 1 << 10;
const CTR_MASK: u32 = CTR_SDA_FORCE_OUT
    | CTR_SCL_FORCE_OUT
    | CTR_SAMPLE_SCL_LEVEL
    | CTR_MS_MODE
    | CTR_TRANS_START
    | CTR_TX_LSB_FIRST
    | CTR_RX_LSB_FIRST
    | CTR_FSM_RST;

/// Control register (`CTR`).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Control(u32);

impl Control {
    /// Power-on value: both force-out bits set (open-drain lines
    /// released), everything else clear.
    pub fn reset() -> Self {
        Control(CTR_SDA_FORCE_OUT | CTR_SCL_FORCE_OUT)
    }

    #[inline]
    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn set_value(&mut self, value: u32) {
        self.0 = value & CTR_MASK;
    }

    #[inline]
    pub fn sda_force_out(&self) -> bool {
        self.0 & CTR_SDA_FORCE_OUT != 0
    }

    #[inline]
    pub fn scl_force_out(&self) -> bool {
        self.0 & CTR_SCL_FORCE_OUT != 0
    }

    #[inline]
    pub fn sample_scl_level(&self) -> bool {
        self.0 & CTR_SAMPLE_SCL_LEVEL != 0
    }

    /// Master mode select; the controller only implements master
    /// operation.
    #[inline]
    pub fn ms_mode(&self) -> bool {
        self.0 & CTR_MS_MODE != 0
    }

    /// Start trigger. Write-1 pulses the command engine; the bit never
    /// reads back as set.
    #[inline]
    pub fn trans_start(&self) -> bool {
        self.0 & CTR_TRANS_START != 0
    }

    pub fn clear_trans_start(&mut self) {
        self.0 &= !CTR_TRANS_START;
    }

    #[inline]
    pub fn tx_lsb_first(&self) -> bool {
        self.0 & CTR_TX_LSB_FIRST != 0
    }

    #[inline]
    pub fn rx_lsb_first(&self) -> bool {
        self.0 & CTR_RX_LSB_FIRST != 0
    }

    #[inline]
    pub fn fsm_rst(&self) -> bool {
        self.0 & CTR_FSM_RST != 0
    }
}

// Status register bits.
const SR_ACK_REC: u32 = 1 << 0;
const SR_SLAVE_RW: u32 = 1 << 1;
const SR_TIME_OUT: u32 = 1 << 2;
const SR_ARB_LOST: u32 = 1 << 3;
const SR_BUS_BUSY: u32 = 1 << 4;
const SR_SLAVE_ADDRESSED: u32 = 1 << 5;
const SR_BYTE_TRANS: u32 = 1 << 6;
const SR_FIFO_CNT_MASK: u32 = 0x3f;
const SR_RXFIFO_CNT_SHIFT: u32 = 8;
const SR_TXFIFO_CNT_SHIFT: u32 = 18;
const SR_STATE_MASK: u32 = 0x7;
const SR_SCL_MAIN_STATE_SHIFT: u32 = 24;
const SR_SCL_STATE_SHIFT: u32 = 28;

/// Latched flags the host is allowed to rewrite. The derived fields
/// (bus-busy, FIFO counts, SCL state snapshots) are owned by the model.
const SR_HOST_MASK: u32 = SR_ACK_REC
    | SR_SLAVE_RW
    | SR_TIME_OUT
    | SR_ARB_LOST
    | SR_SLAVE_ADDRESSED
    | SR_BYTE_TRANS;

/// Status register (`SR`).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Status(u32);

impl Status {
    #[inline]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Apply a host write: only the latched flag bits take effect.
    pub fn host_write(&mut self, value: u32) {
        self.0 = (self.0 & !SR_HOST_MASK) | (value & SR_HOST_MASK);
    }

    #[inline]
    pub fn ack_rec(&self) -> bool {
        self.0 & SR_ACK_REC != 0
    }

    pub fn set_ack_rec(&mut self, ack: bool) {
        if ack {
            self.0 |= SR_ACK_REC;
        } else {
            self.0 &= !SR_ACK_REC;
        }
    }

    #[inline]
    pub fn slave_rw(&self) -> bool {
        self.0 & SR_SLAVE_RW != 0
    }

    #[inline]
    pub fn time_out(&self) -> bool {
        self.0 & SR_TIME_OUT != 0
    }

    #[inline]
    pub fn arb_lost(&self) -> bool {
        self.0 & SR_ARB_LOST != 0
    }

    /// Bus state: set between a successful address phase and the
    /// matching stop.
    #[inline]
    pub fn bus_busy(&self) -> bool {
        self.0 & SR_BUS_BUSY != 0
    }

    pub fn set_bus_busy(&mut self, busy: bool) {
        if busy {
            self.0 |= SR_BUS_BUSY;
        } else {
            self.0 &= !SR_BUS_BUSY;
        }
    }

    #[inline]
    pub fn slave_addressed(&self) -> bool {
        self.0 & SR_SLAVE_ADDRESSED != 0
    }

    #[inline]
    pub fn byte_trans(&self) -> bool {
        self.0 & SR_BYTE_TRANS != 0
    }

    pub fn set_byte_trans(&mut self, transferred: bool) {
        if transferred {
            self.0 |= SR_BYTE_TRANS;
        } else {
            self.0 &= !SR_BYTE_TRANS;
        }
    }

    #[inline]
    pub fn rxfifo_cnt(&self) -> u8 {
        ((self.0 >> SR_RXFIFO_CNT_SHIFT) & SR_FIFO_CNT_MASK) as u8
    }

    pub fn set_rxfifo_cnt(&mut self, count: u8) {
        self.0 = (self.0 & !(SR_FIFO_CNT_MASK << SR_RXFIFO_CNT_SHIFT))
            | ((count as u32 & SR_FIFO_CNT_MASK) << SR_RXFIFO_CNT_SHIFT);
    }

    #[inline]
    pub fn txfifo_cnt(&self) -> u8 {
        ((self.0 >> SR_TXFIFO_CNT_SHIFT) & SR_FIFO_CNT_MASK) as u8
    }

    pub fn set_txfifo_cnt(&mut self, count: u8) {
        self.0 = (self.0 & !(SR_FIFO_CNT_MASK << SR_TXFIFO_CNT_SHIFT))
            | ((count as u32 & SR_FIFO_CNT_MASK) << SR_TXFIFO_CNT_SHIFT);
    }

    #[inline]
    pub fn scl_main_state_last(&self) -> u8 {
        ((self.0 >> SR_SCL_MAIN_STATE_SHIFT) & SR_STATE_MASK) as u8
    }

    #[inline]
    pub fn scl_state_last(&self) -> u8 {
        ((self.0 >> SR_SCL_STATE_SHIFT) & SR_STATE_MASK) as u8
    }
}

// FIFO configuration bits.
const FIFO_CONF_RXFIFO_FULL_THRHD_MASK: u32 = 0x1f;
const FIFO_CONF_TXFIFO_EMPTY_THRHD_SHIFT: u32 = 5;
const FIFO_CONF_TXFIFO_EMPTY_THRHD_MASK: u32 = 0x1f;
const FIFO_CONF_NONFIFO_EN: u32 = 1 << 10;
const FIFO_CONF_FIFO_ADDR_CFG_EN: u32 = 1 << 11;
/// One-shot rx queue clear; applied on write, never stored.
pub const FIFO_CONF_RX_FIFO_RST: u32 = 1 << 12;
/// One-shot tx queue clear; applied on write, never stored.
pub const FIFO_CONF_TX_FIFO_RST: u32 = 1 << 13;
const FIFO_CONF_NONFIFO_RX_THRES_SHIFT: u32 = 14;
const FIFO_CONF_NONFIFO_RX_THRES_MASK: u32 = 0x3f;
const FIFO_CONF_NONFIFO_TX_THRES_SHIFT: u32 = 20;
const FIFO_CONF_NONFIFO_TX_THRES_MASK: u32 = 0x3f;

const FIFO_CONF_STORED_MASK: u32 = FIFO_CONF_RXFIFO_FULL_THRHD_MASK
    | (FIFO_CONF_TXFIFO_EMPTY_THRHD_MASK << FIFO_CONF_TXFIFO_EMPTY_THRHD_SHIFT)
    | FIFO_CONF_NONFIFO_EN
    | FIFO_CONF_FIFO_ADDR_CFG_EN
    | (FIFO_CONF_NONFIFO_RX_THRES_MASK << FIFO_CONF_NONFIFO_RX_THRES_SHIFT)
    | (FIFO_CONF_NONFIFO_TX_THRES_MASK << FIFO_CONF_NONFIFO_TX_THRES_SHIFT);

/// FIFO configuration register (`FIFO_CONF`).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct FifoConf(u32);

impl FifoConf {
    #[inline]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Store the persistent fields; the one-shot reset bits are handled
    /// by the caller and never land here.
    pub fn set_value(&mut self, value: u32) {
        self.0 = value & FIFO_CONF_STORED_MASK;
    }

    #[inline]
    pub fn rxfifo_full_thrhd(&self) -> u8 {
        (self.0 & FIFO_CONF_RXFIFO_FULL_THRHD_MASK) as u8
    }

    #[inline]
    pub fn txfifo_empty_thrhd(&self) -> u8 {
        ((self.0 >> FIFO_CONF_TXFIFO_EMPTY_THRHD_SHIFT) & FIFO_CONF_TXFIFO_EMPTY_THRHD_MASK) as u8
    }

    #[inline]
    pub fn nonfifo_en(&self) -> bool {
        self.0 & FIFO_CONF_NONFIFO_EN != 0
    }

    #[inline]
    pub fn fifo_addr_cfg_en(&self) -> bool {
        self.0 & FIFO_CONF_FIFO_ADDR_CFG_EN != 0
    }

    #[inline]
    pub fn nonfifo_rx_thres(&self) -> u8 {
        ((self.0 >> FIFO_CONF_NONFIFO_RX_THRES_SHIFT) & FIFO_CONF_NONFIFO_RX_THRES_MASK) as u8
    }

    #[inline]
    pub fn nonfifo_tx_thres(&self) -> u8 {
        ((self.0 >> FIFO_CONF_NONFIFO_TX_THRES_SHIFT) & FIFO_CONF_NONFIFO_TX_THRES_MASK) as u8
    }
}

bitflags! {
    /// Interrupt event bits. The raw, enable and status registers all
    /// share this layout.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
    pub struct IntFlags: u32 {
        const RXFIFO_FULL = 1 << 0;
        const TXFIFO_EMPTY = 1 << 1;
        const RXFIFO_OVF = 1 << 2;
        const END_DETECT = 1 << 3;
        const SLAVE_TRAN_COMP = 1 << 4;
        const ARBITRATION_LOST = 1 << 5;
        const MASTER_TRAN_COMP = 1 << 6;
        const TRANS_COMPLETE = 1 << 7;
        const TIME_OUT = 1 << 8;
        const TRANS_START = 1 << 9;
        const ACK_ERR = 1 << 10;
        const RX_REC_FULL = 1 << 11;
        const TX_SEND_EMPTY = 1 << 12;
        const SCL_ST_TO = 1 << 13;
        const SCL_MAIN_ST_TO = 1 << 14;
        const DET_START = 1 << 15;
    }
}

/// Timing and addressing words that software can program and read back
/// but that have no behavioral model: the emulation moves whole bytes,
/// so SCL/SDA period, filter and timeout values never influence a
/// transfer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct TimingRegs {
    pub scl_low_period: u32,
    pub timeout: u32,
    pub slave_addr: u32,
    pub sda_hold: u32,
    pub sda_sample: u32,
    pub scl_high_period: u32,
    pub scl_start_hold: u32,
    pub scl_rstart_setup: u32,
    pub scl_stop_hold: u32,
    pub scl_stop_setup: u32,
    pub scl_filter: u32,
    pub sda_filter: u32,
}
