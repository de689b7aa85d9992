//! Software I2C bus transport.
//!
//! A master controller model drives the bus through the four [`I2cBus`]
//! operations; emulated peers implement [`I2cDevice`] and are attached to
//! a [`SoftI2cBus`] under their 7-bit address. The transport moves whole
//! bytes and answers the address phase with ack/nack; electrical-level
//! signalling and multi-master arbitration are not modelled.

use std::cell::RefCell;
use std::rc::Rc;

/// Transfer direction of an addressed transaction, from the master's
/// point of view.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    Write,
    Read,
}

/// Byte-level transport between one master and its peer devices.
pub trait I2cBus {
    /// Address a peer and open a transfer. Returns `true` if a device
    /// acknowledged the address.
    fn begin_transfer(&mut self, address: u8, direction: Direction) -> bool;

    /// Send one byte to the addressed peer.
    fn send_byte(&mut self, byte: u8);

    /// Receive one byte from the addressed peer.
    fn receive_byte(&mut self) -> u8;

    /// Close the current transfer (stop condition).
    fn end_transfer(&mut self);
}

/// An emulated peer device on the bus.
pub trait I2cDevice {
    fn transfer_started(&mut self, direction: Direction);
    /// Master -> device data byte.
    fn write_byte(&mut self, byte: u8);
    /// Device -> master data byte.
    fn read_byte(&mut self) -> u8;
    fn transfer_ended(&mut self);
}

/// Reference bus transport: routes a transfer to the single device
/// registered under the addressed 7-bit address.
#[derive(Default)]
pub struct SoftI2cBus {
    devices: Vec<(u8, Box<dyn I2cDevice>)>,
    active: Option<usize>,
}

impl SoftI2cBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a device under `address`. A later attachment at the same
    /// address shadows the earlier one.
    pub fn attach(&mut self, address: u8, device: Box<dyn I2cDevice>) {
        self.devices.insert(0, (address, device));
    }
}

impl I2cBus for SoftI2cBus {
    fn begin_transfer(&mut self, address: u8, direction: Direction) -> bool {
        // An unfinished transfer is closed by re-addressing the bus, the
        // same way a repeated start takes over the wire.
        if self.active.is_some() {
            self.end_transfer();
        }

        match self.devices.iter().position(|(a, _)| *a == address) {
            Some(index) => {
                log::debug!("i2c bus: address {:#04x} acked ({:?})", address, direction);
                self.devices[index].1.transfer_started(direction);
                self.active = Some(index);
                true
            }
            None => {
                log::debug!("i2c bus: address {:#04x} nacked, no device", address);
                false
            }
        }
    }

    fn send_byte(&mut self, byte: u8) {
        match self.active {
            Some(index) => self.devices[index].1.write_byte(byte),
            None => log::warn!("i2c bus: send of {:#04x} with no open transfer", byte),
        }
    }

    fn receive_byte(&mut self) -> u8 {
        match self.active {
            Some(index) => self.devices[index].1.read_byte(),
            None => {
                log::warn!("i2c bus: receive with no open transfer");
                0
            }
        }
    }

    fn end_transfer(&mut self) {
        if let Some(index) = self.active.take() {
            self.devices[index].1.transfer_ended();
        }
    }
}

/// Shared byte store backing an [`EepromDevice`], kept accessible from
/// outside the bus so tests and the demo front end can inspect it.
pub type SharedMemory = Rc<RefCell<Vec<u8>>>;

/// Tiny 24Cxx-style EEPROM peer.
///
/// The first byte of every write transfer sets the word address; further
/// written bytes land at the cursor, which then advances. Reads stream
/// from the cursor. The cursor wraps at the end of the array.
pub struct EepromDevice {
    memory: SharedMemory,
    cursor: usize,
    address_latched: bool,
}

impl EepromDevice {
    pub fn new(size: usize) -> Self {
        Self {
            memory: Rc::new(RefCell::new(vec![0; size])),
            cursor: 0,
            address_latched: false,
        }
    }

    /// Handle onto the backing store; clones observe all writes.
    pub fn memory(&self) -> SharedMemory {
        Rc::clone(&self.memory)
    }
}

impl I2cDevice for EepromDevice {
    fn transfer_started(&mut self, direction: Direction) {
        if direction == Direction::Write {
            self.address_latched = false;
        }
    }

    fn write_byte(&mut self, byte: u8) {
        if !self.address_latched {
            self.cursor = byte as usize % self.memory.borrow().len().max(1);
            self.address_latched = true;
            return;
        }
        let mut memory = self.memory.borrow_mut();
        let len = memory.len();
        if len == 0 {
            return;
        }
        memory[self.cursor] = byte;
        self.cursor = (self.cursor + 1) % len;
    }

    fn read_byte(&mut self) -> u8 {
        let memory = self.memory.borrow();
        if memory.is_empty() {
            return 0;
        }
        let byte = memory[self.cursor];
        self.cursor = (self.cursor + 1) % memory.len();
        byte
    }

    fn transfer_ended(&mut self) {
        self.address_latched = false;
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, EepromDevice, I2cBus, SoftI2cBus};

    #[test]
    fn address_phase_acks_only_registered_devices() {
        let mut bus = SoftI2cBus::new();
        bus.attach(0x50, Box::new(EepromDevice::new(16)));

        assert!(bus.begin_transfer(0x50, Direction::Write));
        bus.end_transfer();
        assert!(!bus.begin_transfer(0x51, Direction::Write));
    }

    #[test]
    fn eeprom_write_then_read_round_trips() {
        let mut bus = SoftI2cBus::new();
        let eeprom = EepromDevice::new(16);
        let memory = eeprom.memory();
        bus.attach(0x50, Box::new(eeprom));

        // Write transfer: word address 2, then two data bytes.
        assert!(bus.begin_transfer(0x50, Direction::Write));
        bus.send_byte(0x02);
        bus.send_byte(0xAA);
        bus.send_byte(0xBB);
        bus.end_transfer();

        assert_eq!(&memory.borrow()[2..4], &[0xAA, 0xBB]);

        // Re-address at word 2 and stream the bytes back.
        assert!(bus.begin_transfer(0x50, Direction::Write));
        bus.send_byte(0x02);
        assert!(bus.begin_transfer(0x50, Direction::Read));
        assert_eq!(bus.receive_byte(), 0xAA);
        assert_eq!(bus.receive_byte(), 0xBB);
        bus.end_transfer();
    }

    #[test]
    fn orphan_data_ops_are_harmless() {
        let mut bus = SoftI2cBus::new();
        bus.send_byte(0x12);
        assert_eq!(bus.receive_byte(), 0);
        bus.end_transfer();
    }
}
