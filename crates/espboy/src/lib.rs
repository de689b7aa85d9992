use anyhow::{bail, Result};
use espboy_common::i2c::{EepromDevice, SoftI2cBus};
use espboy_common::irq::IrqLine;
use espboy_i2c::cmd::Command;
use espboy_i2c::regs::{self, IntFlags};
use espboy_i2c::{I2cController, NUM_COMMAND_SLOTS};

// Control register bits the demo writes, as guest software would.
const CTR_MS_MODE: u32 = 1 << 4;
const CTR_TRANS_START: u32 = 1 << 5;

/// The read-back command program needs five slots besides the per-byte
/// READ slots (two address phases, restart, stop, end).
pub const MAX_PAYLOAD: usize = NUM_COMMAND_SLOTS - 5;

fn comd(index: usize) -> u32 {
    regs::COMD_BASE + 4 * index as u32
}

/// Scripted I2C demo: write `payload` to an emulated EEPROM at
/// `address`, then read it back through the controller, all through the
/// memory-mapped register interface. Returns the bytes read back.
pub fn run_i2c_demo(address: u8, payload: &[u8]) -> Result<Vec<u8>> {
    if payload.is_empty() {
        bail!("payload must not be empty");
    }
    if payload.len() > MAX_PAYLOAD {
        bail!("payload longer than {} bytes", MAX_PAYLOAD);
    }
    if address >= 0x80 {
        bail!("{:#04x} is not a 7-bit device address", address);
    }

    let mut bus = SoftI2cBus::new();
    let eeprom = EepromDevice::new(256);
    let memory = eeprom.memory();
    bus.attach(address, Box::new(eeprom));

    let irq = IrqLine::new();
    let mut i2c = I2cController::new(irq.clone());

    i2c.write_reg(
        regs::INT_ENA,
        (IntFlags::TRANS_COMPLETE | IntFlags::ACK_ERR).bits(),
        &mut bus,
    );

    // --- Write transaction: address, word address 0, payload, stop. ---
    log::info!("writing {} bytes to device {:#04x}", payload.len(), address);
    i2c.write_reg(regs::DATA, u32::from(address) << 1, &mut bus);
    i2c.write_reg(regs::DATA, 0x00, &mut bus);
    for &byte in payload {
        i2c.write_reg(regs::DATA, byte.into(), &mut bus);
    }

    let write_cmd = Command::Write {
        ack_exp: false,
        ack_check_en: false,
        length: payload.len() as u8 + 2,
    };
    i2c.write_reg(comd(0), write_cmd.encode(), &mut bus);
    i2c.write_reg(comd(1), Command::Stop.encode(), &mut bus);
    i2c.write_reg(comd(2), Command::End.encode(), &mut bus);
    i2c.write_reg(regs::CTR, CTR_MS_MODE | CTR_TRANS_START, &mut bus);

    let raw = IntFlags::from_bits_truncate(i2c.read_reg(regs::INT_RAW));
    if raw.contains(IntFlags::ACK_ERR) {
        bail!("device {:#04x} did not acknowledge", address);
    }
    log::debug!("write pass events: {:?}, irq={}", raw, irq.is_asserted());
    i2c.write_reg(regs::INT_CLR, 0, &mut bus);

    if &memory.borrow()[..payload.len()] != payload {
        bail!("device contents do not match the written payload");
    }

    // --- Read-back transaction: set the word address, repeated start,
    // re-address for reading, one READ slot per byte. ---
    log::info!("reading {} bytes back from device {:#04x}", payload.len(), address);
    i2c.write_reg(regs::DATA, u32::from(address) << 1, &mut bus);
    i2c.write_reg(regs::DATA, 0x00, &mut bus);
    i2c.write_reg(regs::DATA, (u32::from(address) << 1) | 1, &mut bus);

    let set_cursor = Command::Write {
        ack_exp: false,
        ack_check_en: false,
        length: 2,
    };
    let readdress = Command::Write {
        ack_exp: false,
        ack_check_en: false,
        length: 1,
    };
    i2c.write_reg(comd(0), set_cursor.encode(), &mut bus);
    i2c.write_reg(comd(1), Command::RStart.encode(), &mut bus);
    i2c.write_reg(comd(2), readdress.encode(), &mut bus);
    for n in 0..payload.len() {
        i2c.write_reg(comd(3 + n), Command::Read.encode(), &mut bus);
    }
    i2c.write_reg(comd(3 + payload.len()), Command::Stop.encode(), &mut bus);
    i2c.write_reg(comd(4 + payload.len()), Command::End.encode(), &mut bus);
    i2c.write_reg(regs::CTR, CTR_MS_MODE | CTR_TRANS_START, &mut bus);

    let raw = IntFlags::from_bits_truncate(i2c.read_reg(regs::INT_RAW));
    if raw.contains(IntFlags::ACK_ERR) {
        bail!("device {:#04x} dropped off the bus mid-demo", address);
    }
    i2c.write_reg(regs::INT_CLR, 0, &mut bus);

    let readback: Vec<u8> = (0..payload.len())
        .map(|_| i2c.read_reg(regs::DATA) as u8)
        .collect();
    if readback != payload {
        bail!(
            "readback mismatch: wrote {:02x?}, got {:02x?}",
            payload,
            readback
        );
    }

    Ok(readback)
}
