//! Command slot words.
//!
//! The controller executes a micro-program of up to 16 host-written
//! command words. Each word packs a byte count, ack handling bits, a
//! 3-bit opcode and a completion flag in bit 31. Slots are addressed
//! randomly by the host, so they are modelled as an explicit array of
//! words rather than a queue.

const CMD_BYTE_NUM_MASK: u32 = 0xff;
const CMD_ACK_CHECK_EN: u32 = 1 << 8;
const CMD_ACK_EXP: u32 = 1 << 9;
const CMD_ACK_VALUE: u32 = 1 << 10;
const CMD_OPCODE_SHIFT: u32 = 11;
const CMD_OPCODE_MASK: u32 = 0x7;
const CMD_DONE: u32 = 1 << 31;

/// Micro-operation selector of a command word.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Opcode {
    RStart,
    Write,
    Read,
    Stop,
    End,
    /// Undefined encodings execute as no-ops.
    Unknown(u8),
}

impl Opcode {
    fn from_bits(bits: u8) -> Self {
        match bits {
            0 => Opcode::RStart,
            1 => Opcode::Write,
            2 => Opcode::Read,
            3 => Opcode::Stop,
            4 => Opcode::End,
            other => Opcode::Unknown(other),
        }
    }

    fn to_bits(self) -> u8 {
        match self {
            Opcode::RStart => 0,
            Opcode::Write => 1,
            Opcode::Read => 2,
            Opcode::Stop => 3,
            Opcode::End => 4,
            Opcode::Unknown(other) => other & CMD_OPCODE_MASK as u8,
        }
    }
}

/// Guest-side view of a command, encodable into a slot word. This is
/// what driver software writes; the demo front end and the tests use it
/// instead of hand-assembling bit patterns.
#[derive(Copy, Clone, Debug)]
pub enum Command {
    RStart,
    Write {
        /// Expected ack level for the transmitted bytes.
        ack_exp: bool,
        /// Check the observed ack against `ack_exp`.
        ack_check_en: bool,
        /// Number of FIFO bytes this command covers (the address byte
        /// counts when it opens the transaction).
        length: u8,
    },
    Read,
    Stop,
    End,
}

impl Command {
    pub fn encode(self) -> u32 {
        let (opcode, length, ack_exp, ack_check_en) = match self {
            Command::RStart => (Opcode::RStart, 0, false, false),
            Command::Write {
                ack_exp,
                ack_check_en,
                length,
            } => (Opcode::Write, length, ack_exp, ack_check_en),
            Command::Read => (Opcode::Read, 0, false, false),
            Command::Stop => (Opcode::Stop, 0, false, false),
            Command::End => (Opcode::End, 0, false, false),
        };

        let mut word = length as u32 & CMD_BYTE_NUM_MASK;
        if ack_check_en {
            word |= CMD_ACK_CHECK_EN;
        }
        if ack_exp {
            word |= CMD_ACK_EXP;
        }
        word | ((opcode.to_bits() as u32) << CMD_OPCODE_SHIFT)
    }
}

/// One command slot of the register bank.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct CommandSlot(u32);

impl CommandSlot {
    /// Reset state: done set, everything else clear (an idle slot is
    /// "already executed").
    pub fn reset() -> Self {
        CommandSlot(CMD_DONE)
    }

    #[inline]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Host write: stores the word and marks the slot pending. The done
    /// flag cannot be written from the host side.
    pub fn host_write(&mut self, value: u32) {
        self.0 = value & !CMD_DONE;
    }

    #[inline]
    pub fn byte_num(&self) -> u8 {
        (self.0 & CMD_BYTE_NUM_MASK) as u8
    }

    #[inline]
    pub fn ack_check_en(&self) -> bool {
        self.0 & CMD_ACK_CHECK_EN != 0
    }

    #[inline]
    pub fn ack_exp(&self) -> bool {
        self.0 & CMD_ACK_EXP != 0
    }

    #[inline]
    pub fn ack_value(&self) -> bool {
        self.0 & CMD_ACK_VALUE != 0
    }

    pub fn set_ack_value(&mut self, ack: bool) {
        if ack {
            self.0 |= CMD_ACK_VALUE;
        } else {
            self.0 &= !CMD_ACK_VALUE;
        }
    }

    #[inline]
    pub fn opcode(&self) -> Opcode {
        Opcode::from_bits(((self.0 >> CMD_OPCODE_SHIFT) & CMD_OPCODE_MASK) as u8)
    }

    #[inline]
    pub fn done(&self) -> bool {
        self.0 & CMD_DONE != 0
    }

    pub fn set_done(&mut self) {
        self.0 |= CMD_DONE;
    }
}

#[cfg(test)]
mod tests {
    use super::{Command, CommandSlot, Opcode};

    #[test]
    fn encoded_write_decodes_field_by_field() {
        let word = Command::Write {
            ack_exp: false,
            ack_check_en: true,
            length: 2,
        }
        .encode();

        let mut slot = CommandSlot::default();
        slot.host_write(word);
        assert_eq!(slot.opcode(), Opcode::Write);
        assert_eq!(slot.byte_num(), 2);
        assert!(slot.ack_check_en());
        assert!(!slot.ack_exp());
        assert!(!slot.done());
    }

    #[test]
    fn host_write_clears_done_even_when_bit31_is_set() {
        let mut slot = CommandSlot::reset();
        assert!(slot.done());
        slot.host_write(0x8000_0000 | Command::Stop.encode());
        assert!(!slot.done());
        assert_eq!(slot.opcode(), Opcode::Stop);
        slot.set_done();
        assert!(slot.done());
    }

    #[test]
    fn undefined_opcodes_survive_the_round_trip() {
        let mut slot = CommandSlot::default();
        slot.host_write(6 << 11);
        assert_eq!(slot.opcode(), Opcode::Unknown(6));
    }
}
