// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Wire constants for the command protocol.

/// Positive acknowledgment. Any other byte in its place is a NACK.
pub const ACK: u8 = 0xF5;

/// Clocked out when the master only wants to hear from the slave.
pub const DUMMY: u8 = 0xFF;

// Command codes
pub const COMMAND_LED_CTRL: u8 = 0x50;
pub const COMMAND_SENSOR_READ: u8 = 0x51;
pub const COMMAND_LED_READ: u8 = 0x52;
pub const COMMAND_PRINT: u8 = 0x53;
pub const COMMAND_ID_READ: u8 = 0x54;

// LED control arguments
pub const LED_ON: u8 = 1;
pub const LED_OFF: u8 = 0;
/// Slave pin the status LED hangs off.
pub const LED_PIN: u8 = 9;

// Slave analog inputs
pub const ANALOG_PIN0: u8 = 0;
pub const ANALOG_PIN1: u8 = 1;
pub const ANALOG_PIN2: u8 = 2;
pub const ANALOG_PIN3: u8 = 3;
pub const ANALOG_PIN4: u8 = 4;

/// Longest text a single print command can carry (the length travels in one byte).
pub const MAX_PRINT_LEN: usize = u8::MAX as usize;

/// Commands understood by the slave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Args: pin, value. No reply.
    LedControl,
    /// Args: analog channel. Reply: one byte, 0-255.
    SensorRead,
    /// No args. Reply: one byte, the LED pin level.
    LedRead,
    /// Args: length, then the text.
    Print,
    /// Reply: one identifier byte.
    IdRead,
}

impl Command {
    pub const fn code(self) -> u8 {
        match self {
            Command::LedControl => COMMAND_LED_CTRL,
            Command::SensorRead => COMMAND_SENSOR_READ,
            Command::LedRead => COMMAND_LED_READ,
            Command::Print => COMMAND_PRINT,
            Command::IdRead => COMMAND_ID_READ,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            COMMAND_LED_CTRL => Some(Command::LedControl),
            COMMAND_SENSOR_READ => Some(Command::SensorRead),
            COMMAND_LED_READ => Some(Command::LedRead),
            COMMAND_PRINT => Some(Command::Print),
            COMMAND_ID_READ => Some(Command::IdRead),
            _ => None,
        }
    }
}

/// `true` if `byte` is the positive acknowledgment.
#[inline]
pub const fn is_ack(byte: u8) -> bool {
    byte == ACK
}
