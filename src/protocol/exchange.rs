// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Master side of the command/acknowledgment exchange.
//!
//! Every exchange starts the same way:
//!
//! 1. send the command code and drain the byte that came back with it;
//! 2. send [`DUMMY`] and read the slave's acknowledgment.
//!
//! On [`ACK`](super::messages::ACK) the command's arguments follow; any other byte aborts the
//! exchange with [`Error::Nack`] before an argument is sent. Commands with a reply then wait for
//! the settling time and clock the reply out with one more dummy byte.
//!
//! The link is full duplex, so each byte sent is paired with exactly one byte received. The
//! client keeps that pairing for argument bytes too, leaving nothing stale in the receive buffer
//! for the next exchange. Nothing is retried here.

use embedded_hal::delay::DelayNs;

use super::messages::{self, Command, DUMMY, MAX_PRINT_LEN};
use crate::hw::spi::SerialLink;
use crate::log;

/// Wait between sending a read request and fetching its reply.
pub const DEFAULT_SETTLE_US: u32 = 200_000;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The underlying link failed.
    Link(E),
    /// The slave answered the command with this byte instead of an ACK.
    Nack(u8),
    /// Text longer than [`MAX_PRINT_LEN`]; nothing was sent.
    TextTooLong(usize),
}

/// Issues commands to one slave over a [`SerialLink`].
pub struct CommandClient<L, D> {
    link: L,
    delay: D,
    settle_us: u32,
}

impl<L: SerialLink, D: DelayNs> CommandClient<L, D> {
    pub fn new(link: L, delay: D) -> Self {
        Self {
            link,
            delay,
            settle_us: DEFAULT_SETTLE_US,
        }
    }

    /// Override the settling time used before fetching a reply.
    #[must_use]
    pub fn settle_time_us(mut self, us: u32) -> Self {
        self.settle_us = us;
        self
    }

    /// Drive a slave pin; `value` is [`LED_ON`](messages::LED_ON) or [`LED_OFF`](messages::LED_OFF).
    ///
    /// The slave sends nothing meaningful back, but the byte clocked in with each argument is
    /// still read and dropped so the receive buffer is empty for the next exchange.
    pub fn led_control(&mut self, pin: u8, value: u8) -> Result<(), Error<L::Error>> {
        self.command(Command::LedControl)?;
        self.write(&[pin, value])
    }

    /// Sample one analog channel of the slave.
    pub fn sensor_read(&mut self, channel: u8) -> Result<u8, Error<L::Error>> {
        self.command(Command::SensorRead)?;
        self.write(&[channel])?;
        self.fetch()
    }

    /// Read back the level of the slave's LED pin.
    pub fn led_read(&mut self) -> Result<u8, Error<L::Error>> {
        self.command(Command::LedRead)?;
        self.fetch()
    }

    /// Send `text` to the slave for display, prefixed by its length.
    pub fn print(&mut self, text: &[u8]) -> Result<(), Error<L::Error>> {
        if text.len() > MAX_PRINT_LEN {
            return Err(Error::TextTooLong(text.len()));
        }

        self.command(Command::Print)?;
        self.write(&[text.len() as u8])?;
        self.write(text)
    }

    pub fn id_read(&mut self) -> Result<u8, Error<L::Error>> {
        self.command(Command::IdRead)?;
        self.fetch()
    }

    /// Send a command code and collect its acknowledgment.
    pub fn command(&mut self, command: Command) -> Result<(), Error<L::Error>> {
        log::debug!("cmd: {} (0x{:02x})", command, command.code());

        self.exchange(command.code())?;
        let ack = self.exchange(DUMMY)?;
        if messages::is_ack(ack) {
            Ok(())
        } else {
            log::warn!("cmd: {} rejected with 0x{:02x}", command, ack);
            Err(Error::Nack(ack))
        }
    }

    pub fn free(self) -> (L, D) {
        (self.link, self.delay)
    }

    /// Send each byte, discarding what comes back.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Error<L::Error>> {
        for &byte in bytes {
            self.exchange(byte)?;
        }
        Ok(())
    }

    /// Let the slave prepare its reply, then clock it out.
    fn fetch(&mut self) -> Result<u8, Error<L::Error>> {
        self.delay.delay_us(self.settle_us);
        self.exchange(DUMMY)
    }

    fn exchange(&mut self, byte: u8) -> Result<u8, Error<L::Error>> {
        let mut rx = [0u8];
        self.link.send(&[byte]).map_err(Error::Link)?;
        self.link.receive(&mut rx).map_err(Error::Link)?;
        Ok(rx[0])
    }
}
