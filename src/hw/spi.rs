// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Serial Peripheral Interface (SPI) driver.
//!
//! - [`Spi`] drives one SPI instance. It starts [`Disabled`], where it may be configured, and
//!   becomes [`Enabled`] for transfers; configuration is not reachable while enabled.
//! - [`Spi::send`] and [`Spi::receive`] are blocking and move one frame per TXE/RXNE observation.
//!   By default they wait forever for the flag; [`PollBudget::Spins`] bounds the wait and turns an
//!   unresponsive peripheral into [`Error::Timeout`].
//! - Every byte sent on a full-duplex link also clocks one byte in. `send` leaves that byte in the
//!   data register; callers that care drain it with `receive`.
//!
//! Example:
//! ```ignore
//! let mut spi = Spi::new(Mmio, Link::Spi2);
//! spi.configure(&SpiConfig::default().clock_divisor(ClockDivisor::Div8));
//! let mut spi = spi.enable();
//! spi.send(b"Hello world")?;
//! spi.wait_idle()?;
//! let spi = spi.disable();
//! ```

use core::marker::PhantomData;

use embedded_hal::spi::{self as hal_spi, ErrorKind, Mode, Phase, Polarity, MODE_0};

use super::exti::IrqLine;
use super::field;
use super::rcc::{self, Peripheral};
use super::regs::{cr1, cr2, sr, Reg, RegisterBus, SpiReg};
use crate::log;

/// SPI instances of the STM32F407.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Link {
    Spi1,
    Spi2,
    Spi3,
}

impl Link {
    /// Global interrupt line of the instance.
    pub const fn irq(self) -> IrqLine {
        match self {
            Link::Spi1 => IrqLine::SPI1,
            Link::Spi2 => IrqLine::SPI2,
            Link::Spi3 => IrqLine::SPI3,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    #[default]
    Master,
    Slave,
}

/// Line topology.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusConfig {
    #[default]
    FullDuplex,
    /// One bidirectional data line.
    HalfDuplex,
    /// Two lines, receive only.
    SimplexRxOnly,
}

/// SCK = f_PCLK / divisor.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockDivisor {
    Div2,
    Div4,
    #[default]
    Div8,
    Div16,
    Div32,
    Div64,
    Div128,
    Div256,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameWidth {
    #[default]
    Bits8,
    Bits16,
}

/// Slave-select management.
///
/// `Software` drives the internal NSS from SSI, which is held high on a master so the link
/// never sees a competing master. `Hardware` uses the NSS pin; a master then drives it through
/// the SS output enable.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlaveSelect {
    #[default]
    Software,
    Hardware,
}

/// How long a blocking call polls a status flag before giving up.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollBudget {
    /// Spin until the flag changes, however long that takes.
    #[default]
    Unbounded,
    /// Give up after this many unsuccessful re-polls.
    Spins(u32),
}

/// Link configuration, applied with [`Spi::configure`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SpiConfig {
    pub role: Role,
    pub bus: BusConfig,
    pub clock_divisor: ClockDivisor,
    pub frame_width: FrameWidth,
    pub mode: Mode,
    pub slave_select: SlaveSelect,
    pub poll_budget: PollBudget,
}

impl Default for SpiConfig {
    /// Full-duplex 8-bit master, SCK = PCLK/8, mode 0, software slave select, unbounded polling.
    fn default() -> Self {
        Self {
            role: Role::Master,
            bus: BusConfig::FullDuplex,
            clock_divisor: ClockDivisor::Div8,
            frame_width: FrameWidth::Bits8,
            mode: MODE_0,
            slave_select: SlaveSelect::Software,
            poll_budget: PollBudget::Unbounded,
        }
    }
}

impl SpiConfig {
    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    #[must_use]
    pub fn bus(mut self, bus: BusConfig) -> Self {
        self.bus = bus;
        self
    }

    #[must_use]
    pub fn clock_divisor(mut self, divisor: ClockDivisor) -> Self {
        self.clock_divisor = divisor;
        self
    }

    #[must_use]
    pub fn frame_width(mut self, width: FrameWidth) -> Self {
        self.frame_width = width;
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn slave_select(mut self, slave_select: SlaveSelect) -> Self {
        self.slave_select = slave_select;
        self
    }

    #[must_use]
    pub fn poll_budget(mut self, budget: PollBudget) -> Self {
        self.poll_budget = budget;
        self
    }

    /// SPI_CR1 image for this configuration, with SPE clear.
    pub fn cr1(&self) -> u32 {
        let master = self.role == Role::Master;
        let software_ss = self.slave_select == SlaveSelect::Software;

        let mut w = 0;
        w = field::set_bit(w, cr1::MSTR, master);
        match self.bus {
            BusConfig::FullDuplex => {}
            BusConfig::HalfDuplex => w = field::set_bit(w, cr1::BIDIMODE, true),
            BusConfig::SimplexRxOnly => w = field::set_bit(w, cr1::RXONLY, true),
        }
        w = field::update(w, self.clock_divisor as u32, 3, cr1::BR);
        w = field::set_bit(w, cr1::DFF, self.frame_width == FrameWidth::Bits16);
        w = field::set_bit(w, cr1::CPOL, self.mode.polarity == Polarity::IdleHigh);
        w = field::set_bit(
            w,
            cr1::CPHA,
            self.mode.phase == Phase::CaptureOnSecondTransition,
        );
        w = field::set_bit(w, cr1::SSM, software_ss);
        w = field::set_bit(w, cr1::SSI, software_ss && master);
        w
    }

    /// Whether the SS output must be enabled (hardware slave select on a master).
    pub fn ss_output(&self) -> bool {
        self.role == Role::Master && self.slave_select == SlaveSelect::Hardware
    }
}

/// SPI_SR flags.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Flag {
    RxNotEmpty,
    TxEmpty,
    ChannelSide,
    Underrun,
    CrcError,
    ModeFault,
    Overrun,
    Busy,
    FrameError,
}

impl Flag {
    const fn bit(self) -> u8 {
        match self {
            Flag::RxNotEmpty => sr::RXNE,
            Flag::TxEmpty => sr::TXE,
            Flag::ChannelSide => sr::CHSIDE,
            Flag::Underrun => sr::UDR,
            Flag::CrcError => sr::CRCERR,
            Flag::ModeFault => sr::MODF,
            Flag::Overrun => sr::OVR,
            Flag::Busy => sr::BSY,
            Flag::FrameError => sr::FRE,
        }
    }
}

/// SPI error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The poll budget ran out while waiting on this flag.
    Timeout(Flag),
    /// A 16-bit link was given an odd number of bytes.
    FrameMisaligned,
}

impl hal_spi::Error for Error {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Blocking byte transport used by the command protocol.
pub trait SerialLink {
    type Error;

    /// Shift out every byte of `bytes`.
    fn send(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Fill `buf` with received bytes.
    fn receive(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;
}

/// Type state: peripheral disabled, configuration allowed.
pub struct Disabled;

/// Type state: peripheral enabled, transfers allowed.
pub struct Enabled;

/// SPI driver for one instance.
pub struct Spi<B, STATE = Disabled> {
    bus: B,
    link: Link,
    budget: PollBudget,
    _state: PhantomData<STATE>,
}

impl<B: RegisterBus, STATE> Spi<B, STATE> {
    #[inline]
    pub fn link(&self) -> Link {
        self.link
    }

    /// Current state of one status flag.
    pub fn status(&self, flag: Flag) -> bool {
        field::is_set(self.read(SpiReg::Sr), flag.bit())
    }

    /// Drive the internal slave select (SSI). Only meaningful with software slave select.
    pub fn set_software_slave_select(&self, on: bool) {
        self.bus
            .modify(self.reg(SpiReg::Cr1), |w| field::set_bit(w, cr1::SSI, on));
    }

    /// Enable the NSS output (SSOE). Only meaningful with hardware slave select.
    pub fn set_hardware_select_output(&self, on: bool) {
        self.bus
            .modify(self.reg(SpiReg::Cr2), |w| field::set_bit(w, cr2::SSOE, on));
    }

    /// Frame width as currently programmed in CR1.
    pub fn frame_width(&self) -> FrameWidth {
        if field::is_set(self.read(SpiReg::Cr1), cr1::DFF) {
            FrameWidth::Bits16
        } else {
            FrameWidth::Bits8
        }
    }

    pub fn free(self) -> B {
        self.bus
    }

    #[inline]
    fn reg(&self, reg: SpiReg) -> Reg {
        Reg::Spi(self.link, reg)
    }

    #[inline]
    fn read(&self, reg: SpiReg) -> u32 {
        self.bus.read(self.reg(reg))
    }

    fn into_state<S>(self) -> Spi<B, S> {
        Spi {
            bus: self.bus,
            link: self.link,
            budget: self.budget,
            _state: PhantomData,
        }
    }
}

impl<B: RegisterBus> Spi<B, Disabled> {
    pub fn new(bus: B, link: Link) -> Self {
        Self {
            bus,
            link,
            budget: PollBudget::Unbounded,
            _state: PhantomData,
        }
    }

    /// Gate the peripheral clock. Enabling twice does nothing.
    pub fn enable_clock(&self, on: bool) {
        rcc::set_clock(&self.bus, Peripheral::Spi(self.link), on);
    }

    /// Return every register of the instance to its reset value.
    pub fn reset(&self) {
        rcc::reset(&self.bus, Peripheral::Spi(self.link));
    }

    /// Program the link. Enables the peripheral clock, then assigns CR1 in one write.
    pub fn configure(&mut self, config: &SpiConfig) {
        log::debug!(
            "spi: configure {} role={} bus={} div={} width={} ss={}",
            self.link,
            config.role,
            config.bus,
            config.clock_divisor,
            config.frame_width,
            config.slave_select
        );

        self.enable_clock(true);
        self.bus.write(self.reg(SpiReg::Cr1), config.cr1());
        self.set_hardware_select_output(config.ss_output());
        self.budget = config.poll_budget;
    }

    /// Set SPE.
    pub fn enable(self) -> Spi<B, Enabled> {
        self.bus
            .modify(self.reg(SpiReg::Cr1), |w| field::set_bit(w, cr1::SPE, true));
        self.into_state()
    }
}

impl<B: RegisterBus> Spi<B, Enabled> {
    /// Clear SPE. Call [`wait_idle`](Self::wait_idle) first to let the last frame finish.
    pub fn disable(self) -> Spi<B, Disabled> {
        self.bus
            .modify(self.reg(SpiReg::Cr1), |w| field::set_bit(w, cr1::SPE, false));
        self.into_state()
    }

    /// Write one frame if the transmit buffer is empty.
    pub fn write_frame(&self, frame: u16) -> nb::Result<(), Error> {
        if !self.status(Flag::TxEmpty) {
            return Err(nb::Error::WouldBlock);
        }
        self.bus.write(self.reg(SpiReg::Dr), frame as u32);
        Ok(())
    }

    /// Read one frame if the receive buffer holds one.
    pub fn read_frame(&self) -> nb::Result<u16, Error> {
        if !self.status(Flag::RxNotEmpty) {
            return Err(nb::Error::WouldBlock);
        }
        Ok(self.read(SpiReg::Dr) as u16)
    }

    /// Blocking send. In 16-bit mode bytes are taken in little-endian pairs.
    pub fn send(&mut self, bytes: &[u8]) -> Result<(), Error> {
        match self.frame_width() {
            FrameWidth::Bits8 => {
                for &byte in bytes {
                    self.block(Flag::TxEmpty, |spi| spi.write_frame(byte as u16))?;
                }
            }
            FrameWidth::Bits16 => {
                if bytes.len() % 2 != 0 {
                    return Err(Error::FrameMisaligned);
                }
                for pair in bytes.chunks_exact(2) {
                    if let [lo, hi] = *pair {
                        let frame = u16::from_le_bytes([lo, hi]);
                        self.block(Flag::TxEmpty, |spi| spi.write_frame(frame))?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Blocking receive into `buf`. In 16-bit mode each frame fills two bytes, little-endian.
    pub fn receive(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        match self.frame_width() {
            FrameWidth::Bits8 => {
                for byte in buf.iter_mut() {
                    *byte = self.block(Flag::RxNotEmpty, Self::read_frame)? as u8;
                }
            }
            FrameWidth::Bits16 => {
                if buf.len() % 2 != 0 {
                    return Err(Error::FrameMisaligned);
                }
                for pair in buf.chunks_exact_mut(2) {
                    let frame = self.block(Flag::RxNotEmpty, Self::read_frame)?;
                    pair.copy_from_slice(&frame.to_le_bytes());
                }
            }
        }
        Ok(())
    }

    /// Full-duplex exchange of one byte.
    pub fn transfer_byte(&mut self, byte: u8) -> Result<u8, Error> {
        let mut rx = [0u8];
        self.send(&[byte])?;
        self.receive(&mut rx)?;
        Ok(rx[0])
    }

    /// Block until the busy flag clears.
    pub fn wait_idle(&mut self) -> Result<(), Error> {
        self.block(Flag::Busy, |spi| {
            if spi.status(Flag::Busy) {
                Err(nb::Error::WouldBlock)
            } else {
                Ok(())
            }
        })
    }

    /// Re-poll `f` until it stops returning `WouldBlock`, within the poll budget.
    fn block<T>(
        &self,
        flag: Flag,
        mut f: impl FnMut(&Self) -> nb::Result<T, Error>,
    ) -> Result<T, Error> {
        let mut spins: u32 = 0;
        loop {
            match f(self) {
                Ok(value) => return Ok(value),
                Err(nb::Error::Other(e)) => return Err(e),
                Err(nb::Error::WouldBlock) => {}
            }
            if let PollBudget::Spins(max) = self.budget {
                if spins >= max {
                    log::warn!("spi: {} timed out on {}", self.link, flag);
                    return Err(Error::Timeout(flag));
                }
                spins += 1;
            }
            core::hint::spin_loop();
        }
    }
}

impl<B: RegisterBus> SerialLink for Spi<B, Enabled> {
    type Error = Error;

    fn send(&mut self, bytes: &[u8]) -> Result<(), Error> {
        Spi::send(self, bytes)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        Spi::receive(self, buf)
    }
}

impl<B: RegisterBus> hal_spi::ErrorType for Spi<B, Enabled> {
    type Error = Error;
}

/// Byte-wise full-duplex bus. Reads clock out `0x00`.
impl<B: RegisterBus> hal_spi::SpiBus<u8> for Spi<B, Enabled> {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Error> {
        for word in words.iter_mut() {
            *word = self.transfer_byte(0x00)?;
        }
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Error> {
        for &word in words {
            self.transfer_byte(word)?;
        }
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Error> {
        for i in 0..read.len().max(write.len()) {
            let rx = self.transfer_byte(write.get(i).copied().unwrap_or(0x00))?;
            if let Some(slot) = read.get_mut(i) {
                *slot = rx;
            }
        }
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Error> {
        for word in words.iter_mut() {
            *word = self.transfer_byte(*word)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.wait_idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::regs::RccReg;
    use crate::hw::sim::{SimBus, Wire};
    use embedded_hal::spi::{SpiBus, MODE_3};

    fn cr1_of(bus: &SimBus, link: Link) -> u32 {
        bus.peek(Reg::Spi(link, SpiReg::Cr1))
    }

    #[test]
    fn default_config_packs_master_div8_software_ss() {
        let bus = SimBus::new();
        let mut spi = Spi::new(&bus, Link::Spi2);
        spi.configure(&SpiConfig::default());

        let expected = (1 << cr1::MSTR) | (2 << cr1::BR) | (1 << cr1::SSM) | (1 << cr1::SSI);
        assert_eq!(bus.writes_to(Reg::Spi(Link::Spi2, SpiReg::Cr1)), vec![expected]);
        assert_eq!(bus.peek(Reg::Rcc(RccReg::Apb1Enr)), 1 << 14);
        assert_eq!(bus.peek(Reg::Spi(Link::Spi2, SpiReg::Cr2)), 0);
    }

    #[test]
    fn configure_overwrites_previous_contents() {
        let bus = SimBus::new();
        bus.poke(Reg::Spi(Link::Spi1, SpiReg::Cr1), 0xFFFF);
        let mut spi = Spi::new(&bus, Link::Spi1);
        spi.configure(&SpiConfig::default().role(Role::Slave));
        assert_eq!(cr1_of(&bus, Link::Spi1), (2 << cr1::BR) | (1 << cr1::SSM));
    }

    #[test]
    fn bus_topology_bits() {
        let half = SpiConfig::default().bus(BusConfig::HalfDuplex).cr1();
        assert!(field::is_set(half, cr1::BIDIMODE));
        assert!(!field::is_set(half, cr1::RXONLY));

        let rx_only = SpiConfig::default().bus(BusConfig::SimplexRxOnly).cr1();
        assert!(!field::is_set(rx_only, cr1::BIDIMODE));
        assert!(field::is_set(rx_only, cr1::RXONLY));

        let full = SpiConfig::default().cr1();
        assert!(!field::is_set(full, cr1::BIDIMODE));
        assert!(!field::is_set(full, cr1::RXONLY));
    }

    #[test]
    fn mode_divisor_and_width_bits() {
        let w = SpiConfig::default()
            .mode(MODE_3)
            .clock_divisor(ClockDivisor::Div256)
            .frame_width(FrameWidth::Bits16)
            .cr1();
        assert!(field::is_set(w, cr1::CPOL));
        assert!(field::is_set(w, cr1::CPHA));
        assert!(field::is_set(w, cr1::DFF));
        assert_eq!(field::decode(w, 3, cr1::BR), 7);
    }

    #[test]
    fn hardware_slave_select_enables_ss_output_on_master() {
        let bus = SimBus::new();
        let mut spi = Spi::new(&bus, Link::Spi2);
        spi.configure(&SpiConfig::default().slave_select(SlaveSelect::Hardware));

        let cr1 = cr1_of(&bus, Link::Spi2);
        assert!(!field::is_set(cr1, cr1::SSM));
        assert!(!field::is_set(cr1, cr1::SSI));
        assert_eq!(bus.peek(Reg::Spi(Link::Spi2, SpiReg::Cr2)), 1 << cr2::SSOE);
    }

    #[test]
    fn slave_select_controls_are_independent() {
        let bus = SimBus::new();
        let spi = Spi::new(&bus, Link::Spi3);
        spi.set_software_slave_select(true);
        spi.set_hardware_select_output(true);
        spi.set_software_slave_select(false);
        assert_eq!(cr1_of(&bus, Link::Spi3), 0);
        assert_eq!(bus.peek(Reg::Spi(Link::Spi3, SpiReg::Cr2)), 1 << cr2::SSOE);
    }

    #[test]
    fn enable_and_disable_toggle_spe_only() {
        let bus = SimBus::new();
        let mut spi = Spi::new(&bus, Link::Spi2);
        spi.configure(&SpiConfig::default());
        let before = cr1_of(&bus, Link::Spi2);

        let spi = spi.enable();
        assert_eq!(cr1_of(&bus, Link::Spi2), before | (1 << cr1::SPE));
        let _spi = spi.disable();
        assert_eq!(cr1_of(&bus, Link::Spi2), before);
    }

    #[test]
    fn loopback_returns_bytes_in_order() {
        let bus = SimBus::new();
        let mut spi = Spi::new(&bus, Link::Spi1);
        spi.configure(&SpiConfig::default());
        let mut spi = spi.enable();

        let data = b"Hello world";
        spi.send(data).unwrap();
        let mut back = [0u8; 11];
        spi.receive(&mut back).unwrap();

        assert_eq!(&back, data);
        assert_eq!(bus.sent().len(), data.len());
    }

    #[test]
    fn sixteen_bit_frames_pack_little_endian() {
        let bus = SimBus::new();
        let mut spi = Spi::new(&bus, Link::Spi1);
        spi.configure(&SpiConfig::default().frame_width(FrameWidth::Bits16));
        let mut spi = spi.enable();

        spi.send(&[0x34, 0x12, 0x78, 0x56]).unwrap();
        assert_eq!(bus.sent(), vec![0x1234, 0x5678]);

        let mut back = [0u8; 4];
        spi.receive(&mut back).unwrap();
        assert_eq!(back, [0x34, 0x12, 0x78, 0x56]);

        assert_eq!(spi.send(&[1, 2, 3]), Err(Error::FrameMisaligned));
    }

    #[test]
    fn stalled_link_times_out_with_a_budget() {
        let bus = SimBus::with_wire(Wire::Stalled);
        let mut spi = Spi::new(&bus, Link::Spi2);
        spi.configure(&SpiConfig::default().poll_budget(PollBudget::Spins(16)));
        let mut spi = spi.enable();

        assert_eq!(spi.send(&[0x50]), Err(Error::Timeout(Flag::TxEmpty)));
        let mut buf = [0u8; 1];
        assert_eq!(spi.receive(&mut buf), Err(Error::Timeout(Flag::RxNotEmpty)));
        assert!(bus.sent().is_empty());
    }

    #[test]
    fn status_reflects_the_status_register() {
        let bus = SimBus::new();
        let mut spi = Spi::new(&bus, Link::Spi2);
        spi.configure(&SpiConfig::default());
        let mut spi = spi.enable();

        assert!(spi.status(Flag::TxEmpty));
        assert!(!spi.status(Flag::RxNotEmpty));
        spi.send(&[0xAA]).unwrap();
        assert!(spi.status(Flag::RxNotEmpty));
        assert!(!spi.status(Flag::Busy));
        spi.wait_idle().unwrap();
    }

    #[test]
    fn wait_idle_times_out_while_busy() {
        let bus = SimBus::new();
        let mut spi = Spi::new(&bus, Link::Spi2);
        spi.configure(&SpiConfig::default().poll_budget(PollBudget::Spins(4)));
        let mut spi = spi.enable();

        bus.hold_busy(true);
        assert!(spi.status(Flag::Busy));
        assert_eq!(spi.wait_idle(), Err(Error::Timeout(Flag::Busy)));
        assert_eq!(SpiBus::flush(&mut spi), Err(Error::Timeout(Flag::Busy)));

        bus.hold_busy(false);
        assert_eq!(spi.wait_idle(), Ok(()));
    }

    #[test]
    fn embedded_hal_transfer_reads_slave_bytes() {
        let bus = SimBus::slave(&[0x11, 0x22, 0x33]);
        let mut spi = Spi::new(&bus, Link::Spi2);
        spi.configure(&SpiConfig::default());
        let mut spi = spi.enable();

        let mut read = [0u8; 2];
        SpiBus::transfer(&mut spi, &mut read, &[0xA0, 0xA1, 0xA2]).unwrap();
        assert_eq!(read, [0x11, 0x22]);
        assert_eq!(bus.sent(), vec![0xA0, 0xA1, 0xA2]);

        SpiBus::flush(&mut spi).unwrap();
    }

    #[test]
    fn links_map_to_their_interrupt_lines() {
        assert_eq!(Link::Spi1.irq().get(), 35);
        assert_eq!(Link::Spi3.irq().get(), 51);
    }
}
