// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Register handles and the bus that reads and writes them.
//!
//! Every register the drivers touch is named by a [`Reg`] value: the peripheral block it lives in
//! plus its byte offset within that block. Drivers never hold raw addresses; they go through a
//! [`RegisterBus`], which on the target is `Mmio` and in host tests is a
//! simulated register file.
//!
//! Offsets and bit positions follow the STM32F407 reference manual (RM0090).

use super::gpio::Port;
use super::spi::Link;

/// Word-wide access to the peripheral register file.
///
/// Methods take `&self` because hardware registers are interior-mutable; ownership of a
/// peripheral is expressed by the driver handles built on top, not by the bus.
pub trait RegisterBus {
    fn read(&self, reg: Reg) -> u32;

    fn write(&self, reg: Reg, value: u32);

    /// Read-modify-write helper.
    #[inline]
    fn modify<F: FnOnce(u32) -> u32>(&self, reg: Reg, f: F) {
        let value = self.read(reg);
        self.write(reg, f(value));
    }
}

impl<T: RegisterBus + ?Sized> RegisterBus for &T {
    #[inline]
    fn read(&self, reg: Reg) -> u32 {
        (**self).read(reg)
    }

    #[inline]
    fn write(&self, reg: Reg, value: u32) {
        (**self).write(reg, value)
    }
}

/// Peripheral register blocks, one per physical instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Block {
    Rcc,
    Gpio(Port),
    Exti,
    Syscfg,
    Nvic,
    Spi(Link),
}

/// A single 32-bit register.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reg {
    Rcc(RccReg),
    Gpio(Port, GpioReg),
    Exti(ExtiReg),
    Syscfg(SyscfgReg),
    Nvic(NvicReg),
    Spi(Link, SpiReg),
}

impl Reg {
    /// The block this register belongs to.
    pub const fn block(self) -> Block {
        match self {
            Reg::Rcc(_) => Block::Rcc,
            Reg::Gpio(port, _) => Block::Gpio(port),
            Reg::Exti(_) => Block::Exti,
            Reg::Syscfg(_) => Block::Syscfg,
            Reg::Nvic(_) => Block::Nvic,
            Reg::Spi(link, _) => Block::Spi(link),
        }
    }

    /// Byte offset from the start of the block.
    pub const fn offset(self) -> usize {
        match self {
            Reg::Rcc(r) => r.offset(),
            Reg::Gpio(_, r) => r.offset(),
            Reg::Exti(r) => r.offset(),
            Reg::Syscfg(r) => r.offset(),
            Reg::Nvic(r) => r.offset(),
            Reg::Spi(_, r) => r.offset(),
        }
    }
}

/// Reset and clock control registers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RccReg {
    Ahb1Rstr,
    Apb1Rstr,
    Apb2Rstr,
    Ahb1Enr,
    Apb1Enr,
    Apb2Enr,
}

impl RccReg {
    const fn offset(self) -> usize {
        match self {
            RccReg::Ahb1Rstr => 0x10,
            RccReg::Apb1Rstr => 0x20,
            RccReg::Apb2Rstr => 0x24,
            RccReg::Ahb1Enr => 0x30,
            RccReg::Apb1Enr => 0x40,
            RccReg::Apb2Enr => 0x44,
        }
    }
}

/// GPIO port registers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioReg {
    Moder,
    Otyper,
    Ospeedr,
    Pupdr,
    Idr,
    Odr,
    /// Alternate-function register, `0` = AFRL (pins 0-7), `1` = AFRH (pins 8-15).
    Afr(u8),
}

impl GpioReg {
    const fn offset(self) -> usize {
        match self {
            GpioReg::Moder => 0x00,
            GpioReg::Otyper => 0x04,
            GpioReg::Ospeedr => 0x08,
            GpioReg::Pupdr => 0x0C,
            GpioReg::Idr => 0x10,
            GpioReg::Odr => 0x14,
            GpioReg::Afr(half) => 0x20 + 4 * (half as usize & 1),
        }
    }
}

/// External interrupt/event controller registers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExtiReg {
    /// Interrupt mask
    Imr,
    /// Rising trigger selection
    Rtsr,
    /// Falling trigger selection
    Ftsr,
    /// Pending (write 1 to clear)
    Pr,
}

impl ExtiReg {
    const fn offset(self) -> usize {
        match self {
            ExtiReg::Imr => 0x00,
            ExtiReg::Rtsr => 0x08,
            ExtiReg::Ftsr => 0x0C,
            ExtiReg::Pr => 0x14,
        }
    }
}

/// System configuration controller registers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyscfgReg {
    /// EXTI port routing, `0..=3` for EXTICR1..EXTICR4.
    Exticr(u8),
}

impl SyscfgReg {
    const fn offset(self) -> usize {
        match self {
            SyscfgReg::Exticr(n) => 0x08 + 4 * (n as usize & 3),
        }
    }
}

/// Nested vectored interrupt controller registers, relative to `0xE000_E100`.
///
/// The payload is the bank (`ISERn`/`ICERn`/...) or, for `Ipr`, the word index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NvicReg {
    /// Interrupt set-enable
    Iser(u8),
    /// Interrupt clear-enable
    Icer(u8),
    /// Interrupt set-pending
    Ispr(u8),
    /// Interrupt clear-pending
    Icpr(u8),
    /// Interrupt priority, four lines per word
    Ipr(u8),
}

impl NvicReg {
    const fn offset(self) -> usize {
        match self {
            NvicReg::Iser(n) => 0x000 + 4 * n as usize,
            NvicReg::Icer(n) => 0x080 + 4 * n as usize,
            NvicReg::Ispr(n) => 0x100 + 4 * n as usize,
            NvicReg::Icpr(n) => 0x180 + 4 * n as usize,
            NvicReg::Ipr(n) => 0x300 + 4 * n as usize,
        }
    }
}

/// SPI registers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiReg {
    Cr1,
    Cr2,
    Sr,
    Dr,
}

impl SpiReg {
    const fn offset(self) -> usize {
        match self {
            SpiReg::Cr1 => 0x00,
            SpiReg::Cr2 => 0x04,
            SpiReg::Sr => 0x08,
            SpiReg::Dr => 0x0C,
        }
    }
}

/// SPI_CR1 bit positions.
pub mod cr1 {
    pub const CPHA: u8 = 0;
    pub const CPOL: u8 = 1;
    pub const MSTR: u8 = 2;
    /// Baud rate divisor, 3 bits wide.
    pub const BR: u8 = 3;
    pub const SPE: u8 = 6;
    pub const SSI: u8 = 8;
    pub const SSM: u8 = 9;
    pub const RXONLY: u8 = 10;
    pub const DFF: u8 = 11;
    pub const BIDIMODE: u8 = 15;
}

/// SPI_CR2 bit positions.
pub mod cr2 {
    pub const SSOE: u8 = 2;
}

/// SPI_SR bit positions.
pub mod sr {
    pub const RXNE: u8 = 0;
    pub const TXE: u8 = 1;
    pub const CHSIDE: u8 = 2;
    pub const UDR: u8 = 3;
    pub const CRCERR: u8 = 4;
    pub const MODF: u8 = 5;
    pub const OVR: u8 = 6;
    pub const BSY: u8 = 7;
    pub const FRE: u8 = 8;
}
