// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! External interrupt routing: EXTI edge detection, SYSCFG port selection and the NVIC.
//!
//! A pin in interrupt mode moves through two states: idle, and pending once its edge is seen on
//! the wire. The handler must call [`InterruptRouter::acknowledge_and_clear`] before returning,
//! otherwise the latched line re-enters the handler immediately. A second edge while pending is
//! not queued.
//!
//! Handlers are registered in a [`HandlerTable`] at setup time and dispatched from the vector
//! stub of the corresponding NVIC line.

use super::field;
use super::gpio::{Edge, PinIndex, Port};
use super::rcc::{self, Peripheral};
use super::regs::{ExtiReg, NvicReg, Reg, RegisterBus, SyscfgReg};
use crate::log;

/// Number of priority bits implemented per NVIC priority byte (upper nibble).
pub const PRIORITY_BITS: u8 = 4;

/// Number of external interrupt lines in the STM32F407 vector table.
pub const IRQ_COUNT: usize = 82;

/// NVIC interrupt line (position in the vector table, not counting system exceptions).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IrqLine(u8);

impl IrqLine {
    pub const EXTI0: Self = Self(6);
    pub const EXTI1: Self = Self(7);
    pub const EXTI2: Self = Self(8);
    pub const EXTI3: Self = Self(9);
    pub const EXTI4: Self = Self(10);
    pub const EXTI9_5: Self = Self(23);
    pub const SPI1: Self = Self(35);
    pub const SPI2: Self = Self(36);
    pub const EXTI15_10: Self = Self(40);
    pub const SPI3: Self = Self(51);

    /// The Cortex-M4 NVIC addresses at most 240 lines.
    pub const fn new(n: u8) -> Option<Self> {
        if n < 240 {
            Some(Self(n))
        } else {
            None
        }
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Enable/pending register bank and bit.
    #[inline]
    const fn bank(self) -> (u8, u8) {
        (self.0 / 32, self.0 % 32)
    }
}

/// NVIC line that serves the EXTI line of `pin`.
pub const fn irq_for_pin(pin: PinIndex) -> IrqLine {
    match pin.get() {
        0 => IrqLine::EXTI0,
        1 => IrqLine::EXTI1,
        2 => IrqLine::EXTI2,
        3 => IrqLine::EXTI3,
        4 => IrqLine::EXTI4,
        5..=9 => IrqLine::EXTI9_5,
        _ => IrqLine::EXTI15_10,
    }
}

/// Interrupt priority, `0` (highest) to `15` (lowest).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Priority(u8);

impl Priority {
    pub const HIGHEST: Self = Self(0);
    pub const LOWEST: Self = Self((1 << PRIORITY_BITS) - 1);

    pub const fn new(level: u8) -> Option<Self> {
        if level < (1 << PRIORITY_BITS) {
            Some(Self(level))
        } else {
            None
        }
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// EXTI/SYSCFG/NVIC driver.
pub struct InterruptRouter<B> {
    bus: B,
}

impl<B: RegisterBus> InterruptRouter<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn free(self) -> B {
        self.bus
    }

    /// Connect `port`'s `pin` to its EXTI line: edge selection, SYSCFG routing and unmask.
    pub fn route(&self, port: Port, pin: PinIndex, edge: Edge) {
        let n = pin.get();
        log::debug!("exti: route P{}{} on {}", port, n, edge);

        self.set_edge(pin, edge);

        rcc::set_clock(&self.bus, Peripheral::Syscfg, true);
        self.bus.modify(Reg::Syscfg(SyscfgReg::Exticr(n / 4)), |w| {
            field::update(w, port.index() as u32, 4, 4 * (n % 4))
        });

        self.set_masked(pin, false);
    }

    /// Select which edge(s) set the line's pending bit; the other edge is cleared.
    pub fn set_edge(&self, pin: PinIndex, edge: Edge) {
        let n = pin.get();
        self.bus.modify(Reg::Exti(ExtiReg::Rtsr), |w| {
            field::set_bit(w, n, edge.rising())
        });
        self.bus.modify(Reg::Exti(ExtiReg::Ftsr), |w| {
            field::set_bit(w, n, edge.falling())
        });
    }

    /// Mask or unmask the line's interrupt request towards the NVIC.
    pub fn set_masked(&self, pin: PinIndex, masked: bool) {
        self.bus.modify(Reg::Exti(ExtiReg::Imr), |w| {
            field::set_bit(w, pin.get(), !masked)
        });
    }

    pub fn is_pending(&self, pin: PinIndex) -> bool {
        field::is_set(self.bus.read(Reg::Exti(ExtiReg::Pr)), pin.get())
    }

    /// Clear the line's pending bit if it is set. Returns whether it was pending.
    ///
    /// The pending register is write-one-to-clear, so only this line's bit is written.
    pub fn acknowledge_and_clear(&self, pin: PinIndex) -> bool {
        if !self.is_pending(pin) {
            return false;
        }
        self.bus.write(Reg::Exti(ExtiReg::Pr), field::bit(pin.get()));
        true
    }

    /// Enable or disable an NVIC line.
    pub fn set_line_enabled(&self, line: IrqLine, on: bool) {
        log::debug!("nvic: line {} enabled={}", line.get(), on);
        let (bank, bit) = line.bank();
        let reg = if on {
            NvicReg::Iser(bank)
        } else {
            NvicReg::Icer(bank)
        };
        self.bus.write(Reg::Nvic(reg), field::bit(bit));
    }

    pub fn is_line_enabled(&self, line: IrqLine) -> bool {
        let (bank, bit) = line.bank();
        field::is_set(self.bus.read(Reg::Nvic(NvicReg::Iser(bank))), bit)
    }

    /// Force or clear the NVIC pending state of a line.
    pub fn set_line_pending(&self, line: IrqLine, on: bool) {
        let (bank, bit) = line.bank();
        let reg = if on {
            NvicReg::Ispr(bank)
        } else {
            NvicReg::Icpr(bank)
        };
        self.bus.write(Reg::Nvic(reg), field::bit(bit));
    }

    /// Program a line's priority. Only the upper [`PRIORITY_BITS`] of each priority byte exist,
    /// so the value is left-justified into them; the other three lines of the word are kept.
    pub fn set_priority(&self, line: IrqLine, priority: Priority) {
        let (word, offset) = Self::priority_field(line);
        self.bus.modify(Reg::Nvic(NvicReg::Ipr(word)), |w| {
            field::update(w, priority.get() as u32, PRIORITY_BITS, offset)
        });
    }

    pub fn priority(&self, line: IrqLine) -> Priority {
        let (word, offset) = Self::priority_field(line);
        let raw = field::decode(
            self.bus.read(Reg::Nvic(NvicReg::Ipr(word))),
            PRIORITY_BITS,
            offset,
        );
        Priority(raw as u8)
    }

    const fn priority_field(line: IrqLine) -> (u8, u8) {
        let n = line.get();
        (n / 4, 8 * (n % 4) + (8 - PRIORITY_BITS))
    }
}

pub type Handler = fn();

/// The line does not fit in the handler table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineOutOfRange(pub IrqLine);

/// Interrupt line to handler mapping, filled at setup time.
///
/// The runtime's vector stub for a line calls [`HandlerTable::dispatch`] with that line.
pub struct HandlerTable<const N: usize = IRQ_COUNT> {
    handlers: [Option<Handler>; N],
}

impl<const N: usize> HandlerTable<N> {
    pub const fn new() -> Self {
        Self {
            handlers: [None; N],
        }
    }

    /// Install `handler` for `line`, replacing any previous one.
    pub fn register(&mut self, line: IrqLine, handler: Handler) -> Result<(), LineOutOfRange> {
        let slot = self
            .handlers
            .get_mut(line.get() as usize)
            .ok_or(LineOutOfRange(line))?;
        *slot = Some(handler);
        Ok(())
    }

    pub fn unregister(&mut self, line: IrqLine) -> Option<Handler> {
        self.handlers.get_mut(line.get() as usize)?.take()
    }

    /// Run the handler for `line`. Returns `false` if none is registered.
    pub fn dispatch(&self, line: IrqLine) -> bool {
        match self.handlers.get(line.get() as usize).copied().flatten() {
            Some(handler) => {
                handler();
                true
            }
            None => {
                log::warn!("irq: no handler for line {}", line.get());
                false
            }
        }
    }
}

impl<const N: usize> Default for HandlerTable<N> {
    fn default() -> Self {
        Self::new()
    }
}
