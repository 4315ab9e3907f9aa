// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Peripheral clock gating and reset.
//!
//! Each peripheral instance maps to one enable bit and one reset bit through [`Peripheral::gate`],
//! so selecting an instance is a single lookup. Clock-enable bits are plain set/clear and are not
//! reference counted; callers sharing a port must serialize enable/disable themselves.

use super::field;
use super::gpio::Port;
use super::regs::{RccReg, Reg, RegisterBus};
use super::spi::Link;
use crate::log;

/// Peripheral instances with an RCC clock gate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Peripheral {
    Gpio(Port),
    Syscfg,
    Spi(Link),
}

/// Location of a peripheral's enable and reset bits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Gate {
    pub enable: RccReg,
    pub reset: RccReg,
    pub bit: u8,
}

impl Peripheral {
    pub const fn gate(self) -> Gate {
        match self {
            Peripheral::Gpio(port) => Gate {
                enable: RccReg::Ahb1Enr,
                reset: RccReg::Ahb1Rstr,
                bit: port.index(),
            },
            Peripheral::Syscfg => Gate {
                enable: RccReg::Apb2Enr,
                reset: RccReg::Apb2Rstr,
                bit: 14,
            },
            Peripheral::Spi(Link::Spi1) => Gate {
                enable: RccReg::Apb2Enr,
                reset: RccReg::Apb2Rstr,
                bit: 12,
            },
            Peripheral::Spi(Link::Spi2) => Gate {
                enable: RccReg::Apb1Enr,
                reset: RccReg::Apb1Rstr,
                bit: 14,
            },
            Peripheral::Spi(Link::Spi3) => Gate {
                enable: RccReg::Apb1Enr,
                reset: RccReg::Apb1Rstr,
                bit: 15,
            },
        }
    }
}

/// Turn the peripheral clock on or off. Idempotent.
pub fn set_clock<B: RegisterBus>(bus: &B, peripheral: Peripheral, on: bool) {
    let gate = peripheral.gate();
    bus.modify(Reg::Rcc(gate.enable), |w| field::set_bit(w, gate.bit, on));
}

pub fn is_clock_enabled<B: RegisterBus>(bus: &B, peripheral: Peripheral) -> bool {
    let gate = peripheral.gate();
    field::is_set(bus.read(Reg::Rcc(gate.enable)), gate.bit)
}

/// Return every register of the peripheral to its reset value by pulsing its RCC reset bit.
pub fn reset<B: RegisterBus>(bus: &B, peripheral: Peripheral) {
    log::debug!("rcc: reset {}", peripheral);
    let gate = peripheral.gate();
    let reg = Reg::Rcc(gate.reset);
    bus.modify(reg, |w| field::set_bit(w, gate.bit, true));
    bus.modify(reg, |w| field::set_bit(w, gate.bit, false));
}
