// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Simulated register file for host tests.
//!
//! Plain registers hold whatever was last written. A few registers model the hardware side
//! effects the drivers rely on:
//!
//! - `EXTI_PR` clears the bits written as 1.
//! - `NVIC_ISERn`/`NVIC_ICERn` (and `ISPRn`/`ICPRn`) set/clear one shared word; both read it back.
//! - `GPIOx_IDR` ignores writes (use [`SimBus::poke`] to drive inputs).
//! - `SPIx_DR` writes shift one frame out and one frame in from the configured [`Wire`]; `SPIx_SR`
//!   reports TXE/RXNE from that state, and BSY only while [`SimBus::hold_busy`] is on.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};

use super::regs::{sr, ExtiReg, GpioReg, NvicReg, Reg, RegisterBus, SpiReg};

/// What sits on the other end of the simulated SPI link.
#[derive(Debug)]
pub enum Wire {
    /// MOSI wired to MISO: every frame sent comes straight back.
    Loopback,
    /// A slave shifting out the given frames, one per frame sent, then `0x00`.
    Slave(VecDeque<u16>),
    /// Nothing ever completes; TXE and RXNE stay low.
    Stalled,
}

pub struct SimBus {
    regs: RefCell<BTreeMap<Reg, u32>>,
    writes: RefCell<Vec<(Reg, u32)>>,
    wire: RefCell<Wire>,
    rx: RefCell<VecDeque<u16>>,
    sent: RefCell<Vec<u16>>,
    busy: Cell<bool>,
}

impl SimBus {
    pub fn new() -> Self {
        Self::with_wire(Wire::Loopback)
    }

    pub fn with_wire(wire: Wire) -> Self {
        Self {
            regs: RefCell::new(BTreeMap::new()),
            writes: RefCell::new(Vec::new()),
            wire: RefCell::new(wire),
            rx: RefCell::new(VecDeque::new()),
            sent: RefCell::new(Vec::new()),
            busy: Cell::new(false),
        }
    }

    pub fn slave(frames: &[u16]) -> Self {
        Self::with_wire(Wire::Slave(frames.iter().copied().collect()))
    }

    /// Raw stored value, bypassing read side effects.
    pub fn peek(&self, reg: Reg) -> u32 {
        self.regs.borrow().get(&Self::storage_key(reg)).copied().unwrap_or(0)
    }

    /// Raw store, bypassing write side effects (hardware-driven state such as IDR or PR).
    pub fn poke(&self, reg: Reg, value: u32) {
        self.regs.borrow_mut().insert(Self::storage_key(reg), value);
    }

    /// Every value written to `reg`, in order.
    pub fn writes_to(&self, reg: Reg) -> Vec<u32> {
        self.writes
            .borrow()
            .iter()
            .filter(|(r, _)| *r == reg)
            .map(|(_, v)| *v)
            .collect()
    }

    /// Keep the SPI busy flag raised until released.
    pub fn hold_busy(&self, on: bool) {
        self.busy.set(on);
    }

    /// Frames shifted out on MOSI, in order.
    pub fn sent(&self) -> Vec<u16> {
        self.sent.borrow().clone()
    }

    fn storage_key(reg: Reg) -> Reg {
        match reg {
            Reg::Nvic(NvicReg::Icer(n)) => Reg::Nvic(NvicReg::Iser(n)),
            Reg::Nvic(NvicReg::Icpr(n)) => Reg::Nvic(NvicReg::Ispr(n)),
            other => other,
        }
    }

    fn stalled(&self) -> bool {
        matches!(*self.wire.borrow(), Wire::Stalled)
    }

    fn shift(&self, frame: u16) {
        self.sent.borrow_mut().push(frame);
        let incoming = match &mut *self.wire.borrow_mut() {
            Wire::Loopback => Some(frame),
            Wire::Slave(script) => Some(script.pop_front().unwrap_or(0x00)),
            Wire::Stalled => None,
        };
        if let Some(incoming) = incoming {
            self.rx.borrow_mut().push_back(incoming);
        }
    }
}

impl RegisterBus for SimBus {
    fn read(&self, reg: Reg) -> u32 {
        match reg {
            Reg::Spi(_, SpiReg::Sr) => {
                let mut status = 0;
                if !self.stalled() {
                    status |= 1 << sr::TXE;
                }
                if !self.rx.borrow().is_empty() {
                    status |= 1 << sr::RXNE;
                }
                if self.busy.get() {
                    status |= 1 << sr::BSY;
                }
                status
            }
            Reg::Spi(_, SpiReg::Dr) => self.rx.borrow_mut().pop_front().unwrap_or(0) as u32,
            other => self.peek(other),
        }
    }

    fn write(&self, reg: Reg, value: u32) {
        self.writes.borrow_mut().push((reg, value));
        match reg {
            Reg::Spi(_, SpiReg::Dr) => self.shift(value as u16),
            Reg::Spi(_, SpiReg::Sr) => {}
            Reg::Gpio(_, GpioReg::Idr) => {}
            Reg::Exti(ExtiReg::Pr) => {
                let pending = self.peek(reg);
                self.poke(reg, pending & !value);
            }
            Reg::Nvic(NvicReg::Iser(_)) | Reg::Nvic(NvicReg::Ispr(_)) => {
                let enabled = self.peek(reg);
                self.poke(reg, enabled | value);
            }
            Reg::Nvic(NvicReg::Icer(_)) | Reg::Nvic(NvicReg::Icpr(_)) => {
                let enabled = self.peek(reg);
                self.poke(reg, enabled & !value);
            }
            other => self.poke(other, value),
        }
    }
}
