// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Indicator LED on any stateful output pin.

use embedded_hal::digital::{PinState, StatefulOutputPin};

/// Whether the LED is lit by driving its pin high or low.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    High,
    Low,
}

impl ActiveLevel {
    const fn pin_state(self, on: bool) -> PinState {
        match (self, on) {
            (ActiveLevel::High, true) | (ActiveLevel::Low, false) => PinState::High,
            (ActiveLevel::High, false) | (ActiveLevel::Low, true) => PinState::Low,
        }
    }
}

/// LED that reads its state back from the pin's output latch.
pub struct Led<PIN> {
    pin: PIN,
    active: ActiveLevel,
}

impl<PIN: StatefulOutputPin> Led<PIN> {
    /// Wrap `pin` and switch the LED off.
    pub fn new(mut pin: PIN, active: ActiveLevel) -> Result<Self, PIN::Error> {
        pin.set_state(active.pin_state(false))?;
        Ok(Self { pin, active })
    }

    pub fn active_high(pin: PIN) -> Result<Self, PIN::Error> {
        Self::new(pin, ActiveLevel::High)
    }

    pub fn active_low(pin: PIN) -> Result<Self, PIN::Error> {
        Self::new(pin, ActiveLevel::Low)
    }

    pub fn set(&mut self, on: bool) -> Result<(), PIN::Error> {
        self.pin.set_state(self.active.pin_state(on))
    }

    #[inline]
    pub fn on(&mut self) -> Result<(), PIN::Error> {
        self.set(true)
    }

    #[inline]
    pub fn off(&mut self) -> Result<(), PIN::Error> {
        self.set(false)
    }

    pub fn toggle(&mut self) -> Result<(), PIN::Error> {
        self.pin.toggle()
    }

    pub fn is_on(&mut self) -> Result<bool, PIN::Error> {
        match self.active {
            ActiveLevel::High => self.pin.is_set_high(),
            ActiveLevel::Low => self.pin.is_set_low(),
        }
    }

    pub fn free(self) -> PIN {
        self.pin
    }
}
