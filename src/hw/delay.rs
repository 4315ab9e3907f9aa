// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Busy-wait delay for code that runs before (or without) a hardware timer.

use embedded_hal::delay::DelayNs;

/// `DelayNs` built on `cortex_m::asm::delay`, calibrated from the core clock.
///
/// Waits at least as long as requested; interrupts taken during the wait extend it.
#[derive(Copy, Clone, Debug)]
pub struct SpinDelay {
    core_hz: u32,
}

impl SpinDelay {
    /// `core_hz` is the frequency the core runs at (16 MHz out of reset on the F407).
    pub const fn new(core_hz: u32) -> Self {
        Self { core_hz }
    }
}

impl DelayNs for SpinDelay {
    fn delay_ns(&mut self, ns: u32) {
        let cycles = (ns as u64 * self.core_hz as u64).div_ceil(1_000_000_000);
        cortex_m::asm::delay(cycles.min(u32::MAX as u64) as u32);
    }
}
