// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! MCU-level drivers for the STM32F407.

pub mod exti;
pub mod field;
pub mod gpio;
pub mod led;
pub mod rcc;
pub mod regs;
pub mod spi;

#[cfg(all(target_arch = "arm", target_os = "none"))]
pub mod delay;
#[cfg(all(target_arch = "arm", target_os = "none"))]
pub mod mmio;

#[cfg(test)]
pub(crate) mod sim;

pub use exti::{HandlerTable, InterruptRouter, IrqLine, Priority};
pub use gpio::{Gpio, Pin, PinConfig, PinMode, Port};
pub use led::Led;
pub use regs::{Reg, RegisterBus};
pub use spi::{Link, SerialLink, Spi, SpiConfig};

#[cfg(all(target_arch = "arm", target_os = "none"))]
pub use delay::SpinDelay;
#[cfg(all(target_arch = "arm", target_os = "none"))]
pub use mmio::Mmio;
