// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Memory-mapped register access on the target.

use core::ptr;

use cortex_m::peripheral::NVIC;
use stm32f4xx_hal::pac;

use super::gpio::Port;
use super::regs::{Block, Reg, RegisterBus};
use super::spi::Link;

/// Volatile access to the live peripheral register file.
///
/// `Mmio` carries no state and can be copied freely. Exclusive use of a peripheral is the
/// responsibility of the driver handles built on it.
#[derive(Copy, Clone, Debug, Default)]
pub struct Mmio;

impl Mmio {
    /// Base address of a peripheral block, taken from the device crate.
    pub fn base(block: Block) -> usize {
        match block {
            Block::Rcc => pac::RCC::ptr() as usize,
            Block::Gpio(port) => match port {
                Port::A => pac::GPIOA::ptr() as usize,
                Port::B => pac::GPIOB::ptr() as usize,
                Port::C => pac::GPIOC::ptr() as usize,
                Port::D => pac::GPIOD::ptr() as usize,
                Port::E => pac::GPIOE::ptr() as usize,
                Port::F => pac::GPIOF::ptr() as usize,
                Port::G => pac::GPIOG::ptr() as usize,
                Port::H => pac::GPIOH::ptr() as usize,
                Port::I => pac::GPIOI::ptr() as usize,
            },
            Block::Exti => pac::EXTI::ptr() as usize,
            Block::Syscfg => pac::SYSCFG::ptr() as usize,
            Block::Nvic => NVIC::PTR as usize,
            Block::Spi(link) => match link {
                Link::Spi1 => pac::SPI1::ptr() as usize,
                Link::Spi2 => pac::SPI2::ptr() as usize,
                Link::Spi3 => pac::SPI3::ptr() as usize,
            },
        }
    }

    #[inline]
    fn addr(reg: Reg) -> *mut u32 {
        (Self::base(reg.block()) + reg.offset()) as *mut u32
    }
}

impl RegisterBus for Mmio {
    #[inline]
    fn read(&self, reg: Reg) -> u32 {
        // SAFETY: `addr` is a word-aligned register inside a peripheral block of this device.
        unsafe { ptr::read_volatile(Self::addr(reg)) }
    }

    #[inline]
    fn write(&self, reg: Reg, value: u32) {
        // SAFETY: as for `read`.
        unsafe { ptr::write_volatile(Self::addr(reg), value) }
    }
}
