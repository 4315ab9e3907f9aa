// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! General-purpose I/O.
//!
//! - [`PinConfig`] is the pin descriptor: port, pin index, mode and electrical settings.
//! - [`Gpio`] configures pins and gives port-wide access to the input/output data registers.
//! - [`Pin`] is the handle returned by [`Gpio::activate`]; it implements the `embedded-hal`
//!   digital traits so it can be handed to [`Led`](super::led::Led) or any other driver.
//!
//! Example:
//! ```ignore
//! let gpio = Gpio::new(Mmio);
//! let led = gpio.activate(
//!     PinConfig::new(Port::D, PinIndex::new(12).unwrap(), PinMode::Output).speed(Speed::Low),
//! );
//! ```

use core::convert::Infallible;

use embedded_hal::digital::{self, PinState};

use super::exti::InterruptRouter;
use super::field;
use super::rcc::{self, Peripheral};
use super::regs::{GpioReg, Reg, RegisterBus};
use crate::log;

/// GPIO ports of the STM32F407, in SYSCFG port-code order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
}

impl Port {
    /// Port code used by RCC enable bits and SYSCFG_EXTICR fields.
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// Pin number within a port, always `0..=15`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinIndex(u8);

impl PinIndex {
    pub const fn new(n: u8) -> Option<Self> {
        if n < 16 {
            Some(Self(n))
        } else {
            None
        }
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Alternate-function selector (AF0..AF15).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AltFn(u8);

impl AltFn {
    pub const fn new(n: u8) -> Option<Self> {
        if n < 16 {
            Some(Self(n))
        } else {
            None
        }
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Which transition on an input line raises an interrupt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Rising,
    Falling,
    Both,
}

impl Edge {
    #[inline]
    pub const fn rising(self) -> bool {
        matches!(self, Edge::Rising | Edge::Both)
    }

    #[inline]
    pub const fn falling(self) -> bool {
        matches!(self, Edge::Falling | Edge::Both)
    }
}

/// Pin function. The alternate-function selector only exists in `Alternate` mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    Input,
    Output,
    Alternate(AltFn),
    Analog,
    /// Input that raises an EXTI interrupt on the given edge(s).
    Interrupt(Edge),
}

impl PinMode {
    /// MODER encoding. Interrupt pins are plain inputs as far as the port is concerned.
    const fn moder(self) -> u32 {
        match self {
            PinMode::Input | PinMode::Interrupt(_) => 0b00,
            PinMode::Output => 0b01,
            PinMode::Alternate(_) => 0b10,
            PinMode::Analog => 0b11,
        }
    }
}

/// Output slew rate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speed {
    #[default]
    Low,
    Medium,
    Fast,
    High,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputType {
    #[default]
    PushPull,
    OpenDrain,
}

/// Internal pull resistor. Has no effect on a push-pull output, but may still be set.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    #[default]
    None,
    Up,
    Down,
}

/// Pin descriptor, consumed by [`Gpio::activate`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    pub port: Port,
    pub pin: PinIndex,
    pub mode: PinMode,
    pub speed: Speed,
    pub output_type: OutputType,
    pub pull: Pull,
}

impl PinConfig {
    /// Descriptor with low speed, push-pull output and no pull resistor.
    pub const fn new(port: Port, pin: PinIndex, mode: PinMode) -> Self {
        Self {
            port,
            pin,
            mode,
            speed: Speed::Low,
            output_type: OutputType::PushPull,
            pull: Pull::None,
        }
    }

    #[must_use]
    pub const fn speed(mut self, speed: Speed) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub const fn output_type(mut self, output_type: OutputType) -> Self {
        self.output_type = output_type;
        self
    }

    #[must_use]
    pub const fn pull(mut self, pull: Pull) -> Self {
        self.pull = pull;
        self
    }
}

/// GPIO driver over all ports.
pub struct Gpio<B> {
    bus: B,
}

impl<B: RegisterBus> Gpio<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn free(self) -> B {
        self.bus
    }

    /// Gate the port's clock. Enabling an already enabled port does nothing.
    pub fn enable_port_clock(&self, port: Port, on: bool) {
        rcc::set_clock(&self.bus, Peripheral::Gpio(port), on);
    }

    /// Return every register of the port to its reset value.
    pub fn reset_port(&self, port: Port) {
        rcc::reset(&self.bus, Peripheral::Gpio(port));
    }

    /// Apply a pin descriptor to the hardware and return a handle to the pin.
    ///
    /// The port clock is enabled first. Interrupt modes leave the pin as an input and program
    /// the EXTI edge selection, SYSCFG port routing and interrupt mask for the pin's line; the
    /// NVIC line itself is left to [`InterruptRouter::set_line_enabled`]. Speed, pull and output
    /// type are written for every mode.
    pub fn activate(&self, config: PinConfig) -> Pin<B>
    where
        B: Clone,
    {
        let PinConfig {
            port,
            pin,
            mode,
            speed,
            output_type,
            pull,
        } = config;
        let n = pin.get();

        log::debug!("gpio: activate P{}{} as {}", port, n, mode);

        self.enable_port_clock(port, true);

        self.bus.modify(Reg::Gpio(port, GpioReg::Moder), |w| {
            field::update(w, mode.moder(), 2, 2 * n)
        });
        if let PinMode::Interrupt(edge) = mode {
            InterruptRouter::new(&self.bus).route(port, pin, edge);
        }

        self.bus.modify(Reg::Gpio(port, GpioReg::Ospeedr), |w| {
            field::update(w, speed as u32, 2, 2 * n)
        });
        self.bus.modify(Reg::Gpio(port, GpioReg::Pupdr), |w| {
            field::update(w, pull as u32, 2, 2 * n)
        });
        self.bus.modify(Reg::Gpio(port, GpioReg::Otyper), |w| {
            field::update(w, output_type as u32, 1, n)
        });

        if let PinMode::Alternate(af) = mode {
            self.bus.modify(Reg::Gpio(port, GpioReg::Afr(n / 8)), |w| {
                field::update(w, af.get() as u32, 4, 4 * (n % 8))
            });
        }

        Pin {
            bus: self.bus.clone(),
            port,
            pin,
        }
    }

    /// Live input level of one pin.
    pub fn read(&self, port: Port, pin: PinIndex) -> PinState {
        read_pin(&self.bus, port, pin)
    }

    /// Snapshot of the whole input data register.
    pub fn read_port(&self, port: Port) -> u16 {
        self.bus.read(Reg::Gpio(port, GpioReg::Idr)) as u16
    }

    /// Drive one output bit, preserving the rest of the port.
    pub fn write(&self, port: Port, pin: PinIndex, state: PinState) {
        write_pin(&self.bus, port, pin, state);
    }

    /// Overwrite all 16 output bits of the port.
    pub fn write_port(&self, port: Port, value: u16) {
        self.bus.write(Reg::Gpio(port, GpioReg::Odr), value as u32);
    }

    /// Invert one output bit in place.
    pub fn toggle(&self, port: Port, pin: PinIndex) {
        toggle_pin(&self.bus, port, pin);
    }

    /// Clear the pin's EXTI pending bit; call first thing in the interrupt handler.
    ///
    /// Returns whether the line was pending.
    pub fn acknowledge_and_clear(&self, pin: PinIndex) -> bool {
        InterruptRouter::new(&self.bus).acknowledge_and_clear(pin)
    }
}

fn read_pin<B: RegisterBus>(bus: &B, port: Port, pin: PinIndex) -> PinState {
    let idr = bus.read(Reg::Gpio(port, GpioReg::Idr));
    PinState::from(field::is_set(idr, pin.get()))
}

fn write_pin<B: RegisterBus>(bus: &B, port: Port, pin: PinIndex, state: PinState) {
    let high = state == PinState::High;
    bus.modify(Reg::Gpio(port, GpioReg::Odr), |w| {
        field::set_bit(w, pin.get(), high)
    });
}

fn toggle_pin<B: RegisterBus>(bus: &B, port: Port, pin: PinIndex) {
    bus.modify(Reg::Gpio(port, GpioReg::Odr), |w| w ^ field::bit(pin.get()));
}

/// Handle to one activated pin.
pub struct Pin<B> {
    bus: B,
    port: Port,
    pin: PinIndex,
}

impl<B: RegisterBus> Pin<B> {
    #[inline]
    pub fn port(&self) -> Port {
        self.port
    }

    #[inline]
    pub fn index(&self) -> PinIndex {
        self.pin
    }

    /// Input level.
    pub fn state(&self) -> PinState {
        read_pin(&self.bus, self.port, self.pin)
    }

    /// Output latch level.
    pub fn output_state(&self) -> PinState {
        let odr = self.bus.read(Reg::Gpio(self.port, GpioReg::Odr));
        PinState::from(field::is_set(odr, self.pin.get()))
    }

    pub fn set_state(&mut self, state: PinState) {
        write_pin(&self.bus, self.port, self.pin, state);
    }

    pub fn toggle(&mut self) {
        toggle_pin(&self.bus, self.port, self.pin);
    }

    pub fn free(self) -> B {
        self.bus
    }
}

impl<B> digital::ErrorType for Pin<B> {
    type Error = Infallible;
}

impl<B: RegisterBus> digital::InputPin for Pin<B> {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.state() == PinState::High)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(self.state() == PinState::Low)
    }
}

impl<B: RegisterBus> digital::OutputPin for Pin<B> {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.set_state(PinState::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.set_state(PinState::High);
        Ok(())
    }
}

impl<B: RegisterBus> digital::StatefulOutputPin for Pin<B> {
    fn is_set_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.output_state() == PinState::High)
    }

    fn is_set_low(&mut self) -> Result<bool, Infallible> {
        Ok(self.output_state() == PinState::Low)
    }

    fn toggle(&mut self) -> Result<(), Infallible> {
        Pin::toggle(self);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::regs::{ExtiReg, RccReg, SyscfgReg};
    use crate::hw::sim::SimBus;
    use embedded_hal::digital::{InputPin, OutputPin, StatefulOutputPin};

    fn pin(n: u8) -> PinIndex {
        PinIndex::new(n).unwrap()
    }

    #[test]
    fn pin_index_rejects_sixteen() {
        assert!(PinIndex::new(15).is_some());
        assert!(PinIndex::new(16).is_none());
        assert!(AltFn::new(16).is_none());
    }

    #[test]
    fn activate_output_writes_every_field() {
        let bus = SimBus::new();
        let gpio = Gpio::new(&bus);
        let cfg = PinConfig::new(Port::D, pin(12), PinMode::Output)
            .speed(Speed::Fast)
            .output_type(OutputType::OpenDrain)
            .pull(Pull::Up);
        gpio.activate(cfg);

        assert_eq!(bus.peek(Reg::Rcc(RccReg::Ahb1Enr)), 1 << 3);
        assert_eq!(bus.peek(Reg::Gpio(Port::D, GpioReg::Moder)), 0b01 << 24);
        assert_eq!(bus.peek(Reg::Gpio(Port::D, GpioReg::Ospeedr)), 0b10 << 24);
        assert_eq!(bus.peek(Reg::Gpio(Port::D, GpioReg::Pupdr)), 0b01 << 24);
        assert_eq!(bus.peek(Reg::Gpio(Port::D, GpioReg::Otyper)), 1 << 12);
        assert!(bus.writes_to(Reg::Gpio(Port::D, GpioReg::Afr(1))).is_empty());
    }

    #[test]
    fn activate_preserves_neighbouring_pins() {
        let bus = SimBus::new();
        bus.poke(Reg::Gpio(Port::B, GpioReg::Moder), 0xFFFF_FFFF);
        let gpio = Gpio::new(&bus);
        gpio.activate(PinConfig::new(Port::B, pin(5), PinMode::Input));
        assert_eq!(
            bus.peek(Reg::Gpio(Port::B, GpioReg::Moder)),
            0xFFFF_FFFF & !(0b11 << 10)
        );
    }

    #[test]
    fn alternate_function_selects_register_half() {
        let bus = SimBus::new();
        let gpio = Gpio::new(&bus);
        let af5 = PinMode::Alternate(AltFn::new(5).unwrap());
        gpio.activate(PinConfig::new(Port::B, pin(13), af5));
        gpio.activate(PinConfig::new(Port::B, pin(3), af5));

        assert_eq!(bus.peek(Reg::Gpio(Port::B, GpioReg::Afr(1))), 5 << 20);
        assert_eq!(bus.peek(Reg::Gpio(Port::B, GpioReg::Afr(0))), 5 << 12);
        assert_eq!(
            bus.peek(Reg::Gpio(Port::B, GpioReg::Moder)),
            (0b10 << 26) | (0b10 << 6)
        );
    }

    #[test]
    fn falling_edge_sets_ftsr_and_clears_rtsr() {
        let bus = SimBus::new();
        bus.poke(Reg::Exti(ExtiReg::Rtsr), 1 << 5);
        let gpio = Gpio::new(&bus);
        gpio.activate(
            PinConfig::new(Port::D, pin(5), PinMode::Interrupt(Edge::Falling)).pull(Pull::Up),
        );

        assert_eq!(bus.peek(Reg::Exti(ExtiReg::Ftsr)), 1 << 5);
        assert_eq!(bus.peek(Reg::Exti(ExtiReg::Rtsr)), 0);
        assert_eq!(bus.peek(Reg::Exti(ExtiReg::Imr)), 1 << 5);
        assert_eq!(bus.peek(Reg::Gpio(Port::D, GpioReg::Moder)), 0);
        // EXTICR2, sub-position 1, port code 3 (D)
        assert_eq!(bus.peek(Reg::Syscfg(SyscfgReg::Exticr(1))), 3 << 4);
        assert_eq!(bus.peek(Reg::Rcc(RccReg::Apb2Enr)), 1 << 14);
    }

    #[test]
    fn rising_edge_sets_rtsr_and_clears_ftsr() {
        let bus = SimBus::new();
        bus.poke(Reg::Exti(ExtiReg::Ftsr), 1 << 0);
        let gpio = Gpio::new(&bus);
        gpio.activate(PinConfig::new(Port::A, pin(0), PinMode::Interrupt(Edge::Rising)));

        assert_eq!(bus.peek(Reg::Exti(ExtiReg::Rtsr)), 1 << 0);
        assert_eq!(bus.peek(Reg::Exti(ExtiReg::Ftsr)), 0);
    }

    #[test]
    fn both_edges_set_both_registers() {
        let bus = SimBus::new();
        let gpio = Gpio::new(&bus);
        gpio.activate(PinConfig::new(Port::C, pin(13), PinMode::Interrupt(Edge::Both)));

        assert_eq!(bus.peek(Reg::Exti(ExtiReg::Rtsr)), 1 << 13);
        assert_eq!(bus.peek(Reg::Exti(ExtiReg::Ftsr)), 1 << 13);
        assert_eq!(bus.peek(Reg::Syscfg(SyscfgReg::Exticr(3))), 2 << 4);
    }

    #[test]
    fn read_reports_live_input_bits() {
        let bus = SimBus::new();
        bus.poke(Reg::Gpio(Port::A, GpioReg::Idr), 0x8001);
        let gpio = Gpio::new(&bus);

        assert_eq!(gpio.read(Port::A, pin(0)), PinState::High);
        assert_eq!(gpio.read(Port::A, pin(1)), PinState::Low);
        assert_eq!(gpio.read_port(Port::A), 0x8001);
    }

    #[test]
    fn write_touches_one_bit_and_write_port_overwrites() {
        let bus = SimBus::new();
        let gpio = Gpio::new(&bus);
        gpio.write_port(Port::D, 0x00F0);
        gpio.write(Port::D, pin(0), PinState::High);
        gpio.write(Port::D, pin(4), PinState::Low);
        assert_eq!(bus.peek(Reg::Gpio(Port::D, GpioReg::Odr)), 0x00E1);

        gpio.write_port(Port::D, 0x1000);
        assert_eq!(bus.peek(Reg::Gpio(Port::D, GpioReg::Odr)), 0x1000);
    }

    #[test]
    fn toggle_twice_restores_output() {
        let bus = SimBus::new();
        bus.poke(Reg::Gpio(Port::D, GpioReg::Odr), 0xA5A5);
        let gpio = Gpio::new(&bus);
        for n in 0..16 {
            gpio.toggle(Port::D, pin(n));
            assert_ne!(bus.peek(Reg::Gpio(Port::D, GpioReg::Odr)), 0xA5A5);
            gpio.toggle(Port::D, pin(n));
            assert_eq!(bus.peek(Reg::Gpio(Port::D, GpioReg::Odr)), 0xA5A5);
        }
    }

    #[test]
    fn pin_handle_implements_digital_traits() {
        let bus = SimBus::new();
        let gpio = Gpio::new(&bus);
        let mut led = gpio.activate(PinConfig::new(Port::D, pin(12), PinMode::Output));

        led.set_high().unwrap();
        assert!(led.is_set_high().unwrap());
        StatefulOutputPin::toggle(&mut led).unwrap();
        assert!(led.is_set_low().unwrap());

        bus.poke(Reg::Gpio(Port::D, GpioReg::Idr), 1 << 12);
        assert!(led.is_high().unwrap());
    }

    #[test]
    fn reset_port_pulses_ahb1rstr() {
        let bus = SimBus::new();
        Gpio::new(&bus).reset_port(Port::I);
        assert_eq!(bus.writes_to(Reg::Rcc(RccReg::Ahb1Rstr)), vec![1 << 8, 0]);
    }
}
