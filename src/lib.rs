// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # STM32F407 Peripheral Drivers
//!
//! Register-level drivers for the STM32F407 written in Rust: digital I/O with edge-triggered
//! interrupts, a blocking SPI master, and the command/acknowledgment protocol used to drive a
//! cooperating SPI slave (e.g., an Arduino running the matching sketch).
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`hw`] | MCU-level drivers for RCC, GPIO, EXTI/NVIC and SPI |
//! | [`protocol`] | Command/acknowledgment exchange with an SPI slave |
//! | [`log`] | `defmt` logging facade (no-op unless the `defmt` feature is enabled) |
//!
//! ## Getting Started
//!
//! Build docs:
//!
//! ```bash
//! cargo doc --no-deps --open
//! ```
//!
//! Run the host-side tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

pub mod log;

pub mod hw;
pub mod protocol;
