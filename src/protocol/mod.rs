// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Command/acknowledgment protocol spoken to an SPI slave.

pub mod exchange;
pub mod messages;

pub use exchange::{CommandClient, Error};
pub use messages::Command;
