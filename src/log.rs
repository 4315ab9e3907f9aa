// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Logging facade.
//!
//! With the `defmt` feature the macros forward to `defmt`. Without it they evaluate their
//! arguments and discard them, so call sites compile identically in both configurations.

#[cfg(feature = "defmt")]
pub use defmt;

#[cfg(feature = "defmt")]
mod imp {
    #[macro_export]
    #[doc(hidden)]
    macro_rules! __trace {
        ($($arg:tt)*) => {{
            use $crate::log::defmt;
            defmt::trace!($($arg)*);
        }};
    }

    #[macro_export]
    #[doc(hidden)]
    macro_rules! __debug {
        ($($arg:tt)*) => {{
            use $crate::log::defmt;
            defmt::debug!($($arg)*);
        }};
    }

    #[macro_export]
    #[doc(hidden)]
    macro_rules! __info {
        ($($arg:tt)*) => {{
            use $crate::log::defmt;
            defmt::info!($($arg)*);
        }};
    }

    #[macro_export]
    #[doc(hidden)]
    macro_rules! __warn {
        ($($arg:tt)*) => {{
            use $crate::log::defmt;
            defmt::warn!($($arg)*);
        }};
    }

    #[macro_export]
    #[doc(hidden)]
    macro_rules! __error {
        ($($arg:tt)*) => {{
            use $crate::log::defmt;
            defmt::error!($($arg)*);
        }};
    }
}

#[cfg(not(feature = "defmt"))]
mod imp {
    #[macro_export]
    #[doc(hidden)]
    macro_rules! __stub {
        ($($arg:tt)*) => {{
            let _ = ($($arg)*); // Do nothing
        }};
    }
}

#[cfg(feature = "defmt")]
pub use crate::{
    __debug as debug, __error as error, __info as info, __trace as trace, __warn as warn,
};

#[cfg(not(feature = "defmt"))]
pub use crate::{
    __stub as debug, __stub as error, __stub as info, __stub as trace, __stub as warn,
};
