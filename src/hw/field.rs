// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Register field codec.
//!
//! Pure bit arithmetic for packing a value into a `width`-bit field at `offset` of a 32-bit
//! register, and reading it back. `offset + width` must not exceed 32; that is a programming error
//! and is not checked at runtime.

/// Mask covering `width` bits starting at `offset`.
#[inline]
pub const fn mask(width: u8, offset: u8) -> u32 {
    let ones = if width >= 32 {
        u32::MAX
    } else {
        (1u32 << width) - 1
    };
    ones << offset
}

/// Shift `value` into position, dropping any bits that do not fit in the field.
#[inline]
pub const fn encode(value: u32, width: u8, offset: u8) -> u32 {
    (value << offset) & mask(width, offset)
}

/// Read the `width`-bit field at `offset` out of `word`.
#[inline]
pub const fn decode(word: u32, width: u8, offset: u8) -> u32 {
    (word & mask(width, offset)) >> offset
}

/// OR an encoded pattern into `word`. Never clears a bit.
#[inline]
pub const fn apply(word: u32, pattern: u32) -> u32 {
    word | pattern
}

/// Replace the field at `offset` with `value`, leaving every other bit of `word` untouched.
#[inline]
pub const fn update(word: u32, value: u32, width: u8, offset: u8) -> u32 {
    apply(word & !mask(width, offset), encode(value, width, offset))
}

/// Single-bit helpers.
#[inline]
pub const fn bit(offset: u8) -> u32 {
    1 << offset
}

#[inline]
pub const fn is_set(word: u32, offset: u8) -> bool {
    word & bit(offset) != 0
}

#[inline]
pub const fn set_bit(word: u32, offset: u8, on: bool) -> u32 {
    if on {
        word | bit(offset)
    } else {
        word & !bit(offset)
    }
}
