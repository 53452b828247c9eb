//! Bus-wide constants.
//!
//! This module defines the fixed numbers of the bus model. It includes:
//! 1. **Timing:** The acknowledgment timeout bound used by the transaction controller.
//! 2. **Widths:** The widest register and bus the model can carry.
//! 3. **Naming:** Formatting rules for composed peripheral names.

/// Maximum clock ticks the controller waits for an acknowledgment (`TOMAX`).
///
/// The timeout counter lives in `[0, TOMAX)`; a transaction whose counter
/// reaches `TOMAX - 1` without an acknowledgment is aborted.
pub const TOMAX: u32 = 33;

/// Widest register, data bus, or address bus in bits.
///
/// Register values and bus signals are carried in a `u64`.
pub const MAX_WIDTH: u32 = 64;

/// Number of digits in a composed-name attachment suffix (`LED_000`).
pub const SUFFIX_DIGITS: usize = 3;

/// Number of digits in the default label given to an unnamed peripheral (`0000`).
pub const DEFAULT_LABEL_DIGITS: usize = 4;

/// Returns a mask with the low `width` bits set.
///
/// Widths of 64 or more yield `u64::MAX`; a width of 0 yields 0.
#[inline]
pub const fn width_mask(width: u32) -> u64 {
    if width >= MAX_WIDTH {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}
