// size-class-codes/src/lib.rs

//! Fixed-width size codes for allocator block headers.
//!
//! A block header rarely needs the exact requested size. It needs a *size
//! class*: some size at least as large as the request that a handful of header
//! bits can name. Every scheme in this crate maps a `W`-bit [`Code`] to such a
//! representable [`Size`] ([`SizeCodec::decode`]) and finds the smallest
//! representable size covering a request ([`SizeCodec::round_up`]) in `O(W)`
//! steps, without enumerating the `2^W` codes.
//!
//! Two families are provided:
//!
//! * [`BitPositionTable`] scatters each code bit to a fixed output bit. The
//!   `linear`, `spacing-1` .. `spacing-4` and `spacing-exp` schemes are tables.
//! * [`VariablePrefix`] reads a run of leading ones as a magnitude bucket and
//!   the remaining bits as a mantissa scaled to that bucket, much like a tiny
//!   floating point number.
//!
//! [`Scheme`] names the registered variants and dispatches to either family.
//!
//! ```
//! use size_class_codes::{Scheme, SchemeKind, SizeCodec};
//!
//! let scheme = Scheme::from_kind(SchemeKind::Spacing3);
//! let rounded = scheme.round_up(10);
//! assert_eq!(rounded.size, 16);
//! assert_eq!(scheme.decode(rounded.code), 16);
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};

use nonmax::NonMaxU16;

mod bit_table;
mod error;
pub mod ext;
mod scheme;
mod variable_prefix;

#[cfg(test)]
mod tests;

pub use bit_table::{BitPositionTable, SPACING_EXP_POSITIONS};
pub use error::Error;
pub use scheme::{Scheme, SchemeKind};
pub use variable_prefix::{
    ScalingPolicy, VariablePrefix, DEFAULT_INITIAL_SHIFT, DEFAULT_SHIFT_GROWTH,
};

/// A byte count, either requested or decoded.
///
/// Wider than any native pointer: a 15-bit stride-5 table reaches bit 70 and
/// the variable-prefix maximum sits near `2^91`.
pub type Size = u128;

/// Widest code any scheme accepts. Keeps `u16::MAX` free as a niche.
pub const MAX_CODE_WIDTH: u32 = 15;

/// Width of the evaluated header field.
pub const DEFAULT_CODE_WIDTH: u32 = 15;

/// A code word as stored in a block header.
///
/// Codes never exceed [`MAX_CODE_WIDTH`] bits, so `Option<Code>` costs no more
/// than the code itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Code(NonMaxU16);

impl Code {
    /// Wraps a raw header value. Returns `None` for `u16::MAX`, which is
    /// reserved.
    pub fn new(raw: u16) -> Option<Self> {
        NonMaxU16::new(raw).map(Code)
    }

    pub fn get(self) -> u16 {
        self.0.get()
    }

    // Callers only pass values already masked to at most MAX_CODE_WIDTH bits.
    pub(crate) fn from_bits(bits: u32) -> Self {
        debug_assert!(bits < 1 << MAX_CODE_WIDTH);
        let masked = bits & width_mask(MAX_CODE_WIDTH);
        Code(NonMaxU16::new(masked as u16).unwrap_or_default())
    }

    pub(crate) fn bits(self) -> u32 {
        u32::from(self.get())
    }
}

impl From<Code> for u16 {
    fn from(code: Code) -> u16 {
        code.get()
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{:#06x}", self.get())
    }
}

/// A representable size together with the code that decodes to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rounded {
    pub size: Size,
    pub code: Code,
}

impl Rounded {
    /// Whether this size is large enough for `request`.
    ///
    /// A round-up result only fails this check when the request exceeded the
    /// scheme's maximum and the result saturated.
    pub fn covers(&self, request: Size) -> bool {
        self.size >= request
    }
}

/// The capability every size-code scheme exposes.
///
/// Implementations are immutable value types; all methods are pure and may be
/// called from any number of threads at once.
pub trait SizeCodec {
    /// Number of significant code bits, `W`.
    fn code_width(&self) -> u32;

    /// Maps a code to its size. Bits above `W` are ignored.
    fn decode(&self, code: Code) -> Size;

    /// Smallest representable size that is at least `request`, or the maximum
    /// representable size if none is.
    fn round_up(&self, request: Size) -> Rounded;

    /// Largest representable size that is at most `size`.
    fn round_down(&self, size: Size) -> Rounded;

    fn max_representable_size(&self) -> Size;

    /// The all-ones code of this width.
    fn max_code(&self) -> Code {
        Code::from_bits(width_mask(self.code_width()))
    }

    /// The code for `size` if `size` is exactly representable.
    fn encode_exact(&self, size: Size) -> Option<Code> {
        let rounded = self.round_up(size);
        (rounded.size == size).then_some(rounded.code)
    }

    fn is_representable(&self, size: Size) -> bool {
        self.encode_exact(size).is_some()
    }
}

pub(crate) fn width_mask(width: u32) -> u32 {
    (1 << width) - 1
}

pub(crate) fn check_code_width(width: u32) -> Result<(), Error> {
    if width == 0 || width > MAX_CODE_WIDTH {
        return Err(Error::InvalidCodeWidth { width });
    }
    Ok(())
}
