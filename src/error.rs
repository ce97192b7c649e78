// size-class-codes/src/error.rs

use crate::MAX_CODE_WIDTH;

/// Configuration errors reported while constructing a scheme.
///
/// Encoding and decoding themselves never fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Code widths must lie in `1..=MAX_CODE_WIDTH`.
    #[error("code width {width} is outside 1..={}", MAX_CODE_WIDTH)]
    InvalidCodeWidth { width: u32 },

    /// A bit-position table needs at least one entry.
    #[error("bit-position table is empty")]
    EmptyTable,

    /// Table entry `index` is not above the entry before it.
    #[error("bit position at index {index} does not increase")]
    PositionsNotIncreasing { index: usize },

    /// A uniform table needs a stride of at least one.
    #[error("uniform table stride must be at least 1")]
    ZeroStride,

    /// A table entry names a bit that `Size` does not have.
    #[error("bit position {position} does not fit in a {}-bit size", crate::Size::BITS)]
    PositionOutOfRange { position: u32 },

    /// The largest size this configuration would decode does not fit in `Size`.
    #[error("a {width}-bit code with this layout overflows the size type")]
    SizeOverflow { width: u32 },

    /// No registered scheme has this name.
    #[error("unknown size-code scheme `{0}`")]
    UnknownScheme(String),
}
