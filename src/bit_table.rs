// size-class-codes/src/bit_table.rs

// Code bit `i` contributes `1 << positions[i]`. Positions strictly increase, so
// each bit outweighs all the bits below it combined.

use log::{debug, trace};

use crate::{check_code_width, width_mask, Code, Error, Rounded, Size, SizeCodec, MAX_CODE_WIDTH};

/// Output bit positions of the `spacing-exp` scheme, least significant code bit
/// first.
///
/// The gaps widen towards the low end so that small sizes give up resolution
/// instead of large ones, keeping relative waste roughly flat across the range.
pub const SPACING_EXP_POSITIONS: [u8; 15] = [1, 3, 4, 6, 7, 8, 10, 11, 12, 13, 15, 16, 17, 18, 19];

/// Where each code bit lands in the decoded size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitPositionTable {
    positions: [u8; MAX_CODE_WIDTH as usize],
    width: u32,
    max_size: Size,
}

impl BitPositionTable {
    /// Builds a table from explicit positions, least significant code bit
    /// first.
    pub fn new(positions: &[u8]) -> Result<Self, Error> {
        if positions.is_empty() {
            return Err(Error::EmptyTable);
        }
        let width = positions.len() as u32;
        check_code_width(width)?;

        let mut table = [0; MAX_CODE_WIDTH as usize];
        let mut max_size: Size = 0;
        for (index, &position) in positions.iter().enumerate() {
            if u32::from(position) >= Size::BITS {
                return Err(Error::PositionOutOfRange {
                    position: u32::from(position),
                });
            }
            if index > 0 && position <= positions[index - 1] {
                return Err(Error::PositionsNotIncreasing { index });
            }
            table[index] = position;
            max_size |= 1 << position;
        }

        debug!(
            "BitPositionTable::new(width={}, positions={:?}) max_size={}",
            width, positions, max_size
        );
        Ok(Self {
            positions: table,
            width,
            max_size,
        })
    }

    /// Code bit `i` lands at output bit `i * stride`. A stride of 1 is the
    /// identity mapping.
    pub fn uniform(stride: u32, width: u32) -> Result<Self, Error> {
        check_code_width(width)?;
        if stride == 0 {
            return Err(Error::ZeroStride);
        }
        let top = (width - 1).checked_mul(stride);
        if top.map_or(true, |top| top >= Size::BITS) {
            return Err(Error::SizeOverflow { width });
        }
        let positions: Vec<u8> = (0..width).map(|i| (i * stride) as u8).collect();
        Self::new(&positions)
    }

    /// The identity table: decode returns the code unchanged.
    pub fn linear(width: u32) -> Result<Self, Error> {
        Self::uniform(1, width)
    }

    /// The lowest `width` entries of [`SPACING_EXP_POSITIONS`].
    pub fn spacing_exp(width: u32) -> Result<Self, Error> {
        check_code_width(width)?;
        Self::new(&SPACING_EXP_POSITIONS[..width as usize])
    }

    pub fn positions(&self) -> &[u8] {
        &self.positions[..self.width as usize]
    }
}

impl SizeCodec for BitPositionTable {
    fn code_width(&self) -> u32 {
        self.width
    }

    fn decode(&self, code: Code) -> Size {
        let bits = code.bits() & width_mask(self.width);
        self.positions()
            .iter()
            .enumerate()
            .filter(|&(index, _)| bits & (1 << index) != 0)
            .fold(0, |size, (_, &position)| size | (1 << position))
    }

    fn round_up(&self, request: Size) -> Rounded {
        // Start from the maximum and clear bits from the top down, keeping
        // each clear that still covers the request.
        let mut bits = width_mask(self.width);
        let mut size = self.max_size;

        if request > size {
            debug!("round_up({}) saturated at {}", request, size);
            return Rounded {
                size,
                code: Code::from_bits(bits),
            };
        }

        for (index, &position) in self.positions().iter().enumerate().rev() {
            let cleared = size - (1 << position);
            if cleared >= request {
                size = cleared;
                bits &= !(1 << index);
            }
            trace!("round_up({}): bit {} -> size={}", request, index, size);
        }

        debug_assert!(size >= request);
        Rounded {
            size,
            code: Code::from_bits(bits),
        }
    }

    fn round_down(&self, size: Size) -> Rounded {
        // Mirror image of round_up: raise bits from the top down while the
        // total stays within `size`.
        let mut bits = 0;
        let mut total: Size = 0;
        for (index, &position) in self.positions().iter().enumerate().rev() {
            let raised = total + (1 << position);
            if raised <= size {
                total = raised;
                bits |= 1 << index;
            }
        }

        debug_assert!(total <= size);
        Rounded {
            size: total,
            code: Code::from_bits(bits),
        }
    }

    fn max_representable_size(&self) -> Size {
        self.max_size
    }
}
