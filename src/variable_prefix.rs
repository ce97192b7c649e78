// size-class-codes/src/variable_prefix.rs

// Leading ones pick a bucket. The first zero ends the prefix, the bit below it
// is an unused guard, and the rest is the mantissa at the bucket's scale.

use log::{debug, trace};

use crate::{check_code_width, width_mask, Code, Error, Rounded, Size, SizeCodec};

pub const DEFAULT_INITIAL_SHIFT: u32 = 1;
pub const DEFAULT_SHIFT_GROWTH: u32 = 1;

/// How quickly the mantissa scale grows with each prefix round.
///
/// Round `k` (counting from zero) multiplies the scale by
/// `2^(initial_shift + k * shift_growth)`. `shift_growth == 0` gives a
/// conventional exponent/mantissa layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScalingPolicy {
    pub initial_shift: u32,
    pub shift_growth: u32,
}

impl Default for ScalingPolicy {
    fn default() -> Self {
        Self {
            initial_shift: DEFAULT_INITIAL_SHIFT,
            shift_growth: DEFAULT_SHIFT_GROWTH,
        }
    }
}

impl ScalingPolicy {
    fn checked_shift(&self, round: u32) -> Option<u32> {
        self.shift_growth
            .checked_mul(round)?
            .checked_add(self.initial_shift)
    }

    // Only called for rounds validated by `VariablePrefix::with_policy`.
    fn shift(&self, round: u32) -> u32 {
        self.initial_shift + self.shift_growth * round
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VariablePrefix {
    width: u32,
    policy: ScalingPolicy,
    max_size: Size,
}

impl VariablePrefix {
    pub fn new(width: u32) -> Result<Self, Error> {
        Self::with_policy(width, ScalingPolicy::default())
    }

    pub fn with_policy(width: u32, policy: ScalingPolicy) -> Result<Self, Error> {
        check_code_width(width)?;
        let overflow = || Error::SizeOverflow { width };

        // Walk the all-ones code once. Every bucket offset and every shift the
        // search can apply must fit in `Size`.
        let mut base: u32 = 1 << (width - 1);
        let mut scale_log2: u32 = 0;
        let mut max_size: Size = 0;
        for round in 0..width {
            base >>= 1;
            if base != 0 {
                if base.ilog2() + scale_log2 >= Size::BITS {
                    return Err(overflow());
                }
                max_size = max_size
                    .checked_add(Size::from(base) << scale_log2)
                    .ok_or_else(overflow)?;
            }
            let shift = policy.checked_shift(round).ok_or_else(overflow)?;
            if shift >= Size::BITS {
                return Err(overflow());
            }
            scale_log2 = scale_log2.checked_add(shift).ok_or_else(overflow)?;
        }

        debug!(
            "VariablePrefix::with_policy(width={}, {:?}) max_size={}",
            width, policy, max_size
        );
        Ok(Self {
            width,
            policy,
            max_size,
        })
    }

    pub fn policy(&self) -> ScalingPolicy {
        self.policy
    }

    fn top_bit(&self) -> u32 {
        1 << (self.width - 1)
    }
}

fn scaled(value: Size, scale_log2: u32) -> Size {
    if value == 0 {
        0
    } else {
        value << scale_log2
    }
}

// Mantissa bits sit below the guard bit, itself below `terminator`.
fn mantissa_mask(terminator: u32) -> u32 {
    (terminator >> 1).saturating_sub(1)
}

impl SizeCodec for VariablePrefix {
    fn code_width(&self) -> u32 {
        self.width
    }

    fn decode(&self, code: Code) -> Size {
        let bits = code.bits() & width_mask(self.width);

        let mut base = self.top_bit();
        let mut scale_log2 = 0;
        let mut size: Size = 0;
        let mut round = 0;
        while base != 0 && bits & base != 0 {
            base >>= 1;
            size += scaled(Size::from(base), scale_log2);
            scale_log2 += self.policy.shift(round);
            round += 1;
        }

        let mantissa = bits & mantissa_mask(base);
        size + scaled(Size::from(mantissa), scale_log2)
    }

    fn round_up(&self, request: Size) -> Rounded {
        if request > self.max_size {
            debug!("round_up({}) saturated at {}", request, self.max_size);
            return Rounded {
                size: self.max_size,
                code: self.max_code(),
            };
        }

        // `remaining` is what is left of the request past the current bucket
        // offset, in units of the current scale, rounded up.
        let mut remaining = request;
        let mut bits = 0;
        let mut base = self.top_bit();
        let mut scale_log2 = 0;
        let mut size: Size = 0;
        let mut round = 0;
        while base != 0 && remaining >= Size::from(base >> 1) {
            bits |= base;
            base >>= 1;
            size += scaled(Size::from(base), scale_log2);

            let shift = self.policy.shift(round);
            let low_bits_mask: Size = (1 << shift) - 1;
            remaining -= Size::from(base);
            // Round up!
            remaining = (remaining >> shift) + Size::from(remaining & low_bits_mask != 0);

            scale_log2 += shift;
            round += 1;
            trace!(
                "round_up({}): round {} size={} remaining={}",
                request,
                round,
                size,
                remaining
            );
        }

        // Requests up to the maximum are fully absorbed once the prefix runs out.
        debug_assert!(base != 0 || remaining == 0);
        debug_assert!(remaining <= Size::from(mantissa_mask(base)));
        bits |= remaining as u32;
        size += scaled(remaining, scale_log2);

        debug_assert!(size >= request);
        Rounded {
            size,
            code: Code::from_bits(bits),
        }
    }

    fn round_down(&self, size: Size) -> Rounded {
        let mut remaining = size;
        let mut bits = 0;
        let mut base = self.top_bit();
        let mut scale_log2 = 0;
        let mut total: Size = 0;
        let mut round = 0;
        while base != 0 && remaining >= Size::from(base >> 1) {
            bits |= base;
            base >>= 1;
            total += scaled(Size::from(base), scale_log2);

            let shift = self.policy.shift(round);
            remaining = (remaining - Size::from(base)) >> shift;

            scale_log2 += shift;
            round += 1;
        }

        // Past the maximum there is no mantissa left to fill.
        if base == 0 {
            remaining = 0;
        }
        bits |= remaining as u32;
        total += scaled(remaining, scale_log2);

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
