// size-class-codes/src/ext.rs

//! Measuring what a scheme's rounding costs.
//!
//! None of this is needed to encode or decode a header. It answers the
//! question of which scheme to pick: how many bytes a size class wastes
//! relative to the requests it serves.

use crate::{Size, SizeCodec};

/// Bytes lost by rounding `request` up. Zero when the request saturated.
pub fn waste<C: SizeCodec + ?Sized>(codec: &C, request: Size) -> Size {
    codec.round_up(request).size.saturating_sub(request)
}

/// Waste as a fraction of the request. Zero for an empty request.
pub fn relative_waste<C: SizeCodec + ?Sized>(codec: &C, request: Size) -> f64 {
    if request == 0 {
        return 0.0;
    }
    waste(codec, request) as f64 / request as f64
}

/// `count` request sizes spread evenly on a log scale from 1 to
/// `10^decades`, truncated to integers. Small sizes repeat.
pub fn log_spaced_requests(count: usize, decades: u32) -> impl Iterator<Item = Size> {
    let step = if count > 1 {
        f64::from(decades) / (count - 1) as f64
    } else {
        0.0
    };
    (0..count).map(move |i| 10f64.powf(i as f64 * step) as Size)
}

/// Aggregate waste over a batch of requests.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WasteReport {
    pub samples: u64,
    /// Requests the scheme could not cover.
    pub saturated: u64,
    /// Requests that needed any rounding at all.
    pub rounded: u64,
    pub total_waste: Size,
    pub total_relative_waste: f64,
    pub max_relative_waste: f64,
}

impl WasteReport {
    pub fn measure<C, I>(codec: &C, requests: I) -> Self
    where
        C: SizeCodec + ?Sized,
        I: IntoIterator<Item = Size>,
    {
        let mut report = Self::default();
        for request in requests {
            report.record(codec, request);
        }
        report
    }

    pub fn record<C: SizeCodec + ?Sized>(&mut self, codec: &C, request: Size) {
        self.samples += 1;
        if !codec.round_up(request).covers(request) {
            self.saturated += 1;
            return;
        }

        let waste = waste(codec, request);
        if waste == 0 {
            return;
        }
        let relative = relative_waste(codec, request);
        self.rounded += 1;
        self.total_waste += waste;
        self.total_relative_waste += relative;
        self.max_relative_waste = self.max_relative_waste.max(relative);
    }

    /// Mean bytes wasted per request, saturated requests counting as zero.
    pub fn mean_waste(&self) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }
        self.total_waste as f64 / self.samples as f64
    }

    /// Mean relative waste over the requests that were rounded.
    pub fn mean_relative_waste(&self) -> f64 {
        if self.rounded == 0 {
            return 0.0;
        }
        self.total_relative_waste / self.rounded as f64
    }
}
