// size-class-codes/demos/waste_report.rs

//! Sweeps request sizes from 1 B to 1 GB through every registered scheme and
//! prints how much each one wastes.
//!
//! ```text
//! cargo run --example waste_report [requests] [decades]
//! ```

use std::env;

use size_class_codes::ext::{log_spaced_requests, WasteReport};
use size_class_codes::{Scheme, SizeCodec, DEFAULT_CODE_WIDTH};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let count: usize = args.next().map(|arg| arg.parse()).transpose()?.unwrap_or(100_000);
    let decades: u32 = args.next().map(|arg| arg.parse()).transpose()?.unwrap_or(9);

    println!(
        "{:<16} {:>12} {:>14} {:>10} {:>12}",
        "scheme", "max size", "mean waste", "mean rel", "saturated"
    );
    for scheme in Scheme::registry(DEFAULT_CODE_WIDTH)? {
        let report = WasteReport::measure(&scheme, log_spaced_requests(count, decades));
        println!(
            "{:<16} {:>12.3e} {:>12.0} B {:>8.1} % {:>12}",
            scheme.kind(),
            scheme.max_representable_size() as f64,
            report.mean_waste(),
            report.mean_relative_waste() * 100.0,
            report.saturated,
        );
    }
    Ok(())
}
