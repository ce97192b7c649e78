// size-class-codes/src/tests.rs

use test_case::test_case;

use crate::{ext, Code, Scheme, SchemeKind, Size, SizeCodec, DEFAULT_CODE_WIDTH, MAX_CODE_WIDTH};

/// Every distinct size a scheme can decode, ascending.
fn representable_sizes(scheme: &Scheme) -> Vec<Size> {
    let mut sizes: Vec<Size> = (0..=scheme.max_code().get())
        .map(|raw| scheme.decode(Code::new(raw).unwrap()))
        .collect();
    sizes.sort_unstable();
    sizes.dedup();
    sizes
}

/// Requests that hug every representable size, plus a log sweep.
fn boundary_requests(representable: &[Size]) -> Vec<Size> {
    let mut requests: Vec<Size> = representable
        .iter()
        .flat_map(|&size| [size.saturating_sub(1), size, size + 1])
        .chain(ext::log_spaced_requests(2000, 30))
        .collect();
    requests.sort_unstable();
    requests.dedup();
    requests
}

fn check_against_exhaustive_decode(scheme: &Scheme) {
    let representable = representable_sizes(scheme);
    let max = scheme.max_representable_size();
    assert_eq!(representable.first(), Some(&0), "{}", scheme.kind());
    assert_eq!(representable.last(), Some(&max), "{}", scheme.kind());

    for request in boundary_requests(&representable) {
        let up = scheme.round_up(request);
        let down = scheme.round_down(request);
        assert_eq!(scheme.decode(up.code), up.size, "{} up {}", scheme.kind(), request);
        assert_eq!(scheme.decode(down.code), down.size, "{} down {}", scheme.kind(), request);

        // Floor: the last representable size not above the request.
        let floor_index = representable.partition_point(|&size| size <= request) - 1;
        assert_eq!(down.size, representable[floor_index], "{} down {}", scheme.kind(), request);

        if request > max {
            assert_eq!(up.size, max, "{} saturation {}", scheme.kind(), request);
            assert_eq!(up.code, scheme.max_code());
            continue;
        }

        // Ceiling: the first representable size not below the request.
        let ceiling_index = representable.partition_point(|&size| size < request);
        assert_eq!(up.size, representable[ceiling_index], "{} up {}", scheme.kind(), request);
        assert!(up.covers(request));
        assert_eq!(scheme.round_up(up.size), up, "{} idempotence {}", scheme.kind(), request);
        assert_eq!(scheme.encode_exact(request).is_some(), up.size == request);
    }
}

#[test]
fn round_up_is_minimal_for_every_scheme() {
    for kind in SchemeKind::ALL {
        check_against_exhaustive_decode(&Scheme::from_kind(kind));
    }
}

#[test]
fn narrow_widths_match_exhaustive_decode() {
    for width in [1, 2, 4, 8] {
        for scheme in Scheme::registry(width).unwrap() {
            check_against_exhaustive_decode(&scheme);
        }
    }
}

#[test]
fn every_request_in_a_small_range_rounds_minimally() {
    for scheme in Scheme::registry(6).unwrap() {
        let representable = representable_sizes(&scheme);
        let max = scheme.max_representable_size();
        for request in 0..=max.min(1 << 16) + 1 {
            let up = scheme.round_up(request);
            if request > max {
                assert_eq!(up.size, max);
                continue;
            }
            let ceiling_index = representable.partition_point(|&size| size < request);
            assert_eq!(up.size, representable[ceiling_index], "{} {}", scheme.kind(), request);
        }
    }
}

#[test]
fn round_up_is_monotonic() {
    for kind in SchemeKind::ALL {
        let scheme = Scheme::from_kind(kind);
        let max = scheme.max_representable_size();
        let mut previous = 0;
        for request in ext::log_spaced_requests(20_000, 30).chain([max, max + 1, Size::MAX]) {
            let size = scheme.round_up(request).size;
            assert!(size >= previous, "{} {}", kind, request);
            previous = size;
        }
    }
}

#[test]
fn zero_and_saturation() {
    for kind in SchemeKind::ALL {
        let scheme = Scheme::from_kind(kind);
        let zero = Code::new(0).unwrap();
        assert_eq!(scheme.decode(zero), 0);
        assert_eq!(scheme.round_up(0).size, 0);
        assert_eq!(scheme.round_up(0).code, zero);

        let max = scheme.max_representable_size();
        assert_eq!(scheme.round_up(max + 1).size, max, "{}", kind);
        assert_eq!(scheme.round_up(Size::MAX).size, max, "{}", kind);
        assert_eq!(scheme.decode(scheme.max_code()), max, "{}", kind);
    }
}

#[test]
fn decode_is_monotonic_for_tables() {
    for kind in SchemeKind::ALL {
        let scheme = Scheme::from_kind(kind);
        if scheme.table().is_none() {
            continue;
        }
        let mut previous = 0;
        for raw in 0..=scheme.max_code().get() {
            let size = scheme.decode(Code::new(raw).unwrap());
            assert!(size >= previous, "{} {:#x}", kind, raw);
            previous = size;
        }
    }
}

#[test]
fn table_waste_is_bounded_by_the_widest_gap() {
    // The lone bit at the first position >= log2(request) always covers it,
    // so a table never hands out more than 2^gap times the request.
    for kind in SchemeKind::ALL {
        let scheme = Scheme::from_kind(kind);
        let Some(table) = scheme.table() else {
            continue;
        };
        let positions = table.positions();
        let widest_gap = positions
            .windows(2)
            .map(|pair| u32::from(pair[1] - pair[0]))
            .chain([u32::from(positions[0]), 1])
            .max()
            .unwrap();

        let max = scheme.max_representable_size();
        for request in ext::log_spaced_requests(5000, 30) {
            if request == 0 || request > max {
                continue;
            }
            let size = scheme.round_up(request).size;
            assert!(size <= request << widest_gap, "{} {} -> {}", kind, request, size);
        }
    }
}

/// Mean relative waste of each scheme over 100k requests spread across nine
/// decades. Spacing-2 has no recorded figure.
#[test_case(SchemeKind::Linear, 0.0 ; "linear")]
#[test_case(SchemeKind::Spacing1, 0.672 ; "spacing 1")]
#[test_case(SchemeKind::Spacing3, 4.151 ; "spacing 3")]
#[test_case(SchemeKind::Spacing4, 7.336 ; "spacing 4")]
#[test_case(SchemeKind::SpacingExp, 0.269 ; "spacing exp")]
#[test_case(SchemeKind::VariablePrefix, 0.051 ; "variable prefix")]
fn mean_relative_waste_baseline(kind: SchemeKind, expected: f64) {
    let scheme = Scheme::from_kind(kind);
    let report = ext::WasteReport::measure(&scheme, ext::log_spaced_requests(100_000, 9));
    let mean = report.mean_relative_waste();
    assert!(
        (mean - expected).abs() <= expected * 0.05 + 0.005,
        "{}: mean relative waste {:.4}, baseline {:.4}",
        kind,
        mean,
        expected
    );
}

#[test]
fn spacing_exp_saturates_above_a_million() {
    let scheme = Scheme::from_kind(SchemeKind::SpacingExp);
    let report = ext::WasteReport::measure(&scheme, ext::log_spaced_requests(100_000, 9));
    // Roughly the share of the sweep above 10^6.01.
    assert!((33_000..33_400).contains(&report.saturated), "{}", report.saturated);
}

#[test]
fn variable_prefix_beats_spacing_3_in_the_top_decade() {
    let top_decade = || {
        ext::log_spaced_requests(100_000, 9)
            .filter(|&request| (100_000_000..=1_000_000_000).contains(&request))
    };
    let variable_prefix = ext::WasteReport::measure(
        &Scheme::from_kind(SchemeKind::VariablePrefix),
        top_decade(),
    );
    let spacing_3 =
        ext::WasteReport::measure(&Scheme::from_kind(SchemeKind::Spacing3), top_decade());

    assert_eq!(variable_prefix.saturated, 0);
    assert_eq!(spacing_3.saturated, 0);
    // A bucket change costs variable-prefix at most one extra scale step.
    assert!(variable_prefix.max_relative_waste < 1.0);
    // Just past 2^28 + 2^24 + ... + 1, spacing-3 has to jump to 2^32.
    assert!(spacing_3.max_relative_waste > 10.0);
    assert!(variable_prefix.max_relative_waste < spacing_3.max_relative_waste);
    assert!(variable_prefix.mean_relative_waste() < spacing_3.mean_relative_waste());
}

#[test]
fn spacing_3_concrete_cases() {
    let scheme = Scheme::from_kind(SchemeKind::Spacing3);
    assert_eq!(scheme.code_width(), DEFAULT_CODE_WIDTH);
    assert_eq!(scheme.decode(Code::new(0).unwrap()), 0);

    let small = scheme.round_up(10);
    assert_eq!(small.size, 16);
    assert_eq!(small.code.get(), 0b10);

    let large = scheme.round_up(1_000_000);
    assert_eq!(large.size, 1 << 20);
    assert!(large.size <= 1_000_000 << 4);
}

#[test]
fn variable_prefix_is_exact_in_its_linear_region() {
    let scheme = Scheme::from_kind(SchemeKind::VariablePrefix);
    let report = ext::WasteReport::measure(&scheme, 0..1 << (DEFAULT_CODE_WIDTH - 2));
    assert_eq!(report.rounded, 0);

    // One step up, the scale doubles and at most one byte is lost.
    for request in 1 << 13..1 << 14 {
        assert!(ext::waste(&scheme, request) <= 1);
    }
}

#[test]
fn option_code_is_free() {
    assert_eq!(std::mem::size_of::<Option<Code>>(), std::mem::size_of::<u16>());
    assert_eq!(Code::new(u16::MAX), None);
}

#[test]
fn code_from_bits_keeps_low_bits() {
    let top = 1 << (MAX_CODE_WIDTH - 1);
    assert_eq!(Code::from_bits(top | 0x15).get(), top as u16 | 0x15);
    assert_eq!(Code::from_bits(0x7fff).get(), 0x7fff);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic]
fn code_from_bits_rejects_wide_values_in_debug() {
    Code::from_bits(1 << MAX_CODE_WIDTH);
}

#[cfg(not(debug_assertions))]
#[test]
fn code_from_bits_masks_wide_values_in_release() {
    assert_eq!(Code::from_bits(0x1_8003).get(), 0x0003);
    assert_eq!(Code::from_bits(0xffff).get(), 0x7fff);
}
