use gtop::collectors::memory::usage_percent;
use gtop::format::{GB, MB, Uptime, bytes_to_gb, bytes_to_mb};
use proptest::prelude::*;

// Up to 1 PiB keeps f64 exact enough for the 0.01 tolerances below.
const MAX_BYTES: u64 = 1 << 50;

proptest! {
    #[test]
    fn gb_round_trip_within_one_hundredth(bytes in 0u64..MAX_BYTES) {
        let gb = bytes_to_gb(bytes);
        let rederived = gb * GB;
        prop_assert!(
            ((rederived - bytes as f64) / GB).abs() <= 0.01,
            "{} bytes -> {} GB -> {} bytes", bytes, gb, rederived
        );
    }

    #[test]
    fn conversions_are_binary_and_two_decimal(bytes in 0u64..MAX_BYTES) {
        let gb = bytes_to_gb(bytes);
        let mb = bytes_to_mb(bytes);
        prop_assert!((gb - bytes as f64 / GB).abs() <= 0.005 + 1e-6);
        prop_assert!((mb - bytes as f64 / MB).abs() <= 0.005 + 1e-6);
        prop_assert!(((gb * 100.0).round() - gb * 100.0).abs() < 1e-6);
    }

    #[test]
    fn uptime_decomposition_brackets_input(secs in 0u64..(1u64 << 40)) {
        let uptime = Uptime::from_secs(secs);
        prop_assert!(uptime.hours < 24);
        prop_assert!(uptime.minutes < 60);
        prop_assert!(uptime.as_secs() <= secs);
        prop_assert!(secs < uptime.as_secs() + 60);
    }

    #[test]
    fn memory_percent_bounded(total in 1u64..MAX_BYTES, frac in 0.0f64..=1.0) {
        let used = (total as f64 * frac) as u64;
        let pct = usage_percent(used.min(total), total);
        prop_assert!((0.0..=100.0).contains(&pct));
    }
}

#[test]
fn sixteen_gigabytes_half_used_is_fifty_percent() {
    assert_eq!(usage_percent(8_000_000_000, 16_000_000_000), 50.0);
}
