//! Timestamp value generators.

use chrono::{DateTime, Duration, Months, Utc};
use rand::Rng;

/// Start of a window reaching `months` calendar months back from `now`.
///
/// Months are subtracted on the calendar, so the day count varies with the
/// months crossed; days past the end of a shorter month clamp to its last day.
pub fn window_start(now: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(months))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Generate a random instant in `[now - months, now]`, millisecond granularity.
pub fn generate_timestamp_in_window<R: Rng>(
    rng: &mut R,
    now: DateTime<Utc>,
    months: u32,
) -> DateTime<Utc> {
    let start = window_start(now, months);
    let span_ms = (now - start).num_milliseconds();

    if span_ms <= 0 {
        return now;
    }

    start + Duration::milliseconds(rng.gen_range(0..=span_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_window_start_uses_calendar_months() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();

        assert_eq!(
            window_start(now, 1),
            Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap()
        );
        assert_eq!(
            window_start(now, 12),
            Utc.with_ymd_and_hms(2023, 3, 31, 12, 0, 0).unwrap()
        );
        assert_eq!(window_start(now, 0), now);
    }

    #[test]
    fn test_generate_timestamp_in_window() {
        let mut rng = StdRng::seed_from_u64(42);
        let now = Utc.with_ymd_and_hms(2024, 5, 15, 8, 30, 0).unwrap();
        let start = window_start(now, 6);

        for _ in 0..500 {
            let ts = generate_timestamp_in_window(&mut rng, now, 6);
            assert!(ts >= start && ts <= now, "{ts} outside [{start}, {now}]");
        }
    }

    #[test]
    fn test_sub_millisecond_now_stays_in_window() {
        let mut rng = StdRng::seed_from_u64(3);
        let now = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let start = window_start(now, 1);

        for _ in 0..200 {
            let ts = generate_timestamp_in_window(&mut rng, now, 1);
            assert!(ts >= start && ts <= now);
        }
    }

    #[test]
    fn test_zero_window_is_now() {
        let mut rng = StdRng::seed_from_u64(42);
        let now = Utc::now();

        assert_eq!(generate_timestamp_in_window(&mut rng, now, 0), now);
    }

    #[test]
    fn test_deterministic_generation() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);

        assert_eq!(
            generate_timestamp_in_window(&mut rng1, now, 3),
            generate_timestamp_in_window(&mut rng2, now, 3)
        );
    }
}
