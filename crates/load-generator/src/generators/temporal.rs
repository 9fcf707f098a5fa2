//! Date and time generators.

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use load_core::GeneratedValue;
use rand::Rng;

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_YEAR: i64 = 365 * SECONDS_PER_DAY;

fn within_last_year<R: Rng + ?Sized>(rng: &mut R, until: NaiveDateTime) -> NaiveDateTime {
    let offset = rng.random_range(0..=SECONDS_PER_YEAR);
    until - Duration::seconds(offset)
}

/// Generate a date in the 365 days up to `until`.
pub fn generate_date_within_last_year<R: Rng + ?Sized>(
    rng: &mut R,
    until: NaiveDateTime,
) -> GeneratedValue {
    GeneratedValue::Date(within_last_year(rng, until).date())
}

/// Generate a datetime, with whole seconds, in the 365 days up to `until`.
pub fn generate_datetime_within_last_year<R: Rng + ?Sized>(
    rng: &mut R,
    until: NaiveDateTime,
) -> GeneratedValue {
    let dt = within_last_year(rng, until);
    GeneratedValue::DateTime(dt.with_nanosecond(0).unwrap_or(dt))
}

/// Generate a time of day with whole seconds.
pub fn generate_time_of_day<R: Rng + ?Sized>(rng: &mut R) -> GeneratedValue {
    let secs = rng.random_range(0..SECONDS_PER_DAY) as u32;
    match NaiveTime::from_num_seconds_from_midnight_opt(secs, 0) {
        Some(t) => GeneratedValue::Time(t),
        None => GeneratedValue::Time(NaiveTime::MIN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn anchor() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_milli_opt(12, 30, 15, 250)
            .unwrap()
    }

    #[test]
    fn test_date_within_last_year() {
        let mut rng = StdRng::seed_from_u64(42);
        let until = anchor();
        let earliest = (until - Duration::days(365)).date();

        for _ in 0..500 {
            match generate_date_within_last_year(&mut rng, until) {
                GeneratedValue::Date(d) => assert!(d >= earliest && d <= until.date()),
                other => panic!("Expected Date, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_datetime_within_last_year() {
        let mut rng = StdRng::seed_from_u64(42);
        let until = anchor();

        for _ in 0..500 {
            match generate_datetime_within_last_year(&mut rng, until) {
                GeneratedValue::DateTime(dt) => {
                    assert!(dt <= until);
                    assert!(dt >= until - Duration::days(366));
                    assert_eq!(dt.nanosecond(), 0);
                }
                other => panic!("Expected DateTime, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_time_of_day_literal() {
        let mut rng = StdRng::seed_from_u64(42);
        let literal = generate_time_of_day(&mut rng).to_sql_literal();
        // 'HH:MM:SS'
        assert_eq!(literal.len(), 10);
        assert_eq!(&literal[3..4], ":");
    }
}
