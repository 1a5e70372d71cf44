use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

/// Converts a container timestamp to a calendar date and time (UTC).
///
/// Timestamps count 100 ns ticks since 0001-01-01 00:00:00; zero means the
/// frame carries no timestamp.
pub fn timestamp_to_datetime(ticks: u64) -> Option<NaiveDateTime> {
    if ticks == 0 {
        return None;
    }

    let epoch = NaiveDate::from_ymd_opt(1, 1, 1)?.and_hms_opt(0, 0, 0)?;
    let micros = i64::try_from(ticks / 10).ok()?;
    epoch.checked_add_signed(TimeDelta::microseconds(micros))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_means_absent() {
        assert_eq!(timestamp_to_datetime(0), None);
    }

    #[test]
    fn test_ticks_convert_to_calendar_time() {
        // 2015-01-01 00:00:00 is 635_556_672_000_000_000 ticks after year 1
        let ticks = 635_556_672_000_000_000u64 + 12_345_670;
        let datetime = timestamp_to_datetime(ticks).unwrap();

        assert_eq!(
            datetime.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
            "2015-01-01 00:00:01.234567"
        );
    }
}
