use chrono::{DateTime, DurationRound, Utc};

/// Current time at the precision Postgres stores (microseconds), so values
/// held in memory compare equal to values read back from the database.
pub fn now() -> DateTime<Utc> {
    let now = Utc::now();
    now.duration_trunc(chrono::Duration::microseconds(1))
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn drops_sub_microsecond_precision() {
        assert_eq!(now().nanosecond() % 1_000, 0);
    }
}
