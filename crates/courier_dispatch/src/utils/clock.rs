use jiff::{SignedDuration, civil::Time};

use crate::error::DispatchError;

const SECONDS_PER_HOUR: f64 = 3600.0;

#[macro_export]
macro_rules! timer_debug {
    ($msg:literal,$block:expr) => {{
        let now = jiff::Timestamp::now();
        let result = $block;
        let elapsed = jiff::Timestamp::now().duration_since(now);

        tracing::debug!("{}: Took {:?}", $msg, elapsed);

        result
    }};
}

/// Parses a wall clock time such as `08:00:00` or `10:20`.
pub fn parse_clock(input: &str) -> Result<Time, jiff::Error> {
    input.trim().parse::<Time>()
}

pub fn format_clock(time: Time) -> String {
    time.strftime("%H:%M:%S").to_string()
}

/// Time needed to cover `distance` miles at `speed` miles per hour.
pub fn travel_duration(distance: f64, speed: f64) -> SignedDuration {
    SignedDuration::from_secs_f64(distance * SECONDS_PER_HOUR / speed)
}

/// Advances a clock time; a route is not allowed to run past midnight.
pub fn advance(time: Time, duration: SignedDuration) -> Result<Time, DispatchError> {
    time.checked_add(duration)
        .map_err(|_| DispatchError::ClockOverflow { start: time, duration })
}
