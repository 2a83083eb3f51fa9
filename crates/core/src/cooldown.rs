//! Wheel cooldown
//!
//! Spin gating: at most one unconfirmed wheel offer may sit in the cart,
//! the first-ever spin is free, and a confirmed redemption closes the
//! wheel for 24 hours. Only a confirmed order moves the clock; spinning
//! without confirming never starts the cooldown.

use std::time::Duration;

use humanize_duration::{Truncate, prelude::DurationExt};
use jiff::Timestamp;

/// Cooldown window between confirmed redemptions, in milliseconds.
pub const COOLDOWN_MS: i64 = 24 * 60 * 60 * 1000;

/// Whether a spin is currently permitted.
///
/// The rules, in order: an offer already in the cart always blocks; a user
/// who never redeemed anything may always spin; an absent timestamp means
/// no active cooldown; otherwise the window must have elapsed.
pub fn can_spin(
    has_offer_in_cart: bool,
    redeemed_any: bool,
    last_spin: Option<Timestamp>,
    now: Timestamp,
) -> bool {
    if has_offer_in_cart {
        return false;
    }

    if !redeemed_any {
        return true;
    }

    let Some(last_spin) = last_spin else {
        return true;
    };

    now.as_millisecond() - last_spin.as_millisecond() >= COOLDOWN_MS
}

/// Milliseconds until the wheel reopens; zero when it is already open.
pub fn remaining_ms(last_spin: Option<Timestamp>, now: Timestamp) -> i64 {
    let Some(last_spin) = last_spin else {
        return 0;
    };

    (COOLDOWN_MS - (now.as_millisecond() - last_spin.as_millisecond())).max(0)
}

/// `HH:MM:SS` countdown, milliseconds truncated toward zero.
#[must_use]
pub fn clock_format(remaining_ms: i64) -> String {
    let total_seconds = remaining_ms.max(0) / 1000;
    let hours = total_seconds / 3600;
    let minutes = total_seconds % 3600 / 60;
    let seconds = total_seconds % 60;

    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Coarse rendering for log and CLI messages, e.g. `23h 59m 1s`.
#[must_use]
pub fn humanize(remaining_ms: i64) -> String {
    let remaining_ms = u64::try_from(remaining_ms.max(0)).unwrap_or(0);

    Duration::from_millis(remaining_ms)
        .human(Truncate::Second)
        .to_string()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn at(ms: i64) -> Timestamp {
        Timestamp::from_millisecond(ms).expect("valid test timestamp")
    }

    #[test]
    fn offer_in_cart_always_blocks() {
        assert!(!can_spin(true, false, None, at(0)));
        assert!(!can_spin(true, true, Some(at(0)), at(COOLDOWN_MS * 2)));
    }

    #[test]
    fn first_spin_is_always_free() {
        assert!(can_spin(false, false, None, at(0)));
        // An unconsumed timestamp without any redemption does not gate.
        assert!(can_spin(false, false, Some(at(0)), at(1)));
    }

    #[test]
    fn missing_timestamp_means_no_cooldown() {
        assert!(can_spin(false, true, None, at(0)));
    }

    #[test]
    fn window_blocks_until_it_elapses() {
        let last = at(10_000);

        assert!(!can_spin(false, true, Some(last), at(10_001)));
        assert!(!can_spin(false, true, Some(last), at(10_000 + COOLDOWN_MS - 1)));
        assert!(can_spin(false, true, Some(last), at(10_000 + COOLDOWN_MS)));
        assert!(can_spin(false, true, Some(last), at(10_000 + COOLDOWN_MS + 1)));
    }

    #[test]
    fn remaining_counts_down_to_zero() {
        let last = at(0);

        assert_eq!(remaining_ms(Some(last), at(0)), COOLDOWN_MS);
        assert_eq!(remaining_ms(Some(last), at(COOLDOWN_MS / 2)), COOLDOWN_MS / 2);
        assert_eq!(remaining_ms(Some(last), at(COOLDOWN_MS)), 0);
        assert_eq!(remaining_ms(Some(last), at(COOLDOWN_MS + 5_000)), 0);
        assert_eq!(remaining_ms(None, at(0)), 0);
    }

    #[test]
    fn clock_format_truncates_to_seconds() {
        assert_eq!(clock_format(0), "00:00:00");
        assert_eq!(clock_format(999), "00:00:00");
        assert_eq!(clock_format(61_000), "00:01:01");
        assert_eq!(clock_format(COOLDOWN_MS - 1_000), "23:59:59");
        assert_eq!(clock_format(-5), "00:00:00");
    }

    #[test]
    fn humanize_renders_a_readable_duration() -> TestResult {
        let rendered = humanize(90_000);

        assert!(rendered.contains("1m"), "unexpected rendering: {rendered}");

        Ok(())
    }
}
