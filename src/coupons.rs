//! Coupons

use jiff::Timestamp;
use thiserror::Error;

/// Reasons a coupon can no longer be used.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CouponUnavailable {
    /// The coupon's expiry has passed.
    #[error("coupon expired")]
    Expired,

    /// Every permitted use has been consumed.
    #[error("coupon usage limit reached")]
    Exhausted,
}

/// Check whether a coupon can still be applied at `now`.
///
/// # Errors
///
/// Returns [`CouponUnavailable::Expired`] once `expires_at` has passed and
/// [`CouponUnavailable::Exhausted`] once `usage_count` reaches `max_usage`.
pub fn check_availability(
    expires_at: Timestamp,
    usage_count: u32,
    max_usage: u32,
    now: Timestamp,
) -> Result<(), CouponUnavailable> {
    if expires_at < now {
        return Err(CouponUnavailable::Expired);
    }

    if usage_count >= max_usage {
        return Err(CouponUnavailable::Exhausted);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn fresh_coupon_is_available() -> TestResult {
        let now = Timestamp::now();
        let expires_at = now.checked_add(SignedDuration::from_hours(1))?;

        assert_eq!(check_availability(expires_at, 0, 10, now), Ok(()));

        Ok(())
    }

    #[test]
    fn expired_coupon_is_unavailable() -> TestResult {
        let now = Timestamp::now();
        let expires_at = now.checked_sub(SignedDuration::from_secs(1))?;

        assert_eq!(
            check_availability(expires_at, 0, 10, now),
            Err(CouponUnavailable::Expired)
        );

        Ok(())
    }

    #[test]
    fn exhausted_coupon_is_unavailable() -> TestResult {
        let now = Timestamp::now();
        let expires_at = now.checked_add(SignedDuration::from_hours(1))?;

        assert_eq!(
            check_availability(expires_at, 10, 10, now),
            Err(CouponUnavailable::Exhausted)
        );

        Ok(())
    }
}
