//! Order and order item state machines.

use std::{fmt, str::FromStr};

use jiff::{SignedDuration, Timestamp};
use thiserror::Error;

/// How long after ordering an item may still be returned.
pub const RETURN_WINDOW: SignedDuration = SignedDuration::from_hours(30 * 24);

/// Status errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatusError {
    /// The requested edge is not part of the state machine.
    #[error("cannot move from {from} to {to}")]
    InvalidTransition {
        /// Current status
        from: &'static str,

        /// Requested status
        to: &'static str,
    },

    /// A stored status string did not name a known status.
    #[error("unknown status {0:?}")]
    Unknown(String),
}

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    /// Placed and not yet resolved
    Pending,

    /// Every item was resolved by fulfillment
    Completed,

    /// Canceled as a whole
    Canceled,
}

impl OrderStatus {
    /// Persisted name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        }
    }

    /// Move the order to `next`.
    ///
    /// # Errors
    ///
    /// Only `pending` orders move, and only to `completed` or `canceled`.
    pub fn transition_to(self, next: Self) -> Result<Self, StatusError> {
        match (self, next) {
            (Self::Pending, Self::Completed | Self::Canceled) => Ok(next),
            _ => Err(StatusError::InvalidTransition {
                from: self.as_str(),
                to: next.as_str(),
            }),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = StatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "canceled" => Ok(Self::Canceled),
            other => Err(StatusError::Unknown(other.to_string())),
        }
    }
}

/// Order item status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderItemStatus {
    /// Awaiting fulfillment
    Pending,

    /// Canceled before fulfillment
    Canceled,

    /// Returned by the customer
    Returned,

    /// Delivered
    Completed,
}

impl OrderItemStatus {
    /// Persisted name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Canceled => "canceled",
            Self::Returned => "returned",
            Self::Completed => "completed",
        }
    }

    /// Whether the item has reached a terminal status.
    #[must_use]
    pub fn is_resolved(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Move the item to `next`.
    ///
    /// # Errors
    ///
    /// Items only leave `pending`; `canceled`, `returned` and `completed` are terminal.
    pub fn transition_to(self, next: Self) -> Result<Self, StatusError> {
        match (self, next) {
            (Self::Pending, Self::Canceled | Self::Returned | Self::Completed) => Ok(next),
            _ => Err(StatusError::InvalidTransition {
                from: self.as_str(),
                to: next.as_str(),
            }),
        }
    }
}

impl fmt::Display for OrderItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderItemStatus {
    type Err = StatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "canceled" => Ok(Self::Canceled),
            "returned" => Ok(Self::Returned),
            "completed" => Ok(Self::Completed),
            other => Err(StatusError::Unknown(other.to_string())),
        }
    }
}

/// Whether an order placed at `ordered_at` can still have items returned at `now`.
#[must_use]
pub fn return_window_open(ordered_at: Timestamp, now: Timestamp) -> bool {
    now.duration_since(ordered_at) <= RETURN_WINDOW
}

/// Status an order settles into once every item is resolved, if it should move at all.
///
/// An order with at least one delivered item completes. An order whose items were all
/// canceled or returned is canceled.
#[must_use]
pub fn resolved_order_status<I>(items: I) -> Option<OrderStatus>
where
    I: IntoIterator<Item = OrderItemStatus>,
{
    let mut any_completed = false;
    let mut any_item = false;

    for status in items {
        any_item = true;

        match status {
            OrderItemStatus::Pending => return None,
            OrderItemStatus::Completed => any_completed = true,
            OrderItemStatus::Canceled | OrderItemStatus::Returned => {}
        }
    }

    if any_completed {
        Some(OrderStatus::Completed)
    } else {
        any_item.then_some(OrderStatus::Canceled)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn pending_item_moves_to_every_terminal_status() -> TestResult {
        for next in [
            OrderItemStatus::Canceled,
            OrderItemStatus::Returned,
            OrderItemStatus::Completed,
        ] {
            assert_eq!(OrderItemStatus::Pending.transition_to(next)?, next);
        }

        Ok(())
    }

    #[test]
    fn terminal_items_never_move() {
        let all = [
            OrderItemStatus::Pending,
            OrderItemStatus::Canceled,
            OrderItemStatus::Returned,
            OrderItemStatus::Completed,
        ];

        for from in all.into_iter().filter(|s| s.is_resolved()) {
            for to in all {
                assert!(
                    from.transition_to(to).is_err(),
                    "{from} should not move to {to}"
                );
            }
        }
    }

    #[test]
    fn canceled_order_cannot_be_canceled_again() {
        assert_eq!(
            OrderStatus::Canceled.transition_to(OrderStatus::Canceled),
            Err(StatusError::InvalidTransition {
                from: "canceled",
                to: "canceled"
            })
        );
    }

    #[test]
    fn statuses_round_trip_through_storage_names() -> TestResult {
        assert_eq!("returned".parse::<OrderItemStatus>()?, OrderItemStatus::Returned);
        assert_eq!("completed".parse::<OrderStatus>()?, OrderStatus::Completed);
        assert!("shipped".parse::<OrderStatus>().is_err());

        Ok(())
    }

    #[test]
    fn return_window_is_thirty_days() -> TestResult {
        let ordered_at = Timestamp::UNIX_EPOCH;

        let inside = ordered_at.checked_add(SignedDuration::from_hours(30 * 24))?;
        let outside = inside.checked_add(SignedDuration::from_secs(1))?;

        assert!(return_window_open(ordered_at, inside));
        assert!(!return_window_open(ordered_at, outside));

        Ok(())
    }

    #[test]
    fn order_completes_once_no_item_is_pending() {
        use OrderItemStatus::{Canceled, Completed, Pending, Returned};

        assert_eq!(resolved_order_status([Completed, Pending]), None);
        assert_eq!(
            resolved_order_status([Completed, Canceled, Returned]),
            Some(OrderStatus::Completed)
        );
    }

    #[test]
    fn order_without_delivered_items_is_canceled_once_resolved() {
        use OrderItemStatus::{Canceled, Pending, Returned};

        assert_eq!(
            resolved_order_status([Canceled, Returned]),
            Some(OrderStatus::Canceled)
        );
        assert_eq!(resolved_order_status([Canceled, Pending]), None);
        assert_eq!(resolved_order_status(std::iter::empty()), None);
    }
}
