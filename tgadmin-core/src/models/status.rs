//! Resource status vocabularies.
//!
//! Statuses are display-only: the client never branches on them except to
//! decide which bot actions to offer. Unrecognized strings map to `Unknown`.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Tone
// ============================================================================

/// Display tone for a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// Healthy or completed.
    Success,
    /// Needs attention.
    #[default]
    Warning,
    /// Failed or refused.
    Error,
    /// In progress.
    Info,
}

// ============================================================================
// Bot Status
// ============================================================================

/// Bot instance status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BotStatus {
    /// Created, not yet built.
    Pending,
    /// Image build in progress.
    Building,
    /// Container running.
    Running,
    /// Container stopped.
    Stopped,
    /// Build or runtime failure.
    Error,
    /// Unrecognized status.
    #[default]
    #[serde(other)]
    Unknown,
}

impl BotStatus {
    /// Parses a status string.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "pending" => Self::Pending,
            "building" => Self::Building,
            "running" => Self::Running,
            "stopped" => Self::Stopped,
            "error" => Self::Error,
            _ => Self::Unknown,
        }
    }

    /// Returns the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Building => "building",
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }

    /// Returns the badge tone.
    pub fn tone(&self) -> Tone {
        match self {
            Self::Running => Tone::Success,
            Self::Error => Tone::Error,
            Self::Building => Tone::Info,
            Self::Pending | Self::Stopped | Self::Unknown => Tone::Warning,
        }
    }

    /// A stopped bot can be started.
    pub fn can_start(&self) -> bool {
        *self == Self::Stopped
    }

    /// A running bot can be stopped.
    pub fn can_stop(&self) -> bool {
        *self == Self::Running
    }
}

// ============================================================================
// Subscription Status
// ============================================================================

/// Subscription status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Currently valid.
    Active,
    /// Past its end date.
    Expired,
    /// Cancelled by user or admin.
    Cancelled,
    /// Suspended by an admin.
    Suspended,
    /// Unrecognized status.
    #[default]
    #[serde(other)]
    Unknown,
}

impl SubscriptionStatus {
    /// Parses a status string.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "active" => Self::Active,
            "expired" => Self::Expired,
            "cancelled" => Self::Cancelled,
            "suspended" => Self::Suspended,
            _ => Self::Unknown,
        }
    }

    /// Returns the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
            Self::Suspended => "suspended",
            Self::Unknown => "unknown",
        }
    }

    /// Returns the badge tone.
    pub fn tone(&self) -> Tone {
        match self {
            Self::Active => Tone::Success,
            Self::Expired | Self::Cancelled => Tone::Error,
            Self::Suspended | Self::Unknown => Tone::Warning,
        }
    }
}

// ============================================================================
// Payment Status
// ============================================================================

/// Payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Awaiting admin verification.
    Pending,
    /// Verified by an admin.
    Confirmed,
    /// Refused by an admin.
    Rejected,
    /// Cancelled by the user.
    Cancelled,
    /// Unrecognized status.
    #[default]
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    /// Parses a status string.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "pending" => Self::Pending,
            "confirmed" => Self::Confirmed,
            "rejected" => Self::Rejected,
            "cancelled" => Self::Cancelled,
            _ => Self::Unknown,
        }
    }

    /// Returns the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }

    /// Returns the badge tone.
    pub fn tone(&self) -> Tone {
        match self {
            Self::Confirmed => Tone::Success,
            Self::Rejected | Self::Cancelled => Tone::Error,
            Self::Pending | Self::Unknown => Tone::Warning,
        }
    }

    /// Returns the filterable statuses.
    pub fn all() -> &'static [PaymentStatus] {
        &[Self::Pending, Self::Confirmed, Self::Rejected, Self::Cancelled]
    }
}

macro_rules! impl_display {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

impl_display!(BotStatus, SubscriptionStatus, PaymentStatus);

/// Resolves the display tone of a raw status string for a resource.
pub fn status_tone(resource: crate::Resource, raw: &str) -> Tone {
    use crate::Resource;
    match resource {
        Resource::Bots => BotStatus::parse(raw).tone(),
        Resource::Subscriptions => SubscriptionStatus::parse(raw).tone(),
        Resource::Payments => PaymentStatus::parse(raw).tone(),
        Resource::Auth | Resource::Users | Resource::Plans => Tone::Info,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Resource;

    #[test]
    fn test_bot_status_parse() {
        assert_eq!(BotStatus::parse("running"), BotStatus::Running);
        assert_eq!(BotStatus::parse("exploded"), BotStatus::Unknown);
        assert!(BotStatus::Stopped.can_start());
        assert!(!BotStatus::Running.can_start());
        assert!(BotStatus::Running.can_stop());
    }

    #[test]
    fn test_unknown_status_deserializes() {
        let status: PaymentStatus = serde_json::from_str(r#""refunded""#).unwrap();
        assert_eq!(status, PaymentStatus::Unknown);
    }

    #[test]
    fn test_tones() {
        assert_eq!(status_tone(Resource::Bots, "building"), Tone::Info);
        assert_eq!(status_tone(Resource::Payments, "rejected"), Tone::Error);
        assert_eq!(status_tone(Resource::Subscriptions, "active"), Tone::Success);
        assert_eq!(status_tone(Resource::Payments, "pending"), Tone::Warning);
    }

    #[test]
    fn test_display() {
        assert_eq!(PaymentStatus::Confirmed.to_string(), "confirmed");
        assert_eq!(SubscriptionStatus::Suspended.to_string(), "suspended");
    }
}
