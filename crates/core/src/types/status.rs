//! Status enums for contact enquiries and newsletter subscriptions.
//!
//! Both serialize to the lowercase values stored in the `contact_status` and
//! `subscription_status` database enums.

use serde::{Deserialize, Serialize};

/// Moderation status of a contact enquiry.
///
/// Any status may follow any other; there is no transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    #[default]
    Pending,
    /// Shown to admins as "Accepted".
    Responded,
    Rejected,
}

impl ContactStatus {
    /// The stored string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Responded => "responded",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContactStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "responded" => Ok(Self::Responded),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("invalid contact status: {s}")),
        }
    }
}

/// Status of a newsletter subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    Unsubscribed,
}

impl SubscriptionStatus {
    /// The stored string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Unsubscribed => "unsubscribed",
        }
    }

    /// The opposite status (`active` <-> `unsubscribed`).
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Unsubscribed,
            Self::Unsubscribed => Self::Active,
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "unsubscribed" => Ok(Self::Unsubscribed),
            _ => Err(format!("invalid subscription status: {s}")),
        }
    }
}
