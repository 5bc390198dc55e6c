//! Status badge lookup shared by both record kinds.
//!
//! Keyed on the raw stored value so unknown or unset statuses still render
//! (as "Pending").

/// Visual severity of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Affirmative,
    Negative,
    Neutral,
    Pending,
}

impl Tone {
    /// Lowercase name, rendered as the badge's `data-tone`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Affirmative => "affirmative",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Pending => "pending",
        }
    }
}

/// Label and CSS classes for a status value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusBadge {
    pub label: &'static str,
    pub class: &'static str,
    pub tone: Tone,
}

const AFFIRMATIVE_CLASS: &str = "bg-green-500/20 text-green-500";
const NEGATIVE_CLASS: &str = "bg-red-500/20 text-red-500";
const NEUTRAL_CLASS: &str = "bg-gray-500/20 text-gray-500";
const PENDING_CLASS: &str = "bg-yellow-500/20 text-yellow-500";

/// Map a stored status value to its badge.
#[must_use]
pub fn status_badge(status: &str) -> StatusBadge {
    match status {
        "responded" => StatusBadge {
            label: "Accepted",
            class: AFFIRMATIVE_CLASS,
            tone: Tone::Affirmative,
        },
        "active" => StatusBadge {
            label: "Active",
            class: AFFIRMATIVE_CLASS,
            tone: Tone::Affirmative,
        },
        "rejected" => StatusBadge {
            label: "Rejected",
            class: NEGATIVE_CLASS,
            tone: Tone::Negative,
        },
        "unsubscribed" => StatusBadge {
            label: "Unsubscribed",
            class: NEUTRAL_CLASS,
            tone: Tone::Neutral,
        },
        _ => StatusBadge {
            label: "Pending",
            class: PENDING_CLASS,
            tone: Tone::Pending,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values() {
        let cases = [
            ("responded", "Accepted", "bg-green-500/20 text-green-500", Tone::Affirmative),
            ("active", "Active", "bg-green-500/20 text-green-500", Tone::Affirmative),
            ("rejected", "Rejected", "bg-red-500/20 text-red-500", Tone::Negative),
            ("unsubscribed", "Unsubscribed", "bg-gray-500/20 text-gray-500", Tone::Neutral),
            ("pending", "Pending", "bg-yellow-500/20 text-yellow-500", Tone::Pending),
        ];

        for (value, label, class, tone) in cases {
            let badge = status_badge(value);
            assert_eq!(badge.label, label, "label for {value}");
            assert_eq!(badge.class, class, "class for {value}");
            assert_eq!(badge.tone, tone, "tone for {value}");
        }
    }

    #[test]
    fn test_unknown_and_empty_fall_back_to_pending() {
        assert_eq!(status_badge("").label, "Pending");
        assert_eq!(status_badge("archived").tone, Tone::Pending);
        assert_eq!(status_badge("Active").label, "Pending");
    }
}
