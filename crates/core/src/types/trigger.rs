//! Trigger classification for abandonment events.
//!
//! The client-side detection heuristics produce one of a closed set of
//! trigger kinds. Keeping this a variant type (rather than a free string)
//! prevents drift between the producer and the analytics aggregation that
//! consumes it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What the client observed when it recorded an abandonment event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "trigger_event", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum TriggerEvent {
    /// Cursor left the viewport toward the browser chrome.
    CursorLeave,
    /// No interaction for the idle threshold while holding a cart.
    Idle,
    /// Fast upward scroll, usually reaching for the back button.
    ScrollupFast,
}

impl TriggerEvent {
    /// All trigger kinds, in breakdown-reporting order.
    pub const ALL: [Self; 3] = [Self::CursorLeave, Self::Idle, Self::ScrollupFast];

    /// The wire representation (`SCREAMING_SNAKE_CASE`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CursorLeave => "CURSOR_LEAVE",
            Self::Idle => "IDLE",
            Self::ScrollupFast => "SCROLLUP_FAST",
        }
    }
}

impl std::fmt::Display for TriggerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known trigger kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown trigger type: {0}")]
pub struct ParseTriggerEventError(pub String);

impl std::str::FromStr for TriggerEvent {
    type Err = ParseTriggerEventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CURSOR_LEAVE" => Ok(Self::CursorLeave),
            "IDLE" => Ok(Self::Idle),
            "SCROLLUP_FAST" => Ok(Self::ScrollupFast),
            other => Err(ParseTriggerEventError(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_round_trip() {
        for trigger in TriggerEvent::ALL {
            let json = serde_json::to_string(&trigger).expect("serialize");
            assert_eq!(json, format!("\"{trigger}\""));

            let back: TriggerEvent = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(back, trigger);
        }
    }

    #[test]
    fn test_from_str_matches_wire_format() {
        for trigger in TriggerEvent::ALL {
            assert_eq!(trigger.as_str().parse::<TriggerEvent>(), Ok(trigger));
        }
    }

    #[test]
    fn test_unknown_trigger_is_rejected() {
        let err = "MOUSE_WIGGLE".parse::<TriggerEvent>().unwrap_err();
        assert_eq!(err, ParseTriggerEventError("MOUSE_WIGGLE".to_owned()));
        assert!(serde_json::from_str::<TriggerEvent>("\"cursor_leave\"").is_err());
    }
}
