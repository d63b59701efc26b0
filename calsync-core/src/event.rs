//! Provider-neutral event types.
//!
//! Providers translate their API responses into these types. A sync pass
//! builds fresh `Event`s every time; nothing here is mutated in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar event (provider-neutral)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Remote identifier
    pub uid: String,
    /// Verbatim rendering of the remote representation, kept for debugging
    pub raw_data: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    /// Whether the event blocks time on the calendar
    pub busy: bool,

    // Timing
    /// Start instant in UTC (midnight UTC of the first day for all-day events)
    pub start: DateTime<Utc>,
    /// End instant in UTC. For all-day events this is midnight of the last
    /// day the event covers (inclusive), not the day after.
    pub end: DateTime<Utc>,
    pub all_day: bool,

    // Ownership
    /// `"Name <email>"` of the creator, or empty
    pub owner: String,
    pub read_only: bool,

    pub participants: Vec<Participant>,
    pub source: EventSource,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.title.is_empty() {
            write!(f, "(No title)")
        } else {
            write!(f, "{}", self.title)
        }
    }
}

/// Where an event record originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    Local,
    Remote,
}

/// An event participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub email: Option<String>,
    pub name: Option<String>,
    pub status: ParticipantStatus,
    /// Free-text comment left by the participant
    pub notes: Option<String>,
    /// Number of additional guests the participant brings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guests: Option<i64>,
}

/// A participant's reply to an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantStatus {
    Yes,
    No,
    Maybe,
    NoReply,
}

impl ParticipantStatus {
    pub const ALL: [ParticipantStatus; 4] = [
        ParticipantStatus::Yes,
        ParticipantStatus::No,
        ParticipantStatus::Maybe,
        ParticipantStatus::NoReply,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantStatus::Yes => "yes",
            ParticipantStatus::No => "no",
            ParticipantStatus::Maybe => "maybe",
            ParticipantStatus::NoReply => "noreply",
        }
    }
}

impl fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_status_serializes_as_short_names() {
        let names: Vec<String> = ParticipantStatus::ALL
            .iter()
            .map(|s| serde_json::to_string(s).unwrap())
            .collect();
        assert_eq!(names, vec!["\"yes\"", "\"no\"", "\"maybe\"", "\"noreply\""]);

        for status in ParticipantStatus::ALL {
            assert_eq!(serde_json::to_string(&status).unwrap(), format!("\"{}\"", status));
        }
    }

    #[test]
    fn test_participant_guests_omitted_when_absent() {
        let participant = Participant {
            email: Some("alice@example.com".to_string()),
            name: None,
            status: ParticipantStatus::Maybe,
            notes: None,
            guests: None,
        };
        let json = serde_json::to_value(&participant).unwrap();
        assert!(json.get("guests").is_none());

        let back: Participant = serde_json::from_value(json).unwrap();
        assert_eq!(back, participant);
    }
}
