//! Translation between Calendar API JSON and `calsync_core` types.

mod from_google;
mod to_google;

pub use from_google::FromGoogle;
pub use to_google::ToGoogle;

use calsync_core::ParticipantStatus;
use serde_json::Value;

use crate::error::{GoogleError, GoogleResult};

/// Convert Google's attendee `responseStatus` to a ParticipantStatus.
///
/// The table is closed: anything else is an error, never a default.
pub fn status_from_google(google_status: &str) -> GoogleResult<ParticipantStatus> {
    match google_status {
        "accepted" => Ok(ParticipantStatus::Yes),
        "needsAction" => Ok(ParticipantStatus::NoReply),
        "declined" => Ok(ParticipantStatus::No),
        "tentative" => Ok(ParticipantStatus::Maybe),
        other => Err(GoogleError::UnknownResponseStatus(other.to_string())),
    }
}

/// Convert a ParticipantStatus to Google's `responseStatus` format
pub fn status_to_google(status: ParticipantStatus) -> &'static str {
    match status {
        ParticipantStatus::Yes => "accepted",
        ParticipantStatus::NoReply => "needsAction",
        ParticipantStatus::No => "declined",
        ParticipantStatus::Maybe => "tentative",
    }
}

/// The `id` of a raw list item.
pub(crate) fn item_id(item: &Value) -> GoogleResult<String> {
    item.get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(GoogleError::MissingField("id"))
}
