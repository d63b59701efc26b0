use calsync_core::{Event, Participant};
use chrono::{DateTime, Days, SecondsFormat, Utc};
use serde_json::{Map, Value, json};

use super::status_to_google;

pub trait ToGoogle {
    fn to_google(&self) -> Value;
}

impl ToGoogle for Event {
    fn to_google(&self) -> Value {
        let mut body = Map::new();

        body.insert("summary".to_string(), json!(self.title));
        body.insert("description".to_string(), json!(self.description));
        body.insert("location".to_string(), json!(self.location));

        // Whether the event blocks time on the calendar
        let transparency = if self.busy { "opaque" } else { "transparent" };
        body.insert("transparency".to_string(), json!(transparency));

        if self.all_day {
            // Stored end is the last covered day; Google wants the day after
            let end = self
                .end
                .date_naive()
                .checked_add_days(Days::new(1))
                .unwrap_or(self.end.date_naive());

            body.insert("start".to_string(), json!({ "date": format_date(&self.start) }));
            body.insert("end".to_string(), json!({ "date": end.format("%Y-%m-%d").to_string() }));
        } else {
            body.insert("start".to_string(), date_time_to_google(&self.start));
            body.insert("end".to_string(), date_time_to_google(&self.end));
        }

        if !self.participants.is_empty() {
            let attendees: Vec<Value> = self
                .participants
                .iter()
                .map(participant_to_google)
                .collect();
            body.insert("attendees".to_string(), Value::Array(attendees));
        }

        Value::Object(body)
    }
}

fn format_date(dt: &DateTime<Utc>) -> String {
    dt.date_naive().format("%Y-%m-%d").to_string()
}

fn date_time_to_google(dt: &DateTime<Utc>) -> Value {
    json!({
        "dateTime": dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        "timeZone": "UTC",
    })
}

/// `responseStatus` is always present; the other fields only when set.
fn participant_to_google(participant: &Participant) -> Value {
    let mut attendee = Map::new();

    if let Some(ref name) = participant.name {
        attendee.insert("displayName".to_string(), json!(name));
    }

    attendee.insert(
        "responseStatus".to_string(),
        json!(status_to_google(participant.status)),
    );

    if let Some(ref email) = participant.email {
        attendee.insert("email".to_string(), json!(email));
    }

    if let Some(guests) = participant.guests {
        attendee.insert("additionalGuests".to_string(), json!(guests));
    }

    Value::Object(attendee)
}
