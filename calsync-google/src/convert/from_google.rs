use calsync_core::{Calendar, Event, EventSource, Participant};
use chrono::{DateTime, Days, Duration, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::Value;

use super::status_from_google;
use crate::error::{GoogleError, GoogleResult};

pub trait FromGoogle {
    fn from_google(item: Value) -> GoogleResult<Self>
    where
        Self: Sized;
}

/// A calendarList entry, as far as we read it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleCalendar {
    id: String,
    summary: String,
    access_role: String,
    description: Option<String>,
}

impl FromGoogle for Calendar {
    fn from_google(item: Value) -> GoogleResult<Self> {
        let calendar: GoogleCalendar = serde_json::from_value(item)?;

        Ok(Calendar {
            uid: calendar.id,
            name: calendar.summary,
            read_only: calendar.access_role == "reader",
            description: calendar.description,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleEvent {
    id: String,
    summary: Option<String>,
    description: Option<String>,
    location: Option<String>,
    start: Option<GoogleEventTime>,
    end: Option<GoogleEventTime>,
    transparency: Option<String>,
    creator: Option<GoogleCreator>,
    #[serde(default)]
    guests_can_modify: bool,
    #[serde(default)]
    attendees: Vec<GoogleAttendee>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleEventTime {
    date: Option<String>,
    date_time: Option<String>,
    time_zone: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleCreator {
    display_name: Option<String>,
    email: Option<String>,
    #[serde(rename = "self", default)]
    is_self: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleAttendee {
    email: Option<String>,
    display_name: Option<String>,
    response_status: Option<String>,
    comment: Option<String>,
    additional_guests: Option<i64>,
}

impl FromGoogle for Event {
    fn from_google(item: Value) -> GoogleResult<Self> {
        let raw_data = item.to_string();
        let event: GoogleEvent = serde_json::from_value(item)?;

        let start = event.start.ok_or(GoogleError::MissingField("start"))?;
        let end = event.end.ok_or(GoogleError::MissingField("end"))?;

        let (start, end, all_day) = match (&start.date, &end.date) {
            (Some(start_date), Some(end_date)) => {
                // Google's all-day end date is exclusive
                let last_day = parse_date(end_date)?
                    .checked_sub_days(Days::new(1))
                    .ok_or_else(|| GoogleError::InvalidTimestamp(end_date.clone()))?;
                (midnight_utc(parse_date(start_date)?), midnight_utc(last_day), true)
            }
            _ => (
                parse_event_time(&start, "start.dateTime")?,
                parse_event_time(&end, "end.dateTime")?,
                false,
            ),
        };

        let busy = event.transparency.as_deref() != Some("transparent");

        let owner = event
            .creator
            .as_ref()
            .map(|c| {
                format!(
                    "{} <{}>",
                    c.display_name.as_deref().unwrap_or_default(),
                    c.email.as_deref().unwrap_or_default()
                )
            })
            .unwrap_or_default();

        let is_owner = event.creator.as_ref().is_some_and(|c| c.is_self);
        let read_only = !(is_owner || event.guests_can_modify);

        let participants = event
            .attendees
            .into_iter()
            .map(|a| {
                let status = a
                    .response_status
                    .as_deref()
                    .ok_or(GoogleError::MissingField("attendees.responseStatus"))
                    .and_then(status_from_google)?;

                Ok(Participant {
                    email: a.email,
                    name: a.display_name,
                    status,
                    notes: a.comment,
                    guests: a.additional_guests,
                })
            })
            .collect::<GoogleResult<Vec<_>>>()?;

        Ok(Event {
            uid: event.id,
            raw_data,
            title: event.summary.unwrap_or_default(),
            description: event.description,
            location: event.location,
            busy,
            start,
            end,
            all_day,
            owner,
            read_only,
            participants,
            source: EventSource::Remote,
        })
    }
}

fn parse_date(s: &str) -> GoogleResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| GoogleError::InvalidTimestamp(s.to_string()))
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Parse a `dateTime`, normalized to UTC.
///
/// Google sends an RFC 3339 offset. Without one, the wall-clock time is
/// read in the event's `timeZone`. An ambiguous time (clocks going back)
/// takes the earlier instant. A time skipped by clocks going forward is
/// read with the offset in effect before the jump, which lands it the
/// length of the gap later on the wall clock.
fn parse_event_time(time: &GoogleEventTime, field: &'static str) -> GoogleResult<DateTime<Utc>> {
    let value = time.date_time.as_deref().ok_or(GoogleError::MissingField(field))?;

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    let invalid = || GoogleError::InvalidTimestamp(value.to_string());

    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").map_err(|_| invalid())?;
    let tz: Tz = time
        .time_zone
        .as_deref()
        .ok_or_else(invalid)?
        .parse()
        .map_err(|_| invalid())?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Ok(dt.with_timezone(&Utc)),
        LocalResult::None => {
            let before_gap = tz.offset_from_utc_datetime(&(naive - Duration::days(1))).fix();
            let utc = naive - Duration::seconds(i64::from(before_gap.local_minus_utc()));
            Ok(utc.and_utc())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calsync_core::ParticipantStatus;
    use serde_json::json;

    fn timed_event() -> Value {
        json!({
            "id": "evt-1",
            "status": "confirmed",
            "summary": "Planning",
            "description": "Quarterly planning",
            "location": "Room 4",
            "start": {"dateTime": "2024-03-01T10:00:00-05:00"},
            "end": {"dateTime": "2024-03-01T11:30:00-05:00"},
            "creator": {"displayName": "Ada", "email": "ada@example.com", "self": true},
            "attendees": [
                {"email": "bob@example.com", "displayName": "Bob", "responseStatus": "accepted"},
                {"email": "cy@example.com", "responseStatus": "declined", "comment": "away"},
                {"email": "di@example.com", "responseStatus": "tentative", "additionalGuests": 2},
                {"email": "ed@example.com", "responseStatus": "needsAction"}
            ]
        })
    }

    #[test]
    fn test_timed_event_is_normalized_to_utc() {
        let event = Event::from_google(timed_event()).unwrap();

        assert_eq!(event.uid, "evt-1");
        assert_eq!(event.title, "Planning");
        assert_eq!(event.description.as_deref(), Some("Quarterly planning"));
        assert_eq!(event.location.as_deref(), Some("Room 4"));
        assert!(!event.all_day);
        assert_eq!(event.start, Utc.with_ymd_and_hms(2024, 3, 1, 15, 0, 0).unwrap());
        assert_eq!(event.end, Utc.with_ymd_and_hms(2024, 3, 1, 16, 30, 0).unwrap());
        assert_eq!(event.source, EventSource::Remote);
    }

    #[test]
    fn test_all_day_end_is_inclusive() {
        let item = json!({
            "id": "holiday",
            "start": {"date": "2024-03-01"},
            "end": {"date": "2024-03-03"}
        });

        let event = Event::from_google(item).unwrap();

        assert!(event.all_day);
        assert_eq!(event.start, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(event.end, Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_mixed_date_and_datetime_is_not_all_day() {
        let item = json!({
            "id": "odd",
            "start": {"date": "2024-03-01"},
            "end": {"dateTime": "2024-03-01T11:30:00Z"}
        });

        let err = Event::from_google(item).unwrap_err();
        assert!(matches!(err, GoogleError::MissingField("start.dateTime")));
    }

    #[test]
    fn test_naive_datetime_uses_time_zone() {
        let item = json!({
            "id": "tz",
            "start": {"dateTime": "2024-07-01T09:00:00", "timeZone": "Europe/Berlin"},
            "end": {"dateTime": "2024-07-01T10:00:00", "timeZone": "Europe/Berlin"}
        });

        let event = Event::from_google(item).unwrap();
        assert_eq!(event.start, Utc.with_ymd_and_hms(2024, 7, 1, 7, 0, 0).unwrap());
        assert_eq!(event.end, Utc.with_ymd_and_hms(2024, 7, 1, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_naive_datetime_in_spring_forward_gap_shifts_later() {
        // 02:00-03:00 does not exist in Berlin on 2024-03-31
        let item = json!({
            "id": "gap",
            "start": {"dateTime": "2024-03-31T02:30:00", "timeZone": "Europe/Berlin"},
            "end": {"dateTime": "2024-03-31T04:00:00", "timeZone": "Europe/Berlin"}
        });

        let event = Event::from_google(item).unwrap();
        // Read as 02:30 CET, i.e. 03:30 CEST
        assert_eq!(event.start, Utc.with_ymd_and_hms(2024, 3, 31, 1, 30, 0).unwrap());
        assert_eq!(event.end, Utc.with_ymd_and_hms(2024, 3, 31, 2, 0, 0).unwrap());
    }

    #[test]
    fn test_naive_datetime_in_fall_back_overlap_takes_earlier() {
        // 02:00-03:00 happens twice in Berlin on 2024-10-27
        let item = json!({
            "id": "overlap",
            "start": {"dateTime": "2024-10-27T02:30:00", "timeZone": "Europe/Berlin"},
            "end": {"dateTime": "2024-10-27T04:00:00", "timeZone": "Europe/Berlin"}
        });

        let event = Event::from_google(item).unwrap();
        assert_eq!(event.start, Utc.with_ymd_and_hms(2024, 10, 27, 0, 30, 0).unwrap());
    }

    #[test]
    fn test_busy_unless_transparent() {
        let mut item = timed_event();
        assert!(Event::from_google(item.clone()).unwrap().busy);

        item["transparency"] = json!("opaque");
        assert!(Event::from_google(item.clone()).unwrap().busy);

        item["transparency"] = json!("transparent");
        assert!(!Event::from_google(item).unwrap().busy);
    }

    #[test]
    fn test_owner_and_read_only() {
        let event = Event::from_google(timed_event()).unwrap();
        assert_eq!(event.owner, "Ada <ada@example.com>");
        assert!(!event.read_only);

        let mut item = timed_event();
        item["creator"] = json!({"email": "boss@example.com"});
        let event = Event::from_google(item.clone()).unwrap();
        assert_eq!(event.owner, " <boss@example.com>");
        assert!(event.read_only);

        item["guestsCanModify"] = json!(true);
        assert!(!Event::from_google(item.clone()).unwrap().read_only);

        item.as_object_mut().unwrap().remove("creator");
        item.as_object_mut().unwrap().remove("guestsCanModify");
        let event = Event::from_google(item).unwrap();
        assert_eq!(event.owner, "");
        assert!(event.read_only);
    }

    #[test]
    fn test_attendees_map_through_status_table() {
        let event = Event::from_google(timed_event()).unwrap();

        let statuses: Vec<ParticipantStatus> =
            event.participants.iter().map(|p| p.status).collect();
        assert_eq!(
            statuses,
            vec![
                ParticipantStatus::Yes,
                ParticipantStatus::No,
                ParticipantStatus::Maybe,
                ParticipantStatus::NoReply,
            ]
        );

        assert_eq!(event.participants[0].name.as_deref(), Some("Bob"));
        assert_eq!(event.participants[1].notes.as_deref(), Some("away"));
        assert_eq!(event.participants[2].guests, Some(2));
        assert_eq!(event.participants[3].email.as_deref(), Some("ed@example.com"));
    }

    #[test]
    fn test_unknown_attendee_status_fails_translation() {
        let mut item = timed_event();
        item["attendees"][1]["responseStatus"] = json!("maybe-later");

        let err = Event::from_google(item).unwrap_err();
        assert!(matches!(err, GoogleError::UnknownResponseStatus(s) if s == "maybe-later"));
    }

    #[test]
    fn test_missing_attendee_status_fails_translation() {
        let mut item = timed_event();
        item["attendees"][0].as_object_mut().unwrap().remove("responseStatus");

        assert!(Event::from_google(item).is_err());
    }

    #[test]
    fn test_raw_data_preserves_structure() {
        let item = timed_event();
        let event = Event::from_google(item.clone()).unwrap();

        let reparsed: Value = serde_json::from_str(&event.raw_data).unwrap();
        assert_eq!(reparsed, item);
    }

    #[test]
    fn test_calendar_read_only_from_access_role() {
        let reader = Calendar::from_google(json!({
            "id": "holidays@group.v.calendar.google.com",
            "summary": "Holidays",
            "accessRole": "reader"
        }))
        .unwrap();
        assert!(reader.read_only);
        assert_eq!(reader.description, None);

        let owner = Calendar::from_google(json!({
            "id": "me@example.com",
            "summary": "Me",
            "description": "Personal",
            "accessRole": "owner"
        }))
        .unwrap();
        assert!(!owner.read_only);
        assert_eq!(owner.uid, "me@example.com");
        assert_eq!(owner.name, "Me");
        assert_eq!(owner.description.as_deref(), Some("Personal"));
    }
}
