//! Purpose: Calendar event (a booking of a room) as returned by the calendar API.
//! Exports: `Event`.
//! Role: Largest mapping target; carries dates, a nested creator and nested attendees.
//! Invariants: `start`/`end`/`created` go through the shared date codec.
//! Invariants: Nested attendees are rebuilt wholesale on every re-map that carries them.

use crate::core::field_map::FieldMap;
use crate::core::object::ModelObject;
use crate::model::Attendee;
use std::sync::OnceLock;
use time::OffsetDateTime;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Event {
    pub identifier: String,
    pub title: String,
    pub details: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub html_link: Option<String>,
    pub start_date: Option<OffsetDateTime>,
    pub end_date: Option<OffsetDateTime>,
    pub created_at: Option<OffsetDateTime>,
    pub creator: Option<Attendee>,
    pub attendees: Vec<Attendee>,
    pub recurrence: Vec<String>,
}

impl ModelObject for Event {
    const TYPE_NAME: &'static str = "Event";

    fn field_map() -> &'static FieldMap<Self> {
        static MAP: OnceLock<FieldMap<Event>> = OnceLock::new();
        MAP.get_or_init(|| {
            FieldMap::<Event>::builder()
                .value("id", "identifier", |e| &e.identifier, |e| &mut e.identifier)
                .value("summary", "title", |e| &e.title, |e| &mut e.title)
                .value("description", "details", |e| &e.details, |e| &mut e.details)
                .value("location", "location", |e| &e.location, |e| &mut e.location)
                .value("status", "status", |e| &e.status, |e| &mut e.status)
                .value("htmlLink", "html_link", |e| &e.html_link, |e| &mut e.html_link)
                .value("start", "start_date", |e| &e.start_date, |e| &mut e.start_date)
                .value("end", "end_date", |e| &e.end_date, |e| &mut e.end_date)
                .value("created", "created_at", |e| &e.created_at, |e| &mut e.created_at)
                .entity("creator", "creator", |e| &e.creator, |e| &mut e.creator)
                .entities("attendees", "attendees", |e| &e.attendees, |e| &mut e.attendees)
                .value("recurrence", "recurrence", |e| &e.recurrence, |e| &mut e.recurrence)
                .build()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Event;
    use crate::core::date::DateCodec;
    use crate::core::object::ModelObject;
    use serde_json::json;

    #[test]
    fn maps_nested_creator_and_attendees() {
        let event = Event::construct(&json!({
            "id": "evt-1",
            "summary": "Standup",
            "creator": {"email": "ola@example.com", "self": true},
            "attendees": [
                {"email": "ola@example.com", "responseStatus": "accepted"},
                {"email": "aquarium@resource.calendar.google.com"}
            ]
        }));

        let creator = event.creator.as_ref().expect("creator");
        assert_eq!(creator.email, "ola@example.com");
        assert!(creator.is_self);
        assert_eq!(event.attendees.len(), 2);
        assert_eq!(
            event.attendees[0].response_status.as_deref(),
            Some("accepted")
        );
    }

    #[test]
    fn remap_replaces_attendee_list() {
        let mut event = Event::construct(&json!({
            "attendees": [{"email": "a@example.com"}, {"email": "b@example.com"}]
        }));
        event.map(&json!({"attendees": [{"email": "c@example.com"}]}));
        assert_eq!(event.attendees.len(), 1);
        assert_eq!(event.attendees[0].email, "c@example.com");

        event.map(&json!({"attendees": "nobody"}));
        assert_eq!(event.attendees.len(), 1);
    }

    #[test]
    fn dates_use_shared_codec() {
        let event = Event::construct(&json!({
            "start": "2015-03-11T09:00:00.0000+01:00",
            "status": "cancelled"
        }));
        let start = event.start_date.expect("start");
        assert_eq!(start.unix_timestamp(), 1_426_060_800);
        assert_eq!(event.status.as_deref(), Some("cancelled"));
        assert_eq!(
            event.to_json()["start"].as_str(),
            DateCodec::shared().format(start).as_deref()
        );
        assert_eq!(
            Event::field_map().temporal_keys(),
            vec!["start", "end", "created"]
        );
        assert!(Event::field_map().validate().is_ok());
    }
}
