//! Purpose: Event participant (a person or a room resource) as listed on a calendar event.
//! Exports: `Attendee`.
//! Role: Nested mapping target for `Event::creator` and `Event::attendees`.
//! Invariants: Declares no temporal fields; the date codec group never runs for it.

use crate::core::field_map::FieldMap;
use crate::core::object::ModelObject;
use std::sync::OnceLock;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attendee {
    pub email: String,
    pub name: Option<String>,
    pub response_status: Option<String>,
    pub optional: bool,
    pub is_self: bool,
}

impl ModelObject for Attendee {
    const TYPE_NAME: &'static str = "Attendee";

    fn field_map() -> &'static FieldMap<Self> {
        static MAP: OnceLock<FieldMap<Attendee>> = OnceLock::new();
        MAP.get_or_init(|| {
            FieldMap::<Attendee>::builder()
                .value("email", "email", |a| &a.email, |a| &mut a.email)
                .value("displayName", "name", |a| &a.name, |a| &mut a.name)
                .value(
                    "responseStatus",
                    "response_status",
                    |a| &a.response_status,
                    |a| &mut a.response_status,
                )
                .value("optional", "optional", |a| &a.optional, |a| &mut a.optional)
                .value("self", "is_self", |a| &a.is_self, |a| &mut a.is_self)
                .build()
        })
    }
}
