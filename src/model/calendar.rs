//! Purpose: Calendar list entry (one bookable room or personal calendar).
//! Exports: `Calendar`.
//! Invariants: `identifier` is the calendar id used by event queries.

use crate::core::field_map::FieldMap;
use crate::core::object::ModelObject;
use std::sync::OnceLock;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Calendar {
    pub identifier: String,
    pub name: String,
    pub description: Option<String>,
    pub time_zone: Option<String>,
    pub access_role: Option<String>,
}

impl ModelObject for Calendar {
    const TYPE_NAME: &'static str = "Calendar";

    fn field_map() -> &'static FieldMap<Self> {
        static MAP: OnceLock<FieldMap<Calendar>> = OnceLock::new();
        MAP.get_or_init(|| {
            FieldMap::<Calendar>::builder()
                .value("id", "identifier", |c| &c.identifier, |c| &mut c.identifier)
                .value("summary", "name", |c| &c.name, |c| &mut c.name)
                .value(
                    "description",
                    "description",
                    |c| &c.description,
                    |c| &mut c.description,
                )
                .value("timeZone", "time_zone", |c| &c.time_zone, |c| &mut c.time_zone)
                .value(
                    "accessRole",
                    "access_role",
                    |c| &c.access_role,
                    |c| &mut c.access_role,
                )
                .build()
        })
    }
}
