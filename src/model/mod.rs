//! Purpose: Booking-domain entities that participate in JSON mapping.
//! Exports: `Attendee`, `Calendar`, `Event`.
//! Role: Mapping targets for calendar API payloads; no booking rules live here.
//! Invariants: Every entity declares exactly one Field Map and uses the shared date codec.

mod attendee;
mod calendar;
mod event;

pub use attendee::Attendee;
pub use calendar::Calendar;
pub use event::Event;
