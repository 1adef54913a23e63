pub mod calendar;
pub mod details;
pub mod dietary;
pub mod render;
pub mod rsvp;
