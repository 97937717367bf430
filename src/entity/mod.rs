//! Sea-ORM entities for the school schema.
//!
//! One module per table. JSON field names on the wire are handled by the
//! route-level payload structs, not here; entities stay snake_case.

pub mod academic_year;
pub mod attendance;
pub mod class;
pub mod leave_request;
pub mod message;
pub mod notification;
pub mod score;
pub mod semester;
pub mod student;
pub mod subject;
pub mod timetable;
pub mod user;
