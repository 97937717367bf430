//! Schoolgate - HTTP REST backend for a school management system
//!
//! This crate provides the web backend behind a school portal used by three
//! kinds of accounts: administrators, teachers and parents. It supports:
//!
//! - **Authentication**: username/password login issuing short-lived JWTs
//!   that carry the account's role
//! - **Role Guards**: per-surface middleware requiring a teacher or parent
//!   token
//! - **Score Management**: class rosters with per-subject scores and an
//!   atomic save-score upsert
//! - **Leave Requests**: parents file absence requests routed to the
//!   student's homeroom teacher
//! - **Messaging, Timetables, Attendance**: the remaining parent-facing
//!   dashboard data
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use schoolgate::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load()?;
//!     schoolgate::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! ## Public Endpoints
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `POST /api/auth/login` - Login
//! - `GET|POST|PUT|DELETE /api/users/*` - Account CRUD
//! - `GET /admin/years`, `GET /admin/teachers`, `GET /admin/classes/{year}`,
//!   `POST|PUT /admin/class`, `DELETE /admin/class/{id}` - Class admin
//! - `GET /api/parent/years`, `GET /api/parent/semesters/{year}`,
//!   `GET /api/parent/notifications` - Lookup lists
//!
//! ## Teacher Endpoints (teacher token required)
//!
//! - `GET /api/teacher/profile` - Name and homeroom class
//! - `GET /api/teacher/stats` - Dashboard counters
//! - `GET /api/teacher/today-schedule` - Today's lessons
//! - `GET /api/teacher/scores` - Class roster with scores
//! - `POST /api/teacher/save-score` - Insert-or-update one score row
//! - `GET /api/teacher/academic-years` - Year list
//! - `GET /api/teacher/teaching-classes` - Classes taught, grouped
//!
//! ## Parent Endpoints (parent token required)
//!
//! - `GET /api/parent/student` - Linked student
//! - `GET /api/parent/scores/{year}/{semester}` - Score sheet
//! - `GET /api/parent/teachers` - Teacher contacts
//! - `GET|POST /api/parent/messages` - Messaging
//! - `GET /api/parent/timetable?monday=` - Weekly timetable
//! - `GET|POST /api/parent/requests` - Leave requests
//! - `GET /api/parent/homeroom-teacher` - Homeroom teacher name
//! - `GET|PUT /api/parent/profile` - Parent profile
//! - `GET /api/parent/children` - Children list
//! - `GET /api/parent/attendance` - Attendance history

pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod projector;
pub mod routes;
pub mod server;
pub mod state;

pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use server::{build_router, start_server};
pub use state::AppState;
