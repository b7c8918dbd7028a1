//! Cross-course views over a remote classroom service: upcoming work,
//! missing work, grade listings, and per-course grade totals.
//!
//! Every view resolves the student's ACTIVE courses, fetches each course
//! concurrently, joins coursework with submissions, then classifies or
//! totals the joined records. A course whose fetch fails is left out of the
//! result instead of failing the whole view.

pub mod aggregator;
pub mod api;
pub mod classify;
pub mod config;
pub mod export;
pub mod fetcher;
pub mod grades;
pub mod join;
pub mod logging;
pub mod models;

pub use aggregator::Aggregator;
pub use api::{ClassroomApi, ClassroomClient, CourseFilter, UpstreamError};
