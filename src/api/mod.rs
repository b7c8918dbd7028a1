mod classroom;
#[cfg(test)]
pub(crate) mod fake;

pub use classroom::{ClassroomClient, DEFAULT_API_BASE};

use crate::models::{
    Course, CourseState, CourseWork, CourseWorkState, NewCourseWork, StudentSubmission,
};
use async_trait::async_trait;
use thiserror::Error;

/// Failure of a single call to the remote classroom service.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("failed to parse response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Course listing filters. Empty `states` means "any state".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseFilter {
    pub states: Vec<CourseState>,
    pub teacher_id: Option<String>,
    pub student_id: Option<String>,
}

impl CourseFilter {
    pub fn active() -> Self {
        Self {
            states: vec![CourseState::Active],
            ..Self::default()
        }
    }
}

/// Read and write operations the aggregation consumes from the classroom
/// service. Implementations are shared by reference across concurrent
/// per-course requests.
#[async_trait]
pub trait ClassroomApi: Send + Sync {
    async fn list_courses(&self, filter: &CourseFilter) -> Result<Vec<Course>, UpstreamError>;

    async fn get_course(&self, course_id: &str) -> Result<Course, UpstreamError>;

    async fn list_course_work(
        &self,
        course_id: &str,
        states: &[CourseWorkState],
    ) -> Result<Vec<CourseWork>, UpstreamError>;

    async fn get_course_work(
        &self,
        course_id: &str,
        course_work_id: &str,
    ) -> Result<CourseWork, UpstreamError>;

    /// `course_work_id` of `None` lists submissions across all coursework in
    /// the course.
    async fn list_submissions(
        &self,
        course_id: &str,
        course_work_id: Option<&str>,
        user_id: &str,
    ) -> Result<Vec<StudentSubmission>, UpstreamError>;

    async fn create_course_work(
        &self,
        course_id: &str,
        work: &NewCourseWork,
    ) -> Result<CourseWork, UpstreamError>;
}
