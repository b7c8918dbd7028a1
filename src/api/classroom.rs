use super::{ClassroomApi, CourseFilter, UpstreamError};
use crate::models::{
    Course, CourseWork, CourseWorkState, ListCourseWorkResponse, ListCoursesResponse,
    ListStudentSubmissionsResponse, NewCourseWork, Page, StudentSubmission,
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;
use tracing::warn;

pub const DEFAULT_API_BASE: &str = "https://classroom.googleapis.com/v1";

const PAGE_SIZE: &str = "100";

// Hard stop so a misbehaving page token can't loop forever
const MAX_PAGES: usize = 50;

/// A listing that still had pages left after `MAX_PAGES` comes back short.
fn warn_page_cap(path: &str, items: usize) {
    warn!(
        path,
        pages = MAX_PAGES,
        items,
        "Listing truncated at page limit; remaining pages were not fetched"
    );
}

/// HTTP client for the classroom REST resources. Cheap to clone; the inner
/// connection pool is shared.
#[derive(Clone)]
pub struct ClassroomClient {
    client: reqwest::Client,
    token: String,
    api_base: String,
}

impl ClassroomClient {
    pub fn new(token: String) -> Result<Self, UpstreamError> {
        Self::with_base(token, DEFAULT_API_BASE)
    }

    pub fn with_base(token: String, api_base: impl Into<String>) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120)) // 2 minute timeout
            .connect_timeout(std::time::Duration::from_secs(30))
            .default_headers(Self::build_headers())
            .build()
            .map_err(UpstreamError::Client)?;

        Ok(Self {
            client,
            token,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    fn build_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("classroom-aggregator"));
        headers
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<T, UpstreamError> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|source| UpstreamError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();

        // Get the response text for both error and success cases
        let response_text = response
            .text()
            .await
            .map_err(|source| UpstreamError::Transport {
                url: url.to_string(),
                source,
            })?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: response_text.chars().take(500).collect(),
            });
        }

        serde_json::from_str(&response_text).map_err(|source| UpstreamError::Decode {
            url: url.to_string(),
            source,
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let url = self.url(path);
        self.send(self.client.get(&url).query(query), &url).await
    }

    /// Follow `nextPageToken` until the listing is exhausted.
    async fn get_all<P>(
        &self,
        path: &str,
        query: Vec<(&str, String)>,
    ) -> Result<Vec<P::Item>, UpstreamError>
    where
        P: Page + DeserializeOwned,
    {
        let mut all_items = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let mut page_query = query.clone();
            page_query.push(("pageSize", PAGE_SIZE.to_string()));
            if let Some(token) = page_token.take() {
                page_query.push(("pageToken", token));
            }

            let page: P = self.get(path, &page_query).await?;
            let (items, next) = page.into_parts();
            all_items.extend(items);

            match next {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => return Ok(all_items),
            }
        }

        warn_page_cap(path, all_items.len());
        Ok(all_items)
    }
}

#[async_trait]
impl ClassroomApi for ClassroomClient {
    async fn list_courses(&self, filter: &CourseFilter) -> Result<Vec<Course>, UpstreamError> {
        let mut query: Vec<(&str, String)> = filter
            .states
            .iter()
            .map(|state| ("courseStates", state.as_str().to_string()))
            .collect();
        if let Some(teacher_id) = &filter.teacher_id {
            query.push(("teacherId", teacher_id.clone()));
        }
        if let Some(student_id) = &filter.student_id {
            query.push(("studentId", student_id.clone()));
        }

        self.get_all::<ListCoursesResponse>("/courses", query).await
    }

    async fn get_course(&self, course_id: &str) -> Result<Course, UpstreamError> {
        let path = format!("/courses/{}", course_id);
        self.get(&path, &[]).await
    }

    async fn list_course_work(
        &self,
        course_id: &str,
        states: &[CourseWorkState],
    ) -> Result<Vec<CourseWork>, UpstreamError> {
        let path = format!("/courses/{}/courseWork", course_id);
        let query = states
            .iter()
            .map(|state| ("courseWorkStates", state.as_str().to_string()))
            .collect();

        self.get_all::<ListCourseWorkResponse>(&path, query).await
    }

    async fn get_course_work(
        &self,
        course_id: &str,
        course_work_id: &str,
    ) -> Result<CourseWork, UpstreamError> {
        let path = format!("/courses/{}/courseWork/{}", course_id, course_work_id);
        self.get(&path, &[]).await
    }

    async fn list_submissions(
        &self,
        course_id: &str,
        course_work_id: Option<&str>,
        user_id: &str,
    ) -> Result<Vec<StudentSubmission>, UpstreamError> {
        // "-" asks for submissions across every coursework item in the course
        let path = format!(
            "/courses/{}/courseWork/{}/studentSubmissions",
            course_id,
            course_work_id.unwrap_or("-")
        );
        let query = vec![("userId", user_id.to_string())];

        self.get_all::<ListStudentSubmissionsResponse>(&path, query)
            .await
    }

    async fn create_course_work(
        &self,
        course_id: &str,
        work: &NewCourseWork,
    ) -> Result<CourseWork, UpstreamError> {
        let url = self.url(&format!("/courses/{}/courseWork", course_id));
        self.send(self.client.post(&url).json(work), &url).await
    }
}
