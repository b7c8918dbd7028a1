use crate::api::{ClassroomApi, CourseFilter};
use crate::classify;
use crate::fetcher::{self, FetchSelector};
use crate::grades;
use crate::join;
use crate::models::{
    AggregatedRecord, Course, CourseGradeReport, CourseWorkState, CourseWorkSummary, GradeRow,
    MissingItem, NewCourseWork, StudentSubmission, UpcomingItem,
};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use tracing::debug;

/// Caller-facing operations over one authenticated classroom client.
///
/// Holds no state between calls: every view re-fetches what it needs.
pub struct Aggregator<A> {
    api: A,
    student_id: String,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl<A: ClassroomApi> Aggregator<A> {
    pub fn new(api: A, student_id: impl Into<String>) -> Self {
        Self {
            api,
            student_id: student_id.into(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn courses(&self, filter: &CourseFilter) -> Result<Vec<Course>> {
        fetcher::resolve_courses(&self.api, filter).await
    }

    pub async fn course_work(&self, course_id: &str) -> Result<Vec<CourseWorkSummary>> {
        let work = self
            .api
            .list_course_work(course_id, &[CourseWorkState::Published])
            .await
            .with_context(|| format!("Failed to list coursework for course {}", course_id))?;

        Ok(work.iter().map(join::summarize).collect())
    }

    pub async fn course_work_detail(
        &self,
        course_id: &str,
        course_work_id: &str,
    ) -> Result<CourseWorkSummary> {
        let work = self
            .api
            .get_course_work(course_id, course_work_id)
            .await
            .with_context(|| {
                format!(
                    "Failed to fetch coursework {} in course {}",
                    course_work_id, course_id
                )
            })?;

        Ok(join::summarize(&work))
    }

    pub async fn submissions(
        &self,
        course_id: &str,
        course_work_id: Option<&str>,
    ) -> Result<Vec<StudentSubmission>> {
        self.api
            .list_submissions(course_id, course_work_id, &self.student_id)
            .await
            .with_context(|| format!("Failed to list submissions for course {}", course_id))
    }

    pub async fn create_course_work(
        &self,
        course_id: &str,
        work: &NewCourseWork,
    ) -> Result<CourseWorkSummary> {
        work.validate()?;

        let created = self
            .api
            .create_course_work(course_id, work)
            .await
            .with_context(|| format!("Failed to create coursework in course {}", course_id))?;

        Ok(join::summarize(&created))
    }

    /// Resolve ACTIVE courses, fan out, and join every course's results.
    async fn joined_records(&self, selector: FetchSelector) -> Result<Vec<AggregatedRecord>> {
        let courses = fetcher::resolve_active_courses(&self.api).await?;
        let fetches = fetcher::fan_out(&self.api, courses, selector, &self.student_id).await;
        let records = join::join_all_courses(fetches);

        debug!(count = records.len(), ?selector, "Joined records");
        Ok(records)
    }

    pub async fn upcoming(&self, days: u32) -> Result<Vec<UpcomingItem>> {
        self.upcoming_on(local_today(), days).await
    }

    pub async fn upcoming_on(&self, today: NaiveDate, days: u32) -> Result<Vec<UpcomingItem>> {
        let records = self.joined_records(FetchSelector::CourseWork).await?;
        Ok(classify::upcoming(&records, today, days))
    }

    pub async fn missing(&self) -> Result<Vec<MissingItem>> {
        self.missing_on(local_today()).await
    }

    pub async fn missing_on(&self, today: NaiveDate) -> Result<Vec<MissingItem>> {
        let records = self.joined_records(FetchSelector::Both).await?;
        Ok(classify::missing(&records, today))
    }

    pub async fn grades(&self) -> Result<Vec<GradeRow>> {
        let records = self.joined_records(FetchSelector::Both).await?;
        Ok(grades::grade_rows(&records))
    }

    /// Grade totals for a single course. Both fetches run concurrently; with
    /// only one course in play, any failure is returned to the caller.
    pub async fn course_grade(&self, course_id: &str) -> Result<CourseGradeReport> {
        let (course, (course_work, submissions)) = futures::try_join!(
            self.api.get_course(course_id),
            fetcher::fetch_course(&self.api, course_id, FetchSelector::Both, &self.student_id),
        )
        .with_context(|| format!("Failed to fetch grades for course {}", course_id))?;

        let records = join::join_course(&course, course_work, submissions);
        Ok(grades::course_grade(&course, &records))
    }
}
