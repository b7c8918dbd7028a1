use crate::api::{ClassroomApi, CourseFilter, UpstreamError};
use crate::models::{Course, CourseWork, CourseWorkState, StudentSubmission};
use anyhow::{Context, Result};
use futures::future::join_all;
use tracing::{debug, warn};

/// Fetch the working set of courses, in the order upstream returns them.
///
/// Unlike per-course fetches, a failure here aborts the whole aggregation.
pub async fn resolve_courses<A>(api: &A, filter: &CourseFilter) -> Result<Vec<Course>>
where
    A: ClassroomApi + ?Sized,
{
    let courses = api
        .list_courses(filter)
        .await
        .context("Failed to list courses")?;

    debug!(count = courses.len(), ?filter, "Resolved courses");
    Ok(courses)
}

/// Course set used by every cross-course view: ACTIVE courses only.
pub async fn resolve_active_courses<A>(api: &A) -> Result<Vec<Course>>
where
    A: ClassroomApi + ?Sized,
{
    resolve_courses(api, &CourseFilter::active()).await
}

/// Which remote reads to issue for each course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSelector {
    CourseWork,
    Submissions,
    Both,
}

impl FetchSelector {
    fn wants_course_work(self) -> bool {
        matches!(self, FetchSelector::CourseWork | FetchSelector::Both)
    }

    fn wants_submissions(self) -> bool {
        matches!(self, FetchSelector::Submissions | FetchSelector::Both)
    }
}

/// Everything fetched for one course. A course whose fetch failed carries
/// empty lists.
#[derive(Debug, Clone)]
pub struct CourseFetch {
    pub course: Course,
    pub course_work: Vec<CourseWork>,
    pub submissions: Vec<StudentSubmission>,
    pub failed: bool,
}

impl CourseFetch {
    fn empty(course: Course) -> Self {
        Self {
            course,
            course_work: Vec::new(),
            submissions: Vec::new(),
            failed: true,
        }
    }
}

/// Fetch published coursework and/or the student's submissions for one course.
pub async fn fetch_course<A>(
    api: &A,
    course_id: &str,
    selector: FetchSelector,
    student_id: &str,
) -> Result<(Vec<CourseWork>, Vec<StudentSubmission>), UpstreamError>
where
    A: ClassroomApi + ?Sized,
{
    let course_work = async {
        if selector.wants_course_work() {
            api.list_course_work(course_id, &[CourseWorkState::Published])
                .await
        } else {
            Ok(Vec::new())
        }
    };
    let submissions = async {
        if selector.wants_submissions() {
            api.list_submissions(course_id, None, student_id).await
        } else {
            Ok(Vec::new())
        }
    };

    futures::try_join!(course_work, submissions)
}

/// Run the selected fetches for every course at once and wait for all of
/// them. A failing course contributes empty lists and never affects its
/// siblings.
pub async fn fan_out<A>(
    api: &A,
    courses: Vec<Course>,
    selector: FetchSelector,
    student_id: &str,
) -> Vec<CourseFetch>
where
    A: ClassroomApi + ?Sized,
{
    let tasks = courses.into_iter().map(|course| async move {
        match fetch_course(api, &course.id, selector, student_id).await {
            Ok((course_work, submissions)) => CourseFetch {
                course,
                course_work,
                submissions,
                failed: false,
            },
            Err(e) => {
                warn!(
                    course_id = %course.id,
                    course_name = %course.name,
                    error = %e,
                    "Course fetch failed; omitting it from the aggregation"
                );
                CourseFetch::empty(course)
            }
        }
    });

    join_all(tasks).await
}
