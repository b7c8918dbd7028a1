//! In-memory classroom service for tests.

use super::{ClassroomApi, CourseFilter, UpstreamError};
use crate::models::{
    Course, CourseState, CourseWork, CourseWorkState, Date, NewCourseWork, StudentSubmission,
    SubmissionState, WorkType,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Barrier;

#[derive(Default)]
pub(crate) struct FakeClassroom {
    pub courses: Vec<Course>,
    pub course_work: HashMap<String, Vec<CourseWork>>,
    pub submissions: HashMap<String, Vec<StudentSubmission>>,
    pub fail_course_listing: bool,
    pub failing_course_work: HashSet<String>,
    pub failing_submissions: HashSet<String>,
    pub calls: AtomicUsize,
    /// Coursework listings for these courses block until every party has
    /// reached the barrier.
    pub barrier: Option<Arc<Barrier>>,
    pub barrier_courses: HashSet<String>,
    pub delays: HashMap<String, Duration>,
}

fn failure(path: String) -> UpstreamError {
    UpstreamError::Status {
        url: path,
        status: 403,
        body: "The caller does not have permission".to_string(),
    }
}

impl FakeClassroom {
    pub fn with_course(mut self, id: &str, name: &str, state: CourseState) -> Self {
        self.courses.push(course(id, name, state));
        self
    }

    pub fn with_work(mut self, work: CourseWork) -> Self {
        self.course_work
            .entry(work.course_id.clone())
            .or_default()
            .push(work);
        self
    }

    pub fn with_submission(mut self, submission: StudentSubmission) -> Self {
        self.submissions
            .entry(submission.course_id.clone())
            .or_default()
            .push(submission);
        self
    }

    pub fn failing_course_work(mut self, course_id: &str) -> Self {
        self.failing_course_work.insert(course_id.to_string());
        self
    }

    pub fn failing_submissions(mut self, course_id: &str) -> Self {
        self.failing_submissions.insert(course_id.to_string());
        self
    }

    pub fn meeting_at(mut self, barrier: &Arc<Barrier>, course_id: &str) -> Self {
        self.barrier = Some(Arc::clone(barrier));
        self.barrier_courses.insert(course_id.to_string());
        self
    }

    pub fn delayed(mut self, course_id: &str, delay: Duration) -> Self {
        self.delays.insert(course_id.to_string(), delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub(crate) fn course(id: &str, name: &str, state: CourseState) -> Course {
    Course {
        id: id.to_string(),
        name: name.to_string(),
        section: None,
        course_state: state,
        alternate_link: None,
    }
}

pub(crate) fn work(course_id: &str, id: &str, due: Option<(i32, u32, u32)>) -> CourseWork {
    CourseWork {
        course_id: course_id.to_string(),
        id: id.to_string(),
        title: format!("Work {}", id),
        description: None,
        materials: Vec::new(),
        state: CourseWorkState::Published,
        alternate_link: Some(format!("https://classroom.example/{}/{}", course_id, id)),
        due_date: due.map(|(y, m, d)| Date::new(y, m, d)),
        due_time: None,
        max_points: Some(100.0),
        work_type: WorkType::Assignment,
        update_time: None,
    }
}

pub(crate) fn submission(
    course_id: &str,
    course_work_id: &str,
    state: SubmissionState,
    grade: Option<f64>,
) -> StudentSubmission {
    StudentSubmission {
        course_id: course_id.to_string(),
        course_work_id: course_work_id.to_string(),
        id: format!("sub-{}", course_work_id),
        user_id: "student-1".to_string(),
        state,
        late: false,
        assigned_grade: grade,
        draft_grade: None,
        update_time: None,
        alternate_link: None,
    }
}

#[async_trait]
impl ClassroomApi for FakeClassroom {
    async fn list_courses(&self, filter: &CourseFilter) -> Result<Vec<Course>, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_course_listing {
            return Err(failure("/courses".to_string()));
        }
        Ok(self
            .courses
            .iter()
            .filter(|c| filter.states.is_empty() || filter.states.contains(&c.course_state))
            .cloned()
            .collect())
    }

    async fn get_course(&self, course_id: &str) -> Result<Course, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.courses
            .iter()
            .find(|c| c.id == course_id)
            .cloned()
            .ok_or_else(|| failure(format!("/courses/{}", course_id)))
    }

    async fn list_course_work(
        &self,
        course_id: &str,
        states: &[CourseWorkState],
    ) -> Result<Vec<CourseWork>, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(course_id) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(barrier) = &self.barrier {
            if self.barrier_courses.contains(course_id) {
                barrier.wait().await;
            }
        }
        if self.failing_course_work.contains(course_id) {
            return Err(failure(format!("/courses/{}/courseWork", course_id)));
        }
        Ok(self
            .course_work
            .get(course_id)
            .map(|items| {
                items
                    .iter()
                    .filter(|w| states.is_empty() || states.contains(&w.state))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get_course_work(
        &self,
        course_id: &str,
        course_work_id: &str,
    ) -> Result<CourseWork, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.course_work
            .get(course_id)
            .and_then(|items| items.iter().find(|w| w.id == course_work_id))
            .cloned()
            .ok_or_else(|| {
                failure(format!(
                    "/courses/{}/courseWork/{}",
                    course_id, course_work_id
                ))
            })
    }

    async fn list_submissions(
        &self,
        course_id: &str,
        course_work_id: Option<&str>,
        user_id: &str,
    ) -> Result<Vec<StudentSubmission>, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_submissions.contains(course_id) {
            return Err(failure(format!(
                "/courses/{}/courseWork/-/studentSubmissions",
                course_id
            )));
        }
        Ok(self
            .submissions
            .get(course_id)
            .map(|items| {
                items
                    .iter()
                    .filter(|s| course_work_id.map_or(true, |id| s.course_work_id == id))
                    .filter(|s| user_id == "me" || s.user_id == user_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create_course_work(
        &self,
        course_id: &str,
        new_work: &NewCourseWork,
    ) -> Result<CourseWork, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.courses.iter().any(|c| c.id == course_id) {
            return Err(failure(format!("/courses/{}/courseWork", course_id)));
        }
        Ok(CourseWork {
            course_id: course_id.to_string(),
            id: "created-1".to_string(),
            title: new_work.title.clone(),
            description: new_work.description.clone(),
            materials: Vec::new(),
            state: new_work.state,
            alternate_link: None,
            due_date: new_work.due_date,
            due_time: new_work.due_time,
            max_points: new_work.max_points,
            work_type: new_work.work_type,
            update_time: None,
        })
    }
}
