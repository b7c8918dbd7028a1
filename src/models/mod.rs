use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Classroom API Models
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseState {
    Active,
    Archived,
    Provisioned,
    Declined,
    Suspended,
    #[default]
    #[serde(other)]
    CourseStateUnspecified,
}

impl CourseState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseState::Active => "ACTIVE",
            CourseState::Archived => "ARCHIVED",
            CourseState::Provisioned => "PROVISIONED",
            CourseState::Declined => "DECLINED",
            CourseState::Suspended => "SUSPENDED",
            CourseState::CourseStateUnspecified => "COURSE_STATE_UNSPECIFIED",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub section: Option<String>,
    #[serde(default)]
    pub course_state: CourseState,
    pub alternate_link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCoursesResponse {
    #[serde(default)]
    pub courses: Vec<Course>,
    pub next_page_token: Option<String>,
}

/// Calendar date without a timezone. `year` may be 0 upstream when unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Date {
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub month: u32,
    #[serde(default)]
    pub day: u32,
}

impl Date {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Zero-padded `YYYY-MM-DD`.
    pub fn iso_string(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }

    /// `None` for dates that do not exist on the calendar (e.g. month 0).
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self::new(date.year(), date.month(), date.day())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimeOfDay {
    #[serde(default)]
    pub hours: u32,
    #[serde(default)]
    pub minutes: u32,
}

impl TimeOfDay {
    pub fn new(hours: u32, minutes: u32) -> Self {
        Self { hours, minutes }
    }

    pub fn hh_mm(&self) -> String {
        format!("{:02}:{:02}", self.hours, self.minutes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkType {
    #[default]
    Assignment,
    ShortAnswerQuestion,
    MultipleChoiceQuestion,
    #[serde(other)]
    CourseWorkTypeUnspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseWorkState {
    Published,
    Draft,
    Deleted,
    #[default]
    #[serde(other)]
    CourseWorkStateUnspecified,
}

impl CourseWorkState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseWorkState::Published => "PUBLISHED",
            CourseWorkState::Draft => "DRAFT",
            CourseWorkState::Deleted => "DELETED",
            CourseWorkState::CourseWorkStateUnspecified => "COURSE_WORK_STATE_UNSPECIFIED",
        }
    }
}

/// Material attached to a coursework item. Upstream sends an object with a
/// single key naming the variant; anything else lands in `Unknown` untouched.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Material {
    DriveFile(SharedDriveFile),
    #[serde(alias = "youTubeVideo")]
    YoutubeVideo(YouTubeVideo),
    Link(Link),
    Form(Form),
    #[serde(untagged)]
    Unknown(serde_json::Value),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedDriveFile {
    pub drive_file: Option<DriveFile>,
    pub share_mode: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: Option<String>,
    pub title: Option<String>,
    pub alternate_link: Option<String>,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTubeVideo {
    pub id: Option<String>,
    pub title: Option<String>,
    pub alternate_link: Option<String>,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub url: Option<String>,
    pub title: Option<String>,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub form_url: Option<String>,
    pub response_url: Option<String>,
    pub title: Option<String>,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseWork {
    #[serde(default)]
    pub course_id: String,
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub state: CourseWorkState,
    pub alternate_link: Option<String>,
    pub due_date: Option<Date>,
    pub due_time: Option<TimeOfDay>,
    pub max_points: Option<f64>,
    #[serde(default)]
    pub work_type: WorkType,
    pub update_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCourseWorkResponse {
    #[serde(default)]
    pub course_work: Vec<CourseWork>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionState {
    New,
    Created,
    TurnedIn,
    Returned,
    ReclaimedByStudent,
    #[default]
    #[serde(other)]
    SubmissionStateUnspecified,
}

impl SubmissionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionState::New => "NEW",
            SubmissionState::Created => "CREATED",
            SubmissionState::TurnedIn => "TURNED_IN",
            SubmissionState::Returned => "RETURNED",
            SubmissionState::ReclaimedByStudent => "RECLAIMED_BY_STUDENT",
            SubmissionState::SubmissionStateUnspecified => "SUBMISSION_STATE_UNSPECIFIED",
        }
    }

    /// Work the student has handed in, whether or not it has been graded.
    pub fn is_handed_in(&self) -> bool {
        matches!(self, SubmissionState::TurnedIn | SubmissionState::Returned)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSubmission {
    #[serde(default)]
    pub course_id: String,
    pub course_work_id: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub state: SubmissionState,
    #[serde(default)]
    pub late: bool,
    pub assigned_grade: Option<f64>,
    pub draft_grade: Option<f64>,
    pub update_time: Option<DateTime<Utc>>,
    pub alternate_link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStudentSubmissionsResponse {
    #[serde(default)]
    pub student_submissions: Vec<StudentSubmission>,
    pub next_page_token: Option<String>,
}

/// A single page of a paginated listing.
pub trait Page {
    type Item;

    fn into_parts(self) -> (Vec<Self::Item>, Option<String>);
}

impl Page for ListCoursesResponse {
    type Item = Course;

    fn into_parts(self) -> (Vec<Course>, Option<String>) {
        (self.courses, self.next_page_token)
    }
}

impl Page for ListCourseWorkResponse {
    type Item = CourseWork;

    fn into_parts(self) -> (Vec<CourseWork>, Option<String>) {
        (self.course_work, self.next_page_token)
    }
}

impl Page for ListStudentSubmissionsResponse {
    type Item = StudentSubmission;

    fn into_parts(self) -> (Vec<StudentSubmission>, Option<String>) {
        (self.student_submissions, self.next_page_token)
    }
}

/// Request body for creating a coursework item. Always created as PUBLISHED.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourseWork {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_time: Option<TimeOfDay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_points: Option<f64>,
    pub work_type: WorkType,
    pub state: CourseWorkState,
}

impl NewCourseWork {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            due_date: None,
            due_time: None,
            max_points: None,
            work_type: WorkType::Assignment,
            state: CourseWorkState::Published,
        }
    }

    /// Reject requests upstream would refuse anyway.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.title.trim().is_empty() {
            anyhow::bail!("Coursework title must not be empty");
        }
        if self.due_time.is_some() && self.due_date.is_none() {
            anyhow::bail!("A due time requires a due date");
        }
        if let Some(date) = self.due_date {
            if date.to_naive_date().is_none() {
                anyhow::bail!("Invalid due date {}", date.iso_string());
            }
        }
        if let Some(time) = self.due_time {
            if time.hours > 23 || time.minutes > 59 {
                anyhow::bail!("Invalid due time {}", time.hh_mm());
            }
        }
        if let Some(points) = self.max_points {
            if !(points >= 0.0) {
                anyhow::bail!("Max points must be non-negative, got {}", points);
            }
        }
        Ok(())
    }
}

// ============================================================================
// Aggregated Output Models
// ============================================================================

/// Canonical, flattened form of a [`Material`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MaterialRecord {
    #[serde(rename_all = "camelCase")]
    DriveFile {
        title: Option<String>,
        url: Option<String>,
        share_mode: Option<String>,
        thumbnail_url: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    YoutubeVideo {
        title: Option<String>,
        url: Option<String>,
        thumbnail_url: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Link {
        title: Option<String>,
        url: Option<String>,
        thumbnail_url: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Form {
        title: Option<String>,
        url: Option<String>,
        response_url: Option<String>,
        thumbnail_url: Option<String>,
    },
    Unknown { raw: serde_json::Value },
}

/// One coursework item joined with the student's submission for it, if any.
#[derive(Debug, Clone)]
pub struct AggregatedRecord {
    pub course_id: String,
    pub course_name: String,
    pub course_work: CourseWork,
    pub submission: Option<StudentSubmission>,
    pub due_date: Option<String>,
    pub due_time: Option<String>,
    pub materials: Vec<MaterialRecord>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseWorkSummary {
    pub course_id: String,
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub work_type: WorkType,
    pub state: CourseWorkState,
    pub due_date: Option<String>,
    pub due_time: Option<String>,
    pub max_points: Option<f64>,
    pub link: Option<String>,
    pub materials: Vec<MaterialRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingItem {
    pub course_id: String,
    pub course_name: String,
    pub course_work_id: String,
    pub title: String,
    pub work_type: WorkType,
    pub due_date: String,
    pub due_time: Option<String>,
    pub max_points: Option<f64>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingItem {
    pub course_id: String,
    pub course_name: String,
    pub course_work_id: String,
    pub title: String,
    pub due_date: String,
    pub due_time: Option<String>,
    pub max_points: Option<f64>,
    /// Submission state, or `NOT_STARTED` when there is no submission.
    pub status: String,
    pub late: bool,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRow {
    pub course_id: String,
    pub course_name: String,
    pub course_work_id: String,
    pub title: String,
    pub state: Option<SubmissionState>,
    pub assigned_grade: Option<f64>,
    pub draft_grade: Option<f64>,
    pub max_points: Option<f64>,
    pub percentage: Option<f64>,
    pub due_date: Option<String>,
    pub late: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentGrade {
    pub course_work_id: String,
    pub title: String,
    pub earned: f64,
    pub possible: f64,
    pub percentage: Option<f64>,
    pub state: Option<SubmissionState>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseGradeReport {
    pub course_id: String,
    pub course_name: String,
    pub total_earned: f64,
    pub total_possible: f64,
    pub percentage: Option<f64>,
    pub graded_count: usize,
    pub assignments: Vec<AssignmentGrade>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_variants_deserialize() {
        let json = r#"[
            {"driveFile": {
                "driveFile": {"id": "f1", "title": "Notes", "alternateLink": "https://drive/f1"},
                "shareMode": "VIEW"
            }},
            {"youtubeVideo": {"id": "v1", "title": "Lecture", "alternateLink": "https://yt/v1"}},
            {"link": {"url": "https://example.com", "title": "Reading"}},
            {"form": {
                "formUrl": "https://forms/1",
                "responseUrl": "https://forms/1/r",
                "title": "Quiz"
            }},
            {"hologram": {"id": "h1"}}
        ]"#;

        let materials: Vec<Material> = serde_json::from_str(json).unwrap();
        assert_eq!(materials.len(), 5);
        assert!(matches!(materials[0], Material::DriveFile(_)));
        assert!(matches!(materials[1], Material::YoutubeVideo(_)));
        assert!(matches!(materials[2], Material::Link(_)));
        assert!(matches!(materials[3], Material::Form(_)));
        assert!(matches!(materials[4], Material::Unknown(_)));
    }

    #[test]
    fn test_course_work_defaults() {
        let json = r#"{
            "courseId": "c1",
            "id": "w1",
            "title": "Essay",
            "state": "PUBLISHED",
            "workType": "ASSIGNMENT",
            "dueDate": {"year": 2026, "month": 3, "day": 5},
            "dueTime": {"hours": 23}
        }"#;

        let work: CourseWork = serde_json::from_str(json).unwrap();
        assert_eq!(work.state, CourseWorkState::Published);
        assert!(work.materials.is_empty());
        assert_eq!(work.max_points, None);
        assert_eq!(work.due_date.unwrap().iso_string(), "2026-03-05");
        assert_eq!(work.due_time.unwrap().hh_mm(), "23:00");
    }

    #[test]
    fn test_unrecognized_submission_state() {
        let json = r#"{"courseWorkId": "w1", "state": "SOMETHING_NEW"}"#;
        let submission: StudentSubmission = serde_json::from_str(json).unwrap();
        assert_eq!(
            submission.state,
            SubmissionState::SubmissionStateUnspecified
        );
        assert!(!submission.late);
        assert_eq!(submission.assigned_grade, None);
    }

    #[test]
    fn test_new_course_work_validation() {
        assert!(NewCourseWork::new("Lab 1").validate().is_ok());
        assert!(NewCourseWork::new("  ").validate().is_err());

        let mut work = NewCourseWork::new("Lab 2");
        work.due_time = Some(TimeOfDay::new(12, 0));
        assert!(work.validate().is_err());

        work.due_date = Some(Date::new(2026, 2, 30));
        assert!(work.validate().is_err());

        work.due_date = Some(Date::new(2026, 2, 28));
        assert!(work.validate().is_ok());

        work.max_points = Some(-1.0);
        assert!(work.validate().is_err());
    }

    #[test]
    fn test_new_course_work_skips_absent_fields() {
        let value = serde_json::to_value(NewCourseWork::new("Lab 1")).unwrap();
        assert_eq!(value["state"], "PUBLISHED");
        assert_eq!(value["workType"], "ASSIGNMENT");
        assert!(value.get("dueDate").is_none());
        assert!(value.get("maxPoints").is_none());
    }
}
