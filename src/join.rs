use crate::fetcher::CourseFetch;
use crate::models::{
    AggregatedRecord, Course, CourseWork, CourseWorkSummary, Material, MaterialRecord,
    StudentSubmission,
};
use indexmap::IndexMap;
use std::collections::HashMap;

/// `round(earned / possible * 1000) / 10`, i.e. one decimal place, rounding
/// halves up. Undefined unless `possible > 0`.
pub fn percentage(earned: f64, possible: f64) -> Option<f64> {
    if possible > 0.0 {
        Some((earned / possible * 1000.0).round() / 10.0)
    } else {
        None
    }
}

pub fn normalize_material(material: &Material) -> MaterialRecord {
    match material {
        Material::DriveFile(shared) => {
            let file = shared.drive_file.as_ref();
            MaterialRecord::DriveFile {
                title: file.and_then(|f| f.title.clone()),
                url: file.and_then(|f| f.alternate_link.clone()),
                share_mode: shared.share_mode.clone(),
                thumbnail_url: file.and_then(|f| f.thumbnail_url.clone()),
            }
        }
        Material::YoutubeVideo(video) => MaterialRecord::YoutubeVideo {
            title: video.title.clone(),
            url: video.alternate_link.clone(),
            thumbnail_url: video.thumbnail_url.clone(),
        },
        Material::Link(link) => MaterialRecord::Link {
            title: link.title.clone(),
            url: link.url.clone(),
            thumbnail_url: link.thumbnail_url.clone(),
        },
        Material::Form(form) => MaterialRecord::Form {
            title: form.title.clone(),
            url: form.form_url.clone(),
            response_url: form.response_url.clone(),
            thumbnail_url: form.thumbnail_url.clone(),
        },
        Material::Unknown(raw) => MaterialRecord::Unknown { raw: raw.clone() },
    }
}

/// `YYYY-MM-DD` of the due date, if any.
pub fn due_date_string(work: &CourseWork) -> Option<String> {
    work.due_date.map(|date| date.iso_string())
}

/// `HH:MM` of the due time. Only emitted alongside a due date.
pub fn due_time_string(work: &CourseWork) -> Option<String> {
    match (work.due_date, work.due_time) {
        (Some(_), Some(time)) => Some(time.hh_mm()),
        _ => None,
    }
}

pub fn summarize(work: &CourseWork) -> CourseWorkSummary {
    CourseWorkSummary {
        course_id: work.course_id.clone(),
        id: work.id.clone(),
        title: work.title.clone(),
        description: work.description.clone(),
        work_type: work.work_type,
        state: work.state,
        due_date: due_date_string(work),
        due_time: due_time_string(work),
        max_points: work.max_points,
        link: work.alternate_link.clone(),
        materials: work.materials.iter().map(normalize_material).collect(),
    }
}

/// Join one course's coursework with its submissions by coursework id.
///
/// Every coursework item yields exactly one record, with `submission` set to
/// `None` when nothing matches. Duplicate coursework ids are not expected
/// upstream; if they occur the later item replaces the earlier one.
pub fn join_course(
    course: &Course,
    course_work: Vec<CourseWork>,
    submissions: Vec<StudentSubmission>,
) -> Vec<AggregatedRecord> {
    let mut work_by_id: IndexMap<String, CourseWork> = IndexMap::new();
    for work in course_work {
        work_by_id.insert(work.id.clone(), work);
    }

    let mut submission_by_work: HashMap<String, StudentSubmission> = HashMap::new();
    for submission in submissions {
        submission_by_work.insert(submission.course_work_id.clone(), submission);
    }

    work_by_id
        .into_values()
        .map(|work| {
            let submission = submission_by_work.remove(&work.id);
            AggregatedRecord {
                course_id: course.id.clone(),
                course_name: course.name.clone(),
                due_date: due_date_string(&work),
                due_time: due_time_string(&work),
                materials: work.materials.iter().map(normalize_material).collect(),
                course_work: work,
                submission,
            }
        })
        .collect()
}

/// Join every fetched course, keeping per-course then per-item order.
pub fn join_all_courses(fetches: Vec<CourseFetch>) -> Vec<AggregatedRecord> {
    fetches
        .into_iter()
        .flat_map(|fetch| join_course(&fetch.course, fetch.course_work, fetch.submissions))
        .collect()
}
