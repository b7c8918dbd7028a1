use crate::models::{AggregatedRecord, MissingItem, UpcomingItem};
use chrono::{Days, NaiveDate};

/// Status label for work with no submission at all.
pub const NOT_STARTED: &str = "NOT_STARTED";

pub const DEFAULT_UPCOMING_DAYS: u32 = 7;

/// Calendar due date of a record. Records without one, or with one that is
/// not a real calendar date, never take part in date windows.
fn due_on(record: &AggregatedRecord) -> Option<NaiveDate> {
    record
        .course_work
        .due_date
        .and_then(|date| date.to_naive_date())
}

/// Work due between `today` and `today + days`, both ends inclusive. Only
/// the calendar date is compared; a due time on that date is ignored.
pub fn upcoming(records: &[AggregatedRecord], today: NaiveDate, days: u32) -> Vec<UpcomingItem> {
    let horizon = today
        .checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX);

    let mut items: Vec<UpcomingItem> = records
        .iter()
        .filter_map(|record| {
            let due = due_on(record)?;
            if due < today || due > horizon {
                return None;
            }
            Some(UpcomingItem {
                course_id: record.course_id.clone(),
                course_name: record.course_name.clone(),
                course_work_id: record.course_work.id.clone(),
                title: record.course_work.title.clone(),
                work_type: record.course_work.work_type,
                due_date: record.due_date.clone()?,
                due_time: record.due_time.clone(),
                max_points: record.course_work.max_points,
                link: record.course_work.alternate_link.clone(),
            })
        })
        .collect();

    // Stable, so ties keep course then item order
    items.sort_by(|a, b| a.due_date.cmp(&b.due_date));
    items
}

/// Work due strictly before `today` that has not been turned in or returned.
pub fn missing(records: &[AggregatedRecord], today: NaiveDate) -> Vec<MissingItem> {
    let mut items: Vec<MissingItem> = records
        .iter()
        .filter_map(|record| {
            let due = due_on(record)?;
            if due >= today {
                return None;
            }

            let submission = record.submission.as_ref();
            if submission.is_some_and(|s| s.state.is_handed_in()) {
                return None;
            }

            Some(MissingItem {
                course_id: record.course_id.clone(),
                course_name: record.course_name.clone(),
                course_work_id: record.course_work.id.clone(),
                title: record.course_work.title.clone(),
                due_date: record.due_date.clone()?,
                due_time: record.due_time.clone(),
                max_points: record.course_work.max_points,
                status: submission
                    .map(|s| s.state.as_str())
                    .unwrap_or(NOT_STARTED)
                    .to_string(),
                late: submission.is_some_and(|s| s.late),
                link: record.course_work.alternate_link.clone(),
            })
        })
        .collect();

    items.sort_by(|a, b| a.due_date.cmp(&b.due_date));
    items
}
