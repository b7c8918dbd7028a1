use crate::join::percentage;
use crate::models::{AggregatedRecord, AssignmentGrade, Course, CourseGradeReport, GradeRow};

/// One row per joined record. Work with no submission is kept, with its
/// submission fields absent.
pub fn grade_rows(records: &[AggregatedRecord]) -> Vec<GradeRow> {
    records
        .iter()
        .map(|record| {
            let submission = record.submission.as_ref();
            let assigned_grade = submission.and_then(|s| s.assigned_grade);
            let max_points = record.course_work.max_points;

            GradeRow {
                course_id: record.course_id.clone(),
                course_name: record.course_name.clone(),
                course_work_id: record.course_work.id.clone(),
                title: record.course_work.title.clone(),
                state: submission.map(|s| s.state),
                assigned_grade,
                draft_grade: submission.and_then(|s| s.draft_grade),
                max_points,
                percentage: assigned_grade
                    .zip(max_points)
                    .and_then(|(earned, possible)| percentage(earned, possible)),
                due_date: record.due_date.clone(),
                late: submission.map(|s| s.late),
            }
        })
        .collect()
}

/// Totals for one course over records that carry both an assigned grade and
/// max points. Everything else is skipped rather than counted as zero.
pub fn course_grade(course: &Course, records: &[AggregatedRecord]) -> CourseGradeReport {
    let mut total_earned = 0.0;
    let mut total_possible = 0.0;
    let mut assignments = Vec::new();

    for record in records {
        let submission = match &record.submission {
            Some(submission) => submission,
            None => continue,
        };
        let (earned, possible) = match (submission.assigned_grade, record.course_work.max_points) {
            (Some(earned), Some(possible)) => (earned, possible),
            _ => continue,
        };

        total_earned += earned;
        total_possible += possible;
        assignments.push(AssignmentGrade {
            course_work_id: record.course_work.id.clone(),
            title: record.course_work.title.clone(),
            earned,
            possible,
            percentage: percentage(earned, possible),
            state: Some(submission.state),
        });
    }

    CourseGradeReport {
        course_id: course.id.clone(),
        course_name: course.name.clone(),
        total_earned,
        total_possible,
        percentage: percentage(total_earned, total_possible),
        graded_count: assignments.len(),
        assignments,
    }
}
