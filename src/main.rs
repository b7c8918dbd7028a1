use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime, Timelike};
use clap::{Parser, Subcommand, ValueEnum};
use classroom_aggregator::classify::DEFAULT_UPCOMING_DAYS;
use classroom_aggregator::config::Config;
use classroom_aggregator::models::{CourseState, Date, NewCourseWork, TimeOfDay, WorkType};
use classroom_aggregator::{export, logging, Aggregator, ClassroomClient, CourseFilter};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "classroom-aggregator", version, about = "Cross-course classroom views")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List courses, optionally filtered
    Courses {
        #[arg(long = "state", value_enum)]
        states: Vec<CourseStateArg>,
        #[arg(long)]
        teacher_id: Option<String>,
        #[arg(long)]
        student_id: Option<String>,
    },
    /// List published coursework in a course
    CourseWork { course_id: String },
    /// Show one coursework item with its materials
    CourseWorkDetail {
        course_id: String,
        course_work_id: String,
    },
    /// List the student's submissions in a course
    Submissions {
        course_id: String,
        #[arg(long)]
        course_work: Option<String>,
    },
    /// Work due in the next N days across active courses
    Upcoming {
        #[arg(long, default_value_t = DEFAULT_UPCOMING_DAYS)]
        days: u32,
    },
    /// Overdue work that has not been turned in
    Missing,
    /// Grades across active courses
    Grades {
        /// Also write the listing as CSV into this directory
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Grade totals for one course
    CourseGrade { course_id: String },
    /// Create a published coursework item
    CreateWork {
        course_id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        due_date: Option<String>,
        /// HH:MM
        #[arg(long)]
        due_time: Option<String>,
        #[arg(long)]
        max_points: Option<f64>,
        #[arg(long, value_enum, default_value_t = WorkTypeArg::Assignment)]
        work_type: WorkTypeArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CourseStateArg {
    Active,
    Archived,
    Provisioned,
    Declined,
    Suspended,
}

impl From<CourseStateArg> for CourseState {
    fn from(arg: CourseStateArg) -> Self {
        match arg {
            CourseStateArg::Active => CourseState::Active,
            CourseStateArg::Archived => CourseState::Archived,
            CourseStateArg::Provisioned => CourseState::Provisioned,
            CourseStateArg::Declined => CourseState::Declined,
            CourseStateArg::Suspended => CourseState::Suspended,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum WorkTypeArg {
    Assignment,
    ShortAnswerQuestion,
    MultipleChoiceQuestion,
}

impl From<WorkTypeArg> for WorkType {
    fn from(arg: WorkTypeArg) -> Self {
        match arg {
            WorkTypeArg::Assignment => WorkType::Assignment,
            WorkTypeArg::ShortAnswerQuestion => WorkType::ShortAnswerQuestion,
            WorkTypeArg::MultipleChoiceQuestion => WorkType::MultipleChoiceQuestion,
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    println!("{}", json);
    Ok(())
}

fn parse_due_date(input: &str) -> Result<Date> {
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .with_context(|| format!("Invalid due date '{}'. Use YYYY-MM-DD", input))?;
    Ok(Date::from(date))
}

fn parse_due_time(input: &str) -> Result<TimeOfDay> {
    let time = NaiveTime::parse_from_str(input, "%H:%M")
        .with_context(|| format!("Invalid due time '{}'. Use HH:MM", input))?;
    Ok(TimeOfDay::new(time.hour(), time.minute()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    let client = ClassroomClient::with_base(config.access_token, config.api_base)
        .context("Failed to initialize classroom client")?;
    let aggregator = Aggregator::new(client, config.student_id);

    match cli.command {
        Command::Courses {
            states,
            teacher_id,
            student_id,
        } => {
            let filter = CourseFilter {
                states: states.into_iter().map(CourseState::from).collect(),
                teacher_id,
                student_id,
            };
            print_json(&aggregator.courses(&filter).await?)
        }
        Command::CourseWork { course_id } => {
            print_json(&aggregator.course_work(&course_id).await?)
        }
        Command::CourseWorkDetail {
            course_id,
            course_work_id,
        } => print_json(
            &aggregator
                .course_work_detail(&course_id, &course_work_id)
                .await?,
        ),
        Command::Submissions {
            course_id,
            course_work,
        } => print_json(
            &aggregator
                .submissions(&course_id, course_work.as_deref())
                .await?,
        ),
        Command::Upcoming { days } => print_json(&aggregator.upcoming(days).await?),
        Command::Missing => print_json(&aggregator.missing().await?),
        Command::Grades { csv } => {
            let rows = aggregator.grades().await?;
            if let Some(dir) = csv {
                let path = export::export_grades_to_csv(&rows, &dir)?;
                eprintln!("Wrote {}", path.display());
            }
            print_json(&rows)
        }
        Command::CourseGrade { course_id } => {
            print_json(&aggregator.course_grade(&course_id).await?)
        }
        Command::CreateWork {
            course_id,
            title,
            description,
            due_date,
            due_time,
            max_points,
            work_type,
        } => {
            let mut new_work = NewCourseWork::new(title);
            new_work.description = description;
            new_work.due_date = due_date.as_deref().map(parse_due_date).transpose()?;
            new_work.due_time = due_time.as_deref().map(parse_due_time).transpose()?;
            new_work.max_points = max_points;
            new_work.work_type = work_type.into();

            print_json(&aggregator.create_course_work(&course_id, &new_work).await?)
        }
    }
}
