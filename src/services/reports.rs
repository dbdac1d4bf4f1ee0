use sqlx::SqlitePool;

use crate::db;
use crate::models::{ListFilter, ReportTable, ReportType};

fn table(columns: &[&str], rows: Vec<Vec<String>>) -> ReportTable {
    ReportTable {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        rows,
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Loads the rows behind a report of the given type.
pub async fn report_data(db: &SqlitePool, report_type: ReportType) -> Result<ReportTable, sqlx::Error> {
    match report_type {
        ReportType::Enrollment => {
            let students = db::students::fetch_students(db, &ListFilter::default()).await?;
            let rows = students
                .iter()
                .flat_map(|s| {
                    s.enrollments.iter().map(move |e| {
                        vec![
                            s.profile.full_name.clone(),
                            s.profile.email.clone(),
                            s.profile.age.map(|a| a.to_string()).unwrap_or_default(),
                            e.program_title.clone().unwrap_or_else(|| e.program_id.clone()),
                            e.status.clone(),
                            e.enrolled_at.clone(),
                        ]
                    })
                })
                .collect();
            Ok(table(&["Student", "Email", "Age", "Program", "Status", "Enrolled At"], rows))
        }
        ReportType::Financial => {
            let payments = db::payments::fetch_payments(db, &ListFilter::default()).await?;
            let rows = payments
                .iter()
                .map(|item| {
                    let p = &item.payment;
                    vec![
                        p.invoice_id.clone(),
                        p.payment_date.clone(),
                        text(&item.student_name),
                        text(&item.course_name),
                        format!("{:.2}", p.amount),
                        p.currency.clone(),
                        p.status.clone(),
                    ]
                })
                .collect();
            Ok(table(&["Invoice ID", "Date", "Student", "Course", "Amount", "Currency", "Status"], rows))
        }
        ReportType::Attendance => {
            let records = db::attendance::fetch_all(db).await?;
            let rows = records
                .iter()
                .map(|a| {
                    vec![
                        a.record.date.clone(),
                        text(&a.student_name),
                        text(&a.course_name),
                        a.record.status.clone(),
                        text(&a.record.notes),
                    ]
                })
                .collect();
            Ok(table(&["Date", "Student", "Course", "Status", "Notes"], rows))
        }
        ReportType::Performance => {
            let enrollments = db::enrollments::fetch_course_enrollments(db).await?;
            let rows = enrollments
                .iter()
                .map(|e| {
                    vec![
                        text(&e.student_name),
                        text(&e.course_name),
                        e.status.clone(),
                        e.enrolled_at.clone(),
                    ]
                })
                .collect();
            Ok(table(&["Student", "Course", "Status", "Enrolled At"], rows))
        }
        ReportType::Instructor => {
            let instructors = db::instructors::fetch_instructors(db, &ListFilter::default()).await?;
            let rows = instructors
                .iter()
                .map(|i| {
                    vec![
                        text(&i.full_name),
                        text(&i.email),
                        i.instructor.title.clone(),
                        i.instructor.status.clone(),
                        i.programs.iter().map(|p| p.title.as_str()).collect::<Vec<_>>().join("; "),
                        i.courses_count.to_string(),
                    ]
                })
                .collect();
            Ok(table(&["Name", "Email", "Title", "Status", "Programs", "Courses"], rows))
        }
    }
}
