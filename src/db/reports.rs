use sqlx::SqlitePool;
use sqlx::types::Json;

use crate::models::{GenerateReportRequest, Report, ReportType};

pub async fn fetch_latest(db: &SqlitePool) -> Result<Vec<Report>, sqlx::Error> {
    sqlx::query_as::<_, Report>("SELECT * FROM reports ORDER BY generated_at DESC LIMIT 50")
        .fetch_all(db)
        .await
}

pub async fn insert(
    db: &SqlitePool,
    req: GenerateReportRequest,
    report_type: ReportType,
    generated_by: &str,
) -> Result<Report, sqlx::Error> {
    let report = Report {
        id: super::new_id(),
        title: req.title,
        description: req.description,
        report_type: report_type.as_str().to_string(),
        generated_by: Some(generated_by.to_string()),
        parameters: req.parameters.map(Json),
        file_format: "csv".to_string(),
        generated_at: super::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO reports
            (id, title, description, report_type, generated_by, parameters, file_format, generated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&report.id)
    .bind(&report.title)
    .bind(&report.description)
    .bind(&report.report_type)
    .bind(&report.generated_by)
    .bind(&report.parameters)
    .bind(&report.file_format)
    .bind(&report.generated_at)
    .execute(db)
    .await?;

    Ok(report)
}
