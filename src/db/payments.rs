use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{ListFilter, NewPaymentRequest, Payment, PaymentListItem};

const PAYMENT_ITEM_SELECT: &str = r#"
    SELECT pay.*, s.full_name AS student_name, s.email AS student_email, c.name AS course_name
    FROM payments pay
    LEFT JOIN profiles s ON s.id = pay.student_id
    LEFT JOIN courses c ON c.id = pay.course_id
"#;

/// `INV-YYYYMMDD-XXXXXX`, the suffix drawn from a fresh uuid.
pub fn generate_invoice_id() -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(6)
        .collect::<String>()
        .to_uppercase();
    format!("INV-{}-{}", Utc::now().format("%Y%m%d"), suffix)
}

pub async fn fetch_payments(db: &SqlitePool, filter: &ListFilter) -> Result<Vec<PaymentListItem>, sqlx::Error> {
    sqlx::query_as::<_, PaymentListItem>(&format!(
        r#"{}
        WHERE (?1 IS NULL OR lower(s.full_name) LIKE ?1 ESCAPE '\' OR lower(pay.invoice_id) LIKE ?1 ESCAPE '\')
          AND (?2 IS NULL OR pay.status = ?2)
        ORDER BY pay.payment_date DESC, pay.created_at DESC
        "#,
        PAYMENT_ITEM_SELECT
    ))
    .bind(filter.search_pattern())
    .bind(filter.status())
    .fetch_all(db)
    .await
}

pub async fn payments_for_student(db: &SqlitePool, student_id: &str) -> Result<Vec<PaymentListItem>, sqlx::Error> {
    sqlx::query_as::<_, PaymentListItem>(&format!(
        "{} WHERE pay.student_id = ? ORDER BY pay.payment_date DESC",
        PAYMENT_ITEM_SELECT
    ))
    .bind(student_id)
    .fetch_all(db)
    .await
}

pub async fn find_item(db: &SqlitePool, id: &str) -> Result<Option<PaymentListItem>, sqlx::Error> {
    sqlx::query_as::<_, PaymentListItem>(&format!("{} WHERE pay.id = ?", PAYMENT_ITEM_SELECT))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_by_id(db: &SqlitePool, id: &str) -> Result<Option<Payment>, sqlx::Error> {
    sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Sum of paid amounts with `from <= payment_date < until`.
pub async fn paid_total_between(db: &SqlitePool, from: &str, until: &str) -> Result<f64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(amount), 0.0)
        FROM payments
        WHERE status = 'paid' AND payment_date >= ?1 AND payment_date < ?2
        "#,
    )
    .bind(from)
    .bind(until)
    .fetch_one(db)
    .await
}

pub async fn count_by_status(db: &SqlitePool, status: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE status = ?")
        .bind(status)
        .fetch_one(db)
        .await
}

pub async fn insert(db: &SqlitePool, req: NewPaymentRequest, default_currency: &str) -> Result<Payment, sqlx::Error> {
    let payment = Payment {
        id: super::new_id(),
        invoice_id: generate_invoice_id(),
        student_id: req.student_id,
        course_id: req.course_id.filter(|c| !c.is_empty()),
        amount: req.amount,
        currency: req
            .currency
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| default_currency.to_string()),
        payment_method: req.payment_method,
        payment_date: req.payment_date,
        due_date: req.due_date.filter(|d| !d.is_empty()),
        status: "pending".to_string(),
        notes: req.notes,
        created_at: super::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO payments
            (id, invoice_id, student_id, course_id, amount, currency, payment_method,
            payment_date, due_date, status, notes, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
    )
    .bind(&payment.id)
    .bind(&payment.invoice_id)
    .bind(&payment.student_id)
    .bind(&payment.course_id)
    .bind(payment.amount)
    .bind(&payment.currency)
    .bind(&payment.payment_method)
    .bind(&payment.payment_date)
    .bind(&payment.due_date)
    .bind(&payment.status)
    .bind(&payment.notes)
    .bind(&payment.created_at)
    .execute(db)
    .await?;

    Ok(payment)
}

pub async fn update(db: &SqlitePool, payment: &Payment) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE payments
        SET amount = ?1,
            payment_method = ?2,
            payment_date = ?3,
            due_date = ?4,
            status = ?5,
            notes = ?6
        WHERE id = ?7
        "#,
    )
    .bind(payment.amount)
    .bind(&payment.payment_method)
    .bind(&payment.payment_date)
    .bind(&payment.due_date)
    .bind(&payment.status)
    .bind(&payment.notes)
    .bind(&payment.id)
    .execute(db)
    .await?;

    Ok(())
}

pub async fn delete(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM payments WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_ids_carry_date_and_six_char_suffix() {
        let id = generate_invoice_id();
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "INV");
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts[2].len(), 6);
        assert_eq!(parts[2], parts[2].to_uppercase());
    }
}
