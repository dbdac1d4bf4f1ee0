use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

pub const PAYMENT_STATUSES: &[&str] = &["pending", "paid", "overdue", "refunded", "cancelled"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: String,
    pub invoice_id: String,
    pub student_id: String,
    pub course_id: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub payment_method: String,
    pub payment_date: String,
    pub due_date: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaymentListItem {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub payment: Payment,
    pub student_name: Option<String>,
    pub student_email: Option<String>,
    pub course_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentStats {
    /// Paid revenue this calendar month, two decimals.
    pub monthly_revenue: String,
    /// Percent change against last month, one decimal; "0" without a baseline.
    pub revenue_change: String,
    pub pending: i64,
    pub overdue: i64,
}

impl PaymentStats {
    pub fn new(this_month: f64, last_month: f64, pending: i64, overdue: i64) -> Self {
        let revenue_change = if last_month > 0.0 {
            format!("{:.1}", (this_month - last_month) / last_month * 100.0)
        } else {
            "0".to_string()
        };

        Self {
            monthly_revenue: format!("{:.2}", this_month),
            revenue_change,
            pending,
            overdue,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPaymentRequest {
    pub student_id: String,
    pub course_id: Option<String>,
    pub amount: f64,
    pub currency: Option<String>,
    pub payment_method: String,
    /// `YYYY-MM-DD`
    pub payment_date: String,
    pub due_date: Option<String>,
    pub notes: Option<String>,
}

impl NewPaymentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.student_id.trim().is_empty() {
            return Err(AppError::BadRequest("student_id is required".to_string()));
        }
        if self.payment_method.trim().is_empty() {
            return Err(AppError::BadRequest("payment_method is required".to_string()));
        }
        validate_amount(self.amount)?;
        validate_date("payment_date", &self.payment_date)?;
        if let Some(due) = &self.due_date {
            validate_date("due_date", due)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePaymentRequest {
    pub amount: Option<f64>,
    pub payment_method: Option<String>,
    pub payment_date: Option<String>,
    pub due_date: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl UpdatePaymentRequest {
    pub fn apply(self, current: &mut Payment) -> Result<(), AppError> {
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
            current.amount = amount;
        }
        if let Some(method) = self.payment_method {
            current.payment_method = method;
        }
        if let Some(date) = self.payment_date {
            validate_date("payment_date", &date)?;
            current.payment_date = date;
        }
        if let Some(due) = self.due_date {
            if due.is_empty() {
                current.due_date = None;
            } else {
                validate_date("due_date", &due)?;
                current.due_date = Some(due);
            }
        }
        if let Some(status) = self.status {
            if !PAYMENT_STATUSES.contains(&status.as_str()) {
                return Err(AppError::BadRequest(format!("unknown payment status: {}", status)));
            }
            current.status = status;
        }
        if let Some(notes) = self.notes {
            current.notes = Some(notes);
        }
        Ok(())
    }
}

fn validate_amount(amount: f64) -> Result<(), AppError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(AppError::BadRequest("amount must be greater than zero".to_string()))
    }
}

fn validate_date(field: &str, value: &str) -> Result<(), AppError> {
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| AppError::BadRequest(format!("{} must be YYYY-MM-DD", field)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_is_relative_to_last_month() {
        let stats = PaymentStats::new(1500.0, 1000.0, 2, 1);
        assert_eq!(stats.monthly_revenue, "1500.00");
        assert_eq!(stats.revenue_change, "50.0");
    }

    #[test]
    fn change_without_baseline_is_zero() {
        let stats = PaymentStats::new(300.0, 0.0, 0, 0);
        assert_eq!(stats.revenue_change, "0");
    }

    #[test]
    fn amount_must_be_positive() {
        let req = NewPaymentRequest {
            student_id: "s1".to_string(),
            course_id: None,
            amount: 0.0,
            currency: None,
            payment_method: "cash".to_string(),
            payment_date: "2025-03-01".to_string(),
            due_date: None,
            notes: None,
        };
        assert!(req.validate().is_err());
    }
}
