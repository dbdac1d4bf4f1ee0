use crate::models::{PaymentListItem, ReportTable};

pub const PAYMENT_COLUMNS: [&str; 9] =
    ["Invoice ID", "Date", "Student", "Email", "Course", "Amount", "Currency", "Method", "Status"];

/// Wraps the value in double quotes, doubling any embedded quote.
pub fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn csv_line<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| csv_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Header line, then one line per row. Every field is quoted.
pub fn to_csv(table: &ReportTable) -> String {
    let mut lines = Vec::with_capacity(table.rows.len() + 1);
    lines.push(csv_line(&table.columns));
    lines.extend(table.rows.iter().map(|row| csv_line(row)));
    lines.join("\n")
}

pub fn payments_table(payments: &[PaymentListItem]) -> ReportTable {
    let rows = payments
        .iter()
        .map(|item| {
            let p = &item.payment;
            vec![
                p.invoice_id.clone(),
                p.payment_date.clone(),
                item.student_name.clone().unwrap_or_default(),
                item.student_email.clone().unwrap_or_default(),
                item.course_name.clone().unwrap_or_default(),
                format!("{:.2}", p.amount),
                p.currency.clone(),
                p.payment_method.clone(),
                p.status.clone(),
            ]
        })
        .collect();

    ReportTable {
        columns: PAYMENT_COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Payment;

    #[test]
    fn fields_are_quoted_and_quotes_doubled() {
        assert_eq!(csv_field("plain"), "\"plain\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
    }

    #[test]
    fn table_renders_header_then_rows() {
        let table = ReportTable {
            columns: vec!["Name".to_string(), "Note".to_string()],
            rows: vec![vec!["Omar".to_string(), "likes \"robots\"".to_string()]],
        };
        assert_eq!(to_csv(&table), "\"Name\",\"Note\"\n\"Omar\",\"likes \"\"robots\"\"\"");
    }

    #[test]
    fn empty_table_is_just_the_header() {
        let table = ReportTable { columns: vec!["A".to_string()], rows: vec![] };
        assert_eq!(to_csv(&table), "\"A\"");
    }

    #[test]
    fn payment_rows_follow_the_export_columns() {
        let item = PaymentListItem {
            payment: Payment {
                id: "p1".to_string(),
                invoice_id: "INV-20250301-ABC123".to_string(),
                student_id: "s1".to_string(),
                course_id: None,
                amount: 750.5,
                currency: "EGP".to_string(),
                payment_method: "cash".to_string(),
                payment_date: "2025-03-01".to_string(),
                due_date: None,
                status: "paid".to_string(),
                notes: None,
                created_at: "2025-03-01T10:00:00Z".to_string(),
            },
            student_name: Some("Omar".to_string()),
            student_email: Some("omar@example.com".to_string()),
            course_name: None,
        };

        let table = payments_table(&[item]);
        assert_eq!(table.columns.len(), 9);
        assert_eq!(
            table.rows[0],
            vec!["INV-20250301-ABC123", "2025-03-01", "Omar", "omar@example.com", "", "750.50", "EGP", "cash", "paid"]
        );
    }
}
