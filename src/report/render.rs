//! The report rendering seam.
//!
//! Turning a report into a document (PDF generation, charts) is an external
//! collaborator's job; the application only depends on the [ReportRenderer]
//! trait. [TextRenderer] is the built-in plain-text implementation.

use std::fmt::Write;

use crate::{Error, report::UserReport};

/// A rendered report document ready to serve or attach to an email.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedReport {
    /// The file name to serve or attach the document under.
    pub file_name: String,
    /// The MIME type of `bytes`.
    pub content_type: &'static str,
    /// The document itself.
    pub bytes: Vec<u8>,
}

/// Renders a user's report into a document.
pub trait ReportRenderer: Send + Sync {
    /// Produce the report document.
    fn render(&self, report: &UserReport) -> Result<RenderedReport, Error>;
}

/// Renders reports as plain text.
#[derive(Debug, Default, Clone)]
pub struct TextRenderer;

impl ReportRenderer for TextRenderer {
    fn render(&self, report: &UserReport) -> Result<RenderedReport, Error> {
        let mut text = String::new();

        let write_error = |error: std::fmt::Error| Error::ReportRender(error.to_string());

        writeln!(text, "Financial report for {}", report.user.email).map_err(write_error)?;
        writeln!(text).map_err(write_error)?;
        writeln!(text, "Total income:      {:.2}", report.summary.total_income)
            .map_err(write_error)?;
        writeln!(text, "Total expenses:    {:.2}", report.summary.total_expenses)
            .map_err(write_error)?;
        writeln!(text, "Main balance:      {:.2}", report.summary.main_balance)
            .map_err(write_error)?;
        writeln!(text, "Debt balance:      {:.2}", report.summary.debt_balance)
            .map_err(write_error)?;
        writeln!(text, "Suggested balance: {:.2}", report.summary.suggested_balance)
            .map_err(write_error)?;
        writeln!(text).map_err(write_error)?;

        writeln!(text, "Transactions ({}):", report.transactions.len()).map_err(write_error)?;
        for transaction in &report.transactions {
            writeln!(
                text,
                "  {} {:>10.2} {} {}",
                transaction.date.date(),
                transaction.amount,
                transaction.transaction_type,
                transaction.description
            )
            .map_err(write_error)?;
        }
        writeln!(text).map_err(write_error)?;

        writeln!(text, "Debts ({}):", report.debts.len()).map_err(write_error)?;
        for debt in &report.debts {
            writeln!(
                text,
                "  due {} {:>10.2} {} {}",
                debt.due_date, debt.total_amount, debt.status, debt.description
            )
            .map_err(write_error)?;
        }

        Ok(RenderedReport {
            file_name: format!("report_{}.txt", report.user.id),
            content_type: "text/plain; charset=utf-8",
            bytes: text.into_bytes(),
        })
    }
}

#[cfg(test)]
mod text_renderer_tests {
    use time::macros::date;

    use crate::{
        report::{FinancialSummary, UserReport},
        user::{EmailFrequency, UserId, UserProfile},
    };

    use super::{ReportRenderer, TextRenderer};

    fn test_report() -> UserReport {
        UserReport {
            user: UserProfile {
                id: UserId::new(1),
                email: "foo@bar.baz".to_string(),
                first_name: None,
                last_name: None,
                email_schedule_frequency: EmailFrequency::Monthly,
                email_schedule_start_date: date!(2024 - 02 - 01),
            },
            summary: FinancialSummary {
                total_income: 2000.0,
                total_expenses: 700.0,
                total_paid_debt: 200.0,
                total_pending_debt: 300.0,
                total_overdue_debt: 100.0,
                main_balance: 1300.0,
                debt_balance: 400.0,
                suggested_balance: 700.0,
            },
            transactions: Vec::new(),
            debts: Vec::new(),
            scheduled_transactions: Vec::new(),
        }
    }

    #[test]
    fn renders_balances_and_recipient() {
        let rendered = TextRenderer.render(&test_report()).unwrap();

        let text = String::from_utf8(rendered.bytes).unwrap();
        assert!(text.contains("Financial report for foo@bar.baz"));
        assert!(text.contains("Main balance:      1300.00"));
        assert!(text.contains("Suggested balance: 700.00"));
        assert_eq!(rendered.file_name, "report_1.txt");
        assert_eq!(rendered.content_type, "text/plain; charset=utf-8");
    }
}
