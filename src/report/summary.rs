//! The report aggregator: rolls a user's records up into balance totals.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    debt::{Debt, DebtStatus, get_debts_for_user, sum_debts_by_status},
    schedule::{ScheduledTransaction, get_scheduled_transactions_for_user},
    transaction::{Transaction, TransactionType, get_transactions_for_user, sum_transactions},
    user::{User, UserProfile},
};

/// The balance totals for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    /// The sum of all income transactions.
    pub total_income: f64,
    /// The sum of all expense transactions.
    pub total_expenses: f64,
    /// The total owed on debts already settled.
    pub total_paid_debt: f64,
    /// The total owed on debts not yet due or settled.
    pub total_pending_debt: f64,
    /// The total owed on debts past due.
    pub total_overdue_debt: f64,
    /// Income minus expenses.
    pub main_balance: f64,
    /// The total still owed: pending plus overdue debt.
    pub debt_balance: f64,
    /// What is left after expenses, settled debt and outstanding debt are
    /// all taken out of income.
    pub suggested_balance: f64,
}

/// Compute a user's balance totals.
pub fn summarize(user_id: crate::user::UserId, connection: &Connection) -> Result<FinancialSummary, Error> {
    let total_income = sum_transactions(user_id, TransactionType::Income, connection)?;
    let total_expenses = sum_transactions(user_id, TransactionType::Expense, connection)?;
    let total_paid_debt = sum_debts_by_status(user_id, DebtStatus::Paid, connection)?;
    let total_pending_debt = sum_debts_by_status(user_id, DebtStatus::Pending, connection)?;
    let total_overdue_debt = sum_debts_by_status(user_id, DebtStatus::Overdue, connection)?;

    let main_balance = total_income - total_expenses;
    let debt_balance = total_pending_debt + total_overdue_debt;
    let suggested_balance = total_income - (total_expenses + total_paid_debt + debt_balance);

    Ok(FinancialSummary {
        total_income,
        total_expenses,
        total_paid_debt,
        total_pending_debt,
        total_overdue_debt,
        main_balance,
        debt_balance,
        suggested_balance,
    })
}

/// Everything that goes into one user's rendered report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserReport {
    /// Who the report is for.
    pub user: UserProfile,
    /// The balance totals.
    pub summary: FinancialSummary,
    /// The user's transactions, most recent first.
    pub transactions: Vec<Transaction>,
    /// The user's debts, most recently due first.
    pub debts: Vec<Debt>,
    /// The user's scheduled transactions, soonest due first.
    pub scheduled_transactions: Vec<ScheduledTransaction>,
}

/// Gather a user's full report.
pub fn build_report(user: &User, connection: &Connection) -> Result<UserReport, Error> {
    Ok(UserReport {
        user: UserProfile::from(user),
        summary: summarize(user.id, connection)?,
        transactions: get_transactions_for_user(user.id, connection)?,
        debts: get_debts_for_user(user.id, connection)?,
        scheduled_transactions: get_scheduled_transactions_for_user(user.id, connection)?,
    })
}
