//! Core debt domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, transaction::TransactionId, user::UserId};

/// Database identifier for a debt.
pub type DebtId = i64;

/// Where a debt stands. The status is supplied by the caller; it is not
/// derived from the due date.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtStatus {
    /// Not yet settled.
    #[default]
    Pending,
    /// Past due and not settled.
    Overdue,
    /// Settled. A paid debt carries a linked payment transaction.
    Paid,
}

impl DebtStatus {
    /// The lowercase string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            DebtStatus::Pending => "pending",
            DebtStatus::Overdue => "overdue",
            DebtStatus::Paid => "paid",
        }
    }
}

impl FromStr for DebtStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(DebtStatus::Pending),
            "overdue" => Ok(DebtStatus::Overdue),
            "paid" => Ok(DebtStatus::Paid),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

impl Display for DebtStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Money a user owes to a lender, with optional simple monthly interest.
///
/// `interest` and `total_amount` are derived from the principal, the rate and
/// the date range; they are stored so that reports and listings never have to
/// recompute them. When `status` is paid, `payment_transaction_id` points at
/// the single expense transaction that settled the debt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    /// The debt's ID in the application database.
    pub id: DebtId,
    /// The user the debt belongs to.
    pub user_id: UserId,
    /// A short note on what the debt is for.
    pub description: String,
    /// Who the money is owed to.
    pub lender: Option<String>,
    /// The principal.
    pub amount: f64,
    /// Whether the debt accrues interest at all.
    pub has_interest: bool,
    /// Simple interest rate in percent per whole calendar month.
    pub interest_rate: f64,
    /// The accrued interest, derived from the principal, rate and date range.
    pub interest: f64,
    /// The principal plus accrued interest.
    pub total_amount: f64,
    /// When the debt was taken on.
    pub init_date: Date,
    /// When the debt falls due.
    pub due_date: Date,
    /// Where the debt stands.
    pub status: DebtStatus,
    /// The expense transaction that settled the debt, present iff the status
    /// is paid.
    pub payment_transaction_id: Option<TransactionId>,
}

/// The data needed to record a new debt.
#[derive(Debug, Clone)]
pub struct NewDebt {
    /// The user the debt belongs to.
    pub user_id: UserId,
    /// A short note on what the debt is for.
    pub description: String,
    /// Who the money is owed to.
    pub lender: Option<String>,
    /// The principal.
    pub amount: f64,
    /// Whether the debt accrues interest at all.
    pub has_interest: bool,
    /// Simple interest rate in percent per whole calendar month.
    pub interest_rate: f64,
    /// When the debt was taken on.
    pub init_date: Date,
    /// When the debt falls due.
    pub due_date: Date,
    /// Where the debt stands.
    pub status: DebtStatus,
}

/// The payload for recording a new debt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtData {
    /// A short note on what the debt is for.
    #[serde(default)]
    pub description: String,
    /// Who the money is owed to.
    #[serde(default)]
    pub lender: Option<String>,
    /// The principal.
    pub amount: f64,
    /// Whether the debt accrues interest at all.
    #[serde(default)]
    pub has_interest: bool,
    /// Simple interest rate in percent per whole calendar month.
    #[serde(default)]
    pub interest_rate: f64,
    /// When the debt was taken on.
    pub init_date: Date,
    /// When the debt falls due.
    pub due_date: Date,
    /// Where the debt stands.
    #[serde(default)]
    pub status: DebtStatus,
}

/// The payload for updating a debt.
///
/// Every field is optional; omitted fields keep their stored value, so a
/// payload carrying only `{"status": "paid"}` settles a debt without
/// touching its amounts or dates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebtUpdateData {
    /// A short note on what the debt is for.
    pub description: Option<String>,
    /// Who the money is owed to.
    pub lender: Option<String>,
    /// The principal.
    pub amount: Option<f64>,
    /// Whether the debt accrues interest at all.
    pub has_interest: Option<bool>,
    /// Simple interest rate in percent per whole calendar month.
    pub interest_rate: Option<f64>,
    /// When the debt was taken on.
    pub init_date: Option<Date>,
    /// When the debt falls due.
    pub due_date: Option<Date>,
    /// Where the debt stands.
    pub status: Option<DebtStatus>,
}
