//! Core transaction domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, category::CategoryId, user::UserId};

/// Database identifier for a transaction.
pub type TransactionId = i64;

/// Whether money came in or went out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money received.
    #[default]
    Income,
    /// Money spent.
    Expense,
}

impl TransactionType {
    /// The lowercase string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(Error::InvalidTransactionType(s.to_string())),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An amount of money that a user has received or spent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The transaction's ID in the application database.
    pub id: TransactionId,
    /// The user the transaction belongs to.
    pub user_id: UserId,
    /// The amount of money, always non-negative; direction comes from
    /// `transaction_type`.
    pub amount: f64,
    /// A short note on where the money came from or went.
    pub description: String,
    /// Whether money came in or went out.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// When the money moved.
    pub date: OffsetDateTime,
    /// The IDs of the categories attached to the transaction, in ascending
    /// order.
    pub categories: Vec<CategoryId>,
}

/// The data needed to record a new transaction.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    /// The user the transaction belongs to.
    pub user_id: UserId,
    /// The amount of money.
    pub amount: f64,
    /// A short note on where the money came from or went.
    pub description: String,
    /// Whether money came in or went out.
    pub transaction_type: TransactionType,
    /// When the money moved.
    pub date: OffsetDateTime,
    /// The IDs of the categories to attach.
    pub categories: Vec<CategoryId>,
}

/// The payload for creating or updating a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionData {
    /// The amount of money.
    pub amount: f64,
    /// A short note on where the money came from or went.
    #[serde(default)]
    pub description: String,
    /// Whether money came in or went out.
    #[serde(rename = "type", default)]
    pub transaction_type: TransactionType,
    /// When the money moved. Defaults to now.
    #[serde(default)]
    pub date: Option<OffsetDateTime>,
    /// The IDs of the categories to attach.
    #[serde(default)]
    pub categories: Vec<CategoryId>,
}

/// The query parameters for filtering a user's transactions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionQuery {
    /// Only include transactions of this type.
    #[serde(rename = "type", default)]
    pub transaction_type: Option<TransactionType>,
    /// Only include transactions dated on or after this instant.
    #[serde(default)]
    pub start_date: Option<OffsetDateTime>,
    /// Only include transactions dated on or before this instant.
    #[serde(default)]
    pub end_date: Option<OffsetDateTime>,
    /// Only include transactions of at least this amount.
    #[serde(default)]
    pub min_amount: Option<f64>,
    /// Only include transactions of at most this amount.
    #[serde(default)]
    pub max_amount: Option<f64>,
    /// Only include transactions attached to this category.
    #[serde(default)]
    pub category: Option<CategoryId>,
}

impl TransactionQuery {
    /// Whether `transaction` passes every filter in the query.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        if let Some(transaction_type) = self.transaction_type
            && transaction.transaction_type != transaction_type
        {
            return false;
        }

        if let Some(start_date) = self.start_date
            && transaction.date < start_date
        {
            return false;
        }

        if let Some(end_date) = self.end_date
            && transaction.date > end_date
        {
            return false;
        }

        if let Some(min_amount) = self.min_amount
            && transaction.amount < min_amount
        {
            return false;
        }

        if let Some(max_amount) = self.max_amount
            && transaction.amount > max_amount
        {
            return false;
        }

        if let Some(category) = self.category
            && !transaction.categories.contains(&category)
        {
            return false;
        }

        true
    }
}
