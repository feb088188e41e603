//! Core scheduled transaction domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    category::CategoryId,
    dates::{add_months, add_years},
    transaction::TransactionType,
    user::UserId,
};

/// Database identifier for a scheduled transaction.
pub type ScheduledTransactionId = i64;

/// How often a scheduled transaction recurs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Repeat {
    /// A one-shot schedule, deleted after it fires.
    #[default]
    None,
    /// Every day.
    Daily,
    /// Every seven days.
    Weekly,
    /// Every calendar month, clamping to the last day of shorter months.
    Monthly,
    /// Every calendar year, clamping Feb 29 to Feb 28.
    Yearly,
}

impl Repeat {
    /// The due date following `date`, or [None] for a one-shot schedule.
    pub fn next_date(&self, date: Date) -> Option<Date> {
        match self {
            Repeat::None => None,
            Repeat::Daily => Some(date.saturating_add(time::Duration::days(1))),
            Repeat::Weekly => Some(date.saturating_add(time::Duration::weeks(1))),
            Repeat::Monthly => Some(add_months(date, 1)),
            Repeat::Yearly => Some(add_years(date, 1)),
        }
    }

    /// The lowercase string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Repeat::None => "none",
            Repeat::Daily => "daily",
            Repeat::Weekly => "weekly",
            Repeat::Monthly => "monthly",
            Repeat::Yearly => "yearly",
        }
    }
}

impl FromStr for Repeat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Repeat::None),
            "daily" => Ok(Repeat::Daily),
            "weekly" => Ok(Repeat::Weekly),
            "monthly" => Ok(Repeat::Monthly),
            "yearly" => Ok(Repeat::Yearly),
            _ => Err(Error::InvalidFrequency(s.to_string())),
        }
    }
}

impl Display for Repeat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A template that materializes concrete transactions on a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTransaction {
    /// The scheduled transaction's ID in the application database.
    pub id: ScheduledTransactionId,
    /// The user the schedule belongs to.
    pub user_id: UserId,
    /// The amount each materialized transaction carries.
    pub amount: f64,
    /// The description each materialized transaction carries.
    pub description: String,
    /// Whether the materialized transactions are income or expenses.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The next date the schedule is due to fire.
    pub schedule_date: Date,
    /// How often the schedule recurs.
    pub repeat: Repeat,
    /// The IDs of the categories copied onto each materialized transaction,
    /// in ascending order.
    pub categories: Vec<CategoryId>,
}

/// The data needed to create a scheduled transaction.
#[derive(Debug, Clone)]
pub struct NewScheduledTransaction {
    /// The user the schedule belongs to.
    pub user_id: UserId,
    /// The amount each materialized transaction carries.
    pub amount: f64,
    /// The description each materialized transaction carries.
    pub description: String,
    /// Whether the materialized transactions are income or expenses.
    pub transaction_type: TransactionType,
    /// The first date the schedule is due to fire.
    pub schedule_date: Date,
    /// How often the schedule recurs.
    pub repeat: Repeat,
    /// The IDs of the categories to copy onto each materialized transaction.
    pub categories: Vec<CategoryId>,
}

/// The payload for creating or updating a scheduled transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledTransactionData {
    /// The amount each materialized transaction carries.
    pub amount: f64,
    /// The description each materialized transaction carries.
    #[serde(default)]
    pub description: String,
    /// Whether the materialized transactions are income or expenses.
    #[serde(rename = "type", default)]
    pub transaction_type: TransactionType,
    /// The next date the schedule is due to fire.
    pub schedule_date: Date,
    /// How often the schedule recurs.
    #[serde(default)]
    pub repeat: Repeat,
    /// The IDs of the categories to copy onto each materialized transaction.
    #[serde(default)]
    pub categories: Vec<CategoryId>,
}
