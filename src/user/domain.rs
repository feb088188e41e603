//! Core user domain types.

use std::{fmt::Display, str::FromStr};

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, password::PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserId(i64);

impl UserId {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// How often a user receives their financial report by email.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailFrequency {
    /// Every day.
    Daily,
    /// Every seven days.
    Weekly,
    /// Every calendar month, clamping to the last day of shorter months.
    #[default]
    Monthly,
    /// Every calendar year, clamping Feb 29 to Feb 28.
    Yearly,
}

impl EmailFrequency {
    /// The next send date after `date` for this frequency.
    pub fn advance(&self, date: Date) -> Date {
        match self {
            EmailFrequency::Daily => date.saturating_add(time::Duration::days(1)),
            EmailFrequency::Weekly => date.saturating_add(time::Duration::weeks(1)),
            EmailFrequency::Monthly => crate::dates::add_months(date, 1),
            EmailFrequency::Yearly => crate::dates::add_years(date, 1),
        }
    }

    /// The lowercase string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailFrequency::Daily => "daily",
            EmailFrequency::Weekly => "weekly",
            EmailFrequency::Monthly => "monthly",
            EmailFrequency::Yearly => "yearly",
        }
    }
}

impl FromStr for EmailFrequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(EmailFrequency::Daily),
            "weekly" => Ok(EmailFrequency::Weekly),
            "monthly" => Ok(EmailFrequency::Monthly),
            "yearly" => Ok(EmailFrequency::Yearly),
            _ => Err(Error::InvalidFrequency(s.to_string())),
        }
    }
}

impl Display for EmailFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserId,
    /// The user's unique email address.
    pub email: EmailAddress,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// The user's given name.
    pub first_name: Option<String>,
    /// The user's family name.
    pub last_name: Option<String>,
    /// How often the user receives their emailed report.
    pub email_schedule_frequency: EmailFrequency,
    /// The next date the user's report is due to be emailed.
    pub email_schedule_start_date: Date,
}

/// The data needed to register a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// The user's unique email address.
    pub email: EmailAddress,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// The user's given name.
    pub first_name: Option<String>,
    /// The user's family name.
    pub last_name: Option<String>,
}

/// The public view of a user returned by the API.
///
/// Deliberately excludes the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The user's ID in the application database.
    pub id: UserId,
    /// The user's unique email address.
    pub email: String,
    /// The user's given name.
    pub first_name: Option<String>,
    /// The user's family name.
    pub last_name: Option<String>,
    /// How often the user receives their emailed report.
    pub email_schedule_frequency: EmailFrequency,
    /// The next date the user's report is due to be emailed.
    pub email_schedule_start_date: Date,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.to_string(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email_schedule_frequency: user.email_schedule_frequency,
            email_schedule_start_date: user.email_schedule_start_date,
        }
    }
}

/// The payload for registering a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationData {
    /// The email address to register.
    pub email: String,
    /// The raw password to hash and store.
    pub password: String,
    /// The user's given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// The user's family name.
    #[serde(default)]
    pub last_name: Option<String>,
}

/// The payload for verifying an email and password pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogInData {
    /// The email address of the account to log into.
    pub email: String,
    /// The raw password to verify.
    pub password: String,
}

/// The payload for updating a user's profile names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserUpdateData {
    /// The user's given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// The user's family name.
    #[serde(default)]
    pub last_name: Option<String>,
}

/// The payload for updating a user's email report schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailScheduleData {
    /// How often to email the report. Defaults to monthly.
    #[serde(default)]
    pub frequency: EmailFrequency,
    /// The first date the report is due. Defaults to today.
    #[serde(default)]
    pub start_date: Option<Date>,
}
