//! User accounts, registration, login and email report schedules.

mod db;
mod domain;
mod endpoints;

pub use db::{
    create_user_table, get_user, get_users_due_for_email, set_email_schedule_start_date,
};
pub use domain::{EmailFrequency, NewUser, User, UserId, UserProfile};
pub use endpoints::{
    get_user_endpoint, log_in_endpoint, register_user_endpoint, update_email_schedule_endpoint,
    update_user_endpoint,
};

#[cfg(test)]
pub use db::{create_user, set_email_schedule};
