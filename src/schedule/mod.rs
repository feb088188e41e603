//! Recurring scheduled transactions and the advancer that materializes them.

mod advancer;
mod db;
mod domain;
mod endpoints;

pub use advancer::process_scheduled_transactions;
pub use db::{create_scheduled_transaction_tables, get_scheduled_transactions_for_user};
pub use domain::{NewScheduledTransaction, ScheduledTransaction, ScheduledTransactionId};
pub use endpoints::{
    create_scheduled_transaction_endpoint, delete_scheduled_transaction_endpoint,
    get_scheduled_transactions_endpoint, update_scheduled_transaction_endpoint,
};

#[cfg(test)]
pub use domain::Repeat;
