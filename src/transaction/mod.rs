//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the `transaction_category` join table
//! - Database functions for storing, querying, and managing transactions
//! - The transaction REST endpoints

mod db;
mod domain;
mod endpoints;

pub use db::{
    create_transaction, create_transaction_tables, delete_transaction, get_transactions_for_user,
    sum_transactions,
};
pub use domain::{NewTransaction, Transaction, TransactionId, TransactionType};
pub use endpoints::{
    create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
    get_transactions_endpoint, update_transaction_endpoint,
};

#[cfg(test)]
pub use db::get_transaction;
