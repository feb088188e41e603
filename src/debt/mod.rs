//! Debt tracking with simple interest and the payment link invariant.

mod db;
mod domain;
mod endpoints;
mod interest;
mod ledger;

pub use db::{create_debt_table, get_debts_for_user, sum_debts_by_status};
pub use domain::{Debt, DebtId, DebtStatus};
pub use endpoints::{
    create_debt_endpoint, delete_debt_endpoint, get_debt_endpoint, get_debts_endpoint,
    update_debt_endpoint,
};

#[cfg(test)]
pub use domain::NewDebt;
#[cfg(test)]
pub use ledger::create_debt;
