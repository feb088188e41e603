//! The debt ledger: create/update/delete with the payment link invariant.
//!
//! A debt has a linked payment transaction exactly when its status is paid,
//! and never more than one. Every operation here runs in a single SQL
//! transaction so a crash can never leave a paid debt without its payment or
//! a deleted debt with a stray one.

use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    Error,
    category::{CategoryName, ensure_category},
    debt::{
        Debt, DebtId, DebtStatus,
        db::{delete_debt_row, get_debt, insert_debt, set_payment_transaction, update_debt_row},
        domain::{DebtUpdateData, NewDebt},
        interest::compute_interest,
    },
    transaction::{NewTransaction, TransactionId, TransactionType, create_transaction,
        delete_transaction},
};

/// The category every payment transaction is filed under.
const PAYMENT_CATEGORY: &str = "Debt";

/// Record a new debt, computing its derived amounts.
///
/// A debt created directly in the paid status gets its payment transaction
/// immediately.
pub fn create_debt(new_debt: NewDebt, connection: &Connection) -> Result<Debt, Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    let breakdown = compute_interest(
        new_debt.amount,
        new_debt.has_interest,
        new_debt.interest_rate,
        new_debt.init_date,
        new_debt.due_date,
    );

    let mut debt = Debt {
        id: 0,
        user_id: new_debt.user_id,
        description: new_debt.description,
        lender: new_debt.lender,
        amount: new_debt.amount,
        has_interest: new_debt.has_interest,
        interest_rate: new_debt.interest_rate,
        interest: breakdown.interest,
        total_amount: breakdown.total_amount,
        init_date: new_debt.init_date,
        due_date: new_debt.due_date,
        status: new_debt.status,
        payment_transaction_id: None,
    };
    debt.id = insert_debt(&debt, &sql_transaction)?;

    if debt.status == DebtStatus::Paid {
        let payment_id = create_payment_transaction(&debt, &sql_transaction)?;
        set_payment_transaction(debt.id, Some(payment_id), &sql_transaction)?;
        debt.payment_transaction_id = Some(payment_id);
    }

    sql_transaction.commit()?;

    Ok(debt)
}

/// Apply a partial update to a debt, recomputing its derived amounts and
/// re-establishing the payment link invariant.
///
/// Omitted fields keep their stored values, so a payload carrying only a new
/// status never clobbers the amounts or dates. Any existing payment
/// transaction is removed first; a new one is created iff the merged status
/// is paid, so repeated paid/pending toggles never accumulate payments.
pub fn update_debt(
    debt_id: DebtId,
    data: DebtUpdateData,
    connection: &Connection,
) -> Result<Debt, Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    let existing = get_debt(debt_id, &sql_transaction)?;

    if let Some(payment_id) = existing.payment_transaction_id {
        set_payment_transaction(debt_id, None, &sql_transaction)?;
        delete_transaction(payment_id, &sql_transaction)?;
    }

    let amount = data.amount.unwrap_or(existing.amount);
    let has_interest = data.has_interest.unwrap_or(existing.has_interest);
    let interest_rate = data.interest_rate.unwrap_or(existing.interest_rate);
    let init_date = data.init_date.unwrap_or(existing.init_date);
    let due_date = data.due_date.unwrap_or(existing.due_date);

    let breakdown = compute_interest(amount, has_interest, interest_rate, init_date, due_date);

    let mut debt = Debt {
        id: existing.id,
        user_id: existing.user_id,
        description: data.description.unwrap_or(existing.description),
        lender: data.lender.or(existing.lender),
        amount,
        has_interest,
        interest_rate,
        interest: breakdown.interest,
        total_amount: breakdown.total_amount,
        init_date,
        due_date,
        status: data.status.unwrap_or(existing.status),
        payment_transaction_id: None,
    };
    update_debt_row(&debt, &sql_transaction)?;

    if debt.status == DebtStatus::Paid {
        let payment_id = create_payment_transaction(&debt, &sql_transaction)?;
        set_payment_transaction(debt.id, Some(payment_id), &sql_transaction)?;
        debt.payment_transaction_id = Some(payment_id);
    }

    sql_transaction.commit()?;

    Ok(debt)
}

/// Delete a debt, removing its payment transaction with it.
pub fn delete_debt(debt_id: DebtId, connection: &Connection) -> Result<(), Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    let existing = get_debt(debt_id, &sql_transaction)?;

    if let Some(payment_id) = existing.payment_transaction_id {
        set_payment_transaction(debt_id, None, &sql_transaction)?;
        delete_transaction(payment_id, &sql_transaction)?;
    }

    delete_debt_row(debt_id, &sql_transaction)?;

    sql_transaction.commit()?;

    Ok(())
}

fn create_payment_transaction(debt: &Debt, connection: &Connection) -> Result<TransactionId, Error> {
    let (category, _) = ensure_category(
        CategoryName::new_unchecked(PAYMENT_CATEGORY),
        debt.user_id,
        connection,
    )?;

    let transaction = create_transaction(
        NewTransaction {
            user_id: debt.user_id,
            amount: debt.total_amount,
            description: payment_description(&debt.description),
            transaction_type: TransactionType::Expense,
            date: OffsetDateTime::now_utc(),
            categories: vec![category.id],
        },
        connection,
    )?;

    Ok(transaction.id)
}

fn payment_description(description: &str) -> String {
    if description.is_empty() {
        "Payment for debt: No description".to_string()
    } else {
        format!("Payment for debt: {description}")
    }
}

#[cfg(test)]
mod ledger_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        debt::{
            DebtStatus,
            db::get_debt,
            domain::{DebtUpdateData, NewDebt},
        },
        password::PasswordHash,
        transaction::{TransactionType, get_transaction, get_transactions_for_user},
        user::{NewUser, User, create_user},
    };

    use super::{create_debt, delete_debt, update_debt};

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    fn create_test_user(connection: &Connection) -> User {
        create_user(
            NewUser {
                email: "foo@bar.baz".parse().unwrap(),
                password_hash: PasswordHash::new_unchecked("hunter2hash"),
                first_name: None,
                last_name: None,
            },
            date!(2024 - 01 - 01),
            connection,
        )
        .expect("Could not create test user")
    }

    fn new_test_debt(user: &User, status: DebtStatus) -> NewDebt {
        NewDebt {
            user_id: user.id,
            description: "Car repair loan".to_string(),
            lender: Some("Aunt May".to_string()),
            amount: 1000.0,
            has_interest: true,
            interest_rate: 5.0,
            init_date: date!(2024 - 01 - 15),
            due_date: date!(2024 - 04 - 15),
            status,
        }
    }

    fn status_update(status: DebtStatus) -> DebtUpdateData {
        DebtUpdateData {
            status: Some(status),
            ..DebtUpdateData::default()
        }
    }

    #[test]
    fn create_debt_stores_derived_amounts() {
        let connection = get_test_db_connection();
        let user = create_test_user(&connection);

        let debt = create_debt(new_test_debt(&user, DebtStatus::Pending), &connection).unwrap();

        assert_eq!(debt.interest, 150.0);
        assert_eq!(debt.total_amount, 1150.0);
        assert_eq!(debt.interest_rate, 5.0);
        assert_eq!(debt.payment_transaction_id, None);
        assert_eq!(get_debt(debt.id, &connection), Ok(debt));
    }

    #[test]
    fn pending_debt_has_no_payment_transaction() {
        let connection = get_test_db_connection();
        let user = create_test_user(&connection);

        create_debt(new_test_debt(&user, DebtStatus::Pending), &connection).unwrap();

        assert!(get_transactions_for_user(user.id, &connection).unwrap().is_empty());
    }

    #[test]
    fn paid_debt_creates_linked_payment_transaction() {
        let connection = get_test_db_connection();
        let user = create_test_user(&connection);

        let debt = create_debt(new_test_debt(&user, DebtStatus::Paid), &connection).unwrap();

        let payment_id = debt.payment_transaction_id.expect("payment link missing");
        let payment = get_transaction(payment_id, &connection).unwrap();
        assert_eq!(payment.amount, 1150.0);
        assert_eq!(payment.transaction_type, TransactionType::Expense);
        assert_eq!(payment.description, "Payment for debt: Car repair loan");
        assert_eq!(payment.categories.len(), 1);
    }

    #[test]
    fn paid_pending_paid_toggles_keep_at_most_one_payment() {
        let connection = get_test_db_connection();
        let user = create_test_user(&connection);
        let debt = create_debt(new_test_debt(&user, DebtStatus::Paid), &connection).unwrap();

        let updated = update_debt(debt.id, status_update(DebtStatus::Pending), &connection).unwrap();
        assert_eq!(updated.payment_transaction_id, None);
        assert!(get_transactions_for_user(user.id, &connection).unwrap().is_empty());

        let repaid = update_debt(debt.id, status_update(DebtStatus::Paid), &connection).unwrap();
        assert!(repaid.payment_transaction_id.is_some());
        assert_eq!(get_transactions_for_user(user.id, &connection).unwrap().len(), 1);

        let repaid_again = update_debt(debt.id, status_update(DebtStatus::Paid), &connection).unwrap();
        assert!(repaid_again.payment_transaction_id.is_some());
        assert_eq!(get_transactions_for_user(user.id, &connection).unwrap().len(), 1);
    }

    #[test]
    fn update_debt_recomputes_derived_amounts() {
        let connection = get_test_db_connection();
        let user = create_test_user(&connection);
        let debt = create_debt(new_test_debt(&user, DebtStatus::Pending), &connection).unwrap();

        let updated = update_debt(
            debt.id,
            DebtUpdateData {
                has_interest: Some(false),
                ..DebtUpdateData::default()
            },
            &connection,
        )
        .unwrap();

        assert_eq!(updated.interest, 0.0);
        assert_eq!(updated.total_amount, 1000.0);
    }

    #[test]
    fn partial_update_keeps_omitted_fields() {
        let connection = get_test_db_connection();
        let user = create_test_user(&connection);
        let debt = create_debt(new_test_debt(&user, DebtStatus::Paid), &connection).unwrap();

        let updated = update_debt(
            debt.id,
            DebtUpdateData {
                description: Some("Engine rebuild loan".to_string()),
                ..DebtUpdateData::default()
            },
            &connection,
        )
        .unwrap();

        assert_eq!(updated.description, "Engine rebuild loan");
        assert_eq!(updated.status, DebtStatus::Paid);
        assert!(updated.payment_transaction_id.is_some());
        assert_eq!(updated.amount, 1000.0);
        assert_eq!(updated.total_amount, 1150.0);
        assert_eq!(updated.due_date, date!(2024 - 04 - 15));
        assert_eq!(updated.lender.as_deref(), Some("Aunt May"));
    }

    #[test]
    fn delete_debt_removes_payment_transaction() {
        let connection = get_test_db_connection();
        let user = create_test_user(&connection);
        let debt = create_debt(new_test_debt(&user, DebtStatus::Paid), &connection).unwrap();
        let payment_id = debt.payment_transaction_id.unwrap();

        delete_debt(debt.id, &connection).unwrap();

        assert_eq!(get_debt(debt.id, &connection), Err(Error::NotFound));
        assert_eq!(get_transaction(payment_id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_debt_returns_not_found() {
        let connection = get_test_db_connection();

        assert_eq!(delete_debt(999_999, &connection), Err(Error::NotFound));
    }
}
