//! The schedule advancer: materializes due scheduled transactions into
//! concrete transactions.

use rusqlite::Connection;
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    schedule::{
        ScheduledTransaction,
        db::{delete_scheduled_transaction, get_due_scheduled_transactions, set_schedule_date},
    },
    transaction::{NewTransaction, create_transaction},
};

/// Process every scheduled transaction due on or before `today`.
///
/// Each due record fires exactly once per pass: a concrete transaction is
/// recorded (dated at processing time, copying the template's amount,
/// description, type and categories), then the record's due date advances by
/// one repeat interval, or the record is deleted for one-shot schedules. A
/// record whose due date is more than one interval in the past catches up
/// over subsequent passes.
///
/// Each record's materialize-and-advance step is one SQL transaction, and a
/// failing record is logged and skipped without aborting the pass.
///
/// Returns the number of records that fired.
pub fn process_scheduled_transactions(
    today: Date,
    connection: &Connection,
) -> Result<usize, Error> {
    let due = get_due_scheduled_transactions(today, connection)?;
    let mut fired = 0;

    for schedule in due {
        match advance_one(&schedule, connection) {
            Ok(()) => fired += 1,
            Err(error) => {
                tracing::error!(
                    scheduled_transaction_id = schedule.id,
                    user_id = %schedule.user_id,
                    "could not advance scheduled transaction: {error}"
                );
            }
        }
    }

    Ok(fired)
}

fn advance_one(schedule: &ScheduledTransaction, connection: &Connection) -> Result<(), Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    create_transaction(
        NewTransaction {
            user_id: schedule.user_id,
            amount: schedule.amount,
            description: schedule.description.clone(),
            transaction_type: schedule.transaction_type,
            date: OffsetDateTime::now_utc(),
            categories: schedule.categories.clone(),
        },
        &sql_transaction,
    )?;

    match schedule.repeat.next_date(schedule.schedule_date) {
        Some(next_date) => set_schedule_date(schedule.id, next_date, &sql_transaction)?,
        None => delete_scheduled_transaction(schedule.id, &sql_transaction)?,
    }

    sql_transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod advancer_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        category::{CategoryName, ensure_category},
        db::initialize,
        password::PasswordHash,
        schedule::{
            NewScheduledTransaction, Repeat,
            db::{create_scheduled_transaction, get_scheduled_transaction},
        },
        transaction::{TransactionType, get_transactions_for_user},
        user::{NewUser, User, create_user},
    };

    use super::process_scheduled_transactions;

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    fn create_test_user(email: &str, connection: &Connection) -> User {
        create_user(
            NewUser {
                email: email.parse().unwrap(),
                password_hash: PasswordHash::new_unchecked("hunter2hash"),
                first_name: None,
                last_name: None,
            },
            date!(2024 - 01 - 01),
            connection,
        )
        .expect("Could not create test user")
    }

    fn new_test_schedule(
        user: &User,
        schedule_date: time::Date,
        repeat: Repeat,
    ) -> NewScheduledTransaction {
        NewScheduledTransaction {
            user_id: user.id,
            amount: 1200.0,
            description: "Rent".to_string(),
            transaction_type: TransactionType::Expense,
            schedule_date,
            repeat,
            categories: Vec::new(),
        }
    }

    #[test]
    fn due_weekly_schedule_fires_and_advances_one_week() {
        let connection = get_test_db_connection();
        let user = create_test_user("foo@bar.baz", &connection);
        let schedule = create_scheduled_transaction(
            new_test_schedule(&user, date!(2024 - 01 - 08), Repeat::Weekly),
            &connection,
        )
        .unwrap();

        let fired = process_scheduled_transactions(date!(2024 - 01 - 10), &connection).unwrap();

        assert_eq!(fired, 1);
        let advanced = get_scheduled_transaction(schedule.id, &connection).unwrap();
        assert_eq!(advanced.schedule_date, date!(2024 - 01 - 15));
        let transactions = get_transactions_for_user(user.id, &connection).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, 1200.0);
        assert_eq!(transactions[0].description, "Rent");
        assert_eq!(transactions[0].transaction_type, TransactionType::Expense);
    }

    #[test]
    fn future_schedule_does_not_fire() {
        let connection = get_test_db_connection();
        let user = create_test_user("foo@bar.baz", &connection);
        create_scheduled_transaction(
            new_test_schedule(&user, date!(2024 - 06 - 01), Repeat::Weekly),
            &connection,
        )
        .unwrap();

        let fired = process_scheduled_transactions(date!(2024 - 01 - 10), &connection).unwrap();

        assert_eq!(fired, 0);
        assert!(get_transactions_for_user(user.id, &connection).unwrap().is_empty());
    }

    #[test]
    fn one_shot_schedule_is_deleted_after_firing() {
        let connection = get_test_db_connection();
        let user = create_test_user("foo@bar.baz", &connection);
        let schedule = create_scheduled_transaction(
            new_test_schedule(&user, date!(2024 - 01 - 08), Repeat::None),
            &connection,
        )
        .unwrap();

        let fired = process_scheduled_transactions(date!(2024 - 01 - 10), &connection).unwrap();

        assert_eq!(fired, 1);
        assert_eq!(
            get_scheduled_transaction(schedule.id, &connection),
            Err(Error::NotFound)
        );
        assert_eq!(get_transactions_for_user(user.id, &connection).unwrap().len(), 1);
    }

    #[test]
    fn backlogged_schedule_fires_once_per_pass() {
        let connection = get_test_db_connection();
        let user = create_test_user("foo@bar.baz", &connection);
        // Three days behind: catches up one day per pass.
        let schedule = create_scheduled_transaction(
            new_test_schedule(&user, date!(2024 - 01 - 07), Repeat::Daily),
            &connection,
        )
        .unwrap();

        process_scheduled_transactions(date!(2024 - 01 - 10), &connection).unwrap();
        assert_eq!(get_transactions_for_user(user.id, &connection).unwrap().len(), 1);

        process_scheduled_transactions(date!(2024 - 01 - 10), &connection).unwrap();
        assert_eq!(get_transactions_for_user(user.id, &connection).unwrap().len(), 2);

        let advanced = get_scheduled_transaction(schedule.id, &connection).unwrap();
        assert_eq!(advanced.schedule_date, date!(2024 - 01 - 09));
    }

    #[test]
    fn materialized_transaction_copies_categories() {
        let connection = get_test_db_connection();
        let user = create_test_user("foo@bar.baz", &connection);
        let (category, _) =
            ensure_category(CategoryName::new_unchecked("Bills"), user.id, &connection).unwrap();
        create_scheduled_transaction(
            NewScheduledTransaction {
                categories: vec![category.id],
                ..new_test_schedule(&user, date!(2024 - 01 - 08), Repeat::Monthly)
            },
            &connection,
        )
        .unwrap();

        process_scheduled_transactions(date!(2024 - 01 - 10), &connection).unwrap();

        let transactions = get_transactions_for_user(user.id, &connection).unwrap();
        assert_eq!(transactions[0].categories, vec![category.id]);
    }
}
