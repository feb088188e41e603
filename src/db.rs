//! Database initialization: schema creation and the universal category seed.

use rusqlite::Connection;

use crate::{
    Error,
    category::create_category_tables,
    debt::create_debt_table,
    schedule::create_scheduled_transaction_tables,
    transaction::create_transaction_tables,
    user::create_user_table,
};

/// Categories available to every user from their first sign-in.
const UNIVERSAL_CATEGORIES: [&str; 3] = ["Housing", "Food", "Transportation"];

/// Create the application schema and seed the universal categories.
///
/// Safe to call on an existing database: tables are created with
/// `IF NOT EXISTS` and the seed skips names that are already taken.
///
/// # Errors
///
/// Returns an error if the schema could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // The cascade and set-null actions on the join and debt tables do
    // nothing unless foreign key enforcement is switched on.
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;

    let transaction = connection.unchecked_transaction()?;

    create_user_table(&transaction)?;
    create_category_tables(&transaction)?;
    create_transaction_tables(&transaction)?;
    create_scheduled_transaction_tables(&transaction)?;
    create_debt_table(&transaction)?;

    for name in UNIVERSAL_CATEGORIES {
        transaction.execute(
            "INSERT OR IGNORE INTO category (name, is_universal) VALUES (?1, 1);",
            (name,),
        )?;
    }

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use crate::category::get_universal_categories;

    use super::initialize;

    #[test]
    fn initialize_seeds_universal_categories() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize database");

        let names: Vec<String> = get_universal_categories(&connection)
            .unwrap()
            .into_iter()
            .map(|category| category.name.to_string())
            .collect();
        assert_eq!(names, vec!["Food", "Housing", "Transportation"]);
    }

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize database");
        initialize(&connection).expect("Could not re-initialize database");

        assert_eq!(get_universal_categories(&connection).unwrap().len(), 3);
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let result = connection.execute(
            "INSERT INTO user_category (user_id, category_id) VALUES (999, 999);",
            (),
        );

        assert!(result.is_err());
    }
}
