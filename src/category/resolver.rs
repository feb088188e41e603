//! Category resolution: get-or-create, and the merge/fork rename logic.
//!
//! Categories are named, deduplicated, per-user-visible tags. A rename must
//! never leak across users who happen to share a category name, but must
//! collapse duplicates for the renaming user. Universal categories are
//! write-protected here, at the resolver boundary.

use rusqlite::Connection;

use crate::{
    Error,
    category::{
        Category, CategoryId, CategoryName,
        db::{
            associate_category, create_category, delete_category, dissociate_category,
            find_category_by_name, get_category, has_other_owners, is_category_associated,
            rename_category_row, repoint_user_transactions,
        },
    },
    user::UserId,
};

/// Look up a category by name, creating it as non-universal if absent, and
/// associate it with the user.
///
/// Returns the category and whether it was newly created. Idempotent on
/// repeated calls with the same name and user.
///
/// This function does not open its own SQL transaction so that callers (the
/// create-category endpoint, the debt ledger) can compose it into a larger
/// atomic unit.
pub fn ensure_category(
    name: CategoryName,
    user_id: UserId,
    connection: &Connection,
) -> Result<(Category, bool), Error> {
    let (category, created) = match find_category_by_name(&name, connection)? {
        Some(category) => (category, false),
        None => (create_category(name, false, connection)?, true),
    };

    associate_category(user_id, category.id, connection)?;

    Ok((category, created))
}

/// Rename a category on behalf of one user.
///
/// The whole procedure runs in a single SQL transaction. Outcomes:
///
/// - The category is universal: fails with [Error::UniversalCategoryImmutable].
/// - The category is not associated with the user: fails with
///   [Error::CategoryNotAssociated].
/// - The user is the sole owner and another category already has `new_name`:
///   merge. The user moves to the existing category, their transactions are
///   re-pointed, and the now-orphaned category is deleted.
/// - The user is the sole owner and the name is free: rename in place.
/// - The category is shared with other users: fork. The user moves to a
///   get-or-create category named `new_name` along with their own
///   transactions; the shared category and everyone else are untouched.
///
/// Returns the category the user ends up associated with.
pub fn rename_category(
    user_id: UserId,
    category_id: CategoryId,
    new_name: CategoryName,
    connection: &Connection,
) -> Result<Category, Error> {
    let transaction = connection.unchecked_transaction()?;

    let category = get_category(category_id, &transaction)?;

    if category.is_universal {
        return Err(Error::UniversalCategoryImmutable);
    }

    if !is_category_associated(user_id, category_id, &transaction)? {
        return Err(Error::CategoryNotAssociated);
    }

    let result = if has_other_owners(category_id, user_id, &transaction)? {
        fork_category(user_id, &category, new_name, &transaction)?
    } else {
        merge_or_rename_category(user_id, &category, new_name, &transaction)?
    };

    transaction.commit()?;

    Ok(result)
}

/// Move the user off a shared category onto a get-or-create category named
/// `new_name`, re-pointing only their own transactions.
fn fork_category(
    user_id: UserId,
    category: &Category,
    new_name: CategoryName,
    connection: &Connection,
) -> Result<Category, Error> {
    let (target, _) = ensure_category(new_name, user_id, connection)?;

    // Renaming a shared category to its own name is a no-op.
    if target.id == category.id {
        return Ok(target);
    }

    repoint_user_transactions(user_id, category.id, target.id, connection)?;
    dissociate_category(user_id, category.id, connection)?;

    Ok(target)
}

/// The sole-owner cases: merge into an existing category with the target
/// name, or rename in place when the name is free.
fn merge_or_rename_category(
    user_id: UserId,
    category: &Category,
    new_name: CategoryName,
    connection: &Connection,
) -> Result<Category, Error> {
    match find_category_by_name(&new_name, connection)? {
        Some(existing) if existing.id != category.id => {
            associate_category(user_id, existing.id, connection)?;
            repoint_user_transactions(user_id, category.id, existing.id, connection)?;
            dissociate_category(user_id, category.id, connection)?;
            // The old category had no other owners, so it is now orphaned.
            delete_category(category.id, connection)?;

            Ok(existing)
        }
        _ => {
            rename_category_row(category.id, &new_name, connection)?;

            Ok(Category {
                id: category.id,
                name: new_name,
                is_universal: false,
            })
        }
    }
}

#[cfg(test)]
mod ensure_category_tests {
    use rusqlite::Connection;

    use crate::{
        category::{CategoryName, db::is_category_associated},
        db::initialize,
        password::PasswordHash,
        user::{NewUser, User, create_user},
    };

    use super::ensure_category;

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
            time::macros::date!(2024 - 01 - 01),
            connection,
        )
        .expect("Could not create test user")
    }

    #[test]
    fn ensure_category_creates_and_associates() {
        let connection = get_test_db_connection();
        let user = create_test_user("foo@bar.baz", &connection);

        let (category, created) = ensure_category(
            CategoryName::new_unchecked("Groceries"),
            user.id,
            &connection,
        )
        .unwrap();

        assert!(created);
        assert!(!category.is_universal);
        assert_eq!(
            is_category_associated(user.id, category.id, &connection),
            Ok(true)
        );
    }

    #[test]
    fn ensure_category_is_idempotent() {
        let connection = get_test_db_connection();
        let user = create_test_user("foo@bar.baz", &connection);
        let name = CategoryName::new_unchecked("Groceries");

        let (first, created_first) = ensure_category(name.clone(), user.id, &connection).unwrap();
        let (second, created_second) = ensure_category(name, user.id, &connection).unwrap();

        assert!(created_first);
        assert!(!created_second);
        assert_eq!(first, second);
    }

    #[test]
    fn ensure_category_associates_existing_category_with_second_user() {
        let connection = get_test_db_connection();
        let alice = create_test_user("alice@bar.baz", &connection);
        let bob = create_test_user("bob@bar.baz", &connection);
        let name = CategoryName::new_unchecked("Groceries");

        let (category, _) = ensure_category(name.clone(), alice.id, &connection).unwrap();
        let (same_category, created) = ensure_category(name, bob.id, &connection).unwrap();

        assert!(!created);
        assert_eq!(category.id, same_category.id);
        assert_eq!(
            is_category_associated(bob.id, category.id, &connection),
            Ok(true)
        );
    }
}
