//! Database operations for categories and user/category associations.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName},
    user::UserId,
};

/// Create a category and return it with its generated ID.
///
/// Category names are globally unique; inserting a duplicate name is an SQL
/// error, so callers that want get-or-create semantics should go through
/// [crate::category::ensure_category].
pub fn create_category(
    name: CategoryName,
    is_universal: bool,
    connection: &Connection,
) -> Result<Category, Error> {
    connection.execute(
        "INSERT INTO category (name, is_universal) VALUES (?1, ?2);",
        (name.as_ref(), is_universal),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Category {
        id,
        name,
        is_universal,
    })
}

/// Retrieve a single category by ID.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, is_universal FROM category WHERE id = :id;")?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Look up a category by its unique name.
pub fn find_category_by_name(
    name: &CategoryName,
    connection: &Connection,
) -> Result<Option<Category>, Error> {
    let mut statement =
        connection.prepare("SELECT id, name, is_universal FROM category WHERE name = :name;")?;
    let mut rows = statement.query(&[(":name", &name.as_ref())])?;

    match rows.next()? {
        Some(row) => Ok(Some(map_row(row)?)),
        None => Ok(None),
    }
}

/// Retrieve the categories visible to a user: their associated categories
/// plus all universal categories, ordered alphabetically by name.
pub fn get_categories_for_user(
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT DISTINCT c.id, c.name, c.is_universal
             FROM category c
             LEFT JOIN user_category uc ON uc.category_id = c.id AND uc.user_id = :user_id
             WHERE uc.user_id IS NOT NULL OR c.is_universal = 1
             ORDER BY c.name ASC;",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Retrieve all universal categories.
///
/// These are attached to every new user at registration.
pub fn get_universal_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, is_universal FROM category WHERE is_universal = 1 ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Associate a category with a user. Does nothing if the association already
/// exists.
pub fn associate_category(
    user_id: UserId,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT OR IGNORE INTO user_category (user_id, category_id) VALUES (?1, ?2);",
        (user_id.as_i64(), category_id),
    )?;

    Ok(())
}

/// Remove the association between a category and a user.
pub fn dissociate_category(
    user_id: UserId,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "DELETE FROM user_category WHERE user_id = ?1 AND category_id = ?2;",
        (user_id.as_i64(), category_id),
    )?;

    Ok(())
}

/// Whether the category is associated with the user.
pub fn is_category_associated(
    user_id: UserId,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<bool, Error> {
    let count: i64 = connection
        .prepare("SELECT COUNT(*) FROM user_category WHERE user_id = :user_id AND category_id = :category_id;")?
        .query_row(
            &[(":user_id", &user_id.as_i64()), (":category_id", &category_id)],
            |row| row.get(0),
        )?;

    Ok(count > 0)
}

/// Whether any user other than `user_id` is associated with the category.
pub fn has_other_owners(
    category_id: CategoryId,
    user_id: UserId,
    connection: &Connection,
) -> Result<bool, Error> {
    let count: i64 = connection
        .prepare("SELECT COUNT(*) FROM user_category WHERE category_id = :category_id AND user_id != :user_id;")?
        .query_row(
            &[(":category_id", &category_id), (":user_id", &user_id.as_i64())],
            |row| row.get(0),
        )?;

    Ok(count > 0)
}

/// Update a category's name in place.
pub fn rename_category_row(
    category_id: CategoryId,
    new_name: &CategoryName,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE category SET name = ?1 WHERE id = ?2;",
        (new_name.as_ref(), category_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete a category row. Association and transaction join rows cascade.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM category WHERE id = ?1;", [category_id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Re-point one user's transactions from `old_category_id` to
/// `new_category_id`.
///
/// Transactions that already carry the new category keep a single join row;
/// the sweep delete removes their leftover link to the old category.
pub fn repoint_user_transactions(
    user_id: UserId,
    old_category_id: CategoryId,
    new_category_id: CategoryId,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "UPDATE OR IGNORE transaction_category SET category_id = ?1
         WHERE category_id = ?2
           AND transaction_id IN (SELECT id FROM \"transaction\" WHERE user_id = ?3);",
        (new_category_id, old_category_id, user_id.as_i64()),
    )?;

    connection.execute(
        "DELETE FROM transaction_category
         WHERE category_id = ?1
           AND transaction_id IN (SELECT id FROM \"transaction\" WHERE user_id = ?2);",
        (old_category_id, user_id.as_i64()),
    )?;

    Ok(())
}

/// Initialize the category table and the user/category association table.
pub fn create_category_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            is_universal INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_category_name ON category(name);

        CREATE TABLE IF NOT EXISTS user_category (
            user_id INTEGER NOT NULL,
            category_id INTEGER NOT NULL,
            PRIMARY KEY (user_id, category_id),
            FOREIGN KEY (user_id) REFERENCES user(id) ON DELETE CASCADE,
            FOREIGN KEY (category_id) REFERENCES category(id) ON DELETE CASCADE
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);
    let is_universal = row.get(2)?;

    Ok(Category {
        id,
        name,
        is_universal,
    })
}
