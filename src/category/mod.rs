//! Category management for grouping transactions.
//!
//! Categories are shared, globally-unique names with per-user visibility.
//! The resolver implements get-or-create plus the merge/fork rename
//! semantics that keep one user's renames from leaking to other users.

mod db;
mod domain;
mod endpoints;
mod resolver;

pub use db::{associate_category, create_category_tables, get_universal_categories};
pub use domain::{Category, CategoryId, CategoryName};
pub use endpoints::{create_category_endpoint, get_categories_endpoint, rename_category_endpoint};
pub use resolver::ensure_category;

#[cfg(test)]
pub use db::{
    create_category, dissociate_category, find_category_by_name, get_categories_for_user,
    get_category, has_other_owners, is_category_associated,
};
