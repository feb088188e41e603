//! Defines the endpoint paths for the REST server.

/// Register a new user account.
pub const POST_USER: &str = "/api/users";
/// Verify an email and password pair.
pub const LOG_IN: &str = "/api/log_in";
/// Fetch or update a user's profile.
pub const USER: &str = "/api/users/{user_id}";
/// Update a user's report email schedule.
pub const USER_EMAIL_SCHEDULE: &str = "/api/users/{user_id}/email_schedule";

/// List the categories visible to a user, or get-or-create one by name.
pub const USER_CATEGORIES: &str = "/api/users/{user_id}/categories";
/// Rename a category on behalf of a user.
pub const USER_CATEGORY: &str = "/api/users/{user_id}/categories/{category_id}";

/// List or create a user's transactions.
pub const USER_TRANSACTIONS: &str = "/api/users/{user_id}/transactions";
/// Fetch, update or delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";

/// List or create a user's scheduled transactions.
pub const USER_SCHEDULED_TRANSACTIONS: &str = "/api/users/{user_id}/scheduled_transactions";
/// Fetch, update or delete a single scheduled transaction.
pub const SCHEDULED_TRANSACTION: &str = "/api/scheduled_transactions/{scheduled_transaction_id}";

/// List or create a user's debts.
pub const USER_DEBTS: &str = "/api/users/{user_id}/debts";
/// Fetch, update or delete a single debt.
pub const DEBT: &str = "/api/debts/{debt_id}";

/// Fetch a user's financial summary report.
pub const USER_REPORT: &str = "/api/users/{user_id}/report";
/// Render and email a user's report immediately.
pub const USER_SEND_REPORT: &str = "/api/users/{user_id}/send_report";
