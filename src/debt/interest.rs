//! Simple interest arithmetic for debts.

use time::Date;

use crate::dates::months_between;

/// The derived money amounts for a debt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterestBreakdown {
    /// Whole calendar months between the start and due dates. May be zero or
    /// negative; either disables interest.
    pub months: i64,
    /// The accrued interest.
    pub interest: f64,
    /// The principal plus accrued interest.
    pub total_amount: f64,
}

/// Compute a debt's accrued interest and total.
///
/// Simple (non-compounding) interest: `amount * (rate / 100) * months`,
/// where `months` counts whole calendar months between `init_date` and
/// `due_date`, ignoring the day of month. Interest accrues only when the
/// debt has interest, the rate is positive and the span is at least one
/// month; otherwise the total is just the principal. A due date before the
/// start date is accepted and accrues nothing.
pub fn compute_interest(
    amount: f64,
    has_interest: bool,
    interest_rate: f64,
    init_date: Date,
    due_date: Date,
) -> InterestBreakdown {
    let months = months_between(init_date, due_date);

    if has_interest && interest_rate > 0.0 && months > 0 {
        let interest = amount * (interest_rate / 100.0) * months as f64;

        InterestBreakdown {
            months,
            interest,
            total_amount: amount + interest,
        }
    } else {
        InterestBreakdown {
            months,
            interest: 0.0,
            total_amount: amount,
        }
    }
}
