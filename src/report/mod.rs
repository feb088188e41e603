//! Financial report aggregation and rendering.

mod endpoints;
mod render;
mod summary;

pub use endpoints::get_report_endpoint;
pub use render::{ReportRenderer, TextRenderer};
pub use summary::{UserReport, build_report};

#[cfg(test)]
pub use summary::FinancialSummary;
