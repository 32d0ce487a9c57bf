//! Read-side aggregation for the dashboard and the reports page.

pub mod dashboard;
pub mod report;

pub use dashboard::{DashboardSummary, LowStockItem};
pub use report::{ProductBreakdown, Report, ReportFilter, ReportRow, build_report};
