//! Pure KPI computation core for the studio dashboard.
//!
//! Every function here is a deterministic computation over in-memory
//! collections the caller has already fetched. The single error class is
//! degenerate input (empty collections, zero denominators, non-finite
//! numbers) and the uniform policy is a documented sentinel value: 0,
//! `Good`, or a formatted zero string. Nothing in this crate panics,
//! reads the clock, or performs I/O.

pub mod aggregate;
pub mod anomaly;
pub mod assemble;
pub mod format;
pub mod metrics;
pub mod status;

pub use aggregate::{
    average_tenure_months, breakdown_by_key, count_new_members, expense_breakdown,
    marketing_totals, member_sparkline, sum_active_mrr, sum_expenses,
};
pub use anomaly::{default_rules, detect_anomalies, AnomalyContext, AnomalyRule};
pub use assemble::{assemble_dashboard, DashboardInputs};
pub use format::{format_currency, format_percent, format_ratio};
pub use metrics::{
    arpm, break_even_members, cac, churn_rate, ltv, ltv_cac_ratio, percent_change,
    retention_rate, revenue_per_sqm,
};
pub use status::{kpi_status, KpiStatus};
