use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Closed vocabularies for manual expense entry and marketing spend.
// Labels are the Hebrew strings used across the studio's back office.
pub const EXPENSE_CATEGORIES: [&str; 11] = [
    "שכירות",
    "חשמל",
    "מים",
    "ארנונה",
    "ביטוח",
    "שכר עובדים",
    "ציוד",
    "תחזוקה",
    "שיווק",
    "רישיונות",
    "אחר",
];

pub const MARKETING_CHANNELS: [&str; 7] = [
    "אינסטגרם",
    "פייסבוק",
    "גוגל",
    "TikTok",
    "הפניות",
    "שלטים/פליירים",
    "אחר",
];

/// Fallback bucket for records whose category/channel is empty or unknown.
pub const OTHER_CATEGORY: &str = "אחר";

// Raw input records (one reporting month, already fetched by the caller)

/// One currently active membership. Collection size = active member count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveSubscription {
    /// Missing or null price counts as 0 in every aggregate.
    #[serde(default)]
    pub price_per_month: Option<f64>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyExpense {
    pub month: u32,
    pub year: i32,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    pub amount: f64,
    pub is_fixed: bool,
    #[serde(default)]
    pub vendor_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketingSpend {
    pub month: u32,
    pub year: i32,
    pub channel: String,
    pub amount: f64,
    #[serde(default)]
    pub leads_generated: u32,
    #[serde(default)]
    pub trials_booked: u32,
    #[serde(default)]
    pub conversions: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

/// One membership cancellation event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberChurnLog {
    pub churn_date: NaiveDate,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub price_at_churn: Option<f64>,
    #[serde(default)]
    pub plan_name: Option<String>,
    #[serde(default)]
    pub months_subscribed: f64,
}

/// Flat key/value studio configuration row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioConfigEntry {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// Per-month totals synced from the external billing provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    #[serde(default)]
    pub income_by_payment_type: HashMap<String, f64>,
}

/// A reporting month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub month: u32,
    pub year: i32,
}

impl Period {
    pub fn new(month: u32, year: i32) -> Self {
        Period { month, year }
    }

    /// The preceding month, wrapping over the year boundary.
    pub fn prev(&self) -> Period {
        if self.month == 1 {
            Period { month: 12, year: self.year - 1 }
        } else {
            Period { month: self.month - 1, year: self.year }
        }
    }

    /// First calendar day of the month.
    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    /// Last calendar day of the month.
    pub fn end_date(&self) -> NaiveDate {
        let next = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        };
        next.unwrap_or(NaiveDate::MAX)
            .pred_opt()
            .unwrap_or(NaiveDate::MAX)
    }

    /// Sortable key, e.g. 2025 * 12 + (9 - 1).
    pub fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }
}

// Typed studio configuration, parsed once at the collaborator boundary
// so the engine never touches raw strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StudioSettings {
    pub studio_area_sqm: f64,
    pub target_mrr: f64,
    pub target_members: f64,
    pub current_rent: f64,
}

// Computed KPI output types

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialKpis {
    pub mrr: f64,
    pub active_members: usize,
    pub arpm: f64,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    pub total_fixed_costs: f64,
    pub total_variable_costs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionKpis {
    pub churn_rate: f64,
    pub retention_rate: f64,
    pub churned_this_month: usize,
    pub active_at_start_of_month: usize,
    pub avg_tenure_months: f64,
    pub ltv: f64,
    pub cac: f64,
    pub ltv_cac_ratio: f64,
    pub new_members_this_month: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakEvenKpis {
    pub break_even_members: u32,
    pub break_even_revenue: f64,
    pub current_members: usize,
    pub current_mrr: f64,
    pub progress_percent: f64,
    pub revenue_per_sqm: f64,
    pub studio_area_sqm: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Targets {
    pub target_mrr: f64,
    pub target_members: f64,
}

/// Percentage deltas against the prior month's aggregates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthOverMonth {
    pub income_change: f64,
    pub expense_change: f64,
    pub profit_change: f64,
}

/// One atomic dashboard snapshot. Always fully populated: missing raw
/// data degrades to the zero sentinels, never to absent fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiDashboardData {
    pub period: Period,
    pub financial: FinancialKpis,
    pub retention: RetentionKpis,
    pub break_even: BreakEvenKpis,
    pub targets: Targets,
    pub config: HashMap<String, String>,
    pub expenses_by_category: HashMap<String, f64>,
    pub income_by_payment_type: HashMap<String, f64>,
    pub month_over_month: MonthOverMonth,
    pub anomalies: Vec<String>,
    pub member_sparkline: Vec<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_prev_mid_year() {
        assert_eq!(Period::new(9, 2025).prev(), Period::new(8, 2025));
    }

    #[test]
    fn test_period_prev_january_wraps() {
        assert_eq!(Period::new(1, 2025).prev(), Period::new(12, 2024));
    }

    #[test]
    fn test_period_end_date_regular_month() {
        let end = Period::new(9, 2025).end_date();
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 9, 30).unwrap());
    }

    #[test]
    fn test_period_end_date_december() {
        let end = Period::new(12, 2024).end_date();
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_period_end_date_leap_february() {
        let end = Period::new(2, 2024).end_date();
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_period_ordinal_is_monotonic() {
        assert!(Period::new(12, 2024).ordinal() < Period::new(1, 2025).ordinal());
    }

    #[test]
    fn test_vocabulary_sizes() {
        assert_eq!(EXPENSE_CATEGORIES.len(), 11);
        assert_eq!(MARKETING_CHANNELS.len(), 7);
        assert!(EXPENSE_CATEGORIES.contains(&OTHER_CATEGORY));
        assert!(MARKETING_CHANNELS.contains(&OTHER_CATEGORY));
    }
}
