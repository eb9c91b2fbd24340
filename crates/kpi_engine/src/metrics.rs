//! Derived metric calculators.
//!
//! All functions are total over their domain: every formula guards its own
//! denominator and returns 0 for degenerate input instead of NaN or
//! infinity, so call sites compose them without defensive wrapping.
//! Rounding is a formatting concern; values here stay unrounded except
//! for the break-even ceiling.

/// Average Revenue Per Member = MRR / active members. 0 when no members.
pub fn arpm(mrr: f64, active_members: usize) -> f64 {
    if active_members == 0 {
        return 0.0;
    }
    mrr / active_members as f64
}

/// Customer Acquisition Cost = marketing spend / new paying members.
/// 0 when no new paying members.
pub fn cac(marketing_spend_total: f64, new_paying_members: u32) -> f64 {
    if new_paying_members == 0 {
        return 0.0;
    }
    marketing_spend_total / new_paying_members as f64
}

/// Lifetime Value = ARPM * average tenure in months.
pub fn ltv(arpm: f64, avg_tenure_months: f64) -> f64 {
    arpm * avg_tenure_months
}

/// LTV:CAC ratio. 0 when CAC is 0.
pub fn ltv_cac_ratio(ltv: f64, cac: f64) -> f64 {
    if cac == 0.0 {
        return 0.0;
    }
    ltv / cac
}

/// Churn rate = (churned this month / active at start of month) * 100.
/// 0 when nobody was active at the start of the month.
pub fn churn_rate(churned_this_month: usize, active_at_start_of_month: usize) -> f64 {
    if active_at_start_of_month == 0 {
        return 0.0;
    }
    churned_this_month as f64 / active_at_start_of_month as f64 * 100.0
}

/// Retention rate = 100 - churn rate, floored at 0.
pub fn retention_rate(churn_rate: f64) -> f64 {
    (100.0 - churn_rate).max(0.0)
}

/// Minimum member count whose revenue covers fixed costs.
/// Ceiling division: never under-counts. 0 when ARPM is 0.
pub fn break_even_members(total_fixed_costs: f64, arpm: f64) -> u32 {
    if arpm == 0.0 {
        return 0;
    }
    (total_fixed_costs / arpm).ceil() as u32
}

/// Revenue per square meter = MRR / studio area. 0 when area is 0.
pub fn revenue_per_sqm(mrr: f64, studio_area_sqm: f64) -> f64 {
    if studio_area_sqm == 0.0 {
        return 0.0;
    }
    mrr / studio_area_sqm
}

/// Month-over-month percentage change against a prior-period baseline.
/// 0 when the baseline is 0 (no signal reads as "no change").
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    (current - previous) / previous.abs() * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arpm_zero_members() {
        assert_eq!(arpm(5000.0, 0), 0.0);
    }

    #[test]
    fn test_arpm_unrounded() {
        let v = arpm(500.0, 3);
        assert!((v - 166.6666).abs() < 0.001, "arpm = {}", v);
    }

    #[test]
    fn test_cac_zero_members() {
        assert_eq!(cac(3000.0, 0), 0.0);
    }

    #[test]
    fn test_cac_division() {
        assert_eq!(cac(3000.0, 6), 500.0);
    }

    #[test]
    fn test_ltv_zero_factors() {
        assert_eq!(ltv(0.0, 8.0), 0.0);
        assert_eq!(ltv(250.0, 0.0), 0.0);
    }

    #[test]
    fn test_ltv_cac_ratio_zero_cac() {
        assert_eq!(ltv_cac_ratio(2000.0, 0.0), 0.0);
    }

    #[test]
    fn test_ltv_cac_ratio() {
        assert_eq!(ltv_cac_ratio(2000.0, 500.0), 4.0);
    }

    #[test]
    fn test_churn_rate_zero_base() {
        assert_eq!(churn_rate(5, 0), 0.0);
    }

    #[test]
    fn test_churn_rate_percentage() {
        assert_eq!(churn_rate(5, 100), 5.0);
    }

    #[test]
    fn test_retention_rate_complement() {
        assert_eq!(retention_rate(5.0), 95.0);
        assert_eq!(retention_rate(0.0), 100.0);
    }

    #[test]
    fn test_retention_rate_clamped_at_zero() {
        assert_eq!(retention_rate(130.0), 0.0);
        assert_eq!(retention_rate(100.0), 0.0);
    }

    #[test]
    fn test_break_even_members_ceiling() {
        // ceil(10000 / 333.33) = ceil(30.0003) = 31
        assert_eq!(break_even_members(10000.0, 333.33), 31);
        assert_eq!(break_even_members(10000.0, 500.0), 20);
    }

    #[test]
    fn test_break_even_members_zero_arpm() {
        assert_eq!(break_even_members(10000.0, 0.0), 0);
    }

    #[test]
    fn test_revenue_per_sqm() {
        assert_eq!(revenue_per_sqm(500.0, 50.0), 10.0);
        assert_eq!(revenue_per_sqm(500.0, 0.0), 0.0);
    }

    #[test]
    fn test_percent_change_zero_baseline() {
        assert_eq!(percent_change(1000.0, 0.0), 0.0);
    }

    #[test]
    fn test_percent_change_up_and_down() {
        assert_eq!(percent_change(150.0, 100.0), 50.0);
        assert_eq!(percent_change(70.0, 100.0), -30.0);
    }

    #[test]
    fn test_percent_change_negative_baseline_uses_magnitude() {
        // Loss of 1000 last month, profit of 500 now: +150% swing.
        assert_eq!(percent_change(500.0, -1000.0), 150.0);
    }
}
