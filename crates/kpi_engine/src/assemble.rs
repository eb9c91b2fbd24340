use std::collections::HashMap;

use models::{
    ActiveSubscription, BillingSummary, BreakEvenKpis, FinancialKpis, KpiDashboardData,
    MarketingSpend, MemberChurnLog, MonthOverMonth, MonthlyExpense, Period, RetentionKpis,
    StudioSettings, Targets,
};

use crate::aggregate::{
    average_tenure_months, count_new_members, expense_breakdown, marketing_totals,
    sum_active_mrr, sum_expenses,
};
use crate::anomaly::{default_rules, detect_anomalies, AnomalyContext};
use crate::metrics;

/// Everything the assembler needs for one reporting month, fetched by the
/// caller up front. `prior_billing` is the previous month's synced totals
/// for the month-over-month deltas; `member_sparkline` arrives already in
/// temporal order and is stored verbatim.
#[derive(Debug, Clone)]
pub struct DashboardInputs<'a> {
    pub period: Period,
    pub active_subscriptions: &'a [ActiveSubscription],
    pub churn_log: &'a [MemberChurnLog],
    pub marketing_spend: &'a [MarketingSpend],
    pub expenses: &'a [MonthlyExpense],
    pub billing: Option<&'a BillingSummary>,
    pub prior_billing: Option<&'a BillingSummary>,
    pub settings: StudioSettings,
    pub config: &'a HashMap<String, String>,
    pub member_sparkline: Vec<u32>,
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Fold one month of raw records into a single dashboard snapshot.
///
/// Pure and idempotent: identical inputs produce identical output, and
/// every section falls back to the zero-sentinel policy instead of being
/// omitted when its raw data is missing.
pub fn assemble_dashboard(inputs: &DashboardInputs) -> KpiDashboardData {
    let subs = inputs.active_subscriptions;
    let period = inputs.period;

    // Financial
    let mrr = sum_active_mrr(subs);
    let active_members = subs.len();
    let arpm = metrics::arpm(mrr, active_members);

    let total_income = inputs.billing.map(|b| b.total_income).unwrap_or(0.0);
    let external_expenses = inputs.billing.map(|b| b.total_expenses).unwrap_or(0.0);

    let total_fixed_costs = sum_expenses(inputs.expenses, |e| e.is_fixed);
    let total_variable_costs = sum_expenses(inputs.expenses, |e| !e.is_fixed);
    let total_expenses = external_expenses + total_fixed_costs + total_variable_costs;
    let net_profit = total_income - total_expenses;

    let financial = FinancialKpis {
        mrr,
        active_members,
        arpm,
        total_income,
        total_expenses,
        net_profit,
        total_fixed_costs,
        total_variable_costs,
    };

    // Month-over-month against the prior month's synced totals. Expenses
    // compare on the external aggregate only: the prior month's manual
    // entries are not part of the assembler's inputs.
    let prev_income = inputs.prior_billing.map(|b| b.total_income).unwrap_or(0.0);
    let prev_expenses = inputs.prior_billing.map(|b| b.total_expenses).unwrap_or(0.0);
    let prev_profit = inputs.prior_billing.map(|b| b.net_profit).unwrap_or(0.0);

    let month_over_month = MonthOverMonth {
        income_change: metrics::percent_change(total_income, prev_income),
        expense_change: metrics::percent_change(external_expenses, prev_expenses),
        profit_change: metrics::percent_change(net_profit, prev_profit),
    };

    let anomaly_ctx = AnomalyContext {
        income_change: month_over_month.income_change,
        expense_change: month_over_month.expense_change,
        net_profit,
        prev_income,
        prev_expenses,
        prev_profit,
        has_baseline: inputs.prior_billing.is_some(),
    };
    let anomalies = detect_anomalies(&anomaly_ctx, &default_rules());

    // Retention
    let churned_this_month = inputs.churn_log.len();
    let new_members_this_month = count_new_members(subs, period);
    let active_at_start_of_month =
        (active_members + churned_this_month).saturating_sub(new_members_this_month);
    let churn_rate = metrics::churn_rate(churned_this_month, active_at_start_of_month);
    let retention_rate = metrics::retention_rate(churn_rate);

    // Tenure is anchored at the reporting month's end, not wall-clock now,
    // so re-running over historical data stays deterministic.
    let avg_tenure_months = average_tenure_months(subs, inputs.churn_log, period.end_date());

    let (marketing_spend_total, conversions) = marketing_totals(inputs.marketing_spend);
    let new_paying_members = if conversions > 0 {
        conversions
    } else {
        new_members_this_month as u32
    };
    let cac = metrics::cac(marketing_spend_total, new_paying_members);
    let ltv = metrics::ltv(arpm, avg_tenure_months);
    let ltv_cac_ratio = metrics::ltv_cac_ratio(ltv, cac);

    let retention = RetentionKpis {
        churn_rate,
        retention_rate,
        churned_this_month,
        active_at_start_of_month,
        avg_tenure_months: round1(avg_tenure_months),
        ltv,
        cac,
        ltv_cac_ratio,
        new_members_this_month,
    };

    // Break-even
    let break_even_members = metrics::break_even_members(total_fixed_costs, arpm);
    let revenue_per_sqm = metrics::revenue_per_sqm(mrr, inputs.settings.studio_area_sqm);
    let progress_percent = if break_even_members > 0 {
        active_members as f64 / break_even_members as f64 * 100.0
    } else if active_members > 0 {
        100.0
    } else {
        0.0
    };

    let break_even = BreakEvenKpis {
        break_even_members,
        break_even_revenue: total_fixed_costs,
        current_members: active_members,
        current_mrr: mrr,
        progress_percent,
        revenue_per_sqm,
        studio_area_sqm: inputs.settings.studio_area_sqm,
    };

    let income_by_payment_type = inputs
        .billing
        .map(|b| b.income_by_payment_type.clone())
        .unwrap_or_default();

    KpiDashboardData {
        period,
        financial,
        retention,
        break_even,
        targets: Targets {
            target_mrr: inputs.settings.target_mrr,
            target_members: inputs.settings.target_members,
        },
        config: inputs.config.clone(),
        expenses_by_category: expense_breakdown(inputs.expenses),
        income_by_payment_type,
        month_over_month,
        anomalies,
        member_sparkline: inputs.member_sparkline.clone(),
    }
}
