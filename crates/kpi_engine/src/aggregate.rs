use std::collections::HashMap;

use chrono::NaiveDate;
use models::{
    ActiveSubscription, MarketingSpend, MemberChurnLog, MonthlyExpense, Period,
    EXPENSE_CATEGORIES, OTHER_CATEGORY,
};

/// Average month length used to convert a tenure in days to months.
const DAYS_PER_MONTH: f64 = 30.44;

/// MRR = sum of monthly price over all active subscriptions.
/// A missing price counts as 0; an empty collection sums to 0.
pub fn sum_active_mrr(subs: &[ActiveSubscription]) -> f64 {
    subs.iter()
        .map(|s| s.price_per_month.unwrap_or(0.0))
        .sum()
}

/// Sum of `amount` over the expenses matching `pred`.
/// Used with `is_fixed` to split fixed from variable costs.
pub fn sum_expenses<F>(expenses: &[MonthlyExpense], pred: F) -> f64
where
    F: Fn(&MonthlyExpense) -> bool,
{
    expenses.iter().filter(|e| pred(e)).map(|e| e.amount).sum()
}

/// Generic grouping reducer: key -> summed value.
pub fn breakdown_by_key<T, K, V>(records: &[T], key_fn: K, value_fn: V) -> HashMap<String, f64>
where
    K: Fn(&T) -> String,
    V: Fn(&T) -> f64,
{
    let mut map: HashMap<String, f64> = HashMap::new();
    for r in records {
        *map.entry(key_fn(r)).or_insert(0.0) += value_fn(r);
    }
    map
}

/// Expense totals per category, seeded with every known category at 0 so
/// the breakdown is complete even for months with no activity. Records
/// with an empty or unknown category fold into the "אחר" bucket.
pub fn expense_breakdown(expenses: &[MonthlyExpense]) -> HashMap<String, f64> {
    let mut map: HashMap<String, f64> = EXPENSE_CATEGORIES
        .iter()
        .map(|c| (c.to_string(), 0.0))
        .collect();
    for e in expenses {
        let key = if EXPENSE_CATEGORIES.contains(&e.category.as_str()) {
            e.category.as_str()
        } else {
            OTHER_CATEGORY
        };
        *map.entry(key.to_string()).or_insert(0.0) += e.amount;
    }
    map
}

/// Total marketing spend and total reported conversions across channels.
pub fn marketing_totals(spends: &[MarketingSpend]) -> (f64, u32) {
    let total_spend = spends.iter().map(|m| m.amount).sum();
    let conversions = spends.iter().map(|m| m.conversions).sum();
    (total_spend, conversions)
}

/// Mean membership tenure in months as of `as_of`.
///
/// Primary source: months elapsed since `start_date` over the active
/// subscriptions that carry one (negative spans clamp to 0). When no
/// active subscription has a start date, falls back to the churn log's
/// reported `months_subscribed` mean. Both empty -> 0.
pub fn average_tenure_months(
    subs: &[ActiveSubscription],
    churn: &[MemberChurnLog],
    as_of: NaiveDate,
) -> f64 {
    let dated: Vec<NaiveDate> = subs.iter().filter_map(|s| s.start_date).collect();
    if !dated.is_empty() {
        let total: f64 = dated
            .iter()
            .map(|start| {
                let days = (as_of - *start).num_days() as f64;
                (days / DAYS_PER_MONTH).max(0.0)
            })
            .sum();
        return total / dated.len() as f64;
    }
    if !churn.is_empty() {
        let total: f64 = churn.iter().map(|c| c.months_subscribed).sum();
        return total / churn.len() as f64;
    }
    0.0
}

/// Subscriptions whose start date falls inside the reporting month.
pub fn count_new_members(subs: &[ActiveSubscription], period: Period) -> usize {
    let start = period.start_date();
    let end = period.end_date();
    subs.iter()
        .filter_map(|s| s.start_date)
        .filter(|d| *d >= start && *d <= end)
        .count()
}

/// Active-member counts over the trailing `window` months ending at
/// `period`, oldest first. Each point counts the subscriptions started on
/// or before that month's end.
pub fn member_sparkline(subs: &[ActiveSubscription], period: Period, window: usize) -> Vec<u32> {
    let mut points = Vec::with_capacity(window);
    let mut months = Vec::with_capacity(window);
    let mut p = period;
    for _ in 0..window {
        months.push(p);
        p = p.prev();
    }
    months.reverse();
    for m in months {
        let end = m.end_date();
        let count = subs
            .iter()
            .filter(|s| s.start_date.map(|d| d <= end).unwrap_or(false))
            .count();
        points.push(count as u32);
    }
    points
}
