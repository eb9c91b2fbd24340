//! Table-driven anomaly flags.
//!
//! The rule set is business policy and still evolving, so each rule is a
//! data row (metric name, tolerance, check) rather than a hard-coded
//! branch. A rule with no usable baseline is skipped, never an error:
//! the dashboard shows fewer flags, not a crash.

/// Current-period metrics plus the prior-month baseline the rules compare
/// against. `has_baseline` is false when no prior period was supplied.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnomalyContext {
    pub income_change: f64,
    pub expense_change: f64,
    pub net_profit: f64,
    pub prev_income: f64,
    pub prev_expenses: f64,
    pub prev_profit: f64,
    pub has_baseline: bool,
}

/// One monitored metric: emits a flag message when the divergence from
/// the baseline exceeds `tolerance`.
pub struct AnomalyRule {
    pub metric: &'static str,
    pub tolerance: f64,
    pub check: fn(&AnomalyContext, f64) -> Option<String>,
}

fn expense_spike(ctx: &AnomalyContext, tolerance: f64) -> Option<String> {
    if !ctx.has_baseline || ctx.prev_expenses <= 0.0 {
        return None;
    }
    if ctx.expense_change > tolerance {
        Some(format!(
            "הוצאות עלו ב-{}% מחודש קודם",
            ctx.expense_change.round() as i64
        ))
    } else {
        None
    }
}

fn income_drop(ctx: &AnomalyContext, tolerance: f64) -> Option<String> {
    if !ctx.has_baseline || ctx.prev_income <= 0.0 {
        return None;
    }
    if ctx.income_change < tolerance {
        Some(format!(
            "הכנסות ירדו ב-{}% מחודש קודם",
            (ctx.income_change.round() as i64).abs()
        ))
    } else {
        None
    }
}

fn profit_flip(ctx: &AnomalyContext, tolerance: f64) -> Option<String> {
    if !ctx.has_baseline || ctx.prev_profit <= 0.0 {
        return None;
    }
    if ctx.net_profit < tolerance {
        Some("החודש עברתם להפסד לראשונה".to_string())
    } else {
        None
    }
}

/// The current studio policy: expense spike over +50%, income drop below
/// -30%, and a month that flips from profit to loss.
pub fn default_rules() -> Vec<AnomalyRule> {
    vec![
        AnomalyRule { metric: "expense_change", tolerance: 50.0, check: expense_spike },
        AnomalyRule { metric: "income_change", tolerance: -30.0, check: income_drop },
        AnomalyRule { metric: "net_profit", tolerance: 0.0, check: profit_flip },
    ]
}

/// Run every rule against the context, collecting the flags that fire.
pub fn detect_anomalies(ctx: &AnomalyContext, rules: &[AnomalyRule]) -> Vec<String> {
    rules
        .iter()
        .filter_map(|r| (r.check)(ctx, r.tolerance))
        .collect()
}
