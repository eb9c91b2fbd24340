use serde::{Deserialize, Serialize};

/// Three-level health classification for a KPI against its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiStatus {
    Good,
    Warning,
    Bad,
}

/// Classify `current` against `target`.
///
/// A target of 0 means no target is defined, which always reads as
/// `Good` (nothing to compare against). With `inverted_logic` the metric
/// is lower-is-better (churn, CAC) and `target` acts as a ceiling with a
/// 10% warning band; otherwise higher-is-better with a 90% warning band.
pub fn kpi_status(current: f64, target: f64, inverted_logic: bool) -> KpiStatus {
    if target == 0.0 {
        return KpiStatus::Good;
    }

    if inverted_logic {
        if current <= target {
            return KpiStatus::Good;
        }
        if current <= target * 1.1 {
            return KpiStatus::Warning;
        }
        return KpiStatus::Bad;
    }

    let ratio = current / target;
    if ratio >= 1.0 {
        KpiStatus::Good
    } else if ratio >= 0.9 {
        KpiStatus::Warning
    } else {
        KpiStatus::Bad
    }
}
