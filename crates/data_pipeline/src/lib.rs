use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use kpi_engine::{assemble_dashboard, member_sparkline, DashboardInputs};
use models::{
    ActiveSubscription, BillingSummary, KpiDashboardData, MarketingSpend, MemberChurnLog,
    MonthlyExpense, Period,
};

/// Trailing window for the member-count sparkline, in months.
const SPARKLINE_WINDOW: usize = 6;

/// One month of raw records, as fetched from the backing store into a
/// `YYYY_MM.json` document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyDocument {
    pub month: u32,
    pub year: i32,
    #[serde(default)]
    pub active_subscriptions: Vec<ActiveSubscription>,
    #[serde(default)]
    pub churn_log: Vec<MemberChurnLog>,
    #[serde(default)]
    pub marketing_spend: Vec<MarketingSpend>,
    #[serde(default)]
    pub expenses: Vec<MonthlyExpense>,
    #[serde(default)]
    pub billing: Option<BillingSummary>,
}

impl MonthlyDocument {
    pub fn period(&self) -> Period {
        Period::new(self.month, self.year)
    }
}

pub struct Config {
    pub input_dir: PathBuf,
    pub output_file: PathBuf,
    pub settings_file: Option<PathBuf>,
    /// Reporting month; None picks the latest document.
    pub period: Option<Period>,
    pub pretty: bool,
}

/// Main pipeline function: loads raw monthly documents, computes the KPI
/// snapshot for the requested period, and writes it as JSON.
pub fn run(cfg: Config) -> Result<()> {
    let config_entries = settings_loader::load_optional_config(cfg.settings_file.as_ref())?
        .unwrap_or_default();
    let config = settings_loader::config_map(&config_entries);
    let settings = settings_loader::studio_settings(&config);

    let mut docs = load_documents(&cfg.input_dir)?;
    if docs.is_empty() {
        return Err(anyhow!(
            "No monthly documents found in {}",
            cfg.input_dir.display()
        ));
    }
    // Sort by period ascending to ensure chronological order
    docs.sort_by_key(|d| d.period().ordinal());

    let period = match cfg.period {
        Some(p) => p,
        None => docs[docs.len() - 1].period(),
    };
    let current = find_document(&docs, period).ok_or_else(|| {
        anyhow!("No document for {:02}/{}", period.month, period.year)
    })?;
    let prior = find_document(&docs, period.prev());

    let sparkline =
        member_sparkline(&current.active_subscriptions, period, SPARKLINE_WINDOW);

    let inputs = DashboardInputs {
        period,
        active_subscriptions: &current.active_subscriptions,
        churn_log: &current.churn_log,
        marketing_spend: &current.marketing_spend,
        expenses: &current.expenses,
        billing: current.billing.as_ref(),
        prior_billing: prior.and_then(|d| d.billing.as_ref()),
        settings,
        config: &config,
        member_sparkline: sparkline,
    };
    let dashboard = assemble_dashboard(&inputs);

    write_dashboard_json(&dashboard, &cfg.output_file, cfg.pretty)?;
    Ok(())
}

/// Loads every `YYYY_MM.json` document from a directory. Other files are
/// skipped; documents that fail to parse are an error.
pub fn load_documents(dir: &Path) -> Result<Vec<MonthlyDocument>> {
    let mut docs = Vec::new();
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Reading input directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        // e.g. 2025_09.json
        if !name.ends_with(".json") || name.len() != 12 {
            continue;
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Reading {}", path.display()))?;
        let doc: MonthlyDocument = serde_json::from_str(&content)
            .with_context(|| format!("Parsing monthly document {}", path.display()))?;
        docs.push(doc);
    }
    Ok(docs)
}

/// Finds the document for an exact reporting month, if present.
pub fn find_document(docs: &[MonthlyDocument], period: Period) -> Option<&MonthlyDocument> {
    docs.iter().find(|d| d.period() == period)
}

pub fn write_dashboard_json(
    dashboard: &KpiDashboardData,
    out_path: &Path,
    pretty: bool,
) -> Result<()> {
    if let Some(parent) = out_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Creating {}", parent.display()))?;
        }
    }
    let json = if pretty {
        serde_json::to_string_pretty(dashboard)?
    } else {
        serde_json::to_string(dashboard)?
    };
    fs::write(out_path, json)
        .with_context(|| format!("Writing {}", out_path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(month: u32, year: i32) -> MonthlyDocument {
        MonthlyDocument {
            month,
            year,
            active_subscriptions: vec![],
            churn_log: vec![],
            marketing_spend: vec![],
            expenses: vec![],
            billing: None,
        }
    }

    #[test]
    fn test_find_document_exact_period() {
        let docs = vec![doc(8, 2025), doc(9, 2025)];
        assert!(find_document(&docs, Period::new(9, 2025)).is_some());
        assert!(find_document(&docs, Period::new(7, 2025)).is_none());
    }

    #[test]
    fn test_prior_period_across_year_boundary() {
        let docs = vec![doc(12, 2024), doc(1, 2025)];
        let current = Period::new(1, 2025);
        let prior = find_document(&docs, current.prev()).unwrap();
        assert_eq!(prior.period(), Period::new(12, 2024));
    }

    #[test]
    fn test_documents_sort_chronologically() {
        let mut docs = vec![doc(1, 2025), doc(11, 2024), doc(12, 2024)];
        docs.sort_by_key(|d| d.period().ordinal());
        let order: Vec<Period> = docs.iter().map(|d| d.period()).collect();
        assert_eq!(
            order,
            vec![Period::new(11, 2024), Period::new(12, 2024), Period::new(1, 2025)]
        );
    }

    #[test]
    fn test_monthly_document_parses_with_missing_sections() {
        let json = r#"{
            "month": 9,
            "year": 2025,
            "active_subscriptions": [
                { "price_per_month": 200.0, "start_date": "2025-07-15" },
                { "price_per_month": null }
            ],
            "billing": {
                "total_income": 42000,
                "total_expenses": 11000,
                "net_profit": 31000
            }
        }"#;
        let doc: MonthlyDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.period(), Period::new(9, 2025));
        assert_eq!(doc.active_subscriptions.len(), 2);
        assert_eq!(doc.active_subscriptions[1].price_per_month, None);
        assert!(doc.churn_log.is_empty());
        assert!(doc.expenses.is_empty());
        assert_eq!(doc.billing.as_ref().unwrap().total_income, 42000.0);
    }
}
