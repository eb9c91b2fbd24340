use anyhow::{anyhow, Context, Result};
use clap::Parser;
use data_pipeline::{run, Config};
use models::Period;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "generate-dashboard",
    about = "Compute the studio KPI dashboard snapshot from monthly record documents."
)]
struct Args {
    /// Directory of YYYY_MM.json monthly documents
    #[arg(short, long, default_value = "database")]
    input: PathBuf,

    /// Output path for the snapshot JSON
    #[arg(short, long, default_value = "dashboard/kpi_dashboard.json")]
    out: PathBuf,

    /// Studio config rows JSON (key/value entries)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Reporting month as YYYY-MM; defaults to the latest document
    #[arg(short, long)]
    month: Option<String>,

    /// Pretty-print the output JSON
    #[arg(long, default_value_t = true)]
    pretty: bool,
}

fn parse_period(s: &str) -> Result<Period> {
    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() != 2 {
        return Err(anyhow!("invalid month format: {} (expected YYYY-MM)", s));
    }
    let year: i32 = parts[0].parse().map_err(|_| anyhow!("invalid year in {}", s))?;
    let month: u32 = parts[1].parse().map_err(|_| anyhow!("invalid month in {}", s))?;
    if !(1..=12).contains(&month) {
        return Err(anyhow!("month out of range in {}", s));
    }
    Ok(Period::new(month, year))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let period = args.month.as_deref().map(parse_period).transpose()?;

    println!(
        "Generating KPI dashboard...\n  input   : {}\n  settings: {}\n  output  : {}",
        args.input.display(),
        args.settings
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string()),
        args.out.display()
    );

    run(Config {
        input_dir: args.input,
        output_file: args.out.clone(),
        settings_file: args.settings,
        period,
        pretty: args.pretty,
    })
    .context("generate dashboard")?;

    println!("Done. Snapshot written to {}", args.out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_period_valid() {
        assert_eq!(parse_period("2025-09").unwrap(), Period::new(9, 2025));
        assert_eq!(parse_period("2024-12").unwrap(), Period::new(12, 2024));
    }

    #[test]
    fn test_parse_period_invalid() {
        assert!(parse_period("2025").is_err());
        assert!(parse_period("2025-13").is_err());
        assert!(parse_period("sept-2025").is_err());
    }
}
