//! Summary command - classification distribution, monthly trend and top taxpayers

use super::{format_amount, DatasetArgs};
use crate::core::{filter, Assessment, ComplianceConfig, Summary, DEFAULT_TOP_TAXPAYERS};
use clap::Args;
use serde::Serialize;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct SummaryCommand {
    #[command(flatten)]
    dataset: DatasetArgs,

    /// Number of taxpayers in the top list
    #[arg(short, long, default_value_t = DEFAULT_TOP_TAXPAYERS)]
    top: usize,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// Summary data for JSON output
#[derive(Debug, Serialize)]
struct SummaryData<'a> {
    sheet: &'a str,
    tax_year: i32,
    policy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
    #[serde(flatten)]
    summary: &'a Summary,
}

#[derive(Tabled)]
struct DistributionRow {
    #[tabled(rename = "Classification")]
    classification: String,
    #[tabled(rename = "Taxpayers")]
    count: usize,
    #[tabled(rename = "Share")]
    share: String,
}

#[derive(Tabled)]
struct MonthRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Total Payment")]
    total: String,
}

#[derive(Tabled)]
struct TaxpayerRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Taxpayer")]
    name: String,
    #[tabled(rename = "Total Payment")]
    total: String,
}

impl SummaryCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let (config, assessment) = self.dataset.assess()?;
        let records = filter::apply(&assessment, &config);
        let summary = Summary::build(
            &records,
            &assessment.layout,
            &config.columns.taxpayer,
            self.top,
        );

        if self.json {
            let data = SummaryData {
                sheet: &assessment.sheet_name,
                tax_year: assessment.tax_year,
                policy: format!("{:?}", assessment.policy),
                unit: config.unit_filter.as_deref(),
                category: config.category_filter.as_deref(),
                summary: &summary,
            };
            println!("{}", serde_json::to_string_pretty(&data)?);
        } else {
            self.print_summary(&assessment, &config, &summary);
        }
        Ok(())
    }

    fn print_summary(&self, assessment: &Assessment, config: &ComplianceConfig, summary: &Summary) {
        println!();
        println!(
            "COMPLIANCE SUMMARY ({}, tax year {}, {:?} policy)",
            assessment.sheet_name, assessment.tax_year, assessment.policy
        );
        if let Some(ref unit) = config.unit_filter {
            println!("  Unit: {}", unit);
        }
        if let Some(ref category) = config.category_filter {
            println!("  Category: {}", category);
        }
        println!(
            "  Taxpayers: {} | Total Payment: {}",
            summary.taxpayer_count,
            format_amount(summary.total_payment)
        );
        println!();

        println!("DISTRIBUTION");
        let rows: Vec<_> = summary
            .distribution
            .iter()
            .map(|d| DistributionRow {
                classification: d.classification.to_string(),
                count: d.count,
                share: share(d.count, summary.taxpayer_count),
            })
            .collect();
        print_table(&rows);

        println!("MONTHLY PAYMENTS");
        if summary.monthly.is_empty() {
            println!("  No payment columns in sheet");
            println!();
        } else {
            let rows: Vec<_> = summary
                .monthly
                .iter()
                .map(|m| MonthRow {
                    month: m.month.format("%Y-%m").to_string(),
                    total: format_amount(m.total),
                })
                .collect();
            print_table(&rows);
        }

        println!("TOP {} TAXPAYERS", self.top);
        if summary.top_taxpayers.is_empty() {
            println!("  No taxpayer names in '{}'", config.columns.taxpayer);
            println!();
        } else {
            let rows: Vec<_> = summary
                .top_taxpayers
                .iter()
                .enumerate()
                .map(|(i, t)| TaxpayerRow {
                    rank: i + 1,
                    name: t.name.clone(),
                    total: format_amount(t.total),
                })
                .collect();
            print_table(&rows);
        }
    }
}

fn print_table<T: Tabled>(rows: &[T]) {
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
    println!();
}

fn share(count: usize, total: usize) -> String {
    if total == 0 {
        return "-".to_string();
    }
    format!("{:.1}%", count as f64 / total as f64 * 100.0)
}
