//! Validate command - surface data quality issues without producing the full table

use super::{format_percent, DatasetArgs};
use crate::core::{filter, Assessment, ComplianceConfig, REGISTRATION_COLUMN};
use clap::Args;
use rust_decimal_macros::dec;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    #[command(flatten)]
    dataset: DatasetArgs,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// A validation issue for output
#[derive(Debug, Clone, Serialize)]
struct ValidationIssue {
    #[serde(rename = "type")]
    issue_type: String,
    /// Data row number, absent for sheet-level issues
    #[serde(skip_serializing_if = "Option::is_none")]
    row: Option<usize>,
    message: String,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct ValidationOutput<'a> {
    sheet: &'a str,
    tax_year: i32,
    issue_count: usize,
    issues: &'a [ValidationIssue],
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let (config, assessment) = self.dataset.assess()?;
        let issues = collect_issues(&assessment, &config);

        if self.json {
            let output = ValidationOutput {
                sheet: &assessment.sheet_name,
                tax_year: assessment.tax_year,
                issue_count: issues.len(),
                issues: &issues,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_text(&assessment, &issues);
        }

        // Exit with code 1 if issues found
        if !issues.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }
}

fn collect_issues(assessment: &Assessment, config: &ComplianceConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if assessment.layout.payments.is_empty() {
        issues.push(ValidationIssue {
            issue_type: "NoPaymentColumns".to_string(),
            row: None,
            message: "No column header is a date - every row has zero payments".to_string(),
        });
    }

    for record in filter::apply(assessment, config) {
        for warning in &record.record.warnings {
            issues.push(ValidationIssue {
                issue_type: warning.kind().to_string(),
                row: Some(record.record.row),
                message: warning.message(),
            });
        }

        let result = &record.result;
        if result.compliance_percent > dec!(100) {
            issues.push(ValidationIssue {
                issue_type: "ComplianceAboveHundred".to_string(),
                row: Some(record.record.row),
                message: format!(
                    "{} paid months against {} active months ({}) - check {} or back-payments",
                    result.paid_months,
                    result.active_months,
                    format_percent(result.compliance_percent),
                    REGISTRATION_COLUMN
                ),
            });
        }
    }

    issues
}

fn print_text(assessment: &Assessment, issues: &[ValidationIssue]) {
    println!();
    println!(
        "VALIDATION RESULTS ({}, tax year {})",
        assessment.sheet_name, assessment.tax_year
    );
    println!();

    if issues.is_empty() {
        println!("\u{2713} No issues found.");
        return;
    }

    println!("\u{26A0} {} issue(s) found:", issues.len());
    println!();
    for (i, issue) in issues.iter().enumerate() {
        match issue.row {
            Some(row) => println!("  {}. [{}] Row {}", i + 1, issue.issue_type, row),
            None => println!("  {}. [{}]", i + 1, issue.issue_type),
        }
        println!("     {}", issue.message);
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{compute, Sheet};

    fn issues(data: &str) -> Vec<ValidationIssue> {
        let sheet = Sheet::read_csv("PEMECAHAN", data.as_bytes()).unwrap();
        let config = ComplianceConfig::default();
        let assessment = compute(&sheet, &config).unwrap();
        collect_issues(&assessment, &config)
    }

    #[test]
    fn clean_sheet_has_no_issues() {
        assert!(issues("TMT,2024-01-01\n2020-01-01,100\n").is_empty());
    }

    #[test]
    fn row_issues_reported() {
        let issues = issues(
            "TMT,2024-01-01,2024-02-01\n\
             ,100,100\n\
             kemarin,abc,0\n\
             2024-12-01,10,10\n",
        );
        let kinds: Vec<_> = issues
            .iter()
            .map(|i| (i.issue_type.as_str(), i.row))
            .collect();

        assert_eq!(
            kinds,
            vec![
                ("MissingRegistrationDate", Some(1)),
                ("ComplianceAboveHundred", Some(1)),
                ("UnparseableRegistrationDate", Some(2)),
                ("NonNumericPayment", Some(2)),
                ("ComplianceAboveHundred", Some(3)),
            ]
        );
    }

    #[test]
    fn sheet_without_payment_columns() {
        let issues = issues("TMT,Nama Op\n2020-01-01,Warung A\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, "NoPaymentColumns");
        assert_eq!(issues[0].row, None);
    }
}
