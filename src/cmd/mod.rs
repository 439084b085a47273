pub mod compute;
pub mod dashboard;
pub mod schema;
pub mod sheets;
pub mod summary;
pub mod validate;

use crate::core::{
    compute, Assessment, Classification, ClassificationPolicy, ColumnNames, ComplianceConfig,
    Workbook, DEFAULT_TAX_YEAR,
};
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Options shared by every command that assesses a sheet
#[derive(Args, Debug, Clone)]
pub struct DatasetArgs {
    /// CSV file, or directory of CSV files (one sheet per file)
    #[arg(short, long)]
    file: PathBuf,

    /// Sheet name (defaults to the first sheet)
    #[arg(short, long)]
    sheet: Option<String>,

    /// Tax year
    #[arg(short, long, default_value_t = DEFAULT_TAX_YEAR, value_parser = clap::value_parser!(i32).range(2000..=2100))]
    year: i32,

    /// Classification policy
    #[arg(short, long, value_enum, default_value_t = PolicyArg::Percentage)]
    policy: PolicyArg,

    /// Only include rows with this unit (UPPPD)
    #[arg(short, long)]
    unit: Option<String>,

    /// Only include rows with this tax category
    #[arg(short, long)]
    category: Option<String>,

    /// Only include rows with this compliance classification
    #[arg(long, value_enum)]
    classification: Option<ClassificationArg>,

    /// Column holding the unit name
    #[arg(long, default_value = "Nm Unit")]
    unit_column: String,

    /// Column holding the tax category
    #[arg(long, default_value = "KLASIFIKASI")]
    category_column: String,

    /// Column holding the taxpayer name
    #[arg(long, default_value = "Nama Op")]
    taxpayer_column: String,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum PolicyArg {
    /// Thresholds on compliance percentage (33.333 / 66.666)
    #[default]
    Percentage,
    /// Thresholds on paid month count (4 / 8)
    PaidMonths,
}

impl From<PolicyArg> for ClassificationPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Percentage => ClassificationPolicy::Percentage,
            PolicyArg::PaidMonths => ClassificationPolicy::PaidMonths,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ClassificationArg {
    Low,
    Moderate,
    Full,
}

impl From<ClassificationArg> for Classification {
    fn from(arg: ClassificationArg) -> Self {
        match arg {
            ClassificationArg::Low => Classification::LowCompliance,
            ClassificationArg::Moderate => Classification::ModerateCompliance,
            ClassificationArg::Full => Classification::FullCompliance,
        }
    }
}

impl DatasetArgs {
    pub fn config(&self) -> ComplianceConfig {
        ComplianceConfig {
            tax_year: self.year,
            sheet_name: self.sheet.clone(),
            unit_filter: self.unit.clone(),
            category_filter: self.category.clone(),
            classification_filter: self.classification.map(Into::into),
            policy: self.policy.into(),
            columns: ColumnNames {
                unit: self.unit_column.clone(),
                category: self.category_column.clone(),
                taxpayer: self.taxpayer_column.clone(),
            },
        }
    }

    /// Open the workbook, select the sheet and run the compliance calculation
    pub fn assess(&self) -> anyhow::Result<(ComplianceConfig, Assessment)> {
        let config = self.config();
        let workbook = Workbook::open(&self.file)?;
        let sheet = workbook.sheet(config.sheet_name.as_deref())?;
        let assessment = compute(sheet, &config)?;
        Ok((config, assessment))
    }
}

fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

fn format_percent(percent: Decimal) -> String {
    format!("{:.2}%", percent)
}
