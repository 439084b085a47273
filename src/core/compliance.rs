use super::columns::SheetLayout;
use super::config::ComplianceConfig;
use super::record::{read_records, RegistrationDate, TaxpayerRecord};
use super::workbook::Sheet;
use chrono::Datelike;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use taxcomp_derive::OutputColumns;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ComplianceError {
    #[error("required column '{column}' is missing")]
    MissingColumn { column: String },
    #[error("column '{column}' appears more than once")]
    DuplicateColumn { column: String },
}

/// Rule used to turn a record's payments into a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum ClassificationPolicy {
    /// Thresholds on the compliance percentage: <= 33.333 low, <= 66.666 moderate
    #[default]
    Percentage,
    /// Thresholds on the raw paid month count: <= 4 low, <= 8 moderate
    PaidMonths,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum Classification {
    #[serde(rename = "Low Compliance")]
    LowCompliance,
    #[serde(rename = "Moderate Compliance")]
    ModerateCompliance,
    #[serde(rename = "Full Compliance")]
    FullCompliance,
}

impl Classification {
    pub const ALL: [Classification; 3] = [
        Classification::LowCompliance,
        Classification::ModerateCompliance,
        Classification::FullCompliance,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Classification::LowCompliance => "Low Compliance",
            Classification::ModerateCompliance => "Moderate Compliance",
            Classification::FullCompliance => "Full Compliance",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl ClassificationPolicy {
    pub fn classify(self, compliance_percent: Decimal, paid_months: u32) -> Classification {
        match self {
            ClassificationPolicy::Percentage => {
                if compliance_percent <= dec!(33.333) {
                    Classification::LowCompliance
                } else if compliance_percent <= dec!(66.666) {
                    Classification::ModerateCompliance
                } else {
                    Classification::FullCompliance
                }
            }
            ClassificationPolicy::PaidMonths => match paid_months {
                0..=4 => Classification::LowCompliance,
                5..=8 => Classification::ModerateCompliance,
                _ => Classification::FullCompliance,
            },
        }
    }
}

/// Column description produced by `#[derive(OutputColumns)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputColumn {
    pub label: &'static str,
    pub numeric: bool,
    pub description: &'static str,
}

/// Derived compliance figures for one taxpayer. Field order is the order of
/// the columns appended to exported sheets. Decimals serialize as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, OutputColumns)]
pub struct ComplianceResult {
    /// Sum of all monthly payments
    #[serde(rename = "Total Payment")]
    #[schemars(with = "String")]
    pub total_payment: Decimal,
    /// Months of the tax year the taxpayer was liable (0-12)
    #[serde(rename = "Active Months")]
    pub active_months: u32,
    /// Months with a payment greater than zero
    #[serde(rename = "Paid Months")]
    pub paid_months: u32,
    /// Total payment divided by paid months (or by 1 when nothing was paid)
    #[serde(rename = "Average Payment")]
    #[schemars(with = "String")]
    pub average_payment: Decimal,
    /// Paid months over active months (or over 1), times 100; may exceed 100
    #[serde(rename = "Compliance Percent")]
    #[schemars(with = "String")]
    pub compliance_percent: Decimal,
    /// Low, Moderate or Full Compliance
    #[serde(rename = "Compliance Classification")]
    pub classification: Classification,
}

/// A record together with its computed result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessedRecord {
    pub record: TaxpayerRecord,
    pub result: ComplianceResult,
}

/// Output of a compliance run over one sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub sheet_name: String,
    pub tax_year: i32,
    pub policy: ClassificationPolicy,
    pub layout: SheetLayout,
    pub records: Vec<AssessedRecord>,
}

/// Months of `tax_year` during which a taxpayer registered on `registration`
/// was liable, counting the registration month.
pub fn active_months(registration: &RegistrationDate, tax_year: i32) -> u32 {
    let Some(tmt) = registration.date() else {
        return 0;
    };
    match tmt.year().cmp(&tax_year) {
        std::cmp::Ordering::Less => 12,
        std::cmp::Ordering::Greater => 0,
        std::cmp::Ordering::Equal => 12 - tmt.month() + 1,
    }
}

/// Compute the compliance result for a single record
pub fn assess(
    record: &TaxpayerRecord,
    tax_year: i32,
    policy: ClassificationPolicy,
) -> ComplianceResult {
    let total_payment: Decimal = record.payments.iter().map(|p| p.amount).sum();
    let paid_months = record
        .payments
        .iter()
        .filter(|p| p.amount > Decimal::ZERO)
        .count() as u32;
    let active_months = active_months(&record.registration, tax_year);

    // zero denominators are replaced by 1
    let average_payment = total_payment / Decimal::from(paid_months.max(1));
    let compliance_percent =
        Decimal::from(paid_months) / Decimal::from(active_months.max(1)) * dec!(100);

    ComplianceResult {
        total_payment,
        active_months,
        paid_months,
        average_payment,
        compliance_percent,
        classification: policy.classify(compliance_percent, paid_months),
    }
}

/// Assess every record. Row order is preserved; results do not depend on it.
pub fn assess_records(
    records: Vec<TaxpayerRecord>,
    tax_year: i32,
    policy: ClassificationPolicy,
) -> Vec<AssessedRecord> {
    records
        .into_iter()
        .map(|record| {
            let result = assess(&record, tax_year, policy);
            log::debug!(
                "Row {}: active {}, paid {}, {:.2}% -> {}",
                record.row,
                result.active_months,
                result.paid_months,
                result.compliance_percent,
                result.classification
            );
            AssessedRecord { record, result }
        })
        .collect()
}

/// Run the compliance calculation over a sheet.
///
/// The header row is checked before any row is read: a sheet without a `TMT`
/// column fails with [`ComplianceError::MissingColumn`] and produces nothing.
pub fn compute(sheet: &Sheet, config: &ComplianceConfig) -> Result<Assessment, ComplianceError> {
    let layout = SheetLayout::detect(&sheet.headers)?;
    let records = read_records(sheet, &layout);

    log::info!(
        "Assessing {} record(s) from sheet '{}' for tax year {} ({:?} policy)",
        records.len(),
        sheet.name,
        config.tax_year,
        config.policy
    );

    let records = assess_records(records, config.tax_year, config.policy);

    Ok(Assessment {
        sheet_name: sheet.name.clone(),
        tax_year: config.tax_year,
        policy: config.policy,
        layout,
        records,
    })
}
