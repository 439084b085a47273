use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Per-row data quality issues. None of these abort a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Warning {
    /// Registration date cell is empty; the row counts zero active months.
    MissingRegistrationDate,
    /// Registration date is not a valid date; the row counts zero active months.
    UnparseableRegistrationDate { value: String },
    /// Payment cell is not a number and was counted as zero.
    NonNumericPayment { column: String, value: String },
    /// Payment cell is a number beyond the accepted range and was counted as zero.
    PaymentOutOfRange { column: String, value: String },
}

impl Warning {
    pub fn kind(&self) -> &'static str {
        match self {
            Warning::MissingRegistrationDate => "MissingRegistrationDate",
            Warning::UnparseableRegistrationDate { .. } => "UnparseableRegistrationDate",
            Warning::NonNumericPayment { .. } => "NonNumericPayment",
            Warning::PaymentOutOfRange { .. } => "PaymentOutOfRange",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Warning::MissingRegistrationDate => {
                "TMT is empty - counted as 0 active months".to_string()
            }
            Warning::UnparseableRegistrationDate { value } => {
                format!("TMT '{}' is not a date - counted as 0 active months", value)
            }
            Warning::NonNumericPayment { column, value } => {
                format!("Payment '{}' in column {} is not a number - counted as 0", value, column)
            }
            Warning::PaymentOutOfRange { column, value } => {
                format!("Payment '{}' in column {} is out of range - counted as 0", value, column)
            }
        }
    }
}
