use super::compliance::{Classification, ClassificationPolicy};

pub const DEFAULT_TAX_YEAR: i32 = 2024;

/// Names of the descriptive columns used for filtering and grouping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    /// Regional tax office unit (UPPPD)
    pub unit: String,
    /// Tax category
    pub category: String,
    /// Taxpayer (tax object) name
    pub taxpayer: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        ColumnNames {
            unit: "Nm Unit".to_string(),
            category: "KLASIFIKASI".to_string(),
            taxpayer: "Nama Op".to_string(),
        }
    }
}

/// Parameters of one compliance run. Everything the calculation and the
/// views built on it need is passed in here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceConfig {
    pub tax_year: i32,
    /// Sheet to read; the first sheet when unset
    pub sheet_name: Option<String>,
    pub unit_filter: Option<String>,
    pub category_filter: Option<String>,
    pub classification_filter: Option<Classification>,
    pub policy: ClassificationPolicy,
    pub columns: ColumnNames,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        ComplianceConfig {
            tax_year: DEFAULT_TAX_YEAR,
            sheet_name: None,
            unit_filter: None,
            category_filter: None,
            classification_filter: None,
            policy: ClassificationPolicy::default(),
            columns: ColumnNames::default(),
        }
    }
}
