pub mod columns;
pub mod compliance;
pub mod config;
pub mod filter;
pub mod record;
pub mod summary;
pub mod warnings;
pub mod workbook;

// Flat public surface for domain types and functions.
pub use columns::{SheetLayout, REGISTRATION_COLUMN};
pub use compliance::{
    compute, AssessedRecord, Assessment, Classification, ClassificationPolicy, ComplianceResult,
};
pub use config::{ColumnNames, ComplianceConfig, DEFAULT_TAX_YEAR};
pub use summary::{Summary, DEFAULT_TOP_TAXPAYERS};
pub use workbook::{Sheet, Workbook};
