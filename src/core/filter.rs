use super::compliance::{AssessedRecord, Assessment};
use super::config::ComplianceConfig;
use std::collections::BTreeSet;

/// Records matching the configured unit, category and classification
/// filters. A filter on a column the sheet does not have is skipped.
pub fn apply<'a>(assessment: &'a Assessment, config: &ComplianceConfig) -> Vec<&'a AssessedRecord> {
    let unit = column_filter(assessment, &config.columns.unit, config.unit_filter.as_deref());
    let category = column_filter(
        assessment,
        &config.columns.category,
        config.category_filter.as_deref(),
    );

    let records: Vec<_> = assessment
        .records
        .iter()
        .filter(|r| unit.is_none_or(|(i, v)| r.record.cell(i) == v))
        .filter(|r| category.is_none_or(|(i, v)| r.record.cell(i) == v))
        .filter(|r| {
            config
                .classification_filter
                .is_none_or(|c| r.result.classification == c)
        })
        .collect();

    log::info!(
        "{} of {} record(s) match filters",
        records.len(),
        assessment.records.len()
    );
    records
}

fn column_filter<'v>(
    assessment: &Assessment,
    column: &str,
    value: Option<&'v str>,
) -> Option<(usize, &'v str)> {
    let value = value?;
    match assessment.layout.column_index(column) {
        Some(index) => Some((index, value.trim())),
        None => {
            log::warn!("Column '{}' not in sheet, ignoring filter '{}'", column, value);
            None
        }
    }
}

/// Sorted distinct non-empty values of a column, for filter pickers
pub fn distinct_values(assessment: &Assessment, column: &str) -> Vec<String> {
    let Some(index) = assessment.layout.column_index(column) else {
        return Vec::new();
    };
    assessment
        .records
        .iter()
        .map(|r| r.record.cell(index))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
