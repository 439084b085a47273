use super::columns::SheetLayout;
use super::compliance::{AssessedRecord, Classification};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

pub const DEFAULT_TOP_TAXPAYERS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationCount {
    pub classification: Classification,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTotal {
    pub month: NaiveDate,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxpayerTotal {
    pub name: String,
    pub total: Decimal,
}

/// Aggregates behind the dashboard charts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub taxpayer_count: usize,
    pub total_payment: Decimal,
    /// Every classification, including those with no records
    pub distribution: Vec<ClassificationCount>,
    /// Sum per payment column, in month order
    pub monthly: Vec<MonthlyTotal>,
    /// Largest totals grouped by taxpayer name, descending
    pub top_taxpayers: Vec<TaxpayerTotal>,
}

impl Summary {
    /// Summarise records. `taxpayer_column` names the column used to group
    /// the top taxpayers; when the sheet lacks it that list is empty.
    pub fn build(
        records: &[&AssessedRecord],
        layout: &SheetLayout,
        taxpayer_column: &str,
        top: usize,
    ) -> Self {
        let total_payment = records.iter().map(|r| r.result.total_payment).sum();

        let distribution = Classification::ALL
            .iter()
            .map(|&classification| ClassificationCount {
                classification,
                count: records
                    .iter()
                    .filter(|r| r.result.classification == classification)
                    .count(),
            })
            .collect();

        // columns with the same month are combined
        let mut by_month: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
        for record in records {
            for payment in &record.record.payments {
                *by_month.entry(payment.month).or_default() += payment.amount;
            }
        }
        if records.is_empty() {
            for column in &layout.payments {
                by_month.entry(column.month).or_default();
            }
        }
        let monthly = by_month
            .into_iter()
            .map(|(month, total)| MonthlyTotal { month, total })
            .collect();

        let top_taxpayers = match layout.column_index(taxpayer_column) {
            Some(index) => top_totals(records, index, top),
            None => {
                log::warn!("Column '{}' not in sheet, no top taxpayers", taxpayer_column);
                Vec::new()
            }
        };

        Summary {
            taxpayer_count: records.len(),
            total_payment,
            distribution,
            monthly,
            top_taxpayers,
        }
    }
}

fn top_totals(records: &[&AssessedRecord], name_index: usize, top: usize) -> Vec<TaxpayerTotal> {
    let mut totals: HashMap<&str, Decimal> = HashMap::new();
    for record in records {
        let name = record.record.cell(name_index);
        if name.is_empty() {
            continue;
        }
        *totals.entry(name).or_default() += record.result.total_payment;
    }

    let mut totals: Vec<TaxpayerTotal> = totals
        .into_iter()
        .map(|(name, total)| TaxpayerTotal {
            name: name.to_string(),
            total,
        })
        .collect();
    totals.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
    totals.truncate(top);
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compliance::{compute, Assessment};
    use crate::core::config::ComplianceConfig;
    use crate::core::workbook::Sheet;
    use rust_decimal_macros::dec;

    fn assessment() -> Assessment {
        let sheet = Sheet::read_csv(
            "PEMECAHAN",
            "Nama Op,TMT,2024-02-01,2024-01-01\n\
             Warung A,2020-01-01,100,200\n\
             Warung A,2020-01-01,50,0\n\
             Toko B,2020-01-01,0,0\n\
             ,2020-01-01,10,10\n\
             Hotel C,2020-01-01,500,500\n"
                .as_bytes(),
        )
        .unwrap();
        compute(&sheet, &ComplianceConfig::default()).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn distribution_covers_all_classes() {
        let assessment = assessment();
        let records: Vec<_> = assessment.records.iter().collect();
        let summary = Summary::build(&records, &assessment.layout, "Nama Op", 20);

        // every row has at most 2 of 12 months paid
        assert_eq!(summary.taxpayer_count, 5);
        assert_eq!(summary.distribution[0].count, 5);
        assert_eq!(summary.distribution[1].count, 0);
        assert_eq!(summary.distribution[2].count, 0);
        assert_eq!(summary.total_payment, dec!(1370));
    }

    #[test]
    fn monthly_totals_sorted_by_month() {
        let assessment = assessment();
        let records: Vec<_> = assessment.records.iter().collect();
        let summary = Summary::build(&records, &assessment.layout, "Nama Op", 20);

        assert_eq!(
            summary.monthly,
            vec![
                MonthlyTotal {
                    month: ymd(2024, 1, 1),
                    total: dec!(710)
                },
                MonthlyTotal {
                    month: ymd(2024, 2, 1),
                    total: dec!(660)
                },
            ]
        );
    }

    #[test]
    fn top_taxpayers_grouped_by_name() {
        let assessment = assessment();
        let records: Vec<_> = assessment.records.iter().collect();
        let summary = Summary::build(&records, &assessment.layout, "Nama Op", 2);

        assert_eq!(
            summary.top_taxpayers,
            vec![
                TaxpayerTotal {
                    name: "Hotel C".to_string(),
                    total: dec!(1000)
                },
                TaxpayerTotal {
                    name: "Warung A".to_string(),
                    total: dec!(350)
                },
            ]
        );
    }

    #[test]
    fn empty_selection_keeps_months() {
        let assessment = assessment();
        let summary = Summary::build(&[], &assessment.layout, "Nama Op", 20);

        assert_eq!(summary.taxpayer_count, 0);
        assert_eq!(summary.monthly.len(), 2);
        assert!(summary.monthly.iter().all(|m| m.total.is_zero()));
        assert!(summary.top_taxpayers.is_empty());
    }

    #[test]
    fn largest_accepted_payments_sum_without_overflow() {
        let sheet = Sheet::read_csv(
            "PEMECAHAN",
            "Nama Op,TMT,2024-01-01,2024-02-01\n\
             Hotel C,2020-01-01,1000000000000000,1000000000000000\n\
             Hotel C,2020-01-01,1000000000000000,1000000000000000\n"
                .as_bytes(),
        )
        .unwrap();
        let assessment = compute(&sheet, &ComplianceConfig::default()).unwrap();
        let records: Vec<_> = assessment.records.iter().collect();
        let summary = Summary::build(&records, &assessment.layout, "Nama Op", 20);

        assert_eq!(summary.total_payment, dec!(4000000000000000));
        assert_eq!(summary.monthly[0].total, dec!(2000000000000000));
        assert_eq!(summary.top_taxpayers[0].total, dec!(4000000000000000));
    }

    #[test]
    fn missing_name_column_gives_no_top_list() {
        let assessment = assessment();
        let records: Vec<_> = assessment.records.iter().collect();
        let summary = Summary::build(&records, &assessment.layout, "Nama WP", 20);

        assert!(summary.top_taxpayers.is_empty());
    }
}
