//! Export of assessed sheets: original columns verbatim, derived columns appended

use crate::core::{AssessedRecord, ComplianceResult, SheetLayout};
use std::io::Write;

/// Header row of an exported sheet
pub fn export_headers(layout: &SheetLayout) -> Vec<String> {
    layout
        .headers
        .iter()
        .cloned()
        .chain(
            ComplianceResult::output_columns()
                .iter()
                .map(|c| c.label.to_string()),
        )
        .collect()
}

/// Derived values in output column order, unrounded
pub fn result_values(result: &ComplianceResult) -> [String; 6] {
    [
        result.total_payment.normalize().to_string(),
        result.active_months.to_string(),
        result.paid_months.to_string(),
        result.average_payment.normalize().to_string(),
        result.compliance_percent.normalize().to_string(),
        result.classification.label().to_string(),
    ]
}

pub fn export_row(record: &AssessedRecord) -> Vec<String> {
    record
        .record
        .cells
        .iter()
        .cloned()
        .chain(result_values(&record.result))
        .collect()
}

/// Write assessed records as CSV
pub fn write_csv<W: Write>(
    layout: &SheetLayout,
    records: &[&AssessedRecord],
    writer: W,
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(export_headers(layout))?;
    for record in records {
        wtr.write_record(export_row(record))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Assessed records as JSON objects keyed by column label. A repeated
/// header keeps the value of its first column.
pub fn to_json_rows(
    layout: &SheetLayout,
    records: &[&AssessedRecord],
) -> anyhow::Result<Vec<serde_json::Map<String, serde_json::Value>>> {
    records
        .iter()
        .map(|record| {
            let mut row = serde_json::Map::new();
            for (header, cell) in layout.headers.iter().zip(&record.record.cells) {
                row.entry(header.clone())
                    .or_insert_with(|| serde_json::Value::String(cell.clone()));
            }
            if let serde_json::Value::Object(derived) = serde_json::to_value(&record.result)? {
                row.extend(derived);
            }
            Ok(row)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{compute, ComplianceConfig, Sheet};

    fn export(data: &str) -> String {
        let sheet = Sheet::read_csv("PEMECAHAN", data.as_bytes()).unwrap();
        let assessment = compute(&sheet, &ComplianceConfig::default()).unwrap();
        let records: Vec<_> = assessment.records.iter().collect();

        let mut out = Vec::new();
        write_csv(&assessment.layout, &records, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn appends_derived_columns() {
        let out = export("Nama Op,TMT,2024-01-01,2024-02-01\nWarung A,2024-11-20,\"1,000\",250.50\n");
        let lines: Vec<_> = out.lines().collect();

        assert_eq!(
            lines[0],
            "Nama Op,TMT,2024-01-01,2024-02-01,Total Payment,Active Months,Paid Months,\
             Average Payment,Compliance Percent,Compliance Classification"
        );
        // "1,000" is not a number: kept verbatim, counted as zero
        assert_eq!(
            lines[1],
            "Warung A,2024-11-20,\"1,000\",250.50,250.5,2,1,250.5,50,Moderate Compliance"
        );
    }

    #[test]
    fn percent_is_not_rounded() {
        let out = export("TMT,2024-01-01\n2024-10-01,5\n");
        let row = out.lines().nth(1).unwrap();

        // 1 of 3 active months
        assert!(row.contains(",33.333333333333333333333333"), "{row}");
        assert!(row.ends_with("Moderate Compliance"));
    }

    #[test]
    fn repeated_headers_exported_by_position() {
        let out = export("Keterangan,TMT,Keterangan,2024-01-01\na,2023-01-01,b,100\n");
        let lines: Vec<_> = out.lines().collect();

        assert!(lines[0].starts_with("Keterangan,TMT,Keterangan,2024-01-01,Total Payment"));
        assert!(lines[1].starts_with("a,2023-01-01,b,100,100,12,1,100,8.33"), "{}", lines[1]);
        assert!(lines[1].ends_with(",Low Compliance"));
    }

    #[test]
    fn json_rows_keep_first_repeated_header() {
        let sheet = Sheet::read_csv(
            "s",
            "Keterangan,TMT,Keterangan\na,2023-01-01,b\n".as_bytes(),
        )
        .unwrap();
        let assessment = compute(&sheet, &ComplianceConfig::default()).unwrap();
        let records: Vec<_> = assessment.records.iter().collect();

        let rows = to_json_rows(&assessment.layout, &records).unwrap();
        assert_eq!(rows[0]["Keterangan"], "a");
        assert_eq!(rows[0]["TMT"], "2023-01-01");
    }

    #[test]
    fn json_rows_keep_original_cells() {
        let sheet =
            Sheet::read_csv("s", "Nama Op,TMT,2024-01-01\nWarung A,2023-01-01,100\n".as_bytes())
                .unwrap();
        let assessment = compute(&sheet, &ComplianceConfig::default()).unwrap();
        let records: Vec<_> = assessment.records.iter().collect();

        let rows = to_json_rows(&assessment.layout, &records).unwrap();
        assert_eq!(rows[0]["Nama Op"], "Warung A");
        assert_eq!(rows[0]["2024-01-01"], "100");
        assert_eq!(rows[0]["Active Months"], 12);
        assert_eq!(rows[0]["Compliance Classification"], "Low Compliance");
    }
}
