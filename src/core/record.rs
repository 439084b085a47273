use super::columns::{parse_date, SheetLayout};
use super::warnings::Warning;
use super::workbook::Sheet;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

/// Registration date (TMT) of a taxpayer, as read from the sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationDate {
    Known(NaiveDate),
    Missing,
    /// Cell had text that is not a date; keeps the raw value for reporting
    Unparseable(String),
}

impl RegistrationDate {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("nat") || raw.eq_ignore_ascii_case("nan") {
            return RegistrationDate::Missing;
        }
        match parse_date(raw) {
            Some(date) => RegistrationDate::Known(date),
            None => RegistrationDate::Unparseable(raw.to_string()),
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            RegistrationDate::Known(date) => Some(*date),
            RegistrationDate::Missing | RegistrationDate::Unparseable(_) => None,
        }
    }

    fn warning(&self) -> Option<Warning> {
        match self {
            RegistrationDate::Known(_) => None,
            RegistrationDate::Missing => Some(Warning::MissingRegistrationDate),
            RegistrationDate::Unparseable(value) => Some(Warning::UnparseableRegistrationDate {
                value: value.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyPayment {
    pub month: NaiveDate,
    pub amount: Decimal,
}

/// One taxpayer row with its cells kept verbatim for export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxpayerRecord {
    /// 1-based data row number (header excluded)
    pub row: usize,
    pub registration: RegistrationDate,
    pub payments: Vec<MonthlyPayment>,
    pub cells: Vec<String>,
    pub warnings: Vec<Warning>,
}

impl TaxpayerRecord {
    /// Trimmed value of a cell by column index; empty if out of range
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(|c| c.trim()).unwrap_or_default()
    }
}

/// Largest absolute amount accepted in a payment cell. Sums over any sheet
/// that fits in memory stay far below `Decimal::MAX`.
pub const MAX_PAYMENT: Decimal = dec!(1000000000000000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    NotANumber,
    OutOfRange,
}

/// Parse a payment amount. Empty cells are zero.
pub fn parse_amount(raw: &str) -> Result<Decimal, AmountError> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return Ok(Decimal::ZERO);
    }
    let amount = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| AmountError::NotANumber)?;
    if amount.abs() > MAX_PAYMENT {
        return Err(AmountError::OutOfRange);
    }
    Ok(amount)
}

/// Build typed records from a sheet using its detected layout
pub fn read_records(sheet: &Sheet, layout: &SheetLayout) -> Vec<TaxpayerRecord> {
    sheet
        .rows
        .iter()
        .enumerate()
        .map(|(i, cells)| {
            let mut warnings = Vec::new();

            let registration = RegistrationDate::parse(&cells[layout.registration]);
            if let Some(warning) = registration.warning() {
                log::debug!("Row {}: {}", i + 1, warning.message());
                warnings.push(warning);
            }

            let payments = layout
                .payments
                .iter()
                .map(|column| {
                    let raw = &cells[column.index];
                    let amount = parse_amount(raw).unwrap_or_else(|err| {
                        let warning = match err {
                            AmountError::NotANumber => Warning::NonNumericPayment {
                                column: column.label.clone(),
                                value: raw.trim().to_string(),
                            },
                            AmountError::OutOfRange => Warning::PaymentOutOfRange {
                                column: column.label.clone(),
                                value: raw.trim().to_string(),
                            },
                        };
                        log::warn!("Row {}: {}", i + 1, warning.message());
                        warnings.push(warning);
                        Decimal::ZERO
                    });
                    MonthlyPayment {
                        month: column.month,
                        amount,
                    }
                })
                .collect();

            TaxpayerRecord {
                row: i + 1,
                registration,
                payments,
                cells: cells.clone(),
                warnings,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(data: &str) -> Sheet {
        Sheet::read_csv("PEMECAHAN", data.as_bytes()).unwrap()
    }

    #[test]
    fn registration_date_variants() {
        assert_eq!(
            RegistrationDate::parse("2024-06-01"),
            RegistrationDate::Known(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
        );
        assert_eq!(RegistrationDate::parse("  "), RegistrationDate::Missing);
        assert_eq!(RegistrationDate::parse("NaT"), RegistrationDate::Missing);
        assert_eq!(
            RegistrationDate::parse("sejak dulu"),
            RegistrationDate::Unparseable("sejak dulu".to_string())
        );
        assert_eq!(RegistrationDate::parse("sejak dulu").date(), None);
    }

    #[test]
    fn parse_amounts() {
        assert_eq!(parse_amount(""), Ok(dec!(0)));
        assert_eq!(parse_amount("150000"), Ok(dec!(150000)));
        assert_eq!(parse_amount(" 2500.50 "), Ok(dec!(2500.50)));
        assert_eq!(parse_amount("1.5e3"), Ok(dec!(1500)));
        assert_eq!(parse_amount("-100"), Ok(dec!(-100)));
        assert_eq!(parse_amount("lunas"), Err(AmountError::NotANumber));
    }

    #[test]
    fn parse_amount_bounds() {
        assert_eq!(parse_amount("1000000000000000"), Ok(MAX_PAYMENT));
        assert_eq!(parse_amount("-1000000000000000"), Ok(-MAX_PAYMENT));
        assert_eq!(parse_amount("1000000000000001"), Err(AmountError::OutOfRange));
        assert_eq!(
            parse_amount("79228162514264337593543950335"),
            Err(AmountError::OutOfRange)
        );
        assert_eq!(parse_amount("1e20"), Err(AmountError::OutOfRange));
    }

    #[test]
    fn read_records_from_sheet() {
        let sheet = sheet(
            "Nama Op,TMT,2024-01-01,2024-02-01\n\
             Warung A,2023-05-10,100,\n\
             Toko B,,0,250\n",
        );
        let layout = SheetLayout::detect(&sheet.headers).unwrap();
        let records = read_records(&sheet, &layout);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].row, 1);
        assert_eq!(records[0].cell(0), "Warung A");
        assert_eq!(
            records[0].payments.iter().map(|p| p.amount).collect::<Vec<_>>(),
            vec![dec!(100), dec!(0)]
        );
        assert!(records[0].warnings.is_empty());

        assert_eq!(records[1].registration, RegistrationDate::Missing);
        assert_eq!(records[1].warnings, vec![Warning::MissingRegistrationDate]);
    }

    #[test]
    fn non_numeric_payment_counts_as_zero() {
        let sheet = sheet("TMT,2024-01-01,2024-02-01\n2022-01-01,lunas,300\n");
        let layout = SheetLayout::detect(&sheet.headers).unwrap();
        let records = read_records(&sheet, &layout);

        assert_eq!(records[0].payments[0].amount, dec!(0));
        assert_eq!(records[0].payments[1].amount, dec!(300));
        assert_eq!(
            records[0].warnings,
            vec![Warning::NonNumericPayment {
                column: "2024-01-01".to_string(),
                value: "lunas".to_string(),
            }]
        );
    }
}
