use super::compliance::ComplianceError;
use chrono::{NaiveDate, NaiveDateTime};

/// Header of the required registration date column
pub const REGISTRATION_COLUMN: &str = "TMT";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a calendar date from a header or cell.
///
/// Accepts date-only, datetime (time is discarded) and year-month (`2024-03`,
/// taken as the first of the month) forms.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").ok()
}

/// Role of a column in a taxpayer sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Registration,
    /// One month's payment; the header is the month
    Payment(NaiveDate),
    /// Free-form attribute passed through untouched
    Descriptive,
}

pub fn classify_header(header: &str) -> ColumnKind {
    if header == REGISTRATION_COLUMN {
        ColumnKind::Registration
    } else if let Some(month) = parse_date(header) {
        ColumnKind::Payment(month)
    } else {
        ColumnKind::Descriptive
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentColumn {
    pub index: usize,
    pub label: String,
    pub month: NaiveDate,
}

/// Typed view of a sheet's header row, produced once at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    pub headers: Vec<String>,
    pub registration: usize,
    /// Payment columns in the order they appear in the sheet
    pub payments: Vec<PaymentColumn>,
    pub descriptive: Vec<usize>,
}

impl SheetLayout {
    /// Classify every header. Fails if the registration column is absent or
    /// repeated; other repeated headers are classified like any column.
    pub fn detect(headers: &[String]) -> Result<Self, ComplianceError> {
        let mut registration = None;
        let mut payments = Vec::new();
        let mut descriptive = Vec::new();

        for (index, header) in headers.iter().enumerate() {
            match classify_header(header) {
                ColumnKind::Registration if registration.is_some() => {
                    return Err(ComplianceError::DuplicateColumn {
                        column: REGISTRATION_COLUMN.to_string(),
                    })
                }
                ColumnKind::Registration => registration = Some(index),
                ColumnKind::Descriptive => descriptive.push(index),
                ColumnKind::Payment(month) => payments.push(PaymentColumn {
                    index,
                    label: header.clone(),
                    month,
                }),
            }
        }

        let registration = registration.ok_or_else(|| ComplianceError::MissingColumn {
            column: REGISTRATION_COLUMN.to_string(),
        })?;

        log::debug!(
            "Detected {} payment column(s), {} descriptive column(s)",
            payments.len(),
            descriptive.len()
        );

        Ok(SheetLayout {
            headers: headers.to_vec(),
            registration,
            payments,
            descriptive,
        })
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_date_formats() {
        assert_eq!(parse_date("2024-03-01"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_date("2024-03-01 00:00:00"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_date("2024-03-15T08:30:00"), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_date("15/03/2024"), Some(ymd(2024, 3, 15)));
        assert_eq!(parse_date("2024-03"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_date(" 2024-03-01 "), Some(ymd(2024, 3, 1)));
    }

    #[test]
    fn parse_date_rejects_text() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("Nama Op"), None);
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn classify_headers() {
        assert_eq!(classify_header("TMT"), ColumnKind::Registration);
        assert_eq!(
            classify_header("2024-01-01 00:00:00"),
            ColumnKind::Payment(ymd(2024, 1, 1))
        );
        assert_eq!(classify_header("Nm Unit"), ColumnKind::Descriptive);
    }

    #[test]
    fn detect_layout_in_any_position() {
        let layout = SheetLayout::detect(&headers(&[
            "2024-02-01",
            "Nama Op",
            "TMT",
            "2024-01-01",
            "KLASIFIKASI",
        ]))
        .unwrap();

        assert_eq!(layout.registration, 2);
        assert_eq!(layout.descriptive, vec![1, 4]);
        // column order is kept, not month order
        let months: Vec<_> = layout.payments.iter().map(|p| p.month).collect();
        assert_eq!(months, vec![ymd(2024, 2, 1), ymd(2024, 1, 1)]);
        assert_eq!(layout.payments[1].index, 3);
    }

    #[test]
    fn detect_layout_without_payment_columns() {
        let layout = SheetLayout::detect(&headers(&["TMT", "Nama Op"])).unwrap();
        assert!(layout.payments.is_empty());
    }

    #[test]
    fn repeated_descriptive_headers() {
        let layout = SheetLayout::detect(&headers(&[
            "Keterangan",
            "TMT",
            "Keterangan",
            "2024-01-01",
        ]))
        .unwrap();

        assert_eq!(layout.registration, 1);
        assert_eq!(layout.descriptive, vec![0, 2]);
        assert_eq!(layout.payments[0].index, 3);
    }

    #[test]
    fn repeated_registration_column() {
        let err = SheetLayout::detect(&headers(&["TMT", "Nama Op", "TMT"])).unwrap_err();
        assert_eq!(
            err,
            ComplianceError::DuplicateColumn {
                column: "TMT".to_string()
            }
        );
    }

    #[test]
    fn missing_registration_column() {
        let err = SheetLayout::detect(&headers(&["Nama Op", "2024-01-01"])).unwrap_err();
        assert_eq!(
            err,
            ComplianceError::MissingColumn {
                column: "TMT".to_string()
            }
        );
    }
}
