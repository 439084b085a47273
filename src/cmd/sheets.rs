//! Sheets command - list the sheets of a workbook

use crate::core::{SheetLayout, Workbook};
use clap::Args;
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

#[derive(Args, Debug)]
pub struct SheetsCommand {
    /// CSV file, or directory of CSV files (one sheet per file)
    #[arg(short, long)]
    file: PathBuf,
}

#[derive(Tabled)]
struct SheetRow {
    #[tabled(rename = "Sheet")]
    name: String,
    #[tabled(rename = "Rows")]
    rows: usize,
    #[tabled(rename = "Payment Columns")]
    payment_columns: String,
}

impl SheetsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let workbook = Workbook::open(&self.file)?;

        let rows: Vec<_> = workbook
            .sheets()
            .iter()
            .map(|sheet| SheetRow {
                name: sheet.name.clone(),
                rows: sheet.rows.len(),
                payment_columns: match SheetLayout::detect(&sheet.headers) {
                    Ok(layout) => layout.payments.len().to_string(),
                    Err(e) => e.to_string(),
                },
            })
            .collect();

        println!("{}", Table::new(rows).with(Style::rounded()));
        Ok(())
    }
}
