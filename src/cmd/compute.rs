//! Compute command - assessed taxpayer table, CSV export or JSON

use super::{format_amount, format_percent, DatasetArgs};
use crate::core::{filter, AssessedRecord, SheetLayout};
use crate::export;
use clap::Args;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

#[derive(Args, Debug)]
pub struct ComputeCommand {
    #[command(flatten)]
    dataset: DatasetArgs,

    /// Rows shown in the table preview
    #[arg(short, long, default_value_t = 30)]
    limit: usize,

    /// Output all rows as CSV instead of a formatted table
    #[arg(long, conflicts_with = "json")]
    csv: bool,

    /// Output all rows as JSON instead of a formatted table
    #[arg(long)]
    json: bool,

    /// Write the assessed sheet to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ComputeCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let (config, assessment) = self.dataset.assess()?;
        let records = filter::apply(&assessment, &config);

        if let Some(ref path) = self.output {
            let file = BufWriter::new(File::create(path)?);
            export::write_csv(&assessment.layout, &records, file)?;
            log::info!("Wrote {} row(s) to {}", records.len(), path.display());
            println!("Assessed sheet written to: {}", path.display());
            return Ok(());
        }

        if self.csv {
            export::write_csv(&assessment.layout, &records, io::stdout())
        } else if self.json {
            let rows = export::to_json_rows(&assessment.layout, &records)?;
            println!("{}", serde_json::to_string_pretty(&rows)?);
            Ok(())
        } else {
            self.print_table(&assessment.layout, &records);
            Ok(())
        }
    }

    fn print_table(&self, layout: &SheetLayout, records: &[&AssessedRecord]) {
        if records.is_empty() {
            println!("No taxpayers found matching filters");
            return;
        }

        // descriptive columns and TMT; payment columns are summarised by the results
        let mut columns: Vec<usize> = layout.descriptive.clone();
        columns.push(layout.registration);
        columns.sort_unstable();

        let mut builder = Builder::default();
        builder.push_record(
            columns
                .iter()
                .map(|&i| layout.headers[i].clone())
                .chain(
                    [
                        "Total Payment",
                        "Active",
                        "Paid",
                        "Average Payment",
                        "Compliance",
                        "Classification",
                    ]
                    .map(String::from),
                ),
        );
        for record in records.iter().take(self.limit) {
            let result = &record.result;
            builder.push_record(
                columns
                    .iter()
                    .map(|&i| record.record.cell(i).to_string())
                    .chain([
                        format_amount(result.total_payment),
                        result.active_months.to_string(),
                        result.paid_months.to_string(),
                        format_amount(result.average_payment),
                        format_percent(result.compliance_percent),
                        result.classification.to_string(),
                    ]),
            );
        }

        let table = builder
            .build()
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);

        if records.len() > self.limit {
            println!(
                "Showing {} of {} taxpayers (use --csv or --output for all rows)",
                self.limit,
                records.len()
            );
        }
    }
}
