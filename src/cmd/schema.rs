//! Schema command - print the input and output formats

use crate::core::{ComplianceResult, REGISTRATION_COLUMN};
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema, csv-header or csv-fields
    #[arg(value_enum, default_value = "csv-fields")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the derived fields of each output row
    JsonSchema,
    /// CSV header of the appended output columns
    CsvHeader,
    /// Input and output column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => {
                let schema = schema_for!(ComplianceResult);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::CsvHeader => {
                let labels: Vec<_> = ComplianceResult::output_columns()
                    .iter()
                    .map(|c| c.label)
                    .collect();
                println!("{}", labels.join(","));
            }
            SchemaFormat::CsvFields => print_fields(),
        }
        Ok(())
    }
}

fn print_fields() {
    println!("Input Columns");
    println!("=============");
    println!();
    println!(
        "{:28} (required)  Registration date (YYYY-MM-DD, DD/MM/YYYY or with time)",
        REGISTRATION_COLUMN
    );
    println!(
        "{:28} (optional)  Any header that is a date is one month's payment",
        "<date>"
    );
    println!(
        "{:28} (optional)  Other columns pass through unchanged",
        "<any>"
    );
    println!();
    println!("Appended Output Columns");
    println!("=======================");
    println!();
    for column in ComplianceResult::output_columns() {
        let kind = if column.numeric { "number" } else { "text" };
        println!("{:28} ({:8})  {}", column.label, kind, column.description);
    }
}
