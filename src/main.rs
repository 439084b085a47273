mod cmd;
mod core;
mod export;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "taxcomp",
    version,
    about = "Classify regional taxpayer compliance from monthly payment sheets"
)]
struct Opts {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the sheets of a workbook
    Sheets(cmd::sheets::SheetsCommand),
    /// Assess every taxpayer and show, print or export the result
    Compute(cmd::compute::ComputeCommand),
    /// Classification distribution, monthly payments and top taxpayers
    Summary(cmd::summary::SummaryCommand),
    /// Report data quality issues (exits with 1 when any are found)
    Validate(cmd::validate::ValidateCommand),
    /// Describe the input and output columns
    Schema(cmd::schema::SchemaCommand),
    /// Generate an HTML dashboard
    Dashboard(cmd::dashboard::DashboardCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    log::debug!("{:?}", opts);

    match opts.command {
        Command::Sheets(sheets) => sheets.exec(),
        Command::Compute(compute) => compute.exec(),
        Command::Summary(summary) => summary.exec(),
        Command::Validate(validate) => validate.exec(),
        Command::Schema(schema) => schema.exec(),
        Command::Dashboard(dashboard) => dashboard.exec(),
    }
}
