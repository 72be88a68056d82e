use clap::{Parser, Subcommand};
use ftax::cmd;

/// Canadian freelance HST and CCA calculator
#[derive(Parser, Debug)]
#[command(name = "ftax", version, about)]
struct Cli {
    #[command(flatten)]
    rates: cmd::RateOptions,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Break a receipt total down into HST, deductible amount and ITC
    Hst(cmd::hst::HstCommand),
    /// Preview a capital asset's five-year CCA schedule
    Cca(cmd::cca::CcaCommand),
    /// List expenses with their HST breakdown
    Expenses(cmd::expenses::ExpensesCommand),
    /// List capital assets with their CCA schedules
    Assets(cmd::assets::AssetsCommand),
    /// Totals for deductions, HST, ITC and CCA
    Summary(cmd::summary::SummaryCommand),
    /// Export expenses (or asset schedules) as CSV
    Export(cmd::export::ExportCommand),
    /// Print the expected input and export formats
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    log::debug!(
        "Province {} at tax rate {}",
        cli.rates.province,
        cli.rates.tax_rate()
    );

    match &cli.command {
        Command::Hst(cmd) => cmd.exec(&cli.rates),
        Command::Cca(cmd) => cmd.exec(),
        Command::Expenses(cmd) => cmd.exec(&cli.rates),
        Command::Assets(cmd) => cmd.exec(&cli.rates),
        Command::Summary(cmd) => cmd.exec(&cli.rates),
        Command::Export(cmd) => cmd.exec(&cli.rates),
        Command::Schema(cmd) => cmd.exec(),
    }
}
