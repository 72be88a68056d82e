//! CCA command - preview a capital asset's depreciation schedule

use super::parse_decimal_arg;
use crate::core::{
    cca::opening_balance, compute_depreciation_schedule, format_cad, format_percent, CcaClass,
    YearlyDepreciation,
};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct CcaCommand {
    /// Fair market value when business use began
    #[arg(short, long, value_parser = parse_decimal_arg)]
    fmv: Option<Decimal>,

    /// Declining-balance rate in percent (e.g. 55)
    #[arg(short, long, value_parser = parse_decimal_arg, conflicts_with = "class")]
    rate_percent: Option<Decimal>,

    /// CCA class supplying the rate (1, 8, 10, 12, 14.1, 50)
    #[arg(short, long, value_parser = parse_class)]
    class: Option<CcaClass>,

    /// Business-use percentage (0-100)
    #[arg(short, long, default_value = "100", value_parser = parse_decimal_arg)]
    business_use: Decimal,

    /// Output as JSON instead of a table
    #[arg(long)]
    json: bool,
}

/// Row for schedule tables
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ScheduleRow {
    #[tabled(rename = "Year")]
    pub year: u32,

    #[tabled(rename = "CCA")]
    pub depreciation: String,

    #[tabled(rename = "UCC")]
    pub balance: String,
}

impl From<&YearlyDepreciation> for ScheduleRow {
    fn from(entry: &YearlyDepreciation) -> Self {
        ScheduleRow {
            year: entry.year,
            depreciation: format_cad(entry.depreciation_amount),
            balance: format_cad(entry.undepreciated_balance),
        }
    }
}

pub fn schedule_table(schedule: &[YearlyDepreciation]) -> String {
    let rows: Vec<ScheduleRow> = schedule.iter().map(ScheduleRow::from).collect();
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string()
}

impl CcaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let rate = self.rate_percent.or(self.class.map(|c| c.rate_percent()));
        let schedule = compute_depreciation_schedule(self.fmv, rate, self.business_use);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&schedule)?);
            return Ok(());
        }

        if schedule.is_empty() {
            println!("Enter a fair market value and a rate (or class) to compute a schedule");
            return Ok(());
        }

        let fmv = self.fmv.unwrap_or(Decimal::ZERO);
        println!();
        match self.class {
            Some(class) => println!("CCA SCHEDULE ({}: {})", class, class.description()),
            None => println!("CCA SCHEDULE"),
        }
        println!();
        println!("  Fair market value:   {}", format_cad(fmv));
        println!("  Business use:        {}", format_percent(self.business_use));
        println!(
            "  Opening UCC:         {}",
            format_cad(opening_balance(fmv, self.business_use).unwrap_or(Decimal::ZERO))
        );
        if let Some(rate) = rate {
            println!("  Rate:                {} (half in year 1)", format_percent(rate));
        }
        println!();
        println!("{}", schedule_table(&schedule));
        Ok(())
    }
}

fn parse_class(s: &str) -> Result<CcaClass, String> {
    CcaClass::from_str(s).ok_or_else(|| format!("unknown CCA class '{s}'"))
}
