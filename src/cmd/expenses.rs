//! Expenses command - list expenses with their HST breakdown

use super::export::write_csv;
use super::{LedgerArgs, RateOptions};
use crate::core::{format_cad, format_percent, ExpenseCategory, ExpenseRecord};
use clap::Args;
use std::io;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct ExpensesCommand {
    #[command(flatten)]
    ledger: LedgerArgs,

    /// Filter by category (e.g. Software, "Home Office")
    #[arg(short, long, value_parser = parse_category)]
    category: Option<ExpenseCategory>,

    /// Output as CSV instead of formatted table
    #[arg(long)]
    csv: bool,
}

impl ExpensesCommand {
    pub fn exec(&self, rates: &RateOptions) -> anyhow::Result<()> {
        let ledger = self.ledger.load(rates.tax_rate())?;
        let rows: Vec<ExpenseRow> = ledger
            .expenses()
            .iter()
            .filter(|e| self.category.map_or(true, |c| e.category == c))
            .map(ExpenseRow::from)
            .collect();

        if self.csv {
            write_csv(&rows, io::stdout())?;
            return Ok(());
        }

        if rows.is_empty() {
            println!("No expenses found matching filters");
            return Ok(());
        }

        let table = Table::new(&rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        Ok(())
    }
}

/// Row for the expenses table output
#[derive(Debug, Clone, Tabled, serde::Serialize)]
pub struct ExpenseRow {
    #[tabled(rename = "ID")]
    pub id: String,

    #[tabled(rename = "Date")]
    pub date: String,

    #[tabled(rename = "Category")]
    pub category: String,

    #[tabled(rename = "Description")]
    pub description: String,

    #[tabled(rename = "Amount")]
    pub amount: String,

    #[tabled(rename = "HST")]
    pub hst: String,

    #[tabled(rename = "Before Tax")]
    pub before_tax: String,

    #[tabled(rename = "Bus. Use")]
    pub business_use: String,

    #[tabled(rename = "Deductible")]
    pub deductible: String,

    #[tabled(rename = "ITC")]
    pub itc: String,
}

impl From<&ExpenseRecord> for ExpenseRow {
    fn from(e: &ExpenseRecord) -> Self {
        ExpenseRow {
            id: e.id.clone(),
            date: e.date.format("%Y-%m-%d").to_string(),
            category: e.category.to_string(),
            description: e.description.clone(),
            amount: format_cad(e.gross_amount),
            hst: format_cad(e.breakdown.tax_amount),
            before_tax: format_cad(e.breakdown.amount_before_tax),
            business_use: format_percent(e.business_use_percent),
            deductible: format_cad(e.breakdown.deductible_amount),
            itc: format_cad(e.breakdown.itc_claimable),
        }
    }
}

fn parse_category(s: &str) -> Result<ExpenseCategory, String> {
    ExpenseCategory::from_str(s).ok_or_else(|| {
        let names: Vec<&str> = ExpenseCategory::ALL.iter().map(|c| c.name()).collect();
        format!("unknown category '{s}' (expected one of: {})", names.join(", "))
    })
}
