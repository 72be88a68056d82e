//! Summary command - totals for deductions, HST and CCA

use super::{LedgerArgs, RateOptions};
use crate::core::{format_cad, format_percent, LedgerSummary};
use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Args, Debug)]
pub struct SummaryCommand {
    #[command(flatten)]
    ledger: LedgerArgs,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct SummaryData {
    province: String,
    tax_rate: String,
    expenses: ExpenseSummary,
    capital_assets: CcaSummary,
    total_first_year_deductions: String,
}

#[derive(Debug, Serialize)]
struct ExpenseSummary {
    count: usize,
    total_expenses: String,
    total_hst: String,
    total_before_tax: String,
    total_deductions: String,
    total_itc: String,
    by_category: BTreeMap<String, CategorySummary>,
}

#[derive(Debug, Serialize)]
struct CategorySummary {
    count: usize,
    total: String,
    deductible: String,
    itc: String,
}

#[derive(Debug, Serialize)]
struct CcaSummary {
    count: usize,
    first_year_cca: String,
    cca_by_year: Vec<String>,
}

impl SummaryCommand {
    pub fn exec(&self, rates: &RateOptions) -> anyhow::Result<()> {
        let ledger = self.ledger.load(rates.tax_rate())?;
        let summary = ledger.summary();

        if self.json {
            self.print_json(&summary, rates)
        } else {
            self.print_text(&summary, rates);
            Ok(())
        }
    }

    fn print_text(&self, summary: &LedgerSummary, rates: &RateOptions) {
        let rate_pct = format_percent(rates.tax_rate() * dec!(100));

        println!();
        println!("TAX SUMMARY ({} HST {})", rates.province, rate_pct);
        println!();

        println!("EXPENSES");
        println!("  Count: {}", summary.expense_count);
        println!("  Total Expenses:   {}", format_cad(summary.total_gross));
        println!("  Total HST:        {}", format_cad(summary.total_tax));
        println!("  Total Deductions: {}", format_cad(summary.total_deductible));
        println!("  ITC Claimable:    {}", format_cad(summary.total_itc));
        if !summary.by_category.is_empty() {
            println!();
            for (category, totals) in &summary.by_category {
                println!(
                    "  {:<12} {:>3} item(s)  deductible {:>12}  ITC {:>10}",
                    category.name(),
                    totals.count,
                    format_cad(totals.deductible),
                    format_cad(totals.itc)
                );
            }
        }
        println!();

        println!("CAPITAL ASSETS (CCA)");
        println!("  Count: {}", summary.asset_count);
        if summary.asset_count > 0 {
            for (i, cca) in summary.cca_by_year.iter().enumerate() {
                println!("  Year {}: {}", i + 1, format_cad(*cca));
            }
        } else {
            println!("  No capital assets");
        }
        println!();

        println!(
            "FIRST-YEAR DEDUCTIONS (expenses + CCA): {}",
            format_cad(summary.total_first_year_deductions())
        );
        println!();
    }

    fn print_json(&self, summary: &LedgerSummary, rates: &RateOptions) -> anyhow::Result<()> {
        let by_category = summary
            .by_category
            .iter()
            .map(|(category, totals)| {
                (
                    category.name().to_string(),
                    CategorySummary {
                        count: totals.count,
                        total: format!("{:.2}", totals.gross),
                        deductible: format!("{:.2}", totals.deductible),
                        itc: format!("{:.2}", totals.itc),
                    },
                )
            })
            .collect();

        let data = SummaryData {
            province: rates.province.to_string(),
            tax_rate: format!("{}", rates.tax_rate().normalize()),
            expenses: ExpenseSummary {
                count: summary.expense_count,
                total_expenses: format!("{:.2}", summary.total_gross),
                total_hst: format!("{:.2}", summary.total_tax),
                total_before_tax: format!("{:.2}", summary.total_before_tax),
                total_deductions: format!("{:.2}", summary.total_deductible),
                total_itc: format!("{:.2}", summary.total_itc),
                by_category,
            },
            capital_assets: CcaSummary {
                count: summary.asset_count,
                first_year_cca: format!("{:.2}", summary.first_year_cca()),
                cca_by_year: summary
                    .cca_by_year
                    .iter()
                    .map(|c: &Decimal| format!("{:.2}", c))
                    .collect(),
            },
            total_first_year_deductions: format!("{:.2}", summary.total_first_year_deductions()),
        };

        println!("{}", serde_json::to_string_pretty(&data)?);
        Ok(())
    }
}
