//! HST command - live breakdown of a single receipt amount

use super::{parse_decimal_arg, RateOptions};
use crate::core::{compute_tax_breakdown, format_cad, format_percent};
use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct HstCommand {
    /// Receipt total including HST
    #[arg(short, long, value_parser = parse_decimal_arg)]
    amount: Option<Decimal>,

    /// Business-use percentage (0-100)
    #[arg(short, long, default_value = "100", value_parser = parse_decimal_arg)]
    business_use: Decimal,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct HstOutput {
    gross_amount: String,
    tax_rate: String,
    business_use_percent: String,
    tax_amount: String,
    amount_before_tax: String,
    deductible_amount: String,
    itc_claimable: String,
}

impl HstCommand {
    pub fn exec(&self, rates: &RateOptions) -> anyhow::Result<()> {
        let tax_rate = rates.tax_rate();
        let breakdown = compute_tax_breakdown(self.amount, self.business_use, tax_rate);
        let gross = self.amount.unwrap_or(Decimal::ZERO);

        if self.json {
            let output = HstOutput {
                gross_amount: format!("{:.2}", gross),
                tax_rate: format!("{}", tax_rate.normalize()),
                business_use_percent: format!("{}", self.business_use.normalize()),
                tax_amount: format!("{:.2}", breakdown.tax_amount),
                amount_before_tax: format!("{:.2}", breakdown.amount_before_tax),
                deductible_amount: format!("{:.2}", breakdown.deductible_amount),
                itc_claimable: format!("{:.2}", breakdown.itc_claimable),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        println!();
        println!(
            "HST BREAKDOWN ({} @ {})",
            rates.province,
            format_percent(tax_rate * dec!(100))
        );
        println!();
        println!("  Amount (incl. HST):  {}", format_cad(gross));
        println!("  HST:                 {}", format_cad(breakdown.tax_amount));
        println!("  Amount before tax:   {}", format_cad(breakdown.amount_before_tax));
        println!();
        println!("  Business use:        {}", format_percent(self.business_use));
        println!("  Deductible:          {}", format_cad(breakdown.deductible_amount));
        println!("  ITC claimable:       {}", format_cad(breakdown.itc_claimable));
        println!();
        Ok(())
    }
}
