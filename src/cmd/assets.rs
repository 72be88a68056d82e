//! Assets command - capital assets and their CCA schedules

use super::cca::schedule_table;
use super::export::{write_csv, AssetExportRow};
use super::{LedgerArgs, RateOptions};
use crate::core::{format_cad, format_percent, CapitalAsset};
use clap::Args;
use std::io;

#[derive(Args, Debug)]
pub struct AssetsCommand {
    #[command(flatten)]
    ledger: LedgerArgs,

    /// Output as CSV (one row per asset-year) instead of tables
    #[arg(long)]
    csv: bool,
}

impl AssetsCommand {
    pub fn exec(&self, rates: &RateOptions) -> anyhow::Result<()> {
        let ledger = self.ledger.load(rates.tax_rate())?;

        if self.csv {
            let rows = ledger.assets().iter().flat_map(AssetExportRow::rows);
            write_csv(rows, io::stdout())?;
            return Ok(());
        }

        if ledger.assets().is_empty() {
            println!("No capital assets");
            return Ok(());
        }

        for asset in ledger.assets() {
            print_asset(asset);
        }
        Ok(())
    }
}

fn print_asset(asset: &CapitalAsset) {
    println!();
    let class = asset
        .cca_class
        .map(|c| format!(" - {} ({})", c, c.description()))
        .unwrap_or_default();
    println!("{} [{}]{}", asset.name, asset.id, class);
    if let Some(date) = asset.in_use_date {
        println!("  In use since:        {}", date.format("%Y-%m-%d"));
    }
    println!("  Fair market value:   {}", format_cad(asset.fair_market_value));
    println!("  Business use:        {}", format_percent(asset.business_use_percent));
    println!(
        "  Rate:                {}",
        format_percent(asset.depreciation_rate_percent)
    );
    println!("{}", schedule_table(&asset.yearly_depreciation));
}
