//! Export command - CSV of expenses (or asset schedules) with derived fields

use super::{LedgerArgs, RateOptions};
use crate::core::{CapitalAsset, ExpenseRecord, Ledger};
use crate::csv_schema::CsvField;
use anyhow::Context;
use clap::Args;
use ftax_derive::CsvSchema;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ExportCommand {
    #[command(flatten)]
    ledger: LedgerArgs,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export asset CCA schedules instead of expenses
    #[arg(long)]
    assets: bool,
}

/// Exported expense row
#[derive(Debug, Serialize, CsvSchema)]
pub struct ExpenseExportRow {
    /// Expense identifier
    pub id: String,
    /// Expense date (YYYY-MM-DD)
    pub date: String,
    /// Expense category
    pub category: String,
    /// Description
    pub description: String,
    /// Receipt total including HST
    #[serde(rename = "total")]
    pub gross_amount: String,
    /// Amount before HST
    pub amount: String,
    /// HST paid
    pub hst: String,
    /// Business-use percentage
    pub business_use_percent: String,
    /// Deductible business portion of the amount before HST
    pub deductible: String,
    /// Input tax credit claimable
    pub itc: String,
}

impl From<&ExpenseRecord> for ExpenseExportRow {
    fn from(e: &ExpenseRecord) -> Self {
        ExpenseExportRow {
            id: e.id.clone(),
            date: e.date.format("%Y-%m-%d").to_string(),
            category: e.category.to_string(),
            description: e.description.clone(),
            gross_amount: format!("{:.2}", e.gross_amount),
            amount: format!("{:.2}", e.breakdown.amount_before_tax),
            hst: format!("{:.2}", e.breakdown.tax_amount),
            business_use_percent: format!("{}", e.business_use_percent.normalize()),
            deductible: format!("{:.2}", e.breakdown.deductible_amount),
            itc: format!("{:.2}", e.breakdown.itc_claimable),
        }
    }
}

/// Exported asset-year row
#[derive(Debug, Serialize, CsvSchema)]
pub struct AssetExportRow {
    /// Asset identifier
    pub id: String,
    /// Asset name
    pub name: String,
    /// CCA class number
    pub class: Option<String>,
    /// Declining-balance rate in percent
    pub rate_percent: String,
    /// Fair market value when business use began
    pub fair_market_value: String,
    /// Business-use percentage
    pub business_use_percent: String,
    /// Year of use (1-5)
    pub year: u32,
    /// CCA claimed for the year
    pub cca: String,
    /// Undepreciated capital cost at year end
    pub ucc: String,
}

impl AssetExportRow {
    /// One row per scheduled year
    pub fn rows(asset: &CapitalAsset) -> Vec<AssetExportRow> {
        asset
            .yearly_depreciation
            .iter()
            .map(|y| AssetExportRow {
                id: asset.id.clone(),
                name: asset.name.clone(),
                class: asset.cca_class.map(|c| c.number().to_string()),
                rate_percent: format!("{}", asset.depreciation_rate_percent.normalize()),
                fair_market_value: format!("{:.2}", asset.fair_market_value),
                business_use_percent: format!("{}", asset.business_use_percent.normalize()),
                year: y.year,
                cca: format!("{:.2}", y.depreciation_amount),
                ucc: format!("{:.2}", y.undepreciated_balance),
            })
            .collect()
    }
}

impl ExportCommand {
    pub fn exec(&self, rates: &RateOptions) -> anyhow::Result<()> {
        let ledger = self.ledger.load(rates.tax_rate())?;

        let count = match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Cannot create {}", path.display()))?;
                let count = self.write(&ledger, file)?;
                println!("Exported {} rows to {}", count, path.display());
                count
            }
            None => self.write(&ledger, io::stdout())?,
        };
        log::info!("Exported {} rows", count);
        Ok(())
    }

    fn write<W: Write>(&self, ledger: &Ledger, writer: W) -> anyhow::Result<usize> {
        if self.assets {
            let rows = ledger.assets().iter().flat_map(AssetExportRow::rows);
            write_csv(rows, writer)
        } else {
            let rows = ledger.expenses().iter().map(ExpenseExportRow::from);
            write_csv(rows, writer)
        }
    }
}

/// Write records as CSV, returning the number of rows written
pub fn write_csv<I, R, W>(records: I, writer: W) -> anyhow::Result<usize>
where
    I: IntoIterator<Item = R>,
    R: Serialize,
    W: Write,
{
    let mut wtr = csv::Writer::from_writer(writer);
    let mut count = 0;
    for record in records {
        wtr.serialize(record)?;
        count += 1;
    }
    wtr.flush()?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AssetDraft, CcaClass, ExpenseCategory, ExpenseDraft};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger
            .add_expense(
                &ExpenseDraft {
                    date: NaiveDate::from_ymd_opt(2024, 1, 15),
                    category: Some(ExpenseCategory::Software),
                    description: Some("Adobe, monthly".to_string()),
                    amount: Some(dec!(67.79)),
                    ..Default::default()
                },
                dec!(0.13),
            )
            .unwrap();
        ledger
            .add_asset(&AssetDraft {
                name: Some("Laptop".to_string()),
                cca_class: Some(CcaClass::Class50),
                fair_market_value: Some(dec!(2000)),
                ..Default::default()
            })
            .unwrap();
        ledger
    }

    #[test]
    fn expense_export_includes_derived_fields() {
        let ledger = ledger();
        let mut buf = Vec::new();
        let rows = ledger.expenses().iter().map(ExpenseExportRow::from);
        let count = write_csv(rows, &mut buf).unwrap();
        assert_eq!(count, 1);

        let out = String::from_utf8(buf).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some(ExpenseExportRow::csv_header().as_str()));
        assert_eq!(
            lines.next(),
            Some("exp-1,2024-01-15,Software,\"Adobe, monthly\",67.79,59.99,7.80,100,59.99,7.80")
        );
    }

    #[test]
    fn asset_export_one_row_per_year() {
        let ledger = ledger();
        let rows: Vec<_> = ledger.assets().iter().flat_map(AssetExportRow::rows).collect();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[1].cca, "797.50");
        assert_eq!(rows[1].ucc, "652.50");
        assert_eq!(rows[4].year, 5);
    }

    #[test]
    fn header_uses_serde_renames() {
        assert_eq!(
            ExpenseExportRow::csv_header(),
            "id,date,category,description,total,amount,hst,business_use_percent,deductible,itc"
        );
        let class = AssetExportRow::csv_schema()
            .iter()
            .find(|f| f.name == "class")
            .unwrap();
        assert!(!class.required);
    }
}
