//! Schema command - print expected input and export formats

use super::export::{AssetExportRow, ExpenseExportRow};
use crate::core::{
    format_percent, CcaClass, ExpenseCategory, ExpenseCsvRecord, LedgerInput, Province,
};
use crate::csv_schema::CsvField;
use clap::Args;
use rust_decimal_macros::dec;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema, csv-header or csv-fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the ledger input
    JsonSchema,
    /// CSV header row for expense input
    CsvHeader,
    /// CSV column descriptions for input and export
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::CsvHeader => self.print_csv_header(),
            SchemaFormat::CsvFields => self.print_csv_fields(),
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(LedgerInput);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_csv_header(&self) -> anyhow::Result<()> {
        println!("{}", ExpenseCsvRecord::csv_header());
        Ok(())
    }

    fn print_csv_fields(&self) -> anyhow::Result<()> {
        print_fields("Expense CSV Input", ExpenseCsvRecord::csv_schema());
        print_fields("Expense CSV Export", ExpenseExportRow::csv_schema());
        print_fields("Asset CSV Export (--assets)", AssetExportRow::csv_schema());

        let categories: Vec<&str> = ExpenseCategory::ALL.iter().map(|c| c.name()).collect();
        println!("Categories: {}", categories.join(", "));
        println!(
            "CCA classes: {}",
            [
                CcaClass::Class1,
                CcaClass::Class8,
                CcaClass::Class10,
                CcaClass::Class12,
                CcaClass::Class14_1,
                CcaClass::Class50,
            ]
            .iter()
            .map(|c| format!("{} ({}%)", c.number(), c.rate_percent()))
            .collect::<Vec<_>>()
            .join(", ")
        );
        println!(
            "Amounts include HST ({} in {}); tax is extracted as amount * rate / (1 + rate)",
            format_percent(Province::default().hst_rate() * dec!(100)),
            Province::default()
        );
        Ok(())
    }
}

fn print_fields(title: &str, fields: &[CsvField]) {
    println!("{}", title);
    println!("{}", "=".repeat(title.len()));
    println!();
    for field in fields {
        let req = if field.required { "required" } else { "optional" };
        println!("{:22} ({:8})  {}", field.name, req, field.description);
    }
    println!();
}
