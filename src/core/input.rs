use super::ledger::{Ledger, LedgerError};
use super::money::deserialize_lenient_str;
use super::records::{AssetDraft, ExpenseCategory, ExpenseDraft};
use crate::csv_schema::CsvField;
use chrono::NaiveDate;
use ftax_derive::CsvSchema;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("invalid JSON ledger: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid CSV expenses: {0}")]
    Csv(#[from] csv::Error),
    #[error("unknown expense category '{category}' on row {row}")]
    UnknownCategory { row: usize, category: String },
    #[error("invalid date '{date}' on row {row}")]
    InvalidDate { row: usize, date: String },
    #[error("expense #{index}: {source}")]
    Expense { index: usize, source: LedgerError },
    #[error("asset #{index}: {source}")]
    Asset { index: usize, source: LedgerError },
}

/// Root of a JSON ledger file
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct LedgerInput {
    #[serde(default)]
    pub expenses: Vec<ExpenseDraft>,
    #[serde(default)]
    pub assets: Vec<AssetDraft>,
}

/// One row of an expenses CSV file
#[derive(Debug, Clone, Deserialize, CsvSchema)]
pub struct ExpenseCsvRecord {
    /// Identifier (generated when blank)
    #[serde(default)]
    pub id: Option<String>,
    /// Expense date (YYYY-MM-DD)
    pub date: String,
    /// Software, Home Office, Equipment, Travel, Meals or Other
    pub category: String,
    /// What was bought
    pub description: String,
    /// Receipt total including HST
    #[serde(deserialize_with = "deserialize_lenient_str")]
    pub amount: Option<Decimal>,
    /// Business-use percentage, 0-100 (default 100)
    #[serde(default, deserialize_with = "deserialize_lenient_str")]
    pub business_use_percent: Option<Decimal>,
}

impl ExpenseCsvRecord {
    fn into_draft(self, row: usize) -> Result<ExpenseDraft, InputError> {
        let category = match self.category.trim() {
            "" => None,
            c => Some(ExpenseCategory::from_str(c).ok_or_else(|| InputError::UnknownCategory {
                row,
                category: c.to_string(),
            })?),
        };
        let date = match self.date.trim() {
            "" => None,
            d => Some(
                NaiveDate::parse_from_str(d, "%Y-%m-%d").map_err(|_| InputError::InvalidDate {
                    row,
                    date: d.to_string(),
                })?,
            ),
        };
        Ok(ExpenseDraft {
            id: self.id.filter(|id| !id.trim().is_empty()),
            date,
            category,
            description: Some(self.description).filter(|d| !d.trim().is_empty()),
            amount: self.amount,
            business_use_percent: self.business_use_percent,
        })
    }
}

/// Read a JSON ledger of expense and asset drafts
pub fn read_ledger_json<R: Read>(reader: R) -> Result<LedgerInput, InputError> {
    let input: LedgerInput = serde_json::from_reader(reader)?;
    log::info!(
        "Read {} expenses and {} assets",
        input.expenses.len(),
        input.assets.len()
    );
    Ok(input)
}

/// Read expense drafts from CSV
pub fn read_expenses_csv<R: Read>(reader: R) -> Result<LedgerInput, InputError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut expenses = Vec::new();
    for (i, result) in rdr.deserialize::<ExpenseCsvRecord>().enumerate() {
        let record = result?;
        expenses.push(record.into_draft(i + 1)?);
    }
    log::info!("Read {} csv expense records", expenses.len());
    Ok(LedgerInput {
        expenses,
        assets: Vec::new(),
    })
}

impl LedgerInput {
    /// Validate every draft in order and build a ledger
    pub fn into_ledger(self, tax_rate: Decimal) -> Result<Ledger, InputError> {
        let mut ledger = Ledger::new();
        for (i, draft) in self.expenses.iter().enumerate() {
            ledger
                .add_expense(draft, tax_rate)
                .map_err(|source| InputError::Expense { index: i + 1, source })?;
        }
        for (i, draft) in self.assets.iter().enumerate() {
            ledger
                .add_asset(draft)
                .map_err(|source| InputError::Asset { index: i + 1, source })?;
        }
        Ok(ledger)
    }
}
