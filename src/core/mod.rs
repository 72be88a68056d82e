pub mod cca;
pub mod hst;
pub mod input;
pub mod ledger;
pub mod money;
pub mod rates;
pub mod records;

// Flat public surface for domain types and functions.
pub use cca::{compute_depreciation_schedule, YearlyDepreciation, SCHEDULE_YEARS};
pub use hst::{compute_tax_breakdown, TaxBreakdown};
pub use input::{read_expenses_csv, read_ledger_json, ExpenseCsvRecord, InputError, LedgerInput};
pub use ledger::{CategoryTotals, Ledger, LedgerError, LedgerSummary};
pub use money::{format_cad, format_percent, parse_amount, round2};
pub use rates::{effective_tax_rate, CcaClass, Province};
pub use records::{
    AssetDraft, CapitalAsset, ExpenseCategory, ExpenseDraft, ExpenseRecord, ValidationError,
};
