//! ftax - Canadian freelance HST and CCA calculator
//!
//! - `core`: HST breakdowns, CCA schedules, expense/asset records and the
//!   in-memory ledger that holds them
//! - `cmd`: command-line subcommands built on `core`
//! - `csv_schema`: column metadata produced by `#[derive(CsvSchema)]`

pub mod cmd;
pub mod core;
pub mod csv_schema;
