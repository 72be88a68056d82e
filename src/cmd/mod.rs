pub mod assets;
pub mod cca;
pub mod expenses;
pub mod export;
pub mod hst;
pub mod schema;
pub mod summary;

use crate::core::{
    effective_tax_rate, read_expenses_csv, read_ledger_json, Ledger, LedgerInput, Province,
};
use anyhow::Context;
use clap::Args;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Options selecting the HST rate, shared by every command
#[derive(Args, Debug, Clone)]
pub struct RateOptions {
    /// Province whose HST rate applies (ON, NB, NL, NS, PE)
    #[arg(
        long,
        global = true,
        env = "FTAX_PROVINCE",
        default_value = "ON",
        value_parser = parse_province
    )]
    pub province: Province,

    /// Explicit tax rate as a fraction (e.g. 0.13), overrides --province
    #[arg(long, global = true, value_parser = parse_rate)]
    pub rate: Option<Decimal>,
}

impl RateOptions {
    pub fn tax_rate(&self) -> Decimal {
        effective_tax_rate(self.province, self.rate)
    }
}

/// Input ledger argument, shared by the listing and reporting commands
#[derive(Args, Debug, Clone)]
pub struct LedgerArgs {
    /// JSON ledger or CSV expenses file ("-" reads JSON from stdin)
    #[arg(short, long)]
    pub ledger: PathBuf,
}

impl LedgerArgs {
    pub fn load(&self, tax_rate: Decimal) -> anyhow::Result<Ledger> {
        let input = read_input(&self.ledger)?;
        input
            .into_ledger(tax_rate)
            .with_context(|| format!("Invalid ledger {}", self.ledger.display()))
    }
}

/// Read a ledger file (or stdin with "-"); `.csv` files hold expenses only
pub fn read_input(path: &Path) -> anyhow::Result<LedgerInput> {
    if path.as_os_str() == "-" {
        return read_from_stdin();
    }

    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let reader = BufReader::new(file);
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let input = if is_csv {
        read_expenses_csv(reader)?
    } else {
        read_ledger_json(reader)?
    };
    Ok(input)
}

fn read_from_stdin() -> anyhow::Result<LedgerInput> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    Ok(read_ledger_json(io::Cursor::new(buffer))?)
}

fn parse_province(s: &str) -> Result<Province, String> {
    Province::from_str(s)
        .ok_or_else(|| format!("unknown HST province '{s}' (expected ON, NB, NL, NS or PE)"))
}

fn parse_rate(s: &str) -> Result<Decimal, String> {
    let rate = Decimal::from_str(s.trim()).map_err(|e| format!("invalid rate '{s}': {e}"))?;
    if rate < Decimal::ZERO || rate >= Decimal::ONE {
        return Err(format!("rate must be a fraction in [0, 1): {s}"));
    }
    Ok(rate)
}

/// Parse a decimal CLI argument leniently ("$1,200", "80%")
pub fn parse_decimal_arg(s: &str) -> Result<Decimal, String> {
    Ok(crate::core::parse_amount(s))
}
