use super::money::{percent_of, round2};
use rust_decimal::Decimal;

/// Tax-inclusive amount split into its HST and business-use components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaxBreakdown {
    /// HST embedded in the gross amount
    pub tax_amount: Decimal,
    /// Gross amount less HST
    pub amount_before_tax: Decimal,
    /// Business-use share of the before-tax amount
    pub deductible_amount: Decimal,
    /// Business-use share of the HST, reclaimable as an input tax credit
    pub itc_claimable: Decimal,
}

/// Split a tax-inclusive gross amount into before-tax and HST portions, then
/// apply the business-use percentage to each.
///
/// The gross amount is treated as the receipt total, so the embedded tax is
/// `gross * rate / (1 + rate)`. A missing gross amount yields an all-zero
/// breakdown, as does one too large to compute. `business_use_percent` is
/// not clamped.
pub fn compute_tax_breakdown(
    gross_amount: Option<Decimal>,
    business_use_percent: Decimal,
    tax_rate: Decimal,
) -> TaxBreakdown {
    let gross = gross_amount.unwrap_or(Decimal::ZERO);
    if gross.is_zero() {
        return TaxBreakdown::default();
    }

    match split_gross(gross, business_use_percent, tax_rate) {
        Some(breakdown) => {
            log::debug!(
                "HST breakdown: gross={}, rate={}, business_use={}% -> {:?}",
                gross,
                tax_rate,
                business_use_percent,
                breakdown
            );
            breakdown
        }
        None => {
            log::warn!(
                "HST breakdown overflowed for gross={}, rate={}, business_use={}%, using 0",
                gross,
                tax_rate,
                business_use_percent
            );
            TaxBreakdown::default()
        }
    }
}

fn split_gross(
    gross: Decimal,
    business_use_percent: Decimal,
    tax_rate: Decimal,
) -> Option<TaxBreakdown> {
    let divisor = Decimal::ONE.checked_add(tax_rate)?;
    let tax_amount = round2(gross.checked_mul(tax_rate)?.checked_div(divisor)?);
    let amount_before_tax = round2(gross.checked_sub(tax_amount)?);
    let deductible_amount = round2(percent_of(amount_before_tax, business_use_percent)?);
    let itc_claimable = round2(percent_of(tax_amount, business_use_percent)?);

    Some(TaxBreakdown {
        tax_amount,
        amount_before_tax,
        deductible_amount,
        itc_claimable,
    })
}

impl TaxBreakdown {
    /// Reconstructed gross amount
    pub fn gross_amount(&self) -> Decimal {
        self.amount_before_tax + self.tax_amount
    }
}
