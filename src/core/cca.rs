use super::money::{percent_of, round2};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Number of years in a generated CCA schedule
pub const SCHEDULE_YEARS: u32 = 5;

/// One year of a capital cost allowance schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearlyDepreciation {
    /// Year of use, starting at 1
    pub year: u32,
    /// CCA claimed for the year
    pub depreciation_amount: Decimal,
    /// Undepreciated capital cost remaining at year end
    pub undepreciated_balance: Decimal,
}

/// Build a five-year declining-balance schedule.
///
/// The opening balance is the business-use share of the fair market value.
/// Year 1 claims half the class rate (half-year rule); later years claim the
/// full rate on the remaining balance. Returns an empty schedule when either
/// the fair market value or the rate is missing or zero, or when the values
/// are too large to compute.
pub fn compute_depreciation_schedule(
    fair_market_value: Option<Decimal>,
    rate_percent: Option<Decimal>,
    business_use_percent: Decimal,
) -> Vec<YearlyDepreciation> {
    let (fmv, rate_percent) = match (fair_market_value, rate_percent) {
        (Some(fmv), Some(rate)) if !fmv.is_zero() && !rate.is_zero() => (fmv, rate),
        _ => return Vec::new(),
    };

    build_schedule(fmv, rate_percent, business_use_percent).unwrap_or_else(|| {
        log::warn!(
            "CCA schedule overflowed for fmv={}, rate={}%, business_use={}%",
            fmv,
            rate_percent,
            business_use_percent
        );
        Vec::new()
    })
}

fn build_schedule(
    fmv: Decimal,
    rate_percent: Decimal,
    business_use_percent: Decimal,
) -> Option<Vec<YearlyDepreciation>> {
    let rate = rate_percent.checked_div(dec!(100))?;
    let mut balance = opening_balance(fmv, business_use_percent)?;
    let mut schedule = Vec::with_capacity(SCHEDULE_YEARS as usize);

    for year in 1..=SCHEDULE_YEARS {
        let claim_rate = if year == 1 { rate * dec!(0.5) } else { rate };
        let depreciation_amount = round2(balance.checked_mul(claim_rate)?);
        balance = balance.checked_sub(depreciation_amount)?;

        log::debug!(
            "CCA year {}: claim={}, balance={}",
            year,
            depreciation_amount,
            balance
        );

        schedule.push(YearlyDepreciation {
            year,
            depreciation_amount,
            undepreciated_balance: balance,
        });
    }

    Some(schedule)
}

/// Opening undepreciated capital cost before year 1
pub fn opening_balance(
    fair_market_value: Decimal,
    business_use_percent: Decimal,
) -> Option<Decimal> {
    percent_of(fair_market_value, business_use_percent)
}
