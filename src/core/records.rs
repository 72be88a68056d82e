use super::cca::{compute_depreciation_schedule, YearlyDepreciation};
use super::hst::{compute_tax_breakdown, TaxBreakdown};
use super::money::deserialize_lenient;
use super::rates::CcaClass;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Business-use percentage assumed when a draft leaves it blank
pub const DEFAULT_BUSINESS_USE: Decimal = dec!(100);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("please fill in all fields: missing {0}")]
    MissingField(&'static str),
    #[error("amount must not be negative: {0}")]
    NegativeAmount(Decimal),
    #[error("depreciation rate must be in (0, 100]: {0}")]
    InvalidRate(Decimal),
}

/// Expense category
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum ExpenseCategory {
    Software,
    #[serde(rename = "Home Office", alias = "HomeOffice")]
    HomeOffice,
    Equipment,
    Travel,
    Meals,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 6] = [
        ExpenseCategory::Software,
        ExpenseCategory::HomeOffice,
        ExpenseCategory::Equipment,
        ExpenseCategory::Travel,
        ExpenseCategory::Meals,
        ExpenseCategory::Other,
    ];

    pub fn from_str(s: &str) -> Option<ExpenseCategory> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "software" => Some(ExpenseCategory::Software),
            "homeoffice" => Some(ExpenseCategory::HomeOffice),
            "equipment" => Some(ExpenseCategory::Equipment),
            "travel" => Some(ExpenseCategory::Travel),
            "meals" => Some(ExpenseCategory::Meals),
            "other" => Some(ExpenseCategory::Other),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExpenseCategory::Software => "Software",
            ExpenseCategory::HomeOffice => "Home Office",
            ExpenseCategory::Equipment => "Equipment",
            ExpenseCategory::Travel => "Travel",
            ExpenseCategory::Meals => "Meals",
            ExpenseCategory::Other => "Other",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Expense as entered, before validation. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExpenseDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub category: Option<ExpenseCategory>,
    #[serde(default)]
    pub description: Option<String>,
    /// Receipt total including HST
    #[serde(default, deserialize_with = "deserialize_lenient")]
    #[schemars(with = "Option<f64>")]
    pub amount: Option<Decimal>,
    /// Share of the expense used for business, 0-100 (default 100)
    #[serde(default, deserialize_with = "deserialize_lenient")]
    #[schemars(with = "Option<f64>")]
    pub business_use_percent: Option<Decimal>,
}

impl ExpenseDraft {
    pub fn business_use(&self) -> Decimal {
        self.business_use_percent.unwrap_or(DEFAULT_BUSINESS_USE)
    }

    /// Live breakdown for the fields entered so far
    pub fn preview(&self, tax_rate: Decimal) -> TaxBreakdown {
        compute_tax_breakdown(self.amount, self.business_use(), tax_rate)
    }

    /// Overlay the present fields of `other` on top of this draft
    pub fn merged(&self, other: &ExpenseDraft) -> ExpenseDraft {
        ExpenseDraft {
            id: other.id.clone().or_else(|| self.id.clone()),
            date: other.date.or(self.date),
            category: other.category.or(self.category),
            description: other.description.clone().or_else(|| self.description.clone()),
            amount: other.amount.or(self.amount),
            business_use_percent: other.business_use_percent.or(self.business_use_percent),
        }
    }
}

/// A validated expense with its HST breakdown frozen at creation
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRecord {
    pub id: String,
    pub date: NaiveDate,
    pub category: ExpenseCategory,
    pub description: String,
    pub gross_amount: Decimal,
    pub business_use_percent: Decimal,
    pub tax_rate: Decimal,
    pub breakdown: TaxBreakdown,
}

impl ExpenseRecord {
    pub fn from_draft(
        draft: &ExpenseDraft,
        id: String,
        tax_rate: Decimal,
    ) -> Result<Self, ValidationError> {
        let date = draft.date.ok_or(ValidationError::MissingField("date"))?;
        let category = draft
            .category
            .ok_or(ValidationError::MissingField("category"))?;
        let description = draft
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or(ValidationError::MissingField("description"))?
            .to_string();
        let gross_amount = draft
            .amount
            .filter(|a| !a.is_zero())
            .ok_or(ValidationError::MissingField("amount"))?;
        if gross_amount < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount(gross_amount));
        }

        let business_use_percent = draft.business_use();
        if business_use_percent < Decimal::ZERO || business_use_percent > dec!(100) {
            log::warn!(
                "Expense '{}' has business use {}% outside 0-100",
                description,
                business_use_percent
            );
        }

        let breakdown = compute_tax_breakdown(Some(gross_amount), business_use_percent, tax_rate);

        Ok(ExpenseRecord {
            id,
            date,
            category,
            description,
            gross_amount,
            business_use_percent,
            tax_rate,
            breakdown,
        })
    }

    /// The draft that would recreate this record
    pub fn to_draft(&self) -> ExpenseDraft {
        ExpenseDraft {
            id: Some(self.id.clone()),
            date: Some(self.date),
            category: Some(self.category),
            description: Some(self.description.clone()),
            amount: Some(self.gross_amount),
            business_use_percent: Some(self.business_use_percent),
        }
    }

    /// A new record with the present fields of `changes` applied. The id is kept.
    pub fn edited(
        &self,
        changes: &ExpenseDraft,
        tax_rate: Decimal,
    ) -> Result<Self, ValidationError> {
        let draft = self.to_draft().merged(changes);
        ExpenseRecord::from_draft(&draft, self.id.clone(), tax_rate)
    }
}

/// Capital asset as entered, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AssetDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// CCA class, used for the rate when `rate_percent` is absent
    #[serde(default)]
    pub cca_class: Option<CcaClass>,
    /// Declining-balance rate in percent, overrides the class rate
    #[serde(default, deserialize_with = "deserialize_lenient")]
    #[schemars(with = "Option<f64>")]
    pub rate_percent: Option<Decimal>,
    /// Fair market value when business use began
    #[serde(default, deserialize_with = "deserialize_lenient")]
    #[schemars(with = "Option<f64>")]
    pub fair_market_value: Option<Decimal>,
    /// Share of the asset used for business, 0-100 (default 100)
    #[serde(default, deserialize_with = "deserialize_lenient")]
    #[schemars(with = "Option<f64>")]
    pub business_use_percent: Option<Decimal>,
    #[serde(default)]
    pub in_use_date: Option<NaiveDate>,
}

impl AssetDraft {
    pub fn business_use(&self) -> Decimal {
        self.business_use_percent.unwrap_or(DEFAULT_BUSINESS_USE)
    }

    /// Explicit rate, falling back to the CCA class table
    pub fn rate(&self) -> Option<Decimal> {
        self.rate_percent
            .or_else(|| self.cca_class.map(|c| c.rate_percent()))
    }

    /// Live schedule for the fields entered so far
    pub fn preview(&self) -> Vec<YearlyDepreciation> {
        compute_depreciation_schedule(self.fair_market_value, self.rate(), self.business_use())
    }

    pub fn merged(&self, other: &AssetDraft) -> AssetDraft {
        AssetDraft {
            id: other.id.clone().or_else(|| self.id.clone()),
            name: other.name.clone().or_else(|| self.name.clone()),
            cca_class: other.cca_class.or(self.cca_class),
            // A new class without an explicit rate takes the class rate
            rate_percent: match (other.rate_percent, other.cca_class) {
                (Some(rate), _) => Some(rate),
                (None, Some(_)) => None,
                (None, None) => self.rate_percent,
            },
            fair_market_value: other.fair_market_value.or(self.fair_market_value),
            business_use_percent: other.business_use_percent.or(self.business_use_percent),
            in_use_date: other.in_use_date.or(self.in_use_date),
        }
    }
}

/// A validated capital asset with its CCA schedule computed at creation
#[derive(Debug, Clone, PartialEq)]
pub struct CapitalAsset {
    pub id: String,
    pub name: String,
    pub cca_class: Option<CcaClass>,
    pub depreciation_rate_percent: Decimal,
    pub fair_market_value: Decimal,
    pub business_use_percent: Decimal,
    pub in_use_date: Option<NaiveDate>,
    pub yearly_depreciation: Vec<YearlyDepreciation>,
}

impl CapitalAsset {
    pub fn from_draft(draft: &AssetDraft, id: String) -> Result<Self, ValidationError> {
        let name = draft
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(ValidationError::MissingField("name"))?
            .to_string();
        let fair_market_value = draft
            .fair_market_value
            .filter(|v| !v.is_zero())
            .ok_or(ValidationError::MissingField("fair_market_value"))?;
        if fair_market_value < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount(fair_market_value));
        }
        let depreciation_rate_percent = draft
            .rate()
            .ok_or(ValidationError::MissingField("rate_percent"))?;
        if depreciation_rate_percent <= Decimal::ZERO || depreciation_rate_percent > dec!(100) {
            return Err(ValidationError::InvalidRate(depreciation_rate_percent));
        }

        let business_use_percent = draft.business_use();
        if business_use_percent < Decimal::ZERO || business_use_percent > dec!(100) {
            log::warn!(
                "Asset '{}' has business use {}% outside 0-100",
                name,
                business_use_percent
            );
        }

        let yearly_depreciation = compute_depreciation_schedule(
            Some(fair_market_value),
            Some(depreciation_rate_percent),
            business_use_percent,
        );

        Ok(CapitalAsset {
            id,
            name,
            cca_class: draft.cca_class,
            depreciation_rate_percent,
            fair_market_value,
            business_use_percent,
            in_use_date: draft.in_use_date,
            yearly_depreciation,
        })
    }

    pub fn to_draft(&self) -> AssetDraft {
        AssetDraft {
            id: Some(self.id.clone()),
            name: Some(self.name.clone()),
            cca_class: self.cca_class,
            rate_percent: Some(self.depreciation_rate_percent),
            fair_market_value: Some(self.fair_market_value),
            business_use_percent: Some(self.business_use_percent),
            in_use_date: self.in_use_date,
        }
    }

    pub fn edited(&self, changes: &AssetDraft) -> Result<Self, ValidationError> {
        let draft = self.to_draft().merged(changes);
        CapitalAsset::from_draft(&draft, self.id.clone())
    }

    /// Recompute the cached schedule from the stored inputs
    pub fn recalculate(&mut self) {
        self.yearly_depreciation = compute_depreciation_schedule(
            Some(self.fair_market_value),
            Some(self.depreciation_rate_percent),
            self.business_use_percent,
        );
    }

    /// CCA claimed in the given year of use, zero outside the schedule
    pub fn depreciation_for_year(&self, year: u32) -> Decimal {
        self.yearly_depreciation
            .iter()
            .find(|y| y.year == year)
            .map_or(Decimal::ZERO, |y| y.depreciation_amount)
    }
}
